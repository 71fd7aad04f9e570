pub mod outcome;
pub mod trash_entry;

pub mod endpoints;
pub mod restore_plan;

pub mod destination_service;
pub mod restore_executor;
pub mod restore_service;
pub mod run_reporter;
pub mod trash_collector;

#[cfg(test)]
mod restore_service_test;

use async_trait::async_trait;

use crate::application::dtos::run_summary::RunSummary;
use crate::common::errors::Result;

/// Port for the restore use case
#[async_trait]
pub trait RestoreUseCase: Send + Sync {
    /// Run one full restore pass: collect the trash catalog, build the plan
    /// and process every entry in order. Only catalog-scoped failures return
    /// `Err`; per-entry failures are counted in the summary.
    async fn run(&self) -> Result<RunSummary>;
}

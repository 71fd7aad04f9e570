use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument};

use crate::application::dtos::run_summary::RunSummary;
use crate::application::ports::restore_ports::RestoreUseCase;
use crate::application::services::destination_service::DestinationMaterializer;
use crate::application::services::restore_executor::RestoreExecutor;
use crate::application::services::run_reporter::RunReporter;
use crate::application::services::trash_collector::TrashCollector;
use crate::common::errors::Result;
use crate::domain::entities::outcome::Outcome;
use crate::domain::services::restore_plan::{IndexRange, RestorePlan, ShardSelector};

/// Orquesta una pasada completa de restauración: catálogo → plan → por cada
/// entrada, materialización de ancestros y movimiento, estrictamente en el
/// orden del plan. Un solo hilo lógico; el escalado es entre procesos vía
/// shards.
pub struct RestoreService {
    collector: TrashCollector,
    materializer: Arc<DestinationMaterializer>,
    executor: RestoreExecutor,
    selector: ShardSelector,
    range: IndexRange,
}

impl RestoreService {
    pub fn new(
        collector: TrashCollector,
        materializer: Arc<DestinationMaterializer>,
        executor: RestoreExecutor,
        selector: ShardSelector,
        range: IndexRange,
    ) -> Self {
        Self {
            collector,
            materializer,
            executor,
            selector,
            range,
        }
    }
}

#[async_trait]
impl RestoreUseCase for RestoreService {
    #[instrument(skip(self))]
    async fn run(&self) -> Result<RunSummary> {
        info!("collecting trashed items to restore");
        let catalog = self.collector.collect().await?;
        let plan = RestorePlan::build(catalog, &self.selector, &self.range);
        info!(
            items = plan.len(),
            shard = self.selector.shard(),
            shards = self.selector.total(),
            "restore plan ready"
        );

        let mut reporter = RunReporter::new();
        for entry in plan.iter() {
            // Los directorios intermedios se crean antes de intentar el MOVE;
            // un fallo aquí marca la entrada y la ejecución continúa.
            if entry.parent_path().is_some() {
                if let Err(err) = self
                    .materializer
                    .ensure_ancestors(&entry.destination_path)
                    .await
                {
                    error!(
                        destination = %entry.destination_path,
                        error = %err,
                        "destination directories could not be materialized"
                    );
                    reporter.record(entry, &Outcome::Failed(None));
                    continue;
                }
            }
            let outcome = self.executor.restore(entry).await;
            reporter.record(entry, &outcome);
        }

        let summary = reporter.finish();
        info!(
            total = summary.total,
            ok = summary.ok(),
            failed = summary.failed,
            "restore run finished"
        );
        Ok(summary)
    }
}

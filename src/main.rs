use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oxirestore::application::dtos::run_summary::RunSummary;
use oxirestore::application::ports::dav_ports::DavClient;
use oxirestore::application::ports::restore_ports::RestoreUseCase;
use oxirestore::application::services::destination_service::DestinationMaterializer;
use oxirestore::application::services::restore_executor::RestoreExecutor;
use oxirestore::application::services::restore_service::RestoreService;
use oxirestore::application::services::trash_collector::TrashCollector;
use oxirestore::common::errors::Result;
use oxirestore::domain::services::endpoints::DavEndpoints;
use oxirestore::domain::services::restore_plan::{IndexRange, ShardSelector};
use oxirestore::infrastructure::clients::dav_client::ReqwestDavClient;
use oxirestore::interfaces::cli::Cli;

/// oxirestore - Trash restore tool for WebDAV file-hosting servers
///
/// Given a cutoff date, finds every trashed file and directory deleted on or
/// after that date and moves it back into the live file tree, recreating any
/// destination directories that no longer exist. Workloads can be split
/// across independent worker processes with a deterministic hash-based shard
/// selector; no coordination between workers is required.
#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let json_summary = cli.json;

    match run(cli).await {
        Ok(summary) => print_summary(&summary, json_summary),
        Err(err) => {
            // Solo los fallos de catálogo llegan aquí; las entradas fallidas
            // se reflejan en el recuento, no en el código de salida.
            tracing::error!("restore run aborted: {err}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<RunSummary> {
    let config = cli.into_config()?;

    let endpoints = DavEndpoints::new(&config.server.base_url, &config.server.username)?;
    let selector = ShardSelector::new(config.shard, config.total_shards)?;
    let range = IndexRange::new(config.range_from, config.range_to);

    let client: Arc<dyn DavClient> =
        Arc::new(ReqwestDavClient::new(&config.server, &config.http)?);
    let collector = TrashCollector::new(
        client.clone(),
        endpoints.clone(),
        config.cutoff,
        config.prefix.clone(),
    );
    let materializer = Arc::new(DestinationMaterializer::new(
        client.clone(),
        endpoints.clone(),
        config.retry.clone(),
    ));
    let executor = RestoreExecutor::new(client, endpoints, materializer.clone(), config.retry);

    let service = RestoreService::new(collector, materializer, executor, selector, range);
    service.run().await
}

fn print_summary(summary: &RunSummary, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        println!(
            "Done: {} ok ({} restored, {} already present), {} failed, {} total",
            summary.ok(),
            summary.restored,
            summary.already_present,
            summary.failed,
            summary.total
        );
    }
}

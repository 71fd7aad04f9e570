// Exportar los módulos principales del proyecto
pub mod common;
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod interfaces;

// Re-exportaciones públicas comunes
pub use application::ports::dav_ports::DavClient;
pub use application::ports::restore_ports::RestoreUseCase;
pub use application::services::restore_service::RestoreService;
pub use application::services::trash_collector::TrashCollector;
pub use domain::services::endpoints::DavEndpoints;
pub use domain::services::restore_plan::{IndexRange, RestorePlan, ShardSelector};
pub use infrastructure::clients::dav_client::ReqwestDavClient;

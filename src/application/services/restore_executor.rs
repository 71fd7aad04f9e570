use std::sync::Arc;
use std::time::Duration;

use tracing::{instrument, warn};

use crate::application::ports::dav_ports::DavClient;
use crate::application::services::destination_service::DestinationMaterializer;
use crate::common::config::RetryConfig;
use crate::domain::entities::outcome::Outcome;
use crate::domain::entities::trash_entry::TrashEntry;
use crate::domain::services::endpoints::DavEndpoints;

/// Interpretación de un estado HTTP de MOVE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveClass {
    /// El objeto quedó en su destino
    Moved,
    /// El destino ya existe y el servidor rechazó sobrescribir
    AlreadyPresent,
    /// Conflicto o bloqueo: falta el padre o hay un lock transitorio
    RetryAfterMaterialize,
    /// Fallo transitorio aguas arriba
    RetryTransient,
    /// Cualquier otro estado: fallo definitivo, sin reintento
    Permanent,
}

pub fn classify_status(status: u16) -> MoveClass {
    match status {
        200..=299 => MoveClass::Moved,
        405 | 412 => MoveClass::AlreadyPresent,
        409 | 423 => MoveClass::RetryAfterMaterialize,
        502 | 503 => MoveClass::RetryTransient,
        _ => MoveClass::Permanent,
    }
}

/// Retardo entre intentos: crece linealmente con el número de intento
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    base * attempt
}

/// Mueve exactamente una entrada de la papelera a su destino, con reintentos
/// acotados sobre las clases de fallo transitorias.
pub struct RestoreExecutor {
    client: Arc<dyn DavClient>,
    endpoints: DavEndpoints,
    materializer: Arc<DestinationMaterializer>,
    retry: RetryConfig,
}

impl RestoreExecutor {
    pub fn new(
        client: Arc<dyn DavClient>,
        endpoints: DavEndpoints,
        materializer: Arc<DestinationMaterializer>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            client,
            endpoints,
            materializer,
            retry,
        }
    }

    /// MOVE con precondición de no sobrescritura. Agotar el presupuesto de
    /// intentos degrada a `Failed` con el último estado observado.
    #[instrument(skip(self, entry), fields(destination = %entry.destination_path))]
    pub async fn restore(&self, entry: &TrashEntry) -> Outcome {
        let source = self.endpoints.absolute(&entry.source_ref);
        let destination = self.endpoints.file_url(&entry.destination_path);

        let mut last_status: Option<u16> = None;
        for attempt in 1..=self.retry.max_attempts {
            match self.client.move_resource(&source, &destination, false).await {
                Ok(status) => {
                    last_status = Some(status);
                    match classify_status(status) {
                        MoveClass::Moved => return Outcome::Restored,
                        MoveClass::AlreadyPresent => return Outcome::AlreadyPresent,
                        MoveClass::RetryAfterMaterialize => {
                            warn!(status, attempt, "MOVE conflict, re-materializing parent");
                            // El conflicto suele significar padre ausente; si
                            // tampoco se puede crear, el propio MOVE agotará
                            // el presupuesto.
                            if let Err(err) = self
                                .materializer
                                .ensure_ancestors(&entry.destination_path)
                                .await
                            {
                                warn!(error = %err, "parent re-materialization failed");
                            }
                        }
                        MoveClass::RetryTransient => {
                            warn!(status, attempt, "transient upstream failure");
                        }
                        MoveClass::Permanent => return Outcome::Failed(Some(status)),
                    }
                }
                Err(err) => {
                    warn!(error = %err, attempt, "MOVE transport failure");
                }
            }
            if attempt < self.retry.max_attempts {
                tokio::time::sleep(backoff_delay(attempt, self.retry.base_delay())).await;
            }
        }
        Outcome::Failed(last_status)
    }
}

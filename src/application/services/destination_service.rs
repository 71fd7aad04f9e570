use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::ports::dav_ports::{DavClient, Depth};
use crate::application::services::restore_executor::backoff_delay;
use crate::common::config::RetryConfig;
use crate::common::errors::{Result, RestoreError};
use crate::domain::services::endpoints::DavEndpoints;

/// Sonda de existencia mínima a profundidad 0
const PROBE_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:"><d:prop><d:resourcetype/></d:prop></d:propfind>"#;

/// Garantiza que todos los directorios ancestros de una ruta destino existen
/// antes de mover la entrada, creándolos de raíz a hoja.
pub struct DestinationMaterializer {
    client: Arc<dyn DavClient>,
    endpoints: DavEndpoints,
    retry: RetryConfig,
}

impl DestinationMaterializer {
    pub fn new(client: Arc<dyn DavClient>, endpoints: DavEndpoints, retry: RetryConfig) -> Self {
        Self {
            client,
            endpoints,
            retry,
        }
    }

    /// Crea los ancestros que falten, de raíz a hoja, excluyendo el último
    /// segmento (la propia entrada). Idempotente: repetirla sobre una ruta ya
    /// materializada no emite creaciones.
    #[instrument(skip(self))]
    pub async fn ensure_ancestors(&self, destination_path: &str) -> Result<()> {
        for prefix in ancestor_prefixes(destination_path) {
            self.ensure_collection(&prefix).await?;
        }
        Ok(())
    }

    async fn ensure_collection(&self, relative_path: &str) -> Result<()> {
        let url = self.endpoints.file_url(relative_path);

        // Un fallo de la sonda no es concluyente; se resuelve intentando crear
        if let Ok(probe) = self.client.propfind(&url, Depth::Resource, PROBE_BODY).await {
            if probe.is_success() {
                return Ok(());
            }
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.client.mkcol(&url).await {
                Ok(status) if (200..300).contains(&status) => {
                    debug!(path = relative_path, "collection created");
                    return Ok(());
                }
                // Ya existe o redirección: otro worker pudo crearla antes
                Ok(405 | 301 | 302) => return Ok(()),
                Ok(status @ (409 | 423)) if attempt < self.retry.max_attempts => {
                    warn!(path = relative_path, status, attempt, "MKCOL conflict, retrying");
                    tokio::time::sleep(backoff_delay(attempt, self.retry.base_delay())).await;
                }
                Ok(status) => {
                    return Err(RestoreError::materialization(
                        "Mkcol",
                        format!("could not create {relative_path}: HTTP {status}"),
                    ));
                }
                Err(err) if attempt < self.retry.max_attempts => {
                    warn!(path = relative_path, error = %err, attempt, "MKCOL transport failure, retrying");
                    tokio::time::sleep(backoff_delay(attempt, self.retry.base_delay())).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Prefijos ancestros de una ruta, de raíz a hoja, sin el segmento final.
/// `"a/b/c.txt"` produce `["a", "a/b"]`.
pub fn ancestor_prefixes(path: &str) -> Vec<String> {
    let segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    let mut prefixes = Vec::new();
    for end in 1..segments.len() {
        prefixes.push(segments[..end].join("/"));
    }
    prefixes
}

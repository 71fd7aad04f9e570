use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use crate::application::ports::dav_ports::{DavClient, Depth};
use crate::common::errors::{Result, RestoreError};
use crate::domain::entities::trash_entry::{EntryKind, TrashEntry};
use crate::domain::services::endpoints::DavEndpoints;
use crate::infrastructure::clients::multistatus::{parse_multistatus, DavResource};

/// Propiedades de papelera solicitadas al servidor
pub const TRASH_PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
  <d:prop>
    <oc:trashbin-original-filename/>
    <oc:trashbin-original-location/>
    <oc:trashbin-delete-datetime/>
    <d:getcontentlength/>
    <d:resourcetype/>
  </d:prop>
</d:propfind>"#;

/// Recolecta el catálogo de entradas elegibles de la papelera de la cuenta:
/// consulta a profundidad 1, filtro por fecha de corte y por prefijo opcional.
pub struct TrashCollector {
    client: Arc<dyn DavClient>,
    endpoints: DavEndpoints,
    cutoff: DateTime<Utc>,
    prefix: Option<String>,
}

impl TrashCollector {
    pub fn new(
        client: Arc<dyn DavClient>,
        endpoints: DavEndpoints,
        cutoff: DateTime<Utc>,
        prefix: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoints,
            cutoff,
            prefix,
        }
    }

    /// Devuelve la lista (sin ordenar) de entradas a restaurar. Un estado no
    /// exitoso o una respuesta ilegible abortan la ejecución completa.
    #[instrument(skip(self))]
    pub async fn collect(&self) -> Result<Vec<TrashEntry>> {
        let trash_root = self.endpoints.trash_root();
        let response = self
            .client
            .propfind(&trash_root, Depth::Children, TRASH_PROPFIND_BODY)
            .await?;
        if !response.is_success() {
            return Err(RestoreError::discovery(
                "Propfind",
                format!("trash query against {trash_root} returned HTTP {}", response.status),
            ));
        }

        let resources = parse_multistatus(&response.body)?;

        let mut entries = Vec::new();
        // El primer recurso es la propia raíz de la papelera; no lleva
        // metadatos de ubicación original y se descarta.
        for resource in resources.into_iter().skip(1) {
            if let Some(entry) = self.to_entry(resource) {
                entries.push(entry);
            }
        }
        debug!(eligible = entries.len(), "trash catalog collected");
        Ok(entries)
    }

    /// Convierte un recurso en entrada, aplicando los filtros. `None` cuando
    /// el recurso no es elegible.
    fn to_entry(&self, resource: DavResource) -> Option<TrashEntry> {
        let Some(location) = resource.original_location.as_deref() else {
            warn!(href = %resource.href, "skipping trash item without original location");
            return None;
        };
        let Some(raw_deleted_at) = resource.deleted_at.as_deref() else {
            warn!(href = %resource.href, "skipping trash item without delete timestamp");
            return None;
        };
        let Some(deleted_at) = parse_deleted_at(raw_deleted_at) else {
            warn!(
                href = %resource.href,
                raw = raw_deleted_at,
                "skipping trash item with unreadable delete timestamp"
            );
            return None;
        };

        // Solo entran las borradas en o después del corte
        if deleted_at < self.cutoff {
            return None;
        }

        let kind = if resource.is_collection {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let display_name = resource
            .original_filename
            .unwrap_or_else(|| location.to_string());

        let entry = match TrashEntry::new(
            strip_origin(&resource.href),
            location,
            kind,
            deleted_at,
            display_name,
        ) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(href = %resource.href, error = %err, "skipping malformed trash item");
                return None;
            }
        };

        if let Some(prefix) = self.prefix.as_deref() {
            if !entry.destination_path.starts_with(prefix) {
                return None;
            }
        }
        Some(entry)
    }
}

/// El servidor emite la fecha de borrado en formato RFC 2822; se acepta
/// RFC 3339 como alternativa.
fn parse_deleted_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|instant| instant.with_timezone(&Utc))
        .ok()
}

/// Reduce un href absoluto a su ruta con raíz en el servidor
fn strip_origin(href: &str) -> String {
    let stripped = href
        .strip_prefix("https://")
        .or_else(|| href.strip_prefix("http://"));
    match stripped {
        Some(rest) => match rest.find('/') {
            Some(slash) => rest[slash..].to_string(),
            None => "/".to_string(),
        },
        None => href.to_string(),
    }
}

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::common::errors::{Result, RestoreError};

/// Codifica igual que rawurlencode: todo salvo caracteres no reservados
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Construcción de URLs del servidor para una cuenta concreta.
///
/// Las rutas de papelera y de archivos vivos son una convención del servidor
/// (remote.php/dav), tratada aquí como contrato externo.
#[derive(Debug, Clone)]
pub struct DavEndpoints {
    base: String,
    username: String,
}

impl DavEndpoints {
    pub fn new(base_url: &str, username: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| {
            RestoreError::invalid_input("Endpoints", format!("invalid server URL: {base_url}"))
                .with_source(e)
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(RestoreError::invalid_input(
                "Endpoints",
                format!("unsupported URL scheme: {}", parsed.scheme()),
            ));
        }
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
        })
    }

    /// Raíz de la papelera de la cuenta
    pub fn trash_root(&self) -> String {
        format!(
            "{}/remote.php/dav/trash-bin/{}",
            self.base,
            encode_segment(&self.username)
        )
    }

    /// URL de un destino relativo bajo la raíz de archivos vivos de la cuenta
    pub fn file_url(&self, relative_path: &str) -> String {
        format!(
            "{}/remote.php/dav/files/{}/{}",
            self.base,
            encode_segment(&self.username),
            encode_path(relative_path)
        )
    }

    /// Convierte un href con raíz en el servidor en una URL absoluta
    pub fn absolute(&self, server_rooted_path: &str) -> String {
        format!("{}{}", self.base, server_rooted_path)
    }
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Codifica cada segmento por separado, conservando los separadores
fn encode_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Method;
use tracing::{debug, warn};

use crate::application::ports::dav_ports::{DavClient, DavResponse, Depth};
use crate::common::config::{HttpConfig, ServerConfig};
use crate::common::errors::{Result, RestoreError};

/// Cliente WebDAV sobre reqwest. Posee una única conexión reutilizable
/// durante toda la ejecución; las credenciales se fijan en la construcción y
/// se adjuntan a cada petición.
pub struct ReqwestDavClient {
    http: reqwest::Client,
    username: String,
    password: String,
}

impl ReqwestDavClient {
    pub fn new(server: &ServerConfig, http: &HttpConfig) -> Result<Self> {
        if !http.verify_tls {
            // Solo bajo petición explícita; el valor por defecto verifica
            warn!("TLS certificate verification is DISABLED for this run");
        }
        let client = reqwest::Client::builder()
            .timeout(http.timeout())
            .danger_accept_invalid_certs(!http.verify_tls)
            .build()
            .map_err(|e| {
                RestoreError::internal("HttpClient", "could not build the HTTP client")
                    .with_source(e)
            })?;
        Ok(Self {
            http: client,
            username: server.username.clone(),
            password: server.password.clone(),
        })
    }

    fn request(&self, method: &str, url: &str) -> Result<reqwest::RequestBuilder> {
        let method = Method::from_bytes(method.as_bytes()).map_err(|e| {
            RestoreError::internal("HttpClient", format!("invalid method {method}"))
                .with_source(e)
        })?;
        Ok(self
            .http
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password)))
    }
}

fn transport_error(operation: &'static str, err: reqwest::Error) -> RestoreError {
    RestoreError::transport(operation, format!("{operation} request failed: {err}"))
        .with_source(err)
}

#[async_trait]
impl DavClient for ReqwestDavClient {
    async fn propfind(&self, url: &str, depth: Depth, body: &str) -> Result<DavResponse> {
        let response = self
            .request("PROPFIND", url)?
            .header("Depth", depth.header_value())
            .header(CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| transport_error("Propfind", e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error("Propfind", e))?;
        debug!(url, status, "PROPFIND");
        Ok(DavResponse { status, body })
    }

    async fn mkcol(&self, url: &str) -> Result<u16> {
        let response = self
            .request("MKCOL", url)?
            .header(CONTENT_LENGTH, "0")
            .send()
            .await
            .map_err(|e| transport_error("Mkcol", e))?;
        let status = response.status().as_u16();
        debug!(url, status, "MKCOL");
        Ok(status)
    }

    async fn move_resource(
        &self,
        source_url: &str,
        destination_url: &str,
        overwrite: bool,
    ) -> Result<u16> {
        let response = self
            .request("MOVE", source_url)?
            .header("Destination", destination_url)
            .header("Overwrite", if overwrite { "T" } else { "F" })
            .send()
            .await
            .map_err(|e| transport_error("Move", e))?;
        let status = response.status().as_u16();
        debug!(source = source_url, destination = destination_url, status, "MOVE");
        Ok(status)
    }
}

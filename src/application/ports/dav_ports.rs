use async_trait::async_trait;

use crate::common::errors::Result;

/// Traversal depth of a metadata query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Probe exactly the addressed resource
    Resource,
    /// List the resource and its immediate children
    Children,
}

impl Depth {
    pub fn header_value(&self) -> &'static str {
        match self {
            Depth::Resource => "0",
            Depth::Children => "1",
        }
    }
}

/// Status and body of a metadata query.
#[derive(Debug, Clone)]
pub struct DavResponse {
    pub status: u16,
    pub body: String,
}

impl DavResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Port for the WebDAV operations this tool needs. Non-2xx statuses are
/// returned in `Ok`; only transport-level failure surfaces as `Err`.
#[async_trait]
pub trait DavClient: Send + Sync {
    /// Metadata query (PROPFIND) at the given depth
    async fn propfind(&self, url: &str, depth: Depth, body: &str) -> Result<DavResponse>;

    /// Collection creation (MKCOL); must tolerate existing collections
    async fn mkcol(&self, url: &str) -> Result<u16>;

    /// Relocation (MOVE); with `overwrite` false the server refuses to
    /// replace an existing destination
    async fn move_resource(
        &self,
        source_url: &str,
        destination_url: &str,
        overwrite: bool,
    ) -> Result<u16>;
}

use std::collections::HashSet;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::ports::dav_ports::{DavClient, DavResponse, Depth};
use crate::common::errors::{Result, RestoreError};

/// Scripted outcome for one MKCOL or MOVE call
enum Scripted {
    Status(u16),
    Transport,
}

/// Mock DAV client for testing: scripted per-call statuses, recorded calls,
/// and a URL set backing the depth-0 existence probe.
#[derive(Default)]
struct MockDavClient {
    propfind_response: Mutex<Option<DavResponse>>,
    existing_urls: Mutex<HashSet<String>>,
    mkcol_script: Mutex<VecDeque<Scripted>>,
    mkcol_calls: Mutex<Vec<String>>,
    move_script: Mutex<VecDeque<Scripted>>,
    move_calls: Mutex<Vec<(String, String)>>,
}

impl MockDavClient {
    fn new() -> Self {
        Self::default()
    }

    fn with_catalog(xml: &str) -> Self {
        let mock = Self::default();
        *mock.propfind_response.lock().unwrap() = Some(DavResponse {
            status: 207,
            body: xml.to_string(),
        });
        mock
    }

    fn script_moves(&self, steps: Vec<Scripted>) {
        *self.move_script.lock().unwrap() = steps.into();
    }

    fn script_mkcols(&self, steps: Vec<Scripted>) {
        *self.mkcol_script.lock().unwrap() = steps.into();
    }

    fn move_count(&self) -> usize {
        self.move_calls.lock().unwrap().len()
    }

    fn mkcol_paths(&self) -> Vec<String> {
        self.mkcol_calls.lock().unwrap().clone()
    }

    fn transport_error() -> RestoreError {
        RestoreError::transport("Mock", "connection refused")
    }
}

#[async_trait]
impl DavClient for MockDavClient {
    async fn propfind(&self, url: &str, depth: Depth, _body: &str) -> Result<DavResponse> {
        match depth {
            Depth::Children => Ok(self
                .propfind_response
                .lock()
                .unwrap()
                .clone()
                .unwrap_or(DavResponse {
                    status: 500,
                    body: String::new(),
                })),
            Depth::Resource => {
                let exists = self.existing_urls.lock().unwrap().contains(url);
                Ok(DavResponse {
                    status: if exists { 207 } else { 404 },
                    body: String::new(),
                })
            }
        }
    }

    async fn mkcol(&self, url: &str) -> Result<u16> {
        self.mkcol_calls.lock().unwrap().push(url.to_string());
        match self.mkcol_script.lock().unwrap().pop_front() {
            Some(Scripted::Status(status)) => Ok(status),
            Some(Scripted::Transport) => Err(Self::transport_error()),
            None => {
                // Unscripted MKCOL succeeds and the collection exists from now on
                self.existing_urls.lock().unwrap().insert(url.to_string());
                Ok(201)
            }
        }
    }

    async fn move_resource(
        &self,
        source_url: &str,
        destination_url: &str,
        overwrite: bool,
    ) -> Result<u16> {
        assert!(!overwrite, "restore must never overwrite destinations");
        self.move_calls
            .lock()
            .unwrap()
            .push((source_url.to_string(), destination_url.to_string()));
        match self.move_script.lock().unwrap().pop_front() {
            Some(Scripted::Status(status)) => Ok(status),
            Some(Scripted::Transport) => Err(Self::transport_error()),
            None => Ok(201),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::restore_ports::RestoreUseCase;
    use crate::application::services::destination_service::DestinationMaterializer;
    use crate::application::services::restore_executor::RestoreExecutor;
    use crate::application::services::restore_service::RestoreService;
    use crate::application::services::trash_collector::TrashCollector;
    use crate::common::config::RetryConfig;
    use crate::domain::entities::outcome::Outcome;
    use crate::domain::entities::trash_entry::{EntryKind, TrashEntry};
    use crate::domain::services::endpoints::DavEndpoints;
    use crate::domain::services::restore_plan::{IndexRange, ShardSelector};
    use chrono::{TimeZone, Utc};

    fn endpoints() -> DavEndpoints {
        DavEndpoints::new("https://cloud.example.org", "admin").unwrap()
    }

    /// Zero backoff so retry tests run instantly
    fn test_retry() -> RetryConfig {
        RetryConfig {
            max_attempts: 4,
            base_delay_ms: 0,
        }
    }

    fn executor(client: Arc<MockDavClient>) -> RestoreExecutor {
        let materializer = Arc::new(DestinationMaterializer::new(
            client.clone(),
            endpoints(),
            test_retry(),
        ));
        RestoreExecutor::new(client, endpoints(), materializer, test_retry())
    }

    fn entry(destination: &str, kind: EntryKind) -> TrashEntry {
        TrashEntry::new(
            format!("/remote.php/dav/trash-bin/admin/{}", destination.len()),
            destination,
            kind,
            Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap(),
            destination.to_string(),
        )
        .unwrap()
    }

    fn catalog_xml(items: &[(&str, &str, bool)]) -> String {
        let mut body = String::from(
            r#"<?xml version="1.0"?>
<d:multistatus xmlns:d="DAV:" xmlns:oc="http://owncloud.org/ns">
  <d:response>
    <d:href>/remote.php/dav/trash-bin/admin/</d:href>
    <d:propstat>
      <d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
"#,
        );
        for (i, (location, deleted_at, is_dir)) in items.iter().enumerate() {
            let resourcetype = if *is_dir {
                "<d:resourcetype><d:collection/></d:resourcetype>"
            } else {
                "<d:resourcetype/>"
            };
            body.push_str(&format!(
                r#"  <d:response>
    <d:href>/remote.php/dav/trash-bin/admin/{i}</d:href>
    <d:propstat>
      <d:prop>
        <oc:trashbin-original-filename>item{i}</oc:trashbin-original-filename>
        <oc:trashbin-original-location>{location}</oc:trashbin-original-location>
        <oc:trashbin-delete-datetime>{deleted_at}</oc:trashbin-delete-datetime>
        {resourcetype}
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
"#
            ));
        }
        body.push_str("</d:multistatus>");
        body
    }

    #[tokio::test]
    async fn conflict_twice_then_created_yields_restored_after_three_attempts() {
        let client = Arc::new(MockDavClient::new());
        client.script_moves(vec![
            Scripted::Status(409),
            Scripted::Status(409),
            Scripted::Status(201),
        ]);

        let outcome = executor(client.clone())
            .restore(&entry("A/b.txt", EntryKind::File))
            .await;

        assert_eq!(outcome, Outcome::Restored);
        assert_eq!(client.move_count(), 3);
    }

    #[tokio::test]
    async fn precondition_failed_yields_already_present_without_retry() {
        let client = Arc::new(MockDavClient::new());
        client.script_moves(vec![Scripted::Status(412)]);

        let outcome = executor(client.clone())
            .restore(&entry("A/b.txt", EntryKind::File))
            .await;

        assert_eq!(outcome, Outcome::AlreadyPresent);
        assert_eq!(client.move_count(), 1);
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let client = Arc::new(MockDavClient::new());
        client.script_moves(vec![Scripted::Status(403)]);

        let outcome = executor(client.clone())
            .restore(&entry("A/b.txt", EntryKind::File))
            .await;

        assert_eq!(outcome, Outcome::Failed(Some(403)));
        assert_eq!(client.move_count(), 1);
    }

    #[tokio::test]
    async fn transport_failures_consume_the_same_attempt_budget() {
        let client = Arc::new(MockDavClient::new());
        client.script_moves(vec![Scripted::Transport, Scripted::Status(201)]);

        let outcome = executor(client.clone())
            .restore(&entry("A/b.txt", EntryKind::File))
            .await;

        assert_eq!(outcome, Outcome::Restored);
        assert_eq!(client.move_count(), 2);
    }

    #[tokio::test]
    async fn exhausting_the_budget_records_the_last_observed_status() {
        let client = Arc::new(MockDavClient::new());
        client.script_moves(vec![
            Scripted::Status(423),
            Scripted::Status(423),
            Scripted::Status(423),
            Scripted::Status(423),
        ]);

        let outcome = executor(client.clone())
            .restore(&entry("A/b.txt", EntryKind::File))
            .await;

        assert_eq!(outcome, Outcome::Failed(Some(423)));
        assert_eq!(client.move_count(), 4);
    }

    #[tokio::test]
    async fn materializer_creates_missing_ancestors_root_to_leaf() {
        let client = Arc::new(MockDavClient::new());
        let materializer =
            DestinationMaterializer::new(client.clone(), endpoints(), test_retry());

        materializer.ensure_ancestors("a/b/c.txt").await.unwrap();

        assert_eq!(
            client.mkcol_paths(),
            vec![
                "https://cloud.example.org/remote.php/dav/files/admin/a",
                "https://cloud.example.org/remote.php/dav/files/admin/a/b",
            ]
        );
    }

    #[tokio::test]
    async fn materializer_is_idempotent() {
        let client = Arc::new(MockDavClient::new());
        let materializer =
            DestinationMaterializer::new(client.clone(), endpoints(), test_retry());

        materializer.ensure_ancestors("a/b/c.txt").await.unwrap();
        let creations_after_first_run = client.mkcol_paths().len();
        materializer.ensure_ancestors("a/b/c.txt").await.unwrap();

        // The second walk finds every ancestor via the probe and creates nothing
        assert_eq!(client.mkcol_paths().len(), creations_after_first_run);
    }

    #[tokio::test]
    async fn materializer_treats_method_not_allowed_as_existing() {
        let client = Arc::new(MockDavClient::new());
        client.script_mkcols(vec![Scripted::Status(405)]);
        let materializer =
            DestinationMaterializer::new(client.clone(), endpoints(), test_retry());

        assert!(materializer.ensure_ancestors("a/x.txt").await.is_ok());
    }

    #[tokio::test]
    async fn materializer_gives_up_on_permanent_mkcol_failure() {
        let client = Arc::new(MockDavClient::new());
        client.script_mkcols(vec![Scripted::Status(403)]);
        let materializer =
            DestinationMaterializer::new(client.clone(), endpoints(), test_retry());

        let err = materializer.ensure_ancestors("a/x.txt").await.unwrap_err();
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn collector_applies_the_cutoff_inclusively_and_skips_the_root() {
        let xml = catalog_xml(&[
            ("old.txt", "Sun, 01 Jun 2025 09:59:59 GMT", false),
            ("boundary.txt", "Mon, 02 Jun 2025 10:00:00 GMT", false),
            ("recent.txt", "Tue, 03 Jun 2025 12:00:00 GMT", false),
        ]);
        let client = Arc::new(MockDavClient::with_catalog(&xml));
        let cutoff = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();
        let collector = TrashCollector::new(client, endpoints(), cutoff, None);

        let entries = collector.collect().await.unwrap();
        let destinations: Vec<&str> =
            entries.iter().map(|e| e.destination_path.as_str()).collect();
        assert_eq!(destinations, vec!["boundary.txt", "recent.txt"]);
    }

    #[tokio::test]
    async fn collector_skips_items_without_required_metadata() {
        // Second item carries no original-location property
        let xml = catalog_xml(&[("keep.txt", "Tue, 03 Jun 2025 12:00:00 GMT", false)]).replace(
            "</d:multistatus>",
            r#"  <d:response>
    <d:href>/remote.php/dav/trash-bin/admin/99</d:href>
    <d:propstat>
      <d:prop>
        <oc:trashbin-original-filename>orphan</oc:trashbin-original-filename>
        <oc:trashbin-delete-datetime>Tue, 03 Jun 2025 12:00:00 GMT</oc:trashbin-delete-datetime>
        <d:resourcetype/>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#,
        );
        let client = Arc::new(MockDavClient::with_catalog(&xml));
        let cutoff = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let collector = TrashCollector::new(client, endpoints(), cutoff, None);

        let entries = collector.collect().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].destination_path, "keep.txt");
    }

    #[tokio::test]
    async fn collector_honors_the_destination_prefix_filter() {
        let xml = catalog_xml(&[
            ("Projects/a.txt", "Tue, 03 Jun 2025 12:00:00 GMT", false),
            ("Music/b.mp3", "Tue, 03 Jun 2025 12:00:00 GMT", false),
        ]);
        let client = Arc::new(MockDavClient::with_catalog(&xml));
        let cutoff = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let collector = TrashCollector::new(
            client,
            endpoints(),
            cutoff,
            Some("Projects/".to_string()),
        );

        let entries = collector.collect().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].destination_path, "Projects/a.txt");
    }

    #[tokio::test]
    async fn collector_fails_the_run_on_a_bad_discovery_status() {
        let client = Arc::new(MockDavClient::new());
        *client.propfind_response.lock().unwrap() = Some(DavResponse {
            status: 401,
            body: String::new(),
        });
        let cutoff = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let collector = TrashCollector::new(client, endpoints(), cutoff, None);

        let err = collector.collect().await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn full_run_restores_directories_before_files_and_tallies_outcomes() {
        let xml = catalog_xml(&[
            ("A/b.txt", "Tue, 03 Jun 2025 12:00:00 GMT", false),
            ("A", "Tue, 03 Jun 2025 12:00:00 GMT", true),
            ("C/d.txt", "Tue, 03 Jun 2025 12:00:00 GMT", false),
        ]);
        let client = Arc::new(MockDavClient::with_catalog(&xml));
        let cutoff = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        let dav: Arc<MockDavClient> = client.clone();
        let collector = TrashCollector::new(dav.clone(), endpoints(), cutoff, None);
        let materializer = Arc::new(DestinationMaterializer::new(
            dav.clone(),
            endpoints(),
            test_retry(),
        ));
        let executor =
            RestoreExecutor::new(dav, endpoints(), materializer.clone(), test_retry());
        let service = RestoreService::new(
            collector,
            materializer,
            executor,
            ShardSelector::single(),
            IndexRange::full(),
        );

        let summary = service.run().await.unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.restored, 3);
        assert_eq!(summary.failed, 0);

        let moves = client.move_calls.lock().unwrap().clone();
        let destinations: Vec<&str> = moves.iter().map(|(_, dst)| dst.as_str()).collect();
        assert_eq!(
            destinations,
            vec![
                "https://cloud.example.org/remote.php/dav/files/admin/A",
                "https://cloud.example.org/remote.php/dav/files/admin/A/b.txt",
                "https://cloud.example.org/remote.php/dav/files/admin/C/d.txt",
            ]
        );
    }
}

use crate::snapshot::error::FetchError;
use crate::types::freshness::Freshness;
use chrono::{DateTime, Utc};
use log::{info, warn};
use reqwest::Client;
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::{fs, task};

pub const STATIONS_SNAPSHOT: &str = "stations.json";
pub const SENSORS_SNAPSHOT: &str = "sensors.json";
pub const MEASUREMENTS_SNAPSHOT: &str = "measurements.json";

/// A decoded JSON payload together with where it came from.
#[derive(Debug, Clone)]
pub struct Payload {
    pub value: Value,
    pub freshness: Freshness,
}

/// Downloads JSON payloads and keeps the last good one of each kind on disk.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    cache_dir: PathBuf,
    download_client: Client,
}

impl SnapshotLoader {
    pub fn new(cache_dir: &Path, download_client: Client) -> SnapshotLoader {
        SnapshotLoader {
            cache_dir: cache_dir.to_path_buf(),
            download_client,
        }
    }

    pub fn snapshot_path(&self, snapshot_name: &str) -> PathBuf {
        self.cache_dir.join(snapshot_name)
    }

    /// Fetches `url` and stores the body verbatim as the snapshot `snapshot_name`.
    /// If the network call fails in any way, the last stored snapshot is returned
    /// instead, tagged [`Freshness::Stale`].
    ///
    /// Only fails when the download fails *and* no snapshot exists (or the snapshot
    /// cannot be read). Nothing is retried.
    pub async fn fetch_or_fallback(
        &self,
        url: &str,
        snapshot_name: &str,
    ) -> Result<Payload, FetchError> {
        let snapshot_path = self.snapshot_path(snapshot_name);

        match self.download(url).await {
            Ok((bytes, value)) => {
                let size = bytes.len();
                Self::write_snapshot(bytes, &snapshot_path).await?;
                info!(
                    "Fetched {} ({} bytes), snapshot stored at {:?}",
                    url, size, snapshot_path
                );
                Ok(Payload {
                    value,
                    freshness: Freshness::Live,
                })
            }
            Err(e) => {
                warn!(
                    "Download from {} failed: {}. Loading last snapshot {:?}",
                    url, e, snapshot_path
                );
                Self::read_snapshot(&snapshot_path, e).await
            }
        }
    }

    async fn download(&self, url: &str) -> Result<(Vec<u8>, Value), FetchError> {
        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;
        let value = serde_json::from_slice::<Value>(&bytes)
            .map_err(|e| FetchError::JsonParse(url.to_string(), e))?;
        Ok((bytes.to_vec(), value))
    }

    /// Replaces the snapshot atomically: write a temp file next to it, then rename.
    async fn write_snapshot(bytes: Vec<u8>, path: &Path) -> Result<(), FetchError> {
        let path_buf = path.to_path_buf();
        task::spawn_blocking(move || {
            let dir = path_buf.parent().unwrap_or_else(|| Path::new("."));
            let mut temp_file = NamedTempFile::new_in(dir)
                .map_err(|e| FetchError::SnapshotWrite(path_buf.clone(), e))?;
            temp_file
                .write_all(&bytes)
                .map_err(|e| FetchError::SnapshotWrite(path_buf.clone(), e))?;
            temp_file
                .flush()
                .map_err(|e| FetchError::SnapshotWrite(path_buf.clone(), e))?;
            temp_file
                .persist(&path_buf)
                .map_err(|e| FetchError::SnapshotWrite(path_buf.clone(), e.error))?;
            Ok::<(), FetchError>(())
        })
        .await??;
        Ok(())
    }

    async fn read_snapshot(path: &Path, cause: FetchError) -> Result<Payload, FetchError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FetchError::SnapshotMissing {
                    path: path.to_path_buf(),
                    source: Box::new(cause),
                });
            }
            Err(e) => return Err(FetchError::SnapshotRead(path.to_path_buf(), e)),
        };

        let modified = fs::metadata(path)
            .await
            .and_then(|metadata| metadata.modified())
            .map_err(|e| FetchError::SnapshotRead(path.to_path_buf(), e))?;

        let value = serde_json::from_slice::<Value>(&bytes)
            .map_err(|e| FetchError::SnapshotDecode(path.to_path_buf(), e))?;

        Ok(Payload {
            value,
            freshness: Freshness::Stale {
                snapshot_taken: DateTime::<Utc>::from(modified),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BODY: &str = r#"[{"id":1,"stationName":"Station 1"}]"#;

    fn loader(dir: &TempDir) -> SnapshotLoader {
        SnapshotLoader::new(dir.path(), Client::new())
    }

    #[tokio::test]
    async fn test_live_fetch_writes_snapshot_verbatim() -> Result<(), FetchError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/station/findAll"))
            .respond_with(ResponseTemplate::new(200).set_body_string(BODY))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let loader = loader(&dir);
        let url = format!("{}/station/findAll", server.uri());

        let payload = loader.fetch_or_fallback(&url, STATIONS_SNAPSHOT).await?;

        assert_eq!(payload.freshness, Freshness::Live);
        assert_eq!(payload.value, json!([{"id": 1, "stationName": "Station 1"}]));
        let on_disk = std::fs::read_to_string(dir.path().join(STATIONS_SNAPSHOT)).unwrap();
        assert_eq!(on_disk, BODY);
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_snapshot() -> Result<(), FetchError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SENSORS_SNAPSHOT), r#"[{"id": 50}]"#).unwrap();
        let loader = loader(&dir);

        let payload = loader
            .fetch_or_fallback(&format!("{}/station/sensors/11", server.uri()), SENSORS_SNAPSHOT)
            .await?;

        assert!(matches!(payload.freshness, Freshness::Stale { .. }));
        assert_eq!(payload.value, json!([{"id": 50}]));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_json_counts_as_network_failure() -> Result<(), FetchError> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(STATIONS_SNAPSHOT), "[]").unwrap();
        let loader = loader(&dir);

        let payload = loader
            .fetch_or_fallback(&format!("{}/station/findAll", server.uri()), STATIONS_SNAPSHOT)
            .await?;

        assert!(!payload.freshness.is_live());
        assert_eq!(payload.value, json!([]));
        // The broken body must not replace the snapshot.
        let on_disk = std::fs::read_to_string(dir.path().join(STATIONS_SNAPSHOT)).unwrap();
        assert_eq!(on_disk, "[]");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let loader = loader(&dir);

        let result = loader
            .fetch_or_fallback(&format!("{}/data/getData/50", server.uri()), MEASUREMENTS_SNAPSHOT)
            .await;

        match result {
            Err(FetchError::SnapshotMissing { path, source }) => {
                assert_eq!(path, dir.path().join(MEASUREMENTS_SNAPSHOT));
                assert!(source.is_network_failure());
            }
            other => panic!("Expected SnapshotMissing, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_falls_back() -> Result<(), FetchError> {
        // A dropped server either stops listening or is recycled without mocks.
        let url = {
            let server = MockServer::start().await;
            format!("{}/station/findAll", server.uri())
        };

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(STATIONS_SNAPSHOT), BODY).unwrap();

        let payload = loader(&dir).fetch_or_fallback(&url, STATIONS_SNAPSHOT).await?;
        assert!(!payload.freshness.is_live());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(STATIONS_SNAPSHOT), "{not json").unwrap();

        let result = loader(&dir)
            .fetch_or_fallback(&server.uri(), STATIONS_SNAPSHOT)
            .await;
        assert!(matches!(result, Err(FetchError::SnapshotDecode(..))));
    }
}

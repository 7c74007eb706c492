pub mod fetcher;

use crate::error::{Result, StudioError};
use crate::generation::sanitize;
use crate::models::GeneratedImage;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;

pub use fetcher::{HttpImageFetcher, ImageFetcher};

const PROMPT_FRAGMENT_CHARS: usize = 30;

/// Reports beyond this many unread ones are logged and dropped.
pub const DEFAULT_REPORT_CAPACITY: usize = 64;

/// `ai-generated-<first 30 prompt chars, sanitized>-<seed>.jpg`
pub fn file_name_for(image: &GeneratedImage) -> String {
    let fragment: String = image
        .original_prompt
        .chars()
        .take(PROMPT_FRAGMENT_CHARS)
        .collect();
    format!("ai-generated-{}-{}.jpg", sanitize(&fragment), image.seed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub seed: u32,
    pub file_name: String,
    pub outcome: std::result::Result<PathBuf, String>,
}

impl DownloadReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Saves generated images to disk. Every download runs as its own task and
/// reports back on a channel; downloads never touch the session.
#[derive(Clone)]
pub struct Downloader {
    fetcher: Arc<dyn ImageFetcher>,
    dir: PathBuf,
    reports_tx: mpsc::Sender<DownloadReport>,
    reports_rx: Arc<Mutex<Option<mpsc::Receiver<DownloadReport>>>>,
}

impl Downloader {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, dir: impl Into<PathBuf>) -> Self {
        Self::with_report_capacity(fetcher, dir, DEFAULT_REPORT_CAPACITY)
    }

    pub fn with_report_capacity(
        fetcher: Arc<dyn ImageFetcher>,
        dir: impl Into<PathBuf>,
        capacity: usize,
    ) -> Self {
        let (reports_tx, reports_rx) = mpsc::channel(capacity.max(1));
        Self {
            fetcher,
            dir: dir.into(),
            reports_tx,
            reports_rx: Arc::new(Mutex::new(Some(reports_rx))),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Hands out the report stream. Only the first caller gets it. Until it is
    /// claimed at most the channel capacity of reports is kept; later ones are
    /// logged and dropped.
    pub fn reports(&self) -> Option<ReceiverStream<DownloadReport>> {
        self.reports_rx
            .lock()
            .ok()
            .and_then(|mut rx| rx.take())
            .map(ReceiverStream::new)
    }

    /// Fetches and saves in place, returning the written path.
    pub async fn download(&self, image: &GeneratedImage) -> Result<PathBuf> {
        let bytes = self.fetcher.fetch(&image.address).await?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name_for(image));
        tokio::fs::write(&path, &bytes).await?;

        log::info!("💾 Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Starts a download in the background; the result arrives on `reports()`.
    /// Fails with `ConfigError` when no Tokio runtime is running.
    pub fn spawn(&self, image: GeneratedImage) -> Result<JoinHandle<()>> {
        let runtime = Handle::try_current().map_err(|e| {
            StudioError::ConfigError(format!("downloads need a Tokio runtime: {}", e))
        })?;
        let downloader = self.clone();
        Ok(runtime.spawn(async move {
            let outcome = downloader.download(&image).await.map_err(|e| {
                log::error!("Download of seed {} failed: {}", image.seed, e);
                e.to_string()
            });
            let report = DownloadReport {
                seed: image.seed,
                file_name: file_name_for(&image),
                outcome,
            };
            match downloader.reports_tx.try_send(report) {
                Ok(()) => {}
                Err(TrySendError::Full(report)) => {
                    log::warn!("Report queue full, dropping report for {}", report.file_name);
                }
                // Nobody listening is fine.
                Err(TrySendError::Closed(_)) => {}
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Quality, Resolution, Style};
    use async_trait::async_trait;
    use futures::{FutureExt, StreamExt};
    use std::collections::HashMap;

    struct FakeFetcher {
        bodies: HashMap<String, Vec<u8>>,
    }

    #[async_trait]
    impl ImageFetcher for FakeFetcher {
        async fn fetch(&self, address: &str) -> Result<Vec<u8>> {
            self.bodies
                .get(address)
                .cloned()
                .ok_or_else(|| StudioError::ResponseError("Image service returned 404".into()))
        }
    }

    fn image(prompt: &str, seed: u32) -> GeneratedImage {
        GeneratedImage {
            address: format!("https://img.test/prompt/x?seed={}", seed),
            original_prompt: prompt.to_string(),
            style: Style::Realistic,
            resolution: Resolution::Square,
            quality: Quality::Standard,
            seed,
            width: 1024,
            height: 1024,
        }
    }

    #[test]
    fn test_file_name_uses_first_thirty_chars() {
        let name = file_name_for(&image(
            "A majestic dragon flying over snowy mountains at sunrise",
            77,
        ));
        assert_eq!(name, "ai-generated-a-majestic-dragon-flying-over-77.jpg");
    }

    #[test]
    fn test_file_name_tolerates_empty_stem() {
        assert_eq!(file_name_for(&image("!!!", 5)), "ai-generated--5.jpg");
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let ok = image("red fox", 1);
        let fetcher = FakeFetcher {
            bodies: HashMap::from([(ok.address.clone(), b"jpeg-bytes".to_vec())]),
        };
        let downloader = Downloader::new(Arc::new(fetcher), dir.path().join("out"));

        let path = downloader.download(&ok).await.unwrap();
        assert_eq!(path, dir.path().join("out").join("ai-generated-red-fox-1.jpg"));
        assert_eq!(std::fs::read(path).unwrap(), b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_spawned_downloads_report_independently() {
        let dir = tempfile::tempdir().unwrap();
        let ok = image("red fox", 1);
        let missing = image("red fox", 2);
        let fetcher = FakeFetcher {
            bodies: HashMap::from([(ok.address.clone(), b"jpeg-bytes".to_vec())]),
        };
        let downloader = Downloader::new(Arc::new(fetcher), dir.path());
        let reports = downloader.reports().unwrap();
        assert!(downloader.reports().is_none());

        downloader.spawn(missing).unwrap().await.unwrap();
        downloader.spawn(ok).unwrap().await.unwrap();

        let mut reports: Vec<DownloadReport> = reports.take(2).collect().await;
        reports.sort_by_key(|r| r.seed);

        assert!(reports[0].is_success());
        assert!(dir.path().join("ai-generated-red-fox-1.jpg").exists());
        assert!(!reports[1].is_success());
        assert!(reports[1]
            .outcome
            .as_ref()
            .unwrap_err()
            .contains("404"));
        assert!(!dir.path().join("ai-generated-red-fox-2.jpg").exists());
    }

    #[tokio::test]
    async fn test_unclaimed_reports_are_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher {
            bodies: HashMap::new(),
        };
        let downloader = Downloader::with_report_capacity(Arc::new(fetcher), dir.path(), 2);

        for seed in 0..5 {
            downloader.spawn(image("lost", seed)).unwrap().await.unwrap();
        }

        let mut reports = downloader.reports().unwrap();
        let mut queued = Vec::new();
        while let Some(Some(report)) = reports.next().now_or_never() {
            queued.push(report.seed);
        }
        assert_eq!(queued, vec![0, 1]);
    }

    #[test]
    fn test_spawn_outside_runtime_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher {
            bodies: HashMap::new(),
        };
        let downloader = Downloader::new(Arc::new(fetcher), dir.path());

        assert!(matches!(
            downloader.spawn(image("fox", 1)),
            Err(StudioError::ConfigError(_))
        ));
    }
}

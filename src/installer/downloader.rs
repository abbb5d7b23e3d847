use crate::error::{InstallerError, Result};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use url::Url;

#[derive(Debug, Clone)]
pub struct DownloadProgress {
    pub downloaded_bytes: u64,
    pub total_bytes: Option<u64>,
    pub start_time: Instant,
}

impl DownloadProgress {
    pub fn new(total_bytes: Option<u64>) -> Self {
        Self {
            downloaded_bytes: 0,
            total_bytes,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Streams a release archive into a temporary file.
pub struct ArchiveDownloader {
    client: reqwest::Client,
    progress_callback: Option<Box<dyn Fn(&DownloadProgress) + Send + Sync>>,
    running: Arc<AtomicBool>,
}

impl ArchiveDownloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            progress_callback: None,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&DownloadProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    /// Shares the flag that Ctrl+C clears.
    pub fn with_running_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = running;
        self
    }

    pub async fn download_to_temp(&self, url: &Url) -> Result<(NamedTempFile, DownloadProgress)> {
        let mut response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InstallerError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        tracing::info!(url = %response.url(), length = ?response.content_length(), "downloading archive");

        let mut progress = DownloadProgress::new(response.content_length());
        let mut file = NamedTempFile::new()?;

        while let Some(chunk) = response.chunk().await? {
            if !self.is_running() {
                return Err(InstallerError::Cancelled);
            }

            file.write_all(&chunk)?;
            progress.downloaded_bytes += chunk.len() as u64;

            if let Some(ref callback) = self.progress_callback {
                callback(&progress);
            }
        }

        file.flush()?;

        if let Some(total) = progress.total_bytes {
            if progress.downloaded_bytes != total {
                return Err(InstallerError::Network {
                    message: format!(
                        "Download ended after {} of {} bytes",
                        progress.downloaded_bytes, total
                    ),
                    source: None,
                });
            }
        }

        tracing::debug!(
            bytes = progress.downloaded_bytes,
            path = %file.path().display(),
            "archive stored"
        );

        Ok((file, progress))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_starts_empty() {
        let progress = DownloadProgress::new(Some(200));
        assert_eq!(progress.downloaded_bytes, 0);
        assert_eq!(progress.total_bytes, Some(200));
        assert!(progress.elapsed() < Duration::from_secs(60));
    }

    #[test]
    fn test_progress_callback_is_stored() {
        let downloader = ArchiveDownloader::new(reqwest::Client::new()).with_progress(|_| {});
        assert!(downloader.progress_callback.is_some());
    }

    #[test]
    fn test_cancellation_shares_flag() {
        let running = Arc::new(AtomicBool::new(true));
        let downloader =
            ArchiveDownloader::new(reqwest::Client::new()).with_running_flag(running.clone());
        assert!(downloader.is_running());

        running.store(false, Ordering::SeqCst);
        assert!(!downloader.is_running());
    }
}

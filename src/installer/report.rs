use crate::installer::archive::Compression;
use crate::installer::layout::InstallLayout;
use crate::page::Selection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallReport {
    pub selection: Selection,
    pub download_url: String,
    pub install_dir: PathBuf,
    pub desktop_file: Option<PathBuf>,
    pub replaced_existing: bool,
    pub summary: InstallSummary,
    pub installed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallSummary {
    pub compression: Option<Compression>,
    pub archive_bytes: u64,
    pub files_installed: usize,
    pub bytes_installed: u64,
    pub duration: Duration,
}

impl InstallReport {
    pub fn new(
        selection: Selection,
        download_url: String,
        layout: &InstallLayout,
        desktop_file: Option<PathBuf>,
        replaced_existing: bool,
        summary: InstallSummary,
    ) -> Self {
        Self {
            selection,
            download_url,
            install_dir: layout.install_dir.clone(),
            desktop_file,
            replaced_existing,
            summary,
            installed_at: Utc::now(),
        }
    }
}

/// Counts regular files and their total size below `root`.
pub fn measure_tree(root: &Path) -> (usize, u64) {
    let mut files = 0;
    let mut bytes = 0;

    for entry in WalkDir::new(root)
        .follow_links(false)
        .follow_root_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() {
            files += 1;
            bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }

    (files, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_measure_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("browser/chrome")).unwrap();
        fs::write(root.join("firefox"), vec![0u8; 100]).unwrap();
        fs::write(root.join("browser/chrome/icon.png"), vec![0u8; 28]).unwrap();

        assert_eq!(measure_tree(root), (2, 128));
    }

    #[cfg(unix)]
    #[test]
    fn test_measure_does_not_follow_linked_root() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("elsewhere");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("libxul.so"), vec![0u8; 64]).unwrap();

        let link = temp_dir.path().join("firefox");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(measure_tree(&link), (0, 0));
    }

    #[test]
    fn test_measure_missing_tree() {
        assert_eq!(measure_tree(Path::new("/nonexistent/firefox")), (0, 0));
    }

    #[test]
    fn test_report_serializes() {
        let selection = Selection::new("desktop_esr", "linux64", "en-GB");
        let layout = InstallLayout::new(Path::new("/data"), "firefox_installer", &selection).unwrap();

        let report = InstallReport::new(
            selection,
            "https://download.mozilla.org/?product=firefox-esr-latest-ssl".to_string(),
            &layout,
            Some(layout.desktop_file.clone()),
            false,
            InstallSummary {
                compression: Some(Compression::Xz),
                archive_bytes: 10,
                files_installed: 2,
                bytes_installed: 20,
                duration: Duration::from_secs(3),
            },
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["selection"]["product"], "desktop_esr");
        assert_eq!(json["summary"]["compression"], "xz");
        assert_eq!(
            json["install_dir"],
            "/data/firefox_installer/firefox_esr-linux64-en-GB"
        );
    }
}

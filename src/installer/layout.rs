use crate::error::{io_error_at, InstallerError, Result};
use crate::page::Selection;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Where one selection is installed.
///
/// ```text
/// <data_home>/<prefix>/firefox_<release>-<platform>-<language>/
/// <data_home>/applications/<prefix>-firefox_<product>_<platform>_<language>.desktop
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallLayout {
    pub data_home: PathBuf,
    pub install_root: PathBuf,
    pub install_dir: PathBuf,
    pub applications_dir: PathBuf,
    pub desktop_file: PathBuf,
}

impl InstallLayout {
    pub fn new(data_home: &Path, prefix: &str, selection: &Selection) -> Result<Self> {
        for value in [
            prefix,
            selection.product.as_str(),
            selection.platform.as_str(),
            selection.language.as_str(),
        ] {
            ensure_safe_component(value)?;
        }

        let install_root = data_home.join(prefix);
        let install_dir = install_root.join(format!(
            "firefox_{}-{}-{}",
            selection.release_name(),
            selection.platform,
            selection.language
        ));

        let applications_dir = data_home.join("applications");
        let desktop_file = applications_dir.join(format!(
            "{}-firefox_{}_{}_{}.desktop",
            prefix, selection.product, selection.platform, selection.language
        ));

        Ok(Self {
            data_home: data_home.to_path_buf(),
            install_root,
            install_dir,
            applications_dir,
            desktop_file,
        })
    }

    pub fn create_install_root(&self) -> Result<()> {
        fs::create_dir_all(&self.install_root).map_err(|e| io_error_at(e, &self.install_root))
    }
}

/// `$XDG_DATA_HOME`, falling back to `~/.local/share`, unless overridden.
pub fn resolve_data_home(override_dir: Option<&Path>) -> Result<PathBuf> {
    match override_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => dirs::data_dir().ok_or(InstallerError::NoDataHome),
    }
}

/// True for a single, non-special path component made of `[A-Za-z0-9._-]`.
pub fn is_safe_component(value: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

    let pattern = PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").ok());
    let matches = pattern.as_ref().is_some_and(|re| re.is_match(value));

    matches && value != "." && value != ".."
}

fn ensure_safe_component(value: &str) -> Result<()> {
    if is_safe_component(value) {
        Ok(())
    } else {
        Err(InstallerError::UnsafeValue {
            value: value.to_string(),
        })
    }
}

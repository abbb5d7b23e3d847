use crate::error::{InstallerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_PAGE_URL: &str = "https://www.mozilla.org/en-US/firefox/all/";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub source: SourceConfig,
    pub install: InstallConfig,
    pub desktop: DesktopConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub page_url: String,
    pub user_agent: String,
    pub timeout: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InstallConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_home: Option<PathBuf>,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DesktopConfig {
    pub create_entry: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            user_agent: format!("firefox-installer/{}", env!("CARGO_PKG_VERSION")),
            timeout: 60, // seconds without any data from the server
        }
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            data_home: None,
            prefix: "firefox_installer".to_string(),
        }
    }
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self { create_entry: true }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(InstallerError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| InstallerError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| InstallerError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["firefox-installer.toml", ".firefox-installer.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref page_url) = cli_args.page_url {
            self.source.page_url = page_url.clone();
        }

        if let Some(ref data_home) = cli_args.data_home {
            self.install.data_home = Some(data_home.clone());
        }

        if cli_args.no_desktop_entry {
            self.desktop.create_entry = false;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| InstallerError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| InstallerError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let page_url = Url::parse(&self.source.page_url).map_err(|_| InstallerError::InvalidUrl {
            url: self.source.page_url.clone(),
        })?;

        if !matches!(page_url.scheme(), "http" | "https") {
            return Err(InstallerError::InvalidUrl {
                url: self.source.page_url.clone(),
            });
        }

        if self.source.timeout == 0 {
            return Err(InstallerError::Config {
                message: "Timeout must be greater than 0".to_string(),
            });
        }

        if self.source.user_agent.trim().is_empty() {
            return Err(InstallerError::Config {
                message: "User agent must not be empty".to_string(),
            });
        }

        if !crate::installer::layout::is_safe_component(&self.install.prefix) {
            return Err(InstallerError::Config {
                message: format!(
                    "Install prefix must be a plain directory name: {}",
                    self.install.prefix
                ),
            });
        }

        Ok(())
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.source.timeout)
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub page_url: Option<String>,
    pub data_home: Option<PathBuf>,
    pub no_desktop_entry: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_url(mut self, page_url: Option<String>) -> Self {
        self.page_url = page_url;
        self
    }

    pub fn with_data_home(mut self, data_home: Option<PathBuf>) -> Self {
        self.data_home = data_home;
        self
    }

    pub fn with_no_desktop_entry(mut self, skip: bool) -> Self {
        self.no_desktop_entry = skip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source.page_url, DEFAULT_PAGE_URL);
        assert_eq!(config.install.prefix, "firefox_installer");
        assert!(config.install.data_home.is_none());
        assert!(config.desktop.create_entry);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.source.timeout = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.source.page_url = "ftp://example.com/all/".to_string();
        assert!(matches!(
            config.validate(),
            Err(InstallerError::InvalidUrl { .. })
        ));

        let mut config = Config::default();
        config.install.prefix = "../escape".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.install.data_home = Some(PathBuf::from("/srv/data"));
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.source.timeout, config.source.timeout);
        assert_eq!(loaded.install.data_home, Some(PathBuf::from("/srv/data")));
    }

    #[test]
    fn test_partial_file_is_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[source]\npage_url = \"https://example.com/\"").unwrap();

        let result = Config::load_from_file(temp_file.path());
        assert!(matches!(result, Err(InstallerError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_page_url(Some("http://127.0.0.1:8080/all/".to_string()))
            .with_data_home(Some(PathBuf::from("/tmp/data")))
            .with_no_desktop_entry(true);

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.source.page_url, "http://127.0.0.1:8080/all/");
        assert_eq!(config.install.data_home, Some(PathBuf::from("/tmp/data")));
        assert!(!config.desktop.create_entry);
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[source]"));
        assert!(sample.contains("[install]"));
        assert!(sample.contains("[desktop]"));
    }
}

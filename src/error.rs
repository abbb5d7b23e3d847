use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallerError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Network error occurred")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Server answered {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("No {what} options found on the download page")]
    NoOptions { what: String },

    #[error("Invalid {what} selection: {value}")]
    InvalidSelection {
        what: String,
        value: String,
        available: Vec<String>,
    },

    #[error("No download link for {product} / {platform} / {language}")]
    DownloadLinkNotFound {
        product: String,
        platform: String,
        language: String,
    },

    #[error("Value cannot be used in a file name: {value}")]
    UnsafeValue { value: String },

    #[error("Unsupported archive format")]
    UnsupportedArchive,

    #[error("Unexpected archive layout: {message}")]
    ArchiveLayout { message: String },

    #[error("Attempted path traversal in tar file: {entry}")]
    PathTraversal { entry: String },

    #[error("Data directory could not be determined")]
    NoDataHome,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for InstallerError {
    fn user_message(&self) -> String {
        match self {
            InstallerError::InvalidUrl { url } => format!("Invalid URL: {}", url),
            InstallerError::Network { message, .. } => format!("Network error: {}", message),
            InstallerError::HttpStatus { url, status } => {
                format!("Request to {} failed with HTTP status {}", url, status)
            }
            InstallerError::NoOptions { what } => {
                format!("The download page did not list any {} options", what)
            }
            InstallerError::InvalidSelection {
                what,
                value,
                available,
            } => format!(
                "'{}' is not an available {} (available: {})",
                value,
                what,
                available.join(", ")
            ),
            InstallerError::DownloadLinkNotFound {
                product,
                platform,
                language,
            } => format!(
                "No download link found for product {}, platform {}, language {}",
                product, platform, language
            ),
            InstallerError::UnsafeValue { value } => {
                format!("Refusing to use '{}' as part of a path", value)
            }
            InstallerError::ArchiveLayout { message } => {
                format!("The downloaded archive has an unexpected layout: {}", message)
            }
            InstallerError::PathTraversal { entry } => {
                format!("Archive entry escapes the extraction directory: {}", entry)
            }
            InstallerError::Config { message } => format!("Configuration error: {}", message),
            InstallerError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            InstallerError::InvalidUrl { .. } => Some(
                "Pass an http:// or https:// address with --page-url.".to_string(),
            ),
            InstallerError::Network { .. } | InstallerError::HttpStatus { .. } => Some(
                "Check your internet connection and try again. The Mozilla servers might be temporarily unavailable.".to_string(),
            ),
            InstallerError::NoOptions { .. } | InstallerError::DownloadLinkNotFound { .. } => Some(
                "The layout of the download page may have changed. Try a different selection or --page-url.".to_string(),
            ),
            InstallerError::InvalidSelection { .. } => Some(
                "Run without --product/--platform/--language to choose interactively.".to_string(),
            ),
            InstallerError::NoDataHome => Some(
                "Set XDG_DATA_HOME or pass --data-home.".to_string(),
            ),
            InstallerError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string(),
            ),
            InstallerError::Permission { .. } => Some(
                "Ensure you have write permission for the data directory.".to_string(),
            ),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for InstallerError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            return InstallerError::HttpStatus {
                url: error.url().map(|u| u.to_string()).unwrap_or_default(),
                status: status.as_u16(),
            };
        }

        let message = if error.is_timeout() {
            "Request timed out".to_string()
        } else if error.is_connect() {
            "Connection failed".to_string()
        } else {
            error.to_string()
        };

        InstallerError::Network {
            message,
            source: Some(error),
        }
    }
}

impl From<toml::de::Error> for InstallerError {
    fn from(error: toml::de::Error) -> Self {
        InstallerError::Config {
            message: error.to_string(),
        }
    }
}

/// Maps an IO error on `path` to `Permission` when that is the cause.
pub fn io_error_at(error: std::io::Error, path: &std::path::Path) -> InstallerError {
    if error.kind() == std::io::ErrorKind::PermissionDenied {
        InstallerError::Permission {
            path: path.display().to_string(),
        }
    } else {
        InstallerError::Io(error)
    }
}

pub type Result<T> = std::result::Result<T, InstallerError>;

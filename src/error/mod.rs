mod context;
mod exit_codes;
mod format;

pub use context::ErrorContext;
pub use exit_codes::get_exit_code;
pub use format::format_error_with_color;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("No sensor installer found for platform '{platform}'")]
    NoInstallerFound { platform: String },

    #[error("Installer record is missing field '{0}'")]
    MissingField(String),

    #[error("Failed to download installer: {0}")]
    Download(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] attohttpc::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for FetchError {
    fn from(error: config::ConfigError) -> Self {
        FetchError::ConfigError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to load dataset {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    #[error("Invalid timestamp: '{0}'")]
    TimestampParse(String),

    #[error("Aggregation error: {0}")]
    Aggregation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Server error: {0}")]
    Server(String),
}

impl DashboardError {
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DashboardError::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Load failures abort the whole rendering pass.
    pub fn is_load_error(&self) -> bool {
        matches!(self, DashboardError::Load { .. })
    }
}

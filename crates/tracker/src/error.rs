use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("Scan error: {0}")]
    Scan(#[from] gtd_scan::ScanError),

    #[error("Watcher error: {0}")]
    Watch(String),

    #[error("{0}")]
    Other(String),
}

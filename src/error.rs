use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocmapError>;

#[derive(Error, Debug)]
pub enum LocmapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Parse error on row {row}: {message}")]
    Parse { row: usize, message: String },
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Other: {0}")]
    Other(String),
}

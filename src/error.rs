use thiserror::Error;

/// Errors a [`DocumentSource`](crate::service::DocumentSource) can report.
///
/// "Not found" is not an error: lookups return `Ok(None)` for unknown ids.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("document source unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SourceError>;

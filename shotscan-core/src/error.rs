use thiserror::Error;

/// Custom error types for shotscan
#[derive(Error, Debug)]
pub enum ShotscanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command execution failed: {0}")]
    CommandExecution(String),

    #[error("Dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Media probe error: {0}")]
    Probe(String),

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Result type for shotscan operations
pub type Result<T> = std::result::Result<T, ShotscanError>;

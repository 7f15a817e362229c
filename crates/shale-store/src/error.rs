use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// Backend-specific failure, passed through unchanged.
    Backend(String),
    /// The backend cannot execute the requested operation.
    Unsupported(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Backend(msg) => write!(f, "backend error: {msg}"),
            StoreError::Unsupported(msg) => write!(f, "unsupported operation: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

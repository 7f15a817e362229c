use std::fmt;

use shale_query::SortParseError;
use shale_store::StoreError;

#[derive(Debug)]
pub enum PaginateError {
    /// Malformed sort directive — rejected before any store I/O.
    Sort(SortParseError),
    /// Store failure, passed through unchanged. The engine adds no retry.
    Store(StoreError),
}

impl fmt::Display for PaginateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginateError::Sort(e) => write!(f, "{e}"),
            PaginateError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for PaginateError {}

impl From<SortParseError> for PaginateError {
    fn from(e: SortParseError) -> Self {
        PaginateError::Sort(e)
    }
}

impl From<StoreError> for PaginateError {
    fn from(e: StoreError) -> Self {
        PaginateError::Store(e)
    }
}

//! Directory error types.

use std::fmt;

/// Directory errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The platform rejected or failed a directory request.
    RequestFailed {
        /// The operation that failed, e.g. "create organization".
        operation: &'static str,
    },
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { operation } => {
                write!(f, "directory request failed: {}", operation)
            }
        }
    }
}

impl std::error::Error for DirectoryError {}

//! Transport error types.

use std::fmt;

/// Errors from sending a request to the platform API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    Client {
        /// Error details.
        details: String,
    },
    /// The request body could not be encoded.
    Encode {
        /// Error details.
        details: String,
    },
    /// The request could not be delivered or the response not read.
    Transport {
        /// Error details.
        details: String,
    },
    /// No response arrived within the configured timeout.
    Timeout {
        /// The request path.
        path: String,
    },
    /// The API answered with a non-success status.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Top-level message.
        message: String,
        /// Individual messages, e.g. one per schema validation failure.
        errors: Vec<String>,
    },
    /// A success response could not be decoded.
    Decode {
        /// Error details.
        details: String,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client { details } => write!(f, "failed to build HTTP client: {details}"),
            Self::Encode { details } => write!(f, "failed to encode request: {details}"),
            Self::Transport { details } => write!(f, "request failed: {details}"),
            Self::Timeout { path } => write!(f, "request to '{path}' timed out"),
            Self::Rejected {
                status,
                message,
                errors,
            } => {
                write!(f, "{message} (status {status})")?;
                for error in errors {
                    write!(f, "\n\t{error}")?;
                }
                Ok(())
            }
            Self::Decode { details } => write!(f, "failed to decode response: {details}"),
        }
    }
}

impl std::error::Error for ApiError {}

//! Authorization error types.

use std::fmt;

/// Authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// A subject or resource token is not of the form `type:id`.
    MalformedTuple {
        /// The offending token.
        token: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A context argument is not a JSON object.
    InvalidContext {
        /// The rejected input.
        input: String,
        /// Error details.
        details: String,
    },
    /// A resource metadata argument is not a JSON object.
    InvalidMeta {
        /// The rejected input.
        input: String,
        /// Error details.
        details: String,
    },
    /// A canonical tuple rendering could not be parsed back.
    InvalidTuple {
        /// The rejected input.
        input: String,
    },
    /// The platform rejected or failed an authorization request.
    RequestFailed {
        /// The operation that failed.
        operation: &'static str,
    },
}

impl fmt::Display for AuthzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedTuple { token, reason } => {
                write!(f, "malformed token '{}': {}", token, reason)
            }
            Self::InvalidContext { input, details } => {
                write!(f, "invalid context '{}': {}", input, details)
            }
            Self::InvalidMeta { input, details } => {
                write!(f, "invalid meta '{}': {}", input, details)
            }
            Self::InvalidTuple { input } => {
                write!(
                    f,
                    "invalid tuple '{}': expected 'subject relation resource'",
                    input
                )
            }
            Self::RequestFailed { operation } => {
                write!(f, "authorization request failed: {}", operation)
            }
        }
    }
}

impl std::error::Error for AuthzError {}

//! Command-line error types.

use std::fmt;

/// Errors reported by command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// A positional argument could not be parsed.
    InvalidArguments,
    /// A required argument was not supplied.
    MissingArgument {
        /// What is missing, e.g. "API key".
        name: &'static str,
    },
    /// The profile store could not be loaded, queried or written.
    Profile,
    /// A remote request failed.
    Remote {
        /// What was being done, e.g. "creating resource".
        operation: &'static str,
    },
    /// An input file could not be read or parsed.
    ReadInput {
        /// The file, or "stdin".
        source: String,
        /// Error details.
        details: String,
    },
    /// Interactive input failed.
    Prompt {
        /// Error details.
        details: String,
    },
    /// A check result did not match `--assert`.
    AssertionMismatch {
        /// The asserted result.
        expected: bool,
        /// The actual result.
        actual: bool,
    },
    /// Schema conversion produced warnings under `--strict`.
    SchemaWarnings {
        /// Number of warnings.
        count: usize,
    },
    /// A flag value is not acceptable.
    InvalidOption {
        /// The flag.
        option: &'static str,
        /// The rejected value.
        value: String,
    },
    /// Writing to the terminal failed.
    Output {
        /// Error details.
        details: String,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArguments => write!(f, "invalid arguments"),
            Self::MissingArgument { name } => write!(f, "a valid {} is required", name),
            Self::Profile => write!(f, "profile configuration error"),
            Self::Remote { operation } => write!(f, "error {}", operation),
            Self::ReadInput { source, details } => {
                write!(f, "error reading {}: {}", source, details)
            }
            Self::Prompt { details } => write!(f, "prompt failed: {}", details),
            Self::AssertionMismatch { expected, actual } => {
                write!(f, "assertion failed: expected {}, got {}", expected, actual)
            }
            Self::SchemaWarnings { count } => write!(
                f,
                "error applying schema: {} warning(s) found (omit --strict to ignore)",
                count
            ),
            Self::InvalidOption { option, value } => {
                write!(f, "invalid value '{}' for {}", value, option)
            }
            Self::Output { details } => write!(f, "error writing output: {}", details),
        }
    }
}

impl std::error::Error for CliError {}

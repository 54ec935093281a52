//! Profile store error types.

use std::fmt;
use std::path::PathBuf;

/// Profile store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// The user's home directory could not be determined.
    HomeDirUnavailable,
    /// Reading or writing the config file failed.
    Io {
        /// The config file.
        path: PathBuf,
        /// Error details.
        details: String,
    },
    /// The config file or an override is not a valid profile document.
    InvalidConfig {
        /// The config file.
        path: PathBuf,
        /// Error details.
        details: String,
    },
    /// No profile is marked active.
    NoActiveProfile,
    /// No profiles are configured.
    NoProfiles,
    /// The active profile names a profile that does not exist.
    UnknownActiveProfile {
        /// The dangling name.
        name: String,
    },
    /// The named profile does not exist.
    ProfileNotFound {
        /// The requested name.
        name: String,
    },
    /// A profile name contains characters outside `[a-z0-9_-]`.
    InvalidName {
        /// The rejected name.
        name: String,
    },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HomeDirUnavailable => write!(f, "could not determine the home directory"),
            Self::Io { path, details } => {
                write!(f, "config file {}: {}", path.display(), details)
            }
            Self::InvalidConfig { path, details } => {
                write!(f, "invalid config file {}: {}", path.display(), details)
            }
            Self::NoActiveProfile => {
                write!(f, "no active profile configured. Run 'authctl init'")
            }
            Self::NoProfiles => write!(f, "no profiles configured. Run 'authctl init'"),
            Self::UnknownActiveProfile { name } => write!(
                f,
                "configured active profile '{}' is invalid. Run 'authctl init'",
                name
            ),
            Self::ProfileNotFound { name } => write!(f, "profile '{}' does not exist", name),
            Self::InvalidName { name } => write!(
                f,
                "invalid profile name '{}': use only lowercase letters, digits, hyphens (-) and underscores (_)",
                name
            ),
        }
    }
}

impl std::error::Error for ProfileError {}

//! The on-disk profile document and its environment overrides.

use crate::error::ProfileError;
use config::{Config, Environment, File, FileFormat, Source};
use regex::Regex;
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

/// File name of the profile document, relative to the home directory.
pub const CONFIG_FILE_NAME: &str = ".authctl.json";

/// Prefix of the environment variables that override the document.
pub const ENV_PREFIX: &str = "AUTHCTL";

/// Profile whose fields may be supplied entirely through the environment.
pub const HEADLESS_PROFILE: &str = "headless";

const HEADLESS_FIELDS: [&str; 4] = ["endpoint", "type", "name", "api_key"];

static PROFILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("profile name pattern is valid"));

/// Checks that a profile name uses only lowercase letters, digits, `-` and `_`.
///
/// # Errors
///
/// Returns [`ProfileError::InvalidName`] otherwise.
pub fn validate_profile_name(name: &str) -> Result<(), Report<ProfileError>> {
    if PROFILE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(ProfileError::InvalidName {
            name: name.to_string(),
        }
        .into())
    }
}

/// A named set of connection settings.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name; filled from the document key when absent.
    #[serde(default)]
    pub name: String,
    /// Environment label, e.g. "Production" or "Sandbox".
    #[serde(rename = "type", default)]
    pub environment_type: String,
    /// Secret API key.
    #[serde(default)]
    pub api_key: String,
    /// API endpoint override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Profile {
    /// Returns the endpoint override, treating an empty string as unset.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref().filter(|e| !e.is_empty())
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("environment_type", &self.environment_type)
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// The profile document: every configured profile and the active one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStore {
    /// Name of the active profile; may be empty or dangling.
    #[serde(default)]
    pub active_environment: String,
    /// Profiles by name.
    #[serde(default)]
    pub environments: BTreeMap<String, Profile>,
    #[serde(skip)]
    path: PathBuf,
}

impl ProfileStore {
    /// Returns the default document location, `~/.authctl.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::HomeDirUnavailable`] when the home directory
    /// cannot be determined.
    pub fn default_path() -> Result<PathBuf, Report<ProfileError>> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .ok_or_else(|| ProfileError::HomeDirUnavailable.into())
    }

    /// Loads the default document with overrides from the process environment.
    ///
    /// # Errors
    ///
    /// See [`ProfileStore::load_from`].
    pub fn load() -> Result<Self, Report<ProfileError>> {
        Self::load_at(Self::default_path()?)
    }

    /// Loads the document at `path` with overrides from the process environment.
    ///
    /// # Errors
    ///
    /// See [`ProfileStore::load_from`].
    pub fn load_at(path: impl AsRef<Path>) -> Result<Self, Report<ProfileError>> {
        Self::load_from(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads the document at `path`, creating it as `{}` when missing, and
    /// layers the overrides found in `env` on top.
    ///
    /// `active_environment` is always overridable. The fields of the
    /// [`HEADLESS_PROFILE`] profile are overridable only when it is the
    /// active one after the first layer is applied.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Io`] when the file cannot be created and
    /// [`ProfileError::InvalidConfig`] when it, or an override, is not a valid
    /// profile document.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_from(
        path: impl AsRef<Path>,
        env: Environment,
    ) -> Result<Self, Report<ProfileError>> {
        let path = path.as_ref().to_path_buf();
        create_if_missing(&path)?;

        let invalid = |e: config::ConfigError| ProfileError::InvalidConfig {
            path: path.clone(),
            details: e.to_string(),
        };

        let overrides: HashMap<String, String> = env
            .collect()
            .map_err(invalid)?
            .into_iter()
            .filter_map(|(key, value)| Some((key.to_lowercase(), value.into_string().ok()?)))
            .collect();

        let mut layered = Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Json))
            .set_override_option(
                "active_environment",
                overrides.get("active_environment").cloned(),
            )
            .and_then(|builder| builder.build())
            .map_err(invalid)?;

        if layered.get_string("active_environment").unwrap_or_default() == HEADLESS_PROFILE {
            let mut builder = Config::builder().add_source(layered);
            for field in HEADLESS_FIELDS {
                let value = overrides
                    .get(&format!("environments_{HEADLESS_PROFILE}_{field}"))
                    .cloned();
                builder = builder
                    .set_override_option(format!("environments.{HEADLESS_PROFILE}.{field}"), value)
                    .map_err(invalid)?;
            }
            layered = builder.build().map_err(invalid)?;
            debug!("headless profile overrides applied");
        }

        let mut store: Self = layered.try_deserialize().map_err(invalid)?;
        for (key, profile) in &mut store.environments {
            if profile.name.is_empty() {
                profile.name.clone_from(key);
            }
        }
        store.path = path;

        debug!(
            profiles = store.environments.len(),
            active = %store.active_environment,
            "profile store loaded"
        );
        Ok(store)
    }

    /// Returns the file this store was loaded from and is written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the active profile.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NoActiveProfile`], [`ProfileError::NoProfiles`]
    /// or [`ProfileError::UnknownActiveProfile`], in that order of precedence.
    pub fn active_profile(&self) -> Result<&Profile, Report<ProfileError>> {
        if self.active_environment.is_empty() {
            return Err(ProfileError::NoActiveProfile.into());
        }
        if self.environments.is_empty() {
            return Err(ProfileError::NoProfiles.into());
        }
        self.environments
            .get(&self.active_environment)
            .ok_or_else(|| {
                ProfileError::UnknownActiveProfile {
                    name: self.active_environment.clone(),
                }
                .into()
            })
    }

    /// Returns the named profile.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.environments.get(name)
    }

    /// Inserts a profile, replacing any profile with the same name.
    pub fn add(&mut self, profile: Profile) {
        debug!(name = %profile.name, "profile added");
        self.environments.insert(profile.name.clone(), profile);
    }

    /// Removes a profile.
    ///
    /// The active pointer is left alone, even when it names the removed profile.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::ProfileNotFound`] when no such profile exists.
    pub fn remove(&mut self, name: &str) -> Result<Profile, Report<ProfileError>> {
        let removed = self.environments.remove(name).ok_or_else(|| {
            Report::from(ProfileError::ProfileNotFound {
                name: name.to_string(),
            })
        })?;
        if self.active_environment == name {
            warn!(name, "removed the active profile; switch to another profile");
        }
        Ok(removed)
    }

    /// Marks a profile active. The name is not checked against the store.
    pub fn set_active(&mut self, name: impl Into<String>) {
        self.active_environment = name.into();
    }

    /// Writes the whole document back to its file as 4-space indented JSON.
    ///
    /// The file is overwritten in place; concurrent writers race and the
    /// last one wins.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Io`] when the file cannot be written.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn write(&self) -> Result<(), Report<ProfileError>> {
        let io = |details: String| ProfileError::Io {
            path: self.path.clone(),
            details,
        };

        let mut contents = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(
            &mut contents,
            PrettyFormatter::with_indent(b"    "),
        );
        self.serialize(&mut serializer)
            .map_err(|e| io(e.to_string()))?;
        fs::write(&self.path, contents).map_err(|e| io(e.to_string()))?;

        debug!("profile store written");
        Ok(())
    }
}

fn create_if_missing(path: &Path) -> Result<(), Report<ProfileError>> {
    let io = |e: std::io::Error| ProfileError::Io {
        path: path.to_path_buf(),
        details: e.to_string(),
    };
    if !path.try_exists().map_err(io)? {
        fs::write(path, "{}").map_err(io)?;
        debug!(path = %path.display(), "created empty profile store");
    }
    Ok(())
}

//! Credentials profile for the Trello API.
//!
//! The profile is a small JSON document holding the API key, the access
//! token, and the organization the tool operates on. It is loaded once at
//! startup and read-only for the rest of the run.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Where to generate the key/token pair, surfaced in startup errors.
const CREDENTIALS_HINT: &str =
    "Generate an API key and token at https://trello.com/app-key";

/// Errors raised while loading the credentials profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile file could not be read.
    #[error("Unable to read profile at {path}: {source}\n{CREDENTIALS_HINT}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The profile file is not valid JSON.
    #[error("Profile at {path} is not valid JSON: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required field is absent or empty.
    #[error("Profile at {path} is missing required field `{field}`\n{CREDENTIALS_HINT}")]
    MissingField { path: String, field: &'static str },
}

/// The JSON-serialized credentials profile.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    /// Trello API key.
    #[serde(default)]
    pub key: String,
    /// Trello access token.
    #[serde(default)]
    pub token: String,
    /// Organization identifier the tool is scoped to.
    #[serde(default)]
    pub organization: String,
}

impl Profile {
    /// Load and validate a profile from disk.
    ///
    /// # Errors
    /// Returns `ProfileError` if the file is unreadable, malformed, or is
    /// missing any of the three required fields.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|source| {
            ProfileError::Unreadable {
                path: path.display().to_string(),
                source,
            }
        })?;

        let profile: Self = serde_json::from_str(&content).map_err(|source| {
            ProfileError::Malformed {
                path: path.display().to_string(),
                source,
            }
        })?;

        require_field("key", &profile.key, path)?;
        require_field("token", &profile.token, path)?;
        require_field("organization", &profile.organization, path)?;

        Ok(profile)
    }

    /// Default profile location: `$HOME/.trello.json`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        let home = env::var("HOME").unwrap_or_default();
        Path::new(&home).join(".trello.json")
    }

}

fn require_field(field: &'static str, value: &str, path: &Path) -> Result<(), ProfileError> {
    if value.is_empty() {
        return Err(ProfileError::MissingField {
            path: path.display().to_string(),
            field,
        });
    }
    Ok(())
}

//! Credential resolution for remote deployments.
//!
//! Explicit environment credentials always take precedence; otherwise a
//! deployment's `credentials_profile` is resolved through a
//! [`CredentialProvider`]. The default provider reads a YAML profile
//! file from the user's home directory. Local emulator deployments
//! never touch any of this.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment variable holding the access key id.
pub const ACCESS_KEY_ENV_VAR: &str = "TABULA_ACCESS_KEY_ID";

/// Environment variable holding the secret access key.
pub const SECRET_KEY_ENV_VAR: &str = "TABULA_SECRET_ACCESS_KEY";

/// A usable credential pair for the managed table service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key id presented to the service.
    pub access_key_id: String,
    /// Secret used to authenticate requests.
    pub secret_access_key: String,
}

impl Credentials {
    /// Reads credentials from the environment, if both variables are set
    /// and non-empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let access_key_id = env::var(ACCESS_KEY_ENV_VAR).ok().filter(|v| !v.is_empty())?;
        let secret_access_key = env::var(SECRET_KEY_ENV_VAR).ok().filter(|v| !v.is_empty())?;
        Some(Self {
            access_key_id,
            secret_access_key,
        })
    }
}

/// Resolves a credential profile into usable credentials.
///
/// Consulted only for non-local deployments without environment
/// credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns credentials for the named profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be resolved; the client
    /// factory surfaces it as a `CredentialResolution` error for the
    /// deployment being connected.
    async fn credentials(&self, profile: &str) -> Result<Credentials>;
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    access_key_id: String,
    secret_access_key: String,
}

/// File-backed credential provider.
///
/// Reads `~/.tabula/credentials.yaml`, a map from profile name to an
/// `access_key_id` / `secret_access_key` pair.
#[derive(Debug, Clone)]
pub struct ProfileCredentialProvider {
    path: PathBuf,
}

impl ProfileCredentialProvider {
    /// Creates a provider reading from the default location under the
    /// user's home directory.
    #[must_use]
    pub fn new() -> Self {
        let path = home::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tabula")
            .join("credentials.yaml");
        Self { path }
    }

    /// Creates a provider reading from an explicit file path.
    #[must_use]
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Default for ProfileCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for ProfileCredentialProvider {
    async fn credentials(&self, profile: &str) -> Result<Credentials> {
        if !self.path.exists() {
            return Err(Error::configuration(
                "credentials",
                format!("credential file {} not found", self.path.display()),
            ));
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let profiles: HashMap<String, ProfileEntry> = serde_yaml::from_str(&contents)?;

        let entry = profiles.get(profile).ok_or_else(|| {
            Error::configuration(
                "credentials",
                format!("profile '{profile}' not found in {}", self.path.display()),
            )
        })?;

        Ok(Credentials {
            access_key_id: entry.access_key_id.clone(),
            secret_access_key: entry.secret_access_key.clone(),
        })
    }
}

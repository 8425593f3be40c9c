//! Client construction for resolved deployments.
//!
//! The factory turns a [`TableHandle`] into a usable [`StoreClient`]:
//! a handle to the in-process emulator for the local deployment, or an
//! authenticated [`RemoteStoreClient`] for anything else. No network
//! calls are made here.

use std::sync::Arc;

use crate::client::{CredentialProvider, Credentials, RemoteStoreClient, StoreClient};
use crate::config::TableHandle;
use crate::error::{Error, Result};

#[cfg(feature = "local-emulator")]
use crate::emulator::{EmulatorConfig, EmulatorRegistry};

/// Port the local store emulator listens on by default.
pub const DEFAULT_LOCAL_PORT: u16 = 8000;

/// Produces store clients bound to resolved deployments.
///
/// Owns the credential provider for remote deployments and, when the
/// `local-emulator` feature is enabled, the registry of running
/// emulator instances.
pub struct ClientFactory {
    credentials: Arc<dyn CredentialProvider>,
    local_port: u16,
    #[cfg(feature = "local-emulator")]
    emulators: EmulatorRegistry,
}

impl ClientFactory {
    /// Creates a factory using the given credential provider and the
    /// default local emulator port.
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            credentials,
            local_port: DEFAULT_LOCAL_PORT,
            #[cfg(feature = "local-emulator")]
            emulators: EmulatorRegistry::new(),
        }
    }

    /// Sets the port used for local emulator connections.
    #[must_use]
    pub fn with_local_port(mut self, port: u16) -> Self {
        self.local_port = port;
        self
    }

    /// Returns the port used for local emulator connections.
    #[must_use]
    pub const fn local_port(&self) -> u16 {
        self.local_port
    }

    /// Produces a client for the deployment a handle is bound to.
    ///
    /// The local deployment connects to the running emulator and never
    /// consults the credential provider. Remote deployments prefer
    /// environment credentials and fall back to the handle's credential
    /// profile.
    ///
    /// # Errors
    ///
    /// Returns `EmulatorNotRunning` when no emulator has been started
    /// on the configured port, `CredentialResolution` when no
    /// credential source is available for a remote deployment, and
    /// `Configuration` when a remote deployment lacks an endpoint.
    pub async fn create_client(&self, handle: &TableHandle) -> Result<Arc<dyn StoreClient>> {
        if handle.is_local() {
            return self.local_client().await;
        }

        let credentials = match Credentials::from_env() {
            Some(credentials) => credentials,
            None => {
                let profile = handle.credentials_profile.as_deref().ok_or_else(|| {
                    Error::CredentialResolution {
                        deployment: handle.deployment.clone(),
                        reason: "no environment credentials and no credentials_profile configured"
                            .to_string(),
                    }
                })?;
                self.credentials
                    .credentials(profile)
                    .await
                    .map_err(|source| Error::CredentialResolution {
                        deployment: handle.deployment.clone(),
                        reason: source.to_string(),
                    })?
            }
        };

        let endpoint = handle.endpoint.as_deref().ok_or_else(|| {
            Error::configuration(
                "endpoint",
                format!("deployment '{}' has no endpoint", handle.deployment),
            )
        })?;

        Ok(Arc::new(RemoteStoreClient::new(
            endpoint,
            &handle.region,
            credentials,
        )?))
    }

    #[cfg(feature = "local-emulator")]
    async fn local_client(&self) -> Result<Arc<dyn StoreClient>> {
        self.emulators.connect(self.local_port).await
    }

    #[cfg(not(feature = "local-emulator"))]
    async fn local_client(&self) -> Result<Arc<dyn StoreClient>> {
        Err(Error::configuration(
            "deployment",
            "local deployments require the local-emulator feature",
        ))
    }

    /// Starts a local emulator on the factory's local port.
    ///
    /// Starting a port that already has a running emulator is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the emulator's backing database cannot be
    /// opened.
    #[cfg(feature = "local-emulator")]
    pub async fn start_local(&self) -> Result<()> {
        self.emulators
            .start(EmulatorConfig::new(self.local_port))
            .await
    }

    /// Stops the local emulator on the factory's local port, if running.
    #[cfg(feature = "local-emulator")]
    pub async fn stop_local(&self) -> bool {
        self.emulators.stop(self.local_port).await
    }
}

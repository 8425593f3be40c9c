//! The connection entry point tying the subsystem together.
//!
//! A [`TableManager`] owns the pieces a caller needs to use a
//! deployment-scoped table safely: package configuration, the client
//! factory, the cold-start cache, and bootstrap polling options.
//! `connect` is the idempotent path callers normally take; teardown and
//! down-migration bypass the cold-start gate and talk to the factory
//! directly.

use std::sync::Arc;

use crate::bootstrap::{self, BootstrapOptions};
use crate::client::{ClientFactory, CredentialProvider, ProfileCredentialProvider, StoreClient};
use crate::coldstart::ColdStartCache;
use crate::config::{resolve_deployment, PackageConfig, TableHandle};
use crate::error::Result;
use crate::migrations::{self, MigrationList};

#[cfg(feature = "local-emulator")]
use crate::config::LOCAL_DEPLOYMENT;

/// Manages clients, bootstrap, and migrations for one table package.
///
/// The cold-start cache lives inside the manager, so at-most-once
/// initialization holds for as long as one manager instance is reused;
/// a fresh manager starts cold.
///
/// # Examples
///
/// ```no_run
/// use tabula::{MigrationList, PackageConfig, TableManager};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let config = PackageConfig {
///     name: "orders".to_string(),
///     table_name: "orders-local".to_string(),
///     deployments: Vec::new(),
/// };
/// let manager = TableManager::new(config).unwrap();
/// manager.start_local().await.unwrap();
/// let client = manager
///     .connect(&MigrationList::empty(), None)
///     .await
///     .unwrap();
/// # drop(client);
/// # });
/// ```
pub struct TableManager {
    config: PackageConfig,
    factory: ClientFactory,
    cold_start: ColdStartCache,
    bootstrap: BootstrapOptions,
}

impl TableManager {
    /// Creates a manager with the default file-backed credential
    /// provider and bootstrap options.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the package configuration is
    /// structurally invalid.
    pub fn new(config: PackageConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            factory: ClientFactory::new(Arc::new(ProfileCredentialProvider::new())),
            config,
            cold_start: ColdStartCache::new(),
            bootstrap: BootstrapOptions::default(),
        })
    }

    /// Replaces the credential provider.
    ///
    /// Configure the manager before starting any local emulator; this
    /// resets the factory's emulator registry.
    #[must_use]
    pub fn with_credential_provider(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        let local_port = self.factory.local_port();
        self.factory = ClientFactory::new(provider).with_local_port(local_port);
        self
    }

    /// Sets the local emulator port.
    ///
    /// Configure the manager before starting any local emulator.
    #[must_use]
    pub fn with_local_port(mut self, port: u16) -> Self {
        self.factory = self.factory.with_local_port(port);
        self
    }

    /// Sets the bootstrap polling options.
    #[must_use]
    pub const fn with_bootstrap_options(mut self, options: BootstrapOptions) -> Self {
        self.bootstrap = options;
        self
    }

    /// Returns the package configuration.
    #[must_use]
    pub const fn config(&self) -> &PackageConfig {
        &self.config
    }

    /// Returns the manager's cold-start cache.
    #[must_use]
    pub const fn cold_start(&self) -> &ColdStartCache {
        &self.cold_start
    }

    /// Resolves the table name for an optional deployment name.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for an unknown non-local
    /// deployment.
    pub fn table_name(&self, deployment: Option<&str>) -> Result<String> {
        let deployment = resolve_deployment(deployment);
        self.config.table_name(&deployment)
    }

    fn handle(&self, deployment: Option<&str>) -> Result<TableHandle> {
        let deployment = resolve_deployment(deployment);
        TableHandle::resolve(&self.config, &deployment)
    }

    /// Connects to the deployment's table, bootstrapping and migrating
    /// it on the first use of its cold-start key.
    ///
    /// The check-and-mark around bootstrap plus migration is a per-key
    /// critical section: concurrent connects for one key initialize
    /// exactly once, and every caller obtains its client only after
    /// initialization has completed.
    ///
    /// # Errors
    ///
    /// Propagates client construction, bootstrap, and migration
    /// failures. A failed initialization leaves the key uninitialized,
    /// so the next connect retries it.
    pub async fn connect(
        &self,
        migrations: &MigrationList,
        deployment: Option<&str>,
    ) -> Result<Arc<dyn StoreClient>> {
        let handle = self.handle(deployment)?;
        let client = self.factory.create_client(&handle).await?;

        let key = handle.cold_start_key();
        let slot = self.cold_start.slot(&key).await;
        let mut initialized = slot.lock().await;
        if !*initialized {
            bootstrap::assert_table(&handle, client.as_ref()).await?;
            bootstrap::assert_table_active(&handle, client.as_ref(), &self.bootstrap).await?;
            migrations::perform_migrations(&handle, migrations, client.as_ref()).await?;
            *initialized = true;
        }

        Ok(client)
    }

    /// Deletes the deployment's table with all its data and forgets its
    /// cold-start entry, so a later connect re-bootstraps from scratch.
    ///
    /// # Errors
    ///
    /// Propagates client construction and delete failures.
    pub async fn delete_table(&self, deployment: Option<&str>) -> Result<Arc<dyn StoreClient>> {
        let handle = self.handle(deployment)?;
        let client = self.factory.create_client(&handle).await?;

        bootstrap::delete_table(&handle, client.as_ref()).await?;
        self.cold_start.clear(&handle.cold_start_key()).await;

        Ok(client)
    }

    /// Reverses applied migrations down to a named checkpoint.
    ///
    /// Bootstraps the table first, like the connect path, then runs the
    /// down steps; the cold-start gate is not consulted.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMigration` for a target that is not in the list
    /// or was never applied, and propagates bootstrap and migration
    /// failures.
    pub async fn migrate_down_to(
        &self,
        migration_name: &str,
        migrations: &MigrationList,
        deployment: Option<&str>,
    ) -> Result<Arc<dyn StoreClient>> {
        let handle = self.handle(deployment)?;
        let client = self.factory.create_client(&handle).await?;

        bootstrap::assert_table(&handle, client.as_ref()).await?;
        bootstrap::assert_table_active(&handle, client.as_ref(), &self.bootstrap).await?;
        migrations::migrate_down_to(migration_name, &handle, migrations, client.as_ref()).await?;

        Ok(client)
    }

    /// Starts the local store emulator on the configured port.
    ///
    /// Starting an already-running emulator is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the emulator fails to start.
    #[cfg(feature = "local-emulator")]
    pub async fn start_local(&self) -> Result<()> {
        self.factory.start_local().await
    }

    /// Stops the local store emulator and forgets the local table's
    /// cold-start entry, so the next connect reinitializes.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the local handle cannot be
    /// resolved.
    #[cfg(feature = "local-emulator")]
    pub async fn stop_local(&self) -> Result<()> {
        self.factory.stop_local().await;
        let handle = TableHandle::resolve(&self.config, LOCAL_DEPLOYMENT)?;
        self.cold_start.clear(&handle.cold_start_key()).await;
        Ok(())
    }
}

#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # tabula
//!
//! A library for managing deployment-scoped key-value tables and their
//! schema migrations.
//!
//! Each package configuration describes one logical table across named
//! deployment environments (a local in-process emulator or a remote
//! managed instance). The library resolves a deployment to a store
//! client, bootstraps the backing table, and runs ordered migrations
//! exactly once per process lifetime through a cold-start cache.
//!
//! ## Core Types
//!
//! - [`PackageConfig`] and [`TableHandle`]: deployment configuration
//! - [`StoreClient`] and [`ClientFactory`]: store access
//! - [`Migration`] and [`MigrationList`]: ordered schema migrations
//! - [`TableManager`]: the idempotent connect/teardown entry point
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use tabula::config::{resolve_deployment, PackageConfig, TableHandle};
//!
//! let config = PackageConfig {
//!     name: "orders".to_string(),
//!     table_name: "orders-local".to_string(),
//!     deployments: Vec::new(),
//! };
//!
//! let deployment = resolve_deployment(Some("local"));
//! let handle = TableHandle::resolve(&config, &deployment).unwrap();
//! assert_eq!(handle.cold_start_key(), "local-orders-local");
//! ```

pub mod bootstrap;
pub mod cli;
pub mod client;
pub mod coldstart;
pub mod config;
#[cfg(feature = "local-emulator")]
pub mod emulator;
pub mod error;
pub mod logging;
pub mod manager;
pub mod migrations;

// Re-export key types at crate root for convenience
pub use bootstrap::{assert_table, assert_table_active, delete_table, BootstrapOptions};
pub use client::{
    ClientFactory, CredentialProvider, Credentials, ProfileCredentialProvider, RemoteStoreClient,
    StoreClient, StoreItem, TableSpec, TableStatus,
};
pub use coldstart::ColdStartCache;
pub use config::{
    resolve_deployment, ConfigLoader, DeploymentConfig, PackageConfig, TableHandle,
    ThroughputConfig,
};
#[cfg(feature = "local-emulator")]
pub use emulator::{EmulatorConfig, EmulatorRegistry, LocalEmulator, LocalStoreClient};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use manager::TableManager;
pub use migrations::{
    migrate_down_to, perform_migrations, Migration, MigrationContext, MigrationList,
};

//! Deployment configuration for table packages.
//!
//! This module defines the package configuration schema (one logical
//! table, many named deployments), the YAML loader, and deployment name
//! resolution.
//!
//! # Examples
//!
//! ```
//! use tabula::config::{resolve_deployment, PackageConfig, TableHandle};
//!
//! let yaml = r#"
//! name: orders
//! table_name: orders-local
//! deployments:
//!   - name: prod
//!     table_name: orders-prod
//!     region: eu-central-1
//!     endpoint: https://tables.example.com
//!     credentials_profile: prod-tables
//! "#;
//! let config = PackageConfig::from_yaml(yaml).unwrap();
//! let handle = TableHandle::resolve(&config, "prod").unwrap();
//! assert_eq!(handle.table_name, "orders-prod");
//! ```

mod loader;
mod resolver;
mod schema;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use loader::{ConfigLoader, CONFIG_FILE_NAME};
pub use resolver::{resolve_deployment, DEPLOYMENT_ENV_VAR, LOCAL_DEPLOYMENT};
pub use schema::{DeploymentConfig, PackageConfig, TableHandle, ThroughputConfig};

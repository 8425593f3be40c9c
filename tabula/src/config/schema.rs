//! Configuration schema definitions.
//!
//! A package configuration describes one logical table and the named
//! deployments it can be provisioned into. Configurations arrive
//! pre-validated from an external collaborator (a config file or an
//! embedding application); this module only enforces structural rules
//! such as deployment name uniqueness.

use serde::{Deserialize, Serialize};

use crate::config::resolver::LOCAL_DEPLOYMENT;
use crate::error::{Error, Result};

/// Package-level configuration for one logical table.
///
/// # Examples
///
/// ```
/// use tabula::config::PackageConfig;
///
/// let config = PackageConfig {
///     name: "orders".to_string(),
///     table_name: "orders-local".to_string(),
///     deployments: Vec::new(),
/// };
/// assert_eq!(config.table_name("local").unwrap(), "orders-local");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    /// Package identifier.
    pub name: String,

    /// Base table name, used for deployments without an override
    /// (in particular the local emulator deployment).
    pub table_name: String,

    /// Named deployments this package can connect to.
    #[serde(default)]
    pub deployments: Vec<DeploymentConfig>,
}

/// Configuration of one named deployment.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    /// Deployment name (e.g. `dev`, `prod`).
    pub name: String,

    /// Table name override for this deployment.
    #[serde(default)]
    pub table_name: Option<String>,

    /// Region the deployment's table lives in.
    pub region: String,

    /// Endpoint URL of the managed table service.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Credential profile consulted when no environment credentials
    /// are present.
    #[serde(default)]
    pub credentials_profile: Option<String>,

    /// Provisioned throughput; `None` means on-demand billing.
    #[serde(default)]
    pub throughput: Option<ThroughputConfig>,
}

/// Provisioned throughput settings for a table.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ThroughputConfig {
    /// Provisioned read capacity units.
    pub read_units: u64,
    /// Provisioned write capacity units.
    pub write_units: u64,
}

impl PackageConfig {
    /// Parses a package configuration from a YAML string and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the configuration
    /// violates structural rules (duplicate deployment names).
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates structural rules on the configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if two deployments share a name.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for deployment in &self.deployments {
            if !seen.insert(deployment.name.as_str()) {
                return Err(Error::configuration(
                    "deployments",
                    format!("duplicate deployment name '{}'", deployment.name),
                ));
            }
        }
        Ok(())
    }

    /// Looks up the configuration for a named deployment.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if no deployment with that name
    /// exists. The local deployment does not require an entry; callers
    /// handling `local` should check [`Self::table_name`] instead.
    pub fn deployment(&self, name: &str) -> Result<&DeploymentConfig> {
        self.deployments
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| {
                Error::configuration("deployment", format!("unknown deployment '{name}'"))
            })
    }

    /// Returns the table name for a deployment.
    ///
    /// The local deployment falls back to the package's base table name
    /// when it has no explicit entry; any other deployment must be
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for an unknown non-local
    /// deployment.
    pub fn table_name(&self, deployment_name: &str) -> Result<String> {
        match self.deployments.iter().find(|d| d.name == deployment_name) {
            Some(deployment) => Ok(deployment
                .table_name
                .clone()
                .unwrap_or_else(|| self.table_name.clone())),
            None if deployment_name == LOCAL_DEPLOYMENT => Ok(self.table_name.clone()),
            None => Err(Error::configuration(
                "deployment",
                format!("unknown deployment '{deployment_name}'"),
            )),
        }
    }
}

/// Identity of one logical table in one deployment.
///
/// Derived deterministically from a [`PackageConfig`] and a deployment
/// name; immutable once resolved and never persisted.
///
/// # Examples
///
/// ```
/// use tabula::config::{PackageConfig, TableHandle};
///
/// let config = PackageConfig {
///     name: "orders".to_string(),
///     table_name: "orders-local".to_string(),
///     deployments: Vec::new(),
/// };
/// let handle = TableHandle::resolve(&config, "local").unwrap();
/// assert!(handle.is_local());
/// assert_eq!(handle.cold_start_key(), "local-orders-local");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableHandle {
    /// Deployment name this handle is bound to.
    pub deployment: String,
    /// Concrete table name.
    pub table_name: String,
    /// Region of the table; `local` for the emulator.
    pub region: String,
    /// Endpoint of the managed table service, if remote.
    pub endpoint: Option<String>,
    /// Credential profile for non-environment credential resolution.
    pub credentials_profile: Option<String>,
    /// Provisioned throughput; `None` means on-demand.
    pub throughput: Option<ThroughputConfig>,
}

impl TableHandle {
    /// Resolves a handle for a deployment from package configuration.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for an unknown non-local
    /// deployment.
    pub fn resolve(config: &PackageConfig, deployment_name: &str) -> Result<Self> {
        if deployment_name == LOCAL_DEPLOYMENT
            && !config.deployments.iter().any(|d| d.name == LOCAL_DEPLOYMENT)
        {
            return Ok(Self {
                deployment: LOCAL_DEPLOYMENT.to_string(),
                table_name: config.table_name.clone(),
                region: LOCAL_DEPLOYMENT.to_string(),
                endpoint: None,
                credentials_profile: None,
                throughput: None,
            });
        }

        let deployment = config.deployment(deployment_name)?;
        Ok(Self {
            deployment: deployment.name.clone(),
            table_name: deployment
                .table_name
                .clone()
                .unwrap_or_else(|| config.table_name.clone()),
            region: deployment.region.clone(),
            endpoint: deployment.endpoint.clone(),
            credentials_profile: deployment.credentials_profile.clone(),
            throughput: deployment.throughput,
        })
    }

    /// Whether this handle targets the local emulator.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.deployment == LOCAL_DEPLOYMENT
    }

    /// Cold-start memo key for this (deployment, table) pair.
    ///
    /// `local-<table>` for the emulator, `<region>-<deployment>-<table>`
    /// otherwise.
    #[must_use]
    pub fn cold_start_key(&self) -> String {
        if self.is_local() {
            format!("local-{}", self.table_name)
        } else {
            format!("{}-{}-{}", self.region, self.deployment, self.table_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote_config() -> PackageConfig {
        PackageConfig {
            name: "orders".to_string(),
            table_name: "orders-local".to_string(),
            deployments: vec![DeploymentConfig {
                name: "prod".to_string(),
                table_name: Some("orders-prod".to_string()),
                region: "eu-central-1".to_string(),
                endpoint: Some("https://tables.example.com".to_string()),
                credentials_profile: Some("prod-tables".to_string()),
                throughput: Some(ThroughputConfig {
                    read_units: 5,
                    write_units: 5,
                }),
            }],
        }
    }

    #[test]
    fn test_duplicate_deployment_names_rejected() {
        let mut config = remote_config();
        config.deployments.push(config.deployments[0].clone());
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(format!("{err}").contains("duplicate deployment name"));
    }

    #[test]
    fn test_table_name_uses_override() {
        let config = remote_config();
        assert_eq!(config.table_name("prod").unwrap(), "orders-prod");
    }

    #[test]
    fn test_table_name_local_fallback() {
        let config = remote_config();
        assert_eq!(config.table_name("local").unwrap(), "orders-local");
    }

    #[test]
    fn test_table_name_unknown_deployment() {
        let config = remote_config();
        assert!(config.table_name("staging").unwrap_err().is_configuration());
    }

    #[test]
    fn test_resolve_local_handle() {
        let config = remote_config();
        let handle = TableHandle::resolve(&config, "local").unwrap();
        assert!(handle.is_local());
        assert_eq!(handle.table_name, "orders-local");
        assert_eq!(handle.cold_start_key(), "local-orders-local");
    }

    #[test]
    fn test_resolve_remote_handle() {
        let config = remote_config();
        let handle = TableHandle::resolve(&config, "prod").unwrap();
        assert!(!handle.is_local());
        assert_eq!(
            handle.cold_start_key(),
            "eu-central-1-prod-orders-prod"
        );
        assert_eq!(handle.credentials_profile.as_deref(), Some("prod-tables"));
    }

    #[test]
    fn test_resolve_unknown_deployment_fails() {
        let config = remote_config();
        let err = TableHandle::resolve(&config, "staging").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_from_yaml_round_trip() {
        let yaml = r"
name: orders
table_name: orders-local
deployments:
  - name: prod
    table_name: orders-prod
    region: eu-central-1
    throughput:
      read_units: 5
      write_units: 5
";
        let config = PackageConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.deployments.len(), 1);
        assert_eq!(
            config.deployments[0].throughput,
            Some(ThroughputConfig {
                read_units: 5,
                write_units: 5
            })
        );
    }

    #[test]
    fn test_from_yaml_rejects_unknown_fields() {
        let yaml = "name: orders\ntable_name: t\nbilling: on-demand\n";
        assert!(PackageConfig::from_yaml(yaml).is_err());
    }
}

//! Property-based tests for deployment resolution and handle derivation.

use super::resolver::resolve_deployment;
use super::schema::{DeploymentConfig, PackageConfig, TableHandle};
use proptest::prelude::*;

// Strategy for plausible deployment/table identifiers; "local" is
// reserved for the emulator deployment
fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,19}".prop_filter("local is reserved", |s| s != "local")
}

fn package_strategy() -> impl Strategy<Value = PackageConfig> {
    (ident_strategy(), ident_strategy(), ident_strategy(), ident_strategy()).prop_map(
        |(name, table_name, deployment, region)| PackageConfig {
            name,
            table_name: table_name.clone(),
            deployments: vec![DeploymentConfig {
                name: deployment,
                table_name: Some(format!("{table_name}-remote")),
                region,
                endpoint: None,
                credentials_profile: None,
                throughput: None,
            }],
        },
    )
}

proptest! {
    // Explicit non-empty names resolve to themselves regardless of environment
    #[test]
    fn explicit_deployment_name_round_trips(name in "[a-z][a-z0-9-]{0,19}") {
        prop_assert_eq!(resolve_deployment(Some(&name)), name);
    }

    // Handle derivation is deterministic
    #[test]
    fn handle_resolution_is_deterministic(config in package_strategy()) {
        let deployment = config.deployments[0].name.clone();
        let first = TableHandle::resolve(&config, &deployment).unwrap();
        let second = TableHandle::resolve(&config, &deployment).unwrap();
        prop_assert_eq!(first, second);
    }

    // Local and remote cold-start keys for the same package never collide
    #[test]
    fn cold_start_keys_distinguish_deployments(config in package_strategy()) {
        let deployment = config.deployments[0].name.clone();
        let local = TableHandle::resolve(&config, "local").unwrap();
        let remote = TableHandle::resolve(&config, &deployment).unwrap();
        prop_assert_ne!(local.cold_start_key(), remote.cold_start_key());
    }
}

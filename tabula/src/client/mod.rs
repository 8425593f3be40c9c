//! Store client abstraction.
//!
//! A [`StoreClient`] is the seam between the lifecycle machinery and a
//! concrete key-value table store: the in-process local emulator or the
//! remote managed service. Constructing a client never performs I/O;
//! the first network or database call happens when an operation runs.

mod credentials;
mod factory;
mod remote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{TableHandle, ThroughputConfig};
use crate::error::Result;

pub use credentials::{
    Credentials, CredentialProvider, ProfileCredentialProvider, ACCESS_KEY_ENV_VAR,
    SECRET_KEY_ENV_VAR,
};
#[cfg(test)]
pub use credentials::MockCredentialProvider;
pub use factory::{ClientFactory, DEFAULT_LOCAL_PORT};
pub use remote::RemoteStoreClient;

/// Lifecycle status of a table as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    /// The table is being provisioned and cannot serve requests yet.
    Creating,
    /// The table is ready for use.
    Active,
    /// The table is being deleted.
    Deleting,
}

/// Creation parameters for a table.
///
/// Every table uses the same two-part key schema (partition key plus
/// sort key); only identity and throughput vary per deployment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TableSpec {
    /// Name of the table to create.
    pub table_name: String,
    /// Provisioned throughput; `None` requests on-demand billing.
    pub throughput: Option<ThroughputConfig>,
}

impl TableSpec {
    /// Builds the creation spec for a resolved table handle.
    #[must_use]
    pub fn for_handle(handle: &TableHandle) -> Self {
        Self {
            table_name: handle.table_name.clone(),
            throughput: handle.throughput,
        }
    }
}

/// One item in a table: a two-part key plus a JSON attribute map.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StoreItem {
    /// Partition key of the item.
    pub partition_key: String,
    /// Sort key of the item.
    pub sort_key: String,
    /// Attribute payload.
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl StoreItem {
    /// Creates an item with an empty attribute map.
    #[must_use]
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
            attributes: serde_json::Map::new(),
        }
    }

    /// Adds an attribute to the item.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Operations every table store backend must provide.
///
/// Implementations must treat `create_table` for an existing table and
/// `delete_table` for a missing table as success, so that concurrent
/// bootstrap attempts and repeated teardowns are safe.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Returns the status of a table, or `None` if it does not exist.
    async fn table_status(&self, table: &str) -> Result<Option<TableStatus>>;

    /// Creates a table; creating an existing table is a no-op.
    async fn create_table(&self, spec: &TableSpec) -> Result<()>;

    /// Deletes a table and all its items; a missing table is success.
    async fn delete_table(&self, table: &str) -> Result<()>;

    /// Writes an item, replacing any existing item with the same key.
    async fn put_item(&self, table: &str, item: &StoreItem) -> Result<()>;

    /// Deletes an item by key; a missing item is success.
    async fn delete_item(&self, table: &str, partition_key: &str, sort_key: &str) -> Result<()>;

    /// Returns all items in a partition, ordered by sort key.
    async fn query_partition(&self, table: &str, partition_key: &str) -> Result<Vec<StoreItem>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_item_builder() {
        let item = StoreItem::new("#migrations", "init")
            .with_attribute("applied_at", serde_json::json!("2026-01-01T00:00:00Z"));
        assert_eq!(item.partition_key, "#migrations");
        assert_eq!(item.sort_key, "init");
        assert_eq!(item.attributes.len(), 1);
    }

    #[test]
    fn test_table_status_serialization() {
        let status: TableStatus = serde_json::from_value(serde_json::json!("ACTIVE")).unwrap();
        assert_eq!(status, TableStatus::Active);
        assert_eq!(
            serde_json::to_value(TableStatus::Creating).unwrap(),
            serde_json::json!("CREATING")
        );
    }

    #[test]
    fn test_table_spec_for_handle() {
        let handle = TableHandle {
            deployment: "prod".to_string(),
            table_name: "orders-prod".to_string(),
            region: "eu-central-1".to_string(),
            endpoint: None,
            credentials_profile: None,
            throughput: None,
        };
        let spec = TableSpec::for_handle(&handle);
        assert_eq!(spec.table_name, "orders-prod");
        assert!(spec.throughput.is_none());
    }
}

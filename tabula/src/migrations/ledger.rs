//! The applied-migration ledger.
//!
//! Which migrations have run is recorded inside the table itself, as
//! items under a reserved partition key: one item per applied
//! migration, keyed by its name, carrying the application timestamp.
//! The ledger stores membership only; ordering always derives from the
//! migration list's declaration order.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::client::{StoreClient, StoreItem};
use crate::error::Result;

/// Reserved partition key under which ledger items live.
pub const LEDGER_PARTITION_KEY: &str = "#migrations";

/// Attribute holding the RFC 3339 application timestamp.
pub const APPLIED_AT_ATTRIBUTE: &str = "applied_at";

/// Read/append access to one table's migration ledger.
pub struct MigrationLedger<'a> {
    client: &'a dyn StoreClient,
    table_name: &'a str,
}

impl<'a> MigrationLedger<'a> {
    /// Creates a ledger view over a table.
    #[must_use]
    pub fn new(client: &'a dyn StoreClient, table_name: &'a str) -> Self {
        Self { client, table_name }
    }

    /// Names of all migrations recorded as applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger partition cannot be queried.
    pub async fn applied(&self) -> Result<HashSet<String>> {
        let items = self
            .client
            .query_partition(self.table_name, LEDGER_PARTITION_KEY)
            .await?;
        Ok(items.into_iter().map(|item| item.sort_key).collect())
    }

    /// Records a migration as applied, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger item cannot be written.
    pub async fn record(&self, name: &str) -> Result<()> {
        let item = StoreItem::new(LEDGER_PARTITION_KEY, name).with_attribute(
            APPLIED_AT_ATTRIBUTE,
            serde_json::json!(Utc::now().to_rfc3339()),
        );
        self.client.put_item(self.table_name, &item).await
    }

    /// Removes a migration's ledger record.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger item cannot be deleted.
    pub async fn remove(&self, name: &str) -> Result<()> {
        self.client
            .delete_item(self.table_name, LEDGER_PARTITION_KEY, name)
            .await
    }

    /// When a migration was applied, if it is recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger partition cannot be queried.
    pub async fn applied_at(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        let items = self
            .client
            .query_partition(self.table_name, LEDGER_PARTITION_KEY)
            .await?;
        Ok(items
            .into_iter()
            .find(|item| item.sort_key == name)
            .and_then(|item| {
                item.attributes
                    .get(APPLIED_AT_ATTRIBUTE)
                    .and_then(|value| value.as_str())
                    .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            })
            .map(|stamp| stamp.with_timezone(&Utc)))
    }
}

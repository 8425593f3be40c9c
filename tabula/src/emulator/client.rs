//! `StoreClient` implementation backed by the emulator's SQLite database.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use crate::client::{StoreClient, StoreItem, TableSpec, TableStatus};
use crate::error::{Error, Result};

use super::schema::{
    DELETE_ITEM, DELETE_TABLE, DELETE_TABLE_ITEMS, INSERT_TABLE, SELECT_PARTITION,
    SELECT_TABLE_STATUS, UPSERT_ITEM,
};

/// Client handle onto a running local emulator.
///
/// Cheap to clone; all handles for one emulator share its connection.
#[derive(Clone)]
pub struct LocalStoreClient {
    conn: Arc<Mutex<Connection>>,
}

impl LocalStoreClient {
    pub(super) fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn parse_status(raw: &str) -> Result<TableStatus> {
        match raw {
            "CREATING" => Ok(TableStatus::Creating),
            "ACTIVE" => Ok(TableStatus::Active),
            "DELETING" => Ok(TableStatus::Deleting),
            other => Err(Error::Store {
                operation: "table_status".to_string(),
                message: format!("unrecognized table status '{other}'"),
            }),
        }
    }
}

#[async_trait]
impl StoreClient for LocalStoreClient {
    async fn table_status(&self, table: &str) -> Result<Option<TableStatus>> {
        let conn = self.conn.lock().await;
        let raw: Option<String> = conn
            .query_row(SELECT_TABLE_STATUS, [table], |row| row.get(0))
            .optional()?;
        raw.as_deref().map(Self::parse_status).transpose()
    }

    async fn create_table(&self, spec: &TableSpec) -> Result<()> {
        let conn = self.conn.lock().await;
        // The emulator provisions instantly, so tables are born active.
        conn.execute(
            INSERT_TABLE,
            params![
                spec.table_name,
                "ACTIVE",
                chrono::Utc::now().timestamp()
            ],
        )?;
        Ok(())
    }

    async fn delete_table(&self, table: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(DELETE_TABLE_ITEMS, [table])?;
        conn.execute(DELETE_TABLE, [table])?;
        Ok(())
    }

    async fn put_item(&self, table: &str, item: &StoreItem) -> Result<()> {
        let attributes = serde_json::to_string(&item.attributes)?;
        let conn = self.conn.lock().await;
        conn.execute(
            UPSERT_ITEM,
            params![table, item.partition_key, item.sort_key, attributes],
        )?;
        Ok(())
    }

    async fn delete_item(&self, table: &str, partition_key: &str, sort_key: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(DELETE_ITEM, params![table, partition_key, sort_key])?;
        Ok(())
    }

    async fn query_partition(&self, table: &str, partition_key: &str) -> Result<Vec<StoreItem>> {
        let rows: Vec<(String, String, String)> = {
            let conn = self.conn.lock().await;
            let mut statement = conn.prepare(SELECT_PARTITION)?;
            let mapped = statement.query_map(params![table, partition_key], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?;
            mapped.collect::<rusqlite::Result<_>>()?
        };

        rows.into_iter()
            .map(|(partition_key, sort_key, attributes)| {
                Ok(StoreItem {
                    partition_key,
                    sort_key,
                    attributes: serde_json::from_str(&attributes)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::{EmulatorConfig, LocalEmulator};

    fn test_client() -> LocalStoreClient {
        LocalEmulator::start(EmulatorConfig::new(8000)).unwrap().client()
    }

    #[tokio::test]
    async fn test_missing_table_has_no_status() {
        let client = test_client();
        assert_eq!(client.table_status("orders").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_table_is_idempotent() {
        let client = test_client();
        let spec = TableSpec {
            table_name: "orders".to_string(),
            throughput: None,
        };
        client.create_table(&spec).await.unwrap();
        client.create_table(&spec).await.unwrap();
        assert_eq!(
            client.table_status("orders").await.unwrap(),
            Some(TableStatus::Active)
        );
    }

    #[tokio::test]
    async fn test_item_round_trip_ordered_by_sort_key() {
        let client = test_client();
        let spec = TableSpec {
            table_name: "orders".to_string(),
            throughput: None,
        };
        client.create_table(&spec).await.unwrap();

        for name in ["beta", "alpha"] {
            let item = StoreItem::new("#migrations", name)
                .with_attribute("applied_at", serde_json::json!("2026-01-01T00:00:00Z"));
            client.put_item("orders", &item).await.unwrap();
        }

        let items = client.query_partition("orders", "#migrations").await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.sort_key.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);

        client.delete_item("orders", "#migrations", "alpha").await.unwrap();
        let items = client.query_partition("orders", "#migrations").await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_table_succeeds() {
        let client = test_client();
        client.delete_table("never-created").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_table_drops_items() {
        let client = test_client();
        let spec = TableSpec {
            table_name: "orders".to_string(),
            throughput: None,
        };
        client.create_table(&spec).await.unwrap();
        client
            .put_item("orders", &StoreItem::new("#migrations", "init"))
            .await
            .unwrap();

        client.delete_table("orders").await.unwrap();
        assert_eq!(client.table_status("orders").await.unwrap(), None);

        // Recreating starts from scratch.
        client.create_table(&spec).await.unwrap();
        let items = client.query_partition("orders", "#migrations").await.unwrap();
        assert!(items.is_empty());
    }
}

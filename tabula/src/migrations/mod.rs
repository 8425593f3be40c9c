//! Ordered schema migrations with a persisted ledger.
//!
//! Migrations are named steps with forward (`up`) and reverse (`down`)
//! logic, supplied by the caller as a [`MigrationList`] whose
//! declaration order is the schema version order. Which steps have run
//! is recorded in a ledger kept inside the table itself; see
//! [`ledger`] for the item layout and [`runner`] for the up/down
//! drivers.

pub mod ledger;
mod runner;

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::StoreClient;
use crate::error::{Error, Result};

pub use runner::{migrate_down_to, perform_migrations};

/// Context handed to each migration step.
pub struct MigrationContext<'a> {
    /// Client for the store the table lives in.
    pub client: &'a dyn StoreClient,
    /// Name of the table being migrated.
    pub table_name: &'a str,
}

/// One named schema or data transformation step.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use tabula::{Migration, MigrationContext, Result, StoreItem};
///
/// struct SeedSettings;
///
/// #[async_trait]
/// impl Migration for SeedSettings {
///     fn name(&self) -> &str {
///         "seedSettings"
///     }
///
///     async fn up(&self, context: &MigrationContext<'_>) -> Result<()> {
///         let item = StoreItem::new("settings", "default");
///         context.client.put_item(context.table_name, &item).await
///     }
///
///     async fn down(&self, context: &MigrationContext<'_>) -> Result<()> {
///         context
///             .client
///             .delete_item(context.table_name, "settings", "default")
///             .await
///     }
/// }
/// ```
#[async_trait]
pub trait Migration: Send + Sync {
    /// Unique name of this migration.
    fn name(&self) -> &str;

    /// Applies the migration.
    async fn up(&self, context: &MigrationContext<'_>) -> Result<()>;

    /// Reverses the migration.
    async fn down(&self, context: &MigrationContext<'_>) -> Result<()>;
}

/// An ordered list of migrations.
///
/// Declaration order defines the total order in which migrations apply;
/// duplicate names are rejected at construction so that the order is
/// unambiguous.
#[derive(Clone)]
pub struct MigrationList {
    entries: Vec<Arc<dyn Migration>>,
}

impl MigrationList {
    /// Builds a list from migrations in declaration order.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if two migrations share a name.
    pub fn new(entries: Vec<Arc<dyn Migration>>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name().to_string()) {
                return Err(Error::configuration(
                    "migrations",
                    format!("duplicate migration name '{}'", entry.name()),
                ));
            }
        }
        Ok(Self { entries })
    }

    /// An empty migration list.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Iterates migrations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Migration>> {
        self.entries.iter()
    }

    /// Position of a migration in declaration order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name() == name)
    }

    /// Number of migrations in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

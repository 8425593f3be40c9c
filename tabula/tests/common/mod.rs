//! Common test utilities for integration tests.
//!
//! Provides a package configuration fixture, a manager wired to the
//! in-process emulator, and a migration type that records every up and
//! down step it runs.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tabula::{
    Migration, MigrationContext, MigrationList, PackageConfig, Result, StoreItem, TableManager,
};

/// Package configuration with only the implicit local deployment.
#[allow(dead_code)]
pub fn local_package() -> PackageConfig {
    PackageConfig {
        name: "orders".to_string(),
        table_name: "orders-local".to_string(),
        deployments: Vec::new(),
    }
}

/// Manager for the local package.
#[allow(dead_code)]
pub fn local_manager() -> TableManager {
    TableManager::new(local_package()).unwrap()
}

/// Shared journal of migration steps, in execution order.
///
/// Entries look like `up:init` and `down:addIndex`.
pub type StepJournal = Arc<Mutex<Vec<String>>>;

/// A migration that journals its steps and writes a marker item so the
/// table's content reflects which migrations are currently applied.
pub struct RecordingMigration {
    name: String,
    journal: StepJournal,
}

impl RecordingMigration {
    pub fn new(name: &str, journal: &StepJournal) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            journal: Arc::clone(journal),
        })
    }
}

#[async_trait]
impl Migration for RecordingMigration {
    fn name(&self) -> &str {
        &self.name
    }

    async fn up(&self, context: &MigrationContext<'_>) -> Result<()> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("up:{}", self.name));
        let marker = StoreItem::new("schema", &self.name);
        context.client.put_item(context.table_name, &marker).await
    }

    async fn down(&self, context: &MigrationContext<'_>) -> Result<()> {
        self.journal
            .lock()
            .unwrap()
            .push(format!("down:{}", self.name));
        context
            .client
            .delete_item(context.table_name, "schema", &self.name)
            .await
    }
}

/// Builds a migration list of recording migrations sharing one journal.
#[allow(dead_code)]
pub fn recording_migrations(names: &[&str], journal: &StepJournal) -> MigrationList {
    MigrationList::new(
        names
            .iter()
            .map(|name| RecordingMigration::new(name, journal) as Arc<dyn Migration>)
            .collect(),
    )
    .unwrap()
}

/// Creates an empty shared step journal.
#[allow(dead_code)]
pub fn journal() -> StepJournal {
    Arc::new(Mutex::new(Vec::new()))
}

/// Snapshot of the journal's contents.
#[allow(dead_code)]
pub fn steps(journal: &StepJournal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

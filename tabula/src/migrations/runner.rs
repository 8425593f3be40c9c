//! Drivers applying migrations up to latest or down to a checkpoint.

use std::sync::Arc;

use crate::client::StoreClient;
use crate::config::TableHandle;
use crate::error::{Error, Result};

use super::ledger::MigrationLedger;
use super::{Migration, MigrationContext, MigrationList};

/// Applies every migration not yet recorded in the ledger, in
/// declaration order, appending a ledger record per success.
///
/// Running twice with an unchanged list applies each migration at most
/// once; the second run is a no-op. Returns the names applied by this
/// run.
///
/// # Errors
///
/// A failing migration halts the run with `Migration { name }`;
/// migrations applied earlier in the run keep their ledger records.
pub async fn perform_migrations(
    handle: &TableHandle,
    migrations: &MigrationList,
    client: &dyn StoreClient,
) -> Result<Vec<String>> {
    let ledger = MigrationLedger::new(client, &handle.table_name);
    let applied = ledger.applied().await?;
    let context = MigrationContext {
        client,
        table_name: &handle.table_name,
    };

    let mut ran = Vec::new();
    for migration in migrations.iter() {
        if applied.contains(migration.name()) {
            continue;
        }
        log::info!("migrating {} up: {}", handle.table_name, migration.name());
        migration
            .up(&context)
            .await
            .map_err(|source| Error::Migration {
                name: migration.name().to_string(),
                source: Box::new(source),
            })?;
        ledger.record(migration.name()).await?;
        ran.push(migration.name().to_string());
    }
    Ok(ran)
}

/// Reverses applied migrations, most recent first, until `target_name`
/// is the latest applied record.
///
/// Returns the names undone, in the order they were reversed. The
/// target itself stays applied.
///
/// # Errors
///
/// Returns `UnknownMigration` before any down step runs if the target
/// is not in the list or was never applied. A failing down step halts
/// the run with `Migration { name }`; records for steps not yet undone
/// are preserved.
pub async fn migrate_down_to(
    target_name: &str,
    handle: &TableHandle,
    migrations: &MigrationList,
    client: &dyn StoreClient,
) -> Result<Vec<String>> {
    let target_position = migrations
        .position(target_name)
        .ok_or_else(|| Error::UnknownMigration {
            name: target_name.to_string(),
        })?;

    let ledger = MigrationLedger::new(client, &handle.table_name);
    let applied = ledger.applied().await?;
    if !applied.contains(target_name) {
        return Err(Error::UnknownMigration {
            name: target_name.to_string(),
        });
    }

    let to_undo: Vec<Arc<dyn Migration>> = migrations
        .iter()
        .skip(target_position + 1)
        .filter(|migration| applied.contains(migration.name()))
        .cloned()
        .collect();

    let context = MigrationContext {
        client,
        table_name: &handle.table_name,
    };

    let mut undone = Vec::new();
    for migration in to_undo.iter().rev() {
        log::info!("migrating {} down: {}", handle.table_name, migration.name());
        migration
            .down(&context)
            .await
            .map_err(|source| Error::Migration {
                name: migration.name().to_string(),
                source: Box::new(source),
            })?;
        ledger.remove(migration.name()).await?;
        undone.push(migration.name().to_string());
    }
    Ok(undone)
}

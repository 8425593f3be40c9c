//! Integration tests for table bootstrap and teardown.
//!
//! This test suite verifies that:
//! - Deleting a table that does not exist succeeds
//! - A deleted table is recreated from scratch by the next bootstrap
//! - `assert_table` is idempotent once the table is visible

#![cfg(feature = "local-emulator")]

mod common;
use common::{journal, local_manager, recording_migrations};

use tabula::migrations::ledger::MigrationLedger;
use tabula::{
    assert_table, assert_table_active, BootstrapOptions, EmulatorConfig, LocalEmulator,
    StoreClient, TableHandle, TableStatus,
};

fn local_handle() -> TableHandle {
    TableHandle {
        deployment: "local".to_string(),
        table_name: "orders-local".to_string(),
        region: "local".to_string(),
        endpoint: None,
        credentials_profile: None,
        throughput: None,
    }
}

#[tokio::test]
async fn test_delete_missing_table_then_recreate() {
    let handle = local_handle();
    let client = LocalEmulator::start(EmulatorConfig::new(8000))
        .unwrap()
        .client();

    // Deleting a table that never existed is success.
    tabula::delete_table(&handle, &client).await.unwrap();

    // A subsequent bootstrap recreates it from scratch.
    assert_table(&handle, &client).await.unwrap();
    assert_table_active(&handle, &client, &BootstrapOptions::default())
        .await
        .unwrap();
    assert_eq!(
        client.table_status("orders-local").await.unwrap(),
        Some(TableStatus::Active)
    );
}

#[tokio::test]
async fn test_assert_table_is_idempotent() {
    let handle = local_handle();
    let client = LocalEmulator::start(EmulatorConfig::new(8000))
        .unwrap()
        .client();

    assert_table(&handle, &client).await.unwrap();
    assert_table(&handle, &client).await.unwrap();
    assert_eq!(
        client.table_status("orders-local").await.unwrap(),
        Some(TableStatus::Active)
    );
}

#[tokio::test]
async fn test_deleted_table_loses_ledger_and_remigrates() {
    let manager = local_manager();
    manager.start_local().await.unwrap();

    let journal = journal();
    let migrations = recording_migrations(&["init", "addIndex"], &journal);

    manager.connect(&migrations, None).await.unwrap();
    let client = manager.delete_table(None).await.unwrap();

    // Ledger gone with the table.
    assert_eq!(
        client.table_status("orders-local").await.unwrap(),
        None
    );

    // Connect re-bootstraps and re-runs every migration.
    let client = manager.connect(&migrations, None).await.unwrap();
    let ledger = MigrationLedger::new(client.as_ref(), "orders-local");
    assert_eq!(ledger.applied().await.unwrap().len(), 2);
    assert_eq!(
        common::steps(&journal),
        vec!["up:init", "up:addIndex", "up:init", "up:addIndex"]
    );
}

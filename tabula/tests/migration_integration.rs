//! Integration tests for the migration runner against the emulator.
//!
//! This test suite verifies that:
//! - Migrations apply in declaration order and are recorded in the ledger
//! - `perform_migrations` is idempotent across repeated runs
//! - `migrate_down_to` reverses most-recent-first down to the checkpoint
//! - Down-then-up round-trips restore the full applied set in order

#![cfg(feature = "local-emulator")]

mod common;
use common::{journal, recording_migrations, steps};

use tabula::migrations::ledger::MigrationLedger;
use tabula::{
    migrate_down_to, perform_migrations, EmulatorConfig, LocalEmulator, StoreClient, TableHandle,
    TableSpec,
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

async fn active_table() -> (TableHandle, impl StoreClient) {
    let handle = local_handle();
    let client = LocalEmulator::start(EmulatorConfig::new(8000))
        .unwrap()
        .client();
    client
        .create_table(&TableSpec::for_handle(&handle))
        .await
        .unwrap();
    (handle, client)
}

#[tokio::test]
async fn test_migrations_apply_in_declaration_order() {
    let (handle, client) = active_table().await;
    let journal = journal();
    let list = recording_migrations(&["init", "addIndex", "addField"], &journal);

    let ran = perform_migrations(&handle, &list, &client).await.unwrap();
    assert_eq!(ran, vec!["init", "addIndex", "addField"]);
    assert_eq!(steps(&journal), vec!["up:init", "up:addIndex", "up:addField"]);

    let ledger = MigrationLedger::new(&client, "orders-local");
    let applied = ledger.applied().await.unwrap();
    assert_eq!(applied.len(), 3);
    assert!(applied.contains("addField"));
}

#[tokio::test]
async fn test_perform_migrations_is_idempotent() {
    let (handle, client) = active_table().await;
    let journal = journal();
    let list = recording_migrations(&["init", "addIndex"], &journal);

    perform_migrations(&handle, &list, &client).await.unwrap();
    let second = perform_migrations(&handle, &list, &client).await.unwrap();

    assert!(second.is_empty());
    assert_eq!(steps(&journal), vec!["up:init", "up:addIndex"]);
}

#[tokio::test]
async fn test_only_pending_migrations_run() {
    let (handle, client) = active_table().await;
    let journal = journal();

    let initial = recording_migrations(&["init"], &journal);
    perform_migrations(&handle, &initial, &client).await.unwrap();

    // The list grows by one entry; only the new entry runs.
    let extended = recording_migrations(&["init", "addIndex"], &journal);
    let ran = perform_migrations(&handle, &extended, &client)
        .await
        .unwrap();
    assert_eq!(ran, vec!["addIndex"]);
    assert_eq!(steps(&journal), vec!["up:init", "up:addIndex"]);
}

#[tokio::test]
async fn test_migrate_down_to_reverses_most_recent_first() {
    let (handle, client) = active_table().await;
    let journal = journal();
    let list = recording_migrations(&["init", "addIndex", "addField"], &journal);

    perform_migrations(&handle, &list, &client).await.unwrap();
    let undone = migrate_down_to("init", &handle, &list, &client)
        .await
        .unwrap();

    assert_eq!(undone, vec!["addField", "addIndex"]);
    assert_eq!(
        steps(&journal),
        vec![
            "up:init",
            "up:addIndex",
            "up:addField",
            "down:addField",
            "down:addIndex"
        ]
    );

    let ledger = MigrationLedger::new(&client, "orders-local");
    let applied = ledger.applied().await.unwrap();
    assert_eq!(applied.len(), 1);
    assert!(applied.contains("init"));
}

#[tokio::test]
async fn test_down_then_up_round_trip() {
    let (handle, client) = active_table().await;
    let journal = journal();
    let list = recording_migrations(&["init", "addIndex", "addField"], &journal);

    perform_migrations(&handle, &list, &client).await.unwrap();
    migrate_down_to("init", &handle, &list, &client)
        .await
        .unwrap();

    // Re-running up re-applies exactly the undone migrations, in
    // original declaration order.
    let reapplied = perform_migrations(&handle, &list, &client).await.unwrap();
    assert_eq!(reapplied, vec!["addIndex", "addField"]);

    let ledger = MigrationLedger::new(&client, "orders-local");
    assert_eq!(ledger.applied().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_down_to_latest_applied_is_noop() {
    let (handle, client) = active_table().await;
    let journal = journal();
    let list = recording_migrations(&["init", "addIndex"], &journal);

    perform_migrations(&handle, &list, &client).await.unwrap();
    let undone = migrate_down_to("addIndex", &handle, &list, &client)
        .await
        .unwrap();

    assert!(undone.is_empty());
    assert_eq!(steps(&journal), vec!["up:init", "up:addIndex"]);
}

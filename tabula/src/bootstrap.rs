//! Table bootstrap and teardown.
//!
//! A table moves through `Absent -> Creating -> Active`; bootstrap
//! ensures it exists and waits for it to become active with a bounded,
//! fixed-interval poll. Teardown deletes the table unconditionally.
//! Invalidation of any cold-start entry after a delete is the caller's
//! concern.

use std::time::Duration;

use tokio::time::Instant;

use crate::client::{StoreClient, TableSpec, TableStatus};
use crate::config::TableHandle;
use crate::error::{Error, Result};

/// Polling budget for [`assert_table_active`].
///
/// # Examples
///
/// ```
/// use tabula::BootstrapOptions;
/// use std::time::Duration;
///
/// let options = BootstrapOptions::default()
///     .with_max_attempts(10)
///     .with_poll_interval(Duration::from_millis(500));
/// assert_eq!(options.max_attempts, 10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BootstrapOptions {
    /// Maximum number of status checks before giving up.
    pub max_attempts: u32,
    /// Fixed interval between status checks.
    pub poll_interval: Duration,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            poll_interval: Duration::from_secs(2),
        }
    }
}

impl BootstrapOptions {
    /// Sets the maximum number of status checks.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the interval between status checks.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Ensures the handle's table exists, creating it if absent.
///
/// Idempotent: once the table is visible, further calls are no-ops.
/// The create request itself is safe under race because the store
/// treats create-if-absent as a no-op for existing tables.
///
/// # Errors
///
/// Returns an error if the status check or create request fails.
pub async fn assert_table(handle: &TableHandle, client: &dyn StoreClient) -> Result<()> {
    if client.table_status(&handle.table_name).await?.is_none() {
        log::debug!(
            "creating table {} for deployment {}",
            handle.table_name,
            handle.deployment
        );
        client.create_table(&TableSpec::for_handle(handle)).await?;
    }
    Ok(())
}

/// Waits until the handle's table reports `Active`.
///
/// An already-active table returns immediately without sleeping. Each
/// further check waits one fixed `poll_interval`; only the calling task
/// suspends.
///
/// # Errors
///
/// Returns `TableNotReady` with attempt and elapsed-time context once
/// the polling budget is exhausted, and propagates status-check errors
/// immediately.
pub async fn assert_table_active(
    handle: &TableHandle,
    client: &dyn StoreClient,
    options: &BootstrapOptions,
) -> Result<()> {
    let started = Instant::now();

    for attempt in 1..=options.max_attempts {
        match client.table_status(&handle.table_name).await? {
            Some(TableStatus::Active) => return Ok(()),
            status => {
                log::debug!(
                    "table {} not active yet (attempt {attempt}/{}, status {status:?})",
                    handle.table_name,
                    options.max_attempts
                );
            }
        }
        if attempt < options.max_attempts {
            tokio::time::sleep(options.poll_interval).await;
        }
    }

    Err(Error::TableNotReady {
        table: handle.table_name.clone(),
        attempts: options.max_attempts,
        waited: started.elapsed(),
    })
}

/// Deletes the handle's table with all its data.
///
/// No existence pre-check: deleting a missing table is success, per
/// the store contract.
///
/// # Errors
///
/// Returns an error if the delete request fails.
pub async fn delete_table(handle: &TableHandle, client: &dyn StoreClient) -> Result<()> {
    log::debug!(
        "deleting table {} for deployment {}",
        handle.table_name,
        handle.deployment
    );
    client.delete_table(&handle.table_name).await
}

//! In-process local store emulator.
//!
//! Selected at build time through the `local-emulator` feature, this
//! module emulates the managed table service for the `local`
//! deployment: tables and items live in a SQLite database, in memory by
//! default or file-backed under a data directory. One emulator instance
//! stands in for a store process on one port; the [`EmulatorRegistry`]
//! tracks which ports are running.

mod client;
mod schema;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::client::StoreClient;
use crate::error::{Error, Result};

pub use client::LocalStoreClient;

/// Configuration for one local emulator instance.
///
/// # Examples
///
/// ```
/// use tabula::emulator::EmulatorConfig;
/// use std::time::Duration;
///
/// let config = EmulatorConfig::new(8000)
///     .with_busy_timeout(Duration::from_secs(10));
/// assert_eq!(config.port, 8000);
/// ```
#[derive(Debug, Clone)]
pub struct EmulatorConfig {
    /// Port this emulator instance stands in for.
    pub port: u16,
    /// Directory for the backing database file; `None` keeps all state
    /// in memory.
    pub data_dir: Option<PathBuf>,
    /// Busy timeout for database lock contention.
    pub busy_timeout: Duration,
}

impl EmulatorConfig {
    /// Creates an in-memory emulator configuration for a port.
    #[must_use]
    pub fn new(port: u16) -> Self {
        Self {
            port,
            data_dir: None,
            busy_timeout: Duration::from_millis(5000),
        }
    }

    /// Backs the emulator with a database file under the given directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(data_dir.as_ref().to_path_buf());
        self
    }

    /// Sets the busy timeout for the backing database.
    #[must_use]
    pub const fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}

/// Default data directory for file-backed emulators (`~/.tabula`).
#[must_use]
pub fn default_data_dir() -> Option<PathBuf> {
    home::home_dir().map(|dir| dir.join(".tabula"))
}

/// A running local store emulator instance.
pub struct LocalEmulator {
    conn: Arc<Mutex<Connection>>,
    config: EmulatorConfig,
}

impl LocalEmulator {
    /// Starts an emulator: opens the backing database and creates its
    /// schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// database cannot be opened.
    pub fn start(config: EmulatorConfig) -> Result<Self> {
        let conn = match &config.data_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(format!("emulator-{}.db", config.port));
                let conn = Connection::open(path)?;
                // WAL only applies to file-backed databases
                let _: String =
                    conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
                conn
            }
            None => Connection::open_in_memory()?,
        };

        conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {}",
            config.busy_timeout.as_millis()
        ))?;

        conn.execute(schema::CREATE_TABLES_TABLE, [])?;
        conn.execute(schema::CREATE_ITEMS_TABLE, [])?;
        conn.execute(schema::CREATE_PARTITION_INDEX, [])?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    /// Returns a client handle sharing this emulator's state.
    #[must_use]
    pub fn client(&self) -> LocalStoreClient {
        LocalStoreClient::new(Arc::clone(&self.conn))
    }

    /// Returns the emulator's configuration.
    #[must_use]
    pub const fn config(&self) -> &EmulatorConfig {
        &self.config
    }
}

/// Registry of running emulator instances, keyed by port.
#[derive(Default)]
pub struct EmulatorRegistry {
    running: Mutex<HashMap<u16, Arc<LocalEmulator>>>,
}

impl EmulatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an emulator on `config.port`; a port that is already
    /// running is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the emulator fails to start.
    pub async fn start(&self, config: EmulatorConfig) -> Result<()> {
        let mut running = self.running.lock().await;
        if running.contains_key(&config.port) {
            return Ok(());
        }
        let port = config.port;
        running.insert(port, Arc::new(LocalEmulator::start(config)?));
        Ok(())
    }

    /// Connects to the emulator running on a port.
    ///
    /// # Errors
    ///
    /// Returns `EmulatorNotRunning` if no emulator was started there.
    pub async fn connect(&self, port: u16) -> Result<Arc<dyn StoreClient>> {
        let running = self.running.lock().await;
        match running.get(&port) {
            Some(emulator) => Ok(Arc::new(emulator.client())),
            None => Err(Error::EmulatorNotRunning { port }),
        }
    }

    /// Stops the emulator on a port; returns whether one was running.
    ///
    /// In-memory emulator state is discarded with the instance.
    pub async fn stop(&self, port: u16) -> bool {
        self.running.lock().await.remove(&port).is_some()
    }

    /// Whether an emulator is running on a port.
    pub async fn is_running(&self, port: u16) -> bool {
        self.running.lock().await.contains_key(&port)
    }
}

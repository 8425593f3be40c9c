//! Error types for the tabula library.
//!
//! This module provides the error hierarchy for table lifecycle and
//! migration operations, using `thiserror` for ergonomic error handling.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for operations that may fail with a tabula error.
///
/// # Examples
///
/// ```
/// use tabula::{Error, Result};
///
/// fn example_operation() -> Result<String> {
///     Ok("local".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the tabula library.
///
/// This enum encompasses all failure conditions that can occur while
/// resolving deployments, constructing clients, bootstrapping tables,
/// and running migrations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required configuration input is missing or invalid.
    ///
    /// Not retried; the caller must fix the input.
    #[error("configuration error for '{field}': {message}")]
    Configuration {
        /// The configuration field or input that is invalid.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// No credential source could be resolved for a non-local deployment.
    #[error("cannot resolve credentials for deployment '{deployment}': {reason}")]
    CredentialResolution {
        /// The deployment for which credentials were requested.
        deployment: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The table did not become active within the polling budget.
    #[error("table '{table}' not active after {attempts} status checks over {}s", waited.as_secs())]
    TableNotReady {
        /// The table that never became active.
        table: String,
        /// Number of status checks performed.
        attempts: u32,
        /// Total time spent waiting.
        waited: Duration,
    },

    /// A migration's up or down step failed.
    ///
    /// The run halts at the failing migration; ledger records for
    /// already-applied migrations are preserved.
    #[error("migration '{name}' failed: {source}")]
    Migration {
        /// Name of the failing migration.
        name: String,
        /// The underlying error raised by the migration step.
        #[source]
        source: Box<Error>,
    },

    /// A down-target migration is not in the list or was never applied.
    #[error("unknown migration '{name}': not in the migration list or never applied")]
    UnknownMigration {
        /// The requested target name.
        name: String,
    },

    /// No local store emulator is running on the requested port.
    #[error("no local store emulator running on port {port}")]
    EmulatorNotRunning {
        /// The port that was probed.
        port: u16,
    },

    /// The remote table service rejected a request.
    #[error("store rejected {operation}: {message}")]
    Store {
        /// The operation that was rejected (e.g. `create_table`).
        operation: String,
        /// The service's error message or status.
        message: String,
    },

    /// An emulator database error occurred.
    #[error("emulator database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A transport-level error occurred talking to the remote service.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A configuration or credential file could not be parsed.
    #[error("config file error: {0}")]
    ConfigFile(#[from] serde_yaml::Error),

    /// An item payload could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a `Configuration` error from a field name and message.
    pub(crate) fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if the error is a configuration problem the user must fix.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabula::Error;
    ///
    /// let err = Error::Configuration {
    ///     field: "deployment".into(),
    ///     message: "unknown deployment 'prod'".into(),
    /// };
    /// assert!(err.is_configuration());
    /// ```
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Check if the error indicates an unknown down-migration target.
    #[must_use]
    pub fn is_unknown_migration(&self) -> bool {
        matches!(self, Self::UnknownMigration { .. })
    }
}

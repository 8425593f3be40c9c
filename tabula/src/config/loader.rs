//! Package configuration file loading.
//!
//! The package configuration normally arrives from the embedding
//! application; this loader covers the file-based case used by the CLI
//! surface, reading `tabula.yaml` from a working directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::PackageConfig;
use crate::error::{Error, Result};

/// Default configuration file name searched for in a working directory.
pub const CONFIG_FILE_NAME: &str = "tabula.yaml";

/// Loads package configurations from disk.
///
/// # Examples
///
/// ```no_run
/// use tabula::config::ConfigLoader;
/// use std::path::Path;
///
/// let config = ConfigLoader::load(Path::new(".")).unwrap();
/// println!("table: {}", config.table_name);
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the package configuration for a working
    /// directory (`<working_dir>/tabula.yaml`).
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the file does not exist, or a
    /// parse/validation error if it cannot be read.
    pub fn load(working_dir: &Path) -> Result<PackageConfig> {
        let path = working_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Err(Error::configuration(
                "config",
                format!("no {CONFIG_FILE_NAME} found in {}", working_dir.display()),
            ));
        }
        Self::load_file(&path)
    }

    /// Loads and validates a package configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_file(path: &Path) -> Result<PackageConfig> {
        let contents = fs::read_to_string(path)?;
        PackageConfig::from_yaml(&contents)
    }

    /// Returns the configuration path that [`Self::load`] would read.
    #[must_use]
    pub fn config_path(working_dir: &Path) -> PathBuf {
        working_dir.join(CONFIG_FILE_NAME)
    }
}

//! This module provides functionality for loading and handling the application's configuration.
//!
//! It defines the `DexConfig` struct, which holds the configuration parameters,
//! and a `load_config` function to load the configuration from a file. Every
//! field has a sensible default, so a missing or partial `config.yaml` still
//! produces a working setup pointed at the public PokeAPI and the
//! per-platform data directory.
//!
//! # Examples
//!
//! Loading the configuration from a file:
//!
//! ```no_run
//! use rustdex::config::{DexConfig, load_config};
//!
//! let config_file_path = "/path/to/config.yaml";
//! let config: DexConfig = load_config(config_file_path).unwrap();
//! println!("{:?}", config);
//! ```

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::{error::Error, fs, path::PathBuf};
use tracing::*;

/// Represents the application's configuration.
///
/// This struct holds the knobs for all three stages: where the PokeAPI
/// lives, where the dex JSON file and SQLite database are written, and how
/// aggressively the fetcher runs. It can be constructed by loading a YAML
/// configuration file using the `load_config` function, or via
/// [`DexConfig::default`] when no file exists yet.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct DexConfig {
    /// Base URL of the PokeAPI (no trailing slash).
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Path of the SQLite database file.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Path of the fetched dex JSON file (the fallback data source).
    #[serde(default = "default_dex_json_path")]
    pub dex_json_path: String,

    /// How many roster entries to request from the list endpoint.
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: u32,

    /// Maximum number of in-flight API requests during a fetch.
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,

    /// Per-request HTTP timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Width of the rendered ASCII art, in characters.
    #[serde(default = "default_art_columns")]
    pub art_columns: u32,
}

fn default_api_base() -> String {
    "https://pokeapi.co/api/v2".to_string()
}

fn default_database_url() -> String {
    data_file("pokedex.db")
}

fn default_dex_json_path() -> String {
    data_file("dex.json")
}

fn default_fetch_limit() -> u32 {
    1025
}

fn default_fetch_concurrency() -> usize {
    50
}

fn default_request_timeout_secs() -> u64 {
    20
}

fn default_art_columns() -> u32 {
    50
}

/// Resolve `name` under the per-platform data directory, falling back to a
/// relative `data/` directory when no platform dirs are available.
fn data_file(name: &str) -> String {
    let dir = crate::data_dir().unwrap_or_else(|_| PathBuf::from("data"));
    dir.join(name).to_string_lossy().into_owned()
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            database_url: default_database_url(),
            dex_json_path: default_dex_json_path(),
            fetch_limit: default_fetch_limit(),
            fetch_concurrency: default_fetch_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            art_columns: default_art_columns(),
        }
    }
}

/// Loads the application's configuration from a YAML file.
///
/// This function reads the file at the given path, parses it as YAML, and
/// constructs a `DexConfig` struct from it. Missing fields take their
/// defaults.
///
/// # Parameters
///
/// - `file`: The path to the YAML configuration file.
///
/// # Returns
///
/// - `Ok(DexConfig)`: The loaded configuration.
/// - `Err(Box<dyn Error>)`: An error occurred while reading the file or parsing the YAML.
///
/// # Examples
///
/// ```no_run
/// use rustdex::config::load_config;
///
/// let config_file_path = "/path/to/config.yaml";
/// match load_config(config_file_path) {
///     Ok(config) => println!("{:?}", config),
///     Err(err) => eprintln!("Error loading config: {}", err),
/// }
/// ```
pub fn load_config(file: &str) -> Result<DexConfig, Box<dyn Error>> {
    debug!("Loading config from: {}", file);
    let content = fs::read_to_string(file)?;
    let config: DexConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Open a SQLite connection, panicking on failure.
///
/// Used on write paths (loader, pipeline) where a missing database is a
/// fatal setup error rather than something to degrade around.
pub fn establish_connection(db_url: &str) -> SqliteConnection {
    SqliteConnection::establish(db_url).unwrap_or_else(|_| panic!("Error connecting to {}", db_url))
}

/// Open a SQLite connection, returning the error instead of panicking.
///
/// The query layer uses this so that a broken or absent database can fall
/// back to the dex JSON file.
pub fn try_connect(db_url: &str) -> diesel::result::ConnectionResult<SqliteConnection> {
    SqliteConnection::establish(db_url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_valid_file() {
        // Create a temporary file with a valid configuration.
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
api_base: "http://example.com/api/v2"
database_url: "data/pokedex.db"
dex_json_path: "data/dex.json"
fetch_limit: 151
fetch_concurrency: 10
request_timeout_secs: 5
art_columns: 40
"#
        )
        .unwrap();

        // Load the configuration from the temporary file.
        let config = load_config(temp_file.path().to_str().unwrap());

        // Assert that the configuration was loaded successfully and has the expected values.
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.api_base, "http://example.com/api/v2");
        assert_eq!(config.database_url, "data/pokedex.db");
        assert_eq!(config.dex_json_path, "data/dex.json");
        assert_eq!(config.fetch_limit, 151);
        assert_eq!(config.fetch_concurrency, 10);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.art_columns, 40);
    }

    #[test]
    fn test_load_config_partial_file_takes_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"fetch_limit: 151"#).unwrap();

        let config = load_config(temp_file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.fetch_limit, 151);
        assert_eq!(config.api_base, "https://pokeapi.co/api/v2");
        assert_eq!(config.fetch_concurrency, 50);
        assert_eq!(config.art_columns, 50);
    }

    #[test]
    fn test_load_config_invalid_file() {
        // Try to load a configuration from a non-existent file path.
        let config = load_config("non/existent/path");

        // Assert that an error occurred.
        assert!(config.is_err());
    }

    #[test]
    fn test_load_config_invalid_format() {
        // Create a temporary file with an invalid configuration format.
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"invalid: config: format"#).unwrap();

        // Try to load the configuration from the temporary file.
        let config = load_config(temp_file.path().to_str().unwrap());

        // Assert that an error occurred due to the invalid format.
        assert!(config.is_err());
    }

    #[test]
    fn test_try_connect_in_memory() {
        assert!(try_connect(":memory:").is_ok());
    }
}

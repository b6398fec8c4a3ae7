//! # rustdex (library root)
//!
//! This crate provides the core plumbing for the **rustdex** terminal
//! Pokédex:
//! - PokeAPI bindings and the bounded-concurrency fetch loop (`api`,
//!   `fetcher`).
//! - Sprite-to-ASCII rendering (`art`).
//! - The normalized SQLite layer (`models`, `schema`, `loader`) and the
//!   read side with its JSON-file fallback (`backend`).
//! - CLI parsing and the setup pipeline (`commands`, `pipeline`).
//! - Configuration (`config`) and the two-screen terminal UI (`tui`).
//!
//! In addition, this module exposes utilities for discovering the
//! per-platform configuration and data directories ([`config_dir`],
//! [`data_dir`]).
//!
//! ## On-disk layout
//! By default the app keeps its files under the per-platform directories,
//! e.g. on Linux (XDG):
//!
//! - config: `~/.config/dex/config.yaml`
//! - data: `~/.local/share/dex/dex.json` and `~/.local/share/dex/pokedex.db`
//!
//! Both locations can be overridden through the config file; the config
//! file itself can be pointed elsewhere with the `DEX_CONFIG` environment
//! variable.
//!
//! ## Modules
//! - [`api`], [`art`], [`backend`], [`commands`], [`config`], [`fetcher`],
//!   [`loader`], [`models`], [`pipeline`], [`record`], [`schema`], [`tui`]

use directories::ProjectDirs;
use std::{error::Error, path::PathBuf};

pub mod api;
pub mod art;
pub mod backend;
pub mod commands;
pub mod config;
pub mod fetcher;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod tui;

/// Return the per-platform configuration directory used by rustdex.
///
/// This uses [`directories::ProjectDirs`] with the application triple
/// `("com", "awful-sec", "dex")`, so you get the right place on each OS
/// (e.g., `~/Library/Application Support/com.awful-sec.dex` on macOS).
///
/// The directory is **not** created by this function; callers that need it
/// should create it with `fs::create_dir_all`.
///
/// # Errors
/// Returns an error if the platform configuration directory cannot be
/// determined (which is rare but possible in heavily sandboxed
/// environments).
pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
    let proj_dirs = ProjectDirs::from("com", "awful-sec", "dex")
        .ok_or("Unable to determine config directory")?;
    Ok(proj_dirs.config_dir().to_path_buf())
}

/// Return the per-platform data directory used by rustdex.
///
/// This is where the fetched `dex.json` and the `pokedex.db` SQLite file
/// live unless the configuration points elsewhere.
///
/// # Errors
/// Returns an error if the platform data directory cannot be determined.
pub fn data_dir() -> Result<PathBuf, Box<dyn Error>> {
    let proj_dirs = ProjectDirs::from("com", "awful-sec", "dex")
        .ok_or("Unable to determine data directory")?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

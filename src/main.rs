//! Main module for the rustdex CLI application (dex).
//!
//! This module provides the main function and auxiliary functionalities for
//! the CLI application. It handles command parsing, configuration loading,
//! and initialization, as well as invoking the appropriate functionalities
//! based on the provided command-line arguments.
//!
//! # Examples
//!
//! Opening the terminal UI (the default):
//!
//! ```sh
//! cargo run
//! dex
//! ```
//!
//! Running the data pipeline without prompts:
//!
//! ```sh
//! cargo run -- pipeline --yes
//! dex pipeline -y
//! ```
//!
//! Printing one entry:
//!
//! ```sh
//! dex show pikachu
//! dex show 25
//! ```

use clap::Parser;
use once_cell::sync::OnceCell;
use rustdex::{
    backend, commands,
    config::{self, DexConfig},
    loader, pipeline, tui,
};
use std::{env, error::Error, fs, path::PathBuf};
use tracing::{debug, info};

static TRACING: OnceCell<()> = OnceCell::new();

fn main() -> Result<(), Box<dyn Error>> {
    TRACING.get_or_init(|| {
        tracing_subscriber::fmt::init();
    });
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run())
}

/// Main asynchronous function of the rustdex CLI application.
///
/// Loads configuration, parses command-line arguments, and executes the
/// appropriate command.
///
/// # Errors
///
/// Returns an error if there is an issue loading the configuration, parsing
/// the command-line arguments, or executing the specified command.
async fn run() -> Result<(), Box<dyn Error>> {
    let config_path = config_file_path()?;
    let config = if config_path.exists() {
        config::load_config(
            config_path
                .to_str()
                .ok_or("Config path is not valid UTF-8")?,
        )?
    } else {
        debug!(
            "No config file at {}, using defaults",
            config_path.display()
        );
        DexConfig::default()
    };
    debug!("Config loaded: {:?}", config);

    let cli = commands::Cli::parse();

    match cli.command.unwrap_or(commands::Commands::Tui) {
        commands::Commands::Tui => {
            debug!("Opening the TUI");
            tui::run(&config)?;
        }
        commands::Commands::Pipeline { yes } => {
            debug!("Running the data pipeline (yes = {})", yes);
            pipeline::run(&config, yes).await?;
        }
        commands::Commands::Db { command } => match command {
            commands::DbCommands::Create => {
                let counts = loader::create_database(&config)?;
                println!("Database created ({counts}).");
            }
            commands::DbCommands::Rebuild => {
                let counts = loader::rebuild_database(&config)?;
                println!("Database rebuild complete ({counts}).");
            }
        },
        commands::Commands::Show { query } => {
            show(&config, &query)?;
        }
        commands::Commands::Init => {
            debug!("Initializing configuration");
            init(&config_path)?;
        }
    }

    Ok(())
}

/// Resolve the config file path: `DEX_CONFIG` env override, else
/// `config.yaml` in the per-platform config directory.
fn config_file_path() -> Result<PathBuf, Box<dyn Error>> {
    if let Ok(path) = env::var("DEX_CONFIG") {
        debug!("Loading config from DEX_CONFIG: {}", path);
        return Ok(PathBuf::from(path));
    }
    Ok(rustdex::config_dir()?.join("config.yaml"))
}

/// Print one dex entry to stdout.
///
/// Exits with status 1 when the entry is not found in either source.
fn show(config: &DexConfig, query: &str) -> Result<(), Box<dyn Error>> {
    match backend::find_entry(config, query)? {
        Some(record) => {
            println!("{} (#{})", record.display_name(), record.id);
            println!();
            println!("Types: {}", record.types.join(", "));
            println!("Abilities: {}", record.abilities.join(", "));
            println!("Height: {:.1} m", record.height_m());
            println!("Weight: {:.1} kg", record.weight_kg());
            println!();
            println!("Stats:");
            for (label, value) in record.stats.named() {
                println!("- {label}: {value}");
            }
            if !record.flavor_text.is_empty() {
                println!();
                println!("{}", record.flavor_text);
            }
            if !record.ascii_art.is_empty() {
                println!();
                println!("{}", record.ascii_art);
            }
            Ok(())
        }
        None => {
            eprintln!("Entry '{query}' not found.");
            std::process::exit(1);
        }
    }
}

/// Initializes the application's configuration.
///
/// Creates the configuration directory and writes a `config.yaml` holding
/// the default settings, ready to be edited.
///
/// # Errors
///
/// Returns an error if there is an issue creating the directory or file,
/// or serializing the configuration to YAML.
fn init(config_path: &PathBuf) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = config_path.parent() {
        info!("Creating config directory: {}", parent.display());
        fs::create_dir_all(parent)?;
    }

    info!("Creating config file: {}", config_path.display());
    let config_yaml = serde_yaml::to_string(&DexConfig::default())?;
    fs::write(config_path, config_yaml)?;
    println!("Wrote default configuration to {}.", config_path.display());

    Ok(())
}

//! This module defines the command-line interface for the application using `clap`.
//!
//! It provides a `Cli` struct that represents the parsed command-line arguments,
//! and a `Commands` enum that represents the available subcommands and their
//! options. Running `dex` with no subcommand opens the terminal UI.

use clap::{Parser, Subcommand};

/// Represents the parsed command-line arguments.
///
/// This struct is constructed by parsing the command-line arguments using `clap`.
/// It contains a `command` field that holds the parsed subcommand and its options.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, propagate_version = true, color = clap::ColorChoice::Always)]
pub struct Cli {
    /// The parsed subcommand and its options. `None` opens the TUI.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Represents the available subcommands and their options.
///
/// Each variant of this enum corresponds to a subcommand that the user can invoke
/// from the command line, along with any options specific to that subcommand.
#[derive(Subcommand, Debug)]
#[command(about, long_about = None, color = clap::ColorChoice::Always)]
pub enum Commands {
    /// The 'tui' subcommand: open the Pokédex terminal UI (the default).
    #[clap(name = "tui", alias = "t")]
    Tui,

    /// The 'pipeline' subcommand: fetch from the PokeAPI and populate the
    /// database, with a confirmation prompt before each phase.
    #[clap(name = "pipeline", alias = "p")]
    Pipeline {
        /// Skip the confirmation prompts.
        #[arg(name = "yes", short = 'y', long = "yes")]
        yes: bool,
    },

    /// The 'db' subcommand: initialize or rebuild the database.
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// The 'show' subcommand: print one dex entry and exit.
    #[clap(name = "show", alias = "s")]
    Show {
        /// A Pokémon name (any case) or dex number.
        query: String,
    },

    /// The 'init' subcommand: write the default configuration file.
    Init,
}

/// Database management actions.
#[derive(Subcommand, Debug)]
#[command(about, long_about = None, color = clap::ColorChoice::Always)]
pub enum DbCommands {
    /// Create the database tables and populate them from the dex file.
    /// Refuses to touch an existing database.
    Create,

    /// Drop the existing database and completely rebuild it.
    Rebuild,
}

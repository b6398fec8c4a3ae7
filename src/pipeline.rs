//! # Data pipeline driver
//!
//! The step-by-step setup flow: fetch everything from the PokeAPI into the
//! dex JSON file, then populate the SQLite database from it. Each phase is
//! confirmed on stdin unless `--yes` was passed — the TUI's setup screen
//! runs this exact command as a subprocess with `--yes` and streams the
//! printed output into its log pane.

use crate::{config::DexConfig, fetcher, loader};
use std::{
    error::Error,
    io::{self, BufRead, Write},
};
use tracing::info;

/// Run the two-phase pipeline.
///
/// # Parameters
/// - `config`: Application configuration.
/// - `assume_yes`: Skip the interactive confirmations.
///
/// # Errors
/// Returns an error when a confirmed phase fails; a declined phase is
/// skipped, not an error.
pub async fn run(config: &DexConfig, assume_yes: bool) -> Result<(), Box<dyn Error>> {
    println!("--- Pokédex Data Pipeline ---");

    // Phase 1: fetch data from the API.
    if confirm_step("Phase 1: Fetch all data from the PokeAPI?", assume_yes)? {
        println!("Starting API data fetch. This may take a few moments...");
        let records = fetcher::fetch_all(config).await?;
        fetcher::write_dex_file(&records, &config.dex_json_path)?;
        println!(
            "API data fetch complete. {} entries saved to {}.",
            records.len(),
            config.dex_json_path
        );
    } else {
        println!("Skipping API data fetch.");
    }

    println!("{}", "-".repeat(20));

    // Phase 2: populate the database.
    if confirm_step(
        "Phase 2: Populate the database from the dex file?",
        assume_yes,
    )? {
        println!("--- Starting Database Population ---");
        let counts = loader::populate_database(config)?;
        println!("Database populated successfully ({}).", counts);
        println!("--- Database Population Complete! ---");
    } else {
        println!("Skipping database population.");
    }

    println!();
    println!("Data pipeline finished.");
    info!("Pipeline run complete");
    Ok(())
}

/// Ask for confirmation on stdin, or auto-confirm with `--yes`.
///
/// Re-prompts on anything other than y/yes/n/no (case-insensitive).
/// End-of-input counts as a decline.
fn confirm_step(prompt: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        println!("{prompt} [y/n]: y (auto-confirmed)");
        return Ok(true);
    }

    let stdin = io::stdin();
    loop {
        print!("{prompt} [y/n]: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match parse_confirmation(&line) {
            Some(answer) => return Ok(answer),
            None => println!("Invalid input. Please enter 'y' or 'n'."),
        }
    }
}

/// Interpret one line of confirmation input. `None` means re-prompt.
fn parse_confirmation(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

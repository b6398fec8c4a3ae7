//! # Fetcher
//!
//! Pulls the whole dex from the PokeAPI and writes it to the local JSON
//! file. The flow mirrors the setup pipeline's first phase:
//!
//! 1. Fetch the master roster (one paginated list call).
//! 2. For every roster entry, fetch the detail payload, its species flavor
//!    text, and its sprite — concurrently, but bounded by a semaphore so
//!    the API never sees more than `fetch_concurrency` requests in flight.
//! 3. Render each sprite to ASCII art; art problems degrade to a
//!    placeholder string instead of failing the entry.
//! 4. Drop entries that fail outright (logged at warn), sort the survivors
//!    by dex number, and write them as a pretty-printed JSON array.
//!
//! Only the roster call is fatal: without it there is nothing to fetch.

use crate::{
    api::{NamedResource, PokeClient, PokemonDetail},
    art,
    config::DexConfig,
    record::DexRecord,
};
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::{error::Error, fs, path::Path, sync::Arc};
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Placeholder stored when a sprite is missing, undownloadable, or
/// undecodable. The browse screen shows it verbatim.
pub const ART_UNAVAILABLE: &str = "Art not available.";

/// Fetch every Pokémon in the configured roster.
///
/// Individual entries that fail are skipped with a warning; the run only
/// errors when the roster itself cannot be fetched. The returned records
/// are sorted ascending by dex number.
///
/// # Parameters
/// - `config`: Application configuration (API base, limits, art width).
///
/// # Returns
/// - `Ok(Vec<DexRecord>)`: All successfully fetched records, sorted by id.
/// - `Err(Box<dyn Error>)`: The roster request failed.
pub async fn fetch_all(config: &DexConfig) -> Result<Vec<DexRecord>, Box<dyn Error>> {
    let client = Arc::new(PokeClient::new(config)?);

    info!("Fetching master Pokémon list");
    let roster = client.fetch_roster(config.fetch_limit).await?;
    let total = roster.len();
    info!("Roster contains {} entries", total);

    let semaphore = Arc::new(Semaphore::new(config.fetch_concurrency.max(1)));
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}").unwrap(),
    );

    let mut tasks = FuturesUnordered::new();
    for entry in roster {
        let client = Arc::clone(&client);
        let semaphore = Arc::clone(&semaphore);
        let columns = config.art_columns;
        tasks.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok()?;
            fetch_entry(&client, &entry, columns).await
        }));
    }

    let mut records = Vec::with_capacity(total);
    while let Some(joined) = tasks.next().await {
        match joined {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(err) => warn!("Fetch task aborted: {}", err),
        }
        progress.inc(1);
        progress.set_message(format!("{} fetched", records.len()));
    }
    progress.finish_and_clear();

    records.sort_by_key(|record| record.id);
    info!("Fetched {}/{} entries", records.len(), total);
    Ok(records)
}

/// Fetch one entry, converting any failure into a logged skip.
async fn fetch_entry(
    client: &PokeClient,
    entry: &NamedResource,
    art_columns: u32,
) -> Option<DexRecord> {
    match try_fetch_entry(client, entry, art_columns).await {
        Ok(record) => Some(record),
        Err(err) => {
            warn!("Skipping {}: {}", entry.name, err);
            None
        }
    }
}

async fn try_fetch_entry(
    client: &PokeClient,
    entry: &NamedResource,
    art_columns: u32,
) -> Result<DexRecord, reqwest::Error> {
    let detail = client.fetch_detail(&entry.url).await?;
    let species = client.fetch_species(&detail.species.url).await?;
    let ascii_art = fetch_art(client, &detail, art_columns).await;

    Ok(DexRecord {
        name: detail.name.clone(),
        id: detail.id,
        types: detail.type_names(),
        abilities: detail.ability_names(),
        height: detail.height,
        weight: detail.weight,
        stats: detail.stat_block(),
        flavor_text: species.english_flavor_text(),
        ascii_art,
    })
}

/// Download and render the best available sprite. Never fails: every
/// problem degrades to [`ART_UNAVAILABLE`].
async fn fetch_art(client: &PokeClient, detail: &PokemonDetail, columns: u32) -> String {
    let Some(url) = detail.sprites.best_url() else {
        return ART_UNAVAILABLE.to_string();
    };

    let bytes = match client.fetch_bytes(url).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("Could not download sprite for {}: {}", detail.name, err);
            return ART_UNAVAILABLE.to_string();
        }
    };

    match art::render(&bytes, columns) {
        Ok(rendered) => rendered,
        Err(err) => {
            warn!("Could not generate art for {}: {}", detail.name, err);
            ART_UNAVAILABLE.to_string()
        }
    }
}

/// Write records to the dex JSON file, creating parent directories.
pub fn write_dex_file(records: &[DexRecord], path: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    info!("Saved {} entries to {}", records.len(), path);
    Ok(())
}

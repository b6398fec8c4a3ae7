//! # Query layer
//!
//! Read-side access to the dex for the TUI and the `show` command. The
//! SQLite database is the primary source; every operation degrades to a
//! linear scan of the dex JSON file when the database cannot be opened or
//! queried, so a half-finished setup still browses whatever the fetcher
//! managed to save.
//!
//! Lookups are deterministic: a needle that parses as a number matches the
//! dex id and nothing else; any other needle matches the lowercased name
//! exactly.

use crate::{
    config::{DexConfig, try_connect},
    models::{PokemonRow, StatsRow},
    record::{DexRecord, RosterEntry},
    schema::{abilities, pokemon, pokemon_abilities, pokemon_types, types},
};
use diesel::prelude::*;
use std::{error::Error, fs};
use tracing::warn;

diesel::define_sql_function! {
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// All `(id, name)` pairs, ordered by dex number.
///
/// Tries the database first, then the dex JSON file. Returns an empty
/// vector when neither source is usable (the TUI renders an empty table).
pub fn all_entries(config: &DexConfig) -> Vec<RosterEntry> {
    match db_all_entries(config) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Roster query failed, falling back to dex file: {}", err);
            json_all_entries(&config.dex_json_path).unwrap_or_default()
        }
    }
}

/// Look up one entry by name or dex number.
///
/// # Parameters
/// - `config`: Application configuration (database and fallback paths).
/// - `needle`: A dex number (`"25"`) or a name (`"Pikachu"`, any case).
///
/// # Returns
/// - `Ok(Some(record))`: The matching entry.
/// - `Ok(None)`: Neither source has a match.
/// - `Err(Box<dyn Error>)`: The database failed *and* the fallback file is
///   unusable.
pub fn find_entry(config: &DexConfig, needle: &str) -> Result<Option<DexRecord>, Box<dyn Error>> {
    match db_find_entry(config, needle) {
        Ok(found) => Ok(found),
        Err(err) => {
            warn!("Entry query failed, falling back to dex file: {}", err);
            json_find_entry(&config.dex_json_path, needle)
        }
    }
}

fn db_all_entries(config: &DexConfig) -> Result<Vec<RosterEntry>, Box<dyn Error>> {
    let mut conn = try_connect(&config.database_url)?;
    let rows: Vec<(i32, String)> = pokemon::table
        .select((pokemon::id, pokemon::name))
        .order(pokemon::id.asc())
        .limit(i64::from(config.fetch_limit))
        .load(&mut conn)?;
    Ok(rows
        .into_iter()
        .map(|(id, name)| RosterEntry { id, name })
        .collect())
}

fn db_find_entry(config: &DexConfig, needle: &str) -> Result<Option<DexRecord>, Box<dyn Error>> {
    let mut conn = try_connect(&config.database_url)?;

    let row: Option<PokemonRow> = match needle.parse::<i32>() {
        Ok(id) => pokemon::table
            .find(id)
            .select(PokemonRow::as_select())
            .first(&mut conn)
            .optional()?,
        Err(_) => pokemon::table
            .filter(lower(pokemon::name).eq(needle.to_lowercase()))
            .select(PokemonRow::as_select())
            .first(&mut conn)
            .optional()?,
    };
    let Some(row) = row else {
        return Ok(None);
    };

    let stat_row: Option<StatsRow> = crate::schema::stats::table
        .find(row.id)
        .select(StatsRow::as_select())
        .first(&mut conn)
        .optional()?;

    let type_names: Vec<String> = pokemon_types::table
        .inner_join(types::table)
        .filter(pokemon_types::pokemon_id.eq(row.id))
        .order(types::id.asc())
        .select(types::name)
        .load(&mut conn)?;

    let ability_names: Vec<String> = pokemon_abilities::table
        .inner_join(abilities::table)
        .filter(pokemon_abilities::pokemon_id.eq(row.id))
        .order(abilities::id.asc())
        .select(abilities::name)
        .load(&mut conn)?;

    Ok(Some(DexRecord {
        name: row.name,
        id: row.id,
        types: type_names,
        abilities: ability_names,
        height: row.height,
        weight: row.weight,
        stats: stat_row.map(StatsRow::to_block).unwrap_or_default(),
        flavor_text: row.flavor_text,
        ascii_art: row.ascii_art,
    }))
}

fn read_dex_file(path: &str) -> Result<Vec<DexRecord>, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn json_all_entries(path: &str) -> Result<Vec<RosterEntry>, Box<dyn Error>> {
    Ok(read_dex_file(path)?
        .into_iter()
        .map(|record| RosterEntry {
            id: record.id,
            name: record.name,
        })
        .collect())
}

fn json_find_entry(path: &str, needle: &str) -> Result<Option<DexRecord>, Box<dyn Error>> {
    let records = read_dex_file(path)?;
    let found = match needle.parse::<i32>() {
        Ok(id) => records.into_iter().find(|record| record.id == id),
        Err(_) => {
            let needle = needle.to_lowercase();
            records
                .into_iter()
                .find(|record| record.name.to_lowercase() == needle)
        }
    };
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::establish_connection,
        loader::{create_tables, load_records},
        record::StatBlock,
    };

    fn record(id: i32, name: &str) -> DexRecord {
        DexRecord {
            name: name.into(),
            id,
            types: vec!["electric".into()],
            abilities: vec!["static".into(), "lightning-rod".into()],
            height: 4,
            weight: 60,
            stats: StatBlock {
                hp: 35,
                attack: 55,
                defense: 40,
                special_attack: 50,
                special_defense: 50,
                speed: 90,
            },
            flavor_text: "It stores electricity in its cheeks.".into(),
            ascii_art: "=^.^=".into(),
        }
    }

    /// A config whose database is real (file-backed, populated) and whose
    /// fallback file does not exist.
    fn db_config(dir: &tempfile::TempDir) -> DexConfig {
        let config = DexConfig {
            database_url: dir.path().join("pokedex.db").to_string_lossy().into_owned(),
            dex_json_path: dir.path().join("missing.json").to_string_lossy().into_owned(),
            ..DexConfig::default()
        };
        let mut conn = establish_connection(&config.database_url);
        create_tables(&mut conn).unwrap();
        load_records(&mut conn, &[record(25, "pikachu"), record(26, "raichu")]).unwrap();
        config
    }

    /// A config whose database path is unusable and whose fallback file
    /// holds the records.
    fn fallback_config(dir: &tempfile::TempDir) -> DexConfig {
        let json_path = dir.path().join("dex.json");
        std::fs::write(
            &json_path,
            serde_json::to_string(&vec![record(25, "pikachu"), record(26, "raichu")]).unwrap(),
        )
        .unwrap();
        DexConfig {
            database_url: dir
                .path()
                .join("no/such/dir/pokedex.db")
                .to_string_lossy()
                .into_owned(),
            dex_json_path: json_path.to_string_lossy().into_owned(),
            ..DexConfig::default()
        }
    }

    #[test]
    fn test_all_entries_from_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = db_config(&dir);

        let entries = all_entries(&config);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 25);
        assert_eq!(entries[0].name, "pikachu");
    }

    #[test]
    fn test_find_entry_by_name_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let config = db_config(&dir);

        let entry = find_entry(&config, "PIKACHU").unwrap().unwrap();
        assert_eq!(entry.id, 25);
        assert_eq!(entry.types, vec!["electric"]);
        assert_eq!(entry.abilities, vec!["static", "lightning-rod"]);
        assert_eq!(entry.stats.speed, 90);
        assert_eq!(entry.ascii_art, "=^.^=");
    }

    #[test]
    fn test_find_entry_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let config = db_config(&dir);

        let entry = find_entry(&config, "26").unwrap().unwrap();
        assert_eq!(entry.name, "raichu");
    }

    #[test]
    fn test_numeric_needle_never_matches_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = db_config(&dir);
        {
            let mut conn = establish_connection(&config.database_url);
            load_records(&mut conn, &[record(99, "25")]).unwrap();
        }

        // "25" finds dex #25, not the pathological name.
        let entry = find_entry(&config, "25").unwrap().unwrap();
        assert_eq!(entry.name, "pikachu");
    }

    #[test]
    fn test_find_entry_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = db_config(&dir);

        assert!(find_entry(&config, "mewthree").unwrap().is_none());
        assert!(find_entry(&config, "40000").unwrap().is_none());
    }

    #[test]
    fn test_fallback_to_json_when_database_unusable() {
        let dir = tempfile::tempdir().unwrap();
        let config = fallback_config(&dir);

        let entries = all_entries(&config);
        assert_eq!(entries.len(), 2);

        let entry = find_entry(&config, "Raichu").unwrap().unwrap();
        assert_eq!(entry.id, 26);
        assert!(find_entry(&config, "mewthree").unwrap().is_none());
    }

    #[test]
    fn test_both_sources_unusable() {
        let dir = tempfile::tempdir().unwrap();
        let config = DexConfig {
            database_url: dir
                .path()
                .join("no/such/dir/pokedex.db")
                .to_string_lossy()
                .into_owned(),
            dex_json_path: dir.path().join("missing.json").to_string_lossy().into_owned(),
            ..DexConfig::default()
        };

        assert!(all_entries(&config).is_empty());
        assert!(find_entry(&config, "pikachu").is_err());
    }
}

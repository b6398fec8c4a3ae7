//! # Loader
//!
//! Normalizes fetched [`DexRecord`]s into the SQLite schema. The flat
//! record bundle fans out into:
//!
//! - `pokemon` — the entity row,
//! - `stats` — the six base stats,
//! - `types` / `abilities` — name-keyed lookup tables,
//! - `pokemon_types` / `pokemon_abilities` — link rows,
//! - `pokemon_app_data` — a seeded application-state row.
//!
//! The whole load runs inside one transaction and every insert uses
//! INSERT-OR-IGNORE semantics, so re-running the loader over the same dex
//! file is a no-op and a crashed run leaves nothing half-written. Lookup
//! ids are resolved through in-memory name→id caches that are pre-filled
//! from the database, so repeated type/ability strings normalize to a
//! single row each across runs.

use crate::{
    config::{DexConfig, establish_connection},
    models::{AppDataRow, PokemonAbilityRow, PokemonRow, PokemonTypeRow, StatsRow},
    record::DexRecord,
    schema::{abilities, pokemon, pokemon_abilities, pokemon_app_data, pokemon_types, stats, types},
};
use diesel::{connection::SimpleConnection, prelude::*};
use std::{collections::HashMap, error::Error, fs, path::Path};
use tracing::{debug, info};

/// DDL for the full schema. Safe to execute repeatedly.
const CREATE_TABLES_SQL: &str = "
CREATE TABLE IF NOT EXISTS pokemon (
    id INTEGER PRIMARY KEY,
    name TEXT UNIQUE NOT NULL,
    height INTEGER NOT NULL,
    weight INTEGER NOT NULL,
    flavor_text TEXT NOT NULL,
    ascii_art TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pokemon_app_data (
    pokemon_id INTEGER PRIMARY KEY,
    is_favorite INTEGER NOT NULL DEFAULT 0,
    search_count INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (pokemon_id) REFERENCES pokemon (id)
);

CREATE TABLE IF NOT EXISTS types (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS pokemon_types (
    pokemon_id INTEGER NOT NULL,
    type_id INTEGER NOT NULL,
    PRIMARY KEY (pokemon_id, type_id),
    FOREIGN KEY (pokemon_id) REFERENCES pokemon (id),
    FOREIGN KEY (type_id) REFERENCES types (id)
);

CREATE TABLE IF NOT EXISTS abilities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS pokemon_abilities (
    pokemon_id INTEGER NOT NULL,
    ability_id INTEGER NOT NULL,
    PRIMARY KEY (pokemon_id, ability_id),
    FOREIGN KEY (pokemon_id) REFERENCES pokemon (id),
    FOREIGN KEY (ability_id) REFERENCES abilities (id)
);

CREATE TABLE IF NOT EXISTS stats (
    pokemon_id INTEGER PRIMARY KEY,
    hp INTEGER NOT NULL,
    attack INTEGER NOT NULL,
    defense INTEGER NOT NULL,
    special_attack INTEGER NOT NULL,
    special_defense INTEGER NOT NULL,
    speed INTEGER NOT NULL,
    FOREIGN KEY (pokemon_id) REFERENCES pokemon (id)
);
";

/// How many rows a load actually inserted, per table family.
///
/// A second run over the same dex file reports all zeros.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadCounts {
    pub pokemon: usize,
    pub types: usize,
    pub abilities: usize,
}

impl std::fmt::Display for LoadCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} pokemon, {} types, {} abilities",
            self.pokemon, self.types, self.abilities
        )
    }
}

/// Create all tables if they do not exist yet.
pub fn create_tables(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(CREATE_TABLES_SQL)
}

/// Load records into the database inside a single transaction.
///
/// Every insert is INSERT-OR-IGNORE, keyed on the dex number and the
/// UNIQUE name columns, which makes the whole operation idempotent.
///
/// # Parameters
/// - `conn`: Open SQLite connection with tables already created.
/// - `records`: The denormalized records to load.
///
/// # Returns
/// - `Ok(LoadCounts)`: How many new rows each table family received.
/// - `Err(diesel::result::Error)`: The transaction rolled back.
pub fn load_records(
    conn: &mut SqliteConnection,
    records: &[DexRecord],
) -> Result<LoadCounts, diesel::result::Error> {
    conn.transaction(|conn| {
        let mut counts = LoadCounts::default();

        // Pre-fill the lookup caches so re-runs reuse existing ids.
        let mut type_ids: HashMap<String, i32> = types::table
            .select((types::name, types::id))
            .load::<(String, i32)>(conn)?
            .into_iter()
            .collect();
        let mut ability_ids: HashMap<String, i32> = abilities::table
            .select((abilities::name, abilities::id))
            .load::<(String, i32)>(conn)?
            .into_iter()
            .collect();

        for record in records {
            counts.pokemon += diesel::insert_or_ignore_into(pokemon::table)
                .values(PokemonRow::from(record))
                .execute(conn)?;

            diesel::insert_or_ignore_into(pokemon_app_data::table)
                .values(AppDataRow::seed(record.id))
                .execute(conn)?;

            diesel::insert_or_ignore_into(stats::table)
                .values(StatsRow::from_record(record.id, &record.stats))
                .execute(conn)?;

            for type_name in &record.types {
                let type_id = match type_ids.get(type_name) {
                    Some(&id) => id,
                    None => {
                        let id: i32 = diesel::insert_into(types::table)
                            .values(types::name.eq(type_name))
                            .returning(types::id)
                            .get_result(conn)?;
                        counts.types += 1;
                        type_ids.insert(type_name.clone(), id);
                        id
                    }
                };
                diesel::insert_or_ignore_into(pokemon_types::table)
                    .values(PokemonTypeRow {
                        pokemon_id: record.id,
                        type_id,
                    })
                    .execute(conn)?;
            }

            for ability_name in &record.abilities {
                let ability_id = match ability_ids.get(ability_name) {
                    Some(&id) => id,
                    None => {
                        let id: i32 = diesel::insert_into(abilities::table)
                            .values(abilities::name.eq(ability_name))
                            .returning(abilities::id)
                            .get_result(conn)?;
                        counts.abilities += 1;
                        ability_ids.insert(ability_name.clone(), id);
                        id
                    }
                };
                diesel::insert_or_ignore_into(pokemon_abilities::table)
                    .values(PokemonAbilityRow {
                        pokemon_id: record.id,
                        ability_id,
                    })
                    .execute(conn)?;
            }
        }

        debug!("Load inserted: {}", counts);
        Ok(counts)
    })
}

/// Read the dex JSON file and load it.
pub fn load_from_json(
    conn: &mut SqliteConnection,
    path: &str,
) -> Result<LoadCounts, Box<dyn Error>> {
    if !Path::new(path).exists() {
        return Err(format!("{} not found. Cannot populate database.", path).into());
    }
    let content = fs::read_to_string(path)?;
    let records: Vec<DexRecord> = serde_json::from_str(&content)?;
    info!("Loading {} records from {}", records.len(), path);
    Ok(load_records(conn, &records)?)
}

/// Create tables and populate them from the configured dex file.
///
/// The database file's parent directory is created if needed.
pub fn populate_database(config: &DexConfig) -> Result<LoadCounts, Box<dyn Error>> {
    if let Some(parent) = Path::new(&config.database_url).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut conn = establish_connection(&config.database_url);
    create_tables(&mut conn)?;
    let counts = load_from_json(&mut conn, &config.dex_json_path)?;
    info!("Database populated: {}", counts);
    Ok(counts)
}

/// Create and populate the database, refusing when it already exists.
pub fn create_database(config: &DexConfig) -> Result<LoadCounts, Box<dyn Error>> {
    if Path::new(&config.database_url).exists() {
        return Err("Database already exists. Use 'db rebuild' to start from scratch.".into());
    }
    populate_database(config)
}

/// Drop the database file (if present) and rebuild it from the dex file.
pub fn rebuild_database(config: &DexConfig) -> Result<LoadCounts, Box<dyn Error>> {
    if Path::new(&config.database_url).exists() {
        fs::remove_file(&config.database_url)?;
        info!("Existing database dropped");
    }
    populate_database(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StatBlock;

    fn test_conn() -> SqliteConnection {
        let mut conn = SqliteConnection::establish(":memory:").unwrap();
        create_tables(&mut conn).unwrap();
        conn
    }

    fn record(id: i32, name: &str, type_names: &[&str], ability_names: &[&str]) -> DexRecord {
        DexRecord {
            name: name.into(),
            id,
            types: type_names.iter().map(|s| s.to_string()).collect(),
            abilities: ability_names.iter().map(|s| s.to_string()).collect(),
            height: 7,
            weight: 69,
            stats: StatBlock {
                hp: 45,
                attack: 49,
                defense: 49,
                special_attack: 65,
                special_defense: 65,
                speed: 45,
            },
            flavor_text: "A strange seed.".into(),
            ascii_art: "##".into(),
        }
    }

    fn sample_records() -> Vec<DexRecord> {
        vec![
            record(1, "bulbasaur", &["grass", "poison"], &["overgrow", "chlorophyll"]),
            record(2, "ivysaur", &["grass", "poison"], &["overgrow", "chlorophyll"]),
            record(4, "charmander", &["fire"], &["blaze"]),
        ]
    }

    #[test]
    fn test_create_tables_is_idempotent() {
        let mut conn = test_conn();
        assert!(create_tables(&mut conn).is_ok());
    }

    #[test]
    fn test_load_normalizes_repeated_names() {
        let mut conn = test_conn();
        let counts = load_records(&mut conn, &sample_records()).unwrap();

        assert_eq!(counts.pokemon, 3);
        // grass/poison/fire and overgrow/chlorophyll/blaze, each once.
        assert_eq!(counts.types, 3);
        assert_eq!(counts.abilities, 3);

        let type_rows: i64 = types::table.count().get_result(&mut conn).unwrap();
        assert_eq!(type_rows, 3);
        let link_rows: i64 = pokemon_types::table.count().get_result(&mut conn).unwrap();
        assert_eq!(link_rows, 5);
    }

    #[test]
    fn test_reload_is_a_no_op() {
        let mut conn = test_conn();
        let records = sample_records();
        load_records(&mut conn, &records).unwrap();

        let second = load_records(&mut conn, &records).unwrap();
        assert_eq!(second, LoadCounts::default());

        let pokemon_rows: i64 = pokemon::table.count().get_result(&mut conn).unwrap();
        assert_eq!(pokemon_rows, 3);
    }

    #[test]
    fn test_duplicate_name_is_ignored() {
        let mut conn = test_conn();
        load_records(&mut conn, &[record(1, "bulbasaur", &["grass"], &["overgrow"])]).unwrap();

        // Same UNIQUE name under a different id stays out.
        let counts =
            load_records(&mut conn, &[record(9999, "bulbasaur", &["grass"], &["overgrow"])])
                .unwrap();
        assert_eq!(counts.pokemon, 0);

        let pokemon_rows: i64 = pokemon::table.count().get_result(&mut conn).unwrap();
        assert_eq!(pokemon_rows, 1);
    }

    #[test]
    fn test_stats_and_app_data_are_seeded() {
        let mut conn = test_conn();
        load_records(&mut conn, &sample_records()).unwrap();

        let stat_rows: i64 = stats::table.count().get_result(&mut conn).unwrap();
        assert_eq!(stat_rows, 3);
        let app_rows: i64 = pokemon_app_data::table.count().get_result(&mut conn).unwrap();
        assert_eq!(app_rows, 3);

        let hp: i32 = stats::table
            .find(1)
            .select(stats::hp)
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(hp, 45);
    }

    #[test]
    fn test_load_from_json_missing_file_errors() {
        let mut conn = test_conn();
        assert!(load_from_json(&mut conn, "no/such/dex.json").is_err());
    }

    #[test]
    fn test_populate_database_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("dex.json");
        std::fs::write(
            &json_path,
            serde_json::to_string(&sample_records()).unwrap(),
        )
        .unwrap();

        let config = DexConfig {
            database_url: dir.path().join("db/pokedex.db").to_string_lossy().into_owned(),
            dex_json_path: json_path.to_string_lossy().into_owned(),
            ..DexConfig::default()
        };

        let counts = populate_database(&config).unwrap();
        assert_eq!(counts.pokemon, 3);
        assert!(Path::new(&config.database_url).exists());

        // Creating over an existing database is refused; rebuilding works.
        assert!(create_database(&config).is_err());
        let counts = rebuild_database(&config).unwrap();
        assert_eq!(counts.pokemon, 3);
    }
}

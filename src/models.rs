//! # Database models
//!
//! Data structures that map to the project's SQLite schema via **Diesel**.
//!
//! These models are used by the loader to persist fetched [`DexRecord`]s
//! and by the query layer to read them back:
//!
//! - [`PokemonRow`]: one row per Pokémon (identity, measurements, flavor
//!   text, pre-rendered ASCII art).
//! - [`StatsRow`]: the six base stats, one row per Pokémon.
//! - [`TypeRow`] / [`AbilityRow`]: name-keyed lookup tables.
//! - [`PokemonTypeRow`] / [`PokemonAbilityRow`]: many-to-many link rows.
//! - [`AppDataRow`]: per-Pokémon application state (favorites, search
//!   counters), seeded at load time.
//!
//! ## Diesel expectations
//!
//! This module assumes the tables defined in `crate::schema` exist; the
//! loader's `create_tables` emits the matching DDL. Each struct derives the
//! appropriate Diesel traits (`Queryable`, `Insertable`, `Identifiable`,
//! `Selectable`, `Associations`) and is annotated with
//! `#[diesel(table_name = ...)]` and `#[diesel(belongs_to(...))]` where
//! needed.

use crate::record::{DexRecord, StatBlock};
use diesel::prelude::*;

/// One Pokémon entity row.
///
/// ### Table
/// - `pokemon`
///
/// ### Notes
/// - `id` is the National dex number, not an autoincrement key.
/// - `name` carries a UNIQUE constraint; the loader's INSERT-OR-IGNORE
///   keeps both key spaces stable across re-runs.
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::pokemon)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PokemonRow {
    /// National dex number (primary key, assigned by the API).
    pub id: i32,
    /// Unique lowercase name.
    pub name: String,
    /// Height in decimetres.
    pub height: i32,
    /// Weight in hectograms.
    pub weight: i32,
    /// First English species flavor text (may be empty).
    pub flavor_text: String,
    /// Pre-rendered ASCII art (may be the placeholder string).
    pub ascii_art: String,
}

impl From<&DexRecord> for PokemonRow {
    fn from(record: &DexRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            height: record.height,
            weight: record.weight,
            flavor_text: record.flavor_text.clone(),
            ascii_art: record.ascii_art.clone(),
        }
    }
}

/// The six base stats for one Pokémon.
///
/// ### Table
/// - `stats` (primary key `pokemon_id`)
#[derive(
    Queryable, Identifiable, Insertable, Selectable, Associations, Debug, Clone, Copy, PartialEq,
)]
#[diesel(belongs_to(PokemonRow, foreign_key = pokemon_id))]
#[diesel(table_name = crate::schema::stats)]
#[diesel(primary_key(pokemon_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StatsRow {
    pub pokemon_id: i32,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub special_attack: i32,
    pub special_defense: i32,
    pub speed: i32,
}

impl StatsRow {
    /// Flatten a record's stat block into its row form.
    pub fn from_record(pokemon_id: i32, stats: &StatBlock) -> Self {
        Self {
            pokemon_id,
            hp: stats.hp,
            attack: stats.attack,
            defense: stats.defense,
            special_attack: stats.special_attack,
            special_defense: stats.special_defense,
            speed: stats.speed,
        }
    }

    /// Reassemble the record-side stat block.
    pub fn to_block(self) -> StatBlock {
        StatBlock {
            hp: self.hp,
            attack: self.attack,
            defense: self.defense,
            special_attack: self.special_attack,
            special_defense: self.special_defense,
            speed: self.speed,
        }
    }
}

/// A type name in the lookup table.
///
/// ### Table
/// - `types`
///
/// ### Notes
/// - `id` is optional for `Insertable` convenience; SQLite assigns it on
///   insert and the loader reads it back via RETURNING.
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, PartialEq)]
#[diesel(table_name = crate::schema::types)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TypeRow {
    /// Auto-increment primary key (set by the DB on insert).
    #[diesel(deserialize_as = i32)]
    pub id: Option<i32>,
    /// Unique type name (e.g. `electric`).
    pub name: String,
}

/// An ability name in the lookup table.
///
/// ### Table
/// - `abilities`
#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, PartialEq)]
#[diesel(table_name = crate::schema::abilities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AbilityRow {
    /// Auto-increment primary key (set by the DB on insert).
    #[diesel(deserialize_as = i32)]
    pub id: Option<i32>,
    /// Unique ability name (e.g. `static`).
    pub name: String,
}

/// Link row joining a Pokémon to one of its types.
#[derive(Queryable, Identifiable, Insertable, Selectable, Associations, Debug, Clone, Copy)]
#[diesel(belongs_to(PokemonRow, foreign_key = pokemon_id))]
#[diesel(table_name = crate::schema::pokemon_types)]
#[diesel(primary_key(pokemon_id, type_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PokemonTypeRow {
    pub pokemon_id: i32,
    pub type_id: i32,
}

/// Link row joining a Pokémon to one of its abilities.
#[derive(Queryable, Identifiable, Insertable, Selectable, Associations, Debug, Clone, Copy)]
#[diesel(belongs_to(PokemonRow, foreign_key = pokemon_id))]
#[diesel(table_name = crate::schema::pokemon_abilities)]
#[diesel(primary_key(pokemon_id, ability_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PokemonAbilityRow {
    pub pokemon_id: i32,
    pub ability_id: i32,
}

/// Per-Pokémon application state, seeded with defaults at load time.
///
/// ### Table
/// - `pokemon_app_data` (primary key `pokemon_id`)
#[derive(Queryable, Identifiable, Insertable, Selectable, Associations, Debug, Clone, Copy)]
#[diesel(belongs_to(PokemonRow, foreign_key = pokemon_id))]
#[diesel(table_name = crate::schema::pokemon_app_data)]
#[diesel(primary_key(pokemon_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AppDataRow {
    pub pokemon_id: i32,
    pub is_favorite: bool,
    pub search_count: i32,
}

impl AppDataRow {
    /// Default application state for a newly loaded Pokémon.
    pub fn seed(pokemon_id: i32) -> Self {
        Self {
            pokemon_id,
            is_favorite: false,
            search_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> DexRecord {
        DexRecord {
            name: "pikachu".into(),
            id: 25,
            types: vec!["electric".into()],
            abilities: vec!["static".into()],
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
            flavor_text: "It raises its tail to check its surroundings.".into(),
            ascii_art: "::".into(),
        }
    }

    #[test]
    fn test_pokemon_row_from_record() {
        let record = sample_record();
        let row = PokemonRow::from(&record);
        assert_eq!(row.id, 25);
        assert_eq!(row.name, "pikachu");
        assert_eq!(row.height, 4);
        assert_eq!(row.ascii_art, "::");
    }

    #[test]
    fn test_stats_row_round_trip() {
        let record = sample_record();
        let row = StatsRow::from_record(record.id, &record.stats);
        assert_eq!(row.pokemon_id, 25);
        assert_eq!(row.speed, 90);
        assert_eq!(row.to_block(), record.stats);
    }

    #[test]
    fn test_app_data_seed_defaults() {
        let seed = AppDataRow::seed(25);
        assert!(!seed.is_favorite);
        assert_eq!(seed.search_count, 0);
    }
}

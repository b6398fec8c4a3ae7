//! # Dex records
//!
//! The denormalized per-Pokémon bundle shared by every stage of the app:
//! the fetcher produces [`DexRecord`]s and serializes them to the dex JSON
//! file, the loader flattens them into the relational schema, and the query
//! layer reassembles them for display.
//!
//! The serde field names intentionally match PokeAPI's own spelling
//! (`special-attack`, `special-defense`), so a dex file written by one
//! version of the fetcher loads in any other.

use serde::{Deserialize, Serialize};

/// One Pokémon as fetched from the API: identity, taxonomy, measurements,
/// the named stat block, species flavor text, and pre-rendered ASCII art.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DexRecord {
    /// Lowercase API name (e.g. `pikachu`).
    pub name: String,

    /// National dex number; primary key everywhere.
    pub id: i32,

    /// Type names, slot order preserved (e.g. `["grass", "poison"]`).
    pub types: Vec<String>,

    /// Ability names, slot order preserved.
    pub abilities: Vec<String>,

    /// Height in decimetres, as the API reports it.
    pub height: i32,

    /// Weight in hectograms, as the API reports it.
    pub weight: i32,

    /// The six base stats.
    pub stats: StatBlock,

    /// First English species flavor text, whitespace-normalized. Empty when
    /// the species has no English entry.
    #[serde(default)]
    pub flavor_text: String,

    /// ASCII rendering of the official artwork (or front sprite), or the
    /// literal `"Art not available."` placeholder.
    #[serde(default)]
    pub ascii_art: String,
}

/// The six base stats, keyed in JSON by the API's hyphenated stat names.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct StatBlock {
    #[serde(default)]
    pub hp: i32,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(rename = "special-attack", default)]
    pub special_attack: i32,
    #[serde(rename = "special-defense", default)]
    pub special_defense: i32,
    #[serde(default)]
    pub speed: i32,
}

impl StatBlock {
    /// Stats as `(label, value)` pairs in canonical order, for display.
    pub fn named(&self) -> [(&'static str, i32); 6] {
        [
            ("Hp", self.hp),
            ("Attack", self.attack),
            ("Defense", self.defense),
            ("Special-attack", self.special_attack),
            ("Special-defense", self.special_defense),
            ("Speed", self.speed),
        ]
    }
}

/// A `(id, name)` pair for the roster table; cheap to load for all entries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub id: i32,
    pub name: String,
}

impl DexRecord {
    /// Display name with the first letter uppercased, like the in-game dex.
    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    /// Height converted from API decimetres to metres.
    pub fn height_m(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    /// Weight converted from API hectograms to kilograms.
    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }
}

/// Uppercase the first character of `s`, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_block_uses_api_stat_names() {
        let stats = StatBlock {
            hp: 35,
            attack: 55,
            defense: 40,
            special_attack: 50,
            special_defense: 50,
            speed: 90,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["special-attack"], 50);
        assert_eq!(json["special-defense"], 50);
        assert!(json.get("special_attack").is_none());
    }

    #[test]
    fn test_record_round_trips_original_file_shape() {
        // The exact shape the original data pipeline wrote.
        let json = r#"{
            "name": "bulbasaur",
            "id": 1,
            "types": ["grass", "poison"],
            "abilities": ["overgrow", "chlorophyll"],
            "height": 7,
            "weight": 69,
            "stats": {
                "hp": 45, "attack": 49, "defense": 49,
                "special-attack": 65, "special-defense": 65, "speed": 45
            },
            "flavor_text": "A strange seed was planted on its back at birth.",
            "ascii_art": "@@@@"
        }"#;
        let record: DexRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 1);
        assert_eq!(record.stats.special_attack, 65);
        assert_eq!(record.display_name(), "Bulbasaur");
    }

    #[test]
    fn test_missing_art_and_flavor_default_to_empty() {
        let json = r#"{
            "name": "missingno", "id": 0, "types": [], "abilities": [],
            "height": 0, "weight": 0, "stats": {}
        }"#;
        let record: DexRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.flavor_text, "");
        assert_eq!(record.ascii_art, "");
        assert_eq!(record.stats, StatBlock::default());
    }

    #[test]
    fn test_metric_conversions() {
        let record = DexRecord {
            name: "pikachu".into(),
            id: 25,
            types: vec!["electric".into()],
            abilities: vec!["static".into()],
            height: 4,
            weight: 60,
            stats: StatBlock::default(),
            flavor_text: String::new(),
            ascii_art: String::new(),
        };
        assert_eq!(record.height_m(), 0.4);
        assert_eq!(record.weight_kg(), 6.0);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("pikachu"), "Pikachu");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("mr-mime"), "Mr-mime");
    }
}

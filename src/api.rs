//! # PokeAPI client
//!
//! A thin typed wrapper over the PokeAPI REST endpoints the fetcher needs:
//!
//! - the paginated roster endpoint (`/pokemon?limit=N`),
//! - the per-Pokémon detail endpoint,
//! - the species endpoint (for flavor text),
//! - raw sprite image bytes.
//!
//! The payload structs below deserialize only the fields this application
//! consumes; everything else the API returns is ignored. One
//! [`reqwest::Client`] is shared across all requests so connection pooling
//! and the configured timeout apply uniformly.

use crate::{config::DexConfig, record::StatBlock};
use serde::Deserialize;
use std::{error::Error, time::Duration};
use tracing::debug;

/// A `{name, url}` pair, the unit of every PokeAPI cross-reference.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// One page of the roster list endpoint.
#[derive(Deserialize, Debug)]
pub struct RosterPage {
    pub results: Vec<NamedResource>,
}

/// The subset of the detail endpoint the dex cares about.
#[derive(Deserialize, Debug)]
pub struct PokemonDetail {
    pub id: i32,
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub species: NamedResource,
    pub types: Vec<TypeSlot>,
    pub abilities: Vec<AbilitySlot>,
    pub stats: Vec<StatSlot>,
    pub sprites: SpriteSet,
}

#[derive(Deserialize, Debug)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Deserialize, Debug)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Deserialize, Debug)]
pub struct StatSlot {
    pub base_stat: i32,
    pub stat: NamedResource,
}

/// Sprite URLs. The high-resolution official artwork is preferred; the
/// classic front sprite is the fallback.
#[derive(Deserialize, Debug, Default)]
pub struct SpriteSet {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Deserialize, Debug, Default)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ArtworkSprite>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ArtworkSprite {
    pub front_default: Option<String>,
}

impl SpriteSet {
    /// The best available sprite URL: official artwork first, then the
    /// plain front sprite.
    pub fn best_url(&self) -> Option<&str> {
        self.other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|art| art.front_default.as_deref())
            .or(self.front_default.as_deref())
    }
}

/// The subset of the species endpoint the dex cares about.
#[derive(Deserialize, Debug)]
pub struct SpeciesPayload {
    pub flavor_text_entries: Vec<FlavorTextEntry>,
}

#[derive(Deserialize, Debug)]
pub struct FlavorTextEntry {
    pub flavor_text: String,
    pub language: NamedResource,
}

impl SpeciesPayload {
    /// First English flavor text with the API's embedded `\n` and form-feed
    /// characters flattened to spaces. Empty string when no English entry
    /// exists.
    pub fn english_flavor_text(&self) -> String {
        self.flavor_text_entries
            .iter()
            .find(|entry| entry.language.name == "en")
            .map(|entry| entry.flavor_text.replace(['\n', '\u{c}'], " "))
            .unwrap_or_default()
    }
}

impl PokemonDetail {
    /// Type names in slot order.
    pub fn type_names(&self) -> Vec<String> {
        self.types.iter().map(|slot| slot.kind.name.clone()).collect()
    }

    /// Ability names in slot order.
    pub fn ability_names(&self) -> Vec<String> {
        self.abilities
            .iter()
            .map(|slot| slot.ability.name.clone())
            .collect()
    }

    /// Fold the API's named stat list into the fixed six-stat block.
    /// Unknown stat names are ignored; missing ones stay zero.
    pub fn stat_block(&self) -> StatBlock {
        let mut block = StatBlock::default();
        for slot in &self.stats {
            match slot.stat.name.as_str() {
                "hp" => block.hp = slot.base_stat,
                "attack" => block.attack = slot.base_stat,
                "defense" => block.defense = slot.base_stat,
                "special-attack" => block.special_attack = slot.base_stat,
                "special-defense" => block.special_defense = slot.base_stat,
                "speed" => block.speed = slot.base_stat,
                _ => {}
            }
        }
        block
    }
}

/// HTTP client bound to one PokeAPI base URL.
pub struct PokeClient {
    http: reqwest::Client,
    api_base: String,
}

impl PokeClient {
    /// Creates a new PokeAPI client from configuration.
    ///
    /// # Parameters
    /// - `config: &DexConfig`: Configuration containing the API base and request timeout.
    ///
    /// # Returns
    /// - `Result<PokeClient, Box<dyn Error>>`: Created client or an error if initialization fails.
    pub fn new(config: &DexConfig) -> Result<Self, Box<dyn Error>> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        debug!("PokeAPI client created for {}", config.api_base);
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the master roster: up to `limit` `{name, url}` entries.
    pub async fn fetch_roster(&self, limit: u32) -> Result<Vec<NamedResource>, reqwest::Error> {
        let url = format!("{}/pokemon?limit={}", self.api_base, limit);
        debug!("Fetching roster: {}", url);
        let page: RosterPage = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(page.results)
    }

    /// Fetch one Pokémon's detail payload from its roster URL.
    pub async fn fetch_detail(&self, url: &str) -> Result<PokemonDetail, reqwest::Error> {
        debug!("Fetching detail: {}", url);
        self.http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// Fetch the species payload referenced by a detail payload.
    pub async fn fetch_species(&self, url: &str) -> Result<SpeciesPayload, reqwest::Error> {
        debug!("Fetching species: {}", url);
        self.http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    /// Fetch raw bytes (sprite images).
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        debug!("Fetching bytes: {}", url);
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

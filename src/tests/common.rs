use crate::dex::{Dex, DexMap, DexSource};
use crate::errors::{DexError, DexResult};
use crate::normalize::sprite_slug;
use schema::{BaseStats, Species, FUSION_ID};
use serde_json::json;
use std::time::Duration;

/// A builder for test species with common defaults: a single Normal type,
/// flat 80 base stats, no abilities and no tags.
///
/// # Example
/// ```
/// let mew = SpeciesBuilder::new("mew", 151)
///     .with_types(&["Psychic"])
///     .with_tags(&["Mythical"])
///     .build();
/// ```
pub struct SpeciesBuilder {
    id: String,
    num: i32,
    name: Option<String>,
    types: Vec<String>,
    base_stats: Option<BaseStats>,
    abilities: Option<Vec<String>>,
    tags: Option<Vec<String>>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl SpeciesBuilder {
    pub fn new(id: &str, num: i32) -> Self {
        Self {
            id: id.to_string(),
            num,
            name: None,
            types: vec!["Normal".to_string()],
            base_stats: Some(BaseStats {
                hp: 80,
                attack: 80,
                defense: 80,
                sp_attack: 80,
                sp_defense: 80,
                speed: 80,
            }),
            abilities: None,
            tags: None,
        }
    }

    /// The synthetic fusion placeholder.
    pub fn fusion() -> Self {
        Self::new(FUSION_ID, 0).with_name("Fusion")
    }

    /// Display name. Defaults to the id.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_types(mut self, types: &[&str]) -> Self {
        self.types = owned(types);
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = Some(owned(tags));
        self
    }

    pub fn with_abilities(mut self, abilities: &[&str]) -> Self {
        self.abilities = Some(owned(abilities));
        self
    }

    /// Stats in hp, atk, def, spa, spd, spe order.
    pub fn with_stats(mut self, stats: [u8; 6]) -> Self {
        let [hp, attack, defense, sp_attack, sp_defense, speed] = stats;
        self.base_stats = Some(BaseStats {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        });
        self
    }

    pub fn without_stats(mut self) -> Self {
        self.base_stats = None;
        self
    }

    pub fn build(self) -> Species {
        let name = self.name.unwrap_or_else(|| self.id.clone());
        let slug = sprite_slug(&name);
        Species {
            id: self.id,
            sprite_id: slug.clone(),
            base_sprite_id: slug,
            num: self.num,
            name,
            types: self.types,
            base_stats: self.base_stats,
            abilities: self.abilities,
            tags: self.tags,
        }
    }
}

/// A small raw dex in the Showdown feed format, including entries the
/// normalizer must drop.
pub fn sample_dex_json() -> DexMap {
    let value = json!({
        "bulbasaur": {
            "num": 1, "name": "Bulbasaur", "types": ["Grass", "Poison"],
            "baseStats": {"hp": 45, "atk": 49, "def": 49, "spa": 65, "spd": 65, "spe": 45},
            "abilities": {"0": "Overgrow", "H": "Chlorophyll"}
        },
        "charmander": {
            "num": 4, "name": "Charmander", "types": ["Fire"],
            "baseStats": {"hp": 39, "atk": 52, "def": 43, "spa": 60, "spd": 50, "spe": 65},
            "abilities": {"0": "Blaze", "H": "Solar Power"}
        },
        "charizardmegax": {
            "num": 6, "name": "Charizard-Mega-X", "baseSpecies": "Charizard", "forme": "Mega-X",
            "types": ["Fire", "Dragon"],
            "baseStats": {"hp": 78, "atk": 130, "def": 111, "spa": 130, "spd": 85, "spe": 100},
            "abilities": {"0": "Tough Claws"}
        },
        "charizardgmax": {
            "num": 6, "name": "Charizard-Gmax", "baseSpecies": "Charizard", "forme": "Gmax",
            "types": ["Fire", "Flying"],
            "baseStats": {"hp": 78, "atk": 84, "def": 78, "spa": 109, "spd": 85, "spe": 100},
            "abilities": {"0": "Blaze", "H": "Solar Power"}
        },
        "squirtle": {
            "num": 7, "name": "Squirtle", "types": ["Water"],
            "baseStats": {"hp": 44, "atk": 48, "def": 65, "spa": 50, "spd": 64, "spe": 43},
            "abilities": {"0": "Torrent", "H": "Rain Dish"}
        },
        "pikachu": {
            "num": 25, "name": "Pikachu", "types": ["Electric"],
            "baseStats": {"hp": 35, "atk": 55, "def": 40, "spa": 50, "spd": 50, "spe": 90},
            "abilities": {"0": "Static", "H": "Lightning Rod"}
        },
        "vulpixalola": {
            "num": 37, "name": "Vulpix-Alola", "baseSpecies": "Vulpix", "forme": "Alola",
            "types": ["Ice"],
            "baseStats": {"hp": 38, "atk": 41, "def": 40, "spa": 50, "spd": 65, "spe": 65},
            "abilities": {"0": "Snow Cloak", "H": "Snow Warning"}
        },
        "mew": {
            "num": 151, "name": "Mew", "types": ["Psychic"], "tags": ["Mythical"],
            "baseStats": {"hp": 100, "atk": 100, "def": 100, "spa": 100, "spd": 100, "spe": 100},
            "abilities": {"0": "Synchronize"}
        },
        "chikorita": {
            "num": 152, "name": "Chikorita", "types": ["Grass"],
            "baseStats": {"hp": 45, "atk": 49, "def": 65, "spa": 49, "spd": 65, "spe": 45},
            "abilities": {"0": "Overgrow", "H": "Leaf Guard"}
        },
        "arceus": {
            "num": 493, "name": "Arceus", "types": ["Normal"], "tags": ["Mythical"],
            "baseStats": {"hp": 120, "atk": 120, "def": 120, "spa": 120, "spd": 120, "spe": 120},
            "abilities": {"0": "Multitype"}
        },
        "arceusfire": {
            "num": 493, "name": "Arceus-Fire", "baseSpecies": "Arceus", "forme": "Fire",
            "types": ["Fire"], "tags": ["Mythical"],
            "baseStats": {"hp": 120, "atk": 120, "def": 120, "spa": 120, "spd": 120, "spe": 120},
            "abilities": {"0": "Multitype"}
        },
        "tapufini": {
            "num": 788, "name": "Tapu Fini", "types": ["Water", "Fairy"],
            "baseStats": {"hp": 70, "atk": 75, "def": 115, "spa": 95, "spd": 130, "spe": 85},
            "abilities": {"0": "Misty Surge", "H": "Telepathy"}
        },
        "calyrex": {
            "num": 898, "name": "Calyrex", "types": ["Psychic", "Grass"], "tags": ["Restricted Legendary"],
            "baseStats": {"hp": 100, "atk": 80, "def": 80, "spa": 80, "spd": 80, "spe": 80},
            "abilities": {"0": "Unnerve"}
        },
        "calyrexice": {
            "num": 898, "name": "Calyrex-Ice", "baseSpecies": "Calyrex", "forme": "Ice",
            "types": ["Psychic", "Ice"], "tags": ["Restricted Legendary"],
            "baseStats": {"hp": 100, "atk": 165, "def": 150, "spa": 85, "spd": 130, "spe": 50},
            "abilities": {"0": "As One (Glastrier)"}
        },
        "fluttermane": {
            "num": 987, "name": "Flutter Mane", "types": ["Ghost", "Fairy"], "tags": ["Paradox"],
            "baseStats": {"hp": 55, "atk": 55, "def": 55, "spa": 135, "spd": 135, "spe": 135},
            "abilities": {"0": "Protosynthesis"}
        },
        "pokestarsmeargle": {
            "num": -5000, "name": "Pokestar Smeargle", "types": ["Normal"],
            "abilities": {"0": "Own Tempo"}
        },
        "missingtypes": {
            "num": 9999, "name": "Broken"
        },
        "nullentry": null
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!("fixture is an object"),
    }
}

/// Ids that survive normalization of [`sample_dex_json`].
pub const SAMPLE_KEPT: [&str; 13] = [
    "bulbasaur",
    "charmander",
    "charizardgmax",
    "charizardmegax",
    "squirtle",
    "pikachu",
    "vulpixalola",
    "mew",
    "chikorita",
    "arceus",
    "tapufini",
    "calyrex",
    "fluttermane",
];

pub fn sample_dex() -> Dex {
    Dex::build(sample_dex_json(), None)
}

/// In-memory dex source with an optional delay, for loader and ordering
/// tests.
#[derive(Debug, Clone, Default)]
pub struct MockDexSource {
    pub dex: Option<DexMap>,
    pub overrides: Option<DexMap>,
    pub fail_status: Option<u16>,
    pub delay: Option<Duration>,
}

impl MockDexSource {
    pub fn with_dex(dex: DexMap) -> Self {
        Self {
            dex: Some(dex),
            ..Self::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::default()
        }
    }
}

impl DexSource for MockDexSource {
    async fn fetch_dex(&self) -> DexResult<DexMap> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(status) = self.fail_status {
            return Err(DexError::HttpStatus { status });
        }
        Ok(self.dex.clone().unwrap_or_default())
    }

    async fn fetch_overrides(&self) -> Option<DexMap> {
        self.overrides.clone()
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// Identifier, display name and sprite id of the synthetic fusion species.
pub const FUSION_ID: &str = "fusion";

/// One of the six base stats, keyed the way the Showdown dex keys them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum StatKey {
    #[serde(rename = "hp")]
    Hp,
    #[serde(rename = "atk")]
    Attack,
    #[serde(rename = "def")]
    Defense,
    #[serde(rename = "spa")]
    SpAttack,
    #[serde(rename = "spd")]
    SpDefense,
    #[serde(rename = "spe")]
    Speed,
}

impl StatKey {
    /// Short label used in stat readouts.
    pub fn label(self) -> &'static str {
        match self {
            StatKey::Hp => "HP",
            StatKey::Attack => "Atk",
            StatKey::Defense => "Def",
            StatKey::SpAttack => "SpA",
            StatKey::SpDefense => "SpD",
            StatKey::Speed => "Spe",
        }
    }

    /// Parses either the dex key (`spa`) or the label (`SpA`), case-insensitively.
    pub fn parse(text: &str) -> Option<StatKey> {
        let wanted = text.trim().to_ascii_lowercase();
        StatKey::iter().find(|key| {
            key.dex_key() == wanted || key.label().eq_ignore_ascii_case(&wanted)
        })
    }

    pub fn dex_key(self) -> &'static str {
        match self {
            StatKey::Hp => "hp",
            StatKey::Attack => "atk",
            StatKey::Defense => "def",
            StatKey::SpAttack => "spa",
            StatKey::SpDefense => "spd",
            StatKey::Speed => "spe",
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    #[serde(rename = "atk")]
    pub attack: u8,
    #[serde(rename = "def")]
    pub defense: u8,
    #[serde(rename = "spa")]
    pub sp_attack: u8,
    #[serde(rename = "spd")]
    pub sp_defense: u8,
    #[serde(rename = "spe")]
    pub speed: u8,
}

impl BaseStats {
    pub fn get(&self, key: StatKey) -> u8 {
        match key {
            StatKey::Hp => self.hp,
            StatKey::Attack => self.attack,
            StatKey::Defense => self.defense,
            StatKey::SpAttack => self.sp_attack,
            StatKey::SpDefense => self.sp_defense,
            StatKey::Speed => self.speed,
        }
    }

    /// Base stat total.
    pub fn total(&self) -> u16 {
        StatKey::iter().map(|key| u16::from(self.get(key))).sum()
    }
}

/// A normalized dex entry: one Pokemon or one named form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    /// Key of the entry in the source dex (no dashes for most formes).
    pub id: String,
    /// Sprite filename id derived from the display name, usually dashed.
    pub sprite_id: String,
    /// Sprite filename id of the base species, tried after `sprite_id`.
    pub base_sprite_id: String,
    /// National dex number. Zero marks the synthetic fusion entry.
    pub num: i32,
    pub name: String,
    pub types: Vec<String>,
    pub base_stats: Option<BaseStats>,
    pub abilities: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl Species {
    pub fn is_fusion(&self) -> bool {
        self.id == FUSION_ID
    }

    pub fn abilities(&self) -> &[String] {
        self.abilities.as_deref().unwrap_or(&[])
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }
}

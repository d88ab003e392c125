use crate::species_data::StatKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

pub const MIN_COUNT: u8 = 1;
pub const MAX_COUNT: u8 = 12;
pub const DEFAULT_COUNT: u8 = 6;
/// Highest possible base stat total (6 x 255).
pub const MAX_BST: u16 = 1530;
pub const MAX_GENERATION: u8 = 9;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LegendCategory {
    Legendary,
    Sublegendary,
    Mythical,
    Paradox,
}

impl LegendCategory {
    pub fn all() -> Vec<LegendCategory> {
        LegendCategory::iter().collect()
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttackerPref {
    #[default]
    Any,
    /// Atk >= SpA
    Physical,
    /// SpA > Atk
    Special,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StatMode {
    #[default]
    Min,
    Max,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AbilityMode {
    Off,
    #[default]
    Species,
    Random,
}

/// Shiny roll denominator. Only these four odds are offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ShinyOdds {
    OneIn4096,
    OneIn2048,
    #[default]
    OneIn512,
    OneIn128,
}

impl ShinyOdds {
    pub const ALL: [ShinyOdds; 4] = [
        ShinyOdds::OneIn4096,
        ShinyOdds::OneIn2048,
        ShinyOdds::OneIn512,
        ShinyOdds::OneIn128,
    ];

    pub fn denominator(self) -> u32 {
        match self {
            ShinyOdds::OneIn4096 => 4096,
            ShinyOdds::OneIn2048 => 2048,
            ShinyOdds::OneIn512 => 512,
            ShinyOdds::OneIn128 => 128,
        }
    }
}

impl TryFrom<u32> for ShinyOdds {
    type Error = OptionsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        ShinyOdds::ALL
            .into_iter()
            .find(|odds| odds.denominator() == value)
            .ok_or(OptionsError::UnsupportedShinyOdds(value))
    }
}

impl From<ShinyOdds> for u32 {
    fn from(odds: ShinyOdds) -> Self {
        odds.denominator()
    }
}

impl fmt::Display for ShinyOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1 / {}", self.denominator())
    }
}

/// Errors raised when a set of options is out of range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// Roster size outside 1..=12
    CountOutOfRange(u8),
    /// Generation outside 1..=9
    UnknownGeneration(u8),
    /// BST threshold above the maximum possible total
    BstOutOfRange(u16),
    /// Shiny denominator that is not one of the offered odds
    UnsupportedShinyOdds(u32),
    /// Compiled or stored options could not be decoded
    Corrupt(String),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::CountOutOfRange(count) => write!(
                f,
                "Roster size {} is outside {}-{}",
                count, MIN_COUNT, MAX_COUNT
            ),
            OptionsError::UnknownGeneration(gen) => write!(
                f,
                "Generation {} is outside 1-{}",
                gen, MAX_GENERATION
            ),
            OptionsError::BstOutOfRange(bst) => {
                write!(f, "BST threshold {} exceeds {}", bst, MAX_BST)
            }
            OptionsError::UnsupportedShinyOdds(odds) => write!(
                f,
                "Shiny odds 1/{} not supported (use 4096, 2048, 512 or 128)",
                odds
            ),
            OptionsError::Corrupt(details) => write!(f, "Corrupt options data: {}", details),
        }
    }
}

impl std::error::Error for OptionsError {}

/// User configuration for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub count: u8,

    // Form-category toggles
    pub include_mega: bool,
    pub include_gmax: bool,
    pub include_regional: bool,

    // Filters
    pub type_filter: Vec<String>,           // must include all selected types
    pub gen_filter: Vec<u8>,                // allowed gens, empty => all
    pub legend_cats: Vec<LegendCategory>,   // empty => everything, non-legends included

    pub attacker: AttackerPref,

    pub stat_mode: StatMode,
    pub stat_filters: BTreeMap<StatKey, u8>,
    pub bst: Option<u16>,

    pub random_typing: bool,

    // Extras
    pub ability_mode: AbilityMode,
    pub include_buff: bool,
    pub fusion: bool,
    pub mystery: bool,

    pub shiny_odds: ShinyOdds,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            include_mega: true,
            include_gmax: false,
            include_regional: true,
            type_filter: Vec::new(),
            gen_filter: Vec::new(),
            legend_cats: Vec::new(),
            attacker: AttackerPref::Any,
            stat_mode: StatMode::Min,
            stat_filters: BTreeMap::new(),
            bst: None,
            random_typing: false,
            ability_mode: AbilityMode::Species,
            include_buff: false,
            fusion: false,
            mystery: false,
            shiny_odds: ShinyOdds::OneIn512,
        }
    }
}

impl Options {
    /// Maps raw roster-size input onto 1..=12. Zero (an empty or unparsable
    /// field) falls back to the default size.
    pub fn clamp_count(requested: i64) -> u8 {
        if requested == 0 {
            return DEFAULT_COUNT;
        }
        requested.clamp(i64::from(MIN_COUNT), i64::from(MAX_COUNT)) as u8
    }

    pub fn clamp_stat(requested: i64) -> u8 {
        requested.clamp(0, i64::from(u8::MAX)) as u8
    }

    pub fn clamp_bst(requested: i64) -> u16 {
        requested.clamp(0, i64::from(MAX_BST)) as u16
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(MIN_COUNT..=MAX_COUNT).contains(&self.count) {
            return Err(OptionsError::CountOutOfRange(self.count));
        }
        if let Some(gen) = self
            .gen_filter
            .iter()
            .find(|gen| !(1..=MAX_GENERATION).contains(*gen))
        {
            return Err(OptionsError::UnknownGeneration(*gen));
        }
        if let Some(bst) = self.bst.filter(|bst| *bst > MAX_BST) {
            return Err(OptionsError::BstOutOfRange(bst));
        }
        Ok(())
    }

    /// True when any per-stat or BST threshold is configured.
    pub fn has_stat_thresholds(&self) -> bool {
        !self.stat_filters.is_empty() || self.bst.is_some()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, OptionsError> {
        postcard::to_allocvec(self).map_err(|e| OptionsError::Corrupt(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Options, OptionsError> {
        postcard::from_bytes(bytes).map_err(|e| OptionsError::Corrupt(e.to_string()))
    }
}

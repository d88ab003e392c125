// In: src/lib.rs

//! Pinkmon Generator
//!
//! Draws random rosters from the Pokémon Showdown dex: normalization of the
//! raw feed, composable filters, uniform selection without replacement,
//! cosmetic extras (shiny rolls, random typing, abilities, buffs, fusion,
//! mystery cards) and sprite URL fallback chains.

// --- MODULE DECLARATIONS ---
pub mod augment;
pub mod config;
pub mod dex;
pub mod errors;
pub mod filters;
pub mod generate;
pub mod mcp_interface;
pub mod normalize;
pub mod presets;
pub mod rng;
pub mod select;
pub mod sprites;
pub mod state;

#[cfg(test)]
mod tests;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    AbilityMode, AttackerPref, BaseStats, LegendCategory, Options, OptionsError, ShinyOdds,
    Species, StatKey, StatMode,
};

// --- From this crate's modules (`src/`) ---

// Loading and the pool.
pub use dex::{load_dex, Dex, DexLoadTask, DexSource, HttpDexSource, PS_POKEDEX_URL};

// One generation call and its output.
pub use augment::Generated;
pub use generate::generate;

// Application state.
pub use state::{Action, AppState, LoadState, Toggle};

pub use config::GeneratorConfig;
pub use rng::{RandomSource, SeededRng};

// Crate-specific error and result types.
pub use errors::{ConfigError, ConfigResult, DexError, DexResult, PresetError, PresetResult};

// Pinkmon Schema - Shared type definitions
// This crate contains the species and option types that are shared between
// the main pinkmon-generator crate and its build script, enabling the use of
// postcard for compiled preset data.

// Re-export the main types
pub use options::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod options;
pub mod pokemon_types;
pub mod species_data;

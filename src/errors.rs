use schema::OptionsError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the primary dataset fetch. Any of these leaves the generator
/// without a pool until the load sequence is run again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DexError {
    /// The server answered with a non-success status
    #[error("Failed to fetch PS pokedex.json ({status})")]
    HttpStatus { status: u16 },

    /// The request never produced a response
    #[error("Network error while fetching the dex: {0}")]
    Network(String),

    /// The body was not a JSON object of dex entries
    #[error("Dex payload is not a JSON object: {0}")]
    Decode(String),

    /// The dex could not be read from disk
    #[error("Could not read dex file {path}: {details}")]
    File { path: PathBuf, details: String },
}

/// Errors raised while loading a generator config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid RON in config {path}: {details}")]
    Ron { path: PathBuf, details: String },

    #[error("Invalid options in config: {0}")]
    Options(#[from] OptionsError),
}

/// Errors looking up compiled presets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresetError {
    #[error("Unknown preset '{name}' (available: {available})")]
    Unknown { name: String, available: String },

    #[error("Preset '{name}' is corrupt: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: OptionsError,
    },
}

/// Type alias for Results using DexError
pub type DexResult<T> = Result<T, DexError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Type alias for Results using PresetError
pub type PresetResult<T> = Result<T, PresetError>;

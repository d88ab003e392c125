use crate::dex::PS_POKEDEX_URL;
use crate::errors::{ConfigError, ConfigResult};
use schema::Options;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Default location of the optional override file, relative to the working
/// directory.
pub const DEFAULT_OVERRIDE_PATH: &str = "custom/pokedex.json";

/// Host configuration, read from a RON file. Every field is optional.
///
/// ```ron
/// (
///     dataset_url: "https://play.pokemonshowdown.com/data/pokedex.json",
///     override_url: Some("custom/pokedex.json"),
///     options: (count: 3, fusion: true),
///     seed: Some(42),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub dataset_url: String,
    /// Override file location. A missing file is not an error.
    pub override_url: Option<String>,
    /// Starting options; also what a reset returns to.
    pub options: Options,
    /// Fixed seed for reproducible rosters.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            dataset_url: PS_POKEDEX_URL.to_string(),
            override_url: Some(DEFAULT_OVERRIDE_PATH.to_string()),
            options: Options::default(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_ron_str(content: &str, origin: &Path) -> ConfigResult<Self> {
        let config: GeneratorConfig = ron::from_str(content).map_err(|e| ConfigError::Ron {
            path: origin.to_path_buf(),
            details: e.to_string(),
        })?;
        config.options.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&content, path)?;
        debug!(path = %path.display(), "loaded generator config");
        Ok(config)
    }

    /// Reads `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

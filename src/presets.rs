//! Named option sets and the buff catalog, compiled in from `data/`.

use crate::errors::{PresetError, PresetResult};
use schema::Options;

include!(concat!(env!("OUT_DIR"), "/generated_data.rs"));

/// Preset names in alphabetical order.
pub fn preset_names() -> &'static [&'static str] {
    PRESET_NAMES
}

pub fn get_preset(name: &str) -> PresetResult<Options> {
    let key = name.trim().to_lowercase();
    let bytes = COMPILED_PRESETS
        .get(key.as_str())
        .ok_or_else(|| PresetError::Unknown {
            name: name.to_string(),
            available: PRESET_NAMES.join(", "),
        })?;
    Options::from_bytes(bytes).map_err(|source| PresetError::Corrupt {
        name: key,
        source,
    })
}

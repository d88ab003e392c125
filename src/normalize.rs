//! Turns raw Showdown dex records into [`Species`].
//!
//! The feed is treated as untrusted: each record is validated on its own and
//! anything that does not fit is dropped from the pool rather than failing
//! the load.

use schema::{BaseStats, Species};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Fields of a dex record the generator reads. `num`, `name` and `types` are
/// required; everything else is optional and ignored when malformed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    pub num: i32,
    pub name: String,
    pub types: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub abilities: Option<BTreeMap<String, String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub base_stats: Option<BaseStats>,
    #[serde(default, deserialize_with = "lenient")]
    pub base_species: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub forme: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Option<Vec<String>>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl RawEntry {
    /// Validates one record. Returns `None` for records missing a numeric dex
    /// number, a name or a type list.
    pub fn parse(value: &Value) -> Option<RawEntry> {
        let entry: RawEntry = RawEntry::deserialize(value).ok()?;
        if entry.name.is_empty() {
            return None;
        }
        Some(entry)
    }

    /// Base species name, or the entry's own name for base forms.
    fn base_name(&self) -> &str {
        self.base_species
            .as_deref()
            .filter(|base| !base.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Lowercases and collapses every run of non-alphanumerics into one hyphen.
///
/// "Tapu Fini" -> "tapu-fini", "Mr. Mime" -> "mr-mime"
pub fn sprite_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Forms that never enter the pool, whatever the user's options.
pub fn is_banned_form(id: &str, entry: &RawEntry) -> bool {
    let base = entry.base_name().to_lowercase();
    let forme = entry.forme.as_deref().unwrap_or_default().to_lowercase();

    // Type-changing plates and memories: keep only the base form.
    if base == "arceus" && id != "arceus" {
        return true;
    }
    if base == "silvally" && id != "silvally" {
        return true;
    }

    if id.contains("totem") || forme.contains("totem") {
        return true;
    }
    if id.contains("busted") || forme.contains("busted") {
        return true;
    }
    if id.contains("crowned") || forme.contains("crowned") {
        return true;
    }
    if base == "calyrex" && (id.ends_with("ice") || forme.contains("ice")) {
        return true;
    }

    false
}

/// Builds a [`Species`] from a validated record.
pub fn normalize_entry(id: &str, entry: &RawEntry) -> Species {
    let abilities = entry.abilities.as_ref().map(|slots| {
        let mut names: Vec<String> = Vec::new();
        for name in slots.values().filter(|name| !name.is_empty()) {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    });

    Species {
        id: id.to_string(),
        sprite_id: sprite_slug(&entry.name),
        base_sprite_id: sprite_slug(entry.base_name()),
        num: entry.num,
        name: entry.name.clone(),
        types: entry.types.clone(),
        base_stats: entry.base_stats,
        abilities,
        tags: entry.tags.clone(),
    }
}

/// Counts of what a normalization pass kept and why it dropped the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub kept: usize,
    pub malformed: usize,
    pub banned: usize,
    pub unnumbered: usize,
}

/// Normalizes a whole dex map into a pool sorted by dex number, then name.
pub fn normalize_dex(dex: &Map<String, Value>) -> (Vec<Species>, NormalizeReport) {
    let mut report = NormalizeReport::default();
    let mut pool = Vec::with_capacity(dex.len());

    for (id, value) in dex {
        let Some(entry) = RawEntry::parse(value) else {
            report.malformed += 1;
            continue;
        };
        if is_banned_form(id, &entry) {
            report.banned += 1;
            continue;
        }
        // CAP and other placeholder entries carry non-positive numbers.
        if entry.num <= 0 {
            report.unnumbered += 1;
            continue;
        }
        pool.push(normalize_entry(id, &entry));
    }

    pool.sort_by(|a, b| a.num.cmp(&b.num).then_with(|| a.name.cmp(&b.name)));
    report.kept = pool.len();

    debug!(
        kept = report.kept,
        malformed = report.malformed,
        banned = report.banned,
        unnumbered = report.unnumbered,
        "normalized dex"
    );

    (pool, report)
}

/// Shallow-merges override records onto the dex: each override field replaces
/// the base field of the same name, and unknown keys add new records.
/// Overrides that are not JSON objects are ignored.
pub fn apply_overrides(dex: &mut Map<String, Value>, overrides: Map<String, Value>) -> usize {
    let mut applied = 0;
    for (id, patch) in overrides {
        let Value::Object(patch) = patch else {
            continue;
        };
        match dex.get_mut(&id) {
            Some(Value::Object(base)) => base.extend(patch),
            _ => {
                dex.insert(id, Value::Object(patch));
            }
        }
        applied += 1;
    }
    applied
}

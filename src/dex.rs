//! Loading the species pool.
//!
//! The dex and the optional override file are fetched concurrently and both
//! must settle before normalization. Only the dex fetch can fail the load;
//! override problems are logged and ignored.

use crate::augment::AugmentContext;
use crate::errors::{DexError, DexResult};
use crate::filters::generation_of;
use crate::normalize::{apply_overrides, normalize_dex, NormalizeReport};
use schema::{merge_unique, Species};
use serde_json::{Map, Value};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const PS_POKEDEX_URL: &str = "https://play.pokemonshowdown.com/data/pokedex.json";

/// Raw dex payload keyed by species id.
pub type DexMap = Map<String, Value>;

/// The normalized, read-only species pool and the lists derived from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dex {
    /// Sorted by dex number, then name.
    pub species: Vec<Species>,
    /// Every type in the pool, sorted.
    pub types: Vec<String>,
    /// Generations present in the pool, ascending.
    pub generations: Vec<u8>,
    /// Every ability in the pool except "No Ability", first-seen order.
    pub ability_pool: Vec<String>,
    pub report: NormalizeReport,
}

impl Dex {
    /// Merges overrides (if any) onto the raw dex and normalizes it.
    pub fn build(mut raw: DexMap, overrides: Option<DexMap>) -> Dex {
        if let Some(overrides) = overrides {
            let applied = apply_overrides(&mut raw, overrides);
            info!(applied, "applied custom dex overrides");
        }
        let (species, report) = normalize_dex(&raw);
        Dex::from_species(species, report)
    }

    pub fn from_species(species: Vec<Species>, report: NormalizeReport) -> Dex {
        let mut types = Vec::new();
        let mut ability_pool = Vec::new();
        for s in &species {
            merge_unique(&mut types, &s.types);
            let abilities: Vec<&String> = s
                .abilities()
                .iter()
                .filter(|a| !a.is_empty() && !a.eq_ignore_ascii_case("no ability"))
                .collect();
            merge_unique(&mut ability_pool, &abilities);
        }
        types.sort();

        let mut generations: Vec<u8> = species.iter().map(|s| generation_of(s.num)).collect();
        generations.sort_unstable();
        generations.dedup();

        Dex {
            species,
            types,
            generations,
            ability_pool,
            report,
        }
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Species> {
        self.species.iter().find(|s| s.id == id)
    }

    /// Looks a species up by dex id or display name, ignoring case.
    pub fn find(&self, query: &str) -> Option<&Species> {
        let query = query.trim();
        self.get(&query.to_lowercase())
            .or_else(|| self.species.iter().find(|s| s.name.eq_ignore_ascii_case(query)))
    }

    pub fn augment_context<'a>(&'a self, buffs: &'a [&'a str]) -> AugmentContext<'a> {
        AugmentContext {
            all_types: &self.types,
            ability_pool: &self.ability_pool,
            buffs,
        }
    }
}

/// Where the raw dex and its overrides come from.
pub trait DexSource {
    /// Fetches the primary dataset. Failure is fatal to the load.
    fn fetch_dex(&self) -> impl Future<Output = DexResult<DexMap>> + Send;

    /// Fetches optional overrides. Absence and failure both yield `None`.
    fn fetch_overrides(&self) -> impl Future<Output = Option<DexMap>> + Send;
}

/// Fetches over HTTP, or from disk for locations that are not http(s) URLs.
#[derive(Debug, Clone)]
pub struct HttpDexSource {
    client: reqwest::Client,
    dex_location: String,
    override_location: Option<String>,
}

impl HttpDexSource {
    pub fn new(dex_location: impl Into<String>, override_location: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            dex_location: dex_location.into(),
            override_location,
        }
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

fn into_object(value: Value) -> DexResult<DexMap> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DexError::Decode(format!(
            "expected an object of entries, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

async fn fetch_remote(client: &reqwest::Client, url: &str) -> DexResult<DexMap> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DexError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DexError::HttpStatus {
            status: status.as_u16(),
        });
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| DexError::Decode(e.to_string()))?;
    into_object(body)
}

async fn read_local(path: &str) -> DexResult<DexMap> {
    let path = PathBuf::from(path.strip_prefix("file://").unwrap_or(path));
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| DexError::File {
            path: path.clone(),
            details: e.to_string(),
        })?;
    let body: Value =
        serde_json::from_str(&content).map_err(|e| DexError::Decode(e.to_string()))?;
    into_object(body)
}

impl DexSource for HttpDexSource {
    async fn fetch_dex(&self) -> DexResult<DexMap> {
        if is_remote(&self.dex_location) {
            fetch_remote(&self.client, &self.dex_location).await
        } else {
            read_local(&self.dex_location).await
        }
    }

    async fn fetch_overrides(&self) -> Option<DexMap> {
        let location = self.override_location.as_deref()?;
        let fetched = if is_remote(location) {
            fetch_remote(&self.client, location).await
        } else {
            let path = location.strip_prefix("file://").unwrap_or(location);
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                debug!(location, "no custom dex overrides");
                return None;
            }
            read_local(location).await
        };
        match fetched {
            Ok(map) => Some(map),
            Err(e) => {
                warn!(location, error = %e, "ignoring custom dex overrides");
                None
            }
        }
    }
}

/// Runs both fetches to completion, then builds the pool.
pub async fn load_dex<S: DexSource>(source: &S) -> DexResult<Dex> {
    let (dex, overrides) = tokio::join!(source.fetch_dex(), source.fetch_overrides());
    let dex = dex?;
    debug!(records = dex.len(), "fetched raw dex");

    let dex = Dex::build(dex, overrides);
    info!(
        species = dex.len(),
        types = dex.types.len(),
        dropped = dex.report.malformed + dex.report.banned + dex.report.unnumbered,
        "dex ready"
    );
    Ok(dex)
}

/// A load running in the background, tagged with the ticket it was started
/// under.
#[derive(Debug)]
pub struct DexLoadTask {
    pub ticket: u64,
    handle: JoinHandle<DexResult<Dex>>,
}

impl DexLoadTask {
    pub fn spawn<S>(source: Arc<S>, ticket: u64) -> Self
    where
        S: DexSource + Send + Sync + 'static,
    {
        let handle = tokio::spawn(async move { load_dex(source.as_ref()).await });
        Self { ticket, handle }
    }

    /// Abandons the load. Its result is never delivered.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Waits for the load. `None` if it was aborted or panicked.
    pub async fn join(self) -> Option<(u64, DexResult<Arc<Dex>>)> {
        match self.handle.await {
            Ok(result) => Some((self.ticket, result.map(Arc::new))),
            Err(e) => {
                debug!(ticket = self.ticket, error = %e, "dex load abandoned");
                None
            }
        }
    }
}

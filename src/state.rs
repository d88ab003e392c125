//! Application state and its reducer.
//!
//! Every user interaction and every load completion is an [`Action`];
//! [`AppState::apply`] is the single place state changes. Loads carry the
//! ticket they were started under, and a completion whose ticket is no longer
//! current (a newer load began, or the state was torn down) is dropped.

use crate::augment::Generated;
use crate::dex::Dex;
use crate::errors::DexError;
use crate::generate::generate;
use crate::rng::RandomSource;
use schema::{
    same_type, AbilityMode, AttackerPref, LegendCategory, Options, ShinyOdds, StatKey, StatMode,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    NotStarted,
    Loading { ticket: u64 },
    Ready,
    Failed { message: String },
}

/// Boolean options toggled from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Mega,
    Gmax,
    Regional,
    RandomTyping,
    Buff,
    Fusion,
    Mystery,
}

#[derive(Debug, Clone)]
pub enum Action {
    /// Starts a (re)load. The new ticket is available from
    /// [`AppState::loading_ticket`].
    BeginLoad,
    DexLoaded {
        ticket: u64,
        result: Result<Arc<Dex>, DexError>,
    },
    /// The host is going away; later completions are ignored.
    TearDown,

    SetOptions(Options),
    SetCount(i64),
    SetToggle(Toggle, bool),
    ToggleType(String),
    SetTypes(Vec<String>),
    ToggleGeneration(u8),
    SetGenerations(Vec<u8>),
    ToggleLegend(LegendCategory),
    SetLegends(Vec<LegendCategory>),
    SetAttacker(AttackerPref),
    SetStatMode(StatMode),
    /// `None` clears the threshold.
    SetStatFilter {
        stat: StatKey,
        value: Option<i64>,
    },
    SetBst(Option<i64>),
    SetAbilityMode(AbilityMode),
    SetShinyOdds(ShinyOdds),

    Generate,
    /// Flips a mystery card face up. Unknown keys are ignored.
    Reveal(String),
    /// Back to the default options with no results.
    Reset,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub load: LoadState,
    pub dex: Option<Arc<Dex>>,
    pub options: Options,
    /// `None` until the first generation call.
    pub results: Option<Vec<Generated>>,
    defaults: Options,
    last_ticket: u64,
    torn_down: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if let Some(pos) = items.iter().position(|existing| *existing == item) {
        items.remove(pos);
    } else {
        items.push(item);
    }
}

impl AppState {
    /// Fresh state whose options (and reset target) are `defaults`.
    pub fn new(defaults: Options) -> Self {
        Self {
            load: LoadState::NotStarted,
            dex: None,
            options: defaults.clone(),
            results: None,
            defaults,
            last_ticket: 0,
            torn_down: false,
        }
    }

    pub fn loading_ticket(&self) -> Option<u64> {
        match self.load {
            LoadState::Loading { ticket } => Some(ticket),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// True only before any load was requested. A failed load does not
    /// count: it is retried by an explicit `BeginLoad` alone.
    pub fn needs_first_load(&self) -> bool {
        self.load == LoadState::NotStarted && !self.torn_down
    }

    /// Generation is only offered once a non-empty pool has loaded and no
    /// reload is in flight.
    pub fn can_generate(&self) -> bool {
        self.load == LoadState::Ready && self.dex.as_ref().is_some_and(|dex| !dex.is_empty())
    }

    pub fn apply(mut self, action: Action, rng: &mut impl RandomSource) -> AppState {
        if self.torn_down {
            debug!(?action, "ignoring action after teardown");
            return self;
        }

        match action {
            Action::BeginLoad => {
                self.last_ticket += 1;
                self.load = LoadState::Loading {
                    ticket: self.last_ticket,
                };
                debug!(ticket = self.last_ticket, "dex load started");
            }
            Action::DexLoaded { ticket, result } => {
                if self.loading_ticket() != Some(ticket) {
                    debug!(ticket, "discarding stale dex load");
                    return self;
                }
                match result {
                    Ok(dex) => {
                        info!(species = dex.len(), "dex loaded");
                        self.dex = Some(dex);
                        self.load = LoadState::Ready;
                    }
                    Err(e) => {
                        warn!(error = %e, "dex load failed");
                        self.load = LoadState::Failed {
                            message: e.to_string(),
                        };
                    }
                }
            }
            Action::TearDown => {
                self.torn_down = true;
                if self.is_loading() {
                    self.load = LoadState::NotStarted;
                }
            }

            Action::SetOptions(options) => self.options = options,
            Action::SetCount(raw) => self.options.count = Options::clamp_count(raw),
            Action::SetToggle(which, on) => {
                let field = match which {
                    Toggle::Mega => &mut self.options.include_mega,
                    Toggle::Gmax => &mut self.options.include_gmax,
                    Toggle::Regional => &mut self.options.include_regional,
                    Toggle::RandomTyping => &mut self.options.random_typing,
                    Toggle::Buff => &mut self.options.include_buff,
                    Toggle::Fusion => &mut self.options.fusion,
                    Toggle::Mystery => &mut self.options.mystery,
                };
                *field = on;
            }
            Action::ToggleType(name) => {
                let filter = &mut self.options.type_filter;
                if let Some(pos) = filter.iter().position(|t| same_type(t, &name)) {
                    filter.remove(pos);
                } else {
                    filter.push(name);
                }
            }
            Action::SetTypes(types) => self.options.type_filter = types,
            Action::ToggleGeneration(gen) => toggle(&mut self.options.gen_filter, gen),
            Action::SetGenerations(gens) => self.options.gen_filter = gens,
            Action::ToggleLegend(cat) => toggle(&mut self.options.legend_cats, cat),
            Action::SetLegends(cats) => self.options.legend_cats = cats,
            Action::SetAttacker(pref) => self.options.attacker = pref,
            Action::SetStatMode(mode) => self.options.stat_mode = mode,
            Action::SetStatFilter { stat, value } => match value {
                Some(raw) => {
                    self.options
                        .stat_filters
                        .insert(stat, Options::clamp_stat(raw));
                }
                None => {
                    self.options.stat_filters.remove(&stat);
                }
            },
            Action::SetBst(value) => self.options.bst = value.map(Options::clamp_bst),
            Action::SetAbilityMode(mode) => self.options.ability_mode = mode,
            Action::SetShinyOdds(odds) => self.options.shiny_odds = odds,

            Action::Generate => {
                let dex = match &self.dex {
                    Some(dex) if self.can_generate() => Arc::clone(dex),
                    _ => {
                        warn!("generate requested before the dex is ready");
                        return self;
                    }
                };
                self.results = Some(generate(&dex, &self.options, rng));
            }
            Action::Reveal(key) => {
                if let Some(result) = self
                    .results
                    .iter_mut()
                    .flatten()
                    .find(|result| result.key == key)
                {
                    result.revealed = true;
                }
            }
            Action::Reset => {
                self.options = self.defaults.clone();
                self.results = None;
            }
        }

        self
    }
}

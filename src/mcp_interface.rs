//! Text rendering and command parsing shared by the CLI and the MCP server.
//!
//! Option edits arrive as short commands ("count 3", "type fire",
//! "stat spe 100") and are turned into reducer [`Action`]s here, so both
//! front ends accept the same vocabulary.

use crate::augment::Generated;
use crate::presets::{get_preset, preset_names};
use crate::sprites::{result_sprite_candidates, species_sprite_candidates};
use crate::state::{Action, AppState, LoadState, Toggle};
use schema::{
    AbilityMode, AttackerPref, LegendCategory, Options, ShinyOdds, Species, StatKey, StatMode,
};

/// One line describing where the dex load stands.
pub fn display_dex_status(state: &AppState) -> String {
    match (&state.load, &state.dex) {
        (LoadState::NotStarted, _) => "Dex not loaded.".to_string(),
        (LoadState::Loading { .. }, _) => "Loading dex...".to_string(),
        (LoadState::Failed { message }, _) => format!("Dex load failed: {}", message),
        (LoadState::Ready, Some(dex)) => format!(
            "Dex ready: {} species, {} types, generations {}.",
            dex.len(),
            dex.types.len(),
            dex.generations
                .iter()
                .map(u8::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        (LoadState::Ready, None) => "Dex ready but empty.".to_string(),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn list_or<T: ToString>(items: &[T], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items
            .iter()
            .map(T::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn display_options(options: &Options) -> String {
    let stats = if options.stat_filters.is_empty() {
        "none".to_string()
    } else {
        options
            .stat_filters
            .iter()
            .map(|(key, value)| format!("{} {}", key.label(), value))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut out = String::from("--- Options ---\n");
    out.push_str(&format!("Count: {}\n", options.count));
    out.push_str(&format!(
        "Forms: mega {}, gmax {}, regional {}\n",
        on_off(options.include_mega),
        on_off(options.include_gmax),
        on_off(options.include_regional)
    ));
    out.push_str(&format!(
        "Types (all of): {}\n",
        list_or(&options.type_filter, "any")
    ));
    out.push_str(&format!(
        "Generations: {}\n",
        list_or(&options.gen_filter, "all")
    ));
    out.push_str(&format!(
        "Legends (any of): {}\n",
        list_or(&options.legend_cats, "no restriction")
    ));
    out.push_str(&format!("Attacker: {}\n", options.attacker));
    if options.has_stat_thresholds() {
        out.push_str(&format!(
            "Stats ({}): {}; BST {}\n",
            options.stat_mode,
            stats,
            options
                .bst
                .map_or_else(|| "none".to_string(), |bst| bst.to_string())
        ));
    } else {
        out.push_str("Stats: no thresholds\n");
    }
    out.push_str(&format!(
        "Random typing: {}, ability: {}, buffs: {}\n",
        on_off(options.random_typing),
        options.ability_mode,
        on_off(options.include_buff)
    ));
    out.push_str(&format!(
        "Fusion: {}, mystery: {}, shiny odds: {}",
        on_off(options.fusion),
        on_off(options.mystery),
        options.shiny_odds
    ));
    out
}

/// One roster card. Hidden mystery cards show only their key.
pub fn display_result(index: usize, result: &Generated) -> String {
    if !result.revealed {
        return format!(" {}. ??? (hidden, reveal key {})", index + 1, result.key);
    }

    let species = &result.species;
    let mut title = species.name.clone();
    if result.is_fusion {
        title.push_str(" (Fusion)");
    } else {
        title = format!("#{} {}", species.num, title);
    }
    if result.is_shiny {
        title.push_str(" ✨");
    }

    let mut out = format!(" {}. {} [{}]", index + 1, title, result.shown_types().join(" / "));
    if result.display_types.is_some() {
        out.push_str(&format!(" (really {})", species.types.join(" / ")));
    }
    if let Some(ability) = &result.ability {
        out.push_str(&format!("\n    Ability: {}", ability));
    }
    if let Some(buff) = &result.buff {
        out.push_str(&format!("\n    Buff: {}", buff));
    }
    if let Some(sprite) = result_sprite_candidates(result).first() {
        out.push_str(&format!("\n    Sprite: {}", sprite));
    }
    out
}

pub fn display_results(state: &AppState) -> String {
    match &state.results {
        None => "Nothing generated yet.".to_string(),
        Some(results) if results.is_empty() => {
            "No Pokémon match these options. Loosen the filters and try again.".to_string()
        }
        Some(results) => {
            let mut out = String::from("--- Your Pokémon ---\n");
            let cards: Vec<String> = results
                .iter()
                .enumerate()
                .map(|(i, r)| display_result(i, r))
                .collect();
            out.push_str(&cards.join("\n"));
            out
        }
    }
}

pub fn display_species(species: &Species) -> String {
    let mut out = format!(
        "--- #{} {} ---\nTypes: {}\n",
        species.num,
        species.name,
        species.types.join(" / ")
    );
    if let Some(stats) = &species.base_stats {
        out.push_str(&format!(
            "Base stats: HP {} / Atk {} / Def {} / SpA {} / SpD {} / Spe {} (BST {})\n",
            stats.hp,
            stats.attack,
            stats.defense,
            stats.sp_attack,
            stats.sp_defense,
            stats.speed,
            stats.total()
        ));
    }
    out.push_str(&format!(
        "Abilities: {}\n",
        list_or(species.abilities(), "none")
    ));
    if !species.tags().is_empty() {
        out.push_str(&format!("Tags: {}\n", species.tags().join(", ")));
    }
    out.push_str(&format!(
        "Sprite: {}",
        species_sprite_candidates(species, false)
            .first()
            .map_or("none", String::as_str)
    ));
    out
}

/// Handles the "lookup" command against the loaded dex.
pub fn handle_lookup_command(query: &str, state: &AppState) -> String {
    if query.trim().is_empty() {
        return "What Pokémon do you want to look up? (e.g., 'Pikachu')".to_string();
    }
    let Some(dex) = &state.dex else {
        return display_dex_status(state);
    };
    match dex.find(query) {
        Some(species) => display_species(species),
        None => format!("The Pokémon '{}' was not found.", query.trim()),
    }
}

/// Every sprite URL for a species, in fallback order.
pub fn handle_sprites_command(query: &str, shiny: bool, state: &AppState) -> String {
    let Some(dex) = &state.dex else {
        return display_dex_status(state);
    };
    match dex.find(query) {
        Some(species) => {
            let mut out = format!("--- Sprites for {} ---\n", species.name);
            out.push_str(&species_sprite_candidates(species, shiny).join("\n"));
            out
        }
        None => format!("The Pokémon '{}' was not found.", query.trim()),
    }
}

pub fn display_presets() -> String {
    let mut out = String::from("Available presets:\n");
    for name in preset_names() {
        out.push_str(&format!("  - {}\n", name));
    }
    out
}

fn parse_flag(value: Option<&str>) -> Result<bool, String> {
    match value.map(str::to_lowercase).as_deref() {
        None | Some("on") | Some("true") | Some("yes") => Ok(true),
        Some("off") | Some("false") | Some("no") => Ok(false),
        Some(other) => Err(format!("Expected 'on' or 'off', got '{}'.", other)),
    }
}

fn parse_number(value: Option<&str>, what: &str) -> Result<i64, String> {
    let value = value.ok_or_else(|| format!("Missing value for {}.", what))?;
    value
        .parse::<i64>()
        .map_err(|_| format!("'{}' is not a number for {}.", value, what))
}

fn parse_enum<T: std::str::FromStr>(value: Option<&str>, what: &str) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("Missing value for {}.", what))?;
    value
        .parse::<T>()
        .map_err(|_| format!("Unknown {} '{}'.", what, value))
}

/// Parses an option command into a reducer action.
///
/// Accepted forms (case-insensitive):
/// - `count <n>`
/// - `mega|gmax|regional|typing|buff|fusion|mystery [on|off]`
/// - `type <name>` / `types all|none`
/// - `gen <n>` / `gens all|none`
/// - `legend <category>` / `legends all|none`
/// - `attacker any|physical|special`, `mode min|max`
/// - `stat <hp|atk|def|spa|spd|spe> <value|off>`, `bst <value|off>`
/// - `ability off|species|random`, `shiny 4096|2048|512|128`
/// - `preset <name>`, `reset`
pub fn parse_option_command(command: &str, state: &AppState) -> Result<Action, String> {
    let parts: Vec<&str> = command.split_whitespace().collect();
    let Some((head, args)) = parts.split_first() else {
        return Err("Empty command. Try 'count 3' or 'type fire'.".to_string());
    };
    let arg = args.first().copied();
    let keyword = head.to_lowercase();

    let toggle = match keyword.as_str() {
        "mega" => Some(Toggle::Mega),
        "gmax" => Some(Toggle::Gmax),
        "regional" => Some(Toggle::Regional),
        "typing" => Some(Toggle::RandomTyping),
        "buff" | "buffs" => Some(Toggle::Buff),
        "fusion" => Some(Toggle::Fusion),
        "mystery" => Some(Toggle::Mystery),
        _ => None,
    };
    if let Some(toggle) = toggle {
        return Ok(Action::SetToggle(toggle, parse_flag(arg)?));
    }

    let action = match keyword.as_str() {
        "count" => Action::SetCount(parse_number(arg, "count")?),
        "type" => {
            let name = args.join(" ");
            if name.is_empty() {
                return Err("Which type? (e.g., 'type fire')".to_string());
            }
            Action::ToggleType(canonical_type(&name, state))
        }
        "types" => match arg.map(str::to_lowercase).as_deref() {
            Some("none") | Some("clear") => Action::SetTypes(Vec::new()),
            Some("all") => Action::SetTypes(
                state
                    .dex
                    .as_ref()
                    .map(|dex| dex.types.clone())
                    .unwrap_or_default(),
            ),
            _ => return Err("Use 'types all' or 'types none'.".to_string()),
        },
        "gen" => {
            let gen = parse_number(arg, "generation")?;
            let gen = u8::try_from(gen)
                .ok()
                .filter(|g| (1..=schema::MAX_GENERATION).contains(g))
                .ok_or_else(|| format!("Generation must be 1-{}.", schema::MAX_GENERATION))?;
            Action::ToggleGeneration(gen)
        }
        "gens" => match arg.map(str::to_lowercase).as_deref() {
            Some("none") | Some("clear") => Action::SetGenerations(Vec::new()),
            Some("all") => Action::SetGenerations((1..=schema::MAX_GENERATION).collect()),
            _ => return Err("Use 'gens all' or 'gens none'.".to_string()),
        },
        "legend" => Action::ToggleLegend(parse_enum::<LegendCategory>(arg, "legend category")?),
        "legends" => match arg.map(str::to_lowercase).as_deref() {
            Some("none") | Some("clear") => Action::SetLegends(Vec::new()),
            Some("all") => Action::SetLegends(LegendCategory::all()),
            _ => return Err("Use 'legends all' or 'legends none'.".to_string()),
        },
        "attacker" => Action::SetAttacker(parse_enum::<AttackerPref>(arg, "attacker")?),
        "mode" => Action::SetStatMode(parse_enum::<StatMode>(arg, "stat mode")?),
        "stat" => {
            let stat = arg
                .and_then(StatKey::parse)
                .ok_or_else(|| "Which stat? (hp, atk, def, spa, spd, spe)".to_string())?;
            let value = args.get(1).copied();
            let value = match value.map(str::to_lowercase).as_deref() {
                Some("off") | Some("none") => None,
                _ => Some(parse_number(value, stat.label())?),
            };
            Action::SetStatFilter { stat, value }
        }
        "bst" => match arg.map(str::to_lowercase).as_deref() {
            Some("off") | Some("none") => Action::SetBst(None),
            _ => Action::SetBst(Some(parse_number(arg, "BST")?)),
        },
        "ability" => Action::SetAbilityMode(parse_enum::<AbilityMode>(arg, "ability mode")?),
        "shiny" => {
            let odds = parse_number(arg, "shiny odds")?;
            let odds = u32::try_from(odds)
                .ok()
                .and_then(|odds| ShinyOdds::try_from(odds).ok())
                .ok_or_else(|| "Shiny odds must be 4096, 2048, 512 or 128.".to_string())?;
            Action::SetShinyOdds(odds)
        }
        "preset" => {
            let name = arg.ok_or_else(|| display_presets())?;
            Action::SetOptions(get_preset(name).map_err(|e| e.to_string())?)
        }
        "reset" => Action::Reset,
        other => return Err(format!("Unknown option '{}'.", other)),
    };
    Ok(action)
}

/// Matches a type name against the dex's spelling when possible.
fn canonical_type(name: &str, state: &AppState) -> String {
    state
        .dex
        .as_ref()
        .and_then(|dex| {
            dex.types
                .iter()
                .find(|t| t.eq_ignore_ascii_case(name))
                .cloned()
        })
        .unwrap_or_else(|| name.to_string())
}

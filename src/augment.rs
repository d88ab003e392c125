//! Cosmetic extras attached to each drawn species: shiny roll, display
//! typing, ability, buff, fusion and mystery gating. None of it touches the
//! species themselves; everything lives on the [`Generated`] wrapper.

use crate::rng::RandomSource;
use crate::select::pick_n;
use schema::{
    has_type, merge_unique, AbilityMode, Options, Species, FUSION_FALLBACK_TYPE, FUSION_ID,
};
use serde::{Deserialize, Serialize};

/// Percentage of each parent name kept by [`mash_name`].
const FUSION_NAME_PERCENT: usize = 55;
const FUSION_NAME_MIN_LETTERS: usize = 2;

/// One entry of a generated roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generated {
    pub key: String,
    pub species: Species,
    pub is_shiny: bool,
    /// Shown instead of the species' own types when set.
    pub display_types: Option<Vec<String>>,
    pub ability: Option<String>,
    pub buff: Option<String>,
    pub is_fusion: bool,
    pub revealed: bool,
}

impl Generated {
    /// Types to show: the random-typing override if any, else the species' own.
    pub fn shown_types(&self) -> &[String] {
        self.display_types.as_deref().unwrap_or(&self.species.types)
    }
}

/// Dex-wide data the augmenter draws from.
#[derive(Debug, Clone, Copy)]
pub struct AugmentContext<'a> {
    /// Every type in the dex.
    pub all_types: &'a [String],
    /// Every ability in the dex except "No Ability".
    pub ability_pool: &'a [String],
    pub buffs: &'a [&'a str],
}

fn new_key(rng: &mut impl RandomSource) -> String {
    format!("{:016x}", rng.next_nonce())
}

fn roll_buff(options: &Options, ctx: &AugmentContext<'_>, rng: &mut impl RandomSource) -> Option<String> {
    if !options.include_buff {
        return None;
    }
    rng.choose(ctx.buffs, "buff").map(|buff| buff.to_string())
}

/// A single display type that the species does not already have.
fn roll_display_type(
    species: &Species,
    ctx: &AugmentContext<'_>,
    rng: &mut impl RandomSource,
) -> Option<Vec<String>> {
    let candidates: Vec<&String> = ctx
        .all_types
        .iter()
        .filter(|t| !has_type(&species.types, t))
        .collect();
    rng.choose(&candidates, "random typing")
        .map(|t| vec![(*t).clone()])
}

fn roll_ability(
    species: &Species,
    mode: AbilityMode,
    ctx: &AugmentContext<'_>,
    rng: &mut impl RandomSource,
) -> Option<String> {
    match mode {
        AbilityMode::Off => None,
        AbilityMode::Species => rng.choose(species.abilities(), "species ability").cloned(),
        AbilityMode::Random => rng.choose(ctx.ability_pool, "random ability").cloned(),
    }
}

/// Wraps each drawn species in a [`Generated`] with its cosmetic rolls, then
/// appends a fusion when requested and at least two species were drawn.
pub fn augment(
    picked: Vec<Species>,
    options: &Options,
    ctx: &AugmentContext<'_>,
    rng: &mut impl RandomSource,
) -> Vec<Generated> {
    let revealed = !options.mystery;

    let mut results: Vec<Generated> = picked
        .into_iter()
        .map(|species| {
            let key = new_key(rng);
            let is_shiny = rng.one_in(options.shiny_odds.denominator(), "shiny");
            let display_types = if options.random_typing && !species.is_fusion() {
                roll_display_type(&species, ctx, rng)
            } else {
                None
            };
            let ability = roll_ability(&species, options.ability_mode, ctx, rng);
            let buff = roll_buff(options, ctx, rng);

            Generated {
                key,
                species,
                is_shiny,
                display_types,
                ability,
                buff,
                is_fusion: false,
                revealed,
            }
        })
        .collect();

    if options.fusion && results.len() >= 2 {
        let fusion = fuse(&results, options, ctx, rng);
        results.push(fusion);
    }

    results
}

/// Builds the synthetic fusion of two random members of the batch.
pub fn fuse(
    batch: &[Generated],
    options: &Options,
    ctx: &AugmentContext<'_>,
    rng: &mut impl RandomSource,
) -> Generated {
    let mons: Vec<&Species> = batch.iter().map(|r| &r.species).collect();

    let a_index = rng.pick_index(mons.len(), "fusion parent A");
    let others: Vec<&Species> = mons
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != a_index)
        .map(|(_, m)| *m)
        .collect();
    let a = mons[a_index];
    let b = others[rng.pick_index(others.len(), "fusion parent B")];

    let mut type_pool = Vec::new();
    for mon in &mons {
        merge_unique(&mut type_pool, &mon.types);
    }
    let mut types = pick_n(&type_pool, type_pool.len().min(2), rng);
    if types.is_empty() {
        types.push(FUSION_FALLBACK_TYPE.to_string());
    }

    let abilities = if options.ability_mode == AbilityMode::Off {
        None
    } else {
        let mut union = Vec::new();
        for mon in &mons {
            merge_unique(&mut union, mon.abilities());
        }
        Some(union)
    };

    let species = Species {
        id: FUSION_ID.to_string(),
        sprite_id: FUSION_ID.to_string(),
        base_sprite_id: FUSION_ID.to_string(),
        num: 0,
        name: mash_name(&a.name, &b.name),
        types,
        base_stats: None,
        abilities,
        tags: Some(vec!["Fusion".to_string()]),
    };

    let ability = rng.choose(species.abilities(), "fusion ability").cloned();
    let buff = roll_buff(options, ctx, rng);

    Generated {
        key: new_key(rng),
        species,
        is_shiny: false,
        display_types: None,
        ability,
        buff,
        is_fusion: true,
        revealed: !options.mystery,
    }
}

/// Blends two names: the leading 55% of `a`'s letters (rounded down) and the
/// trailing 55% of `b`'s letters (rounded up), each at least two letters and
/// at most the whole name. Falls back to `"a-b"` when either name has no
/// letters.
///
/// `mash_name("Bulbasaur", "Charmander") == "Bulbmander"`
pub fn mash_name(a: &str, b: &str) -> String {
    let letters = |s: &str| -> Vec<char> { s.chars().filter(char::is_ascii_alphabetic).collect() };
    let a_letters = letters(a);
    let b_letters = letters(b);
    if a_letters.is_empty() || b_letters.is_empty() {
        return format!("{}-{}", a, b);
    }

    let keep = |letters: usize, len: usize| letters.max(FUSION_NAME_MIN_LETTERS).min(len);
    let head = keep(a_letters.len() * FUSION_NAME_PERCENT / 100, a_letters.len());
    let tail = keep(
        (b_letters.len() * FUSION_NAME_PERCENT).div_ceil(100),
        b_letters.len(),
    );

    a_letters[..head]
        .iter()
        .chain(&b_letters[b_letters.len() - tail..])
        .collect()
}

//! Predicates over normalized species. Each one is independent and an unset
//! constraint passes everything; [`matches`] is their conjunction.
//!
//! The form and legend checks are plain substring tests on dex ids and tags,
//! so "meganium" counts as a mega id.

use schema::{has_type, AttackerPref, LegendCategory, Options, Species, StatKey, StatMode};
use std::collections::BTreeMap;
use std::collections::BTreeSet;

const REGIONAL_MARKERS: [&str; 4] = ["alola", "galar", "hisui", "paldea"];

/// Generation a national dex number was introduced in.
pub fn generation_of(num: i32) -> u8 {
    match num {
        i32::MIN..=151 => 1,
        152..=251 => 2,
        252..=386 => 3,
        387..=493 => 4,
        494..=649 => 5,
        650..=721 => 6,
        722..=809 => 7,
        810..=905 => 8,
        _ => 9,
    }
}

pub fn is_mega_id(id: &str) -> bool {
    id.contains("mega")
}

pub fn is_gmax_id(id: &str) -> bool {
    id.contains("gmax") || id.contains("gigantamax")
}

pub fn is_regional_id(id: &str) -> bool {
    REGIONAL_MARKERS.iter().any(|marker| id.contains(marker))
}

/// Drops the form categories the user switched off.
pub fn form_allowed(species: &Species, options: &Options) -> bool {
    if is_gmax_id(&species.id) && !options.include_gmax {
        return false;
    }
    if is_mega_id(&species.id) && !options.include_mega {
        return false;
    }
    if is_regional_id(&species.id) && !options.include_regional {
        return false;
    }
    true
}

/// Every required type must be present (AND).
pub fn types_match(species: &Species, required: &[String]) -> bool {
    required.iter().all(|wanted| has_type(&species.types, wanted))
}

pub fn gen_allowed(species: &Species, allowed: &[u8]) -> bool {
    allowed.is_empty() || allowed.contains(&generation_of(species.num))
}

fn any_tag(tags: &[String], pred: impl Fn(&str) -> bool) -> bool {
    tags.iter().any(|t| pred(t.as_str()))
}

/// Legend categories read from the species' tags.
pub fn legend_categories(species: &Species) -> BTreeSet<LegendCategory> {
    let tags: Vec<String> = species.tags().iter().map(|t| t.to_lowercase()).collect();

    let mut out = BTreeSet::new();
    if any_tag(&tags, |t| t.contains("mythical")) {
        out.insert(LegendCategory::Mythical);
    }
    if any_tag(&tags, |t| t.contains("sub-legendary") || t.contains("sublegendary")) {
        out.insert(LegendCategory::Sublegendary);
    }
    if any_tag(&tags, |t| {
        t.contains("legendary") || (t.contains("legend") && !t.contains("sub"))
    }) {
        out.insert(LegendCategory::Legendary);
    }
    if any_tag(&tags, |t| t.contains("paradox")) {
        out.insert(LegendCategory::Paradox);
    }

    // The Tapus are sometimes untagged.
    if out.is_empty() && species.name.to_lowercase().contains("tapu ") {
        out.insert(LegendCategory::Sublegendary);
    }

    out
}

/// Any selected category matches (OR). No selection passes everyone,
/// non-legends included.
pub fn legend_match(species: &Species, selected: &[LegendCategory]) -> bool {
    if selected.is_empty() {
        return true;
    }
    let cats = legend_categories(species);
    selected.iter().any(|cat| cats.contains(cat))
}

/// Species without stats are never excluded. Ties count as physical.
pub fn attacker_matches(species: &Species, pref: AttackerPref) -> bool {
    let Some(stats) = &species.base_stats else {
        return true;
    };
    match pref {
        AttackerPref::Any => true,
        AttackerPref::Physical => stats.attack >= stats.sp_attack,
        AttackerPref::Special => stats.sp_attack > stats.attack,
    }
}

/// Per-stat and BST thresholds, all applied with the same mode.
/// Species without stats are never excluded.
pub fn stats_match(
    species: &Species,
    mode: StatMode,
    limits: &BTreeMap<StatKey, u8>,
    bst_limit: Option<u16>,
) -> bool {
    let Some(stats) = &species.base_stats else {
        return true;
    };
    let within = |value: u16, limit: u16| match mode {
        StatMode::Min => value >= limit,
        StatMode::Max => value <= limit,
    };

    let per_stat_ok = limits
        .iter()
        .all(|(key, limit)| within(u16::from(stats.get(*key)), u16::from(*limit)));

    per_stat_ok && bst_limit.map_or(true, |limit| within(stats.total(), limit))
}

/// Conjunction of every predicate the options configure.
pub fn matches(species: &Species, options: &Options) -> bool {
    form_allowed(species, options)
        && types_match(species, &options.type_filter)
        && gen_allowed(species, &options.gen_filter)
        && legend_match(species, &options.legend_cats)
        && attacker_matches(species, options.attacker)
        && stats_match(species, options.stat_mode, &options.stat_filters, options.bst)
}

/// The part of the pool a generation call may draw from.
pub fn filter_pool<'a>(pool: &'a [Species], options: &Options) -> Vec<&'a Species> {
    pool.iter()
        .filter(|species| !species.is_fusion() && species.num > 0)
        .filter(|species| matches(species, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::SpeciesBuilder;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1)]
    #[case(151, 1)]
    #[case(152, 2)]
    #[case(251, 2)]
    #[case(386, 3)]
    #[case(387, 4)]
    #[case(493, 4)]
    #[case(649, 5)]
    #[case(650, 6)]
    #[case(721, 6)]
    #[case(809, 7)]
    #[case(810, 8)]
    #[case(905, 8)]
    #[case(906, 9)]
    #[case(1025, 9)]
    fn generation_breakpoints(#[case] num: i32, #[case] gen: u8) {
        assert_eq!(generation_of(num), gen);
    }

    #[rstest]
    #[case("charizardmegax", true, false, false)]
    #[case("meganium", true, false, false)]
    #[case("charizardgmax", false, true, false)]
    #[case("vulpixalola", false, false, true)]
    #[case("typhlosionhisui", false, false, true)]
    #[case("taurospaldeacombat", false, false, true)]
    #[case("pikachu", false, false, false)]
    fn form_markers(
        #[case] id: &str,
        #[case] mega: bool,
        #[case] gmax: bool,
        #[case] regional: bool,
    ) {
        assert_eq!(is_mega_id(id), mega);
        assert_eq!(is_gmax_id(id), gmax);
        assert_eq!(is_regional_id(id), regional);
    }

    #[test]
    fn form_toggles_drop_switched_off_categories() {
        let gmax = SpeciesBuilder::new("charizardgmax", 6).build();
        let mega = SpeciesBuilder::new("charizardmegax", 6).build();
        let alola = SpeciesBuilder::new("vulpixalola", 37).build();

        let defaults = Options::default();
        assert!(!form_allowed(&gmax, &defaults));
        assert!(form_allowed(&mega, &defaults));
        assert!(form_allowed(&alola, &defaults));

        let strict = Options {
            include_mega: false,
            include_regional: false,
            ..Options::default()
        };
        assert!(!form_allowed(&mega, &strict));
        assert!(!form_allowed(&alola, &strict));
    }

    #[test]
    fn type_filter_requires_every_type_ignoring_case() {
        let charizard = SpeciesBuilder::new("charizard", 6)
            .with_types(&["Fire", "Flying"])
            .build();

        assert!(types_match(&charizard, &[]));
        assert!(types_match(&charizard, &["fire".to_string()]));
        assert!(types_match(
            &charizard,
            &["FLYING".to_string(), "Fire".to_string()]
        ));
        assert!(!types_match(
            &charizard,
            &["Fire".to_string(), "Dragon".to_string()]
        ));
    }

    #[rstest]
    #[case(&["Mythical"], &[LegendCategory::Mythical])]
    #[case(&["Sub-Legendary"], &[LegendCategory::Sublegendary, LegendCategory::Legendary])]
    #[case(&["Restricted Legendary"], &[LegendCategory::Legendary])]
    #[case(&["Paradox"], &[LegendCategory::Paradox])]
    #[case(&["Legend"], &[LegendCategory::Legendary])]
    #[case(&[], &[])]
    fn legend_categories_from_tags(
        #[case] tags: &[&str],
        #[case] expected: &[LegendCategory],
    ) {
        let species = SpeciesBuilder::new("test", 1).with_tags(tags).build();
        let expected: BTreeSet<LegendCategory> = expected.iter().copied().collect();
        assert_eq!(legend_categories(&species), expected);
    }

    #[test]
    fn untagged_tapu_defaults_to_sublegendary() {
        let fini = SpeciesBuilder::new("tapufini", 788)
            .with_name("Tapu Fini")
            .build();
        assert_eq!(
            legend_categories(&fini),
            BTreeSet::from([LegendCategory::Sublegendary])
        );
    }

    #[test]
    fn legend_filter_is_an_or_over_the_selection() {
        let mew = SpeciesBuilder::new("mew", 151).with_tags(&["Mythical"]).build();
        let rattata = SpeciesBuilder::new("rattata", 19).build();

        assert!(legend_match(&rattata, &[]));
        assert!(legend_match(
            &mew,
            &[LegendCategory::Legendary, LegendCategory::Mythical]
        ));
        assert!(!legend_match(&rattata, &[LegendCategory::Legendary]));
    }

    #[test]
    fn legendary_selection_includes_sub_legendaries() {
        let fini = SpeciesBuilder::new("tapufini", 788)
            .with_tags(&["Sub-Legendary"])
            .build();
        let mewtwo = SpeciesBuilder::new("mewtwo", 150)
            .with_tags(&["Restricted Legendary"])
            .build();

        assert!(legend_match(&fini, &[LegendCategory::Legendary]));
        assert!(legend_match(&mewtwo, &[LegendCategory::Legendary]));
        assert!(legend_match(&fini, &[LegendCategory::Sublegendary]));
        assert!(!legend_match(&mewtwo, &[LegendCategory::Sublegendary]));
    }

    #[rstest]
    #[case(AttackerPref::Physical, 100, 100, true)]
    #[case(AttackerPref::Special, 100, 100, false)]
    #[case(AttackerPref::Special, 99, 100, true)]
    #[case(AttackerPref::Physical, 99, 100, false)]
    #[case(AttackerPref::Any, 10, 200, true)]
    fn attacker_profile(
        #[case] pref: AttackerPref,
        #[case] atk: u8,
        #[case] spa: u8,
        #[case] passes: bool,
    ) {
        let species = SpeciesBuilder::new("test", 1)
            .with_stats([80, atk, 80, spa, 80, 80])
            .build();
        assert_eq!(attacker_matches(&species, pref), passes);
    }

    #[test]
    fn missing_stats_never_exclude() {
        let statless = SpeciesBuilder::new("statless", 1).without_stats().build();
        let limits = BTreeMap::from([(StatKey::Speed, 200)]);

        assert!(attacker_matches(&statless, AttackerPref::Special));
        assert!(stats_match(&statless, StatMode::Min, &limits, Some(1000)));
    }

    #[test]
    fn stat_thresholds_respect_mode() {
        // BST 318
        let bulbasaur = SpeciesBuilder::new("bulbasaur", 1)
            .with_stats([45, 49, 49, 65, 65, 45])
            .build();
        let speed_45 = BTreeMap::from([(StatKey::Speed, 45)]);
        let speed_46 = BTreeMap::from([(StatKey::Speed, 46)]);

        assert!(stats_match(&bulbasaur, StatMode::Min, &speed_45, None));
        assert!(!stats_match(&bulbasaur, StatMode::Min, &speed_46, None));
        assert!(stats_match(&bulbasaur, StatMode::Max, &speed_45, None));

        let none = BTreeMap::new();
        assert!(stats_match(&bulbasaur, StatMode::Min, &none, Some(318)));
        assert!(!stats_match(&bulbasaur, StatMode::Min, &none, Some(319)));
        assert!(stats_match(&bulbasaur, StatMode::Max, &none, Some(318)));
        assert!(!stats_match(&bulbasaur, StatMode::Max, &none, Some(317)));
    }

    #[test]
    fn filter_pool_never_yields_the_fusion_placeholder() {
        let pool = vec![
            SpeciesBuilder::new("pikachu", 25).build(),
            SpeciesBuilder::fusion().build(),
        ];
        let picked = filter_pool(&pool, &Options::default());
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, "pikachu");
    }
}

#[cfg(test)]
mod tests {
    use crate::dex::Dex;
    use crate::errors::DexError;
    use crate::rng::{ScriptedRng, SeededRng};
    use crate::state::{Action, AppState, LoadState, Toggle};
    use crate::tests::common::sample_dex;
    use pretty_assertions::assert_eq;
    use schema::{LegendCategory, Options, StatKey, DEFAULT_COUNT, MAX_BST};
    use std::sync::Arc;

    fn ready_state() -> AppState {
        let mut rng = ScriptedRng::new(vec![]);
        let state = AppState::default().apply(Action::BeginLoad, &mut rng);
        let ticket = state.loading_ticket().unwrap();
        state.apply(
            Action::DexLoaded {
                ticket,
                result: Ok(Arc::new(sample_dex())),
            },
            &mut rng,
        )
    }

    #[test]
    fn failed_load_waits_for_an_explicit_reload() {
        let mut rng = ScriptedRng::new(vec![]);
        let state = AppState::default();
        assert!(state.needs_first_load());

        let state = state.apply(Action::BeginLoad, &mut rng);
        assert!(!state.needs_first_load());
        let ticket = state.loading_ticket().unwrap();
        let state = state.apply(
            Action::DexLoaded {
                ticket,
                result: Err(DexError::HttpStatus { status: 503 }),
            },
            &mut rng,
        );

        assert!(state.error().is_some());
        assert!(!state.needs_first_load());
        assert!(!state.can_generate());

        let state = state.apply(Action::Generate, &mut rng);
        assert_eq!(state.results, None);
        assert!(state.error().is_some());

        let state = state.apply(Action::BeginLoad, &mut rng);
        assert!(state.is_loading());
    }

    #[test]
    fn generate_is_disabled_until_the_dex_is_ready() {
        let mut rng = SeededRng::from_seed(1);
        let state = AppState::default();
        assert!(!state.can_generate());

        let state = state.apply(Action::Generate, &mut rng);
        assert_eq!(state.results, None);

        let state = state.apply(Action::BeginLoad, &mut rng);
        assert!(state.is_loading());
        assert!(!state.can_generate());

        let state = ready_state();
        assert!(state.can_generate());
        let state = state.apply(Action::Generate, &mut rng);
        assert_eq!(state.results.as_ref().map(Vec::len), Some(DEFAULT_COUNT as usize));
    }

    #[test]
    fn empty_dex_cannot_generate() {
        let mut rng = ScriptedRng::new(vec![]);
        let state = AppState::default().apply(Action::BeginLoad, &mut rng);
        let state = state.apply(
            Action::DexLoaded {
                ticket: 1,
                result: Ok(Arc::new(Dex::default())),
            },
            &mut rng,
        );
        assert_eq!(state.load, LoadState::Ready);
        assert!(!state.can_generate());
    }

    #[test]
    fn failed_load_surfaces_the_message() {
        let mut rng = ScriptedRng::new(vec![]);
        let state = AppState::default().apply(Action::BeginLoad, &mut rng);
        let state = state.apply(
            Action::DexLoaded {
                ticket: 1,
                result: Err(DexError::HttpStatus { status: 503 }),
            },
            &mut rng,
        );
        assert_eq!(state.error(), Some("Failed to fetch PS pokedex.json (503)"));
        assert!(!state.can_generate());
    }

    #[test]
    fn stale_load_results_are_discarded() {
        let mut rng = ScriptedRng::new(vec![]);
        let state = AppState::default().apply(Action::BeginLoad, &mut rng);
        let first = state.loading_ticket().unwrap();
        let state = state.apply(Action::BeginLoad, &mut rng);
        let second = state.loading_ticket().unwrap();
        assert_ne!(first, second);

        let state = state.apply(
            Action::DexLoaded {
                ticket: first,
                result: Ok(Arc::new(sample_dex())),
            },
            &mut rng,
        );
        assert!(state.is_loading());
        assert_eq!(state.dex, None);

        let state = state.apply(
            Action::DexLoaded {
                ticket: second,
                result: Err(DexError::Network("offline".to_string())),
            },
            &mut rng,
        );
        assert!(state.error().is_some());
    }

    #[test]
    fn completions_after_teardown_are_ignored() {
        let mut rng = ScriptedRng::new(vec![]);
        let state = AppState::default().apply(Action::BeginLoad, &mut rng);
        let ticket = state.loading_ticket().unwrap();
        let state = state.apply(Action::TearDown, &mut rng);
        let state = state.apply(
            Action::DexLoaded {
                ticket,
                result: Ok(Arc::new(sample_dex())),
            },
            &mut rng,
        );
        assert_eq!(state.dex, None);
        assert_eq!(state.load, LoadState::NotStarted);
    }

    #[test]
    fn option_edits_are_clamped() {
        let mut rng = ScriptedRng::new(vec![]);
        let state = AppState::default()
            .apply(Action::SetCount(99), &mut rng)
            .apply(
                Action::SetStatFilter {
                    stat: StatKey::Speed,
                    value: Some(400),
                },
                &mut rng,
            )
            .apply(
                Action::SetStatFilter {
                    stat: StatKey::Hp,
                    value: Some(-3),
                },
                &mut rng,
            )
            .apply(Action::SetBst(Some(5000)), &mut rng);

        assert_eq!(state.options.count, 12);
        assert_eq!(state.options.stat_filters.get(&StatKey::Speed), Some(&255));
        assert_eq!(state.options.stat_filters.get(&StatKey::Hp), Some(&0));
        assert_eq!(state.options.bst, Some(MAX_BST));

        let state = state
            .apply(Action::SetCount(0), &mut rng)
            .apply(
                Action::SetStatFilter {
                    stat: StatKey::Speed,
                    value: None,
                },
                &mut rng,
            )
            .apply(Action::SetBst(None), &mut rng);
        assert_eq!(state.options.count, DEFAULT_COUNT);
        assert!(!state.options.stat_filters.contains_key(&StatKey::Speed));
        assert_eq!(state.options.bst, None);
    }

    #[test]
    fn toggles_add_and_remove_selections() {
        let mut rng = ScriptedRng::new(vec![]);
        let state = AppState::default()
            .apply(Action::ToggleType("Fire".to_string()), &mut rng)
            .apply(Action::ToggleType("Water".to_string()), &mut rng)
            .apply(Action::ToggleType("fire".to_string()), &mut rng)
            .apply(Action::ToggleGeneration(3), &mut rng)
            .apply(Action::ToggleGeneration(5), &mut rng)
            .apply(Action::ToggleGeneration(3), &mut rng)
            .apply(Action::ToggleLegend(LegendCategory::Paradox), &mut rng)
            .apply(Action::SetToggle(Toggle::Gmax, true), &mut rng)
            .apply(Action::SetToggle(Toggle::Mega, false), &mut rng);

        assert_eq!(state.options.type_filter, vec!["Water".to_string()]);
        assert_eq!(state.options.gen_filter, vec![5]);
        assert_eq!(state.options.legend_cats, vec![LegendCategory::Paradox]);
        assert!(state.options.include_gmax);
        assert!(!state.options.include_mega);

        let state = state
            .apply(Action::SetLegends(LegendCategory::all()), &mut rng)
            .apply(Action::SetTypes(Vec::new()), &mut rng);
        assert_eq!(state.options.legend_cats.len(), 4);
        assert!(state.options.type_filter.is_empty());
    }

    #[test]
    fn reveal_flips_only_the_matching_card() {
        let mut rng = SeededRng::from_seed(17);
        let state = ready_state()
            .apply(Action::SetToggle(Toggle::Mystery, true), &mut rng)
            .apply(Action::Generate, &mut rng);

        let results = state.results.clone().unwrap();
        assert!(results.iter().all(|r| !r.revealed));
        let target = results[1].key.clone();

        let state = state
            .apply(Action::Reveal(target.clone()), &mut rng)
            .apply(Action::Reveal("no-such-key".to_string()), &mut rng);
        let results = state.results.unwrap();
        for result in &results {
            assert_eq!(result.revealed, result.key == target);
        }
    }

    #[test]
    fn reset_restores_defaults_and_clears_results() {
        let mut rng = SeededRng::from_seed(4);
        let defaults = Options {
            count: 3,
            ..Options::default()
        };
        let mut state = AppState::new(defaults.clone()).apply(Action::BeginLoad, &mut rng);
        state = state.apply(
            Action::DexLoaded {
                ticket: 1,
                result: Ok(Arc::new(sample_dex())),
            },
            &mut rng,
        );
        let state = state
            .apply(Action::SetCount(9), &mut rng)
            .apply(Action::SetToggle(Toggle::Fusion, true), &mut rng)
            .apply(Action::Generate, &mut rng);
        assert!(state.results.is_some());

        let state = state.apply(Action::Reset, &mut rng);
        assert_eq!(state.options, defaults);
        assert_eq!(state.results, None);
        assert!(state.can_generate());
    }

    #[test]
    fn regenerating_replaces_the_previous_roster() {
        let mut rng = SeededRng::from_seed(30);
        let state = ready_state().apply(Action::Generate, &mut rng);
        let first = state.results.clone().unwrap();
        let state = state.apply(Action::Generate, &mut rng);
        let second = state.results.unwrap();
        assert_eq!(second.len(), first.len());
        assert_ne!(
            first.iter().map(|r| &r.key).collect::<Vec<_>>(),
            second.iter().map(|r| &r.key).collect::<Vec<_>>()
        );
    }
}

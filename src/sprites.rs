//! Sprite URL candidates and the cursor a view walks them with.
//!
//! Showdown names sprite files inconsistently ("tapu-fini" vs "tapufini",
//! "necrozma-dusk-mane" vs "necrozma-duskmane"), so a species gets every
//! hyphen-removal variant of its own id followed by those of its base
//! species, each tried against four folders.

use crate::augment::Generated;
use schema::Species;
use std::collections::{HashSet, VecDeque};

pub const SPRITE_BASE_URL: &str = "https://play.pokemonshowdown.com/sprites";

/// Static image shown for fusions, which have no real sprite.
pub const FUSION_PLACEHOLDER: &str = "fusion.svg";

const SHINY_FOLDERS: [(&str, &str); 4] = [
    ("gen5ani-shiny", "gif"),
    ("ani-shiny", "gif"),
    ("gen5-shiny", "png"),
    ("dex-shiny", "png"),
];

const NORMAL_FOLDERS: [(&str, &str); 4] = [
    ("gen5ani", "gif"),
    ("ani", "gif"),
    ("gen5", "png"),
    ("dex", "png"),
];

/// Every id reachable by deleting hyphens from `id`, breadth-first, starting
/// with `id` itself.
///
/// - tapu-fini -> tapufini
/// - basculin-white-striped -> basculin-whitestriped, basculinwhite-striped,
///   basculinwhitestriped
pub fn sprite_id_variants(id: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([id.to_string()]);

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current.clone()) {
            continue;
        }
        for (i, _) in current.match_indices('-') {
            let next = format!("{}{}", &current[..i], &current[i + 1..]);
            if !seen.contains(&next) {
                queue.push_back(next);
            }
        }
        out.push(current);
    }

    out
}

/// Ordered candidate ids: the species' own variants, then its base species'
/// variants, without repeats.
pub fn candidate_ids(sprite_id: &str, base_sprite_id: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    sprite_id_variants(sprite_id)
        .into_iter()
        .chain(sprite_id_variants(base_sprite_id))
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Full sprite URLs in the order they should be tried.
pub fn sprite_candidates(sprite_id: &str, base_sprite_id: &str, shiny: bool) -> Vec<String> {
    let folders = if shiny { &SHINY_FOLDERS } else { &NORMAL_FOLDERS };
    candidate_ids(sprite_id, base_sprite_id)
        .iter()
        .flat_map(|id| {
            folders
                .iter()
                .map(move |(folder, ext)| format!("{}/{}/{}.{}", SPRITE_BASE_URL, folder, id, ext))
        })
        .collect()
}

pub fn species_sprite_candidates(species: &Species, shiny: bool) -> Vec<String> {
    sprite_candidates(&species.sprite_id, &species.base_sprite_id, shiny)
}

/// Candidates for a roster entry. Fusions only ever show the placeholder.
pub fn result_sprite_candidates(result: &Generated) -> Vec<String> {
    if result.is_fusion {
        vec![FUSION_PLACEHOLDER.to_string()]
    } else {
        species_sprite_candidates(&result.species, result.is_shiny)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteState {
    /// Waiting on the candidate at this index.
    Trying(usize),
    /// The candidate at this index displayed.
    Loaded(usize),
    /// Every candidate failed; the image stays broken.
    Exhausted,
}

/// Walks a candidate list strictly forward: a failed candidate is never tried
/// again and nothing is retried once all have failed.
#[derive(Debug, Clone)]
pub struct SpriteCursor {
    candidates: Vec<String>,
    state: SpriteState,
}

impl SpriteCursor {
    pub fn new(candidates: Vec<String>) -> Self {
        let state = if candidates.is_empty() {
            SpriteState::Exhausted
        } else {
            SpriteState::Trying(0)
        };
        Self { candidates, state }
    }

    pub fn for_result(result: &Generated) -> Self {
        Self::new(result_sprite_candidates(result))
    }

    pub fn state(&self) -> SpriteState {
        self.state
    }

    /// URL currently being tried or shown.
    pub fn current(&self) -> Option<&str> {
        match self.state {
            SpriteState::Trying(i) | SpriteState::Loaded(i) => Some(&self.candidates[i]),
            SpriteState::Exhausted => None,
        }
    }

    /// Records a load failure of the current candidate and moves to the next.
    pub fn mark_failed(&mut self) -> Option<&str> {
        if let SpriteState::Trying(i) = self.state {
            self.state = if i + 1 < self.candidates.len() {
                SpriteState::Trying(i + 1)
            } else {
                SpriteState::Exhausted
            };
        }
        self.current()
    }

    pub fn mark_loaded(&mut self) {
        if let SpriteState::Trying(i) = self.state {
            self.state = SpriteState::Loaded(i);
        }
    }
}

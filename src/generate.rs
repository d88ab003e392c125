use crate::augment::{augment, Generated};
use crate::dex::Dex;
use crate::filters::filter_pool;
use crate::presets::BUFFS;
use crate::rng::RandomSource;
use crate::select::pick_n;
use schema::{Options, Species};
use tracing::debug;

/// One generation call: filter the pool, draw up to `options.count` distinct
/// species, then roll cosmetics. An empty filtered pool yields no results.
pub fn generate(dex: &Dex, options: &Options, rng: &mut impl RandomSource) -> Vec<Generated> {
    let pool = filter_pool(&dex.species, options);
    debug!(pool = pool.len(), requested = options.count, "filtered pool");

    if pool.is_empty() {
        return Vec::new();
    }

    let picked: Vec<Species> = pick_n(&pool, usize::from(options.count), rng)
        .into_iter()
        .cloned()
        .collect();

    let results = augment(picked, options, &dex.augment_context(BUFFS), rng);
    debug!(
        results = results.len(),
        shiny = results.iter().filter(|r| r.is_shiny).count(),
        "generated roster"
    );
    results
}

use crate::rng::RandomSource;

/// Draws up to `count` distinct items uniformly without replacement by
/// repeatedly removing a random element from a working copy. A pool smaller
/// than `count` is returned whole, in draw order.
pub fn pick_n<T: Clone>(items: &[T], count: usize, rng: &mut impl RandomSource) -> Vec<T> {
    let mut remaining = items.to_vec();
    let mut out = Vec::with_capacity(count.min(remaining.len()));
    while !remaining.is_empty() && out.len() < count {
        let index = rng.pick_index(remaining.len(), "selection");
        out.push(remaining.remove(index));
    }
    out
}

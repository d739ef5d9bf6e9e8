//! Shuffling helpers that keep a foreign index pointing at the same element.

use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffle `items` uniformly and report where the element at `index` ended up.
///
/// Returns `None` for the tracked position when `index` is out of range.
pub fn permute_with_index_tracking<T, R>(
    items: Vec<T>,
    index: usize,
    rng: &mut R,
) -> (Vec<T>, Option<usize>)
where
    R: Rng + ?Sized,
{
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.shuffle(rng);

    let tracked = order.iter().position(|&original| original == index);

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let permuted = order
        .iter()
        .filter_map(|&original| slots[original].take())
        .collect();

    (permuted, tracked)
}

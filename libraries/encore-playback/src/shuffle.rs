//! Randomisation helpers for the shuffled playlist order

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

/// Uniform in-place shuffle (Fisher-Yates)
pub fn shuffle_in_place<T>(items: &mut [T]) {
    let mut rng = thread_rng();
    items.shuffle(&mut rng);
}

/// Pick an insertion slot strictly after `current` in a list of `len` entries
///
/// The returned position lies in `current + 1..=len`, so a track inserted
/// there never lands on or before the entry that is currently selected.
pub fn slot_after(current: usize, len: usize) -> usize {
    let lower = current.saturating_add(1).min(len);
    thread_rng().gen_range(lower..=len)
}

//! Random permutations without fixed points.
//!
//! Sampling is by rejection: shuffle, and retry until no position maps to
//! itself. About 37% of uniform permutations qualify for any size, and half
//! of them for two elements, so the expected number of attempts stays below
//! three.

use rand::Rng;
use rand::seq::SliceRandom;

/// A derangement of `0..len`: position `i` maps to `targets[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derangement {
    pub targets: Vec<usize>,
    /// Shuffles it took, including the accepted one.
    pub attempts: u32,
}

/// Sample a uniformly random derangement of `len` elements.
///
/// Returns `None` when `len < 2`; no derangement of fewer than two elements
/// exists.
pub fn sample<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<Derangement> {
    if len < 2 {
        return None;
    }

    let mut targets: Vec<usize> = (0..len).collect();
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        targets.shuffle(rng);
        if targets.iter().enumerate().all(|(i, &target)| i != target) {
            return Some(Derangement { targets, attempts });
        }
    }
}

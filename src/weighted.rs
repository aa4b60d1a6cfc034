//! Weighted random selection.
//!
//! `weighted_choice` is a single categorical draw; `sample_without_replacement`
//! draws several distinct items by repeated draws with removal. Both walk the
//! pool in order, so a given RNG state always yields the same picks.

use rand::Rng;

use crate::error::{ForgeError, Result};

/// Pick one item with probability proportional to its weight.
///
/// Fails with `InvalidInput` when the pool is empty, a weight is NaN,
/// infinite or negative, or the weights sum to zero.
pub fn weighted_choice<T, I>(choices: I, rng: &mut impl Rng) -> Result<T>
where
    I: IntoIterator<Item = (T, f64)>,
{
    let mut pool: Vec<(T, f64)> = choices.into_iter().collect();
    if pool.is_empty() {
        return Err(ForgeError::InvalidInput("weighted choice over an empty pool".into()));
    }
    for (i, (_, w)) in pool.iter().enumerate() {
        if !w.is_finite() {
            return Err(ForgeError::InvalidInput(format!("weight #{i} is not a finite number")));
        }
        if *w < 0.0 {
            return Err(ForgeError::InvalidInput(format!("weight #{i} is negative ({w})")));
        }
    }

    let total: f64 = pool.iter().map(|(_, w)| *w).sum();
    if !(total > 0.0) || !total.is_finite() {
        return Err(ForgeError::InvalidInput(format!("total weight must be positive, got {total}")));
    }

    let target = rng.gen_range(0.0..total);
    let idx = slice_index(&pool, target);
    Ok(pool.swap_remove(idx).0)
}

/// Draw up to `count` distinct items, weighted, without replacement.
///
/// Non-positive and non-finite weights are dropped first. When `count`
/// covers the whole pool the draw is skipped and every candidate comes back
/// ordered by descending weight (ties keep pool order). A pool smaller than
/// `count` yields fewer items; that is not an error.
pub fn sample_without_replacement<T>(
    candidates: Vec<(T, f64)>,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<T> {
    let mut pool: Vec<(T, f64)> = candidates
        .into_iter()
        .filter(|(_, w)| w.is_finite() && *w > 0.0)
        .collect();

    if count >= pool.len() {
        pool.sort_by(|a, b| b.1.total_cmp(&a.1));
        return pool.into_iter().map(|(item, _)| item).collect();
    }

    let mut picked = Vec::with_capacity(count);
    while picked.len() < count && !pool.is_empty() {
        let total: f64 = pool.iter().map(|(_, w)| *w).sum();
        let target = rng.gen_range(0.0..total);
        let idx = slice_index(&pool, target);
        picked.push(pool.remove(idx).0);
    }
    picked
}

/// Index of the candidate whose cumulative slice contains `target`.
fn slice_index<T>(pool: &[(T, f64)], target: f64) -> usize {
    let mut upto = 0.0;
    let mut last_positive = 0;
    for (i, (_, w)) in pool.iter().enumerate() {
        if *w <= 0.0 {
            continue;
        }
        upto += w;
        last_positive = i;
        if target < upto {
            return i;
        }
    }
    // float accumulation can leave the target a hair past the final slice
    last_positive
}

/// Bernoulli trial that tolerates any `p`: <= 0 never fires, >= 1 always does.
pub fn chance(rng: &mut impl Rng, p: f64) -> bool {
    rng.gen::<f64>() < p
}

//! Mutagen selection and application.
//!
//! Each bucket is sampled independently. A mutagen whose incompatible-types
//! list touches any of the monster's types never enters the pool; the rest
//! are weighted by inverse rarity times a capped synergy product and drawn
//! without replacement.

use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, warn};

use super::seed::MonsterSeed;
use super::stats::{StatEffect, Strength};
use crate::config::ForgeConfig;
use crate::data::{Bucket, Catalog, MutagenTemplate};
use crate::weighted::sample_without_replacement;

/// What one `apply_mutagens` call actually drew.
///
/// Shorter lists than requested mean the eligible pool ran dry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutagenDraw {
    pub major: Vec<String>,
    pub utility: Vec<String>,
    pub requested_major: usize,
    pub requested_utility: usize,
}

impl MutagenDraw {
    pub fn is_partial(&self) -> bool {
        self.major.len() < self.requested_major || self.utility.len() < self.requested_utility
    }
}

/// Weighs, draws and applies mutagens against a catalog.
pub struct MutagenSelector<'a> {
    catalog: &'a Catalog,
    config: &'a ForgeConfig,
}

impl<'a> MutagenSelector<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a ForgeConfig) -> Self {
        Self { catalog, config }
    }

    /// Product of the mutagen's bonuses for each present type, capped.
    pub fn synergy_multiplier(&self, mutagen: &MutagenTemplate, types: &[&str]) -> f64 {
        let product: f64 = types
            .iter()
            .filter_map(|t| mutagen.synergy_bonus.get(*t))
            .product();
        product.min(self.config.synergy_cap)
    }

    /// Sampling weight: `1 / max(rarity, eps)^alpha * synergy`.
    pub fn selection_weight(&self, mutagen: &MutagenTemplate, types: &[&str]) -> f64 {
        let rarity = mutagen.rarity.max(self.config.rarity_epsilon);
        let base = 1.0 / rarity.powf(self.config.rarity_alpha);
        base * self.synergy_multiplier(mutagen, types)
    }

    /// Eligible mutagens of a bucket with their weights, in catalog order.
    pub fn candidates(
        &self,
        bucket: Bucket,
        types: &[&str],
        exclude: &HashSet<&str>,
    ) -> Vec<(&'a MutagenTemplate, f64)> {
        self.catalog
            .mutagens(bucket)
            .iter()
            .filter(|m| !exclude.contains(m.name.as_str()) && !m.is_gated_for(types))
            .map(|m| (m, self.selection_weight(m, types)))
            .filter(|(_, w)| *w > 0.0)
            .collect()
    }

    /// Draw up to `count` distinct mutagens from a bucket.
    pub fn draw(
        &self,
        bucket: Bucket,
        types: &[&str],
        exclude: &HashSet<&str>,
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<&'a MutagenTemplate> {
        let pool = self.candidates(bucket, types, exclude);
        let available = pool.len();
        let picked = sample_without_replacement(pool, count, rng);
        if picked.len() < count {
            debug!(%bucket, requested = count, available, "mutagen pool exhausted, partial fill");
        }
        picked
    }

    /// Draw and apply new mutagens onto a seed.
    ///
    /// Mutagens already on the seed are skipped. Drawn identifiers are
    /// appended to their bucket, then each one's stat effects and tags are
    /// folded in, majors first.
    pub fn apply_mutagens(
        &self,
        seed: &mut MonsterSeed,
        major_count: usize,
        utility_count: usize,
        rng: &mut impl Rng,
    ) -> MutagenDraw {
        let types = seed.types();
        let already: HashSet<&str> = seed.mutagens.iter().collect();

        let majors = self.draw(Bucket::Major, &types, &already, major_count, rng);
        let utilities = self.draw(Bucket::Utility, &types, &already, utility_count, rng);

        let draw = MutagenDraw {
            major: majors.iter().map(|m| m.name.clone()).collect(),
            utility: utilities.iter().map(|m| m.name.clone()).collect(),
            requested_major: major_count,
            requested_utility: utility_count,
        };

        seed.mutagens.major.extend(draw.major.iter().cloned());
        seed.mutagens.utility.extend(draw.utility.iter().cloned());
        for mutagen in majors.into_iter().chain(utilities) {
            apply_effect(seed, mutagen);
        }
        draw
    }

    /// Re-apply a list of already-chosen mutagens by name.
    ///
    /// Names the catalog no longer knows are skipped with a warning.
    pub fn reapply(&self, seed: &mut MonsterSeed, names: &[String]) {
        for name in names {
            match self.catalog.mutagen(name) {
                Some(mutagen) => apply_effect(seed, mutagen),
                None => warn!(mutagen = %name, "unknown mutagen on record, skipped"),
            }
        }
    }
}

/// Fold one mutagen's stat changes and tags onto a seed.
pub fn apply_effect(seed: &mut MonsterSeed, mutagen: &MutagenTemplate) {
    seed.stats.apply(mutagen, Strength::Full);
    seed.meta.absorb(mutagen.tags());
}

//! The generation pipeline: one request in, one named monster out.

use rand::Rng;
use tracing::debug;

use super::mutagens::MutagenSelector;
use super::seed::{MonsterSeed, Mutagens, Tempers};
use super::stats::{derive_meta, derive_stats};
use super::types::{choose_primary_for, choose_type_pair, validate_pair};
use crate::config::ForgeConfig;
use crate::data::{Catalog, WeightedEntry};
use crate::error::Result;
use crate::naming::NameSynthesizer;
use crate::weighted::{chance, sample_without_replacement, weighted_choice};

/// What to forge. Unset types are drawn at random.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForgeRequest {
    pub idnum: u64,
    pub primary_type: Option<String>,
    pub secondary_type: Option<String>,
    /// Overrides `ForgeConfig::secondary_chance` for this request.
    pub secondary_chance: Option<f64>,
    pub majors: usize,
    pub utilities: usize,
}

impl ForgeRequest {
    pub fn new(idnum: u64) -> Self {
        Self {
            idnum,
            ..Self::default()
        }
    }

    pub fn primary(mut self, name: impl Into<String>) -> Self {
        self.primary_type = Some(name.into());
        self
    }

    pub fn secondary(mut self, name: impl Into<String>) -> Self {
        self.secondary_type = Some(name.into());
        self
    }

    pub fn secondary_chance(mut self, chance: f64) -> Self {
        self.secondary_chance = Some(chance);
        self
    }

    pub fn majors(mut self, count: usize) -> Self {
        self.majors = count;
        self
    }

    pub fn utilities(mut self, count: usize) -> Self {
        self.utilities = count;
        self
    }
}

/// Runs type selection, stat derivation, flavor rolls, mutagens and naming.
pub struct SeedForge<'a> {
    catalog: &'a Catalog,
    config: &'a ForgeConfig,
}

impl<'a> SeedForge<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a ForgeConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn config(&self) -> &'a ForgeConfig {
        self.config
    }

    /// Forge one monster.
    ///
    /// Explicit types are checked before anything is drawn, so a bad
    /// request fails with `UnknownType` or `InvalidPairing` and consumes
    /// no randomness.
    pub fn forge(&self, request: &ForgeRequest, rng: &mut impl Rng) -> Result<MonsterSeed> {
        let (primary, secondary) = self.resolve_types(request, rng)?;
        let primary_t = self.catalog.require_type(&primary)?;
        let secondary_t = secondary
            .as_deref()
            .map(|s| self.catalog.require_type(s))
            .transpose()?;

        let stats = derive_stats(self.catalog, primary_t, secondary_t);
        let meta = derive_meta(primary_t, secondary_t);

        let species = weighted_choice(WeightedEntry::pairs(&primary_t.forms), rng)?.to_string();
        let habitat = weighted_choice(WeightedEntry::pairs(&primary_t.habitats), rng)?.to_string();
        let physical_traits = self.roll_traits(rng);
        let held_item = self.roll_held_item(rng)?;
        let tempers = self.roll_tempers(rng)?;

        let mut seed = MonsterSeed {
            idnum: request.idnum,
            name: String::new(),
            species,
            primary_type: primary,
            secondary_type: secondary,
            habitat,
            stats,
            mutagens: Mutagens::default(),
            physical_traits,
            held_item,
            tempers,
            meta,
        };

        let draw = MutagenSelector::new(self.catalog, self.config).apply_mutagens(
            &mut seed,
            request.majors,
            request.utilities,
            rng,
        );
        if draw.is_partial() {
            debug!(
                idnum = seed.idnum,
                majors = draw.major.len(),
                utilities = draw.utility.len(),
                "partial mutagen fill"
            );
        }

        NameSynthesizer::new(self.catalog, &self.config.naming).name_monster(&mut seed);
        Ok(seed)
    }

    fn resolve_types(
        &self,
        request: &ForgeRequest,
        rng: &mut impl Rng,
    ) -> Result<(String, Option<String>)> {
        let secondary_chance = request
            .secondary_chance
            .unwrap_or(self.config.secondary_chance);

        match (request.primary_type.as_deref(), request.secondary_type.as_deref()) {
            (Some(primary), Some(secondary)) => {
                validate_pair(self.catalog, primary, Some(secondary))?;
                Ok((primary.to_string(), Some(secondary.to_string())))
            }
            (None, Some(secondary)) => {
                let primary = choose_primary_for(self.catalog, secondary, rng)?;
                Ok((primary, Some(secondary.to_string())))
            }
            (primary, None) => choose_type_pair(self.catalog, primary, secondary_chance, rng),
        }
    }

    /// One trait, or two distinct ones with `second_trait_chance`.
    pub fn roll_traits(&self, rng: &mut impl Rng) -> Vec<String> {
        let count = if chance(rng, self.config.second_trait_chance) { 2 } else { 1 };
        let pool: Vec<(&str, f64)> = WeightedEntry::pairs(self.catalog.physical_traits()).collect();
        sample_without_replacement(pool, count, rng)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn roll_held_item(&self, rng: &mut impl Rng) -> Result<Option<String>> {
        if !chance(rng, self.config.held_item_chance) {
            return Ok(None);
        }
        let item = weighted_choice(WeightedEntry::pairs(self.catalog.held_items()), rng)?;
        Ok(Some(item.to_string()))
    }

    pub fn roll_tempers(&self, rng: &mut impl Rng) -> Result<Tempers> {
        Ok(Tempers {
            mood: weighted_choice(WeightedEntry::pairs(self.catalog.moods()), rng)?.to_string(),
            affinity: weighted_choice(WeightedEntry::pairs(self.catalog.affinities()), rng)?
                .to_string(),
        })
    }
}

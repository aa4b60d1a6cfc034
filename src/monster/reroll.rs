//! Re-rolling parts of an existing monster into a new variant.

use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;
use tracing::info;

use super::forge::SeedForge;
use super::mutagens::MutagenSelector;
use super::seed::MonsterSeed;
use super::stats::{derive_meta, derive_stats};
use super::types::validate_pair;
use crate::config::ForgeConfig;
use crate::data::{Bucket, Catalog};
use crate::error::ForgeError;
use crate::naming::NameSynthesizer;
use crate::persistence::{CacheError, MonsterCache};

/// Which attributes to redraw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RerollOptions {
    pub traits: bool,
    pub majors: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RerollOutcome {
    /// The new variant. The source record is untouched.
    Rerolled(MonsterSeed),
    /// No major mutagen is left that this lineage hasn't carried.
    Exhausted,
    /// Nothing was requested.
    Unchanged,
}

#[derive(Debug, Error)]
pub enum RerollError {
    #[error(transparent)]
    Forge(#[from] ForgeError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Produce a re-rolled copy of `seed`.
///
/// Re-rolling majors rebuilds stats and meta from the clean type baseline,
/// then applies a single replacement major and the existing utilities. All
/// replaced majors are remembered in `meta.retired_majors` and are never
/// drawn again for this lineage.
///
/// The source record is checked first: its type pair must be valid and
/// none of its mutagens may be gated out by its types.
pub fn reroll(
    seed: &MonsterSeed,
    options: RerollOptions,
    catalog: &Catalog,
    config: &ForgeConfig,
    rng: &mut impl Rng,
) -> Result<RerollOutcome, ForgeError> {
    if !options.traits && !options.majors {
        return Ok(RerollOutcome::Unchanged);
    }
    check_record(seed, catalog)?;

    let mut variant = seed.clone();
    variant.meta.unique_id = None;

    if options.traits {
        variant.physical_traits = SeedForge::new(catalog, config).roll_traits(rng);
    }

    if options.majors {
        let selector = MutagenSelector::new(catalog, config);
        let types = seed.types();
        let exclude: HashSet<&str> = seed
            .mutagens
            .major
            .iter()
            .chain(&seed.meta.retired_majors)
            .map(String::as_str)
            .collect();
        let Some(replacement) = selector.draw(Bucket::Major, &types, &exclude, 1, rng).pop() else {
            info!(name = %seed.name, retired = exclude.len(), "no replacement major left");
            return Ok(RerollOutcome::Exhausted);
        };

        let primary = catalog.require_type(&seed.primary_type)?;
        let secondary = seed
            .secondary_type
            .as_deref()
            .map(|s| catalog.require_type(s))
            .transpose()?;

        variant.stats = derive_stats(catalog, primary, secondary);
        let mut meta = derive_meta(primary, secondary);
        meta.notes = seed.meta.notes.clone();
        meta.retired_majors = seed.meta.retired_majors.clone();
        for old in &seed.mutagens.major {
            if !meta.retired_majors.contains(old) {
                meta.retired_majors.push(old.clone());
            }
        }
        variant.meta = meta;

        variant.mutagens.major = vec![replacement.name.clone()];
        let majors = variant.mutagens.major.clone();
        let utilities = variant.mutagens.utility.clone();
        selector.reapply(&mut variant, &majors);
        selector.reapply(&mut variant, &utilities);
    }

    NameSynthesizer::new(catalog, &config.naming).name_monster(&mut variant);
    info!(from = %seed.name, to = %variant.name, majors = ?variant.mutagens.major, "monster re-rolled");
    Ok(RerollOutcome::Rerolled(variant))
}

/// Reject records whose types or mutagens could never have been forged.
fn check_record(seed: &MonsterSeed, catalog: &Catalog) -> Result<(), ForgeError> {
    validate_pair(catalog, &seed.primary_type, seed.secondary_type.as_deref())?;
    let types = seed.types();
    for name in seed.mutagens.iter() {
        if catalog.mutagen(name).is_some_and(|m| m.is_gated_for(&types)) {
            return Err(ForgeError::InvalidInput(format!(
                "mutagen {name} is incompatible with {}",
                types.join("/")
            )));
        }
    }
    Ok(())
}

/// Re-roll a cached record and append the variant under a fresh id.
pub fn reroll_cached(
    cache: &mut MonsterCache,
    id: &str,
    options: RerollOptions,
    catalog: &Catalog,
    config: &ForgeConfig,
    rng: &mut impl Rng,
) -> Result<RerollOutcome, RerollError> {
    let original = cache.load(id)?;
    let outcome = reroll(&original, options, catalog, config, rng)?;
    match outcome {
        RerollOutcome::Rerolled(mut variant) => {
            cache.save(&mut variant, rng)?;
            Ok(RerollOutcome::Rerolled(variant))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::monster::forge::ForgeRequest;
    use crate::monster::stats::Stat;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;

    fn three_majors() -> Catalog {
        let mut one = fixtures::mutagen("One", 1.0);
        one.add = BTreeMap::from([(Stat::Atk, 10.0)]);
        let mut two = fixtures::mutagen("Two", 1.0);
        two.add = BTreeMap::from([(Stat::Def, 10.0)]);
        let mut three = fixtures::mutagen("Three", 1.0);
        three.add = BTreeMap::from([(Stat::Spd, 10.0)]);
        let mut grit = fixtures::mutagen("Grit", 1.0);
        grit.add = BTreeMap::from([(Stat::Hp, 5.0)]);
        fixtures::catalog(
            vec![fixtures::seed_type("Alpha", 1.0)],
            vec![one, two, three],
            vec![grit],
        )
    }

    fn five_majors() -> Catalog {
        let majors = ["A", "B", "C", "D", "E"]
            .into_iter()
            .map(|name| {
                let mut m = fixtures::mutagen(name, 1.0);
                m.add = BTreeMap::from([(Stat::Atk, 10.0)]);
                m
            })
            .collect();
        fixtures::catalog(vec![fixtures::seed_type("Alpha", 1.0)], majors, vec![])
    }

    fn forged(catalog: &Catalog, config: &ForgeConfig, rng: &mut ChaCha8Rng) -> MonsterSeed {
        SeedForge::new(catalog, config)
            .forge(&ForgeRequest::new(1).primary("Alpha").majors(1).utilities(1), rng)
            .unwrap()
    }

    fn rerolled(outcome: RerollOutcome) -> MonsterSeed {
        match outcome {
            RerollOutcome::Rerolled(seed) => seed,
            other => panic!("expected a re-rolled seed, got {other:?}"),
        }
    }

    #[test]
    fn test_nothing_requested() {
        let catalog = three_majors();
        let config = ForgeConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let seed = forged(&catalog, &config, &mut rng);
        let outcome = reroll(&seed, RerollOptions::default(), &catalog, &config, &mut rng).unwrap();
        assert_eq!(outcome, RerollOutcome::Unchanged);
    }

    #[test]
    fn test_majors_exhaust_after_every_alternative() {
        let catalog = three_majors();
        let config = ForgeConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let original = forged(&catalog, &config, &mut rng);
        let first_major = original.mutagens.major[0].clone();
        let majors = RerollOptions { traits: false, majors: true };

        let once = rerolled(reroll(&original, majors, &catalog, &config, &mut rng).unwrap());
        assert_ne!(once.mutagens.major[0], first_major);

        let twice = rerolled(reroll(&once, majors, &catalog, &config, &mut rng).unwrap());
        assert_ne!(twice.mutagens.major[0], first_major);
        assert_ne!(twice.mutagens.major[0], once.mutagens.major[0]);
        assert_eq!(twice.meta.retired_majors.len(), 2);

        let thrice = reroll(&twice, majors, &catalog, &config, &mut rng).unwrap();
        assert_eq!(thrice, RerollOutcome::Exhausted);

        // the source records are never touched
        assert_eq!(original.mutagens.major, vec![first_major]);
        assert!(original.meta.retired_majors.is_empty());
    }

    #[test]
    fn test_majors_reroll_draws_a_single_replacement() {
        let catalog = five_majors();
        let config = ForgeConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let original = SeedForge::new(&catalog, &config)
            .forge(&ForgeRequest::new(1).primary("Alpha").majors(2).utilities(0), &mut rng)
            .unwrap();
        assert_eq!(original.mutagens.major.len(), 2);

        let majors = RerollOptions { traits: false, majors: true };
        let variant = rerolled(reroll(&original, majors, &catalog, &config, &mut rng).unwrap());
        assert_eq!(variant.mutagens.major.len(), 1);
        assert!(!original.mutagens.major.contains(&variant.mutagens.major[0]));
        assert_eq!(variant.meta.retired_majors, original.mutagens.major);
        // base 50 plus a single +10
        assert_eq!(variant.stats.get(Stat::Atk), 60);

        // the next roll may not bring back either retired major
        let again = rerolled(reroll(&variant, majors, &catalog, &config, &mut rng).unwrap());
        assert_eq!(again.meta.retired_majors.len(), 3);
        assert!(!again.meta.retired_majors.contains(&again.mutagens.major[0]));
    }

    #[test]
    fn test_invalid_pair_on_record_is_rejected() {
        let catalog = Catalog::defaults().unwrap();
        let config = ForgeConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut seed = SeedForge::new(&catalog, &config)
            .forge(&ForgeRequest::new(1).primary("Inferno"), &mut rng)
            .unwrap();
        seed.secondary_type = Some("Inferno".into());
        let err = reroll(&seed, RerollOptions { traits: true, majors: false }, &catalog, &config, &mut rng)
            .unwrap_err();
        assert!(matches!(err, ForgeError::InvalidPairing { .. }));
    }

    #[test]
    fn test_gated_mutagen_on_record_is_rejected() {
        let mut grit = fixtures::mutagen("Grit", 1.0);
        grit.incompatible_types = vec!["Alpha".into()];
        let catalog = fixtures::catalog(
            vec![fixtures::seed_type("Alpha", 1.0)],
            vec![fixtures::mutagen("One", 1.0), fixtures::mutagen("Two", 1.0)],
            vec![grit],
        );
        let config = ForgeConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut seed = forged(&catalog, &config, &mut rng);
        assert!(seed.mutagens.utility.is_empty());
        seed.mutagens.utility.push("Grit".into());

        let err = reroll(&seed, RerollOptions { traits: false, majors: true }, &catalog, &config, &mut rng)
            .unwrap_err();
        assert!(matches!(err, ForgeError::InvalidInput(_)));
    }

    #[test]
    fn test_majors_rebuild_from_clean_baseline() {
        let catalog = three_majors();
        let config = ForgeConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut original = forged(&catalog, &config, &mut rng);
        original.meta.notes.push("seen near the ridge".into());
        original.meta.unique_id = Some("ABCDEFGHIJ".into());

        let variant = rerolled(
            reroll(&original, RerollOptions { traits: false, majors: true }, &catalog, &config, &mut rng).unwrap(),
        );

        // base 50 everywhere; exactly one +10 major and Grit's +5 HP
        let boosted: Vec<Stat> = [Stat::Atk, Stat::Def, Stat::Spd]
            .into_iter()
            .filter(|s| variant.stats.get(*s) == 60)
            .collect();
        assert_eq!(boosted.len(), 1);
        assert_eq!(variant.stats.get(Stat::Hp), 55);
        assert_eq!(variant.mutagens.utility, vec!["Grit"]);
        assert_eq!(variant.meta.notes, vec!["seen near the ridge"]);
        assert!(variant.meta.unique_id.is_none());
    }

    #[test]
    fn test_traits_only_keeps_mutagens() {
        let catalog = three_majors();
        let config = ForgeConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let original = forged(&catalog, &config, &mut rng);
        let variant = rerolled(
            reroll(&original, RerollOptions { traits: true, majors: false }, &catalog, &config, &mut rng).unwrap(),
        );
        assert_eq!(variant.mutagens, original.mutagens);
        assert_eq!(variant.stats, original.stats);
        assert_eq!(variant.name, original.name);
        assert!(!variant.physical_traits.is_empty());
    }

    #[test]
    fn test_reroll_cached_appends_new_record() {
        let catalog = three_majors();
        let config = ForgeConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let dir = tempfile::tempdir().unwrap();
        let mut cache = MonsterCache::open(dir.path().join("monsters.jsonl")).unwrap();

        let mut original = forged(&catalog, &config, &mut rng);
        let id = cache.save(&mut original, &mut rng).unwrap();

        let options = RerollOptions { traits: false, majors: true };
        let variant = rerolled(reroll_cached(&mut cache, &id, options, &catalog, &config, &mut rng).unwrap());
        let new_id = variant.unique_id().unwrap().to_string();
        assert_ne!(new_id, id);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.load(&id).unwrap(), original);
        assert_eq!(cache.load(&new_id).unwrap(), variant);
    }

    #[test]
    fn test_reroll_cached_unknown_id() {
        let catalog = three_majors();
        let config = ForgeConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let dir = tempfile::tempdir().unwrap();
        let mut cache = MonsterCache::open(dir.path().join("monsters.jsonl")).unwrap();
        let options = RerollOptions { traits: true, majors: false };
        let err = reroll_cached(&mut cache, "MISSING000", options, &catalog, &config, &mut rng).unwrap_err();
        assert!(matches!(err, RerollError::Cache(CacheError::NotFound(_))));
    }
}

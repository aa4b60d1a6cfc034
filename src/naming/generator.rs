//! Deterministic monster names.
//!
//! A name is a pure function of the monster's id, types, mutagens and an
//! optional salt: those are hashed into a seed for a private `ChaCha8Rng`
//! that never touches the generation RNG.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::phonetics::{
    capitalize, collapse_repeats, join_epithet, next_token, syllable_chain, truncate_chars,
    GENERIC_EPITHETS, GENERIC_PREFIXES, GENERIC_SUFFIXES,
};
use crate::config::NameConfig;
use crate::data::Catalog;
use crate::monster::seed::{MonsterSeed, Mutagens};
use crate::weighted::{chance, weighted_choice};

/// Syllable count distribution.
const SYLLABLES: [(usize, f64); 3] = [(2, 0.5), (3, 0.35), (4, 0.15)];

/// Attempts per requested alternative before giving up.
const ALTERNATIVE_ATTEMPTS_PER_NAME: usize = 50;

/// Stable 64-bit seed for a name: the first eight bytes of a SHA-256 over
/// the identifying fields, big-endian.
pub fn name_seed(
    idnum: u64,
    primary: &str,
    secondary: Option<&str>,
    mutagens: &Mutagens,
    salt: &str,
) -> u64 {
    let mut applied: Vec<&str> = mutagens.iter().collect();
    applied.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update(idnum.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(primary.as_bytes());
    hasher.update(b"|");
    hasher.update(secondary.unwrap_or("").as_bytes());
    hasher.update(b"|");
    hasher.update(applied.join(",").as_bytes());
    hasher.update(b"|");
    hasher.update(salt.as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// Builds names from type flavor pools, the syllable chain and epithets.
pub struct NameSynthesizer<'a> {
    catalog: &'a Catalog,
    config: &'a NameConfig,
}

impl<'a> NameSynthesizer<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a NameConfig) -> Self {
        Self { catalog, config }
    }

    /// Same inputs, same name. Unknown types fall back to generic flavor.
    pub fn deterministic_name(
        &self,
        idnum: u64,
        primary: &str,
        secondary: Option<&str>,
        mutagens: &Mutagens,
        salt: &str,
    ) -> String {
        let mut rng = ChaCha8Rng::seed_from_u64(name_seed(idnum, primary, secondary, mutagens, salt));
        let syllables = weighted_choice(SYLLABLES, &mut rng).unwrap_or(2);

        let raw = if chance(&mut rng, self.config.flavored_chance) {
            self.flavored(primary, secondary, syllables, &mut rng)
        } else {
            syllable_chain(syllables * 2, &mut rng)
        };
        let base = truncate_chars(&collapse_repeats(&capitalize(&raw)), self.config.max_chars);

        if chance(&mut rng, self.config.epithet_chance) {
            let epithet = self.epithet(mutagens, &mut rng);
            join_epithet(&base, &epithet)
        } else {
            base
        }
    }

    /// Prefix, `syllables - 2` chain links, suffix.
    fn flavored(
        &self,
        primary: &str,
        secondary: Option<&str>,
        syllables: usize,
        rng: &mut impl Rng,
    ) -> String {
        let mut prefixes: Vec<&str> = Vec::new();
        let mut suffixes: Vec<&str> = Vec::new();
        let mut pool_from = |type_name: &str| {
            if let Some(t) = self.catalog.seed_type(type_name) {
                if !t.flavor.is_empty() {
                    prefixes.extend(t.flavor.prefixes.iter().map(String::as_str));
                    suffixes.extend(t.flavor.suffixes.iter().map(String::as_str));
                }
            }
        };
        pool_from(primary);
        if let Some(secondary) = secondary {
            if chance(rng, self.config.secondary_flavor_chance) {
                pool_from(secondary);
            }
        }

        if prefixes.is_empty() || suffixes.is_empty() {
            prefixes = GENERIC_PREFIXES.to_vec();
            suffixes = GENERIC_SUFFIXES.to_vec();
        }

        let mut name = prefixes[rng.gen_range(0..prefixes.len())].to_string();
        for _ in 0..syllables.saturating_sub(2) {
            let token = next_token(&name, rng);
            name.push_str(token);
        }
        name.push_str(suffixes[rng.gen_range(0..suffixes.len())]);
        name
    }

    /// Epithet keyed to the applied mutagens, majors first.
    fn epithet(&self, mutagens: &Mutagens, rng: &mut impl Rng) -> String {
        let keyed: Vec<&str> = mutagens
            .iter()
            .filter_map(|m| self.catalog.mutagen(m))
            .flat_map(|m| m.epithets.iter().map(String::as_str))
            .collect();
        let pool: &[&str] = if keyed.is_empty() { GENERIC_EPITHETS } else { &keyed };
        pool[rng.gen_range(0..pool.len())].to_string()
    }

    /// Assign the unsalted name to a seed.
    pub fn name_monster(&self, seed: &mut MonsterSeed) {
        seed.name = self.deterministic_name(
            seed.idnum,
            &seed.primary_type,
            seed.secondary_type.as_deref(),
            &seed.mutagens,
            "",
        );
        debug!(idnum = seed.idnum, name = %seed.name, "monster named");
    }

    /// Up to `count` distinct names under random salts, sorted.
    ///
    /// Salts come from `rng`, so repeated calls differ. A catalog with very
    /// few reachable names may come back short after the attempt cap.
    pub fn generate_alternative_names(
        &self,
        seed: &MonsterSeed,
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<String> {
        let mut names = BTreeSet::new();
        let max_attempts = count.saturating_mul(ALTERNATIVE_ATTEMPTS_PER_NAME);
        let mut attempts = 0;
        while names.len() < count && attempts < max_attempts {
            attempts += 1;
            let salt = format!("{:016x}", rng.gen::<u64>());
            names.insert(self.deterministic_name(
                seed.idnum,
                &seed.primary_type,
                seed.secondary_type.as_deref(),
                &seed.mutagens,
                &salt,
            ));
        }
        if names.len() < count {
            warn!(requested = count, found = names.len(), "ran out of attempts for alternative names");
        }
        names.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures;
    use crate::monster::seed::{Meta, Tempers};
    use proptest::prelude::*;

    fn mutagens(major: &[&str], utility: &[&str]) -> Mutagens {
        Mutagens {
            major: major.iter().map(|s| s.to_string()).collect(),
            utility: utility.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn seed(catalog: &Catalog) -> MonsterSeed {
        MonsterSeed {
            idnum: 3,
            name: String::new(),
            species: "Salamander".into(),
            primary_type: "Inferno".into(),
            secondary_type: Some("Mineral".into()),
            habitat: "Smoldering Flats".into(),
            stats: catalog.base_stats().clone(),
            mutagens: mutagens(&["Obsidian"], &["Forager"]),
            physical_traits: vec!["Amnesia".into()],
            held_item: None,
            tempers: Tempers::default(),
            meta: Meta::default(),
        }
    }

    #[test]
    fn test_name_seed_is_stable() {
        let m = mutagens(&["Obsidian"], &["BrightFlare"]);
        assert_eq!(name_seed(1, "Inferno", Some("Mineral"), &m, ""), 2725298560678632748);
        assert_eq!(name_seed(7, "Astral", None, &Mutagens::default(), "x"), 5625974612438389285);
    }

    #[test]
    fn test_name_is_stable_across_runs() {
        let catalog = Catalog::defaults().unwrap();
        let config = NameConfig::default();
        let synth = NameSynthesizer::new(&catalog, &config);
        let m = mutagens(&["Obsidian"], &["BrightFlare"]);
        assert_eq!(synth.deterministic_name(2, "Inferno", Some("Mineral"), &m, ""), "Pyriflare");
        assert_eq!(
            synth.deterministic_name(3, "Inferno", Some("Mineral"), &m, ""),
            "Cynis Volcanic-Glass"
        );
    }

    #[test]
    fn test_mutagen_order_does_not_matter() {
        let a = mutagens(&["Obsidian", "BrightFlare"], &[]);
        let b = mutagens(&["BrightFlare"], &["Obsidian"]);
        assert_eq!(name_seed(1, "Inferno", None, &a, ""), name_seed(1, "Inferno", None, &b, ""));
    }

    #[test]
    fn test_deterministic() {
        let catalog = Catalog::defaults().unwrap();
        let config = NameConfig::default();
        let synth = NameSynthesizer::new(&catalog, &config);
        let m = mutagens(&["Starwarden"], &[]);
        let first = synth.deterministic_name(12, "Astral", Some("Mythic"), &m, "");
        for _ in 0..5 {
            assert_eq!(synth.deterministic_name(12, "Astral", Some("Mythic"), &m, ""), first);
        }
        assert!(!first.is_empty());
    }

    #[test]
    fn test_salts_give_different_names() {
        let catalog = Catalog::defaults().unwrap();
        let config = NameConfig::default();
        let synth = NameSynthesizer::new(&catalog, &config);
        let m = Mutagens::default();
        let names: BTreeSet<String> = (0..20)
            .map(|i| synth.deterministic_name(5, "Sylvan", None, &m, &format!("salt-{i}")))
            .collect();
        assert!(names.len() >= 8, "only {} distinct names", names.len());
    }

    #[test]
    fn test_ten_alternatives() {
        let catalog = Catalog::defaults().unwrap();
        let config = NameConfig::default();
        let synth = NameSynthesizer::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let names = synth.generate_alternative_names(&seed(&catalog), 10, &mut rng);
        assert_eq!(names.len(), 10);
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, names);
    }

    #[test]
    fn test_base_name_respects_max_chars() {
        let catalog = Catalog::defaults().unwrap();
        let config = NameConfig {
            epithet_chance: 0.0,
            ..NameConfig::default()
        };
        let synth = NameSynthesizer::new(&catalog, &config);
        for id in 0..300 {
            let name = synth.deterministic_name(id, "Anomalous", Some("Electric"), &Mutagens::default(), "");
            assert!(name.chars().count() <= 12, "{name} is too long");
            assert!(name.chars().next().unwrap().is_uppercase());
        }
    }

    #[test]
    fn test_flavored_names_use_type_prefixes() {
        let catalog = Catalog::defaults().unwrap();
        let config = NameConfig {
            epithet_chance: 0.0,
            flavored_chance: 1.0,
            ..NameConfig::default()
        };
        let synth = NameSynthesizer::new(&catalog, &config);
        let prefixes = &catalog.seed_type("Inferno").unwrap().flavor.prefixes;
        for id in 0..50 {
            let name = synth.deterministic_name(id, "Inferno", None, &Mutagens::default(), "");
            assert!(prefixes.iter().any(|p| name.starts_with(p.as_str())), "{name}");
        }
    }

    #[test]
    fn test_unknown_type_falls_back_to_generic() {
        let catalog = fixtures::catalog(vec![fixtures::seed_type("Alpha", 1.0)], vec![], vec![]);
        let config = NameConfig {
            epithet_chance: 0.0,
            flavored_chance: 1.0,
            ..NameConfig::default()
        };
        let synth = NameSynthesizer::new(&catalog, &config);
        for id in 0..30 {
            let name = synth.deterministic_name(id, "Nowhere", None, &Mutagens::default(), "");
            assert!(GENERIC_PREFIXES.iter().any(|p| name.starts_with(p)), "{name}");
        }
    }

    #[test]
    fn test_epithet_falls_back_to_generic_pool() {
        let catalog = fixtures::catalog(vec![fixtures::seed_type("Alpha", 1.0)], vec![], vec![]);
        let config = NameConfig {
            epithet_chance: 1.0,
            ..NameConfig::default()
        };
        let synth = NameSynthesizer::new(&catalog, &config);
        let name = synth.deterministic_name(1, "Alpha", None, &Mutagens::default(), "");
        assert!(GENERIC_EPITHETS.iter().any(|e| name.ends_with(e)), "{name}");
    }

    #[test]
    fn test_epithet_keyed_to_mutagens() {
        let catalog = Catalog::defaults().unwrap();
        let config = NameConfig {
            epithet_chance: 1.0,
            ..NameConfig::default()
        };
        let synth = NameSynthesizer::new(&catalog, &config);
        let epithets = &catalog.mutagen("Ageless").unwrap().epithets;
        let m = mutagens(&[], &["Ageless"]);
        for id in 0..20 {
            let name = synth.deterministic_name(id, "Ancient", None, &m, "");
            assert!(epithets.iter().any(|e| name.ends_with(e.as_str())), "{name}");
        }
    }

    #[test]
    fn test_name_monster_sets_unsalted_name() {
        let catalog = Catalog::defaults().unwrap();
        let config = NameConfig::default();
        let synth = NameSynthesizer::new(&catalog, &config);
        let mut s = seed(&catalog);
        synth.name_monster(&mut s);
        assert_eq!(
            s.name,
            synth.deterministic_name(3, "Inferno", Some("Mineral"), &s.mutagens, "")
        );
    }

    proptest! {
        #[test]
        fn prop_name_is_pure(id in any::<u64>(), salt in "[a-z0-9]{0,8}") {
            let catalog = Catalog::defaults().unwrap();
            let config = NameConfig::default();
            let synth = NameSynthesizer::new(&catalog, &config);
            let m = mutagens(&["Obsidian"], &[]);
            let a = synth.deterministic_name(id, "Mineral", Some("Inferno"), &m, &salt);
            let b = synth.deterministic_name(id, "Mineral", Some("Inferno"), &m, &salt);
            prop_assert_eq!(a, b);
        }
    }
}

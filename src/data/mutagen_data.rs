//! Mutagen definitions loaded from JSON.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{unique_keys, Tag};
use crate::monster::stats::{Stat, StatEffect};

/// The two mutagen pools. A mutagen belongs to exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Major,
    Utility,
}

impl Bucket {
    pub const ALL: [Bucket; 2] = [Bucket::Major, Bucket::Utility];
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Major => f.write_str("major"),
            Bucket::Utility => f.write_str("utility"),
        }
    }
}

/// A mutagen: rarity-weighted modifier gated by type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MutagenTemplate {
    pub name: String,
    /// Higher is rarer; selection weight is `1 / rarity^alpha`.
    pub rarity: f64,
    #[serde(default, deserialize_with = "unique_keys")]
    pub mul: BTreeMap<Stat, f64>,
    #[serde(default, deserialize_with = "unique_keys")]
    pub add: BTreeMap<Stat, f64>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Types that can never carry this mutagen.
    #[serde(default)]
    pub incompatible_types: Vec<String>,
    /// Weight boost per type present on the monster.
    #[serde(default, deserialize_with = "unique_keys")]
    pub synergy_bonus: BTreeMap<String, f64>,
    #[serde(default)]
    pub epithets: Vec<String>,
    /// Art-prompt wording for this mutagen.
    #[serde(default)]
    pub visual: Option<String>,
}

/// Container for deserializing the mutagens JSON file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MutagensFile {
    #[serde(default)]
    pub major: Vec<MutagenTemplate>,
    #[serde(default)]
    pub utility: Vec<MutagenTemplate>,
}

impl MutagenTemplate {
    /// True when any of the monster's types is on the incompatible list.
    pub fn is_gated_for(&self, types: &[&str]) -> bool {
        self.incompatible_types
            .iter()
            .any(|t| types.contains(&t.as_str()))
    }
}

impl StatEffect for MutagenTemplate {
    fn multipliers(&self) -> &BTreeMap<Stat, f64> {
        &self.mul
    }

    fn additions(&self) -> &BTreeMap<Stat, f64> {
        &self.add
    }

    fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

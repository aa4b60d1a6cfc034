//! Monster type definitions loaded from JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{unique_keys, Tag, WeightedEntry};
use crate::monster::stats::{Stat, StatEffect};

/// A monster type: stat bias, tags, naming flavor and where it lives.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeTemplate {
    pub name: String,
    /// Base selection weight.
    pub weight: f64,
    /// Adjective used when this type qualifies another ("Ore Inferno").
    pub adjective: String,
    #[serde(default, deserialize_with = "unique_keys")]
    pub mul: BTreeMap<Stat, f64>,
    #[serde(default, deserialize_with = "unique_keys")]
    pub add: BTreeMap<Stat, f64>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub flavor: NameFlavor,
    /// Art-prompt hint for the overall body shape.
    #[serde(default)]
    pub body_plan: Option<String>,
    pub forms: Vec<WeightedEntry>,
    pub habitats: Vec<WeightedEntry>,
}

/// Prefix and suffix pools for type-flavored names.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NameFlavor {
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub suffixes: Vec<String>,
}

/// A multiplicative boost on secondary-type odds for an unordered pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynergyEntry {
    pub pair: [String; 2],
    pub boost: f64,
}

/// Container for deserializing the types JSON file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypesFile {
    pub types: Vec<TypeTemplate>,
    #[serde(default)]
    pub incompatible_pairs: Vec<[String; 2]>,
    #[serde(default)]
    pub synergy: Vec<SynergyEntry>,
}

impl StatEffect for TypeTemplate {
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

impl NameFlavor {
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() || self.suffixes.is_empty()
    }
}

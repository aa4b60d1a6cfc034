//! Weighted flavor tables: baseline stats, traits, items, tempers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::unique_keys;
use crate::monster::stats::Stat;

/// One entry of a weighted table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedEntry {
    pub name: String,
    pub weight: f64,
    /// Art-prompt wording, when the name alone doesn't paint a picture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemperTables {
    pub mood: Vec<WeightedEntry>,
    pub affinity: Vec<WeightedEntry>,
}

/// Container for deserializing the tables JSON file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TablesFile {
    #[serde(deserialize_with = "unique_keys")]
    pub base_stats: BTreeMap<Stat, i64>,
    pub physical_traits: Vec<WeightedEntry>,
    pub held_items: Vec<WeightedEntry>,
    pub tempers: TemperTables,
}

impl WeightedEntry {
    /// `(name, weight)` pairs for `weighted_choice`.
    pub fn pairs(entries: &[WeightedEntry]) -> impl Iterator<Item = (&str, f64)> {
        entries.iter().map(|e| (e.name.as_str(), e.weight))
    }
}

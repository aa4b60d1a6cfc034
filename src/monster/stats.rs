//! Stat block and the folding of type and mutagen effects onto it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::seed::Meta;
use crate::data::{Catalog, Tag, TypeTemplate};

/// A stat name. Declaration order is the display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spatk,
    Spdef,
    Spd,
    Acc,
    Eva,
    Luck,
}

impl Stat {
    pub const ALL: [Stat; 9] = [
        Stat::Hp,
        Stat::Atk,
        Stat::Def,
        Stat::Spatk,
        Stat::Spdef,
        Stat::Spd,
        Stat::Acc,
        Stat::Eva,
        Stat::Luck,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Atk => "ATK",
            Stat::Def => "DEF",
            Stat::Spatk => "SPATK",
            Stat::Spdef => "SPDEF",
            Stat::Spd => "SPD",
            Stat::Acc => "ACC",
            Stat::Eva => "EVA",
            Stat::Luck => "LUCK",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Integer stat values keyed by stat, serialized as `{"HP": 100, ...}`.
///
/// Values never drop below zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats(BTreeMap<Stat, i64>);

/// Something that shifts stats and contributes tags: a type or a mutagen.
pub trait StatEffect {
    fn multipliers(&self) -> &BTreeMap<Stat, f64>;
    fn additions(&self) -> &BTreeMap<Stat, f64>;
    fn tags(&self) -> &[Tag];
}

/// How strongly an effect applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strength {
    Full,
    /// Secondary types: multipliers move halfway to 1.0, additions are halved.
    Half,
}

impl Strength {
    fn multiplier(self, m: f64) -> f64 {
        match self {
            Strength::Full => m,
            Strength::Half => 1.0 + (m - 1.0) * 0.5,
        }
    }

    fn addition(self, a: f64) -> f64 {
        match self {
            Strength::Full => a,
            Strength::Half => a * 0.5,
        }
    }
}

impl Stats {
    pub fn new(values: BTreeMap<Stat, i64>) -> Self {
        Self(values.into_iter().map(|(k, v)| (k, v.max(0))).collect())
    }

    /// Value of a stat, 0 when the stat is not tracked.
    pub fn get(&self, stat: Stat) -> i64 {
        self.0.get(&stat).copied().unwrap_or(0)
    }

    pub fn contains(&self, stat: Stat) -> bool {
        self.0.contains_key(&stat)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, i64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Apply an effect's multipliers, then its additions.
    ///
    /// Every stat is rounded to an integer after each step, ties to even.
    /// Stats missing from this block are left alone.
    pub fn apply(&mut self, effect: &impl StatEffect, strength: Strength) {
        for (stat, m) in effect.multipliers() {
            if let Some(value) = self.0.get_mut(stat) {
                *value = round_stat(*value as f64 * strength.multiplier(*m));
            }
        }
        for (stat, a) in effect.additions() {
            if let Some(value) = self.0.get_mut(stat) {
                *value = (*value + strength.addition(*a).round_ties_even() as i64).max(0);
            }
        }
    }
}

fn round_stat(x: f64) -> i64 {
    (x.round_ties_even() as i64).max(0)
}

/// Baseline stats with the primary type at full strength and the secondary at half.
pub fn derive_stats(
    catalog: &Catalog,
    primary: &TypeTemplate,
    secondary: Option<&TypeTemplate>,
) -> Stats {
    let mut stats = catalog.base_stats().clone();
    stats.apply(primary, Strength::Full);
    if let Some(secondary) = secondary {
        stats.apply(secondary, Strength::Half);
    }
    stats
}

/// Meta buckets from type tags, primary first. Tags are never attenuated.
pub fn derive_meta(primary: &TypeTemplate, secondary: Option<&TypeTemplate>) -> Meta {
    let mut meta = Meta::default();
    meta.absorb(primary.tags());
    if let Some(secondary) = secondary {
        meta.absorb(secondary.tags());
    }
    meta
}

//! The generated monster record.

use serde::{Deserialize, Serialize};

use super::stats::Stats;
use crate::data::{Bucket, Tag};

/// A monster as produced by the forge, before any formatting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterSeed {
    pub idnum: u64,
    /// Empty until the name synthesizer runs.
    pub name: String,
    pub species: String,
    pub primary_type: String,
    pub secondary_type: Option<String>,
    pub habitat: String,
    pub stats: Stats,
    pub mutagens: Mutagens,
    pub physical_traits: Vec<String>,
    pub held_item: Option<String>,
    pub tempers: Tempers,
    pub meta: Meta,
}

/// Applied mutagen identifiers, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutagens {
    #[serde(default)]
    pub major: Vec<String>,
    #[serde(default)]
    pub utility: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tempers {
    pub mood: String,
    pub affinity: String,
}

/// Derived metadata. Tags with a reserved prefix land in their own bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub resist: Vec<String>,
    #[serde(default)]
    pub weak: Vec<String>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    /// Majors replaced by earlier re-rolls of this lineage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub retired_majors: Vec<String>,
    /// Assigned by the cache on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
}

impl Mutagens {
    pub fn bucket(&self, bucket: Bucket) -> &[String] {
        match bucket {
            Bucket::Major => &self.major,
            Bucket::Utility => &self.utility,
        }
    }

    pub fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<String> {
        match bucket {
            Bucket::Major => &mut self.major,
            Bucket::Utility => &mut self.utility,
        }
    }

    /// Majors then utilities.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.major.iter().chain(self.utility.iter()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|m| m == name)
    }

    pub fn is_empty(&self) -> bool {
        self.major.is_empty() && self.utility.is_empty()
    }
}

impl Meta {
    /// Route tags into their buckets.
    pub fn absorb(&mut self, tags: &[Tag]) {
        for tag in tags {
            match tag {
                Tag::Resist(v) => self.resist.push(v.clone()),
                Tag::Weak(v) => self.weak.push(v.clone()),
                Tag::Ability(v) => self.abilities.push(v.clone()),
                Tag::Trigger(v) => self.triggers.push(v.clone()),
                Tag::Generic(v) => self.tags.push(v.clone()),
            }
        }
    }
}

impl MonsterSeed {
    /// Primary type, then secondary if present.
    pub fn types(&self) -> Vec<&str> {
        let mut types = vec![self.primary_type.as_str()];
        if let Some(secondary) = &self.secondary_type {
            types.push(secondary.as_str());
        }
        types
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.meta.unique_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_routing() {
        let tags: Vec<Tag> = ["Resist:Frost", "Weak:Aquatic", "Ability:Ember Body", "Trigger:Nightfall", "fiery"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let mut meta = Meta::default();
        meta.absorb(&tags);
        assert_eq!(meta.resist, vec!["Frost"]);
        assert_eq!(meta.weak, vec!["Aquatic"]);
        assert_eq!(meta.abilities, vec!["Ember Body"]);
        assert_eq!(meta.triggers, vec!["Nightfall"]);
        assert_eq!(meta.tags, vec!["fiery"]);
    }

    #[test]
    fn test_meta_without_unique_id_parses() {
        let meta: Meta = serde_json::from_str(r#"{"tags": ["a"], "resist": [], "weak": []}"#).unwrap();
        assert!(meta.unique_id.is_none());
        assert!(meta.notes.is_empty());

        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("unique_id"));
        assert!(!json.contains("retired_majors"));
    }

    #[test]
    fn test_mutagen_iteration_order() {
        let mutagens = Mutagens {
            major: vec!["Obsidian".into()],
            utility: vec!["Forager".into(), "Haggler".into()],
        };
        let all: Vec<&str> = mutagens.iter().collect();
        assert_eq!(all, vec!["Obsidian", "Forager", "Haggler"]);
        assert!(mutagens.contains("Haggler"));
        assert_eq!(mutagens.bucket(Bucket::Utility).len(), 2);
    }
}

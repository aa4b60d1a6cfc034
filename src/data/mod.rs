//! Data-driven catalog registry.
//!
//! Loads monster types, mutagens and weighted flavor tables from JSON data
//! files. Defaults are embedded in the binary via `include_str!`; a data
//! directory can replace any of the three files. Everything is validated
//! once at load time and read-only afterwards.

pub mod mutagen_data;
pub mod table_data;
pub mod tags;
pub mod type_data;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use thiserror::Error;
use tracing::{debug, info};

pub use mutagen_data::{Bucket, MutagenTemplate, MutagensFile};
pub use table_data::{TablesFile, TemperTables, WeightedEntry};
pub use tags::Tag;
pub use type_data::{NameFlavor, SynergyEntry, TypeTemplate, TypesFile};

use crate::error::ForgeError;
use crate::monster::stats::{Stat, Stats};

// Embedded default data files
const DEFAULT_TYPES_JSON: &str = include_str!("../../data/defaults/types.json");
const DEFAULT_MUTAGENS_JSON: &str = include_str!("../../data/defaults/mutagens.json");
const DEFAULT_TABLES_JSON: &str = include_str!("../../data/defaults/tables.json");

const TYPES_FILE: &str = "types.json";
const MUTAGENS_FILE: &str = "mutagens.json";
const TABLES_FILE: &str = "tables.json";

/// Errors raised while loading or validating catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate {table} entry `{key}`")]
    DuplicateKey { table: String, key: String },

    #[error("{table} references unknown type `{name}`")]
    UnknownType { table: String, name: String },

    #[error("invalid {table} entry `{key}`: {reason}")]
    InvalidValue {
        table: String,
        key: String,
        reason: String,
    },

    #[error("bad tag: {0}")]
    BadTag(String),
}

/// Read-only catalog of everything the generator draws from.
#[derive(Clone, Debug)]
pub struct Catalog {
    /// Types in file order (drives deterministic iteration).
    types: Vec<TypeTemplate>,
    type_index: HashMap<String, usize>,
    incompatible: HashSet<(String, String)>,
    synergy: HashMap<(String, String), f64>,
    major: Vec<MutagenTemplate>,
    utility: Vec<MutagenTemplate>,
    mutagen_index: HashMap<String, (Bucket, usize)>,
    base_stats: Stats,
    physical_traits: Vec<WeightedEntry>,
    held_items: Vec<WeightedEntry>,
    tempers: TemperTables,
}

impl Catalog {
    /// Load from the embedded defaults compiled into the binary.
    pub fn defaults() -> Result<Self, CatalogError> {
        Self::from_files(
            parse(TYPES_FILE, DEFAULT_TYPES_JSON)?,
            parse(MUTAGENS_FILE, DEFAULT_MUTAGENS_JSON)?,
            parse(TABLES_FILE, DEFAULT_TABLES_JSON)?,
        )
    }

    /// Load from a directory, falling back to the embedded default for any
    /// file the directory does not provide.
    ///
    /// An override replaces the whole file; entries are not merged, since
    /// mutagens and pairs reference types by name.
    pub fn load_from(dir: &Path) -> Result<Self, CatalogError> {
        let types = parse(TYPES_FILE, &read_or_default(dir, TYPES_FILE, DEFAULT_TYPES_JSON)?)?;
        let mutagens = parse(
            MUTAGENS_FILE,
            &read_or_default(dir, MUTAGENS_FILE, DEFAULT_MUTAGENS_JSON)?,
        )?;
        let tables = parse(TABLES_FILE, &read_or_default(dir, TABLES_FILE, DEFAULT_TABLES_JSON)?)?;
        Self::from_files(types, mutagens, tables)
    }

    /// Build and validate a catalog from already-parsed files.
    ///
    /// This is also how tests inject small synthetic catalogs.
    pub fn from_files(
        types_file: TypesFile,
        mutagens_file: MutagensFile,
        tables: TablesFile,
    ) -> Result<Self, CatalogError> {
        let mut type_index = HashMap::new();
        for (i, t) in types_file.types.iter().enumerate() {
            if t.name.trim().is_empty() {
                return Err(invalid("types", &t.name, "empty type name"));
            }
            if type_index.insert(t.name.clone(), i).is_some() {
                return Err(duplicate("types", &t.name));
            }
            check_weight("types", &t.name, t.weight)?;
            check_modifiers("types", &t.name, &t.mul, &t.add)?;
            check_entries(&format!("{} forms", t.name), &t.forms)?;
            check_entries(&format!("{} habitats", t.name), &t.habitats)?;
        }
        if type_index.is_empty() {
            return Err(invalid("types", "-", "catalog defines no types"));
        }

        let mut incompatible = HashSet::new();
        for [a, b] in &types_file.incompatible_pairs {
            check_known(&type_index, "incompatible_pairs", a)?;
            check_known(&type_index, "incompatible_pairs", b)?;
            if a == b {
                return Err(invalid("incompatible_pairs", a, "pair names the same type twice"));
            }
            if !incompatible.insert(pair_key(a, b)) {
                return Err(duplicate("incompatible_pairs", &format!("{a}/{b}")));
            }
        }

        let mut synergy = HashMap::new();
        for entry in &types_file.synergy {
            let [a, b] = &entry.pair;
            check_known(&type_index, "synergy", a)?;
            check_known(&type_index, "synergy", b)?;
            if a == b {
                return Err(invalid("synergy", a, "pair names the same type twice"));
            }
            check_weight("synergy", &format!("{a}/{b}"), entry.boost)?;
            if synergy.insert(pair_key(a, b), entry.boost).is_some() {
                return Err(duplicate("synergy", &format!("{a}/{b}")));
            }
        }

        let mut mutagen_index = HashMap::new();
        for bucket in Bucket::ALL {
            let pool = match bucket {
                Bucket::Major => &mutagens_file.major,
                Bucket::Utility => &mutagens_file.utility,
            };
            let table = format!("{bucket} mutagens");
            for (i, m) in pool.iter().enumerate() {
                if m.name.trim().is_empty() {
                    return Err(invalid(&table, &m.name, "empty mutagen name"));
                }
                if mutagen_index.insert(m.name.clone(), (bucket, i)).is_some() {
                    return Err(duplicate("mutagens", &m.name));
                }
                if !m.rarity.is_finite() || m.rarity <= 0.0 {
                    return Err(invalid(&table, &m.name, "rarity must be a positive number"));
                }
                check_modifiers(&table, &m.name, &m.mul, &m.add)?;
                let mut seen = HashSet::new();
                for t in &m.incompatible_types {
                    check_known(&type_index, &table, t)?;
                    if !seen.insert(t) {
                        return Err(duplicate(&table, &format!("{}: incompatible {t}", m.name)));
                    }
                }
                for (t, bonus) in &m.synergy_bonus {
                    check_known(&type_index, &table, t)?;
                    check_weight(&table, &format!("{}: synergy {t}", m.name), *bonus)?;
                }
            }
        }

        for stat in Stat::ALL {
            match tables.base_stats.get(&stat) {
                None => return Err(invalid("base_stats", stat.label(), "missing baseline value")),
                Some(v) if *v < 0 => return Err(invalid("base_stats", stat.label(), "negative baseline")),
                Some(_) => {}
            }
        }
        check_entries("physical_traits", &tables.physical_traits)?;
        check_entries("held_items", &tables.held_items)?;
        check_entries("tempers.mood", &tables.tempers.mood)?;
        check_entries("tempers.affinity", &tables.tempers.affinity)?;

        debug!(
            types = types_file.types.len(),
            majors = mutagens_file.major.len(),
            utilities = mutagens_file.utility.len(),
            "catalog validated"
        );

        Ok(Self {
            types: types_file.types,
            type_index,
            incompatible,
            synergy,
            major: mutagens_file.major,
            utility: mutagens_file.utility,
            mutagen_index,
            base_stats: Stats::new(tables.base_stats),
            physical_traits: tables.physical_traits,
            held_items: tables.held_items,
            tempers: tables.tempers,
        })
    }

    /// All types, in catalog order.
    pub fn types(&self) -> &[TypeTemplate] {
        &self.types
    }

    /// Get a type template by name.
    pub fn seed_type(&self, name: &str) -> Option<&TypeTemplate> {
        self.type_index.get(name).map(|&i| &self.types[i])
    }

    /// Like `seed_type`, but an unknown name is a `ForgeError::UnknownType`.
    pub fn require_type(&self, name: &str) -> Result<&TypeTemplate, ForgeError> {
        self.seed_type(name)
            .ok_or_else(|| ForgeError::UnknownType(name.to_string()))
    }

    pub fn is_incompatible(&self, a: &str, b: &str) -> bool {
        self.incompatible.contains(&pair_key(a, b))
    }

    /// Synergy boost for an unordered pair, 1.0 when none is registered.
    pub fn synergy(&self, a: &str, b: &str) -> f64 {
        self.synergy.get(&pair_key(a, b)).copied().unwrap_or(1.0)
    }

    /// Registered incompatible pairs, sorted.
    pub fn incompatible_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .incompatible
            .iter()
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect();
        pairs.sort();
        pairs
    }

    pub fn mutagens(&self, bucket: Bucket) -> &[MutagenTemplate] {
        match bucket {
            Bucket::Major => &self.major,
            Bucket::Utility => &self.utility,
        }
    }

    /// Look up a mutagen in either bucket.
    pub fn mutagen(&self, name: &str) -> Option<&MutagenTemplate> {
        self.mutagen_index
            .get(name)
            .map(|&(bucket, i)| &self.mutagens(bucket)[i])
    }

    pub fn mutagen_bucket(&self, name: &str) -> Option<Bucket> {
        self.mutagen_index.get(name).map(|&(bucket, _)| bucket)
    }

    pub fn base_stats(&self) -> &Stats {
        &self.base_stats
    }

    pub fn physical_traits(&self) -> &[WeightedEntry] {
        &self.physical_traits
    }

    pub fn held_items(&self) -> &[WeightedEntry] {
        &self.held_items
    }

    pub fn moods(&self) -> &[WeightedEntry] {
        &self.tempers.mood
    }

    pub fn affinities(&self) -> &[WeightedEntry] {
        &self.tempers.affinity
    }

    /// Every habitat any type can live in, sorted and deduplicated.
    pub fn habitats(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .types
            .iter()
            .flat_map(|t| t.habitats.iter().map(|h| h.name.as_str()))
            .collect();
        set.into_iter().collect()
    }

    /// Art-prompt wording for a physical trait, if the table has one.
    pub fn trait_visual(&self, name: &str) -> Option<&str> {
        self.physical_traits
            .iter()
            .find(|t| t.name == name)
            .and_then(|t| t.visual.as_deref())
    }
}

/// Deserialize a JSON object into a map, rejecting repeated keys instead of
/// letting the last one win.
pub(crate) fn unique_keys<'de, D, K, V>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de> + Ord + fmt::Debug,
    V: Deserialize<'de>,
{
    struct UniqueKeys<K, V>(PhantomData<(K, V)>);

    impl<'de, K, V> Visitor<'de> for UniqueKeys<K, V>
    where
        K: Deserialize<'de> + Ord + fmt::Debug,
        V: Deserialize<'de>,
    {
        type Value = BTreeMap<K, V>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map without repeated keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut map = BTreeMap::new();
            while let Some((key, value)) = access.next_entry::<K, V>()? {
                if map.contains_key(&key) {
                    return Err(de::Error::custom(format!("duplicate key {key:?}")));
                }
                map.insert(key, value);
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueKeys(PhantomData))
}

fn parse<T: serde::de::DeserializeOwned>(file: &str, contents: &str) -> Result<T, CatalogError> {
    serde_json::from_str(contents).map_err(|source| CatalogError::Parse {
        file: file.to_string(),
        source,
    })
}

fn read_or_default(dir: &Path, file: &str, default: &str) -> Result<String, CatalogError> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(default.to_string());
    }
    info!(path = %path.display(), "using catalog override");
    std::fs::read_to_string(&path).map_err(|source| CatalogError::Io { path, source })
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn duplicate(table: &str, key: &str) -> CatalogError {
    CatalogError::DuplicateKey {
        table: table.to_string(),
        key: key.to_string(),
    }
}

fn invalid(table: &str, key: &str, reason: &str) -> CatalogError {
    CatalogError::InvalidValue {
        table: table.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn check_known(index: &HashMap<String, usize>, table: &str, name: &str) -> Result<(), CatalogError> {
    if index.contains_key(name) {
        Ok(())
    } else {
        Err(CatalogError::UnknownType {
            table: table.to_string(),
            name: name.to_string(),
        })
    }
}

fn check_weight(table: &str, key: &str, weight: f64) -> Result<(), CatalogError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(invalid(table, key, &format!("weight {weight} must be a positive number")))
    }
}

fn check_modifiers(
    table: &str,
    key: &str,
    mul: &BTreeMap<Stat, f64>,
    add: &BTreeMap<Stat, f64>,
) -> Result<(), CatalogError> {
    for (stat, m) in mul {
        if !m.is_finite() || *m <= 0.0 {
            return Err(invalid(table, key, &format!("{stat} multiplier {m} must be positive")));
        }
    }
    for (stat, a) in add {
        if !a.is_finite() {
            return Err(invalid(table, key, &format!("{stat} addition is not a number")));
        }
    }
    Ok(())
}

fn check_entries(table: &str, entries: &[WeightedEntry]) -> Result<(), CatalogError> {
    if entries.is_empty() {
        return Err(invalid(table, "-", "table is empty"));
    }
    let mut seen = HashSet::new();
    for e in entries {
        if !seen.insert(e.name.as_str()) {
            return Err(duplicate(table, &e.name));
        }
        check_weight(table, &e.name, e.weight)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small synthetic catalogs for tests.

    use super::*;

    fn entries(names: &[&str]) -> Vec<WeightedEntry> {
        names
            .iter()
            .map(|n| WeightedEntry {
                name: n.to_string(),
                weight: 1.0,
                visual: None,
            })
            .collect()
    }

    pub fn seed_type(name: &str, weight: f64) -> TypeTemplate {
        TypeTemplate {
            name: name.to_string(),
            weight,
            adjective: format!("{name}ish"),
            mul: BTreeMap::new(),
            add: BTreeMap::new(),
            tags: Vec::new(),
            notes: Vec::new(),
            flavor: NameFlavor::default(),
            body_plan: None,
            forms: entries(&[format!("{name} Form").as_str()]),
            habitats: entries(&[format!("{name} Habitat").as_str()]),
        }
    }

    pub fn mutagen(name: &str, rarity: f64) -> MutagenTemplate {
        MutagenTemplate {
            name: name.to_string(),
            rarity,
            mul: BTreeMap::new(),
            add: BTreeMap::new(),
            tags: Vec::new(),
            incompatible_types: Vec::new(),
            synergy_bonus: BTreeMap::new(),
            epithets: Vec::new(),
            visual: None,
        }
    }

    pub fn tables() -> TablesFile {
        TablesFile {
            base_stats: Stat::ALL.iter().map(|s| (*s, 50)).collect(),
            physical_traits: entries(&["Spiky", "Furry", "Scaly"]),
            held_items: entries(&["Pebble"]),
            tempers: TemperTables {
                mood: entries(&["Calm"]),
                affinity: entries(&["Honor"]),
            },
        }
    }

    pub fn catalog(types: Vec<TypeTemplate>, major: Vec<MutagenTemplate>, utility: Vec<MutagenTemplate>) -> Catalog {
        Catalog::from_files(
            TypesFile {
                types,
                incompatible_pairs: Vec::new(),
                synergy: Vec::new(),
            },
            MutagensFile { major, utility },
            tables(),
        )
        .unwrap()
    }
}

//! Append-only JSON Lines store of generated monsters.
//!
//! Every save appends one full record. Records are keyed by the
//! `meta.unique_id` the cache mints on save; when an id shows up on more
//! than one line the last one wins.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use rand::Rng;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::monster::seed::MonsterSeed;

/// Length of a minted id.
pub const ID_LEN: usize = 10;
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no cached monster with id {0}")]
    NotFound(String),
}

/// Handle on one cache file plus an in-memory index of its records.
pub struct MonsterCache {
    path: PathBuf,
    records: HashMap<String, MonsterSeed>,
    /// Ids in order of first appearance.
    order: Vec<String>,
    /// Every id found in the file, including lines that failed to load.
    seen_ids: HashSet<String>,
}

impl MonsterCache {
    /// Open a cache file, indexing whatever it already holds.
    ///
    /// A missing file is an empty cache; it is created on first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        let mut cache = Self {
            path,
            records: HashMap::new(),
            order: Vec::new(),
            seen_ids: HashSet::new(),
        };
        if !cache.path.exists() {
            return Ok(cache);
        }

        let file = File::open(&cache.path).map_err(|source| cache.io_error(source))?;
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| cache.io_error(source))?;
            if line.trim().is_empty() {
                continue;
            }
            let value: Value = match serde_json::from_str(&line) {
                Ok(value) => value,
                Err(e) => {
                    warn!(line = lineno + 1, error = %e, "skipping malformed cache line");
                    continue;
                }
            };
            if let Some(id) = value.pointer("/meta/unique_id").and_then(Value::as_str) {
                cache.seen_ids.insert(id.to_string());
            }
            let seed: MonsterSeed = match serde_json::from_value(value) {
                Ok(seed) => seed,
                Err(e) => {
                    warn!(line = lineno + 1, error = %e, "skipping malformed cache line");
                    continue;
                }
            };
            let Some(id) = seed.unique_id().map(str::to_string) else {
                warn!(line = lineno + 1, "skipping cache line without unique_id");
                continue;
            };
            cache.index(id, seed);
        }
        info!(path = %cache.path.display(), records = cache.len(), "cache opened");
        Ok(cache)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mint an id, stamp it into the seed and append the record.
    pub fn save(&mut self, seed: &mut MonsterSeed, rng: &mut impl Rng) -> Result<String, CacheError> {
        let id = self.mint_id(rng);
        seed.meta.unique_id = Some(id.clone());
        let line = serde_json::to_string(seed)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        writeln!(file, "{line}").map_err(|source| self.io_error(source))?;

        self.index(id.clone(), seed.clone());
        info!(%id, name = %seed.name, "monster cached");
        Ok(id)
    }

    pub fn load(&self, id: &str) -> Result<MonsterSeed, CacheError> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| CacheError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Ids in the order they first appeared in the file.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn index(&mut self, id: String, seed: MonsterSeed) {
        if !self.records.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.seen_ids.insert(id.clone());
        self.records.insert(id, seed);
    }

    fn mint_id(&self, rng: &mut impl Rng) -> String {
        loop {
            let id: String = (0..ID_LEN)
                .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
                .collect();
            if !self.seen_ids.contains(&id) {
                return id;
            }
        }
    }

    fn io_error(&self, source: io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

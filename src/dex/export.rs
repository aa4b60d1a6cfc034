//! Batch generation and text export of dex entries.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use rand::Rng;
use tracing::{debug, info};

use super::entry::SEPARATOR_WIDTH;
use crate::error::{ForgeError, Result};
use crate::monster::forge::{ForgeRequest, SeedForge};
use crate::monster::seed::MonsterSeed;
use crate::monster::types::choose_type_pair;

/// Secondary odds for batch draws.
const BATCH_SECONDARY_CHANCE: f64 = 0.5;

/// Draws per entry before the last error is returned.
const MAX_ATTEMPTS: usize = 32;

/// Forge `count` monsters numbered `1..=count`.
///
/// Each entry draws its own type pair and forges with it; a draw the forge
/// rejects as `UnknownType` or `InvalidPairing` is simply drawn again.
pub fn generate_dex_batch(
    forge: &SeedForge,
    count: usize,
    majors: usize,
    utilities: usize,
    rng: &mut impl Rng,
) -> Result<Vec<MonsterSeed>> {
    let mut seeds = Vec::with_capacity(count);
    for idnum in 1..=count as u64 {
        seeds.push(forge_with_retry(forge, idnum, majors, utilities, rng)?);
    }
    info!(count, majors, utilities, "dex batch generated");
    Ok(seeds)
}

fn forge_with_retry(
    forge: &SeedForge,
    idnum: u64,
    majors: usize,
    utilities: usize,
    rng: &mut impl Rng,
) -> Result<MonsterSeed> {
    let mut last_error = None;
    for attempt in 1..=MAX_ATTEMPTS {
        let (primary, secondary) = choose_type_pair(forge.catalog(), None, BATCH_SECONDARY_CHANCE, rng)?;
        let mut request = ForgeRequest::new(idnum).primary(primary).majors(majors).utilities(utilities);
        request.secondary_type = secondary;
        match forge.forge(&request, rng) {
            Ok(seed) => return Ok(seed),
            Err(e) if e.is_retryable() => {
                debug!(idnum, attempt, error = %e, "redrawing types");
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_error.unwrap_or_else(|| ForgeError::InvalidInput("no forge attempts made".into())))
}

/// Write entries to a text file under a timestamped header.
pub fn write_entries(path: &Path, entries: &[String]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;

    writeln!(file, "=== MONSTER DEX ===")?;
    writeln!(file, "Entries: {}", entries.len())?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    for (i, entry) in entries.iter().enumerate() {
        writeln!(file, "{entry}")?;
        if i + 1 != entries.len() {
            writeln!(file, "{}", "-".repeat(SEPARATOR_WIDTH))?;
            writeln!(file)?;
        }
    }
    info!(path = %path.display(), entries = entries.len(), "dex entries written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForgeConfig;
    use crate::data::Catalog;
    use crate::dex::dex_entry;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_batch_numbers_entries() {
        let catalog = Catalog::defaults().unwrap();
        let config = ForgeConfig::default();
        let forge = SeedForge::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let seeds = generate_dex_batch(&forge, 12, 1, 1, &mut rng).unwrap();
        assert_eq!(seeds.len(), 12);
        for (i, seed) in seeds.iter().enumerate() {
            assert_eq!(seed.idnum, i as u64 + 1);
            assert_eq!(seed.mutagens.major.len(), 1);
            assert!(!seed.name.is_empty());
        }
    }

    #[test]
    fn test_empty_batch() {
        let catalog = Catalog::defaults().unwrap();
        let config = ForgeConfig::default();
        let forge = SeedForge::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(generate_dex_batch(&forge, 0, 1, 1, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_write_entries() {
        let catalog = Catalog::defaults().unwrap();
        let config = ForgeConfig::default();
        let forge = SeedForge::new(&catalog, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let entries: Vec<String> = generate_dex_batch(&forge, 3, 0, 0, &mut rng)
            .unwrap()
            .iter()
            .map(|s| dex_entry(s, &catalog))
            .collect();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("dex.txt");
        write_entries(&path, &entries).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("=== MONSTER DEX ===\nEntries: 3\nGenerated: "));
        assert!(text.contains("#001: "));
        assert!(text.contains("#003: "));
        // one separator heading each entry plus a divider between entries
        assert_eq!(text.matches(&"-".repeat(60)).count(), 5);
    }
}

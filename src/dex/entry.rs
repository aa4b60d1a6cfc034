//! Dex-style text entries.

use super::{format_dual_type, DualTypeStyle};
use crate::data::Catalog;
use crate::monster::seed::MonsterSeed;
use crate::monster::stats::Stats;

/// Width of the separator line above each entry.
pub const SEPARATOR_WIDTH: usize = 60;

/// `HP 100 • ATK 50 • ...` in display order, skipping untracked stats.
pub fn stat_line(stats: &Stats) -> String {
    stats
        .iter()
        .map(|(stat, value)| format!("{stat} {value}"))
        .collect::<Vec<_>>()
        .join(" • ")
}

fn physical_details(seed: &MonsterSeed) -> Vec<String> {
    let mut parts = Vec::new();
    if !seed.physical_traits.is_empty() {
        parts.push(format!("Physical Traits: {}", seed.physical_traits.join(", ")));
    }
    if let Some(item) = &seed.held_item {
        parts.push(format!("Observed carrying: {item}"));
    }
    if parts.is_empty() {
        parts.push("Distinctive features have not yet been documented.".to_string());
    }
    parts
}

/// Format a monster as a dex entry.
pub fn dex_entry(seed: &MonsterSeed, catalog: &Catalog) -> String {
    let mut lines = vec![
        "-".repeat(SEPARATOR_WIDTH),
        String::new(),
        format!("#{:03}: '{}' --- a(n) {} monster", seed.idnum, seed.name, seed.species),
        String::new(),
    ];

    lines.push(match &seed.secondary_type {
        None => format!("  -Type: {}", seed.primary_type),
        Some(secondary) => format!(
            "  -Types: {} ({}/{})",
            format_dual_type(catalog, &seed.primary_type, secondary, DualTypeStyle::AdjNoun),
            seed.primary_type,
            secondary
        ),
    });
    lines.push(String::new());

    let mut mutagen_parts = Vec::new();
    if !seed.mutagens.major.is_empty() {
        mutagen_parts.push(format!(
            "Documented Near-Lumen Mutagen: {}",
            seed.mutagens.major.join(", ")
        ));
    }
    if !seed.mutagens.utility.is_empty() {
        mutagen_parts.push(format!("Known Utility: {}", seed.mutagens.utility.join(", ")));
    }
    if !mutagen_parts.is_empty() {
        lines.push(mutagen_parts.join(" | "));
        lines.push(String::new());
    }

    lines.push(format!("Base Profile: {}", stat_line(&seed.stats)));
    lines.push(String::new());
    lines.push(format!("Habitat: {}", seed.habitat));
    lines.push(String::new());
    lines.extend(physical_details(seed));

    let meta = &seed.meta;
    if !meta.tags.is_empty() || !meta.resist.is_empty() || !meta.weak.is_empty() {
        lines.push(String::new());
        if !meta.tags.is_empty() {
            lines.push(format!("Tags: {}", meta.tags.join(", ")));
        }
        if !meta.resist.is_empty() {
            lines.push(format!("Resists: {}", meta.resist.join(", ")));
        }
        if !meta.weak.is_empty() {
            lines.push(format!("Weak To: {}", meta.weak.join(", ")));
        }
    }

    lines.join("\n")
}

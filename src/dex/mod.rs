//! Text output for generated monsters: dex entries, art prompts and
//! batch export.

pub mod entry;
pub mod export;
pub mod prompt;

pub use entry::dex_entry;
pub use export::{generate_dex_batch, write_entries};
pub use prompt::art_prompt;

use crate::data::Catalog;

/// How a dual type is spelled out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DualTypeStyle {
    /// Secondary's adjective before the primary: "Ore Inferno".
    AdjNoun,
    /// "Astral-Beast".
    Hyphen,
    /// "Sylvan, the Frost".
    Epithet,
}

/// Render a primary/secondary pair as a single label.
///
/// A secondary the catalog doesn't know lends its own name as the adjective.
pub fn format_dual_type(catalog: &Catalog, primary: &str, secondary: &str, style: DualTypeStyle) -> String {
    match style {
        DualTypeStyle::AdjNoun => {
            let adjective = catalog
                .seed_type(secondary)
                .map(|t| t.adjective.as_str())
                .unwrap_or(secondary);
            format!("{adjective} {primary}")
        }
        DualTypeStyle::Hyphen => format!("{secondary}-{primary}"),
        DualTypeStyle::Epithet => format!("{primary}, the {secondary}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dual_type_styles() {
        let catalog = Catalog::defaults().unwrap();
        assert_eq!(
            format_dual_type(&catalog, "Inferno", "Mineral", DualTypeStyle::AdjNoun),
            "Ore Inferno"
        );
        assert_eq!(
            format_dual_type(&catalog, "Beast", "Astral", DualTypeStyle::Hyphen),
            "Astral-Beast"
        );
        assert_eq!(
            format_dual_type(&catalog, "Sylvan", "Frost", DualTypeStyle::Epithet),
            "Sylvan, the Frost"
        );
    }

    #[test]
    fn test_unknown_secondary_adjective() {
        let catalog = Catalog::defaults().unwrap();
        assert_eq!(
            format_dual_type(&catalog, "Inferno", "Plasma", DualTypeStyle::AdjNoun),
            "Plasma Inferno"
        );
    }
}

//! Primary/secondary type selection.

use rand::Rng;
use tracing::debug;

use crate::data::Catalog;
use crate::error::{ForgeError, Result};
use crate::weighted::weighted_choice;

/// Pick a primary type (or take the override) and maybe a compatible secondary.
///
/// With probability `1 - secondary_chance` there is no secondary. Otherwise
/// the secondary is drawn from every type that is neither the primary nor
/// incompatible with it, each weighted by its base weight times the pair's
/// synergy. An empty candidate pool quietly yields no secondary.
pub fn choose_type_pair(
    catalog: &Catalog,
    primary_override: Option<&str>,
    secondary_chance: f64,
    rng: &mut impl Rng,
) -> Result<(String, Option<String>)> {
    if !(0.0..=1.0).contains(&secondary_chance) {
        return Err(ForgeError::InvalidInput(format!(
            "secondary chance {secondary_chance} is not a probability"
        )));
    }

    let primary = match primary_override {
        Some(name) => catalog.require_type(name)?.name.clone(),
        None => weighted_choice(
            catalog.types().iter().map(|t| (t.name.as_str(), t.weight)),
            rng,
        )?
        .to_string(),
    };

    if !rng.gen_bool(secondary_chance) {
        return Ok((primary, None));
    }

    let candidates: Vec<(&str, f64)> = catalog
        .types()
        .iter()
        .filter(|t| t.name != primary && !catalog.is_incompatible(&primary, &t.name))
        .map(|t| (t.name.as_str(), t.weight * catalog.synergy(&primary, &t.name)))
        .collect();

    if candidates.is_empty() {
        debug!(%primary, "no compatible secondary type");
        return Ok((primary, None));
    }

    let secondary = weighted_choice(candidates, rng)?.to_string();
    debug!(%primary, %secondary, "type pair chosen");
    Ok((primary, Some(secondary)))
}

/// Draw a primary type to go with a fixed secondary.
///
/// Uses the same candidate rules as secondary selection, mirrored.
pub fn choose_primary_for(catalog: &Catalog, secondary: &str, rng: &mut impl Rng) -> Result<String> {
    catalog.require_type(secondary)?;
    let candidates: Vec<(&str, f64)> = catalog
        .types()
        .iter()
        .filter(|t| t.name != secondary && !catalog.is_incompatible(secondary, &t.name))
        .map(|t| (t.name.as_str(), t.weight * catalog.synergy(secondary, &t.name)))
        .collect();
    if candidates.is_empty() {
        return Err(ForgeError::InvalidPairing {
            primary: "?".into(),
            secondary: secondary.to_string(),
            reason: "no type can pair with this secondary".into(),
        });
    }
    Ok(weighted_choice(candidates, rng)?.to_string())
}

/// Check explicit type arguments before any generation work starts.
pub fn validate_pair(catalog: &Catalog, primary: &str, secondary: Option<&str>) -> Result<()> {
    catalog.require_type(primary)?;
    let Some(secondary) = secondary else {
        return Ok(());
    };
    catalog.require_type(secondary)?;

    let reason = if secondary == primary {
        "secondary type equals the primary type"
    } else if catalog.is_incompatible(primary, secondary) {
        "types are incompatible"
    } else {
        return Ok(());
    };
    Err(ForgeError::InvalidPairing {
        primary: primary.to_string(),
        secondary: secondary.to_string(),
        reason: reason.to_string(),
    })
}

//! Image-generation prompts for monster sprites.

use crate::data::Catalog;
use crate::monster::seed::MonsterSeed;

const STYLE_HEADER: &str = "32-bit pixel art sprite of a fantasy RPG monster, \
    rich textures and next-gen pixel shading, built to sit in a 2.5-D world. \
    2D sprite, clean readable silhouette.";

const TECHNICAL_SPECS: &str = "High contrast, no anti-aliasing, pixel-perfect. \
    Lighting from upper-left. Shadows have a slight purple tint. \
    Neutral dark background; in-game sprites need a transparent background layer. \
    Aura effects may take some creative liberty with how they would animate.";

const DEFAULT_BODY: &str = "distinct creature silhouette";
const GLOW: &str = "emitting a subtle bioluminescent glow";

/// Tag that earns the glow line.
const LUMINOUS_TAG: &str = "luminous";

/// Build the sprite prompt for a monster.
pub fn art_prompt(seed: &MonsterSeed, catalog: &Catalog) -> String {
    let body = catalog
        .seed_type(&seed.primary_type)
        .and_then(|t| t.body_plan.as_deref())
        .unwrap_or(DEFAULT_BODY);
    let type_string = match &seed.secondary_type {
        Some(secondary) => format!("{}/{}", seed.primary_type, secondary),
        None => seed.primary_type.clone(),
    };

    let mut lines = vec![
        STYLE_HEADER.to_string(),
        format!(
            "Subject: A {} monster, {} type, {}, typically found in {}.",
            seed.species, type_string, body, seed.habitat
        ),
    ];

    let mutagen_visual = |name: &String| -> String {
        catalog
            .mutagen(name)
            .and_then(|m| m.visual.clone())
            .unwrap_or_else(|| name.clone())
    };

    let mut visuals = Vec::new();
    if !seed.mutagens.major.is_empty() {
        let majors: Vec<String> = seed.mutagens.major.iter().map(&mutagen_visual).collect();
        visuals.push(format!("infused with {}", majors.join(", ")));
    }
    if seed.meta.tags.iter().any(|t| t == LUMINOUS_TAG) {
        visuals.push(GLOW.to_string());
    }
    if !visuals.is_empty() {
        lines.push(format!("Visual features: {}.", visuals.join(", ")));
    }

    let mut details = Vec::new();
    if !seed.mutagens.utility.is_empty() {
        let utilities: Vec<String> = seed.mutagens.utility.iter().map(&mutagen_visual).collect();
        details.push(format!("carrying or wearing {}", utilities.join(", ")));
    }
    if !seed.physical_traits.is_empty() {
        let traits: Vec<&str> = seed
            .physical_traits
            .iter()
            .map(|t| catalog.trait_visual(t).unwrap_or(t.as_str()))
            .collect();
        details.push(format!("distinctive features include: {}", traits.join(", ")));
    }
    if let Some(item) = &seed.held_item {
        details.push(format!("holding {item}"));
    }
    if !details.is_empty() {
        lines.push(format!("Details: {}.", details.join(", ")));
    }

    let mood = if seed.tempers.mood.is_empty() {
        "neutral".to_string()
    } else {
        seed.tempers.mood.to_lowercase()
    };
    lines.push(format!(
        "Pose: 3/4 perspective facing diagonally forward with a {mood} expression. \
         Slight idle lean forward ready to engage. \
         Limbs and tail angled outward to show a clear silhouette."
    ));
    lines.push(TECHNICAL_SPECS.to_string());

    lines.join("\n")
}

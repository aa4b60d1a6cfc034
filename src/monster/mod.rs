//! Monster generation: records, type pairing, stats, mutagens, the forge
//! pipeline and re-rolls.

pub mod forge;
pub mod mutagens;
pub mod reroll;
pub mod seed;
pub mod stats;
pub mod types;

pub use forge::{ForgeRequest, SeedForge};
pub use mutagens::{MutagenDraw, MutagenSelector};
pub use reroll::{reroll, reroll_cached, RerollError, RerollOptions, RerollOutcome};
pub use seed::{Meta, MonsterSeed, Mutagens, Tempers};
pub use stats::{Stat, Stats};

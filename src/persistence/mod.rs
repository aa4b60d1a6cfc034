//! Persistence for generated monsters.

pub mod cache;

pub use cache::{CacheError, MonsterCache};

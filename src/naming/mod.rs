//! Monster name synthesis.

pub mod generator;
pub mod phonetics;

pub use generator::{name_seed, NameSynthesizer};

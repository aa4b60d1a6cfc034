//! Procedural monster generation library
//!
//! Types, mutagens and flavor tables come from a read-only `Catalog`; the
//! `SeedForge` turns a request into a named `MonsterSeed`, which the cache
//! persists and the dex module renders.

pub mod config;
pub mod data;
pub mod dex;
pub mod error;
pub mod monster;
pub mod naming;
pub mod persistence;
pub mod weighted;

//! Core types and definitions for the Armada simulator.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, the deterministic PRNG, mob records and containers, battle
//! scenario/status types, and the key-value registry. It has no dependency
//! on the engine or any runtime framework.

pub mod bits;
pub mod constants;
pub mod mob;
pub mod registry;
pub mod rng;
pub mod scenario;
pub mod types;

#[cfg(test)]
mod tests;

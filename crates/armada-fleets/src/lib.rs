//! Fleet controllers for Armada.
//!
//! Defines the controller contract every fleet AI implements, the per-fleet
//! context block the dispatch layer hands to controllers, and the reference
//! controllers used as tournament opponents and optimization targets.

pub mod ai;
pub mod controllers;
pub mod mutate;

pub use ai::{FleetAI, FleetController, MobHandle, MobStateTable};

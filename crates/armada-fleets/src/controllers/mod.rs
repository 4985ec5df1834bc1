//! Reference controllers and the type-keyed factory.

mod dummy;
mod fighter;
mod simple;

pub use dummy::DummyFleet;
pub use fighter::FighterFleet;
pub use simple::SimpleFleet;

use armada_core::registry::Registry;
use armada_core::rng::SimRng;
use armada_core::scenario::FleetAiType;

use crate::ai::{FleetAI, FleetController};

/// Construct the controller for a player, once per battle before tick 0.
///
/// Controllers push their configuration defaults into `ai.player.config`
/// here, so a freshly created fleet always has a complete parameter set.
/// The neutral player runs the dummy controller over an empty mob set.
pub fn create(ai: &mut FleetAI) -> Box<dyn FleetController> {
    match ai.player.ai_type {
        FleetAiType::Neutral | FleetAiType::Dummy => Box::new(DummyFleet::new(ai)),
        FleetAiType::Simple => Box::new(SimpleFleet::new(ai)),
        FleetAiType::Fighter => Box::new(FighterFleet::new(ai)),
    }
}

/// Apply a fleet type's mutation tables to a parameter registry.
///
/// Runs off the hot path during population mutation, without a live
/// controller instance.
pub fn mutate_fleet(ai_type: FleetAiType, reg: &mut Registry, rng: &mut SimRng) {
    match ai_type {
        FleetAiType::Neutral | FleetAiType::Dummy => {}
        FleetAiType::Simple => SimpleFleet::mutate(reg, rng),
        FleetAiType::Fighter => FighterFleet::mutate(reg, rng),
    }
}

//! The dummy fleet: random wander with occasional fighter spawns.
//!
//! Also serves as the neutral player's controller, where it runs over an
//! empty mob set.

use armada_core::constants::MICRON;
use armada_core::mob::MobType;
use armada_core::rng::SimRng;
use armada_core::types::Point;

use crate::ai::{FleetAI, FleetController};

pub struct DummyFleet {
    rng: SimRng,
}

impl DummyFleet {
    pub fn new(ai: &FleetAI) -> Self {
        Self {
            rng: SimRng::new(ai.seed),
        }
    }
}

impl FleetController for DummyFleet {
    fn run_tick(&mut self, ai: &mut FleetAI) {
        let width = ai.params.width;
        let height = ai.params.height;
        let tick = ai.tick;

        for mob in ai.mobs.iter_mut() {
            if mob.mob_type == MobType::Base && self.rng.int(0, 100) == 0 {
                mob.cmd.spawn_type = Some(MobType::Fighter);
            }

            let mut new_target = mob.pos.distance_to(&mob.cmd.target) <= MICRON;
            if mob.mob_type != MobType::Base && self.rng.int(0, 100) == 0 {
                new_target = true;
            }
            if mob.birth_tick == tick {
                new_target = true;
            }

            if new_target && self.rng.bit() {
                mob.cmd.target = Point::new(
                    self.rng.float(0.0, width),
                    self.rng.float(0.0, height),
                );
            }
        }
    }
}

//! The fighter fleet: per-ship tracking, missile volleys, core looting.
//!
//! Exercises the per-mob state arena: every fighter gets a `FighterShip`
//! handle on its birth tick.

use std::collections::HashMap;

use armada_core::constants::{MICRON, MISSILE_MAX_FUEL, MISSILE_SPEED};
use armada_core::mob::{Mob, MobId, MobType, MOB_FLAG_POWER_CORE, MOB_FLAG_SHIP};
use armada_core::registry::Registry;
use armada_core::rng::SimRng;
use armada_core::types::Point;

use crate::ai::{FleetAI, FleetController, MobHandle};
use crate::mutate::{mutate_floats, MutationFloatParams};

const MUTATION_TABLE: &[MutationFloatParams] = &[
    // key               min     max    mag   jump   mutation
    MutationFloatParams {
        key: "fireRangeScale",
        min_value: 0.25,
        max_value: 2.0,
        magnitude: 0.1,
        jump_rate: 0.05,
        mutation_rate: 0.25,
    },
    MutationFloatParams {
        key: "spawnCreditsMin",
        min_value: 0.0,
        max_value: 1000.0,
        magnitude: 0.1,
        jump_rate: 0.05,
        mutation_rate: 0.25,
    },
    MutationFloatParams {
        key: "baseSpawnOdds",
        min_value: 1.0,
        max_value: 100.0,
        magnitude: 0.1,
        jump_rate: 0.05,
        mutation_rate: 0.25,
    },
];

/// Per-fighter state held through the fleet's mob-state arena.
struct FighterShip {
    mobid: MobId,
}

pub struct FighterFleet {
    rng: SimRng,
    fire_range: f32,
    spawn_credits_min: i32,
    base_spawn_odds: i32,
}

impl FighterFleet {
    pub fn new(ai: &mut FleetAI) -> Self {
        let config = &mut ai.player.config;
        config.put_default("fireRangeScale", "1");
        config.put_default("spawnCreditsMin", "200");
        config.put_default("baseSpawnOdds", "20");

        let scale = config.get_float_or("fireRangeScale", 1.0);
        Self {
            rng: SimRng::new(ai.seed),
            fire_range: scale * MISSILE_SPEED * MISSILE_MAX_FUEL as f32,
            spawn_credits_min: config.get_float_or("spawnCreditsMin", 200.0) as i32,
            base_spawn_odds: (config.get_float_or("baseSpawnOdds", 20.0) as i32).max(1),
        }
    }

    pub fn mutate(reg: &mut Registry, rng: &mut SimRng) {
        mutate_floats(reg, rng, MUTATION_TABLE);
    }
}

impl FleetController for FighterFleet {
    fn run_tick(&mut self, ai: &mut FleetAI) {
        let FleetAI {
            params,
            credits,
            mobs,
            sensors,
            mob_state,
            ..
        } = ai;

        // Spread fighters across power cores instead of rushing one.
        let mut claimed: HashMap<MobId, u32> = HashMap::new();

        for mob in mobs.iter_mut() {
            match mob.mob_type {
                MobType::Fighter => {
                    let ship = mob_state
                        .get(mob.mobid)
                        .and_then(|h| h.downcast_ref::<FighterShip>());
                    debug_assert!(
                        ship.is_some_and(|s| s.mobid == mob.mobid),
                        "fighter is missing its arena state"
                    );

                    let mut loot_target = None;
                    if let Some(core) = sensors.find_closest(&mob.pos, MOB_FLAG_POWER_CORE) {
                        let claims = claimed.entry(core.mobid).or_insert(0);
                        *claims += 1;
                        if *claims <= 1 {
                            loot_target = Some(core.pos);
                        }
                    }

                    if let Some(contact) = sensors.find_closest(&mob.pos, MOB_FLAG_SHIP) {
                        if mob.pos.distance_to(&contact.pos) < self.fire_range {
                            mob.cmd.spawn_type = Some(MobType::Missile);
                        }
                    }

                    if let Some(pos) = loot_target {
                        mob.cmd.target = pos;
                    } else if mob.pos.distance_to(&mob.cmd.target) <= MICRON {
                        mob.cmd.target = Point::new(
                            self.rng.float(0.0, params.width),
                            self.rng.float(0.0, params.height),
                        );
                    }
                }
                MobType::Missile => {
                    if let Some(target) = sensors.find_closest(&mob.pos, MOB_FLAG_SHIP) {
                        mob.cmd.target = target.pos;
                    }
                }
                MobType::Base => {
                    if *credits > self.spawn_credits_min
                        && self.rng.int(0, self.base_spawn_odds) == 0
                    {
                        mob.cmd.spawn_type = Some(MobType::Fighter);
                    } else {
                        mob.cmd.spawn_type = None;
                    }
                }
                MobType::PowerCore => {}
            }
        }
    }

    fn mob_spawned(&mut self, mob: &Mob) -> Option<MobHandle> {
        if mob.mob_type == MobType::Fighter {
            Some(Box::new(FighterShip { mobid: mob.mobid }))
        } else {
            // We don't track anything else.
            None
        }
    }
}

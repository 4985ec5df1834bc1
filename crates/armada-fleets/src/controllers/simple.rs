//! The simple fleet: chase sensor contacts, remember the enemy base.

use std::collections::HashMap;

use armada_core::constants::MICRON;
use armada_core::mob::{Mob, MobId, MobType, MOB_FLAG_BASE, MOB_FLAG_POWER_CORE, MOB_FLAG_SHIP};
use armada_core::registry::Registry;
use armada_core::rng::SimRng;
use armada_core::types::Point;

use crate::ai::{FleetAI, FleetController};
use crate::mutate::{mutate_floats, MutationFloatParams};

/// How many ticks a remembered enemy base stays credible after the last
/// confirmed sighting.
const ENEMY_BASE_MEMORY_TICKS: u32 = 200;

const MUTATION_TABLE: &[MutationFloatParams] = &[
    // key               min     max    mag   jump   mutation
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
        max_value: 200.0,
        magnitude: 0.1,
        jump_rate: 0.05,
        mutation_rate: 0.25,
    },
    MutationFloatParams {
        key: "fireOdds",
        min_value: 1.0,
        max_value: 100.0,
        magnitude: 0.1,
        jump_rate: 0.05,
        mutation_rate: 0.25,
    },
];

pub struct SimpleFleet {
    rng: SimRng,
    base_pos: Point,
    enemy_base: Option<Mob>,
    enemy_base_age: u32,
    spawn_credits_min: i32,
    base_spawn_odds: i32,
    fire_odds: i32,
}

impl SimpleFleet {
    pub fn new(ai: &mut FleetAI) -> Self {
        let config = &mut ai.player.config;
        config.put_default("spawnCreditsMin", "200");
        config.put_default("baseSpawnOdds", "100");
        config.put_default("fireOdds", "20");

        Self {
            rng: SimRng::new(ai.seed),
            base_pos: Point::default(),
            enemy_base: None,
            enemy_base_age: 0,
            spawn_credits_min: config.get_float_or("spawnCreditsMin", 200.0) as i32,
            base_spawn_odds: (config.get_float_or("baseSpawnOdds", 100.0) as i32).max(1),
            fire_odds: (config.get_float_or("fireOdds", 20.0) as i32).max(1),
        }
    }

    pub fn mutate(reg: &mut Registry, rng: &mut SimRng) {
        mutate_floats(reg, rng, MUTATION_TABLE);
    }
}

impl FleetController for SimpleFleet {
    fn run_tick(&mut self, ai: &mut FleetAI) {
        let FleetAI {
            params,
            credits,
            mobs,
            sensors,
            ..
        } = ai;

        // If we've seen the enemy base recently, assume it's still there.
        match sensors.find_closest(&self.base_pos, MOB_FLAG_BASE) {
            Some(enemy_base) => {
                self.enemy_base = Some(enemy_base.clone());
                self.enemy_base_age = 0;
            }
            None => {
                if let Some(remembered) = &self.enemy_base {
                    if self.enemy_base_age < ENEMY_BASE_MEMORY_TICKS {
                        sensors.insert(remembered.clone());
                        self.enemy_base_age += 1;
                    } else {
                        self.enemy_base = None;
                    }
                }
            }
        }

        let ship_target = sensors
            .find_closest(&self.base_pos, MOB_FLAG_SHIP)
            .map(|m| (m.mobid, m.pos, m.mob_type));

        // Spread fighters across power cores instead of rushing one.
        let mut claimed: HashMap<MobId, u32> = HashMap::new();

        for mob in mobs.iter_mut() {
            match mob.mob_type {
                MobType::Fighter => {
                    let mut target = ship_target;
                    if target.is_none() {
                        if let Some(core) =
                            sensors.find_closest(&mob.pos, MOB_FLAG_POWER_CORE)
                        {
                            let claims = claimed.entry(core.mobid).or_insert(0);
                            *claims += 1;
                            if *claims <= 1 {
                                target = Some((core.mobid, core.pos, core.mob_type));
                            }
                        }
                    }

                    if let Some((_, pos, mob_type)) = target {
                        mob.cmd.target = pos;
                        if mob_type != MobType::PowerCore
                            && self.rng.int(0, self.fire_odds) == 0
                        {
                            mob.cmd.spawn_type = Some(MobType::Missile);
                        }
                    } else if mob.pos.distance_to(&mob.cmd.target) <= MICRON {
                        if self.rng.bit() {
                            mob.cmd.target = Point::new(
                                self.rng.float(0.0, params.width),
                                self.rng.float(0.0, params.height),
                            );
                        } else {
                            mob.cmd.target = self.base_pos;
                        }
                    }
                }
                MobType::Missile => {
                    if let Some(target) = sensors.find_closest(&mob.pos, MOB_FLAG_SHIP) {
                        mob.cmd.target = target.pos;
                    }
                }
                MobType::Base => {
                    self.base_pos = mob.pos;
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
}

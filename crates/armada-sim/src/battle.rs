//! The battle: authoritative world state and the tick loop.
//!
//! One battle is owned by exactly one worker thread from creation to the
//! final status read. Shared borrows of the mob array and status statically
//! pin the world: nothing can advance the simulation while a view is held.

use armada_core::mob::{Mob, MobId, MobType};
use armada_core::rng::SimRng;
use armada_core::scenario::{BattleScenario, BattleStatus, PlayerId, PLAYER_ID_NEUTRAL};
use armada_core::types::Point;

use crate::fleet::Fleet;
use crate::systems;

pub struct Battle {
    scenario: BattleScenario,
    rng: SimRng,
    status: BattleStatus,
    fleet: Fleet,
    power_core_spawn_bucket: f32,
    last_mobid: MobId,
    mobs: Vec<Mob>,
    pending_spawns: Vec<Mob>,
}

impl Battle {
    /// Create a battle from an immutable scenario and a seed. The seed
    /// fully determines the battle's outcome.
    pub fn new(scenario: BattleScenario, seed: u64) -> Battle {
        let num_players = scenario.params.num_players as usize;
        // We need Neutral + 2 fleets.
        assert!(num_players >= 3, "need neutral plus at least two fleets");
        assert_eq!(scenario.players.len(), num_players);
        assert!(num_players <= armada_core::constants::MAX_PLAYERS);

        let mut rng = SimRng::new(seed);
        let status = BattleStatus::new(&scenario);

        let mut mobs = Vec::with_capacity(1024);
        let mut last_mobid: MobId = 0;

        let params = &scenario.params;
        let starting = params.starting_bases + params.starting_fighters;
        let random_shift = rng.int(0, num_players as i32 - 1) as usize;

        for i in 0..num_players {
            if i == PLAYER_ID_NEUTRAL as usize {
                continue;
            }

            for s in 0..starting {
                let mob_type = if s < params.starting_bases {
                    MobType::Base
                } else {
                    MobType::Fighter
                };

                let pos = if params.restricted_start {
                    // Account for the neutral player: real players get
                    // vertical strips, shuffled by a random offset.
                    let p = (i + random_shift) % (num_players - 1);
                    let slot_w = params.width / (num_players - 1) as f32;
                    Point::new(
                        rng.float(p as f32 * slot_w, (p + 1) as f32 * slot_w),
                        rng.float(0.0, params.height),
                    )
                } else {
                    Point::new(
                        rng.float(0.0, params.width),
                        rng.float(0.0, params.height),
                    )
                };

                last_mobid += 1;
                mobs.push(Mob::new(last_mobid, mob_type, i as PlayerId, pos));
            }
        }

        let fleet_seed = rng.uint64();
        let fleet = Fleet::new(&scenario, fleet_seed);

        Battle {
            scenario,
            rng,
            status,
            fleet,
            power_core_spawn_bucket: 0.0,
            last_mobid,
            mobs,
            pending_spawns: Vec::new(),
        }
    }

    /// Advance the battle by one tick, running every phase in order.
    pub fn run_tick(&mut self) {
        assert!(self.status.tick < u32::MAX);

        // Run the AIs; they see the tick they are about to influence.
        self.fleet.run_tick(&self.status, &mut self.mobs);

        // Increment the tick after the AIs.
        self.status.tick += 1;

        systems::movement::run(&mut self.mobs, &self.scenario.params);

        systems::spawning::run_power_core_regen(
            &mut self.power_core_spawn_bucket,
            &mut self.rng,
            &mut self.pending_spawns,
            &mut self.last_mobid,
            &mut self.status,
            &self.scenario.params,
        );

        systems::spawning::run(
            &mut self.mobs,
            &mut self.pending_spawns,
            &mut self.last_mobid,
            &mut self.status,
        );

        systems::collision::run(
            &mut self.mobs,
            &mut self.pending_spawns,
            &mut self.last_mobid,
            &mut self.status,
            &self.scenario.params,
        );

        // Materialize queued spawns only after collisions.
        self.mobs.append(&mut self.pending_spawns);

        systems::scanning::run(&mut self.mobs, &mut self.status);

        systems::liveness::run(&mut self.mobs, &mut self.status, &self.scenario.params);
    }

    /// Pinned view of the mob array. Holding it statically prevents the
    /// battle from advancing (which needs `&mut self`).
    pub fn mobs(&self) -> &[Mob] {
        &self.mobs
    }

    /// Pinned view of the battle status.
    pub fn status(&self) -> &BattleStatus {
        &self.status
    }

    pub fn scenario(&self) -> &BattleScenario {
        &self.scenario
    }

    pub fn finished(&self) -> bool {
        self.status.finished
    }

    /// Place a mob directly into the world (test setup only).
    #[cfg(test)]
    pub(crate) fn place_mob(
        &mut self,
        mob_type: MobType,
        player_id: PlayerId,
        pos: Point,
    ) -> MobId {
        self.last_mobid += 1;
        let mut mob = Mob::new(self.last_mobid, mob_type, player_id, pos);
        mob.birth_tick = self.status.tick;
        self.mobs.push(mob);
        self.last_mobid
    }

    #[cfg(test)]
    pub(crate) fn mobs_mut(&mut self) -> &mut Vec<Mob> {
        &mut self.mobs
    }
}

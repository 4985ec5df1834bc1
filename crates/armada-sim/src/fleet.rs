//! Fleet dispatch: masked per-player views, controller callbacks, and
//! command write-back.
//!
//! This is the only layer where field masking and coordinate clamping
//! happen. Controllers never see the raw world vector; they work on copies
//! in their `mobs` and `sensors` sets, and the battle only ever reads
//! commands back through here.

use armada_core::mob::{Mob, MobId};
use armada_core::rng::SimRng;
use armada_core::scenario::{
    BattleParams, BattleScenario, BattleStatus, FleetAiType, PlayerId, PLAYER_ID_NEUTRAL,
};
use armada_fleets::{controllers, FleetAI, FleetController};

pub struct Fleet {
    params: BattleParams,
    ais: Vec<FleetAI>,
    controllers: Vec<Box<dyn FleetController>>,
}

impl Fleet {
    /// Build one AI block and controller per player. Each controller gets
    /// its own seed stream derived from the fleet seed.
    pub fn new(scenario: &BattleScenario, seed: u64) -> Fleet {
        let num_players = scenario.params.num_players as usize;
        assert!(num_players >= 3, "need neutral plus at least two fleets");
        assert_eq!(scenario.players.len(), num_players);

        let mut rng = SimRng::new(seed);
        let mut ais = Vec::with_capacity(num_players);
        let mut ctrls: Vec<Box<dyn FleetController>> = Vec::with_capacity(num_players);

        for (i, player) in scenario.players.iter().enumerate() {
            assert_eq!(
                player.ai_type == FleetAiType::Neutral,
                i == PLAYER_ID_NEUTRAL as usize,
                "exactly the first player is neutral"
            );

            let sub_seed = rng.uint64();
            let mut ai = FleetAI::new(
                i as PlayerId,
                scenario.params.clone(),
                player.clone(),
                sub_seed,
            );
            let ctrl = controllers::create(&mut ai);
            ais.push(ai);
            ctrls.push(ctrl);
        }

        Fleet {
            params: scenario.params.clone(),
            ais,
            controllers: ctrls,
        }
    }

    /// Run one AI dispatch pass over the authoritative mob array.
    pub fn run_tick(&mut self, status: &BattleStatus, mobs: &mut [Mob]) {
        let num_ais = self.ais.len();

        // Reset scratch sets with enough capacity that partitioning never
        // reallocates mid-loop.
        for (i, ai) in self.ais.iter_mut().enumerate() {
            ai.mobs.clear();
            ai.sensors.clear();
            ai.mobs.reserve(mobs.len());
            ai.sensors.reserve(mobs.len());
            ai.credits = status.players[i].credits;
            ai.tick = status.tick;
        }

        // Partition and mask the incoming mobs by player.
        for mob in mobs.iter() {
            debug_assert!(mob.check_invariants());
            let p = mob.player_id;
            debug_assert!((p as usize) < num_ais);

            if p != PLAYER_ID_NEUTRAL {
                self.ais[p as usize].mobs.insert(mob.masked_for_ai());
            }

            if !mob.scanned_by.is_empty() {
                for scanner in mob.scanned_by.players() {
                    if (scanner as usize) < num_ais {
                        self.ais[scanner as usize]
                            .sensors
                            .insert(mob.masked_for_sensor());
                    }
                }
            }
        }

        // Run the controllers.
        for (ai, ctrl) in self.ais.iter_mut().zip(self.controllers.iter_mut()) {
            run_ai_tick(ai, ctrl.as_mut(), status.tick);
        }

        // Write the commands back to the authoritative mob array,
        // normalizing anything a controller shouldn't be able to do.
        for mob in mobs.iter_mut() {
            if !mob.alive {
                mob.cmd.spawn_type = None;
                continue;
            }
            let p = mob.player_id;
            if p == PLAYER_ID_NEUTRAL {
                continue;
            }
            if let Some(masked) = self.ais[p as usize].mobs.get(mob.mobid) {
                debug_assert_eq!(masked.mobid, mob.mobid);
                let mut cmd = masked.cmd;
                cmd.target.clamp(self.params.width, self.params.height);
                if let Some(spawn_type) = cmd.spawn_type {
                    if mob.mob_type.spawnable_child() != Some(spawn_type) {
                        cmd.spawn_type = None;
                    }
                }
                mob.cmd = cmd;
            }
        }
    }
}

fn run_ai_tick(ai: &mut FleetAI, ctrl: &mut dyn FleetController, tick: u32) {
    // Births first, so run_tick already sees the per-mob state.
    {
        let FleetAI {
            mobs, mob_state, ..
        } = ai;
        for mob in mobs.iter() {
            if mob.birth_tick == tick {
                if let Some(handle) = ctrl.mob_spawned(mob) {
                    mob_state.insert(mob.mobid, handle);
                }
            }
        }
    }

    ctrl.run_tick(ai);

    // Deaths last: hand back the arena state and drop the mob from the set.
    let dead: Vec<MobId> = ai
        .mobs
        .iter()
        .filter(|m| !m.alive)
        .map(|m| m.mobid)
        .collect();
    for mobid in dead {
        let state = ai.mob_state.remove(mobid);
        if let Some(mob) = ai.mobs.remove(mobid) {
            ctrl.mob_destroyed(&mob, state);
        }
    }
}

impl Drop for Fleet {
    /// Mobs still alive at battle teardown get their destruction callback,
    /// so controllers can free per-mob state unconditionally.
    fn drop(&mut self) {
        for (ai, ctrl) in self.ais.iter_mut().zip(self.controllers.iter_mut()) {
            let ids: Vec<MobId> = ai.mobs.iter().map(|m| m.mobid).collect();
            for mobid in ids {
                let state = ai.mob_state.remove(mobid);
                if let Some(mob) = ai.mobs.remove(mobid) {
                    ctrl.mob_destroyed(&mob, state);
                }
            }
        }
    }
}

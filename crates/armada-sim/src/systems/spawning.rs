//! Spawn queueing: controller spawn requests and neutral power-core drops.
//!
//! Queued mobs materialize at the end of the tick, after collisions.

use armada_core::mob::{Mob, MobId, MobType};
use armada_core::rng::SimRng;
use armada_core::scenario::{BattleParams, BattleStatus, PlayerId, PLAYER_ID_NEUTRAL};
use armada_core::types::Point;

/// Append a mob to the pending-spawn vector and count it.
pub fn queue_spawn<'a>(
    pending: &'a mut Vec<Mob>,
    last_mobid: &mut MobId,
    status: &mut BattleStatus,
    parent: Option<MobId>,
    mob_type: MobType,
    player_id: PlayerId,
    pos: Point,
) -> &'a mut Mob {
    *last_mobid += 1;
    let mut spawn = Mob::new(*last_mobid, mob_type, player_id, pos);
    spawn.birth_tick = status.tick;
    spawn.parent_mobid = parent;

    status.spawns += 1;
    if mob_type.is_ship() {
        status.ship_spawns += 1;
    }

    pending.push(spawn);
    pending.last_mut().unwrap()
}

/// Process controller spawn requests for every live base and fighter.
///
/// The recharge counter only runs down while a mob is actively requesting
/// an affordable spawn; a request it cannot pay for is skipped outright.
/// Requests are consumed whether or not they succeed.
pub fn run(
    mobs: &mut [Mob],
    pending: &mut Vec<Mob>,
    last_mobid: &mut MobId,
    status: &mut BattleStatus,
) {
    for mob in mobs.iter_mut() {
        let Some(spawn_type) = mob.cmd.spawn_type.take() else {
            continue;
        };
        if !mob.alive {
            continue;
        }

        // The dispatch layer drops illegal requests before they get here.
        debug_assert_eq!(mob.mob_type.spawnable_child(), Some(spawn_type));

        let cost = spawn_type.cost();
        let player = &mut status.players[mob.player_id as usize];
        if player.credits < cost {
            continue;
        }
        if mob.recharge_time > 0 {
            mob.recharge_time -= 1;
            continue;
        }

        player.credits -= cost;
        let spawn = queue_spawn(
            pending,
            last_mobid,
            status,
            Some(mob.mobid),
            spawn_type,
            mob.player_id,
            mob.pos,
        );
        spawn.cmd.target = mob.cmd.target;
        mob.recharge_time = mob.mob_type.recharge_ticks();
        mob.last_spawn_tick = status.tick;
    }
}

/// Accumulate the power-core bucket and queue neutral cores while it holds
/// at least one minimum-value core.
pub fn run_power_core_regen(
    bucket: &mut f32,
    rng: &mut SimRng,
    pending: &mut Vec<Mob>,
    last_mobid: &mut MobId,
    status: &mut BattleStatus,
    params: &BattleParams,
) {
    *bucket += params.power_core_spawn_rate;
    while *bucket > params.min_power_core_spawn as f32 {
        let credits = rng.int(params.min_power_core_spawn, params.max_power_core_spawn);
        *bucket -= credits as f32;

        let pos = Point::new(
            rng.float(0.0, params.width),
            rng.float(0.0, params.height),
        );
        let spawn = queue_spawn(
            pending,
            last_mobid,
            status,
            None,
            MobType::PowerCore,
            PLAYER_ID_NEUTRAL,
            pos,
        );
        spawn.power_core_credits = credits;
    }
}

//! Collision resolution: ammo versus ships, by bounding-circle overlap.
//!
//! Ships (any liveness) are gathered into lane-aligned scratch blocks; each
//! live ammo mob then runs the batched 8-lane circle kernel over the block
//! with a scalar remainder. Power cores collide with any ship; other ammo
//! never collides with its own player.

use armada_core::mob::{Mob, MobId, MobType};
use armada_core::scenario::{BattleParams, BattleStatus, PLAYER_ID_NEUTRAL};
use armada_core::types::{circle_intersect_batch, LANES};

use super::spawning::queue_spawn;

/// Ships gathered per scratch block.
const BATCH: usize = 256;

pub fn run(
    mobs: &mut [Mob],
    pending: &mut Vec<Mob>,
    last_mobid: &mut MobId,
    status: &mut BattleStatus,
    params: &BattleParams,
) {
    let size = mobs.len();
    let mut i = 0;

    while i < size {
        let mut xs = [0.0f32; BATCH];
        let mut ys = [0.0f32; BATCH];
        let mut rs = [0.0f32; BATCH];
        let mut idx = [0usize; BATCH];
        let mut n = 0;

        while n < BATCH && i < size {
            let ship = &mobs[i];
            if !ship.is_ammo() {
                xs[n] = ship.pos.x;
                ys[n] = ship.pos.y;
                rs[n] = ship.mob_type.radius();
                idx[n] = i;
                n += 1;
            }
            i += 1;
        }

        for outer in 0..size {
            if !mobs[outer].is_ammo() || !mobs[outer].alive {
                continue;
            }
            collide_batch(
                mobs, outer, &xs, &ys, &rs, &idx, n, pending, last_mobid, status, params,
            );
        }
    }
}

/// Run one ammo mob against a gathered ship block.
#[allow(clippy::too_many_arguments)]
fn collide_batch(
    mobs: &mut [Mob],
    outer: usize,
    xs: &[f32; BATCH],
    ys: &[f32; BATCH],
    rs: &[f32; BATCH],
    idx: &[usize; BATCH],
    n: usize,
    pending: &mut Vec<Mob>,
    last_mobid: &mut MobId,
    status: &mut BattleStatus,
    params: &BattleParams,
) {
    let oc = mobs[outer].circle();
    let o_type = mobs[outer].mob_type;
    let o_player = mobs[outer].player_id;

    let mut inner = 0;
    while inner + LANES < n {
        let lx: [f32; LANES] = xs[inner..inner + LANES].try_into().unwrap();
        let ly: [f32; LANES] = ys[inner..inner + LANES].try_into().unwrap();
        let lr: [f32; LANES] = rs[inner..inner + LANES].try_into().unwrap();
        let mask = circle_intersect_batch(&oc, &lx, &ly, &lr);

        for lane in 0..LANES {
            if mask & (1 << lane) == 0 {
                continue;
            }
            let target = idx[inner + lane];
            if mobs[target].alive
                && (o_type == MobType::PowerCore || o_player != mobs[target].player_id)
            {
                run_mob_collision(mobs, outer, target, pending, last_mobid, status, params);
                if !mobs[outer].alive {
                    // A dead outer mob can't collide with anything else.
                    return;
                }
            }
        }

        inner += LANES;
    }

    while inner < n {
        let target = idx[inner];
        if check_mob_collision(&mobs[outer], &mobs[target]) {
            run_mob_collision(mobs, outer, target, pending, last_mobid, status, params);
            if !mobs[outer].alive {
                return;
            }
        }
        inner += 1;
    }
}

/// Scalar collision test; must agree with the batched path exactly.
fn check_mob_collision(ammo: &Mob, ship: &Mob) -> bool {
    debug_assert!(ammo.is_ammo());
    debug_assert!(!ship.is_ammo());
    debug_assert!(ammo.alive);

    if ammo.mob_type != MobType::PowerCore && ammo.player_id == ship.player_id {
        // Players generally don't collide with themselves.
        return false;
    }
    if !ship.alive {
        return false;
    }
    ammo.circle().intersects(&ship.circle())
}

/// Credits a dying mob drops as a neutral power core; zero for ammo.
fn power_core_drop_credits(mob: &Mob, params: &BattleParams) -> i32 {
    if mob.is_ammo() {
        return 0;
    }
    (params.power_core_drop_rate * mob.mob_type.cost() as f32) as i32
}

fn run_mob_collision(
    mobs: &mut [Mob],
    outer: usize,
    inner: usize,
    pending: &mut Vec<Mob>,
    last_mobid: &mut MobId,
    status: &mut BattleStatus,
    params: &BattleParams,
) {
    status.collisions += 1;

    let (o_mob, i_mob) = pair_mut(mobs, outer, inner);

    if o_mob.mob_type == MobType::PowerCore {
        debug_assert_ne!(i_mob.mob_type, MobType::PowerCore);
        status.players[i_mob.player_id as usize].credits += o_mob.power_core_credits;
        o_mob.alive = false;
        return;
    }

    o_mob.health -= i_mob.mob_type.max_health();
    i_mob.health -= o_mob.mob_type.max_health();

    for mob in [o_mob, i_mob] {
        if mob.health <= 0 && mob.alive {
            mob.alive = false;
            let credits = power_core_drop_credits(mob, params);
            if credits > 0 {
                let spawn = queue_spawn(
                    pending,
                    last_mobid,
                    status,
                    Some(mob.mobid),
                    MobType::PowerCore,
                    PLAYER_ID_NEUTRAL,
                    mob.pos,
                );
                spawn.power_core_credits = credits;
            }
        }
    }
}

/// Disjoint mutable borrows of two mobs by index.
fn pair_mut(mobs: &mut [Mob], a: usize, b: usize) -> (&mut Mob, &mut Mob) {
    assert_ne!(a, b);
    if a < b {
        let (left, right) = mobs.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = mobs.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

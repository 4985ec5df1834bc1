//! Sensor scanning: each scanner stamps its player bit on everything its
//! sensor circle touches.
//!
//! Targets include every mob in the block arrays regardless of liveness or
//! ownership, so a dead mob is still visible during its grace tick. After
//! the pass each mob drops its own owner's bit so no player ever scans
//! itself; the dispatch layer doesn't have to check for it.

use armada_core::mob::{Mob, MobType};
use armada_core::scenario::{BattleStatus, PLAYER_ID_NEUTRAL};
use armada_core::types::{circle_intersect_batch, LANES};

/// Targets gathered per scratch block.
const BATCH: usize = 256;

pub fn run(mobs: &mut [Mob], status: &mut BattleStatus) {
    let size = mobs.len();
    let mut i = 0;

    while i < size {
        let mut xs = [0.0f32; BATCH];
        let mut ys = [0.0f32; BATCH];
        let mut rs = [0.0f32; BATCH];
        let start = i;
        let mut n = 0;

        while n < BATCH && i < size {
            xs[n] = mobs[i].pos.x;
            ys[n] = mobs[i].pos.y;
            rs[n] = mobs[i].mob_type.radius();
            i += 1;
            n += 1;
        }

        for outer in 0..size {
            if !can_mob_scan(&mobs[outer]) {
                continue;
            }
            scan_batch(mobs, outer, &xs, &ys, &rs, start, n, status);
        }
    }

    for mob in mobs.iter_mut() {
        mob.scanned_by.reset(mob.player_id);
    }
}

/// Is this mob allowed to scan anything?
fn can_mob_scan(mob: &Mob) -> bool {
    if mob.mob_type == MobType::PowerCore {
        debug_assert_eq!(MobType::PowerCore.sensor_radius(), 0.0);
        return false;
    }
    debug_assert_ne!(mob.player_id, PLAYER_ID_NEUTRAL);
    mob.alive
}

#[allow(clippy::too_many_arguments)]
fn scan_batch(
    mobs: &mut [Mob],
    outer: usize,
    xs: &[f32; BATCH],
    ys: &[f32; BATCH],
    rs: &[f32; BATCH],
    start: usize,
    n: usize,
    status: &mut BattleStatus,
) {
    let sc = mobs[outer].sensor_circle();
    let o_player = mobs[outer].player_id;

    let mut inner = 0;
    while inner + LANES < n {
        let lx: [f32; LANES] = xs[inner..inner + LANES].try_into().unwrap();
        let ly: [f32; LANES] = ys[inner..inner + LANES].try_into().unwrap();
        let lr: [f32; LANES] = rs[inner..inner + LANES].try_into().unwrap();
        let mask = circle_intersect_batch(&sc, &lx, &ly, &lr);

        for lane in 0..LANES {
            if mask & (1 << lane) != 0 {
                let target = &mut mobs[start + inner + lane];
                target.scanned_by.set(o_player);
                status.sensor_contacts += 1;
            }
        }

        inner += LANES;
    }

    while inner < n {
        let target = &mut mobs[start + inner];
        if sc.intersects(&target.circle()) {
            target.scanned_by.set(o_player);
            status.sensor_contacts += 1;
        }
        inner += 1;
    }
}

//! Physics phase: fuel burn and motion toward command targets.
//!
//! Clears each mob's scan bits for the new tick, kills fuel-limited mobs
//! that run dry, then moves every live mob toward its target by at most its
//! type speed. Neutral mobs (power cores) never move.

use armada_core::constants::MICRON;
use armada_core::mob::{Mob, MobType};
use armada_core::scenario::{BattleParams, PLAYER_ID_NEUTRAL};

pub fn run(mobs: &mut [Mob], params: &BattleParams) {
    for mob in mobs.iter_mut() {
        debug_assert!(check_mob_invariants(mob, params));

        mob.scanned_by.clear();

        if mob.alive
            && matches!(mob.mob_type, MobType::Missile | MobType::PowerCore)
        {
            mob.fuel -= 1;
            if mob.fuel <= 0 {
                mob.alive = false;
            }
        }

        if mob.alive {
            move_mob(mob);
        }
    }
}

fn move_mob(mob: &mut Mob) {
    if mob.player_id == PLAYER_ID_NEUTRAL {
        // The neutral player never moves today.
        debug_assert_eq!(mob.mob_type, MobType::PowerCore);
        return;
    }

    let speed = mob.mob_type.speed();
    mob.last_pos = mob.pos;
    mob.pos.move_toward(&mob.cmd.target, speed);
    debug_assert!(mob.last_pos.distance_to(&mob.pos) <= speed + MICRON);
}

/// Tick-boundary invariants: position and target inside the playfield.
pub fn check_mob_invariants(mob: &Mob, params: &BattleParams) -> bool {
    assert!(mob.check_invariants());
    assert!(mob.pos.x >= 0.0 && mob.pos.x <= params.width);
    assert!(mob.pos.y >= 0.0 && mob.pos.y <= params.height);
    assert!(mob.cmd.target.x >= 0.0 && mob.cmd.target.x <= params.width);
    assert!(mob.cmd.target.y >= 0.0 && mob.cmd.target.y <= params.height);
    true
}

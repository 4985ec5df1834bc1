//! Removal, player liveness, payout, and victory.
//!
//! Dead mobs linger one tick (so controllers see the death) and are
//! swap-removed the tick after. Player liveness is recomputed from scratch:
//! with `base_victory` a player lives only through its bases, otherwise
//! through any non-core mob.

use armada_core::mob::{Mob, MobType};
use armada_core::scenario::{BattleParams, BattleStatus};

pub fn run(mobs: &mut Vec<Mob>, status: &mut BattleStatus, params: &BattleParams) {
    for player in status.players.iter_mut() {
        player.alive = false;
        player.num_mobs = 0;
    }

    let mut i = 0;
    while i < mobs.len() {
        let mob = &mut mobs[i];
        if mob.alive {
            let player = &mut status.players[mob.player_id as usize];
            player.num_mobs += 1;

            if (mob.mob_type != MobType::PowerCore && !params.base_victory)
                || mob.mob_type == MobType::Base
            {
                player.alive = true;
            }
            i += 1;
        } else if mob.remove_mob {
            mobs.swap_remove(i);
            // Redo the current index: a new mob just moved into it.
        } else {
            // Keep the mob around for one tick after it dies so the
            // fleet AIs can see that it died.
            mob.remove_mob = true;
            i += 1;
        }
    }

    // Check for victory, pay the players.
    let mut live_players = 0u32;
    for player in status.players.iter_mut() {
        if player.alive {
            live_players += 1;
            player.credits += params.credits_per_tick;
        }
    }

    if live_players <= 1 {
        status.finished = true;
        for (i, player) in status.players.iter().enumerate() {
            if player.alive {
                status.winner = i as u8;
                status.winner_uid = player.player_uid;
            }
        }
    }

    if status.tick >= params.tick_limit {
        status.finished = true;
    }
}

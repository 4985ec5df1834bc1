//! Tests for the battle engine: determinism, tick-loop semantics,
//! collisions, scanning, and victory.

use armada_core::constants::*;
use armada_core::mob::{Mob, MobType};
use armada_core::scenario::*;
use armada_core::types::Point;

use crate::battle::Battle;
use crate::systems;

fn make_scenario(ai1: FleetAiType, ai2: FleetAiType, mut params: BattleParams) -> BattleScenario {
    let mut players = vec![
        BattlePlayer::new(FleetAiType::Neutral),
        BattlePlayer::new(ai1),
        BattlePlayer::new(ai2),
    ];
    players[0].player_type = PlayerType::Neutral;
    for (i, p) in players.iter_mut().enumerate() {
        p.player_uid = i as PlayerUid;
        if i > 0 {
            p.player_type = PlayerType::Control;
        }
    }
    params.num_players = players.len() as u32;
    BattleScenario { params, players }
}

/// Small, busy scenario: two real fleets with starting fighters.
fn skirmish_params(tick_limit: u32) -> BattleParams {
    BattleParams {
        width: 400.0,
        height: 300.0,
        tick_limit,
        starting_fighters: 2,
        restricted_start: false,
        ..BattleParams::default()
    }
}

/// Bare status block for driving systems directly.
fn empty_status(num_players: u32, tick: u32) -> BattleStatus {
    BattleStatus {
        tick,
        finished: false,
        num_players,
        winner: PLAYER_ID_NEUTRAL,
        winner_uid: PLAYER_UID_NEUTRAL,
        players: vec![PlayerStatus::default(); num_players as usize],
        collisions: 0,
        sensor_contacts: 0,
        spawns: 0,
        ship_spawns: 0,
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let scenario = make_scenario(
        FleetAiType::Simple,
        FleetAiType::Fighter,
        skirmish_params(300),
    );
    let mut battle_a = Battle::new(scenario.clone(), 0xfeed);
    let mut battle_b = Battle::new(scenario, 0xfeed);

    for _ in 0..300 {
        battle_a.run_tick();
        battle_b.run_tick();

        let status_a = serde_json::to_string(battle_a.status()).unwrap();
        let status_b = serde_json::to_string(battle_b.status()).unwrap();
        assert_eq!(status_a, status_b, "status diverged with same seed");

        let mobs_a = serde_json::to_string(battle_a.mobs()).unwrap();
        let mobs_b = serde_json::to_string(battle_b.mobs()).unwrap();
        assert_eq!(mobs_a, mobs_b, "mobs diverged with same seed");

        if battle_a.finished() {
            break;
        }
    }
}

#[test]
fn test_determinism_different_seeds() {
    let scenario = make_scenario(
        FleetAiType::Simple,
        FleetAiType::Fighter,
        skirmish_params(300),
    );
    let mut battle_a = Battle::new(scenario.clone(), 111);
    let mut battle_b = Battle::new(scenario, 222);

    let mut diverged = false;
    for _ in 0..300 {
        battle_a.run_tick();
        battle_b.run_tick();
        if serde_json::to_string(battle_a.mobs()).unwrap()
            != serde_json::to_string(battle_b.mobs()).unwrap()
        {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "different seeds should produce divergent battles");
}

// ---- End-to-end scenarios ----

#[test]
fn test_two_dummy_fleets_tick_limit() {
    let params = BattleParams {
        width: 200.0,
        height: 200.0,
        starting_bases: 1,
        starting_fighters: 0,
        tick_limit: 10,
        credits_per_tick: 0,
        power_core_spawn_rate: 0.0,
        ..BattleParams::default()
    };
    let scenario = make_scenario(FleetAiType::Dummy, FleetAiType::Dummy, params);
    let mut battle = Battle::new(scenario, 0x1);

    while !battle.finished() {
        battle.run_tick();
    }

    let status = battle.status();
    assert_eq!(status.tick, 10);
    assert!(status.finished);
    assert_eq!(status.winner, PLAYER_ID_NEUTRAL, "tick limit means a draw");
    assert!(status.players[1].alive);
    assert!(status.players[2].alive);
    assert_eq!(status.collisions, 0, "bases alone can't collide");
}

#[test]
fn test_power_core_drop_on_fighter_kill() {
    // One fighter, one enemy missile on top of it, full drop rate.
    let params = BattleParams {
        power_core_drop_rate: 1.0,
        num_players: 3,
        ..BattleParams::default()
    };
    let mut status = empty_status(3, 1);

    let fighter = Mob::new(1, MobType::Fighter, 1, Point::new(100.0, 100.0));
    let missile = Mob::new(2, MobType::Missile, 2, Point::new(100.0, 100.0));
    assert!(MISSILE_MAX_HEALTH >= FIGHTER_MAX_HEALTH);

    let mut mobs = vec![fighter, missile];
    let mut pending = Vec::new();
    let mut last_mobid = 2;

    systems::collision::run(&mut mobs, &mut pending, &mut last_mobid, &mut status, &params);

    assert!(!mobs[0].alive, "fighter should die");
    assert!(!mobs[1].alive, "missile should die");
    assert_eq!(status.collisions, 1);

    assert_eq!(pending.len(), 1, "only the fighter drops a core");
    let core = &pending[0];
    assert_eq!(core.mob_type, MobType::PowerCore);
    assert_eq!(core.player_id, PLAYER_ID_NEUTRAL);
    assert_eq!(core.pos, Point::new(100.0, 100.0));
    assert_eq!(core.power_core_credits, MobType::Fighter.cost());
}

#[test]
fn test_scanning_consistency() {
    let params = BattleParams {
        starting_bases: 0,
        starting_fighters: 0,
        power_core_spawn_rate: 0.0,
        tick_limit: 100,
        ..BattleParams::default()
    };
    let scenario = make_scenario(FleetAiType::Dummy, FleetAiType::Dummy, params);
    let mut battle = Battle::new(scenario, 0x5ca);

    let fighter = battle.place_mob(MobType::Fighter, 1, Point::new(100.0, 100.0));
    let base = battle.place_mob(
        MobType::Base,
        2,
        Point::new(100.0, 100.0 + FIGHTER_SENSOR_RADIUS - 1.0),
    );

    battle.run_tick();

    let mobs = battle.mobs();
    let fighter = mobs.iter().find(|m| m.mobid == fighter).unwrap();
    let base = mobs.iter().find(|m| m.mobid == base).unwrap();

    assert!(base.scanned_by.get(1), "fighter should see the base");
    assert!(fighter.scanned_by.get(2), "base should see the fighter");
    assert!(!base.scanned_by.get(2), "no mob scans its own player");
    assert!(!fighter.scanned_by.get(1), "no mob scans its own player");
    assert!(battle.status().sensor_contacts > 0);
}

#[test]
fn test_victory_by_last_player_alive() {
    let params = BattleParams {
        starting_bases: 1,
        starting_fighters: 0,
        base_victory: true,
        power_core_spawn_rate: 0.0,
        tick_limit: 1000,
        ..BattleParams::default()
    };
    let scenario = make_scenario(FleetAiType::Dummy, FleetAiType::Dummy, params);
    let mut battle = Battle::new(scenario, 0x7);

    battle.run_tick();
    assert!(!battle.finished());

    // Kill player 2's only base mid-battle.
    for mob in battle.mobs_mut().iter_mut() {
        if mob.player_id == 2 {
            mob.alive = false;
        }
    }

    battle.run_tick();
    let status = battle.status();
    assert!(status.finished);
    assert_eq!(status.winner, 1);
    assert_eq!(status.winner_uid, 1);
    assert!(status.players[1].alive);
    assert!(!status.players[2].alive);
}

#[test]
fn test_dead_mob_lingers_one_tick() {
    let params = BattleParams {
        starting_bases: 1,
        starting_fighters: 0,
        power_core_spawn_rate: 0.0,
        tick_limit: 1000,
        ..BattleParams::default()
    };
    let scenario = make_scenario(FleetAiType::Dummy, FleetAiType::Dummy, params);
    let mut battle = Battle::new(scenario, 0x11);

    let victim = battle.place_mob(MobType::Fighter, 1, Point::new(50.0, 50.0));
    battle.run_tick();

    battle
        .mobs_mut()
        .iter_mut()
        .find(|m| m.mobid == victim)
        .unwrap()
        .alive = false;

    // Tick t: the corpse is still visible, marked for removal.
    battle.run_tick();
    let corpse = battle.mobs().iter().find(|m| m.mobid == victim);
    assert!(corpse.is_some_and(|m| !m.alive), "corpse lingers one tick");

    // Tick t+1: gone.
    battle.run_tick();
    assert!(battle.mobs().iter().all(|m| m.mobid != victim));
}

// ---- Engine invariants over a real battle ----

#[test]
fn test_invariants_over_full_battle() {
    let scenario = make_scenario(
        FleetAiType::Simple,
        FleetAiType::Fighter,
        skirmish_params(2000),
    );
    let mut battle = Battle::new(scenario, 0xabcdef);

    while !battle.finished() {
        battle.run_tick();

        let params = &battle.scenario().params;
        for mob in battle.mobs() {
            if mob.alive {
                assert!(mob.pos.x >= 0.0 && mob.pos.x <= params.width);
                assert!(mob.pos.y >= 0.0 && mob.pos.y <= params.height);
                if mob.is_ammo() {
                    assert!(mob.fuel >= 0, "live ammo never has negative fuel");
                }
            }
        }
        for player in &battle.status().players {
            assert!(player.credits >= 0, "credits never go negative");
        }
    }

    // Winner is neutral or one of the players alive at the finish.
    let status = battle.status();
    if status.winner != PLAYER_ID_NEUTRAL {
        assert!(status.players[status.winner as usize].alive);
    } else if status.tick >= battle.scenario().params.tick_limit {
        // Timeout draws never crown a winner.
        assert_eq!(status.winner_uid, PLAYER_UID_NEUTRAL);
    }
}

#[test]
fn test_battles_make_progress() {
    // A real matchup produces spawns and sensor contacts.
    let scenario = make_scenario(
        FleetAiType::Simple,
        FleetAiType::Fighter,
        skirmish_params(500),
    );
    let mut battle = Battle::new(scenario, 0x51);
    for _ in 0..500 {
        battle.run_tick();
        if battle.finished() {
            break;
        }
    }
    let status = battle.status();
    assert!(status.spawns > 0, "power cores or ships should have spawned");
    assert!(status.sensor_contacts > 0);
}

#[test]
fn test_restricted_start_separates_players() {
    let params = BattleParams {
        starting_bases: 1,
        starting_fighters: 10,
        restricted_start: true,
        ..BattleParams::default()
    };
    let scenario = make_scenario(FleetAiType::Dummy, FleetAiType::Dummy, params);
    let battle = Battle::new(scenario, 0x9);

    let slot_w = battle.scenario().params.width / 2.0;
    for player in [1u8, 2u8] {
        let xs: Vec<f32> = battle
            .mobs()
            .iter()
            .filter(|m| m.player_id == player)
            .map(|m| m.pos.x)
            .collect();
        assert_eq!(xs.len(), 11);
        let strip = (xs[0] / slot_w).floor();
        for x in &xs {
            assert_eq!(
                (x / slot_w).floor(),
                strip,
                "player {player} mobs must share one strip"
            );
        }
    }
    // The two players get different strips.
    let strip_of = |player: u8| {
        let m = battle.mobs().iter().find(|m| m.player_id == player).unwrap();
        (m.pos.x / slot_w).floor()
    };
    assert_ne!(strip_of(1), strip_of(2));
}

// ---- Economy ----

#[test]
fn test_spawn_debits_credits_and_respects_recharge() {
    let mut status = empty_status(3, 5);
    status.players[1].credits = FIGHTER_COST + 10;

    let mut base = Mob::new(1, MobType::Base, 1, Point::new(10.0, 10.0));
    base.cmd.spawn_type = Some(MobType::Fighter);
    base.cmd.target = Point::new(90.0, 90.0);
    let mut mobs = vec![base];
    let mut pending = Vec::new();
    let mut last_mobid = 1;

    systems::spawning::run(&mut mobs, &mut pending, &mut last_mobid, &mut status);

    assert_eq!(status.players[1].credits, 10);
    assert_eq!(status.spawns, 1);
    assert_eq!(status.ship_spawns, 1);
    assert_eq!(pending.len(), 1);
    let child = &pending[0];
    assert_eq!(child.mob_type, MobType::Fighter);
    assert_eq!(child.parent_mobid, Some(1));
    assert_eq!(child.birth_tick, 5);
    assert_eq!(child.cmd.target, Point::new(90.0, 90.0), "child inherits target");
    assert_eq!(mobs[0].recharge_time, BASE_RECHARGE_TICKS);
    assert_eq!(mobs[0].last_spawn_tick, 5);
    assert_eq!(mobs[0].cmd.spawn_type, None, "request is consumed");

    // Recharging: the request burns one recharge tick, spawns nothing.
    mobs[0].cmd.spawn_type = Some(MobType::Fighter);
    status.players[1].credits = FIGHTER_COST;
    systems::spawning::run(&mut mobs, &mut pending, &mut last_mobid, &mut status);
    assert_eq!(pending.len(), 1);
    assert_eq!(mobs[0].recharge_time, BASE_RECHARGE_TICKS - 1);
    assert_eq!(status.players[1].credits, FIGHTER_COST);

    // Broke: the request is skipped and recharge does not run down.
    mobs[0].cmd.spawn_type = Some(MobType::Fighter);
    status.players[1].credits = FIGHTER_COST - 1;
    systems::spawning::run(&mut mobs, &mut pending, &mut last_mobid, &mut status);
    assert_eq!(pending.len(), 1);
    assert_eq!(mobs[0].recharge_time, BASE_RECHARGE_TICKS - 1);
}

#[test]
fn test_no_friendly_fire() {
    let params = BattleParams {
        num_players: 3,
        ..BattleParams::default()
    };
    let mut status = empty_status(3, 1);

    // A missile sitting on its own player's fighter never collides.
    let fighter = Mob::new(1, MobType::Fighter, 1, Point::new(100.0, 100.0));
    let missile = Mob::new(2, MobType::Missile, 1, Point::new(100.0, 100.0));

    let mut mobs = vec![fighter, missile];
    let mut pending = Vec::new();
    let mut last_mobid = 2;

    systems::collision::run(&mut mobs, &mut pending, &mut last_mobid, &mut status, &params);

    assert_eq!(status.collisions, 0);
    assert!(mobs[0].alive);
    assert!(mobs[1].alive);
}

#[test]
fn test_power_core_pickup_credits() {
    let params = BattleParams {
        num_players: 3,
        ..BattleParams::default()
    };
    let mut status = empty_status(3, 1);

    let fighter = Mob::new(1, MobType::Fighter, 1, Point::new(50.0, 50.0));
    let mut core = Mob::new(2, MobType::PowerCore, PLAYER_ID_NEUTRAL, Point::new(52.0, 50.0));
    core.power_core_credits = 17;

    let mut mobs = vec![fighter, core];
    let mut pending = Vec::new();
    let mut last_mobid = 2;

    systems::collision::run(&mut mobs, &mut pending, &mut last_mobid, &mut status, &params);

    assert_eq!(status.players[1].credits, 17);
    assert!(!mobs[1].alive, "collected core dies");
    assert!(mobs[0].alive, "cores never damage the collector");
    assert!(pending.is_empty());
}

#[test]
fn test_power_core_regen_bucket() {
    let params = BattleParams {
        power_core_spawn_rate: 25.0,
        min_power_core_spawn: 10,
        max_power_core_spawn: 20,
        num_players: 3,
        ..BattleParams::default()
    };
    let mut status = empty_status(3, 1);

    let mut rng = armada_core::rng::SimRng::new(0x42);
    let mut bucket = 0.0;
    let mut pending = Vec::new();
    let mut last_mobid = 0;

    systems::spawning::run_power_core_regen(
        &mut bucket,
        &mut rng,
        &mut pending,
        &mut last_mobid,
        &mut status,
        &params,
    );

    assert!(!pending.is_empty(), "a fat bucket must spawn cores");
    assert!(bucket <= params.min_power_core_spawn as f32);
    for core in &pending {
        assert_eq!(core.mob_type, MobType::PowerCore);
        assert_eq!(core.player_id, PLAYER_ID_NEUTRAL);
        assert!(core.power_core_credits >= params.min_power_core_spawn);
        assert!(core.power_core_credits <= params.max_power_core_spawn);
        assert!(core.pos.x >= 0.0 && core.pos.x <= params.width);
        assert!(core.pos.y >= 0.0 && core.pos.y <= params.height);
    }
}

// ---- Views ----

#[test]
fn test_views_nest_while_battle_is_pinned() {
    let scenario = make_scenario(
        FleetAiType::Dummy,
        FleetAiType::Dummy,
        skirmish_params(10),
    );
    let mut battle = Battle::new(scenario, 0x77);
    battle.run_tick();

    // Both views can be held together; the borrow checker guarantees the
    // battle can't advance until they are released.
    let mobs = battle.mobs();
    let status = battle.status();
    assert_eq!(
        status.players.iter().map(|p| p.num_mobs).sum::<u32>() as usize,
        mobs.iter().filter(|m| m.alive).count()
    );
    drop((mobs, status));

    battle.run_tick();
}

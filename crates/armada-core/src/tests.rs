//! Cross-module tests for scenario types and player roles.

use crate::mob::MobType;
use crate::registry::Registry;
use crate::scenario::*;

fn two_player_scenario() -> BattleScenario {
    let mut players = vec![
        BattlePlayer::new(FleetAiType::Neutral),
        BattlePlayer::new(FleetAiType::Simple),
        BattlePlayer::new(FleetAiType::Fighter),
    ];
    for (i, p) in players.iter_mut().enumerate() {
        p.player_uid = i as PlayerUid;
    }
    let mut params = BattleParams::default();
    params.num_players = players.len() as u32;
    BattleScenario { params, players }
}

#[test]
fn test_status_from_scenario() {
    let scenario = two_player_scenario();
    let status = BattleStatus::new(&scenario);

    assert_eq!(status.tick, 0);
    assert!(!status.finished);
    assert_eq!(status.num_players, 3);
    assert_eq!(status.winner, PLAYER_ID_NEUTRAL);
    assert_eq!(status.players.len(), 3);
    for p in &status.players {
        assert!(p.alive);
        assert_eq!(p.credits, scenario.params.starting_credits);
        assert_eq!(p.num_mobs, 0);
    }
}

#[test]
fn test_player_type_round_trip() {
    for t in [
        PlayerType::Invalid,
        PlayerType::Neutral,
        PlayerType::Control,
        PlayerType::Target,
    ] {
        assert_eq!(PlayerType::from_opt_str(Some(t.as_str())), t);
    }
    // A missing value maps to Invalid; an unknown one panics (see below).
    assert_eq!(PlayerType::from_opt_str(None), PlayerType::Invalid);
}

#[test]
#[should_panic(expected = "Unknown player type")]
fn test_player_type_unknown_string_panics() {
    let _ = PlayerType::from_opt_str(Some("Renegade"));
}

#[test]
fn test_fleet_ai_type_names() {
    for t in [
        FleetAiType::Neutral,
        FleetAiType::Dummy,
        FleetAiType::Simple,
        FleetAiType::Fighter,
    ] {
        assert_eq!(FleetAiType::from_name(t.name()), Some(t));
    }
    assert_eq!(FleetAiType::from_name("NoSuchFleet"), None);
    assert!(!FleetAiType::control_types().contains(&FleetAiType::Dummy));
    assert!(!FleetAiType::control_types().contains(&FleetAiType::Neutral));
}

#[test]
fn test_spawnable_children() {
    assert_eq!(MobType::Base.spawnable_child(), Some(MobType::Fighter));
    assert_eq!(MobType::Fighter.spawnable_child(), Some(MobType::Missile));
    assert_eq!(MobType::Missile.spawnable_child(), None);
    assert_eq!(MobType::PowerCore.spawnable_child(), None);
}

#[test]
fn test_default_params_match_default_scenario_file() {
    let params = BattleParams::default();
    let mut reg = Registry::new();
    reg.put("width", "1600");
    reg.put("height", "1200");
    reg.put("startingCredits", "1000");
    reg.put("creditsPerTick", "1");
    reg.put("tickLimit", "50000");
    reg.put("powerCoreDropRate", "0.25");
    reg.put("powerCoreSpawnRate", "2.0");
    reg.put("minPowerCoreSpawn", "10");
    reg.put("maxPowerCoreSpawn", "20");
    reg.put("restrictedStart", "TRUE");
    reg.put("startingBases", "1");
    reg.put("startingFighters", "0");

    assert_eq!(params.width, reg.get_float("width").unwrap());
    assert_eq!(params.height, reg.get_float("height").unwrap());
    assert_eq!(params.starting_credits as i64, reg.get_int("startingCredits").unwrap());
    assert_eq!(params.credits_per_tick as i64, reg.get_int("creditsPerTick").unwrap());
    assert_eq!(params.tick_limit as u64, reg.get_uint("tickLimit").unwrap());
    assert_eq!(params.power_core_drop_rate, reg.get_float("powerCoreDropRate").unwrap());
    assert_eq!(params.power_core_spawn_rate, reg.get_float("powerCoreSpawnRate").unwrap());
    assert_eq!(params.restricted_start, reg.get_bool("restrictedStart").unwrap());
    assert_eq!(params.starting_bases as u64, reg.get_uint("startingBases").unwrap());
    assert_eq!(params.starting_fighters as u64, reg.get_uint("startingFighters").unwrap());
}

//! Driver-level tests: mode construction and deterministic replay across
//! worker-thread counts.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use clap::Parser;

use armada_core::scenario::*;

use crate::driver::Driver;
use crate::opts::Opts;
use crate::worker::{self, BattleWorkUnit, DriverShared, WorkUnit};

fn opts_from(args: &[&str]) -> Opts {
    let mut argv = vec!["armada"];
    argv.extend_from_slice(args);
    Opts::parse_from(argv)
}

#[test]
fn test_single_combat_mode() {
    let driver = Driver::new(opts_from(&["--seed", "7"])).unwrap();

    let players = driver.players();
    assert_eq!(players.len(), 3);
    assert_eq!(players[0].ai_type, FleetAiType::Neutral);
    assert_eq!(players[0].player_type, PlayerType::Neutral);
    for (i, p) in players.iter().enumerate() {
        assert_eq!(p.player_uid, i as u32);
        assert!(!p.player_name.is_empty());
    }

    let scenarios = driver.scenarios();
    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0].params.num_players, 3);
}

#[test]
fn test_tournament_mode_pairs_every_fleet() {
    let driver = Driver::new(opts_from(&["--tournament", "--seed", "7"])).unwrap();

    let controls = FleetAiType::control_types().len();
    // Every ordered non-neutral pair gets a battle.
    assert_eq!(driver.scenarios().len(), controls * (controls - 1));
    for sc in driver.scenarios() {
        assert_eq!(sc.params.num_players, 3);
        assert_eq!(sc.players[0].ai_type, FleetAiType::Neutral);
        assert_ne!(sc.players[1].player_uid, sc.players[2].player_uid);
    }
}

#[test]
fn test_optimize_mode_pairs_targets_against_controls() {
    let driver = Driver::new(opts_from(&[
        "--optimize",
        "--mutationNewIterations",
        "3",
        "--seed",
        "7",
    ]))
    .unwrap();

    let controls = FleetAiType::control_types().len();
    // One fresh target, three iterations per control.
    assert_eq!(driver.scenarios().len(), 3 * controls);
    for sc in driver.scenarios() {
        assert_eq!(sc.players[1].player_type, PlayerType::Target);
        assert_eq!(sc.players[2].player_type, PlayerType::Control);
    }
}

/// Deterministic replay: the same battles produce bit-identical results
/// on 1 and 8 worker threads.
#[test]
fn test_deterministic_replay_across_thread_counts() {
    fn battle_scenario() -> BattleScenario {
        let mut players = vec![
            BattlePlayer::new(FleetAiType::Neutral),
            BattlePlayer::new(FleetAiType::Simple),
            BattlePlayer::new(FleetAiType::Fighter),
        ];
        players[0].player_type = PlayerType::Neutral;
        for (i, p) in players.iter_mut().enumerate() {
            p.player_uid = i as u32;
            if i > 0 {
                p.player_type = PlayerType::Control;
            }
        }
        let mut params = BattleParams {
            width: 400.0,
            height: 300.0,
            tick_limit: 150,
            starting_fighters: 2,
            restricted_start: false,
            ..BattleParams::default()
        };
        params.num_players = 3;
        BattleScenario { params, players }
    }

    fn run_battles(num_threads: usize) -> Vec<String> {
        let shared = Arc::new(DriverShared::new(num_threads));
        shared.total_battles.store(12, Ordering::Relaxed);

        let workers: Vec<_> = (0..num_threads)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || worker::worker_main(&shared))
            })
            .collect();

        for battle_id in 1..=12u32 {
            shared.work_queue.queue_item(WorkUnit::Battle(BattleWorkUnit {
                battle_id,
                seed: 0x1000 + battle_id as u64,
                scenario: battle_scenario(),
            }));
        }

        shared.work_queue.wait_for_all_finished();
        for _ in 0..num_threads {
            shared.work_queue.queue_item(WorkUnit::Exit);
        }
        for w in workers {
            w.join().unwrap();
        }

        let mut results: Vec<String> = shared
            .result_queue
            .drain()
            .iter()
            .map(|r| serde_json::to_string(&r.status).unwrap())
            .collect();
        // Completion order varies across thread counts; outcomes may not.
        results.sort();
        results
    }

    let serial = run_battles(1);
    let parallel = run_battles(8);
    assert_eq!(serial.len(), 12);
    assert_eq!(serial, parallel, "results must match bit-for-bit");
}

//! Worker threads: dequeue a battle, drive it to completion, post the
//! result.
//!
//! A battle and everything inside it is owned by exactly one worker from
//! dequeue to result-post. Workers share only the two queues and the
//! async-exit flag; an aborted battle posts no result.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use tracing::{debug, info};

use armada_core::scenario::{BattleScenario, BattleStatus, PLAYER_UID_NEUTRAL};
use armada_sim::Battle;

use crate::work_queue::WorkQueue;

pub enum WorkUnit {
    Battle(BattleWorkUnit),
    Exit,
}

pub struct BattleWorkUnit {
    pub battle_id: u32,
    pub seed: u64,
    pub scenario: BattleScenario,
}

pub struct ResultUnit {
    pub status: BattleStatus,
}

/// State shared between the driver and every worker thread.
pub struct DriverShared {
    pub work_queue: WorkQueue<WorkUnit>,
    pub result_queue: WorkQueue<ResultUnit>,
    pub async_exit: AtomicBool,
    pub total_battles: AtomicUsize,
    pub num_threads: usize,
}

impl DriverShared {
    pub fn new(num_threads: usize) -> Self {
        Self {
            work_queue: WorkQueue::new(),
            result_queue: WorkQueue::new(),
            async_exit: AtomicBool::new(false),
            total_battles: AtomicUsize::new(0),
            num_threads,
        }
    }
}

/// One worker loop: `wait_for_item -> run -> finish_item` until an exit
/// unit arrives.
pub fn worker_main(shared: &DriverShared) {
    loop {
        match shared.work_queue.wait_for_item() {
            WorkUnit::Battle(wu) => {
                run_battle(shared, wu);
                shared.work_queue.finish_item();
            }
            WorkUnit::Exit => return,
        }
    }
}

fn run_battle(shared: &DriverShared, wu: BattleWorkUnit) {
    let total = shared.total_battles.load(Ordering::Relaxed);
    info!("Starting battle {} of {}...", wu.battle_id, total);

    let start_time = Instant::now();
    let mut battle = Battle::new(wu.scenario, wu.seed);

    let mut finished = false;
    while !finished && !shared.async_exit.load(Ordering::Relaxed) {
        battle.run_tick();

        let status = battle.status();
        if shared.num_threads == 1 && status.tick % 5000 == 0 {
            log_battle_status(wu.battle_id, wu.seed, status, start_time);
        }
        finished = status.finished;
    }

    log_battle_status(wu.battle_id, wu.seed, battle.status(), start_time);

    if finished {
        shared.result_queue.queue_item(ResultUnit {
            status: battle.status().clone(),
        });
        info!("Battle {} of {} finished", wu.battle_id, total);
    } else {
        info!("Battle {} of {} aborted", wu.battle_id, total);
    }
}

fn log_battle_status(battle_id: u32, seed: u64, status: &BattleStatus, start_time: Instant) {
    let elapsed = start_time.elapsed().as_secs_f64();
    let ticks_per_sec = if elapsed > 0.0 {
        status.tick as f64 / elapsed
    } else {
        0.0
    };

    debug!(
        battle_id,
        tick = status.tick,
        seed = format_args!("{seed:#x}"),
        collisions = status.collisions,
        sensor_contacts = status.sensor_contacts,
        spawns = status.spawns,
        ship_spawns = status.ship_spawns,
        ticks_per_sec = format_args!("{ticks_per_sec:.1}"),
        "battle status"
    );
    for (i, player) in status.players.iter().enumerate() {
        debug!(battle_id, player = i, num_mobs = player.num_mobs, "player status");
    }

    if status.finished && status.winner_uid != PLAYER_UID_NEUTRAL {
        debug!(battle_id, winner_uid = status.winner_uid, "winner");
    }
}

//! The tournament driver: player assembly, scenario construction, worker
//! scheduling, and the end-of-run summary.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use tracing::{debug, info};

use armada_core::rng::SimRng;
use armada_core::scenario::{
    BattleParams, BattlePlayer, BattleScenario, BattleStatus, FleetAiType, PlayerType,
    PLAYER_UID_NEUTRAL,
};

use crate::opts::Opts;
use crate::population;
use crate::scenario;
use crate::tally::WinnerData;
use crate::worker::{self, BattleWorkUnit, DriverShared, WorkUnit};

pub struct Driver {
    opts: Opts,
    rng: SimRng,
    driver_seed: u64,
    players: Vec<BattlePlayer>,
    scenarios: Vec<BattleScenario>,
    winners: Vec<WinnerData>,
    breakdown: Vec<Vec<WinnerData>>,
    shared: Arc<DriverShared>,
}

impl Driver {
    pub fn new(mut opts: Opts) -> Result<Driver> {
        if opts.optimize {
            opts.tournament = true;
        }
        ensure!(opts.num_threads >= 1, "--numThreads must be at least 1");
        ensure!(opts.loop_count >= 1, "--loop must be at least 1");

        let driver_seed = if opts.seed != 0 {
            opts.seed
        } else {
            SimRng::from_entropy().uint64()
        };
        debug!("Random seed: {driver_seed:#x}");

        let params = scenario::load_base_params(opts.scenario.as_deref(), opts.tick_limit)?;

        let mut driver = Driver {
            rng: SimRng::new(driver_seed),
            driver_seed,
            players: Vec::new(),
            scenarios: Vec::new(),
            winners: Vec::new(),
            breakdown: Vec::new(),
            shared: Arc::new(DriverShared::new(opts.num_threads as usize)),
            opts,
        };

        driver.construct_players()?;
        driver.construct_scenarios(params);

        driver.winners = vec![WinnerData::default(); driver.players.len()];
        driver.breakdown =
            vec![vec![WinnerData::default(); driver.players.len()]; driver.players.len()];
        Ok(driver)
    }

    /// Assemble the master player list: the neutral fleet always comes
    /// first, then whatever the mode calls for.
    fn construct_players(&mut self) -> Result<()> {
        let mut neutral = BattlePlayer::new(FleetAiType::Neutral);
        neutral.player_type = PlayerType::Neutral;
        self.players.push(neutral);

        if let Some(path) = self.opts.use_population.clone() {
            let num_targets = population::load(&path, &mut self.players)?;
            info!(
                "Loaded {} fleets ({} targets) from {}",
                self.players.len() - 1,
                num_targets,
                path.display()
            );

            if self.opts.mutate_population {
                population::kill_and_mutate(
                    &mut self.players,
                    1,
                    num_targets,
                    self.opts.population_limit,
                    self.opts.population_kill_ratio,
                    &mut self.rng,
                )?;
            }
        } else if self.opts.optimize {
            for &ai_type in FleetAiType::control_types() {
                let mut p = BattlePlayer::new(ai_type);
                p.player_type = PlayerType::Control;
                self.players.push(p);
            }
            // The fleet being optimized.
            let mut target = BattlePlayer::new(FleetAiType::Fighter);
            target.player_name = "FighterFleet Test".to_owned();
            target.player_type = PlayerType::Target;
            self.players.push(target);
        } else if self.opts.tournament {
            for &ai_type in FleetAiType::control_types() {
                let mut p = BattlePlayer::new(ai_type);
                p.player_type = PlayerType::Control;
                self.players.push(p);
            }
        } else {
            self.players.push(BattlePlayer::new(FleetAiType::Simple));
            self.players.push(BattlePlayer::new(FleetAiType::Fighter));
        }

        for (i, player) in self.players.iter_mut().enumerate() {
            player.player_uid = i as u32;
            if player.player_name.is_empty() {
                player.player_name = player.ai_type.name().to_owned();
            }
            if player.player_type == PlayerType::Invalid {
                player.player_type = PlayerType::Target;
            }
        }

        ensure!(
            self.players.len() >= 3,
            "need neutral plus at least two fleets"
        );
        Ok(())
    }

    /// Materialize the battle scenarios for the selected mode.
    fn construct_scenarios(&mut self, params: BattleParams) {
        let mutate_mode = self.opts.optimize
            || (self.opts.use_population.is_some() && self.opts.mutate_population);

        if mutate_mode {
            // Pair every target against every control, several times.
            for ti in 1..self.players.len() {
                if self.players[ti].player_type != PlayerType::Target {
                    continue;
                }
                let iterations =
                    if self.players[ti].config.get_uint_or("numBattles", 0) == 0 {
                        self.opts.mutation_new_iterations
                    } else {
                        self.opts.mutation_stale_iterations
                    };

                for _ in 0..iterations {
                    for ci in 1..self.players.len() {
                        if self.players[ci].player_type != PlayerType::Control {
                            continue;
                        }
                        self.scenarios.push(self.three_player_scenario(
                            params.clone(),
                            ti,
                            ci,
                        ));
                    }
                }
            }
        } else if self.opts.tournament {
            // Round-robin every ordered non-neutral pair.
            for x in 1..self.players.len() {
                for y in 1..self.players.len() {
                    if x == y {
                        continue;
                    }
                    self.scenarios
                        .push(self.three_player_scenario(params.clone(), x, y));
                }
            }
        } else {
            let mut params = params;
            params.num_players = self.players.len() as u32;
            self.scenarios.push(BattleScenario {
                params,
                players: self.players.clone(),
            });
        }
    }

    fn three_player_scenario(
        &self,
        mut params: BattleParams,
        p1: usize,
        p2: usize,
    ) -> BattleScenario {
        params.num_players = 3;
        BattleScenario {
            params,
            players: vec![
                self.players[0].clone(),
                self.players[p1].clone(),
                self.players[p2].clone(),
            ],
        }
    }

    /// Run every queued battle to completion and print the summary.
    pub fn run(mut self) -> Result<()> {
        let total_battles = self.opts.loop_count as usize * self.scenarios.len();
        self.shared
            .total_battles
            .store(total_battles, Ordering::Relaxed);
        info!(
            "{} scenarios, {} battles, {} threads",
            self.scenarios.len(),
            total_battles,
            self.opts.num_threads
        );

        let mut workers = Vec::new();
        for i in 0..self.opts.num_threads {
            let shared = Arc::clone(&self.shared);
            let handle = std::thread::Builder::new()
                .name(format!("battle{i}"))
                .spawn(move || worker::worker_main(&shared))
                .context("spawning worker thread")?;
            workers.push(handle);
        }

        let mut battle_id = 0u32;
        for _ in 0..self.opts.loop_count {
            for sc in &self.scenarios {
                battle_id += 1;

                // The first battle burns the driver seed itself, so a
                // single battle is easy to re-create without --reuseSeed.
                let seed = if battle_id == 1 || self.opts.reuse_seed {
                    self.driver_seed
                } else {
                    self.rng.uint64()
                };

                self.shared.work_queue.queue_item(WorkUnit::Battle(BattleWorkUnit {
                    battle_id,
                    seed,
                    scenario: sc.clone(),
                }));
            }
        }

        self.shared.work_queue.wait_for_all_finished();

        for _ in &workers {
            self.shared.work_queue.queue_item(WorkUnit::Exit);
        }
        for handle in workers {
            handle.join().expect("worker thread panicked");
        }

        // Tally after every worker has exited; order doesn't matter.
        for result in self.shared.result_queue.drain() {
            self.record_result(&result.status);
        }

        self.print_winners();

        if let Some(path) = self.opts.dump_population.clone() {
            population::dump(&path, &self.players, &self.winners)?;
            info!("Dumped population to {}", path.display());
        }

        Ok(())
    }

    fn record_result(&mut self, status: &BattleStatus) {
        for player in &status.players {
            let puid = player.player_uid as usize;
            self.winners[puid].record(player.player_uid, status);
        }

        if status.num_players == 3 {
            debug_assert_eq!(status.players[0].player_uid, PLAYER_UID_NEUTRAL);
            let uid1 = status.players[1].player_uid;
            let uid2 = status.players[2].player_uid;
            self.breakdown[uid1 as usize][uid2 as usize].record(uid1, status);
            self.breakdown[uid2 as usize][uid1 as usize].record(uid2, status);
        }
    }

    fn print_winners(&self) {
        if self.opts.tournament {
            println!();
            println!("Winner Breakdown:");
            for p1 in 0..self.players.len() {
                println!("Fleet {}:", self.players[p1].player_name);
                for p2 in 0..self.players.len() {
                    if self.breakdown[p1][p2].battles > 0 {
                        println!("\tvs {}:", self.players[p2].player_name);
                        println!("{}", self.breakdown[p1][p2].summary_line());
                    }
                }
            }
        }

        println!();
        println!("Summary:");

        let total_battles: u64 = self.winners.iter().map(|w| w.wins).sum();
        for (player, wd) in self.players.iter().zip(self.winners.iter()) {
            println!("Fleet: {}", player.player_name);
            println!("{}", wd.summary_line());
        }
        println!("Total Battles: {total_battles}");
    }

    #[cfg(test)]
    pub(crate) fn scenarios(&self) -> &[BattleScenario] {
        &self.scenarios
    }

    #[cfg(test)]
    pub(crate) fn players(&self) -> &[BattlePlayer] {
        &self.players
    }
}

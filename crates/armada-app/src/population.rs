//! Population persistence and evolution.
//!
//! A population file enumerates fleets under `fleet<i>.` prefixes with a
//! top-level `numFleets` count. Loaded target fleets are killed and
//! re-bred by a two-sample weighted competition: kill picks lean toward
//! high loss fractions, breeding picks toward high win fractions, with a
//! small additive floor so winless fleets still get sampled.

use std::path::Path;

use anyhow::{bail, ensure, Context, Result};

use armada_core::registry::Registry;
use armada_core::rng::SimRng;
use armada_core::scenario::{BattlePlayer, FleetAiType, PlayerType};
use armada_fleets::controllers;

use crate::tally::WinnerData;

/// Battle counters tracked per fleet in the population file.
const COUNTER_KEYS: [&str; 4] = ["numBattles", "numWins", "numLosses", "numDraws"];

/// Load a population file, appending its fleets to `players`.
///
/// Every loaded fleet's `age` is bumped by one (a missing age starts at
/// zero). Returns the number of target fleets loaded.
pub fn load(path: &Path, players: &mut Vec<BattlePlayer>) -> Result<usize> {
    let pop = Registry::load(path).with_context(|| format!("loading {}", path.display()))?;

    let num_fleets = pop.get_uint_or("numFleets", 0);
    if num_fleets == 0 {
        bail!("Missing key: numFleets in {}", path.display());
    }

    let mut num_targets = 0;
    for i in 1..=num_fleets {
        let mut fleet_reg = pop.split_on_prefix(&format!("fleet{i}."));

        let Some(fleet_name) = fleet_reg.get("fleetName").map(str::to_owned) else {
            bail!("Missing key: fleet{i}.fleetName in {}", path.display());
        };
        let Some(ai_type) = FleetAiType::from_name(&fleet_name) else {
            bail!("Unknown fleet type: {fleet_name}");
        };

        let player_name = fleet_reg
            .get("playerName")
            .unwrap_or(&fleet_name)
            .to_owned();

        let age = match fleet_reg.get_uint("age") {
            Some(age) => age + 1,
            None => 0,
        };
        fleet_reg.put_int("age", age as i64);

        let player_type = PlayerType::from_opt_str(fleet_reg.get("playerType"));
        ensure!(
            player_type != PlayerType::Invalid,
            "fleet{i} has no playerType in {}",
            path.display()
        );
        if player_type == PlayerType::Target {
            num_targets += 1;
        }

        players.push(BattlePlayer {
            player_uid: 0,
            player_name,
            player_type,
            ai_type,
            config: fleet_reg,
        });
    }

    Ok(num_targets)
}

/// Kill and re-breed target fleets in `players[start..]`.
pub fn kill_and_mutate(
    players: &mut Vec<BattlePlayer>,
    start: usize,
    num_targets: usize,
    population_limit: u32,
    kill_ratio: f32,
    rng: &mut SimRng,
) -> Result<()> {
    let pop_limit = population_limit as usize;
    let mut num_fleets = players.len() - start;

    ensure!(pop_limit > 0, "--populationLimit must be positive");
    ensure!(
        kill_ratio > 0.0 && kill_ratio <= 1.0,
        "--populationKillRatio must be in (0, 1]"
    );

    let mut kill_count = (num_targets as f32 * kill_ratio) as usize;
    if num_fleets > pop_limit {
        kill_count = kill_count.max(num_fleets - pop_limit);
    }
    kill_count = kill_count.min(num_targets.saturating_sub(1));
    let mut mutate_count = (pop_limit + kill_count).saturating_sub(num_fleets);

    while kill_count > 0 {
        let fi = fleet_competition(players, start, num_fleets, false, rng);
        debug_assert_eq!(players[fi].player_type, PlayerType::Target);
        players.swap_remove(fi);
        kill_count -= 1;
        num_fleets -= 1;
    }

    // Only the original survivors compete to breed; fresh clones don't.
    while mutate_count > 0 {
        let mi = fleet_competition(players, start, num_fleets, true, rng);
        let mut clone = players[mi].clone();

        clone.player_type = PlayerType::Target;
        for key in COUNTER_KEYS {
            clone.config.remove(key);
        }
        clone.config.put("age", "0");
        controllers::mutate_fleet(clone.ai_type, &mut clone.config, rng);

        players.push(clone);
        mutate_count -= 1;
    }

    Ok(())
}

/// Pick the higher-weighted of two sampled target fleets.
fn fleet_competition(
    players: &[BattlePlayer],
    start: usize,
    num_fleets: usize,
    use_win_ratio: bool,
    rng: &mut SimRng,
) -> usize {
    let (f1, w1) = find_random_fleet(players, start, num_fleets, use_win_ratio, rng);
    let (f2, w2) = find_random_fleet(players, start, num_fleets, use_win_ratio, rng);
    if w1 >= w2 {
        f1
    } else {
        f2
    }
}

/// Sample one target fleet with probability proportional to its win (or
/// loss) fraction, plus an additive floor that grows each sweep so the
/// walk always terminates.
fn find_random_fleet(
    players: &[BattlePlayer],
    start: usize,
    num_fleets: usize,
    use_win_ratio: bool,
    rng: &mut SimRng,
) -> (usize, f32) {
    assert!(num_fleets > 0);

    let mut iterations = 0usize;
    let mut i = rng.int(0, num_fleets as i32 - 1) as usize;
    loop {
        let fi = start + i;
        let reg = &players[fi].config;
        let num_battles = reg.get_uint_or("numBattles", 0);
        let weight = if use_win_ratio {
            reg.get_uint_or("numWins", 0)
        } else {
            reg.get_uint_or("numLosses", 0)
        };

        let mut s_prob = if num_battles > 0 {
            weight as f32 / num_battles as f32
        } else {
            0.0
        };
        s_prob += (iterations / num_fleets) as f32 + 0.01;
        s_prob = s_prob.clamp(0.0, 1.0);

        if players[fi].player_type == PlayerType::Target && rng.flip(s_prob) {
            return (fi, s_prob);
        }

        i = (i + 1) % num_fleets;
        iterations += 1;
        if iterations > num_fleets * 101 {
            panic!("Unable to select enough fleets");
        }
    }
}

/// Write the population registry, folding this run's tallies into the
/// loaded battle counters.
pub fn dump(
    path: &Path,
    players: &[BattlePlayer],
    winners: &[WinnerData],
) -> Result<()> {
    let mut pop = Registry::new();
    let mut num_fleets = 0u64;

    for (i, player) in players.iter().enumerate().skip(1) {
        let wd = &winners[player.player_uid as usize];
        num_fleets += 1;

        let prefix = format!("fleet{i}.");
        // Copy the fleet's registry first, then override the bookkeeping.
        pop.put_all_with_prefix(&player.config, &prefix);
        pop.put(&format!("{prefix}fleetName"), player.ai_type.name());
        pop.put(&format!("{prefix}playerName"), &player.player_name);
        pop.put(&format!("{prefix}playerType"), player.player_type.as_str());

        add_to_key(&player.config, &mut pop, &prefix, "numBattles", wd.battles);
        add_to_key(&player.config, &mut pop, &prefix, "numWins", wd.wins);
        add_to_key(&player.config, &mut pop, &prefix, "numLosses", wd.losses);
        add_to_key(&player.config, &mut pop, &prefix, "numDraws", wd.draws);
    }

    pop.put_int("numFleets", num_fleets as i64);
    pop.save(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn add_to_key(source: &Registry, dest: &mut Registry, prefix: &str, key: &str, value: u64) {
    let prior = source.get_uint_or(key, 0);
    dest.put_int(&format!("{prefix}{key}"), (prior + value) as i64);
}

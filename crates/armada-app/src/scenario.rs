//! Scenario file loading and battle-parameter construction.
//!
//! Scenario files are `key = value` text under `scenarios/`. Missing keys
//! inherit from the built-in `default` scenario; a named scenario that
//! cannot be read aborts before any battle starts.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use armada_core::registry::Registry;
use armada_core::scenario::BattleParams;

fn scenario_path(name: &str) -> PathBuf {
    Path::new("scenarios").join(format!("{name}.sc"))
}

/// Serialize battle parameters into scenario-file keys.
pub fn params_to_registry(params: &BattleParams) -> Registry {
    let mut reg = Registry::new();
    reg.put_float("width", params.width);
    reg.put_float("height", params.height);
    reg.put_int("startingCredits", params.starting_credits as i64);
    reg.put_int("creditsPerTick", params.credits_per_tick as i64);
    reg.put_int("tickLimit", params.tick_limit as i64);
    reg.put_float("powerCoreDropRate", params.power_core_drop_rate);
    reg.put_float("powerCoreSpawnRate", params.power_core_spawn_rate);
    reg.put_int("minPowerCoreSpawn", params.min_power_core_spawn as i64);
    reg.put_int("maxPowerCoreSpawn", params.max_power_core_spawn as i64);
    reg.put_bool("restrictedStart", params.restricted_start);
    reg.put_bool("baseVictory", params.base_victory);
    reg.put_int("startingBases", params.starting_bases as i64);
    reg.put_int("startingFighters", params.starting_fighters as i64);
    reg
}

/// Build battle parameters from scenario-file keys, falling back to the
/// built-in defaults for missing ones.
pub fn params_from_registry(reg: &Registry) -> BattleParams {
    let d = BattleParams::default();
    BattleParams {
        width: reg.get_float_or("width", d.width),
        height: reg.get_float_or("height", d.height),
        starting_credits: reg.get_int_or("startingCredits", d.starting_credits as i64) as i32,
        credits_per_tick: reg.get_int_or("creditsPerTick", d.credits_per_tick as i64) as i32,
        tick_limit: reg.get_uint_or("tickLimit", d.tick_limit as u64) as u32,
        power_core_drop_rate: reg.get_float_or("powerCoreDropRate", d.power_core_drop_rate),
        power_core_spawn_rate: reg.get_float_or("powerCoreSpawnRate", d.power_core_spawn_rate),
        min_power_core_spawn: reg.get_int_or("minPowerCoreSpawn", d.min_power_core_spawn as i64)
            as i32,
        max_power_core_spawn: reg.get_int_or("maxPowerCoreSpawn", d.max_power_core_spawn as i64)
            as i32,
        restricted_start: reg.get_bool_or("restrictedStart", d.restricted_start),
        base_victory: reg.get_bool_or("baseVictory", d.base_victory),
        starting_bases: reg.get_uint_or("startingBases", d.starting_bases as u64) as u32,
        starting_fighters: reg.get_uint_or("startingFighters", d.starting_fighters as u64) as u32,
        num_players: 0,
    }
}

/// Load the base battle parameters: built-in defaults, overlaid by the
/// `default` scenario file when present, then by the named scenario.
pub fn load_base_params(scenario: Option<&str>, tick_limit_override: u32) -> Result<BattleParams> {
    let mut reg = params_to_registry(&BattleParams::default());

    let default_path = scenario_path("default");
    if default_path.exists() {
        reg.load_into(&default_path)
            .with_context(|| format!("loading {}", default_path.display()))?;
    }

    if let Some(name) = scenario {
        let path = scenario_path(name);
        if !path.exists() {
            bail!("Cannot access: {}", path.display());
        }
        reg.load_into(&path)
            .with_context(|| format!("loading {}", path.display()))?;
    }

    let mut params = params_from_registry(&reg);
    if tick_limit_override != 0 {
        params.tick_limit = tick_limit_override;
    }
    Ok(params)
}

//! Battle scenario, player, and status types.
//!
//! A `BattleScenario` is the immutable configuration of one battle; the
//! `BattleStatus` is the aggregated per-tick snapshot the driver tallies.

use serde::{Deserialize, Serialize};

use crate::registry::Registry;

/// Player index within a battle. Index 0 is always the neutral player.
pub type PlayerId = u8;

/// Driver-level player identifier, stable across battles.
pub type PlayerUid = u32;

pub const PLAYER_ID_NEUTRAL: PlayerId = 0;

/// UID recorded as the winner of a drawn battle.
pub const PLAYER_UID_NEUTRAL: PlayerUid = 0;

/// Role of a player in the evolution driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerType {
    /// Cleared / not-yet-assigned slot.
    #[default]
    Invalid,
    Neutral,
    /// Fixed benchmark opponent.
    Control,
    /// Candidate whose parameters are being optimized.
    Target,
}

impl PlayerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerType::Invalid => "PlayerTypeInvalid",
            PlayerType::Neutral => "Neutral",
            PlayerType::Control => "Control",
            PlayerType::Target => "Target",
        }
    }

    /// Parse a player type from an optional registry value.
    ///
    /// A missing value is `Invalid`; an unrecognized string is a
    /// configuration fault and panics.
    pub fn from_opt_str(s: Option<&str>) -> PlayerType {
        match s {
            None | Some("PlayerTypeInvalid") => PlayerType::Invalid,
            Some("Neutral") => PlayerType::Neutral,
            Some("Control") => PlayerType::Control,
            Some("Target") => PlayerType::Target,
            Some(other) => panic!("Unknown player type: {other}"),
        }
    }
}

/// Which controller drives a player's fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FleetAiType {
    /// The do-nothing fleet that owns power cores.
    Neutral,
    /// Random wander; the weakest real opponent.
    Dummy,
    /// Chases sensor contacts, remembers the enemy base.
    Simple,
    /// Per-ship tracking, missile volleys, core looting.
    Fighter,
}

impl FleetAiType {
    pub fn name(&self) -> &'static str {
        match self {
            FleetAiType::Neutral => "Neutral",
            FleetAiType::Dummy => "DummyFleet",
            FleetAiType::Simple => "SimpleFleet",
            FleetAiType::Fighter => "FighterFleet",
        }
    }

    pub fn from_name(name: &str) -> Option<FleetAiType> {
        [
            FleetAiType::Neutral,
            FleetAiType::Dummy,
            FleetAiType::Simple,
            FleetAiType::Fighter,
        ]
        .into_iter()
        .find(|t| t.name() == name)
    }

    /// The fleets entered as benchmark opponents in tournament and
    /// optimize modes (everything real except the dummy).
    pub fn control_types() -> &'static [FleetAiType] {
        &[FleetAiType::Simple, FleetAiType::Fighter]
    }
}

/// Immutable per-battle tuning parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleParams {
    pub width: f32,
    pub height: f32,
    pub starting_credits: i32,
    pub credits_per_tick: i32,
    pub tick_limit: u32,
    /// Fraction of a dead ship's cost dropped as a neutral power core.
    pub power_core_drop_rate: f32,
    /// Credits' worth of neutral power cores accumulated per tick.
    pub power_core_spawn_rate: f32,
    pub min_power_core_spawn: i32,
    pub max_power_core_spawn: i32,
    /// Start each player in its own vertical strip of the playfield.
    pub restricted_start: bool,
    /// A player is alive only while it owns a base.
    pub base_victory: bool,
    pub starting_bases: u32,
    pub starting_fighters: u32,
    pub num_players: u32,
}

impl Default for BattleParams {
    /// The built-in `default` scenario.
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1200.0,
            starting_credits: 1000,
            credits_per_tick: 1,
            tick_limit: 50_000,
            power_core_drop_rate: 0.25,
            power_core_spawn_rate: 2.0,
            min_power_core_spawn: 10,
            max_power_core_spawn: 20,
            restricted_start: true,
            base_victory: false,
            starting_bases: 1,
            starting_fighters: 0,
            num_players: 0,
        }
    }
}

/// One player's entry in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattlePlayer {
    pub player_uid: PlayerUid,
    pub player_name: String,
    pub player_type: PlayerType,
    pub ai_type: FleetAiType,
    /// Controller-specific parameters; the engine never interprets these.
    pub config: Registry,
}

impl BattlePlayer {
    pub fn new(ai_type: FleetAiType) -> Self {
        Self {
            player_uid: PLAYER_UID_NEUTRAL,
            player_name: ai_type.name().to_owned(),
            player_type: PlayerType::Invalid,
            ai_type,
            config: Registry::new(),
        }
    }
}

/// Immutable configuration of one battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleScenario {
    pub params: BattleParams,
    pub players: Vec<BattlePlayer>,
}

/// Per-player slice of the battle status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub player_uid: PlayerUid,
    pub alive: bool,
    pub credits: i32,
    pub num_mobs: u32,
}

/// Aggregated tick snapshot of one battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleStatus {
    pub tick: u32,
    pub finished: bool,
    pub num_players: u32,
    /// Winning player index, or neutral for a draw.
    pub winner: PlayerId,
    pub winner_uid: PlayerUid,
    pub players: Vec<PlayerStatus>,
    pub collisions: u64,
    pub sensor_contacts: u64,
    pub spawns: u64,
    pub ship_spawns: u64,
}

impl BattleStatus {
    pub fn new(scenario: &BattleScenario) -> Self {
        let players = scenario
            .players
            .iter()
            .map(|p| PlayerStatus {
                player_uid: p.player_uid,
                alive: true,
                credits: scenario.params.starting_credits,
                num_mobs: 0,
            })
            .collect();
        Self {
            tick: 0,
            finished: false,
            num_players: scenario.params.num_players,
            winner: PLAYER_ID_NEUTRAL,
            winner_uid: PLAYER_UID_NEUTRAL,
            players,
            collisions: 0,
            sensor_contacts: 0,
            spawns: 0,
            ship_spawns: 0,
        }
    }
}

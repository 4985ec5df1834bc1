//! Engine constants and mob tuning tables.

/// Distance slop for "arrived at target" checks and movement asserts.
pub const MICRON: f32 = 0.001;

/// Hard cap on players per battle (scan bits are a u32 bitmap).
pub const MAX_PLAYERS: usize = 32;

// --- Base ---

/// Credit cost to spawn a base (bases are never spawned mid-battle today,
/// but the cost backs power-core drop value).
pub const BASE_COST: i32 = 500;

pub const BASE_MAX_HEALTH: i32 = 50;

/// Bases are immobile.
pub const BASE_SPEED: f32 = 0.0;

pub const BASE_RADIUS: f32 = 30.0;

pub const BASE_SENSOR_RADIUS: f32 = 250.0;

/// Ticks between fighter spawns from a single base.
pub const BASE_RECHARGE_TICKS: u32 = 100;

// --- Fighter ---

pub const FIGHTER_COST: i32 = 100;

pub const FIGHTER_MAX_HEALTH: i32 = 1;

pub const FIGHTER_SPEED: f32 = 2.5;

pub const FIGHTER_RADIUS: f32 = 5.0;

pub const FIGHTER_SENSOR_RADIUS: f32 = 60.0;

/// Ticks between missile launches from a single fighter.
pub const FIGHTER_RECHARGE_TICKS: u32 = 5;

// --- Missile ---

pub const MISSILE_COST: i32 = 1;

pub const MISSILE_MAX_HEALTH: i32 = 1;

pub const MISSILE_SPEED: f32 = 5.0;

pub const MISSILE_RADIUS: f32 = 3.0;

pub const MISSILE_SENSOR_RADIUS: f32 = 30.0;

/// Missile lifetime in ticks; effective firing range is
/// `MISSILE_SPEED * MISSILE_MAX_FUEL`.
pub const MISSILE_MAX_FUEL: i32 = 42;

// --- Power core ---

pub const POWER_CORE_MAX_HEALTH: i32 = 1;

pub const POWER_CORE_RADIUS: f32 = 4.0;

/// Ticks an uncollected power core persists before expiring.
pub const POWER_CORE_MAX_FUEL: i32 = 1000;

//! Mob records and the id-indexed mob container.
//!
//! A mob is the unit of simulation: a base, fighter, missile, or neutral
//! power core. Per-type tuning lives in [`crate::constants`]; game logic
//! lives in the engine, not here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bits::PlayerMask;
use crate::constants::*;
use crate::scenario::{PlayerId, PLAYER_ID_NEUTRAL};
use crate::types::{Circle, Point};

/// Battle-unique mob identifier, monotonically increasing.
pub type MobId = u32;

pub type MobTypeFlags = u8;

pub const MOB_FLAG_BASE: MobTypeFlags = 1 << 0;
pub const MOB_FLAG_FIGHTER: MobTypeFlags = 1 << 1;
pub const MOB_FLAG_MISSILE: MobTypeFlags = 1 << 2;
pub const MOB_FLAG_POWER_CORE: MobTypeFlags = 1 << 3;
pub const MOB_FLAG_SHIP: MobTypeFlags = MOB_FLAG_BASE | MOB_FLAG_FIGHTER;
pub const MOB_FLAG_AMMO: MobTypeFlags = MOB_FLAG_MISSILE | MOB_FLAG_POWER_CORE;
pub const MOB_FLAG_ALL: MobTypeFlags = MOB_FLAG_SHIP | MOB_FLAG_AMMO;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobType {
    Base,
    Fighter,
    Missile,
    PowerCore,
}

impl MobType {
    pub fn flag(&self) -> MobTypeFlags {
        match self {
            MobType::Base => MOB_FLAG_BASE,
            MobType::Fighter => MOB_FLAG_FIGHTER,
            MobType::Missile => MOB_FLAG_MISSILE,
            MobType::PowerCore => MOB_FLAG_POWER_CORE,
        }
    }

    /// Missiles and power cores; everything a ship can collide with.
    pub fn is_ammo(&self) -> bool {
        self.flag() & MOB_FLAG_AMMO != 0
    }

    pub fn is_ship(&self) -> bool {
        self.flag() & MOB_FLAG_SHIP != 0
    }

    pub fn cost(&self) -> i32 {
        match self {
            MobType::Base => BASE_COST,
            MobType::Fighter => FIGHTER_COST,
            MobType::Missile => MISSILE_COST,
            MobType::PowerCore => 0,
        }
    }

    pub fn max_health(&self) -> i32 {
        match self {
            MobType::Base => BASE_MAX_HEALTH,
            MobType::Fighter => FIGHTER_MAX_HEALTH,
            MobType::Missile => MISSILE_MAX_HEALTH,
            MobType::PowerCore => POWER_CORE_MAX_HEALTH,
        }
    }

    pub fn speed(&self) -> f32 {
        match self {
            MobType::Base => BASE_SPEED,
            MobType::Fighter => FIGHTER_SPEED,
            MobType::Missile => MISSILE_SPEED,
            MobType::PowerCore => 0.0,
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            MobType::Base => BASE_RADIUS,
            MobType::Fighter => FIGHTER_RADIUS,
            MobType::Missile => MISSILE_RADIUS,
            MobType::PowerCore => POWER_CORE_RADIUS,
        }
    }

    pub fn sensor_radius(&self) -> f32 {
        match self {
            MobType::Base => BASE_SENSOR_RADIUS,
            MobType::Fighter => FIGHTER_SENSOR_RADIUS,
            MobType::Missile => MISSILE_SENSOR_RADIUS,
            MobType::PowerCore => 0.0,
        }
    }

    /// Lifetime in ticks for fuel-limited types; 0 means unlimited.
    pub fn max_fuel(&self) -> i32 {
        match self {
            MobType::Missile => MISSILE_MAX_FUEL,
            MobType::PowerCore => POWER_CORE_MAX_FUEL,
            MobType::Base | MobType::Fighter => 0,
        }
    }

    pub fn recharge_ticks(&self) -> u32 {
        match self {
            MobType::Base => BASE_RECHARGE_TICKS,
            MobType::Fighter => FIGHTER_RECHARGE_TICKS,
            MobType::Missile | MobType::PowerCore => 0,
        }
    }

    /// The only child type this mob may spawn, if any.
    pub fn spawnable_child(&self) -> Option<MobType> {
        match self {
            MobType::Base => Some(MobType::Fighter),
            MobType::Fighter => Some(MobType::Missile),
            MobType::Missile | MobType::PowerCore => None,
        }
    }
}

/// Controller-issued command, written back each tick by the dispatch layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MobCmd {
    pub target: Point,
    pub spawn_type: Option<MobType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mob {
    pub mobid: MobId,
    pub mob_type: MobType,
    pub player_id: PlayerId,
    pub alive: bool,
    /// Grace-tick marker; a dead mob lingers one tick so AIs see the death.
    pub remove_mob: bool,
    pub pos: Point,
    pub last_pos: Point,
    pub cmd: MobCmd,
    pub health: i32,
    pub fuel: i32,
    pub recharge_time: u32,
    pub birth_tick: u32,
    pub last_spawn_tick: u32,
    pub parent_mobid: Option<MobId>,
    /// Credits carried, if this is a power core.
    pub power_core_credits: i32,
    pub scanned_by: PlayerMask,
}

impl Mob {
    pub fn new(mobid: MobId, mob_type: MobType, player_id: PlayerId, pos: Point) -> Self {
        Self {
            mobid,
            mob_type,
            player_id,
            alive: true,
            remove_mob: false,
            pos,
            last_pos: pos,
            cmd: MobCmd {
                target: pos,
                spawn_type: None,
            },
            health: mob_type.max_health(),
            fuel: mob_type.max_fuel(),
            recharge_time: 0,
            birth_tick: 0,
            last_spawn_tick: 0,
            parent_mobid: None,
            power_core_credits: 0,
            scanned_by: PlayerMask::EMPTY,
        }
    }

    pub fn is_ammo(&self) -> bool {
        self.mob_type.is_ammo()
    }

    /// Bounding circle for collisions and scan targeting.
    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.mob_type.radius())
    }

    /// Sensor circle for scanning; zero-radius for power cores.
    pub fn sensor_circle(&self) -> Circle {
        Circle::new(self.pos, self.mob_type.sensor_radius())
    }

    /// Type-level consistency; checked at tick boundaries in debug builds.
    pub fn check_invariants(&self) -> bool {
        assert!(
            self.mob_type != MobType::PowerCore || self.player_id == PLAYER_ID_NEUTRAL,
            "power cores are always neutral"
        );
        assert!(
            self.player_id != PLAYER_ID_NEUTRAL || self.mob_type == MobType::PowerCore,
            "the neutral player owns only power cores"
        );
        assert!(!self.alive || self.health > 0 || self.mob_type.max_health() == 0);
        true
    }

    /// Copy handed to the owning controller: engine-internal bookkeeping
    /// stripped, commands and identity preserved.
    pub fn masked_for_ai(&self) -> Mob {
        let mut m = self.clone();
        m.scanned_by = PlayerMask::EMPTY;
        m.remove_mob = false;
        m
    }

    /// Copy handed to a scanning opponent: additionally strips everything
    /// not observable from outside.
    pub fn masked_for_sensor(&self) -> Mob {
        let mut m = self.masked_for_ai();
        m.cmd = MobCmd {
            target: m.pos,
            spawn_type: None,
        };
        m.fuel = 0;
        m.recharge_time = 0;
        m.birth_tick = 0;
        m.last_spawn_tick = 0;
        m.parent_mobid = None;
        m
    }
}

/// A set of mobs indexed by id.
///
/// Ids are dense small integers, so the set is a vector plus an id -> index
/// map; removal is swap-remove. Callers must not change a stored mob's id
/// through `get_mut`/`iter_mut`.
#[derive(Debug, Clone, Default)]
pub struct MobSet {
    mobs: Vec<Mob>,
    index: HashMap<MobId, usize>,
}

impl MobSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.mobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mobs.is_empty()
    }

    /// Drop all mobs but keep allocated capacity for the next tick.
    pub fn clear(&mut self) {
        self.mobs.clear();
        self.index.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.mobs.reserve(additional);
        self.index.reserve(additional);
    }

    /// Insert a mob, replacing any existing mob with the same id.
    pub fn insert(&mut self, mob: Mob) {
        match self.index.get(&mob.mobid) {
            Some(&i) => self.mobs[i] = mob,
            None => {
                self.index.insert(mob.mobid, self.mobs.len());
                self.mobs.push(mob);
            }
        }
    }

    pub fn contains(&self, mobid: MobId) -> bool {
        self.index.contains_key(&mobid)
    }

    pub fn get(&self, mobid: MobId) -> Option<&Mob> {
        self.index.get(&mobid).map(|&i| &self.mobs[i])
    }

    pub fn get_mut(&mut self, mobid: MobId) -> Option<&mut Mob> {
        match self.index.get(&mobid) {
            Some(&i) => Some(&mut self.mobs[i]),
            None => None,
        }
    }

    pub fn remove(&mut self, mobid: MobId) -> Option<Mob> {
        let i = self.index.remove(&mobid)?;
        let mob = self.mobs.swap_remove(i);
        if let Some(moved) = self.mobs.get(i) {
            self.index.insert(moved.mobid, i);
        }
        Some(mob)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mob> {
        self.mobs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Mob> {
        self.mobs.iter_mut()
    }

    /// Iterate mobs whose type matches the given flags.
    pub fn iter_type(&self, filter: MobTypeFlags) -> impl Iterator<Item = &Mob> {
        self.mobs
            .iter()
            .filter(move |m| m.mob_type.flag() & filter != 0)
    }

    /// Closest mob matching `filter`, by squared distance.
    pub fn find_closest(&self, pos: &Point, filter: MobTypeFlags) -> Option<&Mob> {
        self.iter_type(filter)
            .min_by(|a, b| {
                pos.distance_sq_to(&a.pos)
                    .total_cmp(&pos.distance_sq_to(&b.pos))
            })
    }

    /// Closest mob matching `filter` within `radius` of `pos`.
    pub fn find_closest_in_range(
        &self,
        pos: &Point,
        filter: MobTypeFlags,
        radius: f32,
    ) -> Option<&Mob> {
        self.find_closest(pos, filter)
            .filter(|m| pos.distance_sq_to(&m.pos) <= radius * radius)
    }

    /// The nth-closest (0-based) mob matching `filter`.
    pub fn find_nth_closest(&self, pos: &Point, filter: MobTypeFlags, n: usize) -> Option<&Mob> {
        let mut candidates: Vec<&Mob> = self.iter_type(filter).collect();
        if n >= candidates.len() {
            return None;
        }
        candidates.sort_by(|a, b| {
            pos.distance_sq_to(&a.pos)
                .total_cmp(&pos.distance_sq_to(&b.pos))
        });
        Some(candidates[n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mob_at(mobid: MobId, mob_type: MobType, x: f32, y: f32) -> Mob {
        let player = if mob_type == MobType::PowerCore { 0 } else { 1 };
        Mob::new(mobid, mob_type, player, Point::new(x, y))
    }

    #[test]
    fn test_insert_lookup_remove() {
        let mut set = MobSet::new();
        set.insert(mob_at(1, MobType::Base, 0.0, 0.0));
        set.insert(mob_at(2, MobType::Fighter, 10.0, 0.0));
        set.insert(mob_at(3, MobType::Missile, 20.0, 0.0));

        assert_eq!(set.len(), 3);
        assert!(set.contains(2));
        assert_eq!(set.get(2).unwrap().mob_type, MobType::Fighter);

        let removed = set.remove(1).unwrap();
        assert_eq!(removed.mob_type, MobType::Base);
        assert!(!set.contains(1));
        // Swap-remove must leave the moved mob findable.
        assert_eq!(set.get(3).unwrap().pos.x, 20.0);
        assert!(set.remove(1).is_none());
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut set = MobSet::new();
        set.insert(mob_at(7, MobType::Fighter, 1.0, 1.0));
        set.insert(mob_at(7, MobType::Fighter, 2.0, 2.0));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(7).unwrap().pos.x, 2.0);
    }

    #[test]
    fn test_iter_type_filters() {
        let mut set = MobSet::new();
        set.insert(mob_at(1, MobType::Base, 0.0, 0.0));
        set.insert(mob_at(2, MobType::Fighter, 0.0, 0.0));
        set.insert(mob_at(3, MobType::Missile, 0.0, 0.0));
        set.insert(mob_at(4, MobType::PowerCore, 0.0, 0.0));

        assert_eq!(set.iter_type(MOB_FLAG_SHIP).count(), 2);
        assert_eq!(set.iter_type(MOB_FLAG_AMMO).count(), 2);
        assert_eq!(set.iter_type(MOB_FLAG_POWER_CORE).count(), 1);
        assert_eq!(set.iter_type(MOB_FLAG_ALL).count(), 4);
    }

    #[test]
    fn test_find_closest_and_nth() {
        let mut set = MobSet::new();
        set.insert(mob_at(1, MobType::Fighter, 10.0, 0.0));
        set.insert(mob_at(2, MobType::Fighter, 5.0, 0.0));
        set.insert(mob_at(3, MobType::Fighter, 20.0, 0.0));
        set.insert(mob_at(4, MobType::Base, 1.0, 0.0));

        let origin = Point::new(0.0, 0.0);
        assert_eq!(set.find_closest(&origin, MOB_FLAG_FIGHTER).unwrap().mobid, 2);
        assert_eq!(set.find_closest(&origin, MOB_FLAG_SHIP).unwrap().mobid, 4);
        assert_eq!(
            set.find_nth_closest(&origin, MOB_FLAG_FIGHTER, 1).unwrap().mobid,
            1
        );
        assert!(set.find_nth_closest(&origin, MOB_FLAG_FIGHTER, 3).is_none());

        assert!(set
            .find_closest_in_range(&origin, MOB_FLAG_FIGHTER, 4.0)
            .is_none());
        assert_eq!(
            set.find_closest_in_range(&origin, MOB_FLAG_FIGHTER, 5.0)
                .unwrap()
                .mobid,
            2
        );
    }

    #[test]
    fn test_masking() {
        let mut mob = mob_at(9, MobType::Fighter, 50.0, 50.0);
        mob.scanned_by.set(2);
        mob.remove_mob = true;
        mob.cmd.target = Point::new(99.0, 99.0);
        mob.cmd.spawn_type = Some(MobType::Missile);
        mob.fuel = 17;

        let ai = mob.masked_for_ai();
        assert!(ai.scanned_by.is_empty());
        assert!(!ai.remove_mob);
        assert_eq!(ai.cmd, mob.cmd, "owner view preserves commands");

        let sensed = mob.masked_for_sensor();
        assert_eq!(sensed.cmd.target, sensed.pos, "sensor view hides commands");
        assert_eq!(sensed.cmd.spawn_type, None);
        assert_eq!(sensed.fuel, 0);
        assert_eq!(sensed.mobid, mob.mobid, "identity is preserved");
    }
}

//! Controller contract and per-fleet AI context.
//!
//! The mob record itself carries no controller state; each fleet owns an
//! arena of opaque per-mob handles keyed by mobid. Handles are created by
//! `mob_spawned`, handed back by `mob_destroyed`, and never cross fleets.

use std::any::Any;
use std::collections::HashMap;

use armada_core::mob::{Mob, MobId, MobSet};
use armada_core::scenario::{BattleParams, BattlePlayer, PlayerId};

/// Opaque per-mob controller state.
pub type MobHandle = Box<dyn Any + Send>;

/// Arena of per-mob controller state: slot storage plus a mobid -> slot map.
#[derive(Default)]
pub struct MobStateTable {
    slots: Vec<Option<MobHandle>>,
    index: HashMap<MobId, usize>,
    free: Vec<usize>,
}

impl MobStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Store `handle` for `mobid`, replacing any previous handle.
    pub fn insert(&mut self, mobid: MobId, handle: MobHandle) {
        if let Some(&slot) = self.index.get(&mobid) {
            self.slots[slot] = Some(handle);
            return;
        }
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(handle);
                slot
            }
            None => {
                self.slots.push(Some(handle));
                self.slots.len() - 1
            }
        };
        self.index.insert(mobid, slot);
    }

    pub fn get(&self, mobid: MobId) -> Option<&MobHandle> {
        self.index
            .get(&mobid)
            .and_then(|&slot| self.slots[slot].as_ref())
    }

    pub fn get_mut(&mut self, mobid: MobId) -> Option<&mut MobHandle> {
        match self.index.get(&mobid) {
            Some(&slot) => self.slots[slot].as_mut(),
            None => None,
        }
    }

    pub fn remove(&mut self, mobid: MobId) -> Option<MobHandle> {
        let slot = self.index.remove(&mobid)?;
        self.free.push(slot);
        self.slots[slot].take()
    }
}

/// Per-player context block handed to a controller each tick.
///
/// `mobs` and `sensors` are masked copies owned by the dispatch layer;
/// controllers write commands into `mobs` and never see the raw world.
pub struct FleetAI {
    pub id: PlayerId,
    pub params: BattleParams,
    pub player: BattlePlayer,
    /// Seed for the controller's private RNG stream.
    pub seed: u64,
    pub tick: u32,
    pub credits: i32,
    pub mobs: MobSet,
    pub sensors: MobSet,
    pub mob_state: MobStateTable,
}

impl FleetAI {
    pub fn new(id: PlayerId, params: BattleParams, player: BattlePlayer, seed: u64) -> Self {
        Self {
            id,
            params,
            player,
            seed,
            tick: 0,
            credits: 0,
            mobs: MobSet::new(),
            sensors: MobSet::new(),
            mob_state: MobStateTable::new(),
        }
    }
}

/// The contract every fleet controller implements.
///
/// Construction happens once per battle through
/// [`controllers::create`](crate::controllers::create) (the controller reads
/// its configuration registry there); teardown is `Drop`. Population
/// mutation is dispatched by type through
/// [`controllers::mutate_fleet`](crate::controllers::mutate_fleet) since it
/// runs without a live controller instance.
pub trait FleetController: Send {
    /// Called every tick during AI dispatch; writes commands into `ai.mobs`.
    fn run_tick(&mut self, ai: &mut FleetAI);

    /// Called once per owned mob on its birth tick. The returned handle is
    /// stored in the fleet's [`MobStateTable`].
    fn mob_spawned(&mut self, _mob: &Mob) -> Option<MobHandle> {
        None
    }

    /// Called once per owned mob after it dies (and for survivors when the
    /// battle is torn down), with any handle `mob_spawned` returned.
    fn mob_destroyed(&mut self, _mob: &Mob, _state: Option<MobHandle>) {}
}

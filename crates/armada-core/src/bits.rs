//! Per-player bit flags, used for the `scanned_by` bitmap.

use serde::{Deserialize, Serialize};

use crate::scenario::PlayerId;

/// A set of player indices packed into a u32. Supports at most
/// [`crate::constants::MAX_PLAYERS`] players.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerMask(u32);

impl PlayerMask {
    pub const EMPTY: PlayerMask = PlayerMask(0);

    pub fn set(&mut self, player: PlayerId) {
        debug_assert!((player as usize) < crate::constants::MAX_PLAYERS);
        self.0 |= 1 << player;
    }

    pub fn get(&self, player: PlayerId) -> bool {
        debug_assert!((player as usize) < crate::constants::MAX_PLAYERS);
        self.0 & (1 << player) != 0
    }

    pub fn reset(&mut self, player: PlayerId) {
        debug_assert!((player as usize) < crate::constants::MAX_PLAYERS);
        self.0 &= !(1 << player);
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Iterate the set player indices in increasing order.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        let bits = self.0;
        (0..crate::constants::MAX_PLAYERS as u8).filter(move |p| bits & (1 << p) != 0)
    }
}

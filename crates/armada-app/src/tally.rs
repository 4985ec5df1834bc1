//! Winner tallying.
//!
//! The final summary depends only on the multiset of results, never on
//! their completion order; the driver records them after all workers exit.

use armada_core::scenario::{BattleStatus, PlayerUid, PLAYER_UID_NEUTRAL};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WinnerData {
    pub battles: u64,
    pub battle_ticks: u64,
    pub wins: u64,
    pub win_ticks: u64,
    pub losses: u64,
    pub loss_ticks: u64,
    pub draws: u64,
    pub draw_ticks: u64,
}

impl WinnerData {
    /// Credit one finished battle to this player's record.
    ///
    /// The neutral player "wins" draws, so its wins column counts the
    /// drawn battles of the whole run.
    pub fn record(&mut self, puid: PlayerUid, status: &BattleStatus) {
        let ticks = status.tick as u64;
        if puid == status.winner_uid {
            self.wins += 1;
            self.win_ticks += ticks;
        } else if status.winner_uid == PLAYER_UID_NEUTRAL {
            self.draws += 1;
            self.draw_ticks += ticks;
        } else {
            self.losses += 1;
            self.loss_ticks += ticks;
        }
        self.battles += 1;
        self.battle_ticks += ticks;

        debug_assert_eq!(self.wins + self.losses + self.draws, self.battles);
        debug_assert_eq!(
            self.win_ticks + self.loss_ticks + self.draw_ticks,
            self.battle_ticks
        );
    }

    pub fn summary_line(&self) -> String {
        let percent = if self.battles > 0 {
            100.0 * self.wins as f64 / self.battles as f64
        } else {
            0.0
        };
        format!(
            "\t{:3} wins, {:3} losses, {:3} draws => {:4.1}% wins",
            self.wins, self.losses, self.draws, percent
        )
    }
}

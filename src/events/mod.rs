//! Game events.
//!
//! The rules engine reports what happened during a transition as a list of
//! `GameEvent`s. Presentation code consumes them (sound, flashing dice,
//! score popups); the game itself never depends on them.
//!
//! `CelebrationHook` is the notification hook for five-of-a-kind rolls.
//! It fires at most once per distinct five-of-a-kind roll between commits.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CellRef, Roll};

/// Events produced by one transition. Most transitions produce one or two.
pub type EventBatch = SmallVec<[GameEvent; 2]>;

/// Something that happened during a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Dice were rolled (manually or at round start).
    RollFinished {
        roll: Roll,
        rolls_left: u8,
    },
    /// A five-of-a-kind roll not celebrated yet.
    Celebration {
        roll: Roll,
    },
    /// A score was written to a cell.
    ScoreCommitted {
        cell: CellRef,
        score: u32,
    },
    /// The last commit was reverted.
    ChoiceUndone {
        cell: CellRef,
    },
    /// A new round began.
    RoundStarted {
        round: u32,
    },
    /// The last cell was filled.
    GameFinished {
        grand_total: u32,
    },
    /// The game was reset.
    GameReset,
}

/// Receives celebration notifications.
///
/// Implemented for any `FnMut(&Roll)`.
pub trait CelebrationHook {
    /// A five-of-a-kind roll just landed.
    fn celebrate(&mut self, roll: &Roll);
}

impl<F: FnMut(&Roll)> CelebrationHook for F {
    fn celebrate(&mut self, roll: &Roll) {
        self(roll)
    }
}

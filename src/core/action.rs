//! Player actions.
//!
//! Every UI event maps to exactly one `Action`, dispatched through
//! `RulesEngine::apply`. Applied actions are recorded as `ActionRecord`s
//! in the state's history.

use serde::{Deserialize, Serialize};

use super::category::Category;

/// A single (column, category) scorecard cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    /// Column index (0-based).
    pub column: usize,
    /// Category row.
    pub category: Category,
}

impl CellRef {
    /// Create a cell reference.
    #[must_use]
    pub const fn new(column: usize, category: Category) -> Self {
        Self { column, category }
    }
}

impl std::fmt::Display for CellRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "column {} / {}", self.column + 1, self.category)
    }
}

/// A game action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Resample every die not held.
    Roll,
    /// Flip whether a die position is held.
    ToggleHold(usize),
    /// Write the current roll's score into a cell.
    Commit(CellRef),
    /// Revert the most recent commit.
    Undo,
    /// Acknowledge the commit and open the next round with an automatic roll.
    NextRound,
    /// Discard the game and start over.
    NewGame,
}

impl Action {
    /// Commit to `category` in `column`.
    #[must_use]
    pub const fn commit(column: usize, category: Category) -> Self {
        Action::Commit(CellRef::new(column, category))
    }
}

/// A recorded action with its position in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The action taken.
    pub action: Action,

    /// Round number when the action was taken (starts at 1).
    pub round: u32,

    /// Sequence number within the game (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(action: Action, round: u32, sequence: u32) -> Self {
        Self {
            action,
            round,
            sequence,
        }
    }
}

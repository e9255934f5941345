//! Game state: dice, holds, round progress and the three-column scorecard.
//!
//! ## GameState
//!
//! A plain value. The rules engine never mutates a state in place; every
//! transition clones the previous value and returns the next one. Cloning
//! is cheap: the only heap data is the action history, an `im::Vector`.
//!
//! ## Column
//!
//! Thirteen optional cells, one per category. `None` means unfilled.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionRecord, CellRef};
use super::category::{Category, CATEGORY_COUNT};
use super::dice::{HeldMask, Roll};

/// Columns on the scorecard.
pub const COLUMN_COUNT: usize = 3;

/// Cells on the whole scorecard.
pub const CELL_COUNT: usize = COLUMN_COUNT * CATEGORY_COUNT;

/// Where the current round stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Rolls remain; the player may roll (or commit once a roll exists).
    AwaitingRoll,
    /// No rolls remain; the player must commit.
    MustChoose,
    /// A cell was just committed; waiting for next round or undo.
    AwaitingNextRound,
    /// Every cell on every column is filled.
    Finished,
}

/// One scorecard column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    cells: [Option<u32>; CATEGORY_COUNT],
}

impl Column {
    /// An unfilled column.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [None; CATEGORY_COUNT],
        }
    }

    /// A column with the given cells filled.
    #[must_use]
    pub fn from_scores(scores: &[(Category, u32)]) -> Self {
        let mut column = Self::new();
        for &(category, score) in scores {
            column.cells[category.index()] = Some(score);
        }
        column
    }

    /// Score in a cell, `None` if unfilled.
    #[must_use]
    pub fn get(&self, category: Category) -> Option<u32> {
        self.cells[category.index()]
    }

    /// Score in a cell, unfilled counted as 0.
    #[must_use]
    pub fn value(&self, category: Category) -> u32 {
        self.get(category).unwrap_or(0)
    }

    /// Is the cell filled?
    #[must_use]
    pub fn is_filled(&self, category: Category) -> bool {
        self.get(category).is_some()
    }

    /// Number of filled cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Are all 13 cells filled?
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Iterate `(category, score)` in scorecard order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, Option<u32>)> + '_ {
        Category::ALL.iter().map(move |&c| (c, self.get(c)))
    }

    pub(crate) fn set(&mut self, category: Category, score: u32) {
        self.cells[category.index()] = Some(score);
    }

    pub(crate) fn clear(&mut self, category: Category) {
        self.cells[category.index()] = None;
    }
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) dice: Roll,
    pub(crate) held: HeldMask,
    pub(crate) rolls_left: u8,
    pub(crate) has_rolled: bool,
    pub(crate) phase: Phase,
    pub(crate) columns: [Column; COLUMN_COUNT],

    /// Most recent commit, revertible by `Undo`.
    pub(crate) last_choice: Option<CellRef>,
    /// The last action was an undo.
    pub(crate) undone: bool,
    /// The current roll is five-of-a-kind (drives the flashing dice).
    pub(crate) yahtzee: bool,
    /// Five-of-a-kind roll already celebrated since the last commit/reset.
    pub(crate) last_celebrated: Option<Roll>,

    /// Round number (starts at 1).
    pub(crate) round: u32,
    pub(crate) history: Vector<ActionRecord>,
    action_sequence: u32,
}

impl GameState {
    /// A fresh game: initial dice, nothing held, every cell unfilled.
    #[must_use]
    pub fn new(rolls_per_round: u8) -> Self {
        Self {
            dice: Roll::initial(),
            held: HeldMask::empty(),
            rolls_left: rolls_per_round,
            has_rolled: false,
            phase: Phase::AwaitingRoll,
            columns: [Column::new(); COLUMN_COUNT],
            last_choice: None,
            undone: false,
            yahtzee: false,
            last_celebrated: None,
            round: 1,
            history: Vector::new(),
            action_sequence: 0,
        }
    }

    /// Current dice.
    #[must_use]
    pub fn dice(&self) -> Roll {
        self.dice
    }

    /// Held positions.
    #[must_use]
    pub fn held(&self) -> HeldMask {
        self.held
    }

    /// Rolls remaining this round.
    #[must_use]
    pub fn rolls_left(&self) -> u8 {
        self.rolls_left
    }

    /// Has at least one roll happened since the game (or round) started?
    #[must_use]
    pub fn has_rolled(&self) -> bool {
        self.has_rolled
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// All three columns.
    #[must_use]
    pub fn columns(&self) -> &[Column; COLUMN_COUNT] {
        &self.columns
    }

    /// One column, `None` if out of range.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Score in a cell, `None` if unfilled or out of range.
    #[must_use]
    pub fn cell(&self, cell: CellRef) -> Option<u32> {
        self.column(cell.column).and_then(|c| c.get(cell.category))
    }

    /// The commit that `Undo` would revert.
    #[must_use]
    pub fn last_choice(&self) -> Option<CellRef> {
        self.last_choice
    }

    /// Was the last action an undo?
    #[must_use]
    pub fn undone(&self) -> bool {
        self.undone
    }

    /// Is the current roll a yahtzee that has not been committed yet?
    #[must_use]
    pub fn yahtzee(&self) -> bool {
        self.yahtzee
    }

    /// Five-of-a-kind roll already celebrated.
    #[must_use]
    pub fn last_celebrated(&self) -> Option<Roll> {
        self.last_celebrated
    }

    /// Round number (starts at 1).
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Applied actions, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Number of filled cells across all columns.
    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.columns.iter().map(Column::filled_count).sum()
    }

    /// Are all 39 cells filled?
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.columns.iter().all(Column::is_full)
    }

    /// Check the cross-field invariants a decoded state can break.
    pub(crate) fn check(&self) -> Result<(), &'static str> {
        if let Some(cell) = self.last_choice {
            if cell.column >= COLUMN_COUNT {
                return Err("last choice column out of range");
            }
            if self.cell(cell).is_none() {
                return Err("last choice refers to an empty cell");
            }
        }
        Ok(())
    }

    /// Append an applied action to the history.
    pub(crate) fn record(&mut self, action: Action) {
        let seq = self.action_sequence;
        self.action_sequence = self.action_sequence.saturating_add(1);
        self.history.push_back(ActionRecord::new(action, self.round, seq));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(3);

        assert_eq!(state.dice(), Roll::initial());
        assert!(state.held().is_empty());
        assert_eq!(state.rolls_left(), 3);
        assert!(!state.has_rolled());
        assert_eq!(state.phase(), Phase::AwaitingRoll);
        assert_eq!(state.filled_cells(), 0);
        assert_eq!(state.round(), 1);
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_column_fill() {
        let mut column = Column::new();
        assert_eq!(column.get(Category::Fives), None);
        assert_eq!(column.value(Category::Fives), 0);

        column.set(Category::Fives, 15);
        assert_eq!(column.get(Category::Fives), Some(15));
        assert_eq!(column.filled_count(), 1);

        column.clear(Category::Fives);
        assert!(!column.is_filled(Category::Fives));
    }

    #[test]
    fn test_full_column() {
        let scores: Vec<_> = Category::ALL.iter().map(|&c| (c, 0)).collect();
        let column = Column::from_scores(&scores);
        assert!(column.is_full());
        assert_eq!(column.iter().count(), CATEGORY_COUNT);
    }

    #[test]
    fn test_cell_lookup() {
        let mut state = GameState::new(3);
        state.columns[1].set(Category::Chance, 22);

        assert_eq!(state.cell(CellRef::new(1, Category::Chance)), Some(22));
        assert_eq!(state.cell(CellRef::new(0, Category::Chance)), None);
        assert_eq!(state.cell(CellRef::new(5, Category::Chance)), None);
    }

    #[test]
    fn test_record_sequence() {
        let mut state = GameState::new(3);
        state.record(Action::Roll);
        state.record(Action::ToggleHold(1));

        let seqs: Vec<_> = state.history().iter().map(|r| r.sequence).collect();
        assert_eq!(seqs, vec![0, 1]);
        assert!(state.history().iter().all(|r| r.round == 1));
    }

    #[test]
    fn test_check_last_choice() {
        let mut state = GameState::new(3);
        assert!(state.check().is_ok());

        let cell = CellRef::new(1, Category::Twos);
        state.columns[1].set(Category::Twos, 4);
        state.last_choice = Some(cell);
        assert!(state.check().is_ok());

        state.last_choice = Some(CellRef::new(1, Category::Threes));
        assert!(state.check().is_err());

        state.last_choice = Some(CellRef::new(9, Category::Twos));
        assert!(state.check().is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let state = GameState::new(3);
        let mut next = state.clone();
        next.columns[0].set(Category::Ones, 3);
        next.record(Action::Roll);

        assert_eq!(state.filled_cells(), 0);
        assert!(state.history().is_empty());
        assert_ne!(state, next);
    }
}

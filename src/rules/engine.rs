//! Rules engine: the round state machine.
//!
//! `apply` is the single update entry point. It takes the current state by
//! reference and returns the next state value; the input is never touched.
//! Illegal actions are not errors: they come back with `applied == false`
//! and the state unchanged.

use tracing::debug;

use crate::core::{
    Action, CellRef, GameConfig, GameState, Phase, Randomizer, Roll, Category, COLUMN_COUNT,
    DICE_COUNT,
};
use crate::events::{EventBatch, GameEvent};
use crate::scoring::{grand_total, score_for};

/// Result of applying an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The next state (equal to the input when the action was ignored).
    pub state: GameState,
    /// Whether the action was legal and took effect.
    pub applied: bool,
    /// What happened, in order.
    pub events: EventBatch,
}

impl Transition {
    fn ignored(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            applied: false,
            events: EventBatch::new(),
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `is_legal`: Must agree with `apply` (legal iff applied)
/// - `apply`: Deterministic given the randomizer's draws
/// - `legal_actions`: Default implementation filters every candidate action
pub trait RulesEngine {
    /// Get the game configuration.
    fn config(&self) -> &GameConfig;

    /// State at the start of a game.
    fn initial_state(&self) -> GameState;

    /// Would `apply` accept this action?
    fn is_legal(&self, state: &GameState, action: Action) -> bool;

    /// Apply an action, producing the next state.
    fn apply(&self, state: &GameState, action: Action, rng: &mut dyn Randomizer) -> Transition;

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> bool {
        state.phase() == Phase::Finished
    }

    // === Convenience Methods ===

    /// Enumerate all legal actions.
    fn legal_actions(&self, state: &GameState) -> Vec<Action> {
        let mut candidates = vec![Action::Roll];
        candidates.extend((0..DICE_COUNT).map(Action::ToggleHold));
        for column in 0..COLUMN_COUNT {
            candidates.extend(Category::ALL.iter().map(|&c| Action::commit(column, c)));
        }
        candidates.extend([Action::Undo, Action::NextRound, Action::NewGame]);

        candidates
            .into_iter()
            .filter(|&a| self.is_legal(state, a))
            .collect()
    }
}

/// Triple-column Knuffel rules.
#[derive(Clone, Debug, Default)]
pub struct KnuffelRules {
    config: GameConfig,
}

impl KnuffelRules {
    /// Create the rules from a configuration.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    fn rolls_per_round(&self) -> u8 {
        self.config.rules.rolls_per_round
    }

    /// Phase while a round is in progress and nothing is committed.
    fn rolling_phase(state: &GameState) -> Phase {
        if state.rolls_left > 0 {
            Phase::AwaitingRoll
        } else {
            Phase::MustChoose
        }
    }

    /// Round is open: not waiting for acknowledgment, not finished.
    fn round_open(state: &GameState) -> bool {
        matches!(state.phase, Phase::AwaitingRoll | Phase::MustChoose)
    }

    /// Bookkeeping shared by manual rolls and the round-opening roll.
    fn finish_roll(next: &mut GameState, events: &mut EventBatch) {
        next.has_rolled = true;
        next.phase = Self::rolling_phase(next);
        next.yahtzee = next.dice.is_five_of_a_kind();
        events.push(GameEvent::RollFinished {
            roll: next.dice,
            rolls_left: next.rolls_left,
        });

        if next.yahtzee && next.last_celebrated != Some(next.dice) {
            next.last_celebrated = Some(next.dice);
            events.push(GameEvent::Celebration { roll: next.dice });
        }
    }

    fn commit(next: &mut GameState, cell: CellRef, events: &mut EventBatch) {
        let score = score_for(cell.category, &next.dice);
        next.columns[cell.column].set(cell.category, score);
        next.undone = false;
        next.yahtzee = false;
        next.last_celebrated = None;
        events.push(GameEvent::ScoreCommitted { cell, score });

        if next.is_full() {
            next.phase = Phase::Finished;
            next.last_choice = None;
            events.push(GameEvent::GameFinished {
                grand_total: grand_total(&next.columns),
            });
        } else {
            next.phase = Phase::AwaitingNextRound;
            next.last_choice = Some(cell);
        }
    }
}

impl RulesEngine for KnuffelRules {
    fn config(&self) -> &GameConfig {
        &self.config
    }

    fn initial_state(&self) -> GameState {
        GameState::new(self.rolls_per_round())
    }

    fn is_legal(&self, state: &GameState, action: Action) -> bool {
        match action {
            Action::Roll => Self::round_open(state) && state.rolls_left > 0,
            Action::ToggleHold(position) => {
                position < DICE_COUNT
                    && state.has_rolled
                    && state.rolls_left > 0
                    && Self::round_open(state)
            }
            Action::Commit(cell) => {
                state.has_rolled
                    && Self::round_open(state)
                    && cell.column < COLUMN_COUNT
                    && state.cell(cell).is_none()
            }
            Action::Undo => {
                state.phase == Phase::AwaitingNextRound && state.last_choice.is_some()
            }
            Action::NextRound => state.phase == Phase::AwaitingNextRound,
            Action::NewGame => true,
        }
    }

    fn apply(&self, state: &GameState, action: Action, rng: &mut dyn Randomizer) -> Transition {
        if !self.is_legal(state, action) {
            debug!(?action, phase = ?state.phase, rolls_left = state.rolls_left, "ignored illegal action");
            return Transition::ignored(state);
        }

        let mut events = EventBatch::new();
        let mut next = state.clone();

        match action {
            Action::Roll => {
                next.dice = next.dice.reroll(next.held, rng);
                next.rolls_left -= 1;
                Self::finish_roll(&mut next, &mut events);
            }
            Action::ToggleHold(position) => {
                next.held = next.held.toggled(position);
            }
            Action::Commit(cell) => {
                Self::commit(&mut next, cell, &mut events);
            }
            Action::Undo => {
                if let Some(cell) = next.last_choice.take() {
                    next.columns[cell.column].clear(cell.category);
                    next.undone = true;
                    next.phase = Self::rolling_phase(&next);
                    events.push(GameEvent::ChoiceUndone { cell });
                }
            }
            Action::NextRound => {
                next.held = Default::default();
                next.last_choice = None;
                next.undone = false;
                next.round = next.round.saturating_add(1);
                events.push(GameEvent::RoundStarted { round: next.round });

                // The opening roll of a round uses one of its rolls.
                next.dice = Roll::roll_all(rng);
                next.rolls_left = self.rolls_per_round().saturating_sub(1);
                Self::finish_roll(&mut next, &mut events);
            }
            Action::NewGame => {
                // A fresh game starts with an empty history.
                next = self.initial_state();
                events.push(GameEvent::GameReset);
            }
        }

        if action != Action::NewGame {
            next.record(action);
        }
        debug!(
            ?action,
            round = next.round,
            phase = ?next.phase,
            dice = %next.dice,
            rolls_left = next.rolls_left,
            "applied action"
        );

        Transition {
            state: next,
            applied: true,
            events,
        }
    }
}

//! Game session: the piece a front end talks to.
//!
//! A `Session` owns the current `GameState`, the dice randomizer and the
//! rules, and feeds actions through `RulesEngine::apply`. On top of that it
//! provides what a screen needs:
//!
//! - status prompt and roll button label
//! - cosmetic roll animation frames
//! - the celebration hook for five-of-a-kind rolls
//! - saving the final score once per game
//! - binary snapshots to resume a game later

pub mod animation;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::{
    Action, Category, CellRef, ConfigError, GameConfig, GameRng, GameRngState, GameState, Phase,
    Randomizer, Roll,
};
use crate::events::{CelebrationHook, EventBatch, GameEvent};
use crate::persistence::{PersistenceError, ScoreEntry, ScorePersistence};
use crate::rules::{KnuffelRules, RulesEngine};
use crate::scoring::{column_totals, grand_total, ColumnTotals};

pub use animation::RollAnimation;

/// Context name of the cosmetic animation stream.
const ANIMATION_CONTEXT: &str = "animation";

/// Snapshot encode/decode failures.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("inconsistent snapshot: {0}")]
    Invalid(&'static str),
}

/// One player's game.
pub struct Session<R: Randomizer = GameRng> {
    rules: KnuffelRules,
    state: GameState,
    rng: R,
    animation: RollAnimation,
    animation_rng: GameRng,
    hook: Option<Box<dyn CelebrationHook>>,
    last_events: EventBatch,
    saved: bool,
}

impl<R: Randomizer> std::fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("saved", &self.saved)
            .field("has_hook", &self.hook.is_some())
            .finish_non_exhaustive()
    }
}

impl Session<GameRng> {
    /// New game with seeded dice.
    #[must_use]
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let rng = GameRng::new(seed);
        let animation_rng = rng.for_context(ANIMATION_CONTEXT);
        Self::build(config, rng, animation_rng)
    }

    /// Serialize the game and dice position.
    pub fn snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        let snapshot = SessionSnapshot {
            state: self.state.clone(),
            rng: self.rng.state(),
            animation_rng: self.animation_rng.state(),
            saved: self.saved,
        };
        Ok(bincode::serialize(&snapshot)?)
    }

    /// Resume a game from `snapshot` bytes.
    ///
    /// The resumed session rolls exactly the dice the original would have.
    /// Dice faces outside `1..=6` and an undo record pointing off the
    /// scorecard are rejected.
    pub fn restore(config: GameConfig, bytes: &[u8]) -> Result<Self, SnapshotError> {
        config.validate()?;
        let snapshot: SessionSnapshot = bincode::deserialize(bytes)?;
        snapshot.state.check().map_err(SnapshotError::Invalid)?;

        let mut session = Self::build(
            config,
            GameRng::from_state(&snapshot.rng),
            GameRng::from_state(&snapshot.animation_rng),
        );
        session.state = snapshot.state;
        session.saved = snapshot.saved;
        Ok(session)
    }
}

#[derive(Serialize, Deserialize)]
struct SessionSnapshot {
    state: GameState,
    rng: GameRngState,
    animation_rng: GameRngState,
    saved: bool,
}

impl<R: Randomizer> Session<R> {
    /// New game with a caller-supplied randomizer (scripted dice, replays).
    #[must_use]
    pub fn with_randomizer(config: GameConfig, rng: R) -> Self {
        Self::build(config, rng, GameRng::new(0).for_context(ANIMATION_CONTEXT))
    }

    fn build(config: GameConfig, rng: R, animation_rng: GameRng) -> Self {
        let rules = KnuffelRules::new(config);
        let state = rules.initial_state();
        let animation = RollAnimation::new(&rules.config().animation);
        Self {
            rules,
            state,
            rng,
            animation,
            animation_rng,
            hook: None,
            last_events: EventBatch::new(),
            saved: false,
        }
    }

    /// Called for every five-of-a-kind celebration.
    pub fn set_celebration_hook<H: CelebrationHook + 'static>(&mut self, hook: H) {
        self.hook = Some(Box::new(hook));
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Rules in use.
    #[must_use]
    pub fn rules(&self) -> &KnuffelRules {
        &self.rules
    }

    /// Events of the most recent dispatch (empty if it was ignored).
    #[must_use]
    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    /// Apply an action. Returns whether it took effect.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let transition = self.rules.apply(&self.state, action, &mut self.rng);

        if transition.applied {
            if action == Action::NewGame {
                self.saved = false;
            }
            if let Some(hook) = self.hook.as_mut() {
                for event in &transition.events {
                    if let GameEvent::Celebration { roll } = event {
                        hook.celebrate(roll);
                    }
                }
            }
            self.state = transition.state;
        }

        self.last_events = transition.events;
        transition.applied
    }

    /// Roll the dice that are not held.
    pub fn roll(&mut self) -> bool {
        self.dispatch(Action::Roll)
    }

    /// Hold or release the die at `position`.
    pub fn toggle_hold(&mut self, position: usize) -> bool {
        self.dispatch(Action::ToggleHold(position))
    }

    /// Score the current dice in `category` of `column`.
    pub fn commit(&mut self, column: usize, category: Category) -> bool {
        self.dispatch(Action::Commit(CellRef::new(column, category)))
    }

    /// Take back the last commit.
    pub fn undo(&mut self) -> bool {
        self.dispatch(Action::Undo)
    }

    /// Start the next round with an automatic roll.
    pub fn next_round(&mut self) -> bool {
        self.dispatch(Action::NextRound)
    }

    /// Discard this game and start a fresh one.
    pub fn new_game(&mut self) -> bool {
        self.dispatch(Action::NewGame)
    }

    /// Roll with the tumbling animation.
    ///
    /// Returns the frames to show, one per tick, ending with the real roll.
    /// Empty when rolling is not allowed.
    pub fn roll_animated(&mut self) -> Vec<Roll> {
        if !self.rules.is_legal(&self.state, Action::Roll) {
            return Vec::new();
        }

        let mut frames =
            self.animation
                .frames(self.state.dice(), self.state.held(), &mut self.animation_rng);
        self.roll();
        frames.push(self.state.dice());
        frames
    }

    /// Frame timing of `roll_animated`.
    #[must_use]
    pub fn animation(&self) -> &RollAnimation {
        &self.animation
    }

    /// Status prompt shown above the dice.
    #[must_use]
    pub fn message(&self) -> &'static str {
        let state = &self.state;
        match state.phase() {
            Phase::Finished => "Game over",
            Phase::AwaitingNextRound => "Next round, roll the dice",
            _ if state.undone() => "Choice undone, record your points",
            Phase::MustChoose => "Record your points",
            _ if !state.has_rolled() => "Roll the dice",
            _ => "Tap a die to hold it",
        }
    }

    /// Label for the roll button, `None` when rolling is not allowed.
    #[must_use]
    pub fn roll_label(&self) -> Option<&'static str> {
        if !self.rules.is_legal(&self.state, Action::Roll) {
            return None;
        }

        let max = self.rules.config().rules.rolls_per_round;
        let left = self.state.rolls_left();
        let label = if left == 1 {
            "Last roll"
        } else if left >= max {
            "First roll"
        } else if max - left == 1 {
            "Second roll"
        } else {
            "Next roll"
        };
        Some(label)
    }

    /// Totals of every column.
    #[must_use]
    pub fn totals(&self) -> Vec<ColumnTotals> {
        self.state.columns().iter().map(column_totals).collect()
    }

    /// Weighted total across the columns.
    #[must_use]
    pub fn grand_total(&self) -> u32 {
        grand_total(self.state.columns())
    }

    /// Whether this game's score was already saved.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Save the final score under `name`. Allowed once per finished game.
    pub fn save_score(
        &mut self,
        store: &mut dyn ScorePersistence,
        name: &str,
    ) -> Result<ScoreEntry, PersistenceError> {
        if self.state.phase() != Phase::Finished {
            return Err(PersistenceError::Rejected("game is not finished".to_string()));
        }
        if self.saved {
            return Err(PersistenceError::Rejected(
                "score for this game already saved".to_string(),
            ));
        }

        let entry = store.append(name, self.grand_total())?;
        self.saved = true;
        info!(name = %entry.name, score = entry.score, "game score saved");
        Ok(entry)
    }
}

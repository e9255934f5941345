//! # knuffel
//!
//! Rules engine for Knuffel, a Yahtzee variant played on a three-column
//! scorecard, plus local and remote high-score storage.
//!
//! ## Design Principles
//!
//! 1. **State Values**: `GameState` is a plain value. Every action produces
//!    the next state through `RulesEngine::apply`; nothing mutates in place.
//!
//! 2. **Total Operations**: Illegal actions are ignored, never errors.
//!    Scoring is a pure function of a roll and a category.
//!
//! 3. **Pluggable Edges**: Dice come from a `Randomizer`, celebrations go to
//!    a `CelebrationHook`, scores go to a `ScorePersistence`.
//!
//! ## Scoring
//!
//! Each column scores like a classic Yahtzee sheet (upper bonus of 35 at
//! 63 or more). The grand total weights the columns 1, 2 and 3.
//!
//! ## Modules
//!
//! - `core`: dice, categories, RNG, configuration, actions, state
//! - `scoring`: category scores and column/grand totals
//! - `rules`: `RulesEngine` trait and the round state machine
//! - `events`: transition events and the celebration hook
//! - `session`: front-end driver with prompts, animation and snapshots
//! - `persistence`: local high scores and the remote leaderboard
//!
//! ```
//! use knuffel::{Category, GameConfig, Session};
//!
//! let mut session = Session::new(GameConfig::default(), 42);
//! assert!(session.roll());
//! assert!(session.commit(0, Category::Chance));
//! assert_eq!(session.grand_total(), session.state().dice().sum());
//! ```

pub mod core;
pub mod events;
pub mod persistence;
pub mod rules;
pub mod scoring;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, AnimationConfig, Category, CellRef, Column, ConfigError, GameConfig,
    GameRng, GameRngState, GameState, HeldMask, HighScoreConfig, LeaderboardConfig, Phase,
    Randomizer, Roll, RulesConfig, ScriptedDice, Section,
};

pub use crate::scoring::{column_totals, grand_total, score_for, scores_for_roll, ColumnTotals};

pub use crate::rules::{KnuffelRules, RulesEngine, Transition};

pub use crate::events::{CelebrationHook, EventBatch, GameEvent};

pub use crate::session::{RollAnimation, Session, SnapshotError};

pub use crate::persistence::{
    Clock, LeaderboardBackend, LeaderboardClient, LeaderboardRow, LocalHighScores, ManualClock,
    MemoryBackend, PersistenceError, ScoreEntry, ScorePersistence, ScoreRow, SystemClock, UserId,
};

//! Core game types: dice, categories, state, actions, RNG, configuration.
//!
//! This module holds plain data. Rules live in `rules`, scoring in `scoring`.

pub mod dice;
pub mod category;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use dice::{HeldMask, InvalidFace, Roll, DICE_COUNT, FACES};
pub use category::{Category, Section, CATEGORY_COUNT};
pub use rng::{GameRng, GameRngState, Randomizer, ScriptedDice};
pub use config::{
    AnimationConfig, ConfigError, GameConfig, HighScoreConfig, LeaderboardConfig, RulesConfig,
};
pub use action::{Action, ActionRecord, CellRef};
pub use state::{Column, GameState, Phase, CELL_COUNT, COLUMN_COUNT};

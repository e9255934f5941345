//! Rules engine for the triple-column game.
//!
//! `RulesEngine` defines:
//! - Which actions are legal in a state
//! - How actions produce the next state
//! - When the game is over
//!
//! `KnuffelRules` is the implementation; presentation code drives it
//! through `Session` or directly via `apply`.

pub mod engine;

pub use engine::{KnuffelRules, RulesEngine, Transition};

//! Dice randomness.
//!
//! ## Key Features
//!
//! - **Pluggable**: the rules only see the `Randomizer` trait
//! - **Deterministic**: same seed produces identical dice
//! - **Serializable**: O(1) state capture and restore for snapshots
//! - **Context streams**: independent sequences for cosmetic draws
//!
//! ```
//! use knuffel::core::{GameRng, Randomizer};
//!
//! let mut rng = GameRng::new(42);
//! let face = rng.next_face();
//! assert!((1..=6).contains(&face));
//!
//! // Same seed, same dice
//! let mut again = GameRng::new(42);
//! assert_eq!(again.next_face(), face);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::dice::FACES;

/// Source of die faces.
///
/// Implementations must return values in `1..=6`, uniformly distributed
/// with independent draws.
pub trait Randomizer {
    /// Draw one die face.
    fn next_face(&mut self) -> u8;
}

/// Deterministic dice RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed,
    /// and drawing from it never disturbs this RNG.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl Randomizer for GameRng {
    fn next_face(&mut self) -> u8 {
        self.inner.gen_range(1..=FACES)
    }
}

/// Serializable RNG state.
///
/// Uses the ChaCha8 word position so capture is O(1) regardless of how
/// many dice have been rolled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// Replays a fixed list of faces, cycling when exhausted.
///
/// Used for scripted games and replays.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    /// Create from a list of faces.
    ///
    /// # Panics
    /// Panics if `faces` is empty or contains a value outside `1..=6`.
    #[must_use]
    pub fn new(faces: Vec<u8>) -> Self {
        assert!(!faces.is_empty(), "scripted dice need at least one face");
        assert!(
            faces.iter().all(|f| (1..=FACES).contains(f)),
            "scripted faces must be in 1..=6"
        );
        Self { faces, next: 0 }
    }

    /// Number of faces drawn so far.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.next
    }
}

impl Randomizer for ScriptedDice {
    fn next_face(&mut self) -> u8 {
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        face
    }
}

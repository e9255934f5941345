//! Cosmetic roll animation.
//!
//! While the dice "tumble", unheld dice show random faces every tick. The
//! frames come from their own randomizer so the real dice stream never
//! depends on whether the animation ran.

use crate::core::{AnimationConfig, HeldMask, Randomizer, Roll};

/// Frame generator for one animated roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollAnimation {
    frame_count: usize,
    tick_ms: u32,
}

impl RollAnimation {
    #[must_use]
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            frame_count: config.frame_count(),
            tick_ms: config.tick_ms,
        }
    }

    /// Intermediate frames per roll.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Delay between frames.
    #[must_use]
    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    /// Intermediate rolls starting from `from`. Held dice keep their face.
    pub fn frames(&self, from: Roll, held: HeldMask, rng: &mut dyn Randomizer) -> Vec<Roll> {
        let mut current = from;
        (0..self.frame_count)
            .map(|_| {
                current = current.reroll(held, rng);
                current
            })
            .collect()
    }
}

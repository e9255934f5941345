//! Dice: the five-die roll and the set of held positions.
//!
//! ## Roll
//!
//! Ordered faces of exactly five dice, each in `1..=6`. Order matters only
//! for display and for which positions are held; scoring looks at counts.
//!
//! ## HeldMask
//!
//! Bit `i` set means die `i` keeps its face on the next roll.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rng::Randomizer;

/// Number of dice in a roll.
pub const DICE_COUNT: usize = 5;

/// Number of faces on a die.
pub const FACES: u8 = 6;

/// Faces shown before the first roll of a game.
pub const INITIAL_FACES: [u8; DICE_COUNT] = [1, 2, 3, 4, 5];

/// Five dice faces.
///
/// ```
/// use knuffel::core::Roll;
///
/// let roll = Roll::new([3, 3, 3, 3, 3]);
/// assert!(roll.is_five_of_a_kind());
/// assert_eq!(roll.sum(), 15);
/// assert_eq!(roll.count(3), 5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; DICE_COUNT]", into = "[u8; DICE_COUNT]")]
pub struct Roll([u8; DICE_COUNT]);

/// A die face outside `1..=6`.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
#[error("die face {0} is outside 1..=6")]
pub struct InvalidFace(pub u8);

impl TryFrom<[u8; DICE_COUNT]> for Roll {
    type Error = InvalidFace;

    fn try_from(faces: [u8; DICE_COUNT]) -> Result<Self, Self::Error> {
        match faces.iter().find(|f| !(1..=FACES).contains(*f)) {
            Some(&bad) => Err(InvalidFace(bad)),
            None => Ok(Self(faces)),
        }
    }
}

impl From<Roll> for [u8; DICE_COUNT] {
    fn from(roll: Roll) -> Self {
        roll.0
    }
}

impl Roll {
    /// Create a roll from five faces.
    ///
    /// # Panics
    /// Panics if any face is outside `1..=6`.
    #[must_use]
    pub fn new(faces: [u8; DICE_COUNT]) -> Self {
        assert!(
            faces.iter().all(|f| (1..=FACES).contains(f)),
            "die faces must be in 1..=6: {:?}",
            faces
        );
        Self(faces)
    }

    /// Roll shown at the start of a game, before anyone has rolled.
    #[must_use]
    pub const fn initial() -> Self {
        Self(INITIAL_FACES)
    }

    /// Roll all five dice.
    pub fn roll_all(rng: &mut dyn Randomizer) -> Self {
        Self::initial().reroll(HeldMask::empty(), rng)
    }

    /// Resample every position not in `held`; held positions keep their face.
    #[must_use]
    pub fn reroll(&self, held: HeldMask, rng: &mut dyn Randomizer) -> Self {
        let mut faces = self.0;
        for (i, face) in faces.iter_mut().enumerate() {
            if !held.contains(i) {
                *face = rng.next_face();
            }
        }
        Self::new(faces)
    }

    /// The faces in position order.
    #[must_use]
    pub const fn faces(&self) -> [u8; DICE_COUNT] {
        self.0
    }

    /// Face at a position.
    #[must_use]
    pub fn face(&self, position: usize) -> u8 {
        self.0[position]
    }

    /// Sum of all five faces.
    #[must_use]
    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&f| u32::from(f)).sum()
    }

    /// Face counts indexed by face value (index 0 unused).
    #[must_use]
    pub fn counts(&self) -> [u8; FACES as usize + 1] {
        let mut counts = [0u8; FACES as usize + 1];
        for &f in &self.0 {
            counts[f as usize] += 1;
        }
        counts
    }

    /// Number of dice showing `face`.
    #[must_use]
    pub fn count(&self, face: u8) -> u8 {
        self.0.iter().filter(|&&f| f == face).count() as u8
    }

    /// All five dice show the same face.
    #[must_use]
    pub fn is_five_of_a_kind(&self) -> bool {
        self.0.iter().all(|&f| f == self.0[0])
    }
}

impl Default for Roll {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Roll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e] = self.0;
        write!(f, "{}-{}-{}-{}-{}", a, b, c, d, e)
    }
}

/// Set of held die positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeldMask(u8);

impl HeldMask {
    /// No dice held.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build a mask from positions. Out-of-range positions are ignored.
    #[must_use]
    pub fn from_positions(positions: &[usize]) -> Self {
        positions
            .iter()
            .filter(|&&p| p < DICE_COUNT)
            .fold(Self::empty(), |mask, &p| Self(mask.0 | (1 << p)))
    }

    /// Is `position` held?
    #[must_use]
    pub fn contains(self, position: usize) -> bool {
        position < DICE_COUNT && (self.0 >> position) & 1 == 1
    }

    /// Flip membership of `position`.
    ///
    /// Returns the mask unchanged if the position is out of range.
    #[must_use]
    pub fn toggled(self, position: usize) -> Self {
        if position < DICE_COUNT {
            Self(self.0 ^ (1 << position))
        } else {
            self
        }
    }

    /// Number of held dice.
    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// No dice held?
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Held positions in ascending order.
    pub fn positions(self) -> impl Iterator<Item = usize> {
        (0..DICE_COUNT).filter(move |&p| self.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::ScriptedDice;

    #[test]
    fn test_counts() {
        let roll = Roll::new([2, 2, 3, 3, 3]);
        assert_eq!(roll.counts(), [0, 0, 2, 3, 0, 0, 0]);
        assert_eq!(roll.count(3), 3);
        assert_eq!(roll.sum(), 13);
    }

    #[test]
    #[should_panic(expected = "die faces must be in 1..=6")]
    fn test_rejects_bad_face() {
        let _ = Roll::new([0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_reroll_keeps_held_positions() {
        let roll = Roll::new([1, 2, 3, 4, 5]);
        let held = HeldMask::from_positions(&[0, 4]);
        let mut dice = ScriptedDice::new(vec![6, 6, 6]);

        let next = roll.reroll(held, &mut dice);
        assert_eq!(next.faces(), [1, 6, 6, 6, 5]);
    }

    #[test]
    fn test_held_mask_toggle() {
        let mask = HeldMask::empty().toggled(2).toggled(4);
        assert!(mask.contains(2));
        assert!(mask.contains(4));
        assert_eq!(mask.len(), 2);
        assert_eq!(mask.positions().collect::<Vec<_>>(), vec![2, 4]);

        let mask = mask.toggled(2);
        assert!(!mask.contains(2));

        // Out of range is a no-op
        assert_eq!(mask.toggled(7), mask);
        assert!(!mask.contains(7));
    }

    #[test]
    fn test_deserialize_checks_faces() {
        let roll: Roll = serde_json::from_str("[1,2,3,4,5]").unwrap();
        assert_eq!(roll, Roll::initial());
        assert_eq!(serde_json::to_string(&roll).unwrap(), "[1,2,3,4,5]");

        assert!(serde_json::from_str::<Roll>("[7,1,1,1,1]").is_err());
        assert!(serde_json::from_str::<Roll>("[1,1,0,1,1]").is_err());
        assert_eq!(Roll::try_from([1, 1, 1, 1, 9]), Err(InvalidFace(9)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Roll::new([4, 4, 4, 4, 4]).to_string(), "4-4-4-4-4");
    }
}

//! Scorecard categories.
//!
//! Thirteen fixed categories split into an upper section (one per face)
//! and a lower section (combinations). The string keys are stable and used
//! in serialized state.

use serde::{Deserialize, Serialize};

/// Number of categories on one column.
pub const CATEGORY_COUNT: usize = 13;

/// Scorecard section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    /// Ones through sixes.
    Upper,
    /// Kinds, full house, straights, yahtzee, chance.
    Lower,
}

/// A scorecard category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeKind,
    FourKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

impl Category {
    /// All categories in scorecard order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeKind,
        Category::FourKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    /// Upper section categories.
    pub const UPPER: [Category; 6] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
    ];

    /// Lower section categories.
    pub const LOWER: [Category; 7] = [
        Category::ThreeKind,
        Category::FourKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    /// Position on the scorecard (0..13).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Category at a scorecard position.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Which section this category belongs to.
    #[must_use]
    pub const fn section(self) -> Section {
        if (self as usize) < 6 {
            Section::Upper
        } else {
            Section::Lower
        }
    }

    /// Face value counted by an upper category.
    #[must_use]
    pub const fn face(self) -> Option<u8> {
        match self.section() {
            Section::Upper => Some(self as u8 + 1),
            Section::Lower => None,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Category::Ones => "ones",
            Category::Twos => "twos",
            Category::Threes => "threes",
            Category::Fours => "fours",
            Category::Fives => "fives",
            Category::Sixes => "sixes",
            Category::ThreeKind => "threeKind",
            Category::FourKind => "fourKind",
            Category::FullHouse => "fullHouse",
            Category::SmallStraight => "smallStraight",
            Category::LargeStraight => "largeStraight",
            Category::Yahtzee => "yahtzee",
            Category::Chance => "chance",
        }
    }

    /// Parse a stable identifier.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.key() == key)
    }

    /// Row label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Category::Ones => "Ones",
            Category::Twos => "Twos",
            Category::Threes => "Threes",
            Category::Fours => "Fours",
            Category::Fives => "Fives",
            Category::Sixes => "Sixes",
            Category::ThreeKind => "Three of a kind",
            Category::FourKind => "Four of a kind",
            Category::FullHouse => "Full house",
            Category::SmallStraight => "Small straight",
            Category::LargeStraight => "Large straight",
            Category::Yahtzee => "Yahtzee",
            Category::Chance => "Chance",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_partition_all() {
        for cat in Category::ALL {
            let upper = Category::UPPER.contains(&cat);
            let lower = Category::LOWER.contains(&cat);
            assert!(upper ^ lower, "{} must be in exactly one section", cat);
            assert_eq!(upper, cat.section() == Section::Upper);
        }
    }

    #[test]
    fn test_index_roundtrip() {
        for (i, cat) in Category::ALL.iter().enumerate() {
            assert_eq!(cat.index(), i);
            assert_eq!(Category::from_index(i), Some(*cat));
        }
        assert_eq!(Category::from_index(CATEGORY_COUNT), None);
    }

    #[test]
    fn test_faces() {
        assert_eq!(Category::Ones.face(), Some(1));
        assert_eq!(Category::Sixes.face(), Some(6));
        assert_eq!(Category::Chance.face(), None);
    }

    #[test]
    fn test_keys() {
        assert_eq!(Category::from_key("threeKind"), Some(Category::ThreeKind));
        assert_eq!(Category::from_key("bogus"), None);

        let json = serde_json::to_string(&Category::SmallStraight).unwrap();
        assert_eq!(json, "\"smallStraight\"");
    }
}

//! Category scoring.
//!
//! `score_for` is a pure, total function of a category and a roll. Upper
//! bonus and column weighting are not included here; see `totals`.

pub mod totals;

use smallvec::SmallVec;

use crate::core::{Category, Roll, CATEGORY_COUNT};

pub use totals::{
    column_totals, grand_total, weighted_sum, ColumnTotals, UPPER_BONUS, UPPER_BONUS_THRESHOLD,
};

/// Points for a full house.
pub const FULL_HOUSE_SCORE: u32 = 25;
/// Points for a small straight (run of four).
pub const SMALL_STRAIGHT_SCORE: u32 = 30;
/// Points for a large straight (run of five).
pub const LARGE_STRAIGHT_SCORE: u32 = 40;
/// Points for five of a kind.
pub const YAHTZEE_SCORE: u32 = 50;

/// Score `roll` in `category`.
///
/// ```
/// use knuffel::core::{Category, Roll};
/// use knuffel::scoring::score_for;
///
/// assert_eq!(score_for(Category::FullHouse, &Roll::new([2, 2, 3, 3, 3])), 25);
/// assert_eq!(score_for(Category::Threes, &Roll::new([2, 2, 3, 3, 3])), 9);
/// ```
#[must_use]
pub fn score_for(category: Category, roll: &Roll) -> u32 {
    let counts = roll.counts();
    let sum = roll.sum();

    match category {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => {
            let face = category.index() + 1;
            u32::from(counts[face]) * face as u32
        }
        Category::ThreeKind => {
            if counts.iter().any(|&c| c >= 3) {
                sum
            } else {
                0
            }
        }
        Category::FourKind => {
            if counts.iter().any(|&c| c >= 4) {
                sum
            } else {
                0
            }
        }
        Category::FullHouse => {
            if counts.contains(&3) && counts.contains(&2) {
                FULL_HOUSE_SCORE
            } else {
                0
            }
        }
        Category::SmallStraight => {
            if longest_run(roll) >= 4 {
                SMALL_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::LargeStraight => {
            if longest_run(roll) >= 5 {
                LARGE_STRAIGHT_SCORE
            } else {
                0
            }
        }
        Category::Yahtzee => {
            if counts.contains(&5) {
                YAHTZEE_SCORE
            } else {
                0
            }
        }
        Category::Chance => sum,
    }
}

/// Score `roll` in every category, indexed by `Category::index`.
#[must_use]
pub fn scores_for_roll(roll: &Roll) -> [u32; CATEGORY_COUNT] {
    let mut out = [0u32; CATEGORY_COUNT];
    for category in Category::ALL {
        out[category.index()] = score_for(category, roll);
    }
    out
}

/// Length of the longest run of consecutive distinct faces in `roll`.
#[must_use]
pub fn longest_run(roll: &Roll) -> usize {
    let mut distinct: SmallVec<[u8; 6]> = roll.faces().into_iter().collect();
    distinct.sort_unstable();
    distinct.dedup();

    let mut run = 1;
    let mut best = 1;
    for pair in distinct.windows(2) {
        if pair[1] == pair[0] + 1 {
            run += 1;
            best = best.max(run);
        } else {
            run = 1;
        }
    }
    best
}

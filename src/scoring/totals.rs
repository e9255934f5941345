//! Column aggregation and the weighted grand total.
//!
//! Unfilled cells count as 0. Column `i` (1-based) is worth `i` times its
//! total in the grand total.

use serde::{Deserialize, Serialize};

use crate::core::{Category, Column};

/// Upper-section sum needed for the bonus.
pub const UPPER_BONUS_THRESHOLD: u32 = 63;

/// Bonus awarded when the upper section reaches the threshold.
pub const UPPER_BONUS: u32 = 35;

/// Derived totals for one column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTotals {
    /// Sum of the six upper cells.
    pub upper: u32,
    /// 35 if `upper >= 63`, else 0.
    pub bonus: u32,
    /// `upper + bonus`.
    pub upper_total: u32,
    /// Sum of the seven lower cells.
    pub lower: u32,
    /// `upper_total + lower`.
    pub total: u32,
}

impl ColumnTotals {
    /// Totals from an upper and a lower sum.
    #[must_use]
    pub fn from_sums(upper: u32, lower: u32) -> Self {
        let bonus = if upper >= UPPER_BONUS_THRESHOLD {
            UPPER_BONUS
        } else {
            0
        };
        let upper_total = upper + bonus;
        Self {
            upper,
            bonus,
            upper_total,
            lower,
            total: upper_total + lower,
        }
    }
}

/// Compute the totals of one column.
#[must_use]
pub fn column_totals(column: &Column) -> ColumnTotals {
    let upper = Category::UPPER.iter().map(|&c| column.value(c)).sum();
    let lower = Category::LOWER.iter().map(|&c| column.value(c)).sum();
    ColumnTotals::from_sums(upper, lower)
}

/// Weight column totals by their 1-based position and sum them.
///
/// ```
/// use knuffel::scoring::weighted_sum;
///
/// assert_eq!(weighted_sum([100, 80, 50]), 410);
/// ```
#[must_use]
pub fn weighted_sum<I: IntoIterator<Item = u32>>(column_totals: I) -> u32 {
    column_totals
        .into_iter()
        .zip(1u32..)
        .map(|(total, weight)| total * weight)
        .sum()
}

/// Weighted grand total across all columns.
#[must_use]
pub fn grand_total(columns: &[Column]) -> u32 {
    weighted_sum(columns.iter().map(|c| column_totals(c).total))
}

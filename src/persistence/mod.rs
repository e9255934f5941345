//! Score persistence.
//!
//! The game core only needs two capabilities from storage: append a score
//! and fetch the best N. `ScorePersistence` captures exactly that, and both
//! the local high-score list and the remote leaderboard client implement it.
//!
//! Failures never touch the in-progress game; they are returned to the
//! caller to display.

pub mod local;
pub mod remote;

use std::cell::Cell;
use std::cmp::Ordering;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use local::LocalHighScores;
pub use remote::{
    LeaderboardBackend, LeaderboardClient, LeaderboardRow, MemoryBackend, ScoreRow, UserId,
};

/// Storage failures.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("score storage unreachable: {0}")]
    Unreachable(String),
    #[error("write rejected: {0}")]
    Rejected(String),
    #[error("not signed in")]
    NotSignedIn,
    #[error("score file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode scores: {0}")]
    Json(#[from] serde_json::Error),
}

/// One saved score.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player name or identifier.
    pub name: String,
    /// Points.
    pub score: u32,
    /// Creation time, ms since the Unix epoch.
    pub ts: u64,
}

impl ScoreEntry {
    /// Leaderboard order: higher score first, older entry first on ties.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other.score.cmp(&self.score).then(self.ts.cmp(&other.ts))
    }
}

/// Append-and-query score storage.
pub trait ScorePersistence {
    /// Store a score under `identifier`, returning the stored entry.
    fn append(&mut self, identifier: &str, score: u32) -> Result<ScoreEntry, PersistenceError>;

    /// Best `n` entries, score descending then time ascending.
    fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, PersistenceError>;
}

/// Wall-clock source for entry timestamps.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// The system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        let d = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        d.as_millis() as u64
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

impl ManualClock {
    /// Start at `ms`.
    #[must_use]
    pub fn new(ms: u64) -> Self {
        Self(Rc::new(Cell::new(ms)))
    }

    /// Jump to `ms`.
    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }

    /// Move forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u32, ts: u64) -> ScoreEntry {
        ScoreEntry {
            name: "a".to_string(),
            score,
            ts,
        }
    }

    #[test]
    fn test_rank_order() {
        let mut entries = vec![entry(10, 3), entry(30, 5), entry(10, 1), entry(30, 2)];
        entries.sort_by(ScoreEntry::rank_cmp);

        let keys: Vec<_> = entries.iter().map(|e| (e.score, e.ts)).collect();
        assert_eq!(keys, vec![(30, 2), (30, 5), (10, 1), (10, 3)]);
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(100);
        let other = clock.clone();
        clock.advance(50);
        assert_eq!(other.now_ms(), 150);
        other.set(7);
        assert_eq!(clock.now_ms(), 7);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}

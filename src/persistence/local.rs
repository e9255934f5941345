//! Local high-score list.
//!
//! Keeps the best `capacity` scores, optionally backed by a JSON file, plus
//! the last name the player entered so it can be prefilled next time.
//!
//! A missing file is an empty list. An unreadable or malformed file is
//! logged and also treated as empty; the next successful append
//! overwrites it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Clock, PersistenceError, ScoreEntry, ScorePersistence, SystemClock};
use crate::core::HighScoreConfig;

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredScores {
    scores: Vec<ScoreEntry>,
    #[serde(default)]
    last_name: Option<String>,
}

/// Top-N high scores kept on this machine.
#[derive(Clone, Debug)]
pub struct LocalHighScores<C: Clock = SystemClock> {
    config: HighScoreConfig,
    entries: Vector<ScoreEntry>,
    last_name: Option<String>,
    path: Option<PathBuf>,
    clock: C,
}

impl LocalHighScores<SystemClock> {
    /// A list that lives only in memory.
    #[must_use]
    pub fn in_memory(config: HighScoreConfig) -> Self {
        Self {
            config,
            entries: Vector::new(),
            last_name: None,
            path: None,
            clock: SystemClock,
        }
    }

    /// Load the list from `path`; appends are written back to it.
    #[must_use]
    pub fn open<P: AsRef<Path>>(path: P, config: HighScoreConfig) -> Self {
        let path = path.as_ref().to_path_buf();
        let stored = read_stored(&path);
        debug!(path = %path.display(), entries = stored.scores.len(), "loaded high scores");

        let mut scores = Self {
            config,
            entries: stored.scores.into_iter().collect(),
            last_name: stored.last_name,
            path: Some(path),
            clock: SystemClock,
        };
        normalize(&mut scores.entries, scores.config.capacity);
        scores
    }
}

fn read_stored(path: &Path) -> StoredScores {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return StoredScores::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read high scores, starting empty");
            return StoredScores::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(stored) => stored,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed high score file, starting empty");
            StoredScores::default()
        }
    }
}

/// Sort best-first and drop entries beyond `capacity`.
fn normalize(entries: &mut Vector<ScoreEntry>, capacity: usize) {
    entries.sort_by(ScoreEntry::rank_cmp);
    if entries.len() > capacity {
        entries.truncate(capacity);
    }
}

impl<C: Clock> LocalHighScores<C> {
    /// Use a different clock for entry timestamps.
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> LocalHighScores<D> {
        LocalHighScores {
            config: self.config,
            entries: self.entries,
            last_name: self.last_name,
            path: self.path,
            clock,
        }
    }

    /// All kept entries, best first.
    #[must_use]
    pub fn entries(&self) -> &Vector<ScoreEntry> {
        &self.entries
    }

    /// Name entered with the most recent save.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// The configured top-N (what the scoreboard shows).
    #[must_use]
    pub fn top(&self) -> Vec<ScoreEntry> {
        self.entries.iter().take(self.config.top_n).cloned().collect()
    }

    /// Trim and truncate a name to what is stored.
    #[must_use]
    pub fn clean_name(&self, name: &str) -> String {
        name.trim().chars().take(self.config.max_name_len).collect()
    }

    /// Write `entries` and `last_name` to the backing file, if any.
    ///
    /// The JSON goes to a sibling `.tmp` file first and is renamed over the
    /// target.
    fn persist(
        &self,
        entries: &Vector<ScoreEntry>,
        last_name: Option<&str>,
    ) -> Result<(), PersistenceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let stored = StoredScores {
            scores: entries.iter().cloned().collect(),
            last_name: last_name.map(str::to_string),
        };
        let json = serde_json::to_string_pretty(&stored)?;

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl<C: Clock> ScorePersistence for LocalHighScores<C> {
    fn append(&mut self, identifier: &str, score: u32) -> Result<ScoreEntry, PersistenceError> {
        let cleaned = self.clean_name(identifier);
        let name = if cleaned.is_empty() {
            self.config.default_name.clone()
        } else {
            cleaned.clone()
        };

        let entry = ScoreEntry {
            name,
            score,
            ts: self.clock.now_ms(),
        };

        let mut entries = self.entries.clone();
        entries.push_back(entry.clone());
        normalize(&mut entries, self.config.capacity);
        let last_name = (!cleaned.is_empty()).then_some(cleaned);

        // Nothing changes in memory unless the file write succeeded.
        self.persist(&entries, last_name.as_deref())?;
        self.entries = entries;
        self.last_name = last_name;

        info!(name = %entry.name, score, "saved local high score");
        Ok(entry)
    }

    fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, PersistenceError> {
        Ok(self.entries.iter().take(n).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::ManualClock;

    fn store(capacity: usize) -> (LocalHighScores<ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_000);
        let config = HighScoreConfig {
            capacity,
            ..HighScoreConfig::default()
        };
        (LocalHighScores::in_memory(config).with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_append_orders_by_score_then_time() {
        let (mut scores, clock) = store(50);

        scores.append("ann", 200).unwrap();
        clock.advance(10);
        scores.append("bob", 300).unwrap();
        clock.advance(10);
        scores.append("cid", 200).unwrap();

        let names: Vec<_> = scores.top_n(10).unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["bob", "ann", "cid"]);
    }

    #[test]
    fn test_capacity_drops_worst() {
        let (mut scores, _clock) = store(2);

        scores.append("a", 10).unwrap();
        scores.append("b", 30).unwrap();
        scores.append("c", 20).unwrap();

        let kept: Vec<_> = scores.entries().iter().map(|e| e.score).collect();
        assert_eq!(kept, vec![30, 20]);
    }

    #[test]
    fn test_name_cleaning() {
        let (mut scores, _clock) = store(50);

        let entry = scores.append("   ", 5).unwrap();
        assert_eq!(entry.name, "Player");
        assert_eq!(scores.last_name(), None);

        let entry = scores.append("  Zbigniew Brzęczyszczykiewicz  ", 5).unwrap();
        assert_eq!(entry.name.chars().count(), 20);
        assert_eq!(entry.name, "Zbigniew Brzęczyszcz");
        assert_eq!(scores.last_name(), Some("Zbigniew Brzęczyszcz"));
    }

    #[test]
    fn test_top_uses_configured_n() {
        let (mut scores, _clock) = store(50);
        for i in 0..15 {
            scores.append("p", i).unwrap();
        }
        assert_eq!(scores.top().len(), 10);
        assert_eq!(scores.top()[0].score, 14);
        assert_eq!(scores.top_n(3).unwrap().len(), 3);
    }

    #[test]
    fn test_append_to_empty_store() {
        let (mut scores, _clock) = store(50);
        assert!(scores.entries().is_empty());

        let entry = scores.append("Ola", 100).unwrap();
        assert_eq!(scores.entries().len(), 1);
        assert_eq!(scores.entries()[0], entry);
    }

    #[test]
    fn test_failed_write_leaves_list_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("scores.json");

        let mut scores = LocalHighScores::open(&path, HighScoreConfig::default());
        assert!(scores.entries().is_empty());

        let result = scores.append("Ola", 100);
        assert!(matches!(result, Err(PersistenceError::Io(_))));
        assert!(scores.entries().is_empty());
        assert_eq!(scores.last_name(), None);
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut scores = LocalHighScores::open(&path, HighScoreConfig::default());
        scores.append("Ola", 100).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("scores.json.tmp").exists());
    }

    #[test]
    fn test_timestamps_from_clock() {
        let (mut scores, clock) = store(50);
        clock.set(42_000);
        let entry = scores.append("x", 1).unwrap();
        assert_eq!(entry.ts, 42_000);
    }
}

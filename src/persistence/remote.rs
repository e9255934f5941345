//! Remote leaderboard with magic-link sign-in.
//!
//! `LeaderboardClient` holds the signed-in user and talks to a
//! `LeaderboardBackend`. The backend is the hosted database: a `scores`
//! table (user, game, points, created_at), a `profiles` table (user,
//! nickname) and an email sign-in service. `MemoryBackend` is a complete
//! in-process backend used for offline play and tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Clock, PersistenceError, ScoreEntry, ScorePersistence, SystemClock};
use crate::core::LeaderboardConfig;

/// Remote user identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User({})", self.0)
    }
}

/// A row of the scores table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub user_id: UserId,
    pub game: String,
    pub points: u32,
    /// Server time of insertion, ms since the Unix epoch.
    pub created_at: u64,
}

/// A leaderboard line: a score row joined with the user's nickname.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub user_id: UserId,
    pub nickname: String,
    pub points: u32,
    pub created_at: u64,
}

/// Hosted database operations the client needs.
pub trait LeaderboardBackend {
    /// Email a one-time sign-in token.
    fn send_magic_link(&mut self, email: &str) -> Result<(), PersistenceError>;

    /// Exchange an emailed token for a user.
    fn verify_magic_link(&mut self, email: &str, token: &str) -> Result<UserId, PersistenceError>;

    /// Create or replace a user's nickname.
    fn upsert_profile(&mut self, user: UserId, nickname: &str) -> Result<(), PersistenceError>;

    /// Insert a score; the backend stamps `created_at`.
    fn insert_score(
        &mut self,
        user: UserId,
        game: &str,
        points: u32,
    ) -> Result<ScoreRow, PersistenceError>;

    /// Best scores for a game: points descending, then `created_at` ascending.
    fn top_scores(&self, game: &str, limit: usize) -> Result<Vec<ScoreRow>, PersistenceError>;

    /// Nicknames for the given users. Users without a profile are absent.
    fn nicknames(&self, users: &[UserId]) -> Result<FxHashMap<UserId, String>, PersistenceError>;
}

/// In-process backend.
#[derive(Debug)]
pub struct MemoryBackend<C: Clock = SystemClock> {
    users: FxHashMap<String, UserId>,
    pending: FxHashMap<String, String>,
    profiles: FxHashMap<UserId, String>,
    scores: Vec<ScoreRow>,
    next_user: u64,
    tokens_issued: u64,
    online: bool,
    clock: C,
}

impl MemoryBackend<SystemClock> {
    /// An empty, online backend.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryBackend<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryBackend<C> {
    /// An empty, online backend stamping rows with `clock`.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            users: FxHashMap::default(),
            pending: FxHashMap::default(),
            profiles: FxHashMap::default(),
            scores: Vec::new(),
            next_user: 1,
            tokens_issued: 0,
            online: true,
            clock,
        }
    }

    /// Simulate losing or regaining the connection.
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    /// The token sitting in `email`'s inbox, if any.
    #[must_use]
    pub fn pending_token(&self, email: &str) -> Option<&str> {
        self.pending.get(&normalize_email(email)).map(String::as_str)
    }

    /// Every stored score row.
    #[must_use]
    pub fn rows(&self) -> &[ScoreRow] {
        &self.scores
    }

    fn ensure_online(&self) -> Result<(), PersistenceError> {
        if self.online {
            Ok(())
        } else {
            Err(PersistenceError::Unreachable("leaderboard backend offline".to_string()))
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl<C: Clock> LeaderboardBackend for MemoryBackend<C> {
    fn send_magic_link(&mut self, email: &str) -> Result<(), PersistenceError> {
        self.ensure_online()?;
        let email = normalize_email(email);

        self.tokens_issued += 1;
        let mut hasher = DefaultHasher::new();
        email.hash(&mut hasher);
        self.tokens_issued.hash(&mut hasher);
        self.clock.now_ms().hash(&mut hasher);
        let token = format!("{:016x}", hasher.finish());

        self.pending.insert(email, token);
        Ok(())
    }

    fn verify_magic_link(&mut self, email: &str, token: &str) -> Result<UserId, PersistenceError> {
        self.ensure_online()?;
        let email = normalize_email(email);

        let valid = self.pending.get(&email).is_some_and(|t| t == token);
        if !valid {
            return Err(PersistenceError::Rejected(
                "invalid or expired sign-in link".to_string(),
            ));
        }
        self.pending.remove(&email);

        let next_user = &mut self.next_user;
        let user = *self.users.entry(email).or_insert_with(|| {
            let id = UserId(*next_user);
            *next_user += 1;
            id
        });
        Ok(user)
    }

    fn upsert_profile(&mut self, user: UserId, nickname: &str) -> Result<(), PersistenceError> {
        self.ensure_online()?;
        self.profiles.insert(user, nickname.to_string());
        Ok(())
    }

    fn insert_score(
        &mut self,
        user: UserId,
        game: &str,
        points: u32,
    ) -> Result<ScoreRow, PersistenceError> {
        self.ensure_online()?;
        let row = ScoreRow {
            user_id: user,
            game: game.to_string(),
            points,
            created_at: self.clock.now_ms(),
        };
        self.scores.push(row.clone());
        Ok(row)
    }

    fn top_scores(&self, game: &str, limit: usize) -> Result<Vec<ScoreRow>, PersistenceError> {
        self.ensure_online()?;
        let mut rows: Vec<_> = self.scores.iter().filter(|r| r.game == game).cloned().collect();
        rows.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(a.created_at.cmp(&b.created_at))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    fn nicknames(&self, users: &[UserId]) -> Result<FxHashMap<UserId, String>, PersistenceError> {
        self.ensure_online()?;
        Ok(users
            .iter()
            .filter_map(|u| self.profiles.get(u).map(|n| (*u, n.clone())))
            .collect())
    }
}

/// Signed-in leaderboard client.
#[derive(Debug)]
pub struct LeaderboardClient<B: LeaderboardBackend> {
    backend: B,
    config: LeaderboardConfig,
    user: Option<UserId>,
}

impl<B: LeaderboardBackend> LeaderboardClient<B> {
    /// Create a signed-out client.
    #[must_use]
    pub fn new(backend: B, config: LeaderboardConfig) -> Self {
        Self {
            backend,
            config,
            user: None,
        }
    }

    /// The backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Signed-in user.
    #[must_use]
    pub fn current_user(&self) -> Option<UserId> {
        self.user
    }

    /// Request a sign-in link for `email`.
    pub fn send_magic_link(&mut self, email: &str) -> Result<(), PersistenceError> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(PersistenceError::Rejected(format!(
                "not an email address: {:?}",
                email
            )));
        }
        self.backend.send_magic_link(email)?;
        debug!(email, "sent magic link");
        Ok(())
    }

    /// Complete sign-in with the emailed token.
    pub fn sign_in(&mut self, email: &str, token: &str) -> Result<UserId, PersistenceError> {
        let user = self.backend.verify_magic_link(email, token)?;
        self.user = Some(user);
        info!(%user, "signed in");
        Ok(user)
    }

    /// Forget the signed-in user.
    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!(%user, "signed out");
        }
    }

    fn require_user(&self) -> Result<UserId, PersistenceError> {
        self.user.ok_or(PersistenceError::NotSignedIn)
    }

    /// Set the signed-in user's nickname.
    pub fn upsert_profile(&mut self, nickname: &str) -> Result<(), PersistenceError> {
        let user = self.require_user()?;
        self.backend.upsert_profile(user, nickname)
    }

    /// Save points for the configured game.
    pub fn save_score(&mut self, points: u32) -> Result<ScoreRow, PersistenceError> {
        let user = self.require_user()?;
        let row = self.backend.insert_score(user, &self.config.game, points)?;
        info!(%user, game = %row.game, points, "saved leaderboard score");
        Ok(row)
    }

    /// Best `limit` scores for the configured game with nicknames.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardRow>, PersistenceError> {
        let rows = self.backend.top_scores(&self.config.game, limit)?;

        let mut seen = FxHashSet::default();
        let ids: Vec<_> = rows
            .iter()
            .map(|r| r.user_id)
            .filter(|id| seen.insert(*id))
            .collect();

        // Missing nicknames are cosmetic; the scores still show.
        let names = self.backend.nicknames(&ids).unwrap_or_else(|e| {
            warn!(error = %e, "could not load nicknames");
            FxHashMap::default()
        });

        Ok(rows
            .into_iter()
            .map(|r| LeaderboardRow {
                nickname: names
                    .get(&r.user_id)
                    .cloned()
                    .unwrap_or_else(|| self.config.default_nickname.clone()),
                user_id: r.user_id,
                points: r.points,
                created_at: r.created_at,
            })
            .collect())
    }

    /// The configured-size leaderboard.
    pub fn top(&self) -> Result<Vec<LeaderboardRow>, PersistenceError> {
        self.leaderboard(self.config.limit)
    }
}

impl<B: LeaderboardBackend> ScorePersistence for LeaderboardClient<B> {
    fn append(&mut self, identifier: &str, score: u32) -> Result<ScoreEntry, PersistenceError> {
        let nickname = identifier.trim();
        if !nickname.is_empty() {
            self.upsert_profile(nickname)?;
        }
        let row = self.save_score(score)?;

        Ok(ScoreEntry {
            name: if nickname.is_empty() {
                self.config.default_nickname.clone()
            } else {
                nickname.to_string()
            },
            score: row.points,
            ts: row.created_at,
        })
    }

    fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, PersistenceError> {
        Ok(self
            .leaderboard(n)?
            .into_iter()
            .map(|r| ScoreEntry {
                name: r.nickname,
                score: r.points,
                ts: r.created_at,
            })
            .collect())
    }
}

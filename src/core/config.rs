//! Game configuration.
//!
//! Every field has a default matching the classic triple-column game, so an
//! empty YAML document is a valid configuration:
//!
//! ```
//! use knuffel::core::GameConfig;
//!
//! let config = GameConfig::from_yaml("{}").unwrap();
//! assert_eq!(config.rules.rolls_per_round, 3);
//! assert_eq!(config.high_scores.top_n, 10);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameConfig {
    /// Round rules.
    #[serde(default)]
    pub rules: RulesConfig,
    /// Cosmetic roll animation timing.
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Local high-score list.
    #[serde(default)]
    pub high_scores: HighScoreConfig,
    /// Remote leaderboard.
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

/// Round rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RulesConfig {
    /// Rolls allowed per round, including the automatic roll that opens
    /// every round after the first.
    #[serde(default = "default_rolls_per_round")]
    pub rolls_per_round: u8,
}

fn default_rolls_per_round() -> u8 {
    3
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            rolls_per_round: default_rolls_per_round(),
        }
    }
}

/// Roll animation timing. Presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnimationConfig {
    /// Total animation length in milliseconds.
    #[serde(default = "default_animation_duration_ms")]
    pub duration_ms: u32,
    /// Interval between frames in milliseconds.
    #[serde(default = "default_animation_tick_ms")]
    pub tick_ms: u32,
}

fn default_animation_duration_ms() -> u32 {
    800
}

fn default_animation_tick_ms() -> u32 {
    50
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_animation_duration_ms(),
            tick_ms: default_animation_tick_ms(),
        }
    }
}

impl AnimationConfig {
    /// Number of frames in one animation.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        if self.tick_ms == 0 {
            return 0;
        }
        (self.duration_ms / self.tick_ms) as usize
    }
}

/// Local high-score list settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HighScoreConfig {
    /// Entries kept after each append.
    #[serde(default = "default_high_score_capacity")]
    pub capacity: usize,
    /// Entries shown.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Names are truncated to this many characters.
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
    /// Name used when the player leaves it blank.
    #[serde(default = "default_player_name")]
    pub default_name: String,
}

fn default_high_score_capacity() -> usize {
    50
}

fn default_top_n() -> usize {
    10
}

fn default_max_name_len() -> usize {
    20
}

fn default_player_name() -> String {
    "Player".to_string()
}

impl Default for HighScoreConfig {
    fn default() -> Self {
        Self {
            capacity: default_high_score_capacity(),
            top_n: default_top_n(),
            max_name_len: default_max_name_len(),
            default_name: default_player_name(),
        }
    }
}

/// Remote leaderboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LeaderboardConfig {
    /// Game name scores are filed under.
    #[serde(default = "default_game_name")]
    pub game: String,
    /// Rows fetched for the leaderboard.
    #[serde(default = "default_top_n")]
    pub limit: usize,
    /// Shown for users without a profile nickname.
    #[serde(default = "default_player_name")]
    pub default_nickname: String,
}

fn default_game_name() -> String {
    "knuffel".to_string()
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            game: default_game_name(),
            limit: default_top_n(),
            default_nickname: default_player_name(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the game cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rules.rolls_per_round == 0 {
            return Err(ConfigError::Invalid("rules.rolls_per_round must be at least 1"));
        }
        if self.animation.tick_ms == 0 {
            return Err(ConfigError::Invalid("animation.tick_ms must be at least 1"));
        }
        if self.high_scores.capacity == 0 {
            return Err(ConfigError::Invalid("high_scores.capacity must be at least 1"));
        }
        Ok(())
    }

    /// Set rolls per round.
    #[must_use]
    pub fn with_rolls_per_round(mut self, rolls: u8) -> Self {
        self.rules.rolls_per_round = rolls;
        self
    }

    /// Set the animation timing.
    #[must_use]
    pub fn with_animation(mut self, duration_ms: u32, tick_ms: u32) -> Self {
        self.animation = AnimationConfig {
            duration_ms,
            tick_ms,
        };
        self
    }

    /// Set how many local high scores are kept.
    #[must_use]
    pub fn with_high_score_capacity(mut self, capacity: usize) -> Self {
        self.high_scores.capacity = capacity;
        self
    }

    /// Set the leaderboard game name.
    #[must_use]
    pub fn with_game_name(mut self, game: impl Into<String>) -> Self {
        self.leaderboard.game = game.into();
        self
    }
}

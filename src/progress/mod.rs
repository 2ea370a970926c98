//! Per-identity progress tracking: aggregate types, stat aggregation,
//! achievement unlocking, difficulty gating, and file-backed persistence.
//!
//! One mutable aggregate exists per identity key. The aggregator and the
//! achievement engine are pure; all failure surface lives in the store and
//! in command-input validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{DifficultyTier, GameRecord, MasteryLevel};

pub mod achievements;
pub mod aggregate;
pub mod gate;
pub mod service;
pub mod store;

pub use achievements::Achievement;
pub use service::{ProgressOptions, ProgressService};
pub use store::ProgressStore;

#[derive(Debug, Error)]
pub enum ProgressError {
  /// Malformed command input; never touches the store.
  #[error("invalid game outcome: {0}")]
  Validation(String),
  /// Durable file could not be written; progress would silently not persist.
  #[error("failed to persist progress data: {0}")]
  Io(#[from] std::io::Error),
}

/// The persisted aggregate, one per identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
  pub id: String,
  pub identity: String,
  pub created_at: DateTime<Utc>,
  pub last_played_at: DateTime<Utc>,
  pub total_games: u32,
  pub total_wins: u32,
  pub total_losses: u32,
  pub win_rate: f64,
  pub current_streak: u32,
  pub best_streak: u32,
  pub difficulty_stats: DifficultyStats,
  pub achievements: Vec<Achievement>,
  pub preferences: UserPreferences,
}

/// Per-tier statistics, one slot per tier of the closed enumeration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DifficultyStats {
  pub cet4: DifficultyProgress,
  pub cet6: DifficultyProgress,
  pub toefl: DifficultyProgress,
  pub gre: DifficultyProgress,
}

impl DifficultyStats {
  pub fn get(&self, tier: DifficultyTier) -> &DifficultyProgress {
    match tier {
      DifficultyTier::Cet4 => &self.cet4,
      DifficultyTier::Cet6 => &self.cet6,
      DifficultyTier::Toefl => &self.toefl,
      DifficultyTier::Gre => &self.gre,
    }
  }

  pub fn get_mut(&mut self, tier: DifficultyTier) -> &mut DifficultyProgress {
    match tier {
      DifficultyTier::Cet4 => &mut self.cet4,
      DifficultyTier::Cet6 => &mut self.cet6,
      DifficultyTier::Toefl => &mut self.toefl,
      DifficultyTier::Gre => &mut self.gre,
    }
  }
}

/// Progress at a single tier. `games_played == wins + losses` and
/// `win_rate == wins / games_played` (0 when no games) always hold.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyProgress {
  pub games_played: u32,
  pub wins: u32,
  pub losses: u32,
  pub win_rate: f64,
  pub average_guesses: f64,
  pub best_game: Option<GameRecord>,
  /// Newest first, capped at `RECENT_GAMES_CAP`.
  pub recent_games: Vec<GameRecord>,
  pub unlocked_at: Option<DateTime<Utc>>,
  pub mastery_level: MasteryLevel,
}

/// Recent-history cap per tier; older entries are discarded, not archived.
pub const RECENT_GAMES_CAP: usize = 10;

impl Default for DifficultyProgress {
  fn default() -> Self {
    Self {
      games_played: 0,
      wins: 0,
      losses: 0,
      win_rate: 0.0,
      average_guesses: 0.0,
      best_game: None,
      recent_games: Vec::new(),
      unlocked_at: None,
      mastery_level: MasteryLevel::Beginner,
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  Classic,
  Amber,
  Green,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
  pub preferred_difficulty: DifficultyTier,
  pub sound_enabled: bool,
  pub animations_enabled: bool,
  pub theme: Theme,
  pub auto_advance_difficulty: bool,
}

impl Default for UserPreferences {
  fn default() -> Self {
    Self {
      preferred_difficulty: DifficultyTier::Cet4,
      sound_enabled: true,
      animations_enabled: true,
      theme: Theme::Classic,
      auto_advance_difficulty: false,
    }
  }
}

//! Progress service facade.
//!
//! Orchestrates store, aggregator, and achievement engine. Constructed once
//! at startup and shared through the app state; request handlers receive it
//! by reference, never through a global.

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{GameOutcome, GameRecord};
use crate::progress::{
  achievements, aggregate, Achievement, ProgressError, ProgressStore, UserProgress,
};

/// Response-shaping flags for `get_progress`. Both default to true.
#[derive(Clone, Copy, Debug)]
pub struct ProgressOptions {
  pub include_recent_games: bool,
  pub include_achievements: bool,
}

impl Default for ProgressOptions {
  fn default() -> Self {
    Self { include_recent_games: true, include_achievements: true }
  }
}

/// A fresh zeroed aggregate for a never-seen identity. `cet4` is the only
/// tier playable out of the box, reflected in the default preference.
pub(crate) fn new_user_progress(identity: &str) -> UserProgress {
  let now = Utc::now();
  UserProgress {
    id: Uuid::new_v4().to_string(),
    identity: identity.to_string(),
    created_at: now,
    last_played_at: now,
    total_games: 0,
    total_wins: 0,
    total_losses: 0,
    win_rate: 0.0,
    current_streak: 0,
    best_streak: 0,
    difficulty_stats: Default::default(),
    achievements: Vec::new(),
    preferences: Default::default(),
  }
}

pub struct ProgressService {
  store: ProgressStore,
}

impl ProgressService {
  pub fn new(store: ProgressStore) -> Self {
    Self { store }
  }

  /// Load (or lazily create) the aggregate and return a copy shaped by the
  /// options. The stored aggregate is never mutated by a read.
  #[instrument(level = "debug", skip(self, options), fields(%identity))]
  pub async fn get_progress(&self, identity: &str, options: ProgressOptions) -> UserProgress {
    let progress = self.load_or_create(identity).await;
    filtered(progress, options)
  }

  /// Fold one finished game into the identity's aggregate, mint any new
  /// achievements, and persist. A failed save fails the whole command;
  /// the caller must never believe unsaved progress was recorded.
  #[instrument(level = "info", skip(self, outcome), fields(%identity, difficulty = %outcome.difficulty, won = outcome.won))]
  pub async fn record_game(
    &self,
    identity: &str,
    outcome: GameOutcome,
  ) -> Result<(UserProgress, Vec<Achievement>), ProgressError> {
    let current = self.load_or_create(identity).await;

    let record = GameRecord {
      id: Uuid::new_v4().to_string(),
      played_at: Utc::now(),
      outcome,
    };

    let mut updated = aggregate::apply(&current, &record);
    let new_achievements = achievements::evaluate(&current, &updated, &record);
    updated.achievements.extend(new_achievements.iter().cloned());

    self.store.save(identity, &updated).await?;

    info!(
      target: "progress",
      %identity,
      game_id = %record.id,
      total_games = updated.total_games,
      streak = updated.current_streak,
      new_achievements = new_achievements.len(),
      "Game recorded"
    );

    Ok((updated, new_achievements))
  }

  /// Startup retention sweep; see the store for semantics.
  pub async fn cleanup(&self, max_age_days: u32) -> Result<usize, ProgressError> {
    self.store.cleanup(max_age_days).await
  }

  async fn load_or_create(&self, identity: &str) -> UserProgress {
    if let Some(progress) = self.store.load(identity).await {
      return progress;
    }
    let progress = new_user_progress(identity);
    // Cache only: a new identity is not persisted until its first game.
    self.store.cache(identity, &progress).await;
    progress
  }
}

fn filtered(mut progress: UserProgress, options: ProgressOptions) -> UserProgress {
  if !options.include_recent_games {
    progress.difficulty_stats.cet4.recent_games.clear();
    progress.difficulty_stats.cet6.recent_games.clear();
    progress.difficulty_stats.toefl.recent_games.clear();
    progress.difficulty_stats.gre.recent_games.clear();
  }
  if !options.include_achievements {
    progress.achievements.clear();
  }
  progress
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::DifficultyTier;
  use crate::progress::achievements::AchievementId;

  fn temp_service() -> ProgressService {
    let path = std::env::temp_dir()
      .join(format!("hangman-progress-{}.json", Uuid::new_v4()));
    ProgressService::new(ProgressStore::new(path))
  }

  fn sample_outcome() -> GameOutcome {
    GameOutcome {
      difficulty: DifficultyTier::Cet4,
      word_length: 5,
      guesses_used: 4,
      time_elapsed_ms: 45_000,
      won: true,
      incorrect_guesses: vec!['x', 'z'],
      correct_guesses: vec!['a', 'p', 'l', 'e'],
    }
  }

  #[tokio::test]
  async fn first_recorded_game_produces_expected_aggregate() {
    let service = temp_service();
    let (progress, unlocked) = service.record_game("203.0.113.9", sample_outcome()).await.unwrap();

    assert_eq!(progress.total_games, 1);
    assert_eq!(progress.total_wins, 1);
    assert!((progress.win_rate - 1.0).abs() < 1e-9);
    assert_eq!(progress.current_streak, 1);

    let cet4 = &progress.difficulty_stats.cet4;
    assert_eq!(cet4.games_played, 1);
    assert_eq!(cet4.wins, 1);
    assert!((cet4.win_rate - 1.0).abs() < 1e-9);
    assert!((cet4.average_guesses - 4.0).abs() < 1e-9);
    assert_eq!(cet4.best_game.as_ref().unwrap().outcome.guesses_used, 4);

    // 45s win: first victory and a sub-minute one.
    assert!(unlocked.iter().any(|a| a.id == AchievementId::FirstWin));
    assert!(unlocked.iter().any(|a| a.id == AchievementId::SpeedDemon));
    assert!(progress.achievements.iter().any(|a| a.id == AchievementId::FirstWin));
  }

  #[tokio::test]
  async fn get_progress_creates_a_stable_lazy_aggregate() {
    let service = temp_service();
    let first = service.get_progress("10.1.1.1", ProgressOptions::default()).await;
    let second = service.get_progress("10.1.1.1", ProgressOptions::default()).await;
    assert_eq!(first.id, second.id);
    assert_eq!(first.total_games, 0);
  }

  #[tokio::test]
  async fn options_strip_copies_not_stored_state() {
    let service = temp_service();
    service.record_game("10.1.1.2", sample_outcome()).await.unwrap();

    let stripped = service
      .get_progress(
        "10.1.1.2",
        ProgressOptions { include_recent_games: false, include_achievements: false },
      )
      .await;
    assert!(stripped.difficulty_stats.cet4.recent_games.is_empty());
    assert!(stripped.achievements.is_empty());

    let full = service.get_progress("10.1.1.2", ProgressOptions::default()).await;
    assert_eq!(full.difficulty_stats.cet4.recent_games.len(), 1);
    assert!(!full.achievements.is_empty());
  }

  #[tokio::test]
  async fn achievements_accumulate_across_games() {
    let service = temp_service();
    let mut loss = sample_outcome();
    loss.won = false;

    let (_, unlocked) = service.record_game("10.1.1.3", loss).await.unwrap();
    assert!(unlocked.is_empty());

    let (_, unlocked) = service.record_game("10.1.1.3", sample_outcome()).await.unwrap();
    assert!(unlocked.iter().any(|a| a.id == AchievementId::FirstWin));

    // FIRST_WIN never fires twice.
    let (progress, unlocked) = service.record_game("10.1.1.3", sample_outcome()).await.unwrap();
    assert!(!unlocked.iter().any(|a| a.id == AchievementId::FirstWin));
    let first_wins = progress
      .achievements
      .iter()
      .filter(|a| a.id == AchievementId::FirstWin)
      .count();
    assert_eq!(first_wins, 1);
  }
}

//! Pure aggregate update for one finished game.
//!
//! `apply` is total: it never fails and never touches I/O. The returned
//! aggregate upholds the counter invariants (`total_games == total_wins +
//! total_losses`, per-tier `games_played == wins + losses`) and the streak
//! rules (reset on loss, best streak monotone).

use crate::domain::{GameRecord, MasteryLevel};
use crate::progress::{UserProgress, RECENT_GAMES_CAP};

/// Fold one game record into the aggregate, returning the updated copy.
pub fn apply(current: &UserProgress, record: &GameRecord) -> UserProgress {
  let mut updated = current.clone();
  let outcome = &record.outcome;

  updated.last_played_at = record.played_at;
  updated.total_games += 1;

  if outcome.won {
    updated.total_wins += 1;
    updated.current_streak += 1;
    updated.best_streak = updated.best_streak.max(updated.current_streak);
  } else {
    updated.total_losses += 1;
    updated.current_streak = 0;
  }

  updated.win_rate = f64::from(updated.total_wins) / f64::from(updated.total_games);

  let stats = updated.difficulty_stats.get_mut(outcome.difficulty);
  stats.games_played += 1;
  if outcome.won {
    stats.wins += 1;
  } else {
    stats.losses += 1;
  }
  stats.win_rate = f64::from(stats.wins) / f64::from(stats.games_played);

  // Running mean over guesses, no stored total needed.
  let prior_games = f64::from(stats.games_played - 1);
  stats.average_guesses =
    (stats.average_guesses * prior_games + f64::from(outcome.guesses_used))
      / f64::from(stats.games_played);

  if outcome.won {
    let better = match &stats.best_game {
      Some(best) => outcome.guesses_used < best.outcome.guesses_used,
      None => true,
    };
    if better {
      stats.best_game = Some(record.clone());
    }
  }

  stats.recent_games.insert(0, record.clone());
  stats.recent_games.truncate(RECENT_GAMES_CAP);

  stats.mastery_level = MasteryLevel::for_stats(stats.wins, stats.win_rate);

  if stats.unlocked_at.is_none() && stats.games_played == 1 {
    stats.unlocked_at = Some(record.played_at);
  }

  updated
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{DifficultyTier, GameOutcome};
  use crate::progress::service::new_user_progress;
  use chrono::Utc;

  fn play(progress: &UserProgress, difficulty: DifficultyTier, won: bool, guesses: u32) -> UserProgress {
    let record = GameRecord {
      id: uuid::Uuid::new_v4().to_string(),
      played_at: Utc::now(),
      outcome: GameOutcome {
        difficulty,
        word_length: 5,
        guesses_used: guesses,
        time_elapsed_ms: 30_000,
        won,
        incorrect_guesses: if won { vec![] } else { vec!['q', 'z'] },
        correct_guesses: vec!['a'],
      },
    };
    apply(progress, &record)
  }

  #[test]
  fn counters_stay_consistent_over_any_sequence() {
    let mut p = new_user_progress("10.0.0.1");
    let plays = [true, false, true, true, false, false, true];
    for (i, won) in plays.into_iter().enumerate() {
      let tier = if i % 2 == 0 { DifficultyTier::Cet4 } else { DifficultyTier::Cet6 };
      p = play(&p, tier, won, 3);
      assert_eq!(p.total_games, p.total_wins + p.total_losses);
      for tier in DifficultyTier::ALL {
        let s = p.difficulty_stats.get(tier);
        assert_eq!(s.games_played, s.wins + s.losses);
      }
    }
    assert_eq!(p.total_games, 7);
  }

  #[test]
  fn streak_resets_on_loss_then_regrows() {
    let mut p = new_user_progress("10.0.0.1");
    let mut streaks = Vec::new();
    for won in [true, true, false, true, true] {
      p = play(&p, DifficultyTier::Cet4, won, 4);
      streaks.push(p.current_streak);
    }
    assert_eq!(streaks, vec![1, 2, 0, 1, 2]);
    assert_eq!(p.best_streak, 2);
  }

  #[test]
  fn best_streak_never_decreases() {
    let mut p = new_user_progress("10.0.0.1");
    let mut best = 0;
    for won in [true, true, true, false, true, false, false, true, true] {
      p = play(&p, DifficultyTier::Cet4, won, 4);
      assert!(p.best_streak >= best);
      best = p.best_streak;
    }
    assert_eq!(p.best_streak, 3);
  }

  #[test]
  fn average_guesses_is_a_running_mean() {
    let mut p = new_user_progress("10.0.0.1");
    for guesses in [4, 6, 5] {
      p = play(&p, DifficultyTier::Cet4, true, guesses);
    }
    let avg = p.difficulty_stats.cet4.average_guesses;
    assert!((avg - 5.0).abs() < 1e-9, "avg = {avg}");
  }

  #[test]
  fn best_game_tracks_fewest_guesses_among_wins() {
    let mut p = new_user_progress("10.0.0.1");
    p = play(&p, DifficultyTier::Cet4, true, 6);
    p = play(&p, DifficultyTier::Cet4, false, 2); // losses never count
    p = play(&p, DifficultyTier::Cet4, true, 3);
    p = play(&p, DifficultyTier::Cet4, true, 5);
    let best = p.difficulty_stats.cet4.best_game.as_ref().unwrap();
    assert_eq!(best.outcome.guesses_used, 3);
  }

  #[test]
  fn recent_games_newest_first_capped_at_ten() {
    let mut p = new_user_progress("10.0.0.1");
    for guesses in 0..13 {
      p = play(&p, DifficultyTier::Cet4, true, guesses);
    }
    let recent = &p.difficulty_stats.cet4.recent_games;
    assert_eq!(recent.len(), RECENT_GAMES_CAP);
    // Newest (guesses 12) first; oldest retained is guesses 3.
    assert_eq!(recent[0].outcome.guesses_used, 12);
    assert_eq!(recent[9].outcome.guesses_used, 3);
  }

  #[test]
  fn first_game_at_tier_sets_unlocked_at() {
    let mut p = new_user_progress("10.0.0.1");
    assert!(p.difficulty_stats.toefl.unlocked_at.is_none());
    p = play(&p, DifficultyTier::Toefl, false, 6);
    let first = p.difficulty_stats.toefl.unlocked_at;
    assert!(first.is_some());
    p = play(&p, DifficultyTier::Toefl, true, 4);
    assert_eq!(p.difficulty_stats.toefl.unlocked_at, first);
  }

  #[test]
  fn win_rate_matches_counts() {
    let mut p = new_user_progress("10.0.0.1");
    for won in [true, false, true, true] {
      p = play(&p, DifficultyTier::Gre, won, 8);
    }
    assert!((p.win_rate - 0.75).abs() < 1e-9);
    assert!((p.difficulty_stats.gre.win_rate - 0.75).abs() < 1e-9);
  }

  #[test]
  fn mastery_recomputed_from_tier_stats() {
    let mut p = new_user_progress("10.0.0.1");
    p.difficulty_stats.cet4.wins = 49;
    p.difficulty_stats.cet4.games_played = 53;
    p.difficulty_stats.cet4.losses = 4;
    p = play(&p, DifficultyTier::Cet4, true, 4);
    let s = p.difficulty_stats.get(DifficultyTier::Cet4);
    assert_eq!(s.wins, 50);
    assert!(s.win_rate >= 0.85);
    assert_eq!(s.mastery_level, crate::domain::MasteryLevel::Master);
  }
}

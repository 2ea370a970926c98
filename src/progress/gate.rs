//! Difficulty gating: which tiers an identity may play, and which tier to
//! suggest next. `is_unlocked` is the authoritative access check;
//! `recommend_next` is only a UX hint.

use crate::domain::{DifficultyTier, MasteryLevel};
use crate::progress::UserProgress;

/// Prerequisite tier and win count required to unlock a tier.
/// `None` means unconditionally available.
pub fn unlock_requirement(tier: DifficultyTier) -> Option<(DifficultyTier, u32)> {
  match tier {
    DifficultyTier::Cet4 => None,
    DifficultyTier::Cet6 => Some((DifficultyTier::Cet4, 3)),
    DifficultyTier::Toefl => Some((DifficultyTier::Cet6, 5)),
    DifficultyTier::Gre => Some((DifficultyTier::Toefl, 8)),
  }
}

/// True when the identity may play the tier.
pub fn is_unlocked(progress: &UserProgress, tier: DifficultyTier) -> bool {
  match unlock_requirement(tier) {
    None => true,
    Some((prerequisite, wins)) => progress.difficulty_stats.get(prerequisite).wins >= wins,
  }
}

/// Suggest the tier to play next.
///
/// Mastered the top tier: stay there. Otherwise a tier mastered to at
/// least expert points at its successor while the successor's win count is
/// still short of that successor's unlock threshold. Failing that, strong
/// win rates nudge one tier up. Failing everything, the stored preference.
pub fn recommend_next(progress: &UserProgress) -> DifficultyTier {
  let stats = &progress.difficulty_stats;

  if stats.get(DifficultyTier::Gre).mastery_level == MasteryLevel::Master {
    return DifficultyTier::Gre;
  }

  for tier in [DifficultyTier::Toefl, DifficultyTier::Cet6, DifficultyTier::Cet4] {
    let Some(next) = tier.next() else { continue };
    let Some((_, threshold)) = unlock_requirement(next) else { continue };
    if stats.get(tier).mastery_level >= MasteryLevel::Expert
      && stats.get(next).wins < threshold
    {
      return next;
    }
  }

  let cet4 = stats.get(DifficultyTier::Cet4);
  if cet4.win_rate > 0.8 && cet4.wins >= 5 {
    return DifficultyTier::Cet6;
  }
  let cet6 = stats.get(DifficultyTier::Cet6);
  if cet6.win_rate > 0.7 && cet6.wins >= 8 {
    return DifficultyTier::Toefl;
  }
  let toefl = stats.get(DifficultyTier::Toefl);
  if toefl.win_rate > 0.6 && toefl.wins >= 10 {
    return DifficultyTier::Gre;
  }

  progress.preferences.preferred_difficulty
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::progress::service::new_user_progress;

  #[test]
  fn cet4_is_always_unlocked() {
    let p = new_user_progress("10.0.0.1");
    assert!(is_unlocked(&p, DifficultyTier::Cet4));
    assert!(!is_unlocked(&p, DifficultyTier::Cet6));
    assert!(!is_unlocked(&p, DifficultyTier::Toefl));
    assert!(!is_unlocked(&p, DifficultyTier::Gre));
  }

  #[test]
  fn cet6_unlocks_at_exactly_three_cet4_wins() {
    let mut p = new_user_progress("10.0.0.1");
    p.difficulty_stats.cet4.wins = 2;
    assert!(!is_unlocked(&p, DifficultyTier::Cet6));
    p.difficulty_stats.cet4.wins = 3;
    assert!(is_unlocked(&p, DifficultyTier::Cet6));
  }

  #[test]
  fn higher_tiers_check_their_immediate_prerequisite() {
    let mut p = new_user_progress("10.0.0.1");
    p.difficulty_stats.cet6.wins = 5;
    assert!(is_unlocked(&p, DifficultyTier::Toefl));
    // gre looks at toefl wins, not at anything lower.
    assert!(!is_unlocked(&p, DifficultyTier::Gre));
    p.difficulty_stats.toefl.wins = 8;
    assert!(is_unlocked(&p, DifficultyTier::Gre));
  }

  #[test]
  fn recommendation_defaults_to_preference() {
    let p = new_user_progress("10.0.0.1");
    assert_eq!(recommend_next(&p), DifficultyTier::Cet4);
  }

  #[test]
  fn expert_mastery_points_at_the_next_locked_tier() {
    let mut p = new_user_progress("10.0.0.1");
    p.difficulty_stats.cet4.mastery_level = MasteryLevel::Expert;
    p.difficulty_stats.cet6.wins = 1;
    assert_eq!(recommend_next(&p), DifficultyTier::Cet6);

    // Highest qualifying tier wins.
    p.difficulty_stats.toefl.mastery_level = MasteryLevel::Expert;
    p.difficulty_stats.gre.wins = 0;
    assert_eq!(recommend_next(&p), DifficultyTier::Gre);
  }

  #[test]
  fn mastered_gre_stays_on_gre() {
    let mut p = new_user_progress("10.0.0.1");
    p.difficulty_stats.gre.mastery_level = MasteryLevel::Master;
    assert_eq!(recommend_next(&p), DifficultyTier::Gre);
  }

  #[test]
  fn win_rate_heuristics_nudge_one_tier_up() {
    let mut p = new_user_progress("10.0.0.1");
    p.difficulty_stats.cet4.wins = 6;
    p.difficulty_stats.cet4.win_rate = 0.85;
    assert_eq!(recommend_next(&p), DifficultyTier::Cet6);

    let mut p = new_user_progress("10.0.0.1");
    p.difficulty_stats.toefl.wins = 12;
    p.difficulty_stats.toefl.win_rate = 0.65;
    assert_eq!(recommend_next(&p), DifficultyTier::Gre);
  }
}

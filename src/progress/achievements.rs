//! Achievement catalog and unlock evaluation.
//!
//! `evaluate` is pure: it diffs the old and new aggregate plus the
//! triggering game and returns the freshly-unlocked achievements in
//! catalog order. Ids already on the aggregate are skipped, so an id can
//! be awarded at most once per identity no matter how often its predicate
//! re-triggers.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DifficultyTier, GameRecord};
use crate::progress::UserProgress;

/// Wins required at one tier for its `*_MASTER` achievement.
const TIER_MASTER_WINS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementId {
  FirstWin,
  Cet4Master,
  Cet6Master,
  ToeflMaster,
  GreMaster,
  SpeedDemon,
  PerfectGame,
  StreakMaster,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
  FirstSteps,
  DifficultyMastery,
  StreakAchievements,
  SpeedAchievements,
  EfficiencyAchievements,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementRarity {
  Common,
  Uncommon,
  Rare,
  Epic,
  Legendary,
}

/// An unlocked achievement as stored on the aggregate.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
  pub id: AchievementId,
  pub name: String,
  pub description: String,
  pub icon: String,
  pub category: AchievementCategory,
  pub rarity: AchievementRarity,
  pub unlocked_at: DateTime<Utc>,
}

/// Static template an unlocked achievement is minted from.
pub struct AchievementDef {
  pub id: AchievementId,
  pub name: &'static str,
  pub description: &'static str,
  pub icon: &'static str,
  pub category: AchievementCategory,
  pub rarity: AchievementRarity,
}

impl AchievementDef {
  fn instantiate(&self, unlocked_at: DateTime<Utc>) -> Achievement {
    Achievement {
      id: self.id,
      name: self.name.to_string(),
      description: self.description.to_string(),
      icon: self.icon.to_string(),
      category: self.category,
      rarity: self.rarity,
      unlocked_at,
    }
  }
}

/// Catalog order is the award order.
pub const CATALOG: [AchievementDef; 8] = [
  AchievementDef {
    id: AchievementId::FirstWin,
    name: "First Victory",
    description: "Win your first game",
    icon: "🎉",
    category: AchievementCategory::FirstSteps,
    rarity: AchievementRarity::Common,
  },
  AchievementDef {
    id: AchievementId::Cet4Master,
    name: "CET-4 Master",
    description: "Win 10 games at CET-4 difficulty",
    icon: "📚",
    category: AchievementCategory::DifficultyMastery,
    rarity: AchievementRarity::Uncommon,
  },
  AchievementDef {
    id: AchievementId::Cet6Master,
    name: "CET-6 Master",
    description: "Win 10 games at CET-6 difficulty",
    icon: "🎓",
    category: AchievementCategory::DifficultyMastery,
    rarity: AchievementRarity::Uncommon,
  },
  AchievementDef {
    id: AchievementId::ToeflMaster,
    name: "TOEFL Master",
    description: "Win 10 games at TOEFL difficulty",
    icon: "🌍",
    category: AchievementCategory::DifficultyMastery,
    rarity: AchievementRarity::Rare,
  },
  AchievementDef {
    id: AchievementId::GreMaster,
    name: "GRE Master",
    description: "Win 10 games at GRE difficulty",
    icon: "🧠",
    category: AchievementCategory::DifficultyMastery,
    rarity: AchievementRarity::Epic,
  },
  AchievementDef {
    id: AchievementId::SpeedDemon,
    name: "Speed Demon",
    description: "Win a game in under 60 seconds",
    icon: "⚡",
    category: AchievementCategory::SpeedAchievements,
    rarity: AchievementRarity::Rare,
  },
  AchievementDef {
    id: AchievementId::PerfectGame,
    name: "Perfect Game",
    description: "Win without any incorrect guesses",
    icon: "💎",
    category: AchievementCategory::EfficiencyAchievements,
    rarity: AchievementRarity::Epic,
  },
  AchievementDef {
    id: AchievementId::StreakMaster,
    name: "Streak Master",
    description: "Win 10 games in a row",
    icon: "🔥",
    category: AchievementCategory::StreakAchievements,
    rarity: AchievementRarity::Legendary,
  },
];

/// The tier whose win count backs a `*_MASTER` id, if it is one.
fn master_tier(id: AchievementId) -> Option<DifficultyTier> {
  match id {
    AchievementId::Cet4Master => Some(DifficultyTier::Cet4),
    AchievementId::Cet6Master => Some(DifficultyTier::Cet6),
    AchievementId::ToeflMaster => Some(DifficultyTier::Toefl),
    AchievementId::GreMaster => Some(DifficultyTier::Gre),
    _ => None,
  }
}

/// Newly-unlocked achievements for this game, stamped with the game's
/// server timestamp.
pub fn evaluate(old: &UserProgress, new: &UserProgress, record: &GameRecord) -> Vec<Achievement> {
  let existing: HashSet<AchievementId> = old.achievements.iter().map(|a| a.id).collect();
  let outcome = &record.outcome;

  let mut unlocked = Vec::new();
  for def in &CATALOG {
    if existing.contains(&def.id) {
      continue;
    }

    let fired = if let Some(tier) = master_tier(def.id) {
      new.difficulty_stats.get(tier).wins >= TIER_MASTER_WINS
    } else {
      match def.id {
        AchievementId::FirstWin => outcome.won && old.total_wins == 0,
        AchievementId::SpeedDemon => outcome.won && outcome.time_elapsed_ms < 60_000,
        AchievementId::PerfectGame => outcome.won && outcome.incorrect_guesses.is_empty(),
        AchievementId::StreakMaster => new.current_streak >= 10,
        _ => false,
      }
    };

    if fired {
      unlocked.push(def.instantiate(record.played_at));
    }
  }

  unlocked
}

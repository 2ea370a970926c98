//! Domain models used by the backend: difficulty tiers, word categories,
//! per-tier configuration, mastery levels, and finished-game records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of difficulty tiers, ordered easiest to hardest.
/// The order drives the unlock prerequisites in the difficulty gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
  Cet4,
  Cet6,
  Toefl,
  Gre,
}

impl DifficultyTier {
  /// All tiers in ascending difficulty order.
  pub const ALL: [DifficultyTier; 4] = [
    DifficultyTier::Cet4,
    DifficultyTier::Cet6,
    DifficultyTier::Toefl,
    DifficultyTier::Gre,
  ];

  /// Wire/storage name of the tier.
  pub fn name(&self) -> &'static str {
    match self {
      DifficultyTier::Cet4 => "cet4",
      DifficultyTier::Cet6 => "cet6",
      DifficultyTier::Toefl => "toefl",
      DifficultyTier::Gre => "gre",
    }
  }

  /// Parse a wire name; `None` for anything outside the closed set.
  pub fn from_name(s: &str) -> Option<Self> {
    match s {
      "cet4" => Some(DifficultyTier::Cet4),
      "cet6" => Some(DifficultyTier::Cet6),
      "toefl" => Some(DifficultyTier::Toefl),
      "gre" => Some(DifficultyTier::Gre),
      _ => None,
    }
  }

  /// The next-harder tier, if any.
  pub fn next(&self) -> Option<Self> {
    match self {
      DifficultyTier::Cet4 => Some(DifficultyTier::Cet6),
      DifficultyTier::Cet6 => Some(DifficultyTier::Toefl),
      DifficultyTier::Toefl => Some(DifficultyTier::Gre),
      DifficultyTier::Gre => None,
    }
  }

  pub fn config(&self) -> &'static DifficultyConfig {
    match self {
      DifficultyTier::Cet4 => &CET4_CONFIG,
      DifficultyTier::Cet6 => &CET6_CONFIG,
      DifficultyTier::Toefl => &TOEFL_CONFIG,
      DifficultyTier::Gre => &GRE_CONFIG,
    }
  }
}

impl std::fmt::Display for DifficultyTier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

/// Closed set of word categories used by generation and the fallback bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordCategory {
  Animals,
  Food,
  Countries,
  Objects,
  Science,
  Technology,
  Nature,
  Sports,
  General,
}

/// Inclusive word-length bounds for a tier.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct WordLengthRange {
  pub min: usize,
  pub max: usize,
}

impl WordLengthRange {
  pub fn contains(&self, len: usize) -> bool {
    len >= self.min && len <= self.max
  }
}

/// Static configuration of one difficulty tier.
pub struct DifficultyConfig {
  pub tier: DifficultyTier,
  pub word_length: WordLengthRange,
  pub categories: &'static [WordCategory],
  pub description: &'static str,
  /// User prompt handed to the word-generation model for this tier.
  pub prompt: &'static str,
}

pub static CET4_CONFIG: DifficultyConfig = DifficultyConfig {
  tier: DifficultyTier::Cet4,
  word_length: WordLengthRange { min: 4, max: 6 },
  categories: &[WordCategory::Animals, WordCategory::Food, WordCategory::Objects],
  description: "英语四级单词。大学毕业要求。",
  prompt: "Generate a single English word suitable for CET-4 level (basic university English). The word must be 4-6 letters long. Choose from common vocabulary that CET-4 students would know. Return only the word, nothing else.",
};

pub static CET6_CONFIG: DifficultyConfig = DifficultyConfig {
  tier: DifficultyTier::Cet6,
  word_length: WordLengthRange { min: 6, max: 8 },
  categories: &[
    WordCategory::Countries,
    WordCategory::Nature,
    WordCategory::Sports,
    WordCategory::General,
  ],
  description: "英语六级单词。研究生毕业要求。",
  prompt: "Generate a single English word suitable for CET-6 level (intermediate university English). The word must be 6-8 letters long and from categories like countries, nature, sports, or general vocabulary. Return only the word, nothing else.",
};

pub static TOEFL_CONFIG: DifficultyConfig = DifficultyConfig {
  tier: DifficultyTier::Toefl,
  word_length: WordLengthRange { min: 7, max: 10 },
  categories: &[
    WordCategory::Science,
    WordCategory::Technology,
    WordCategory::Nature,
    WordCategory::General,
  ],
  description: "托福单词。出国读书必须。",
  prompt: "Generate a single English word suitable for TOEFL level (advanced academic English). The word must be 7-10 letters long and from categories like science, technology, nature, or academic vocabulary. Return only the word, nothing else.",
};

pub static GRE_CONFIG: DifficultyConfig = DifficultyConfig {
  tier: DifficultyTier::Gre,
  word_length: WordLengthRange { min: 8, max: 12 },
  categories: &[WordCategory::Science, WordCategory::Technology],
  description: "GRE单词。难度极大。国外研究生毕业。",
  prompt: "Generate a single English word suitable for GRE level (graduate-level vocabulary). The word must be 8-12 letters long and from specialized categories like science or technology. Return only the word, nothing else.",
};

/// Skill label derived from win count and win rate at one tier.
/// Declaration order matters: later variants outrank earlier ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLevel {
  Beginner,
  Intermediate,
  Advanced,
  Expert,
  Master,
}

/// Both bounds must be met for a level to apply.
pub struct MasteryRequirement {
  pub min_wins: u32,
  pub min_win_rate: f64,
}

impl MasteryLevel {
  /// Levels from highest to lowest, the evaluation order for `for_stats`.
  pub const DESCENDING: [MasteryLevel; 5] = [
    MasteryLevel::Master,
    MasteryLevel::Expert,
    MasteryLevel::Advanced,
    MasteryLevel::Intermediate,
    MasteryLevel::Beginner,
  ];

  pub fn requirement(&self) -> MasteryRequirement {
    match self {
      MasteryLevel::Beginner => MasteryRequirement { min_wins: 0, min_win_rate: 0.0 },
      MasteryLevel::Intermediate => MasteryRequirement { min_wins: 5, min_win_rate: 0.4 },
      MasteryLevel::Advanced => MasteryRequirement { min_wins: 15, min_win_rate: 0.6 },
      MasteryLevel::Expert => MasteryRequirement { min_wins: 30, min_win_rate: 0.75 },
      MasteryLevel::Master => MasteryRequirement { min_wins: 50, min_win_rate: 0.85 },
    }
  }

  /// Highest level whose requirements are both met; `Beginner` otherwise.
  pub fn for_stats(wins: u32, win_rate: f64) -> MasteryLevel {
    for level in MasteryLevel::DESCENDING {
      let req = level.requirement();
      if wins >= req.min_wins && win_rate >= req.min_win_rate {
        return level;
      }
    }
    MasteryLevel::Beginner
  }
}

/// The result of one finished game, as reported by the UI layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOutcome {
  pub difficulty: DifficultyTier,
  pub word_length: u32,
  pub guesses_used: u32,
  pub time_elapsed_ms: u64,
  pub won: bool,
  #[serde(default)]
  pub incorrect_guesses: Vec<char>,
  #[serde(default)]
  pub correct_guesses: Vec<char>,
}

/// Persisted form of an outcome: the outcome plus a generated id and a
/// server-assigned timestamp.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
  pub id: String,
  pub played_at: DateTime<Utc>,
  #[serde(flatten)]
  pub outcome: GameOutcome,
}

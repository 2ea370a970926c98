//! Public request/response structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{DifficultyTier, WordCategory};
use crate::progress::{Achievement, UserProgress};

#[derive(Serialize)]
pub struct HealthOut {
  pub ok: bool,
}

//
// Progress query
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressQuery {
  /// Identity override, mainly for testing; detected client IP otherwise.
  pub identity: Option<String>,
  // Query params arrive as strings; anything except the literal "false"
  // keeps the default of true.
  pub include_recent_games: Option<String>,
  pub include_achievements: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOut {
  pub success: bool,
  pub progress: UserProgress,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub new_achievements: Option<Vec<Achievement>>,
}

//
// Record-game command
//

/// Raw game payload. `difficulty` stays a string here so an unknown tier is
/// rejected as a validation error instead of a generic decode failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOutcomeIn {
  pub difficulty: String,
  pub word_length: u32,
  pub guesses_used: u32,
  pub time_elapsed_ms: u64,
  pub won: bool,
  #[serde(default)]
  pub incorrect_guesses: Vec<char>,
  #[serde(default)]
  pub correct_guesses: Vec<char>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordGameIn {
  pub game_record: GameOutcomeIn,
  pub identity: Option<String>,
}

//
// Word generation
//

#[derive(Debug, Deserialize)]
pub struct WordIn {
  pub difficulty: String,
}

#[derive(Serialize)]
pub struct WordOut {
  pub success: bool,
  pub word: String,
  /// "generated" or "fallback", so the UI can tell canned words apart.
  pub source: &'static str,
}

//
// Difficulty listing
//

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyOut {
  pub tier: DifficultyTier,
  pub description: &'static str,
  pub word_length: crate::domain::WordLengthRange,
  pub categories: &'static [WordCategory],
  pub unlocked: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultiesOut {
  pub difficulties: Vec<DifficultyOut>,
  pub recommended: DifficultyTier,
}

//
// Errors
//

#[derive(Serialize)]
pub struct ErrorOut {
  pub success: bool,
  pub error: String,
}

//! HTTP endpoint handlers. These are thin wrappers that validate input,
//! resolve the client identity, and forward to the service layer.
//! Each handler is instrumented and logs parameters and basic result info.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
  extract::{ConnectInfo, Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};

use crate::domain::{DifficultyTier, GameOutcome};
use crate::identity;
use crate::progress::{gate, ProgressError, ProgressOptions};
use crate::protocol::*;
use crate::state::AppState;

/// Error envelope for the API: validation problems map to 400, persistence
/// problems to 500, both as `{success: false, error}` JSON.
#[derive(Debug)]
pub struct ApiError {
  status: StatusCode,
  message: String,
}

impl From<ProgressError> for ApiError {
  fn from(e: ProgressError) -> Self {
    let status = match &e {
      ProgressError::Validation(_) => StatusCode::BAD_REQUEST,
      ProgressError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    ApiError { status, message: e.to_string() }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let body = Json(ErrorOut { success: false, error: self.message });
    (self.status, body).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state, headers, q))]
pub async fn http_get_progress(
  State(state): State<Arc<AppState>>,
  ConnectInfo(peer): ConnectInfo<SocketAddr>,
  headers: HeaderMap,
  Query(q): Query<ProgressQuery>,
) -> impl IntoResponse {
  let identity = q
    .identity
    .unwrap_or_else(|| identity::resolve(&headers, Some(peer)));
  let options = ProgressOptions {
    include_recent_games: q.include_recent_games.as_deref() != Some("false"),
    include_achievements: q.include_achievements.as_deref() != Some("false"),
  };

  let progress = state.progress.get_progress(&identity, options).await;
  info!(target: "progress", %identity, total_games = progress.total_games, "HTTP progress served");
  Json(ProgressOut { success: true, progress, new_achievements: None })
}

#[instrument(level = "info", skip(state, headers, body), fields(difficulty = %body.game_record.difficulty, won = body.game_record.won))]
pub async fn http_record_game(
  State(state): State<Arc<AppState>>,
  ConnectInfo(peer): ConnectInfo<SocketAddr>,
  headers: HeaderMap,
  Json(body): Json<RecordGameIn>,
) -> Result<Json<ProgressOut>, ApiError> {
  let identity = body
    .identity
    .unwrap_or_else(|| identity::resolve(&headers, Some(peer)));
  let outcome = validate_outcome(body.game_record)?;

  let (progress, new_achievements) = state.progress.record_game(&identity, outcome).await?;
  info!(
    target: "progress",
    %identity,
    total_games = progress.total_games,
    new_achievements = new_achievements.len(),
    "HTTP game recorded"
  );
  Ok(Json(ProgressOut { success: true, progress, new_achievements: Some(new_achievements) }))
}

#[instrument(level = "info", skip(state, body), fields(difficulty = %body.difficulty))]
pub async fn http_generate_word(
  State(state): State<Arc<AppState>>,
  Json(body): Json<WordIn>,
) -> Result<Json<WordOut>, ApiError> {
  let tier = parse_tier(&body.difficulty)?;
  let (word, source) = state.choose_word(tier).await;
  info!(target: "wordgen", %tier, %source, len = word.len(), "HTTP word served");
  Ok(Json(WordOut { success: true, word, source }))
}

#[instrument(level = "info", skip(state, headers))]
pub async fn http_get_difficulties(
  State(state): State<Arc<AppState>>,
  ConnectInfo(peer): ConnectInfo<SocketAddr>,
  headers: HeaderMap,
) -> impl IntoResponse {
  let identity = identity::resolve(&headers, Some(peer));
  let progress = state
    .progress
    .get_progress(&identity, ProgressOptions { include_recent_games: false, include_achievements: false })
    .await;

  let difficulties = DifficultyTier::ALL
    .into_iter()
    .map(|tier| {
      let cfg = tier.config();
      DifficultyOut {
        tier,
        description: cfg.description,
        word_length: cfg.word_length,
        categories: cfg.categories,
        unlocked: gate::is_unlocked(&progress, tier),
      }
    })
    .collect();

  Json(DifficultiesOut { difficulties, recommended: gate::recommend_next(&progress) })
}

fn parse_tier(raw: &str) -> Result<DifficultyTier, ApiError> {
  DifficultyTier::from_name(raw).ok_or_else(|| {
    warn!(target: "progress", difficulty = raw, "Rejected unknown difficulty tier");
    ProgressError::Validation(format!("unknown difficulty tier {raw:?}")).into()
  })
}

/// Command-input validation; nothing here touches the store.
fn validate_outcome(raw: GameOutcomeIn) -> Result<GameOutcome, ApiError> {
  let difficulty = parse_tier(&raw.difficulty)?;
  if raw.word_length == 0 {
    return Err(ProgressError::Validation("wordLength must be positive".into()).into());
  }
  Ok(GameOutcome {
    difficulty,
    word_length: raw.word_length,
    guesses_used: raw.guesses_used,
    time_elapsed_ms: raw.time_elapsed_ms,
    won: raw.won,
    incorrect_guesses: raw.incorrect_guesses,
    correct_guesses: raw.correct_guesses,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_difficulty_is_a_validation_error() {
    let raw = GameOutcomeIn {
      difficulty: "junior".into(),
      word_length: 5,
      guesses_used: 3,
      time_elapsed_ms: 1000,
      won: true,
      incorrect_guesses: vec![],
      correct_guesses: vec![],
    };
    let err = validate_outcome(raw).unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
  }

  #[test]
  fn zero_word_length_is_rejected() {
    let raw = GameOutcomeIn {
      difficulty: "cet4".into(),
      word_length: 0,
      guesses_used: 3,
      time_elapsed_ms: 1000,
      won: false,
      incorrect_guesses: vec![],
      correct_guesses: vec![],
    };
    let err = validate_outcome(raw).unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
  }

  #[test]
  fn valid_payload_converts_to_domain_outcome() {
    let raw = GameOutcomeIn {
      difficulty: "gre".into(),
      word_length: 9,
      guesses_used: 6,
      time_elapsed_ms: 90_000,
      won: true,
      incorrect_guesses: vec!['q'],
      correct_guesses: vec!['a', 'l'],
    };
    let outcome = validate_outcome(raw).unwrap();
    assert_eq!(outcome.difficulty, DifficultyTier::Gre);
    assert_eq!(outcome.incorrect_guesses, vec!['q']);
  }
}

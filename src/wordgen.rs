//! Word-generation client for an OpenAI-compatible chat-completions API.
//!
//! One job: given a difficulty tier, produce a single valid English word.
//! Each attempt asks the model, extracts the first alphabetic token, and
//! validates it against the tier's length rules; invalid words burn an
//! attempt. Calls are instrumented and log model names, latencies, and
//! response sizes (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::Prompts;
use crate::domain::DifficultyTier;
use crate::util::{fill_template, trunc_for_log};

/// Attempts per `generate_word` call before giving up.
const MAX_ATTEMPTS: u32 = 3;

/// Words too common to count as TOEFL/GRE vocabulary.
const SIMPLE_WORDS: &[&str] = &[
  "the", "and", "for", "are", "but", "not", "you", "all", "can", "her", "was", "one", "our",
  "had", "by", "up", "do", "no", "if", "my", "on", "as", "we", "to",
];

#[derive(Debug, Error)]
pub enum WordGenError {
  #[error("word api http {status}: {message}")]
  Api { status: u16, message: String },
  #[error("word api transport error: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("word api returned no usable word")]
  Empty,
  #[error("generated word {word:?} rejected: {reason}")]
  Rejected { word: String, reason: String },
  #[error("word generation failed after {attempts} attempts: {last}")]
  Exhausted { attempts: u32, last: String },
}

#[derive(Clone)]
pub struct WordGen {
  client: reqwest::Client,
  api_key: String,
  pub base_url: String,
  pub model: String,
}

impl WordGen {
  /// Construct the client if we find WORDGEN_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("WORDGEN_API_KEY").ok()?;
    let base_url =
      std::env::var("WORDGEN_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("WORDGEN_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model })
  }

  /// One plain-text chat completion.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_plain(&self, system: &str, user: &str) -> Result<String, WordGenError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature: 0.8,
      max_tokens: Some(8),
    };

    let res = self
      .client
      .post(&url)
      .header(USER_AGENT, "hangman-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req)
      .send()
      .await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_api_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      return Err(WordGenError::Api { status, message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "Word api usage");
    }
    let text = body
      .choices
      .first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default()
      .trim()
      .to_string();

    if text.is_empty() {
      return Err(WordGenError::Empty);
    }
    Ok(text)
  }

  /// Generate one validated word for the tier, retrying with linear backoff.
  /// Fails with `Exhausted` once the attempt budget is spent.
  #[instrument(level = "info", skip(self, prompts), fields(%tier, model = %self.model))]
  pub async fn generate_word(
    &self,
    prompts: &Prompts,
    tier: DifficultyTier,
  ) -> Result<String, WordGenError> {
    let cfg = tier.config();
    let user = fill_template(
      &prompts.wordgen_user_template,
      &[("prompt", cfg.prompt), ("difficulty", tier.name())],
    );

    let mut last = String::new();
    for attempt in 1..=MAX_ATTEMPTS {
      let start = std::time::Instant::now();
      let result = self.chat_plain(&prompts.wordgen_system, &user).await;
      let elapsed = start.elapsed();

      match result.and_then(|text| {
        let word = extract_word(&text).ok_or(WordGenError::Empty)?;
        match validate_word(&word, tier) {
          Ok(()) => Ok(word),
          Err(reason) => Err(WordGenError::Rejected { word, reason: reason.to_string() }),
        }
      }) {
        Ok(word) => {
          let word = word.to_uppercase();
          info!(target: "wordgen", %tier, attempt, ?elapsed, len = word.len(), "Valid word generated");
          return Ok(word);
        }
        Err(e) => {
          warn!(target: "wordgen", %tier, attempt, ?elapsed, error = %e, "Word generation attempt failed");
          last = e.to_string();
        }
      }

      if attempt < MAX_ATTEMPTS {
        tokio::time::sleep(Duration::from_secs(attempt as u64)).await;
      }
    }

    Err(WordGenError::Exhausted { attempts: MAX_ATTEMPTS, last })
  }
}

/// First purely-alphabetic token of a model reply, lowercased.
fn extract_word(response: &str) -> Option<String> {
  let cleaned = response.trim().to_lowercase();
  let first = cleaned
    .split_whitespace()
    .next()?
    .chars()
    .filter(|c| c.is_ascii_alphabetic())
    .collect::<String>();
  if first.is_empty() {
    None
  } else {
    Some(first)
  }
}

/// Tier validation: alphabetic, length within the tier's range, and no
/// trivially common words at the academic tiers.
pub fn validate_word(word: &str, tier: DifficultyTier) -> Result<(), &'static str> {
  if word.is_empty() {
    return Err("empty word");
  }
  if !word.chars().all(|c| c.is_ascii_alphabetic()) {
    return Err("contains non-alphabetic characters");
  }
  let cfg = tier.config();
  if !cfg.word_length.contains(word.len()) {
    return Err("length outside tier range");
  }
  let academic = matches!(tier, DifficultyTier::Toefl | DifficultyTier::Gre);
  if academic && SIMPLE_WORDS.contains(&word.to_lowercase().as_str()) {
    return Err("word too simple for tier");
  }
  Ok(())
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq {
  role: String,
  content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)]
  usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice {
  message: ChatMessageResp,
}
#[derive(Deserialize)]
struct ChatMessageResp {
  content: Option<String>,
}
#[derive(Deserialize)]
struct Usage {
  #[serde(default)]
  prompt_tokens: Option<u32>,
  #[serde(default)]
  completion_tokens: Option<u32>,
  #[serde(default)]
  total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an API error body.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap {
    error: EObj,
  }
  #[derive(Deserialize)]
  struct EObj {
    message: String,
  }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extract_word_takes_first_alphabetic_token() {
    assert_eq!(extract_word("  Apple. \n"), Some("apple".into()));
    assert_eq!(extract_word("\"banana\" is my pick"), Some("banana".into()));
    assert_eq!(extract_word("123 456"), None);
    assert_eq!(extract_word(""), None);
  }

  #[test]
  fn validate_word_checks_tier_length() {
    assert!(validate_word("apple", DifficultyTier::Cet4).is_ok());
    // 3 letters is below the cet4 minimum of 4.
    assert!(validate_word("cat", DifficultyTier::Cet4).is_err());
    assert!(validate_word("chemistry", DifficultyTier::Gre).is_ok());
    assert!(validate_word("go", DifficultyTier::Gre).is_err());
  }

  #[test]
  fn validate_word_accepts_academic_vocabulary() {
    assert!(validate_word("society", DifficultyTier::Toefl).is_ok());
    assert!(validate_word("because", DifficultyTier::Toefl).is_ok());
    assert!(validate_word("the", DifficultyTier::Toefl).is_err());
  }

  #[test]
  fn validate_word_rejects_non_alphabetic() {
    assert!(validate_word("ap-ple", DifficultyTier::Cet4).is_err());
    assert!(validate_word("", DifficultyTier::Cet4).is_err());
  }
}

//! Application state: progress service, word-generation client, prompts.
//!
//! Built once in main and shared behind an Arc. Request handlers receive
//! it through axum state, never through a module-level global.

use tracing::{error, info, instrument, warn};

use crate::config::{load_config_from_env, Prompts};
use crate::domain::DifficultyTier;
use crate::progress::{ProgressService, ProgressStore};
use crate::wordgen::WordGen;
use crate::words;

pub struct AppState {
  pub progress: ProgressService,
  pub wordgen: Option<WordGen>,
  pub prompts: Prompts,
  pub retention_days: u32,
}

impl AppState {
  /// Build state from env: load config, open the store, init the word
  /// generation client if an API key is present.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Self {
    let cfg = load_config_from_env().unwrap_or_default();

    info!(
      target: "hangman_backend",
      data_path = %cfg.data_path.display(),
      retention_days = cfg.retention_days,
      "Progress store configured"
    );
    let store = ProgressStore::new(cfg.data_path.clone());

    let wordgen = WordGen::from_env();
    if let Some(wg) = &wordgen {
      info!(target: "wordgen", base_url = %wg.base_url, model = %wg.model, "Word generation enabled.");
    } else {
      info!(target: "wordgen", "Word generation disabled (no WORDGEN_API_KEY). Using fallback word bank.");
    }

    Self {
      progress: ProgressService::new(store),
      wordgen,
      prompts: cfg.prompts,
      retention_days: cfg.retention_days,
    }
  }

  /// Selection policy: ask the model for a fresh word when the client is
  /// configured; otherwise (or after its retry budget is spent) serve one
  /// from the built-in bank.
  #[instrument(level = "info", skip(self), fields(%tier))]
  pub async fn choose_word(&self, tier: DifficultyTier) -> (String, &'static str) {
    if let Some(wg) = &self.wordgen {
      match wg.generate_word(&self.prompts, tier).await {
        Ok(word) => {
          info!(target: "wordgen", %tier, len = word.len(), source = "generated", "Generated fresh word");
          return (word, "generated");
        }
        Err(e) => {
          error!(target: "wordgen", %tier, error = %e, "Word generation failed; using fallback bank");
        }
      }
    } else {
      warn!(target: "wordgen", %tier, "WORDGEN_API_KEY not set; using fallback bank");
    }

    let word = words::fallback_word(tier);
    info!(target: "wordgen", %tier, len = word.len(), source = "fallback", "Served fallback word");
    (word, "fallback")
  }
}

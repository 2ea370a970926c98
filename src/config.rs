//! Loading application configuration (storage, retention, prompts) from TOML.
//!
//! See `AppConfig` and `Prompts` for the expected schema. Everything has a
//! default, so running without a config file is fully supported.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
  /// Durable progress file (identity -> aggregate mapping).
  #[serde(default = "default_data_path")]
  pub data_path: PathBuf,
  /// Aggregates idle longer than this are purged by the startup sweep.
  #[serde(default = "default_retention_days")]
  pub retention_days: u32,
  #[serde(default)]
  pub prompts: Prompts,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      data_path: default_data_path(),
      retention_days: default_retention_days(),
      prompts: Prompts::default(),
    }
  }
}

fn default_data_path() -> PathBuf {
  PathBuf::from(".data/user-progress.json")
}

fn default_retention_days() -> u32 {
  90
}

/// Prompts used by the word-generation client. Defaults match the tone the
/// game expects; override them in TOML to tune wording.
///
/// The user template understands `{prompt}` (the tier's built-in generation
/// prompt) and `{difficulty}` placeholders.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  pub wordgen_system: String,
  pub wordgen_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      wordgen_system: "You are an English word generator for a hangman game. Return ONLY the word, no explanations, no Chinese text, no punctuation.".into(),
      wordgen_user_template: "{prompt}".into(),
    }
  }
}

/// Attempt to load `AppConfig` from HANGMAN_CONFIG_PATH. On any parsing/IO
/// error, returns None and the caller falls back to defaults.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("HANGMAN_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "hangman_backend", %path, "Loaded app config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "hangman_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "hangman_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

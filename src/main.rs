//! Hangman · Word Game Backend
//!
//! - Axum HTTP API (progress tracking, word generation, difficulty gating)
//! - Optional AI word generation (via environment variables)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT             : u16 (default 3000)
//!   WORDGEN_API_KEY  : enables AI word generation if present
//!   WORDGEN_BASE_URL : default "https://api.openai.com/v1"
//!   WORDGEN_MODEL    : default "gpt-4o-mini"
//!   HANGMAN_CONFIG_PATH : path to TOML config (storage, retention, prompts)
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod identity;
mod words;
mod wordgen;
mod progress;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (progress store, word generation client).
  let state = Arc::new(AppState::new());

  // Retention sweep runs once at startup, never on the request path.
  match state.progress.cleanup(state.retention_days).await {
    Ok(removed) => {
      info!(target: "progress", removed, "Startup retention sweep done");
    }
    Err(e) => {
      warn!(target: "progress", error = %e, "Startup retention sweep failed; continuing");
    }
  }

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "hangman_backend", %addr, "HTTP server listening");
  // ConnectInfo gives handlers the peer address for identity resolution.
  axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
  Ok(())
}

//! File-backed progress store with a write-through in-memory cache.
//!
//! One JSON file holds the whole identity -> aggregate mapping; every save
//! rereads and rewrites it in full. The cache keeps every identity ever
//! loaded for the process lifetime (fine for a low-traffic, single-process
//! deployment). A missing or unparseable file is treated as "no data" so a
//! corrupt file can never take the service down; a failed write is a hard
//! error because progress would otherwise silently not persist.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::progress::{ProgressError, UserProgress};

#[derive(Clone)]
pub struct ProgressStore {
  path: PathBuf,
  cache: Arc<RwLock<HashMap<String, UserProgress>>>,
}

impl ProgressStore {
  /// Open a store over the given file, creating its parent directory.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        if let Err(e) = std::fs::create_dir_all(parent) {
          error!(target: "progress", path = %parent.display(), error = %e, "Failed to create data directory");
        }
      }
    }
    Self { path, cache: Arc::new(RwLock::new(HashMap::new())) }
  }

  #[allow(dead_code)]
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Full mapping from disk. Missing or corrupt file degrades to empty.
  fn read_all(&self) -> HashMap<String, UserProgress> {
    let raw = match std::fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(_) => return HashMap::new(),
    };
    match serde_json::from_str(&raw) {
      Ok(map) => map,
      Err(e) => {
        warn!(target: "progress", path = %self.path.display(), error = %e, "Progress file is corrupt; starting from empty state");
        HashMap::new()
      }
    }
  }

  /// Whole-file rewrite. Serialization problems surface as IO errors.
  fn write_all(&self, map: &HashMap<String, UserProgress>) -> Result<(), ProgressError> {
    let json = serde_json::to_string_pretty(map)
      .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(&self.path, json)?;
    Ok(())
  }

  /// Cache-first load; only a cache miss reads the durable file.
  #[instrument(level = "debug", skip(self), fields(%identity))]
  pub async fn load(&self, identity: &str) -> Option<UserProgress> {
    if let Some(cached) = self.cache.read().await.get(identity) {
      return Some(cached.clone());
    }

    let progress = self.read_all().remove(identity)?;
    self.cache.write().await.insert(identity.to_string(), progress.clone());
    Some(progress)
  }

  /// Keep an aggregate in the cache without persisting it. Used for
  /// lazily-created aggregates so repeated reads see a stable record.
  pub async fn cache(&self, identity: &str, progress: &UserProgress) {
    self.cache.write().await.insert(identity.to_string(), progress.clone());
  }

  /// Write through to cache and durable file. Success means the file write
  /// completed; on failure the cache may be ahead of disk until the next
  /// successful save.
  #[instrument(level = "debug", skip(self, progress), fields(%identity))]
  pub async fn save(&self, identity: &str, progress: &UserProgress) -> Result<(), ProgressError> {
    self.cache.write().await.insert(identity.to_string(), progress.clone());

    let mut all = self.read_all();
    all.insert(identity.to_string(), progress.clone());
    self.write_all(&all)
  }

  /// Drop aggregates idle for longer than `max_age_days`, rewrite the file,
  /// and clear the cache. Returns how many were removed.
  #[instrument(level = "info", skip(self))]
  pub async fn cleanup(&self, max_age_days: u32) -> Result<usize, ProgressError> {
    let cutoff = Utc::now() - Duration::days(i64::from(max_age_days));

    let mut all = self.read_all();
    let before = all.len();
    all.retain(|_, progress| progress.last_played_at > cutoff);
    let removed = before - all.len();

    self.write_all(&all)?;
    self.cache.write().await.clear();

    info!(target: "progress", max_age_days, removed, kept = all.len(), "Retention sweep finished");
    Ok(removed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::progress::service::new_user_progress;

  fn temp_store() -> ProgressStore {
    let path = std::env::temp_dir()
      .join(format!("hangman-progress-{}.json", uuid::Uuid::new_v4()));
    ProgressStore::new(path)
  }

  #[tokio::test]
  async fn load_of_unknown_identity_is_none() {
    let store = temp_store();
    assert!(store.load("198.51.100.1").await.is_none());
  }

  #[tokio::test]
  async fn save_then_load_round_trips_field_for_field() {
    use crate::domain::{DifficultyTier, GameOutcome, GameRecord};
    use crate::progress::{achievements, aggregate};

    let store = temp_store();
    // Populate nested state the way the service would: recent games, best
    // game, and an unlocked achievement.
    let mut progress = new_user_progress("198.51.100.1");
    for guesses in [4, 6] {
      let record = GameRecord {
        id: uuid::Uuid::new_v4().to_string(),
        played_at: Utc::now(),
        outcome: GameOutcome {
          difficulty: DifficultyTier::Cet4,
          word_length: 5,
          guesses_used: guesses,
          time_elapsed_ms: 30_000,
          won: true,
          incorrect_guesses: vec![],
          correct_guesses: vec!['a', 'e'],
        },
      };
      let updated = aggregate::apply(&progress, &record);
      let unlocked = achievements::evaluate(&progress, &updated, &record);
      progress = updated;
      progress.achievements.extend(unlocked);
    }
    assert!(!progress.achievements.is_empty());

    store.save("198.51.100.1", &progress).await.unwrap();

    // Fresh store over the same file: no cache, must read from disk.
    let reopened = ProgressStore::new(store.path().to_path_buf());
    let loaded = reopened.load("198.51.100.1").await.unwrap();
    assert_eq!(
      serde_json::to_value(&loaded).unwrap(),
      serde_json::to_value(&progress).unwrap()
    );
  }

  #[tokio::test]
  async fn corrupt_file_degrades_to_empty() {
    let store = temp_store();
    std::fs::write(store.path(), "{ not json").unwrap();
    assert!(store.load("198.51.100.1").await.is_none());

    // And saving over the corrupt file works.
    let progress = new_user_progress("198.51.100.1");
    store.save("198.51.100.1", &progress).await.unwrap();
    assert!(store.load("198.51.100.1").await.is_some());
  }

  #[tokio::test]
  async fn save_keeps_other_identities() {
    let store = temp_store();
    store.save("a", &new_user_progress("a")).await.unwrap();
    store.save("b", &new_user_progress("b")).await.unwrap();

    let reopened = ProgressStore::new(store.path().to_path_buf());
    assert!(reopened.load("a").await.is_some());
    assert!(reopened.load("b").await.is_some());
  }

  #[tokio::test]
  async fn cleanup_drops_stale_aggregates() {
    let store = temp_store();
    let mut stale = new_user_progress("stale");
    stale.last_played_at = Utc::now() - Duration::days(120);
    let fresh = new_user_progress("fresh");
    store.save("stale", &stale).await.unwrap();
    store.save("fresh", &fresh).await.unwrap();

    let removed = store.cleanup(90).await.unwrap();
    assert_eq!(removed, 1);

    let reopened = ProgressStore::new(store.path().to_path_buf());
    assert!(reopened.load("stale").await.is_none());
    assert!(reopened.load("fresh").await.is_some());
  }
}

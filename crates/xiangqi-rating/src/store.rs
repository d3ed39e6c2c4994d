//! Rating persistence.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Rating used when nothing has been stored yet.
pub const DEFAULT_RATING: i32 = 1200;

/// Errors from a rating store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access rating file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed rating file: {0}")]
    Format(#[from] serde_json::Error),

    #[error("rating store is unavailable")]
    Unavailable,
}

/// Where a player's rating lives between games.
///
/// Loaded once when a practice session starts and saved after every
/// finished game.
pub trait RatingStore {
    /// Returns the stored rating, or `None` if none has been saved.
    fn load(&self) -> Result<Option<i32>, StoreError>;

    /// Persists `rating`, replacing any previous value.
    fn save(&mut self, rating: i32) -> Result<(), StoreError>;
}

/// Loads the stored rating, falling back to [`DEFAULT_RATING`].
pub fn load_or_default<S: RatingStore + ?Sized>(store: &S) -> Result<i32, StoreError> {
    Ok(store.load()?.unwrap_or(DEFAULT_RATING))
}

#[derive(Debug, Serialize, Deserialize)]
struct RatingFile {
    rating: i32,
}

/// Stores the rating as `{"rating": n}` in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RatingStore for JsonFileStore {
    fn load(&self) -> Result<Option<i32>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let file: RatingFile = serde_json::from_str(&content)?;
        Ok(Some(file.rating))
    }

    fn save(&mut self, rating: i32) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&RatingFile { rating })?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), rating, "rating saved");
        Ok(())
    }
}

/// In-memory store. Clones share the same slot, so a test can keep a handle
/// and observe what a session saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<i32>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `rating`.
    pub fn with_rating(rating: i32) -> Self {
        MemoryStore {
            slot: Arc::new(Mutex::new(Some(rating))),
        }
    }
}

impl RatingStore for MemoryStore {
    fn load(&self) -> Result<Option<i32>, StoreError> {
        self.slot
            .lock()
            .map(|slot| *slot)
            .map_err(|_| StoreError::Unavailable)
    }

    fn save(&mut self, rating: i32) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().map_err(|_| StoreError::Unavailable)?;
        *slot = Some(rating);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(load_or_default(&store).unwrap(), DEFAULT_RATING);

        let observer = store.clone();
        store.save(1234).unwrap();
        assert_eq!(observer.load().unwrap(), Some(1234));
        assert_eq!(MemoryStore::with_rating(900).load().unwrap(), Some(900));
    }

    #[test]
    fn missing_file_has_no_rating() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("rating.json"));
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(load_or_default(&store).unwrap(), DEFAULT_RATING);
    }

    #[test]
    fn json_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("rating.json");
        let mut store = JsonFileStore::new(&path);
        store.save(1223).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["rating"], 1223);
        assert_eq!(JsonFileStore::new(&path).load().unwrap(), Some(1223));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rating.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Format(_))));
    }
}

//! High score tracking
//!
//! The best score is persisted to LocalStorage as a plain integer. If the
//! store cannot be written the session keeps tracking the best score in
//! memory.

use std::fmt;

/// Errors a high score store can report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No persistent storage available (private mode, no window, ...)
    Unavailable,
    /// The storage backend rejected the write
    WriteFailed(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable => write!(f, "storage unavailable"),
            StoreError::WriteFailed(msg) => write!(f, "storage write failed: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Persistent home of the best score
pub trait HighScoreStore {
    /// Stored best score, 0 when nothing is stored or it cannot be read
    fn load(&self) -> u64;
    fn save(&mut self, score: u64) -> Result<(), StoreError>;
}

/// In-memory store; also the native fallback
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: u64,
    fail_writes: bool,
    writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// A store whose writes always fail, for exercising the fallback path
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Successful writes so far
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u64 {
        self.value
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable);
        }
        self.value = score;
        self.writes += 1;
        Ok(())
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "bamboo_slice_high_score";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> u64 {
        let stored = Self::storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        match stored.map(|json| serde_json::from_str::<u64>(&json)) {
            Some(Ok(score)) => {
                log::info!("Loaded high score {}", score);
                score
            }
            Some(Err(e)) => {
                log::warn!("Ignoring unreadable high score: {}", e);
                0
            }
            None => 0,
        }
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        let storage = Self::storage().ok_or(StoreError::Unavailable)?;
        let json = serde_json::to_string(&score)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| StoreError::WriteFailed(format!("{:?}", e)))
    }
}

/// Platform default store
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn HighScoreStore> {
    Box::new(LocalStorageStore)
}

/// Native stub
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn HighScoreStore> {
    Box::new(MemoryStore::new())
}

/// Session view of the best score
#[derive(Debug, Clone)]
pub struct HighScore {
    best: u64,
    /// Cleared after the first failed write; later records stay in memory
    persist: bool,
}

impl HighScore {
    /// Read the stored best once at startup
    pub fn load(store: &dyn HighScoreStore) -> Self {
        Self {
            best: store.load(),
            persist: true,
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Whether records are still being written to the store
    pub fn is_persistent(&self) -> bool {
        self.persist
    }

    /// Offer a score. Returns true if it set a new record.
    pub fn offer(&mut self, score: u64, store: &mut dyn HighScoreStore) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;

        if self.persist {
            if let Err(e) = store.save(score) {
                log::warn!("High score not saved ({}); keeping it in memory", e);
                self.persist = false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_record_is_saved() {
        let mut store = MemoryStore::with_value(100);
        let mut high = HighScore::load(&store);
        assert_eq!(high.best(), 100);

        assert!(!high.offer(90, &mut store));
        assert!(!high.offer(100, &mut store));
        assert_eq!(store.writes(), 0);

        assert!(high.offer(160, &mut store));
        assert_eq!(high.best(), 160);
        assert_eq!(store.value(), 160);
    }

    proptest! {
        #[test]
        fn prop_best_never_decreases(scores in prop::collection::vec(0u64..10_000, 1..40)) {
            let mut store = MemoryStore::new();
            let mut high = HighScore::load(&store);
            let mut last = 0;
            for score in &scores {
                high.offer(*score, &mut store);
                prop_assert!(high.best() >= last);
                last = high.best();
            }
            prop_assert_eq!(high.best(), scores.iter().copied().max().unwrap_or(0));
            prop_assert_eq!(store.value(), high.best());
        }
    }

    #[test]
    fn test_failed_store_degrades_to_memory() {
        let mut store = MemoryStore::failing();
        let mut high = HighScore::load(&store);
        assert!(high.offer(50, &mut store));
        assert!(!high.is_persistent());
        assert!(high.offer(70, &mut store));
        assert_eq!(high.best(), 70);
        assert_eq!(store.value(), 0);
    }

    #[test]
    fn test_save_of_load_is_noop() {
        let mut store = MemoryStore::with_value(420);
        let loaded = store.load();
        store.save(loaded).unwrap();
        assert_eq!(store.load(), 420);
    }

    #[test]
    fn test_store_error_display() {
        assert_eq!(StoreError::Unavailable.to_string(), "storage unavailable");
        assert_eq!(
            StoreError::WriteFailed("quota".into()).to_string(),
            "storage write failed: quota"
        );
    }
}

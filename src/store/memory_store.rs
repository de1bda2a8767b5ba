use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::StoreError;
use crate::store::LeaderboardStore;
use crate::store::schema::HighScoreEntry;

/// In-process store, used when the data directory cannot be created and by
/// tests. `set_available(false)` makes every load and save fail.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<HighScoreEntry>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<HighScoreEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<HighScoreEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl LeaderboardStore for MemoryStore {
    fn load(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        let entries = self.entries.lock().map_err(|_| StoreError::Unavailable)?;
        Ok(entries.clone())
    }

    fn save(&self, entries: &[HighScoreEntry]) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        let mut stored = self.entries.lock().map_err(|_| StoreError::Unavailable)?;
        *stored = entries.to_vec();
        Ok(())
    }
}

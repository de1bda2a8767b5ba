pub mod json_store;
pub mod memory_store;
pub mod schema;

use crate::error::StoreError;
use crate::store::schema::HighScoreEntry;

/// Whole-blob persistence for the leaderboard. Every save replaces the full
/// list; there is no partial update format.
pub trait LeaderboardStore: Send {
    /// A store with nothing saved yet loads as an empty list.
    fn load(&self) -> Result<Vec<HighScoreEntry>, StoreError>;
    fn save(&self, entries: &[HighScoreEntry]) -> Result<(), StoreError>;
}

impl<T: LeaderboardStore + Sync> LeaderboardStore for std::sync::Arc<T> {
    fn load(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        (**self).load()
    }

    fn save(&self, entries: &[HighScoreEntry]) -> Result<(), StoreError> {
        (**self).save(entries)
    }
}

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::error::StoreError;
use crate::store::LeaderboardStore;
use crate::store::schema::HighScoreEntry;

const HIGH_SCORES_FILE: &str = "high_scores.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(Self::default_dir())
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizr")
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }
}

impl LeaderboardStore for JsonStore {
    fn load(&self) -> Result<Vec<HighScoreEntry>, StoreError> {
        let path = self.file_path(HIGH_SCORES_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes to a temp file first and renames it over the old list, so a
    /// crash mid-write leaves the previous leaderboard intact.
    fn save(&self, entries: &[HighScoreEntry]) -> Result<(), StoreError> {
        let path = self.file_path(HIGH_SCORES_FILE);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(entries)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

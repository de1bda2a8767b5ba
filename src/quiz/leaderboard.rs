use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::QuizError;
use crate::quiz::question::Difficulty;
use crate::quiz::score::ScoreSummary;
use crate::store::LeaderboardStore;
use crate::store::schema::HighScoreEntry;

pub const MAX_ENTRIES: usize = 10;

/// Ranked, capped history of finished sessions backed by a whole-blob store.
///
/// Storage failures never escape: an unreadable store starts the board
/// empty, an unwritable one keeps the in-memory ranking and skips the write.
/// Two processes sharing a store are not coordinated; the last save wins.
pub struct Leaderboard {
    entries: Vec<HighScoreEntry>,
    store: Box<dyn LeaderboardStore>,
    last_id: u64,
    latest: Option<u64>,
    last_error: Option<QuizError>,
}

impl Leaderboard {
    pub fn open(store: Box<dyn LeaderboardStore>) -> Self {
        let (entries, last_error) = match store.load() {
            Ok(mut entries) => {
                rank(&mut entries);
                (entries, None)
            }
            Err(err) => {
                warn!("leaderboard unreadable, starting empty: {err}");
                (Vec::new(), Some(QuizError::from(err)))
            }
        };
        let last_id = entries.iter().map(|e| e.id).max().unwrap_or(0);
        Self {
            entries,
            store,
            last_id,
            latest: None,
            last_error,
        }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id of the entry recorded last in this process, if any.
    pub fn latest_id(&self) -> Option<u64> {
        self.latest
    }

    /// 1-based position of the latest entry, `None` once it fell off the board.
    pub fn latest_rank(&self) -> Option<usize> {
        let id = self.latest?;
        self.entries.iter().position(|e| e.id == id).map(|i| i + 1)
    }

    /// Most recent storage failure, cleared by the next successful save.
    pub fn last_error(&self) -> Option<&QuizError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn record(&mut self, summary: ScoreSummary, difficulty: Difficulty) -> &[HighScoreEntry] {
        self.record_at(summary, difficulty, Utc::now())
    }

    pub fn record_at(
        &mut self,
        summary: ScoreSummary,
        difficulty: Difficulty,
        timestamp: DateTime<Utc>,
    ) -> &[HighScoreEntry] {
        let id = self.next_id(timestamp);
        self.latest = Some(id);
        self.entries
            .push(HighScoreEntry::new(summary, difficulty, timestamp, id));
        rank(&mut self.entries);
        debug!(
            id,
            correct = summary.correct,
            answered = summary.answered,
            "recorded high score"
        );

        match self.store.save(&self.entries) {
            Ok(()) => self.last_error = None,
            Err(err) => {
                warn!("failed to persist leaderboard: {err}");
                self.last_error = Some(QuizError::from(err));
            }
        }
        &self.entries
    }

    fn next_id(&mut self, timestamp: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(timestamp.timestamp_millis()).unwrap_or(0);
        self.last_id = millis.max(self.last_id + 1);
        self.last_id
    }
}

/// Sort by correct answers, then by correct/answered ratio, both descending,
/// and keep the top ten. The sort is stable, so full ties keep insertion
/// order.
pub fn rank(entries: &mut Vec<HighScoreEntry>) {
    entries.sort_by(compare_entries);
    entries.truncate(MAX_ENTRIES);
}

fn compare_entries(a: &HighScoreEntry, b: &HighScoreEntry) -> Ordering {
    b.correct
        .cmp(&a.correct)
        .then_with(|| b.ratio().total_cmp(&a.ratio()))
}

pub fn is_ranked(entries: &[HighScoreEntry]) -> bool {
    entries.len() <= MAX_ENTRIES
        && entries
            .windows(2)
            .all(|pair| compare_entries(&pair[0], &pair[1]) != Ordering::Greater)
}

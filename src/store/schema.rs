use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::question::Difficulty;
use crate::quiz::score::ScoreSummary;

/// One finished session on the leaderboard. Aliases accept the short and
/// camelCase names older score files used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    #[serde(alias = "score")]
    pub correct: u32,
    #[serde(alias = "total")]
    pub answered: u32,
    #[serde(alias = "totalQuestions")]
    pub total_questions: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
    pub id: u64,
}

impl HighScoreEntry {
    pub fn new(summary: ScoreSummary, difficulty: Difficulty, timestamp: DateTime<Utc>, id: u64) -> Self {
        Self {
            correct: summary.correct,
            answered: summary.answered,
            total_questions: summary.total_questions,
            difficulty,
            timestamp,
            id,
        }
    }

    /// correct/answered, with 0/0 ranked as 0.
    pub fn ratio(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            self.correct as f64 / self.answered as f64
        }
    }

    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary {
            correct: self.correct,
            answered: self.answered,
            total_questions: self.total_questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_field_names_deserialize() {
        let json = r#"{
            "score": 7,
            "total": 9,
            "totalQuestions": 10,
            "difficulty": "hard",
            "date": "2024-03-01T12:00:00.000Z",
            "id": 1709294400000
        }"#;
        let entry: HighScoreEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.correct, 7);
        assert_eq!(entry.answered, 9);
        assert_eq!(entry.total_questions, 10);
        assert_eq!(entry.difficulty, Difficulty::Hard);
        assert_eq!(entry.id, 1_709_294_400_000);
    }

    #[test]
    fn test_ratio_of_unanswered_entry_is_zero() {
        let entry = HighScoreEntry::new(ScoreSummary::default(), Difficulty::Easy, Utc::now(), 1);
        assert_eq!(entry.ratio(), 0.0);
    }
}

use serde::{Deserialize, Serialize};

use crate::quiz::answer::{AnswerRecord, AnswerState};
use crate::quiz::question::Question;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub correct: u32,
    pub answered: u32,
    pub total_questions: u32,
}

impl ScoreSummary {
    /// Share of answered questions that were correct, rounded to a whole
    /// percent. Zero when nothing was answered.
    pub fn percentage(&self) -> u32 {
        if self.answered == 0 {
            return 0;
        }
        (self.correct as f64 / self.answered as f64 * 100.0).round() as u32
    }

    pub fn grade(&self) -> Grade {
        Grade::from_percentage(self.percentage())
    }
}

/// Only `Selected` answers count as answered; skipped and unanswered
/// questions are left out of the accuracy ratio.
pub fn compute_score(questions: &[Question], answers: &AnswerRecord) -> ScoreSummary {
    let mut summary = ScoreSummary {
        total_questions: questions.len() as u32,
        ..ScoreSummary::default()
    };
    for (index, question) in questions.iter().enumerate() {
        if let AnswerState::Selected(answer) = answers.get(index) {
            summary.answered += 1;
            if question.is_correct(answer) {
                summary.correct += 1;
            }
        }
    }
    summary
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grade {
    Outstanding,
    Excellent,
    Good,
    Fair,
    Pass,
    KeepLearning,
}

impl Grade {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Grade::Outstanding,
            80..=89 => Grade::Excellent,
            70..=79 => Grade::Good,
            60..=69 => Grade::Fair,
            50..=59 => Grade::Pass,
            _ => Grade::KeepLearning,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Grade::Outstanding => "Outstanding! You're a quiz master!",
            Grade::Excellent => "Excellent work! Well done!",
            Grade::Good => "Good job! You did well!",
            Grade::Fair => "Not bad! Keep practicing!",
            Grade::Pass => "You passed! Try again for a better score!",
            Grade::KeepLearning => "Keep learning! You'll do better next time!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::question::Difficulty;

    fn question(correct: &str) -> Question {
        Question {
            id: correct.to_string(),
            text: "Q?".to_string(),
            answers: vec![
                correct.to_string(),
                "w1".to_string(),
                "w2".to_string(),
                "w3".to_string(),
            ],
            correct_answer: correct.to_string(),
            difficulty: Difficulty::Easy,
            category: "General".to_string(),
        }
    }

    #[test]
    fn test_skipped_and_unanswered_are_not_counted() {
        let questions = vec![question("a"), question("b"), question("c"), question("d")];
        let mut answers = AnswerRecord::new(4);
        answers.record(0, AnswerState::Selected("a".to_string()));
        answers.record(1, AnswerState::Selected("w1".to_string()));
        answers.record(2, AnswerState::Skipped);

        let summary = compute_score(&questions, &answers);
        assert_eq!(
            summary,
            ScoreSummary {
                correct: 1,
                answered: 2,
                total_questions: 4
            }
        );
    }

    #[test]
    fn test_score_bounds_hold() {
        let questions = vec![question("a"), question("b"), question("c")];
        let mut answers = AnswerRecord::new(3);
        for (i, q) in questions.iter().enumerate() {
            answers.record(i, AnswerState::Selected(q.correct_answer.clone()));
        }
        let summary = compute_score(&questions, &answers);
        assert!(summary.correct <= summary.answered);
        assert!(summary.answered <= summary.total_questions);
        assert_eq!(summary.percentage(), 100);
    }

    #[test]
    fn test_percentage_is_zero_without_answers() {
        let summary = ScoreSummary {
            correct: 0,
            answered: 0,
            total_questions: 10,
        };
        assert_eq!(summary.percentage(), 0);
        assert_eq!(summary.grade(), Grade::KeepLearning);
    }

    #[test]
    fn test_percentage_rounds() {
        let summary = ScoreSummary {
            correct: 2,
            answered: 3,
            total_questions: 3,
        };
        assert_eq!(summary.percentage(), 67);
        assert_eq!(summary.grade(), Grade::Fair);
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_percentage(90), Grade::Outstanding);
        assert_eq!(Grade::from_percentage(89), Grade::Excellent);
        assert_eq!(Grade::from_percentage(70), Grade::Good);
        assert_eq!(Grade::from_percentage(50), Grade::Pass);
        assert_eq!(Grade::from_percentage(49), Grade::KeepLearning);
    }
}

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::QuizError;
use crate::quiz::answer::{AnswerRecord, AnswerState};
use crate::quiz::countdown::Countdown;
use crate::quiz::leaderboard::Leaderboard;
use crate::quiz::question::{Difficulty, Question};
use crate::quiz::score::{ScoreSummary, compute_score};
use crate::source::QuestionSource;

pub const QUESTION_TIME_SECS: u32 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Active,
    Completed,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Loading => "loading",
            SessionState::Active => "active",
            SessionState::Completed => "completed",
        }
    }
}

/// Sub-state of the current question while the session is active. A
/// question is locked exactly when something is recorded for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionPhase {
    Unlocked,
    Locked,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Nothing recorded for the current question yet, or not active.
    Blocked,
    Next,
    Completed(ScoreSummary),
}

/// One play-through: question list, position, answers and countdown.
///
/// Idle -> Loading -> Active -> Completed, and `reset` back to Idle from
/// anywhere. Difficulty survives resets.
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    answers: AnswerRecord,
    time_remaining: u32,
    difficulty: Difficulty,
    state: SessionState,
    score: Option<ScoreSummary>,
    last_error: Option<String>,
    countdown: Countdown,
}

impl QuizSession {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            questions: Vec::new(),
            current_index: 0,
            answers: AnswerRecord::default(),
            time_remaining: QUESTION_TIME_SECS,
            difficulty,
            state: SessionState::Idle,
            score: None,
            last_error: None,
            countdown: Countdown::default(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    pub fn current_answer(&self) -> &AnswerState {
        self.answers.get(self.current_index)
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    pub fn score(&self) -> Option<ScoreSummary> {
        self.score
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.current_index + 1 == self.questions.len()
    }

    pub fn phase(&self) -> QuestionPhase {
        if self.answers.is_recorded(self.current_index) {
            QuestionPhase::Locked
        } else {
            QuestionPhase::Unlocked
        }
    }

    fn accepts_input(&self) -> bool {
        self.state == SessionState::Active && self.phase() == QuestionPhase::Unlocked
    }

    /// Changing difficulty is only meaningful between sessions.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), QuizError> {
        match self.state {
            SessionState::Idle | SessionState::Completed => {
                self.difficulty = difficulty;
                Ok(())
            }
            state => Err(QuizError::InvalidTransition {
                state: state.as_str(),
                action: "change difficulty",
            }),
        }
    }

    pub fn begin_loading(&mut self, difficulty: Difficulty) -> Result<(), QuizError> {
        if !matches!(self.state, SessionState::Idle | SessionState::Completed) {
            return Err(QuizError::InvalidTransition {
                state: self.state.as_str(),
                action: "start",
            });
        }
        self.clear_round();
        self.difficulty = difficulty;
        self.last_error = None;
        self.state = SessionState::Loading;
        debug!(%difficulty, "loading questions");
        Ok(())
    }

    /// Delivers the fetched list. An empty list drops back to idle with the
    /// error recorded for display.
    pub fn load_questions(&mut self, questions: Vec<Question>, now: Instant) -> Result<(), QuizError> {
        if self.state != SessionState::Loading {
            return Err(QuizError::InvalidTransition {
                state: self.state.as_str(),
                action: "load questions",
            });
        }
        if questions.is_empty() {
            let err = QuizError::NoContentAvailable(self.difficulty);
            warn!("{err}");
            self.state = SessionState::Idle;
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        info!(
            count = questions.len(),
            difficulty = %self.difficulty,
            "session started"
        );
        self.answers = AnswerRecord::new(questions.len());
        self.questions = questions;
        self.current_index = 0;
        self.score = None;
        self.time_remaining = QUESTION_TIME_SECS;
        self.state = SessionState::Active;
        self.countdown.start(now);
        Ok(())
    }

    /// Synchronous start: fetch from `source` and load the result.
    pub fn start(
        &mut self,
        difficulty: Difficulty,
        count: usize,
        source: &dyn QuestionSource,
        now: Instant,
    ) -> Result<(), QuizError> {
        self.begin_loading(difficulty)?;
        let questions = source.fetch_questions(difficulty, count);
        self.load_questions(questions, now)
    }

    pub fn tick(&mut self) {
        if !self.accepts_input() {
            return;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.time_up();
        }
    }

    /// Converts elapsed countdown periods into ticks.
    pub fn poll_countdown(&mut self, now: Instant) {
        let fired = self.countdown.poll(now);
        for _ in 0..fired {
            if !self.countdown.is_running() {
                break;
            }
            self.tick();
        }
    }

    pub fn select_answer(&mut self, answer: &str) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.lock_with(AnswerState::Selected(answer.to_string()));
        true
    }

    pub fn skip(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.lock_with(AnswerState::Skipped);
        true
    }

    /// When time runs out the first listed option is recorded as the answer.
    pub fn time_up(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let auto_pick = self
            .current_question()
            .and_then(Question::first_answer)
            .map(str::to_string);
        match auto_pick {
            Some(answer) => {
                debug!(index = self.current_index, "time up, auto-selecting first option");
                self.lock_with(AnswerState::Selected(answer));
            }
            None => self.lock_with(AnswerState::Skipped),
        }
        true
    }

    fn lock_with(&mut self, state: AnswerState) {
        self.answers.record(self.current_index, state);
        self.countdown.cancel();
    }

    pub fn advance(&mut self, leaderboard: &mut Leaderboard, now: Instant) -> AdvanceOutcome {
        if self.state != SessionState::Active || self.phase() != QuestionPhase::Locked {
            return AdvanceOutcome::Blocked;
        }

        if self.is_last_question() {
            let summary = compute_score(&self.questions, &self.answers);
            leaderboard.record(summary, self.difficulty);
            self.score = Some(summary);
            self.state = SessionState::Completed;
            self.countdown.cancel();
            info!(
                correct = summary.correct,
                answered = summary.answered,
                total = summary.total_questions,
                "session completed"
            );
            return AdvanceOutcome::Completed(summary);
        }

        self.current_index += 1;
        self.time_remaining = QUESTION_TIME_SECS;
        self.sync_countdown(now);
        AdvanceOutcome::Next
    }

    /// Steps back one question. Recorded answers stay, so the previous
    /// question comes back locked with its feedback.
    pub fn retreat(&mut self, now: Instant) -> bool {
        if self.state != SessionState::Active || self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        if self.phase() == QuestionPhase::Unlocked {
            self.time_remaining = QUESTION_TIME_SECS;
        }
        self.sync_countdown(now);
        true
    }

    fn sync_countdown(&mut self, now: Instant) {
        match self.phase() {
            QuestionPhase::Unlocked => self.countdown.start(now),
            QuestionPhase::Locked => self.countdown.cancel(),
        }
    }

    pub fn reset(&mut self) {
        self.clear_round();
        self.last_error = None;
        self.state = SessionState::Idle;
        debug!(difficulty = %self.difficulty, "session reset");
    }

    fn clear_round(&mut self) {
        self.questions.clear();
        self.answers = AnswerRecord::default();
        self.current_index = 0;
        self.score = None;
        self.time_remaining = QUESTION_TIME_SECS;
        self.countdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory_store::MemoryStore;
    use std::time::Duration;

    fn question(n: usize) -> Question {
        Question {
            id: format!("q{n}"),
            text: format!("Question {n}?"),
            answers: vec![
                format!("first{n}"),
                format!("right{n}"),
                format!("other{n}"),
                format!("last{n}"),
            ],
            correct_answer: format!("right{n}"),
            difficulty: Difficulty::Easy,
            category: "General".to_string(),
        }
    }

    fn active_session(len: usize, now: Instant) -> QuizSession {
        let mut session = QuizSession::new(Difficulty::Easy);
        session.begin_loading(Difficulty::Easy).unwrap();
        session
            .load_questions((0..len).map(question).collect(), now)
            .unwrap();
        session
    }

    fn board() -> Leaderboard {
        Leaderboard::open(Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = QuizSession::new(Difficulty::Hard);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.difficulty(), Difficulty::Hard);
        assert!(session.current_question().is_none());
        assert!(!session.countdown_running());
    }

    #[test]
    fn test_load_enters_active_with_fresh_timer() {
        let session = active_session(3, Instant::now());
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.time_remaining(), QUESTION_TIME_SECS);
        assert_eq!(session.phase(), QuestionPhase::Unlocked);
        assert!(session.countdown_running());
    }

    #[test]
    fn test_empty_list_returns_to_idle_with_error() {
        let mut session = QuizSession::new(Difficulty::Medium);
        session.begin_loading(Difficulty::Medium).unwrap();
        let err = session.load_questions(Vec::new(), Instant::now()).unwrap_err();
        assert!(matches!(err, QuizError::NoContentAvailable(Difficulty::Medium)));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.last_error().is_some());
    }

    #[test]
    fn test_cannot_start_while_active() {
        let mut session = active_session(2, Instant::now());
        assert!(matches!(
            session.begin_loading(Difficulty::Hard),
            Err(QuizError::InvalidTransition { .. })
        ));
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn test_select_locks_and_ignores_further_input() {
        let mut session = active_session(2, Instant::now());
        assert!(session.select_answer("right0"));
        assert_eq!(session.phase(), QuestionPhase::Locked);
        assert!(!session.countdown_running());

        assert!(!session.select_answer("first0"));
        assert!(!session.skip());
        assert!(!session.time_up());
        assert_eq!(
            session.current_answer(),
            &AnswerState::Selected("right0".to_string())
        );
    }

    #[test]
    fn test_tick_counts_down_and_times_out_at_zero() {
        let mut session = active_session(1, Instant::now());
        for _ in 0..QUESTION_TIME_SECS - 1 {
            session.tick();
        }
        assert_eq!(session.time_remaining(), 1);
        assert_eq!(session.phase(), QuestionPhase::Unlocked);

        session.tick();
        assert_eq!(session.time_remaining(), 0);
        assert_eq!(
            session.current_answer(),
            &AnswerState::Selected("first0".to_string())
        );

        session.tick();
        assert_eq!(session.time_remaining(), 0);
    }

    #[test]
    fn test_tick_is_ignored_when_locked() {
        let mut session = active_session(2, Instant::now());
        session.skip();
        session.tick();
        assert_eq!(session.time_remaining(), QUESTION_TIME_SECS);
    }

    #[test]
    fn test_poll_countdown_drives_ticks() {
        let t0 = Instant::now();
        let mut session = active_session(2, t0);
        session.poll_countdown(t0 + Duration::from_millis(3500));
        assert_eq!(session.time_remaining(), QUESTION_TIME_SECS - 3);

        session.poll_countdown(t0 + Duration::from_secs(60));
        assert_eq!(session.time_remaining(), 0);
        assert_eq!(session.phase(), QuestionPhase::Locked);
        assert!(!session.countdown_running());
    }

    #[test]
    fn test_advance_requires_locked_question() {
        let mut session = active_session(2, Instant::now());
        let mut board = board();
        assert_eq!(session.advance(&mut board, Instant::now()), AdvanceOutcome::Blocked);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_advance_restarts_timer() {
        let t0 = Instant::now();
        let mut session = active_session(2, t0);
        let mut board = board();
        session.tick();
        session.tick();
        session.select_answer("right0");
        assert_eq!(session.advance(&mut board, t0), AdvanceOutcome::Next);
        assert_eq!(session.time_remaining(), QUESTION_TIME_SECS);
        assert_eq!(session.phase(), QuestionPhase::Unlocked);
        assert!(session.countdown_running());
    }

    #[test]
    fn test_three_question_walkthrough() {
        let now = Instant::now();
        let mut session = active_session(3, now);
        let mut board = board();

        session.select_answer("right0");
        assert_eq!(session.advance(&mut board, now), AdvanceOutcome::Next);
        assert_eq!(session.current_index(), 1);
        assert_eq!(
            session.answers().get(0),
            &AnswerState::Selected("right0".to_string())
        );

        session.skip();
        assert_eq!(session.advance(&mut board, now), AdvanceOutcome::Next);
        assert_eq!(session.answers().get(1), &AnswerState::Skipped);

        session.time_up();
        let expected = ScoreSummary {
            correct: 1,
            answered: 2,
            total_questions: 3,
        };
        assert_eq!(
            session.advance(&mut board, now),
            AdvanceOutcome::Completed(expected)
        );
        assert!(session.is_completed());
        assert_eq!(
            session.answers().get(2),
            &AnswerState::Selected("first2".to_string())
        );
        assert_eq!(session.score(), Some(expected));
        assert_eq!(board.len(), 1);
        assert!(!session.countdown_running());
    }

    #[test]
    fn test_completed_session_ignores_advance() {
        let now = Instant::now();
        let mut session = active_session(1, now);
        let mut board = board();
        session.skip();
        session.advance(&mut board, now);
        assert_eq!(session.advance(&mut board, now), AdvanceOutcome::Blocked);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_retreat_redisplays_locked_answer() {
        let now = Instant::now();
        let mut session = active_session(3, now);
        let mut board = board();
        session.select_answer("right0");
        session.advance(&mut board, now);
        session.skip();
        session.advance(&mut board, now);
        assert_eq!(session.current_index(), 2);

        assert!(session.retreat(now));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.phase(), QuestionPhase::Locked);
        assert_eq!(session.current_answer(), &AnswerState::Skipped);
        assert!(!session.countdown_running());
    }

    #[test]
    fn test_retreat_at_first_question_is_noop() {
        let mut session = active_session(2, Instant::now());
        assert!(!session.retreat(Instant::now()));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn test_advance_onto_answered_question_stays_locked() {
        let now = Instant::now();
        let mut session = active_session(3, now);
        let mut board = board();
        session.select_answer("right0");
        session.advance(&mut board, now);
        session.select_answer("right1");
        session.retreat(now);
        assert_eq!(session.advance(&mut board, now), AdvanceOutcome::Next);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.phase(), QuestionPhase::Locked);
        assert!(!session.select_answer("first1"));
    }

    #[test]
    fn test_reset_keeps_difficulty_and_leaderboard() {
        let now = Instant::now();
        let mut session = QuizSession::new(Difficulty::Hard);
        session.begin_loading(Difficulty::Hard).unwrap();
        session.load_questions(vec![question(0)], now).unwrap();
        let mut board = board();
        session.select_answer("right0");
        session.advance(&mut board, now);

        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.questions().is_empty());
        assert!(session.answers().is_empty());
        assert!(!session.is_completed());
        assert!(session.score().is_none());
        assert_eq!(session.difficulty(), Difficulty::Hard);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_reset_while_active_cancels_countdown() {
        let mut session = active_session(2, Instant::now());
        session.reset();
        assert!(!session.countdown_running());
        session.tick();
        assert_eq!(session.time_remaining(), QUESTION_TIME_SECS);
    }

    #[test]
    fn test_difficulty_locked_during_session() {
        let mut session = active_session(2, Instant::now());
        assert!(session.set_difficulty(Difficulty::Hard).is_err());
        session.reset();
        assert!(session.set_difficulty(Difficulty::Hard).is_ok());
        assert_eq!(session.difficulty(), Difficulty::Hard);
    }
}

pub mod fallback;
pub mod opentdb;
pub mod sanitize;
pub mod shuffle;

use crate::quiz::question::{Difficulty, Question};

/// Produces questions for a session. Implementations never fail: when the
/// real provider is unavailable they substitute the bundled bank, and an
/// empty result means nothing could be found at all.
pub trait QuestionSource: Send + Sync {
    fn fetch_questions(&self, difficulty: Difficulty, count: usize) -> Vec<Question>;
}

/// Bundled questions only, no network.
#[derive(Clone, Copy, Debug, Default)]
pub struct FallbackSource;

impl QuestionSource for FallbackSource {
    fn fetch_questions(&self, difficulty: Difficulty, count: usize) -> Vec<Question> {
        fallback::fallback_questions(difficulty, count, &mut rand::thread_rng())
    }
}

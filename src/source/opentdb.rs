use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::QuizError;
use crate::quiz::question::{Difficulty, Question};
use crate::source::QuestionSource;
use crate::source::fallback::fallback_questions;
use crate::source::sanitize::clean;
use crate::source::shuffle::shuffle;

pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";
const RESPONSE_SUCCESS: i64 = 0;
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

static NEXT_QUESTION_SEQ: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Deserialize)]
struct ApiResponse {
    response_code: i64,
    #[serde(default)]
    results: Vec<ApiQuestion>,
}

#[derive(Debug, Deserialize)]
struct ApiQuestion {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    category: String,
}

/// Open Trivia DB client with the bundled bank as fallback.
#[derive(Clone, Debug)]
pub struct OpenTdbSource {
    api_url: String,
    timeout: Duration,
    network_enabled: bool,
}

impl OpenTdbSource {
    pub fn new(api_url: &str, timeout: Duration) -> Self {
        Self {
            api_url: api_url.to_string(),
            timeout,
            network_enabled: true,
        }
    }

    pub fn offline() -> Self {
        Self {
            network_enabled: false,
            ..Self::default()
        }
    }

    pub fn is_online(&self) -> bool {
        self.network_enabled
    }

    pub fn request_url(&self, difficulty: Difficulty, count: usize) -> String {
        format!(
            "{}?amount={count}&difficulty={difficulty}&type=multiple",
            self.api_url
        )
    }

    fn fetch_remote(&self, difficulty: Difficulty, count: usize) -> Result<Vec<Question>, QuizError> {
        if !self.network_enabled {
            return Err(QuizError::ProviderUnavailable("network disabled".to_string()));
        }
        let url = self.request_url(difficulty, count);
        debug!(%url, "requesting questions");
        let body = fetch_body(&url, self.timeout)?;
        parse_response(&body, difficulty, &mut rand::thread_rng())
    }

    /// Cheap reachability probe (single-question request, short timeout).
    pub fn check_availability(&self) -> bool {
        if !self.network_enabled {
            return false;
        }
        let url = format!("{}?amount=1&type=multiple", self.api_url);
        match fetch_body(&url, PROBE_TIMEOUT) {
            Ok(_) => true,
            Err(err) => {
                debug!("availability probe failed: {err}");
                false
            }
        }
    }
}

impl Default for OpenTdbSource {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, Duration::from_secs(10))
    }
}

impl QuestionSource for OpenTdbSource {
    fn fetch_questions(&self, difficulty: Difficulty, count: usize) -> Vec<Question> {
        with_fallback(
            || self.fetch_remote(difficulty, count),
            difficulty,
            count,
        )
    }
}

/// Runs `fetch`; any error is logged and replaced by the bundled bank. No
/// retries.
pub fn with_fallback<F>(fetch: F, difficulty: Difficulty, count: usize) -> Vec<Question>
where
    F: FnOnce() -> Result<Vec<Question>, QuizError>,
{
    match fetch() {
        Ok(questions) => {
            info!(count = questions.len(), %difficulty, "fetched questions from provider");
            questions
        }
        Err(err) => {
            warn!("{err}; using fallback questions");
            let questions = fallback_questions(difficulty, count, &mut rand::thread_rng());
            if questions.is_empty() {
                warn!(%difficulty, "fallback bank has no questions");
            }
            questions
        }
    }
}

/// Parses a provider body. Non-success codes, empty result lists and
/// entries without exactly three distractors are all failures.
pub fn parse_response<R: Rng + ?Sized>(
    body: &str,
    requested: Difficulty,
    rng: &mut R,
) -> Result<Vec<Question>, QuizError> {
    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| QuizError::ProviderUnavailable(format!("malformed payload: {e}")))?;

    if response.response_code != RESPONSE_SUCCESS {
        return Err(QuizError::ProviderUnavailable(format!(
            "provider returned response code {}",
            response.response_code
        )));
    }
    if response.results.is_empty() {
        return Err(QuizError::ProviderUnavailable(
            "provider returned no questions".to_string(),
        ));
    }

    response
        .results
        .into_iter()
        .map(|raw| transform_question(raw, requested, rng))
        .collect()
}

fn transform_question<R: Rng + ?Sized>(
    raw: ApiQuestion,
    requested: Difficulty,
    rng: &mut R,
) -> Result<Question, QuizError> {
    if raw.incorrect_answers.len() != 3 {
        return Err(QuizError::ProviderUnavailable(format!(
            "expected 3 incorrect answers, got {}",
            raw.incorrect_answers.len()
        )));
    }

    let correct_answer = clean(&raw.correct_answer);
    let mut answers: Vec<String> = raw.incorrect_answers.iter().map(|a| clean(a)).collect();
    answers.push(correct_answer.clone());
    shuffle(&mut answers, rng);

    let difficulty = raw
        .difficulty
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or(requested);

    Ok(Question {
        id: next_question_id(rng),
        text: clean(&raw.question),
        answers,
        correct_answer,
        difficulty,
        category: clean(&raw.category),
    })
}

fn next_question_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let seq = NEXT_QUESTION_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("otdb-{seq}-{:08x}", rng.gen_range(0..u32::MAX))
}

#[cfg(feature = "network")]
fn fetch_body(url: &str, timeout: Duration) -> Result<String, QuizError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| QuizError::ProviderUnavailable(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|e| QuizError::ProviderUnavailable(e.to_string()))?;
    if !response.status().is_success() {
        return Err(QuizError::ProviderUnavailable(format!(
            "HTTP status {}",
            response.status()
        )));
    }
    response
        .text()
        .map_err(|e| QuizError::ProviderUnavailable(e.to_string()))
}

#[cfg(not(feature = "network"))]
fn fetch_body(_url: &str, _timeout: Duration) -> Result<String, QuizError> {
    Err(QuizError::ProviderUnavailable(
        "built without network support".to_string(),
    ))
}

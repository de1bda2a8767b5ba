use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::QuizError;
use crate::event::AppEvent;
use crate::quiz::leaderboard::Leaderboard;
use crate::quiz::question::{Difficulty, Question};
use crate::quiz::session::{AdvanceOutcome, QuizSession, SessionState};
use crate::source::QuestionSource;
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Loading,
    Quiz,
    Results,
    Leaderboard,
}

pub struct App {
    pub screen: AppScreen,
    pub session: QuizSession,
    pub leaderboard: Leaderboard,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub answer_cursor: usize,
    pub provider_online: Option<bool>,
    pub should_quit: bool,
    config_path: Option<PathBuf>,
    source: Arc<dyn QuestionSource>,
    events: Option<Sender<AppEvent>>,
    request_seq: u64,
    pending_request: Option<u64>,
}

impl App {
    pub fn new(
        config: Config,
        theme: &'static Theme,
        source: Arc<dyn QuestionSource>,
        leaderboard: Leaderboard,
    ) -> Self {
        let mut menu = Menu::new(theme);
        menu.select_difficulty(config.difficulty);
        Self {
            screen: AppScreen::Home,
            session: QuizSession::new(config.difficulty),
            leaderboard,
            menu,
            theme,
            config,
            answer_cursor: 0,
            provider_online: None,
            should_quit: false,
            config_path: None,
            source,
            events: None,
            request_seq: 0,
            pending_request: None,
        }
    }

    /// Fetch on worker threads and report back through `events`. Without a
    /// sender, fetches run inline on the caller's thread.
    pub fn with_event_sender(mut self, events: Sender<AppEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Write the difficulty back to the config file at `path` when the
    /// player picks another one.
    pub fn with_config_saving(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Moves to `screen` unless the session can't back it, in which case
    /// the start screen is shown instead.
    pub fn go_to(&mut self, screen: AppScreen) {
        match self.check_screen(screen) {
            Ok(()) => self.screen = screen,
            Err(err) => {
                debug!("{err}, redirecting to start screen");
                self.screen = AppScreen::Home;
            }
        }
    }

    fn check_screen(&self, screen: AppScreen) -> Result<(), QuizError> {
        match screen {
            AppScreen::Quiz if self.session.questions().is_empty() => Err(
                QuizError::InvalidNavigation("quiz screen without questions"),
            ),
            AppScreen::Quiz if self.session.state() != SessionState::Active => Err(
                QuizError::InvalidNavigation("quiz screen without an active session"),
            ),
            AppScreen::Results if !self.session.is_completed() => Err(
                QuizError::InvalidNavigation("results screen before completion"),
            ),
            AppScreen::Loading if !self.session.is_loading() => Err(
                QuizError::InvalidNavigation("loading screen without a pending fetch"),
            ),
            _ => Ok(()),
        }
    }

    pub fn menu_activate(&mut self, now: Instant) {
        self.run_menu_action(self.menu.selected_action(), now);
    }

    pub fn run_menu_action(&mut self, action: MenuAction, now: Instant) {
        match action {
            MenuAction::Start(difficulty) => self.start_quiz(difficulty, now),
            MenuAction::Leaderboard => self.go_to(AppScreen::Leaderboard),
            MenuAction::Quit => self.should_quit = true,
        }
    }

    pub fn start_quiz(&mut self, difficulty: Difficulty, now: Instant) {
        if let Err(err) = self.session.begin_loading(difficulty) {
            warn!("{err}");
            return;
        }
        self.remember_difficulty(difficulty);
        self.menu.select_difficulty(difficulty);

        self.request_seq += 1;
        let request = self.request_seq;
        self.pending_request = Some(request);
        self.go_to(AppScreen::Loading);

        let count = self.config.question_count;
        match self.events.clone() {
            Some(tx) => {
                let source = Arc::clone(&self.source);
                thread::spawn(move || {
                    let questions = source.fetch_questions(difficulty, count);
                    let _ = tx.send(AppEvent::QuestionsLoaded { request, questions });
                });
            }
            None => {
                let questions = self.source.fetch_questions(difficulty, count);
                self.on_questions_loaded(request, questions, now);
            }
        }
    }

    fn remember_difficulty(&mut self, difficulty: Difficulty) {
        if self.config.difficulty == difficulty {
            return;
        }
        self.config.difficulty = difficulty;
        let Some(path) = self.config_path.as_deref() else {
            return;
        };
        // Command-line overrides live in `self.config`; only the difficulty
        // goes back to disk.
        // A file that doesn't parse is left untouched.
        let mut on_disk = match Config::load_from(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("config unreadable, not saving difficulty: {err}");
                return;
            }
        };
        on_disk.difficulty = difficulty;
        if let Err(err) = on_disk.save_to(path) {
            warn!("could not save config: {err}");
        }
    }

    pub fn on_questions_loaded(&mut self, request: u64, questions: Vec<Question>, now: Instant) {
        if self.pending_request != Some(request) {
            debug!(request, "dropping stale question batch");
            return;
        }
        self.pending_request = None;
        self.answer_cursor = 0;
        match self.session.load_questions(questions, now) {
            Ok(()) => self.go_to(AppScreen::Quiz),
            Err(err) => {
                debug!("load failed: {err}");
                self.go_to(AppScreen::Home);
            }
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.screen == AppScreen::Quiz {
            self.session.poll_countdown(now);
        }
    }

    pub fn current_answers(&self) -> &[String] {
        self.session
            .current_question()
            .map(|q| q.answers.as_slice())
            .unwrap_or(&[])
    }

    pub fn cursor_next(&mut self) {
        let len = self.current_answers().len();
        if len > 0 {
            self.answer_cursor = (self.answer_cursor + 1) % len;
        }
    }

    pub fn cursor_prev(&mut self) {
        let len = self.current_answers().len();
        if len > 0 {
            self.answer_cursor = (self.answer_cursor + len - 1) % len;
        }
    }

    pub fn choose_answer(&mut self, index: usize) {
        let Some(answer) = self.current_answers().get(index).cloned() else {
            return;
        };
        self.answer_cursor = index;
        self.session.select_answer(&answer);
    }

    pub fn choose_at_cursor(&mut self) {
        self.choose_answer(self.answer_cursor);
    }

    pub fn skip_question(&mut self) {
        self.session.skip();
    }

    pub fn next_question(&mut self, now: Instant) {
        match self.session.advance(&mut self.leaderboard, now) {
            AdvanceOutcome::Next => self.answer_cursor = 0,
            AdvanceOutcome::Completed(_) => self.go_to(AppScreen::Results),
            AdvanceOutcome::Blocked => {}
        }
    }

    pub fn previous_question(&mut self, now: Instant) {
        if self.session.retreat(now) {
            self.answer_cursor = 0;
        }
    }

    /// Start over at the same difficulty straight from the results screen.
    pub fn try_again(&mut self, now: Instant) {
        let difficulty = self.session.difficulty();
        self.session.reset();
        self.start_quiz(difficulty, now);
    }

    pub fn go_home(&mut self) {
        self.session.reset();
        self.pending_request = None;
        self.answer_cursor = 0;
        self.go_to(AppScreen::Home);
    }

    pub fn go_to_leaderboard(&mut self) {
        self.go_to(AppScreen::Leaderboard);
    }

    /// Back to the results of the round just finished, or home if there
    /// isn't one.
    pub fn leave_leaderboard(&mut self) {
        if self.session.is_completed() {
            self.go_to(AppScreen::Results);
        } else {
            self.go_home();
        }
    }

    /// Clears whatever notice the header is showing.
    pub fn dismiss_error(&mut self) {
        self.session.clear_error();
        self.leaderboard.clear_error();
    }

    pub fn has_error(&self) -> bool {
        self.session.last_error().is_some() || self.leaderboard.last_error().is_some()
    }

    pub fn set_provider_status(&mut self, online: bool) {
        if self.provider_online != Some(online) {
            info!(online, "question provider status");
        }
        self.provider_online = Some(online);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::answer::AnswerState;
    use crate::quiz::session::QuestionPhase;
    use crate::source::FallbackSource;
    use crate::store::memory_store::MemoryStore;
    use std::fs;
    use tempfile::TempDir;

    struct EmptySource;

    impl QuestionSource for EmptySource {
        fn fetch_questions(&self, _difficulty: Difficulty, _count: usize) -> Vec<Question> {
            Vec::new()
        }
    }

    fn theme() -> &'static Theme {
        Box::leak(Box::new(Theme::default()))
    }

    fn make_app(source: Arc<dyn QuestionSource>) -> App {
        let config = Config {
            question_count: 3,
            ..Config::default()
        };
        let board = Leaderboard::open(Box::new(MemoryStore::new()));
        App::new(config, theme(), source, board)
    }

    fn correct_index(app: &App) -> usize {
        let q = app.session.current_question().unwrap();
        q.answers.iter().position(|a| *a == q.correct_answer).unwrap()
    }

    #[test]
    fn test_start_loads_quiz_screen() {
        let mut app = make_app(Arc::new(FallbackSource));
        app.start_quiz(Difficulty::Easy, Instant::now());
        assert_eq!(app.screen, AppScreen::Quiz);
        assert_eq!(app.session.questions().len(), 3);
        assert_eq!(app.session.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn test_empty_source_returns_home_with_error() {
        let mut app = make_app(Arc::new(EmptySource));
        app.start_quiz(Difficulty::Hard, Instant::now());
        assert_eq!(app.screen, AppScreen::Home);
        assert!(app.session.last_error().is_some());
    }

    #[test]
    fn test_dismiss_clears_no_content_notice() {
        let mut app = make_app(Arc::new(EmptySource));
        app.start_quiz(Difficulty::Hard, Instant::now());
        assert!(app.has_error());

        app.dismiss_error();
        assert!(!app.has_error());
        assert!(app.session.last_error().is_none());
        assert_eq!(app.screen, AppScreen::Home);
    }

    #[test]
    fn test_dismiss_clears_leaderboard_notice() {
        let store = MemoryStore::new();
        store.set_available(false);
        let board = Leaderboard::open(Box::new(store));
        let mut app = App::new(Config::default(), theme(), Arc::new(FallbackSource), board);
        assert!(app.has_error());

        app.dismiss_error();
        assert!(app.leaderboard.last_error().is_none());
    }

    #[test]
    fn test_difficulty_saved_keeps_other_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "theme = \"gruvbox-dark\"\nquestion_count = 25\napi_url = \"http://localhost:9/api\"\n",
        )
        .unwrap();

        let mut app = make_app(Arc::new(FallbackSource)).with_config_saving(path.clone());
        app.start_quiz(Difficulty::Hard, Instant::now());

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.difficulty, Difficulty::Hard);
        assert_eq!(saved.theme, "gruvbox-dark");
        assert_eq!(saved.question_count, 25);
        assert_eq!(saved.api_url, "http://localhost:9/api");
    }

    #[test]
    fn test_unparseable_config_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let original = "difficulty = \"expert\"\ntheme = \"gruvbox-dark\"\nquestion_count = 25\n";
        fs::write(&path, original).unwrap();

        let mut app = make_app(Arc::new(FallbackSource)).with_config_saving(path.clone());
        app.start_quiz(Difficulty::Hard, Instant::now());

        assert_eq!(app.config.difficulty, Difficulty::Hard);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_quiz_screen_without_questions_redirects_home() {
        let mut app = make_app(Arc::new(FallbackSource));
        app.go_to(AppScreen::Quiz);
        assert_eq!(app.screen, AppScreen::Home);
    }

    #[test]
    fn test_results_before_completion_redirects_home() {
        let mut app = make_app(Arc::new(FallbackSource));
        app.start_quiz(Difficulty::Easy, Instant::now());
        app.go_to(AppScreen::Results);
        assert_eq!(app.screen, AppScreen::Home);
    }

    #[test]
    fn test_full_round_reaches_results_and_records_score() {
        let now = Instant::now();
        let mut app = make_app(Arc::new(FallbackSource));
        app.start_quiz(Difficulty::Medium, now);

        for _ in 0..3 {
            let idx = correct_index(&app);
            app.choose_answer(idx);
            assert_eq!(app.session.phase(), QuestionPhase::Locked);
            app.next_question(now);
        }

        assert_eq!(app.screen, AppScreen::Results);
        let score = app.session.score().unwrap();
        assert_eq!(score.correct, 3);
        assert_eq!(app.leaderboard.len(), 1);
    }

    #[test]
    fn test_next_is_blocked_until_answered() {
        let now = Instant::now();
        let mut app = make_app(Arc::new(FallbackSource));
        app.start_quiz(Difficulty::Easy, now);
        app.next_question(now);
        assert_eq!(app.session.current_index(), 0);
        app.skip_question();
        app.next_question(now);
        assert_eq!(app.session.current_index(), 1);
        assert_eq!(app.session.answers().get(0), &AnswerState::Skipped);
    }

    #[test]
    fn test_try_again_restarts_same_difficulty() {
        let now = Instant::now();
        let mut app = make_app(Arc::new(FallbackSource));
        app.start_quiz(Difficulty::Hard, now);
        for _ in 0..3 {
            app.skip_question();
            app.next_question(now);
        }
        assert_eq!(app.screen, AppScreen::Results);

        app.try_again(now);
        assert_eq!(app.screen, AppScreen::Quiz);
        assert_eq!(app.session.difficulty(), Difficulty::Hard);
        assert_eq!(app.session.current_index(), 0);
        assert_eq!(app.leaderboard.len(), 1);
    }

    #[test]
    fn test_stale_batch_is_ignored() {
        let now = Instant::now();
        let mut app = make_app(Arc::new(FallbackSource));
        app.start_quiz(Difficulty::Easy, now);
        let before = app.session.current_question().cloned();
        app.on_questions_loaded(99, Vec::new(), now);
        assert_eq!(app.screen, AppScreen::Quiz);
        assert_eq!(app.session.current_question().cloned(), before);
    }

    #[test]
    fn test_leaderboard_returns_to_results_after_round() {
        let now = Instant::now();
        let mut app = make_app(Arc::new(FallbackSource));
        app.start_quiz(Difficulty::Easy, now);
        for _ in 0..3 {
            app.skip_question();
            app.next_question(now);
        }
        app.go_to_leaderboard();
        assert_eq!(app.screen, AppScreen::Leaderboard);
        app.leave_leaderboard();
        assert_eq!(app.screen, AppScreen::Results);

        app.go_home();
        app.go_to_leaderboard();
        app.leave_leaderboard();
        assert_eq!(app.screen, AppScreen::Home);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut app = make_app(Arc::new(FallbackSource));
        app.start_quiz(Difficulty::Easy, Instant::now());
        app.cursor_prev();
        assert_eq!(app.answer_cursor, 3);
        app.cursor_next();
        assert_eq!(app.answer_cursor, 0);
    }
}

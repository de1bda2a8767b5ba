mod app;
mod config;
mod error;
mod event;
mod logging;
mod quiz;
mod source;
mod store;
mod ui;

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};

use app::{App, AppScreen};
use config::Config;
use event::{AppEvent, EventHandler};
use quiz::leaderboard::Leaderboard;
use quiz::question::Difficulty;
use quiz::session::QuestionPhase;
use source::opentdb::OpenTdbSource;
use store::LeaderboardStore;
use store::json_store::JsonStore;
use store::memory_store::MemoryStore;
use ui::components::leaderboard_table::LeaderboardTable;
use ui::components::progress_bar::ProgressBar;
use ui::components::question_card::{QuestionCard, timer_color};
use ui::components::results::Results;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "quizr", version, about = "Terminal trivia quiz backed by the Open Trivia Database")]
struct Cli {
    #[arg(short, long, help = "Default difficulty (easy, medium, hard)")]
    difficulty: Option<Difficulty>,

    #[arg(short = 'n', long, help = "Questions per round (1-50)")]
    questions: Option<usize>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Never contact the question provider; use the built-in bank")]
    offline: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = logging::init(&JsonStore::default_dir()) {
        eprintln!("quizr: logging disabled: {err}");
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        warn!("config unreadable, using defaults: {err}");
        Config::default()
    });
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(count) = cli.questions {
        config.question_count = count;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.offline {
        config.network_enabled = false;
    }
    config.validate(&Theme::available_themes());

    let theme: &'static Theme =
        Box::leak(Box::new(Theme::load(&config.theme).unwrap_or_default()));

    let store: Box<dyn LeaderboardStore> = match JsonStore::new() {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!("data dir unavailable, high scores won't be saved: {err}");
            Box::new(MemoryStore::new())
        }
    };
    let leaderboard = Leaderboard::open(store);

    let source = if config.network_enabled {
        OpenTdbSource::new(&config.api_url, config.request_timeout())
    } else {
        OpenTdbSource::offline()
    };
    info!(
        difficulty = %config.difficulty,
        questions = config.question_count,
        online = source.is_online(),
        "starting"
    );

    let events = EventHandler::new(Duration::from_millis(100));
    spawn_availability_probe(source.clone(), &events);

    let mut app = App::new(config, theme, Arc::new(source), leaderboard)
        .with_event_sender(events.sender())
        .with_config_saving(Config::config_path());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn spawn_availability_probe(source: OpenTdbSource, events: &EventHandler) {
    if !source.is_online() {
        let _ = events.sender().send(AppEvent::ProviderStatus(false));
        return;
    }
    let tx = events.sender();
    thread::spawn(move || {
        let _ = tx.send(AppEvent::ProviderStatus(source.check_availability()));
    });
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Resize(_, _) => {}
            AppEvent::QuestionsLoaded { request, questions } => {
                app.on_questions_loaded(request, questions, Instant::now())
            }
            AppEvent::ProviderStatus(online) => app.set_provider_status(online),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    let now = Instant::now();
    match app.screen {
        AppScreen::Home => handle_home_key(app, key, now),
        AppScreen::Loading => {
            if key.code == KeyCode::Esc {
                app.go_home();
            }
        }
        AppScreen::Quiz => handle_quiz_key(app, key, now),
        AppScreen::Results => handle_results_key(app, key, now),
        AppScreen::Leaderboard => match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Enter => {
                app.leave_leaderboard()
            }
            _ => {}
        },
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('x') if app.has_error() => app.dismiss_error(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.menu_activate(now),
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                app.run_menu_action(action, now);
            }
        }
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Char(ch @ '1'..='9') => {
            let index = ch as usize - '1' as usize;
            app.choose_answer(index);
        }
        KeyCode::Up | KeyCode::Char('k') => app.cursor_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_next(),
        KeyCode::Enter | KeyCode::Char(' ') => match app.session.phase() {
            QuestionPhase::Unlocked => app.choose_at_cursor(),
            QuestionPhase::Locked => app.next_question(now),
        },
        KeyCode::Char('s') => app.skip_question(),
        KeyCode::Right | KeyCode::Char('n') => app.next_question(now),
        KeyCode::Left | KeyCode::Char('p') => app.previous_question(now),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('t') | KeyCode::Enter => app.try_again(now),
        KeyCode::Char('h') | KeyCode::Esc => app.go_home(),
        KeyCode::Char('l') => app.go_to_leaderboard(),
        KeyCode::Char('x') => app.dismiss_error(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn screen_hints(app: &App) -> Vec<&'static str> {
    let base: &[&'static str] = match app.screen {
        AppScreen::Home => &["[1-3] Start", "[j/k] Move", "[Enter] Select", "[l] Leaderboard", "[Esc] Quit"],
        AppScreen::Loading => &["[Esc] Cancel"],
        AppScreen::Quiz => match app.session.phase() {
            QuestionPhase::Unlocked => &[
                "[1-4] Answer",
                "[j/k] Move",
                "[Enter] Pick",
                "[s] Skip",
                "[p] Previous",
                "[Esc] Home",
            ],
            QuestionPhase::Locked => &["[Enter/n] Next", "[p] Previous", "[Esc] Home"],
        },
        AppScreen::Results => &[],
        AppScreen::Leaderboard => &["[Esc] Back"],
    };
    let mut hints = base.to_vec();
    if app.has_error() && matches!(app.screen, AppScreen::Home | AppScreen::Results) {
        hints.push("[x] Dismiss");
    }
    hints
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    frame.render_widget(Block::default().style(Style::default().bg(colors.bg())), area);

    let hint_lines = pack_hint_lines(&screen_hints(app), area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16);

    render_header(frame, app, layout.header);

    match app.screen {
        AppScreen::Home => {
            let menu_area = ui::layout::centered_rect(50, 80, layout.main);
            frame.render_widget(&app.menu, menu_area);
        }
        AppScreen::Loading => {
            let text = format!(
                "Fetching {} questions...",
                app.session.difficulty().label().to_lowercase()
            );
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(45), Constraint::Length(1), Constraint::Min(0)])
                .split(layout.main);
            frame.render_widget(
                Paragraph::new(Span::styled(text, Style::default().fg(colors.muted())))
                    .alignment(Alignment::Center),
                rows[1],
            );
        }
        AppScreen::Quiz => render_quiz(frame, app, layout.main),
        AppScreen::Results => {
            if let Some(summary) = app.session.score() {
                let centered = ui::layout::centered_rect(60, 70, layout.main);
                let results = Results::new(
                    summary,
                    app.session.difficulty(),
                    app.leaderboard.latest_rank(),
                    app.theme,
                );
                frame.render_widget(results, centered);
            }
        }
        AppScreen::Leaderboard => {
            let centered = ui::layout::centered_rect(70, 80, layout.main);
            let table = LeaderboardTable::new(
                app.leaderboard.entries(),
                app.leaderboard.latest_id(),
                app.theme,
            );
            frame.render_widget(table, centered);
        }
    }

    let footer: Vec<Line> = hint_lines
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let header_style = Style::default().fg(colors.header_fg()).bg(colors.header_bg());

    let provider = match app.provider_online {
        Some(true) => "online",
        Some(false) => "offline, using built-in questions",
        None => "checking provider...",
    };
    let mut spans = vec![
        Span::styled(" quizr ", header_style.add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(" {} | {provider} ", app.session.difficulty().label()),
            header_style,
        ),
    ];

    let notice = app
        .session
        .last_error()
        .map(str::to_string)
        .or_else(|| app.leaderboard.last_error().map(|err| err.to_string()));
    if let Some(notice) = notice {
        spans.push(Span::styled(
            format!(" {notice} "),
            Style::default()
                .fg(colors.error())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(header_style), area);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let Some(question) = app.session.current_question() else {
        return;
    };
    let colors = &app.theme.colors;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10)])
        .split(area);
    let bars = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);

    frame.render_widget(
        ProgressBar::questions(
            app.session.current_index(),
            app.session.questions().len(),
            app.theme,
        ),
        bars[0],
    );

    let remaining = app.session.time_remaining();
    let timer_caption = match app.session.phase() {
        QuestionPhase::Unlocked => format!("{remaining}s"),
        QuestionPhase::Locked => "answered".to_string(),
    };
    let timer = ProgressBar::new(
        "Time",
        timer_caption,
        remaining as f64 / quiz::session::QUESTION_TIME_SECS as f64,
        app.theme,
    )
    .fill(timer_color(remaining, colors));
    frame.render_widget(timer, bars[1]);

    let card = QuestionCard::new(question, app.session.current_answer(), app.answer_cursor, app.theme);
    frame.render_widget(card, rows[1]);
}

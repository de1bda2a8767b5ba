use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::quiz::question::Difficulty;
use crate::quiz::score::ScoreSummary;
use crate::ui::theme::{Theme, ThemeColors};

pub fn percentage_color(percentage: u32, colors: &ThemeColors) -> Color {
    if percentage >= 80 {
        colors.success()
    } else if percentage >= 60 {
        colors.warning()
    } else {
        colors.error()
    }
}

pub struct Results<'a> {
    pub summary: ScoreSummary,
    pub difficulty: Difficulty,
    /// Leaderboard position of this round, if it made the top ten.
    pub rank: Option<usize>,
    pub theme: &'a Theme,
}

impl<'a> Results<'a> {
    pub fn new(summary: ScoreSummary, difficulty: Difficulty, rank: Option<usize>, theme: &'a Theme) -> Self {
        Self {
            summary,
            difficulty,
            rank,
            theme,
        }
    }
}

impl Widget for Results<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Quiz Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let mut title_spans = vec![Span::styled(
            "Results",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(rank) = self.rank {
            title_spans.push(Span::styled(
                format!("  (#{rank} on the leaderboard)"),
                Style::default().fg(colors.success()),
            ));
        }
        Paragraph::new(Line::from(title_spans))
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let percentage = self.summary.percentage();
        let pct_color = percentage_color(percentage, colors);

        let score_line = Line::from(vec![
            Span::styled("  Score:      ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}/{}", self.summary.correct, self.summary.answered),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({} questions)", self.summary.total_questions),
                Style::default().fg(colors.muted()),
            ),
        ]);
        Paragraph::new(score_line).render(layout[1], buf);

        let pct_line = Line::from(vec![
            Span::styled("  Accuracy:   ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{percentage}%"),
                Style::default().fg(pct_color).add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(pct_line).render(layout[2], buf);

        let skipped = self.summary.total_questions - self.summary.answered;
        let skipped_line = Line::from(vec![
            Span::styled("  Skipped:    ", Style::default().fg(colors.fg())),
            Span::styled(
                skipped.to_string(),
                Style::default().fg(if skipped == 0 {
                    colors.fg()
                } else {
                    colors.warning()
                }),
            ),
            Span::styled(
                format!("  ({})", self.difficulty.label()),
                Style::default().fg(colors.muted()),
            ),
        ]);
        Paragraph::new(skipped_line).render(layout[3], buf);

        Paragraph::new(Line::from(Span::styled(
            self.summary.grade().message(),
            Style::default().fg(pct_color),
        )))
        .alignment(Alignment::Center)
        .render(layout[4], buf);

        let help = Line::from(vec![
            Span::styled("  [t/Enter] Try again  ", Style::default().fg(colors.accent())),
            Span::styled("[h] Home  ", Style::default().fg(colors.accent())),
            Span::styled("[l] Leaderboard", Style::default().fg(colors.accent())),
        ]);
        Paragraph::new(help).render(layout[6], buf);
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::store::schema::HighScoreEntry;
use crate::ui::components::results::percentage_color;
use crate::ui::theme::Theme;

pub struct LeaderboardTable<'a> {
    pub entries: &'a [HighScoreEntry],
    /// Entry to draw with the highlight background, usually the round just played.
    pub highlight: Option<u64>,
    pub theme: &'a Theme,
}

impl<'a> LeaderboardTable<'a> {
    pub fn new(entries: &'a [HighScoreEntry], highlight: Option<u64>, theme: &'a Theme) -> Self {
        Self {
            entries,
            highlight,
            theme,
        }
    }
}

impl Widget for LeaderboardTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                " High Scores ",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.entries.is_empty() {
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  No scores yet. Finish a round to get on the board.",
                    Style::default().fg(colors.muted()),
                )),
            ])
            .render(inner, buf);
            return;
        }

        let mut lines = vec![
            Line::from(Span::styled(
                "   #   Correct  Answered  Total    Acc%  Difficulty  Date",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "  \u{2500}".to_string() + &"\u{2500}".repeat(58),
                Style::default().fg(colors.border()),
            )),
        ];

        for (i, entry) in self.entries.iter().enumerate() {
            let summary = entry.summary();
            let pct = summary.percentage();
            let row = format!(
                "  {rank:>2}  {correct:>7}  {answered:>8}  {total:>5}  {pct:>5}%  {difficulty:<10}  {date}",
                rank = i + 1,
                correct = entry.correct,
                answered = entry.answered,
                total = entry.total_questions,
                difficulty = entry.difficulty.label(),
                date = entry.timestamp.format("%Y-%m-%d %H:%M"),
            );

            let fg = percentage_color(pct, colors);
            let style = if self.highlight == Some(entry.id) {
                Style::default()
                    .fg(fg)
                    .bg(colors.accent_dim())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(fg)
            };
            lines.push(Line::from(Span::styled(row, style)));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::quiz::question::Difficulty;
    use crate::quiz::score::ScoreSummary;

    fn text_of(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_empty_board_message() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 70, 8);
        let mut buf = Buffer::empty(area);
        LeaderboardTable::new(&[], None, &theme).render(area, &mut buf);
        assert!(text_of(&buf).contains("No scores yet"));
    }

    #[test]
    fn test_rows_show_rank_and_difficulty() {
        let theme = Theme::default();
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let summary = ScoreSummary {
            correct: 7,
            answered: 8,
            total_questions: 10,
        };
        let entries = vec![HighScoreEntry::new(summary, Difficulty::Hard, timestamp, 1)];
        let area = Rect::new(0, 0, 72, 8);
        let mut buf = Buffer::empty(area);
        LeaderboardTable::new(&entries, Some(1), &theme).render(area, &mut buf);
        let text = text_of(&buf);
        assert!(text.contains("Hard"));
        assert!(text.contains("2024-03-01 12:30"));
        assert!(text.contains("88%"));
    }
}

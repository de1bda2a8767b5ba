use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::quiz::answer::AnswerState;
use crate::quiz::question::Question;
use crate::ui::theme::{Theme, ThemeColors};

/// Seconds left at which the timer turns to the warning color.
pub const TIMER_WARNING_SECS: u32 = 10;
/// Seconds left at which the timer turns to the error color.
pub const TIMER_CRITICAL_SECS: u32 = 5;

pub fn timer_color(remaining: u32, colors: &ThemeColors) -> Color {
    if remaining <= TIMER_CRITICAL_SECS {
        colors.error()
    } else if remaining <= TIMER_WARNING_SECS {
        colors.warning()
    } else {
        colors.accent()
    }
}

pub struct QuestionCard<'a> {
    pub question: &'a Question,
    pub answer: &'a AnswerState,
    pub cursor: usize,
    pub theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(question: &'a Question, answer: &'a AnswerState, cursor: usize, theme: &'a Theme) -> Self {
        Self {
            question,
            answer,
            cursor,
            theme,
        }
    }

    fn answer_line(&self, index: usize, text: &str) -> Line<'a> {
        let colors = &self.theme.colors;
        let label = format!("  [{}] {text}", index + 1);

        if !self.answer.is_recorded() {
            let style = if index == self.cursor {
                Style::default()
                    .fg(colors.cursor_fg())
                    .bg(colors.cursor_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            return Line::from(Span::styled(label, style));
        }

        let is_correct = text == self.question.correct_answer;
        let is_selected = self.answer.selected() == Some(text);
        if is_correct {
            Line::from(vec![
                Span::styled(
                    label,
                    Style::default()
                        .fg(colors.answer_correct())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("  \u{2713}", Style::default().fg(colors.answer_correct())),
            ])
        } else if is_selected {
            Line::from(vec![
                Span::styled(
                    label,
                    Style::default()
                        .fg(colors.answer_wrong())
                        .bg(colors.answer_wrong_bg()),
                ),
                Span::styled("  \u{2717}", Style::default().fg(colors.answer_wrong())),
            ])
        } else {
            Line::from(Span::styled(label, Style::default().fg(colors.muted())))
        }
    }

    fn feedback_line(&self) -> Option<Line<'a>> {
        let colors = &self.theme.colors;
        let correct = &self.question.correct_answer;
        match self.answer {
            AnswerState::Unanswered => None,
            AnswerState::Skipped => Some(Line::from(Span::styled(
                format!("  Skipped. The answer was {correct}"),
                Style::default().fg(colors.warning()),
            ))),
            AnswerState::Selected(choice) if choice == correct => Some(Line::from(Span::styled(
                "  Correct!",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ))),
            AnswerState::Selected(_) => Some(Line::from(Span::styled(
                format!("  Wrong. The answer was {correct}"),
                Style::default().fg(colors.error()),
            ))),
        }
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = if self.question.category.is_empty() {
            format!(" {} ", self.question.difficulty.label())
        } else {
            format!(" {} \u{00b7} {} ", self.question.category, self.question.difficulty.label())
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let answer_rows = self.question.answers.len() as u16;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(answer_rows + 1),
                Constraint::Length(2),
            ])
            .split(inner);

        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", self.question.text),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
        ])
        .wrap(Wrap { trim: false })
        .render(layout[0], buf);

        let lines: Vec<Line> = self
            .question
            .answers
            .iter()
            .enumerate()
            .map(|(i, text)| self.answer_line(i, text))
            .collect();
        Paragraph::new(lines).render(layout[1], buf);

        if let Some(feedback) = self.feedback_line() {
            Paragraph::new(feedback).render(layout[2], buf);
        }
    }
}

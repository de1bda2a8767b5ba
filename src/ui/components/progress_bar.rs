use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// One-row bar inside a titled border with a centered caption.
pub struct ProgressBar<'a> {
    pub title: String,
    pub caption: String,
    pub ratio: f64,
    pub fill: Option<Color>,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(title: &str, caption: String, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            title: title.to_string(),
            caption,
            ratio: ratio.clamp(0.0, 1.0),
            fill: None,
            theme,
        }
    }

    /// "Question n of N", filled by how far into the round the player is.
    pub fn questions(current_index: usize, total: usize, theme: &'a Theme) -> Self {
        let shown = (current_index + 1).min(total);
        let ratio = if total == 0 {
            0.0
        } else {
            shown as f64 / total as f64
        };
        Self::new("Progress", format!("Question {shown} of {total}"), ratio, theme)
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64).round() as u16;
        let fill = self.fill.unwrap_or_else(|| colors.bar_filled());

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let caption_x = inner.x + (inner.width.saturating_sub(self.caption.len() as u16)) / 2;
        buf.set_string(caption_x, inner.y, &self.caption, Style::default().fg(colors.fg()));
    }
}

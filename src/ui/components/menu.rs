use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::quiz::question::Difficulty;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Start(Difficulty),
    Leaderboard,
    Quit,
}

pub struct MenuItem {
    pub key: char,
    pub label: String,
    pub description: String,
    pub action: MenuAction,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        let mut items: Vec<MenuItem> = Difficulty::ALL
            .iter()
            .enumerate()
            .map(|(i, &difficulty)| MenuItem {
                key: char::from(b'1' + i as u8),
                label: format!("{} Quiz", difficulty.label()),
                description: difficulty.description().to_string(),
                action: MenuAction::Start(difficulty),
            })
            .collect();
        items.push(MenuItem {
            key: 'l',
            label: "Leaderboard".to_string(),
            description: "Best ten rounds so far".to_string(),
            action: MenuAction::Leaderboard,
        });
        items.push(MenuItem {
            key: 'q',
            label: "Quit".to_string(),
            description: String::new(),
            action: MenuAction::Quit,
        });

        Self {
            items,
            selected: 0,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> MenuAction {
        self.items
            .get(self.selected)
            .map(|item| item.action)
            .unwrap_or(MenuAction::Quit)
    }

    pub fn action_for_key(&self, key: char) -> Option<MenuAction> {
        self.items.iter().find(|item| item.key == key).map(|item| item.action)
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        if let Some(i) = self
            .items
            .iter()
            .position(|item| item.action == MenuAction::Start(difficulty))
        {
            self.selected = i;
        }
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "quizr",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Pick a difficulty to start a round",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|item| Constraint::Length(if item.description.is_empty() { 2 } else { 3 }))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let label_text = format!(" {indicator} [{}] {}", item.key, item.label);

            let mut lines = vec![Line::from(Span::styled(
                label_text,
                Style::default()
                    .fg(if is_selected { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            ))];
            if !item.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("     {}", item.description),
                    Style::default().fg(colors.muted()),
                )));
            }

            if let Some(&row) = menu_layout.get(i) {
                Paragraph::new(lines).render(row, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme() -> &'static Theme {
        Box::leak(Box::new(Theme::default()))
    }

    #[test]
    fn test_digit_keys_map_to_difficulties() {
        let menu = Menu::new(theme());
        assert_eq!(menu.action_for_key('1'), Some(MenuAction::Start(Difficulty::Easy)));
        assert_eq!(menu.action_for_key('3'), Some(MenuAction::Start(Difficulty::Hard)));
        assert_eq!(menu.action_for_key('l'), Some(MenuAction::Leaderboard));
        assert_eq!(menu.action_for_key('x'), None);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut menu = Menu::new(theme());
        menu.prev();
        assert_eq!(menu.selected_action(), MenuAction::Quit);
        menu.next();
        assert_eq!(menu.selected_action(), MenuAction::Start(Difficulty::Easy));
    }

    #[test]
    fn test_select_difficulty() {
        let mut menu = Menu::new(theme());
        menu.select_difficulty(Difficulty::Medium);
        assert_eq!(menu.selected_action(), MenuAction::Start(Difficulty::Medium));
    }
}

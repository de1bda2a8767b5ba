use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::config::Config;

pub const DEFAULT_THEME: &str = "terminal-default";

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub answer_correct: String,
    pub answer_wrong: String,
    pub answer_wrong_bg: String,
    pub cursor_bg: String,
    pub cursor_fg: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// Themes in the user's config dir shadow the bundled ones.
    pub fn load(name: &str) -> Option<Self> {
        let filename = format!("{name}.toml");

        let user_theme_path = Config::config_dir().join("themes").join(&filename);
        if let Ok(content) = fs::read_to_string(&user_theme_path) {
            match toml::from_str::<Theme>(&content) {
                Ok(theme) => return Some(theme),
                Err(err) => tracing::warn!(path = %user_theme_path.display(), "bad theme file: {err}"),
            }
        }

        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();

        if let Ok(dir) = fs::read_dir(Config::config_dir().join("themes")) {
            for entry in dir.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        if !names.iter().any(|n| n == stem) {
                            names.push(stem.to_string());
                        }
                    }
                }
            }
        }
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "reset".to_string(),
            fg: "reset".to_string(),
            muted: "darkgray".to_string(),
            accent: "blue".to_string(),
            accent_dim: "#303446".to_string(),
            border: "gray".to_string(),
            header_bg: "blue".to_string(),
            header_fg: "black".to_string(),
            bar_filled: "blue".to_string(),
            bar_empty: "darkgray".to_string(),
            answer_correct: "green".to_string(),
            answer_wrong: "red".to_string(),
            answer_wrong_bg: "reset".to_string(),
            cursor_bg: "blue".to_string(),
            cursor_fg: "black".to_string(),
            error: "red".to_string(),
            warning: "yellow".to_string(),
            success: "green".to_string(),
        }
    }
}

impl ThemeColors {
    /// `#rrggbb` or one of the named terminal colors. Unknown values fall
    /// back to the terminal default.
    pub fn parse_color(value: &str) -> Color {
        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return Color::Rgb(r, g, b);
                }
            }
            return Color::Reset;
        }
        value.parse::<Color>().unwrap_or(Color::Reset)
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn answer_correct(&self) -> Color { Self::parse_color(&self.answer_correct) }
    pub fn answer_wrong(&self) -> Color { Self::parse_color(&self.answer_wrong) }
    pub fn answer_wrong_bg(&self) -> Color { Self::parse_color(&self.answer_wrong_bg) }
    pub fn cursor_bg(&self) -> Color { Self::parse_color(&self.cursor_bg) }
    pub fn cursor_fg(&self) -> Color { Self::parse_color(&self.cursor_fg) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_and_named_colors() {
        assert_eq!(ThemeColors::parse_color("#a6e3a1"), Color::Rgb(0xa6, 0xe3, 0xa1));
        assert_eq!(ThemeColors::parse_color("red"), Color::Red);
        assert_eq!(ThemeColors::parse_color("#zzz"), Color::Reset);
        assert_eq!(ThemeColors::parse_color("not-a-color"), Color::Reset);
    }

    #[test]
    fn test_bundled_themes_parse() {
        let names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        assert!(names.iter().any(|n| n == DEFAULT_THEME));
        for name in names {
            let file = ThemeAssets::get(&format!("{name}.toml")).unwrap();
            let content = std::str::from_utf8(file.data.as_ref()).unwrap();
            let theme: Theme = toml::from_str(content).unwrap();
            assert_eq!(theme.name, name);
        }
    }
}

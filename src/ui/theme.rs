use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::Theme;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    pub foreground: Option<String>,
    pub style: Vec<String>,
}

impl ColorConfig {
    fn new(foreground: &str, style: &[&str]) -> Self {
        Self {
            foreground: Some(foreground.to_string()),
            style: style.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Named text styles for the menu and statistics pages.
pub struct StyleSheet {
    styles: HashMap<String, ColorConfig>,
}

impl StyleSheet {
    /// `accent` colors titles and headings; unknown names fall back to cyan.
    pub fn new(accent: &str) -> Self {
        let accent = if parse_color(accent).is_some() { accent } else { "cyan" };

        let entries = [
            ("title", ColorConfig::new(accent, &["bold"])),
            ("heading", ColorConfig::new(accent, &["bold", "underline"])),
            ("label", ColorConfig::new("white", &[])),
            ("value", ColorConfig::new("yellow", &[])),
            ("error", ColorConfig::new("red", &["bold"])),
            ("success", ColorConfig::new("green", &["bold"])),
            ("warning", ColorConfig::new("yellow", &["bold"])),
            ("info", ColorConfig::new("blue", &[])),
            ("separator", ColorConfig::new("bright_black", &["dimmed"])),
        ];

        Self {
            styles: entries.into_iter().map(|(name, cfg)| (name.to_string(), cfg)).collect(),
        }
    }

    pub fn apply_style(&self, text: &str, style_name: &str) -> String {
        let Some(color_config) = self.styles.get(style_name) else {
            return text.to_string();
        };

        let mut styled = text.normal();
        if let Some(color) = color_config.foreground.as_deref().and_then(parse_color) {
            styled = styled.color(color);
        }
        for style in &color_config.style {
            styled = match style.as_str() {
                "bold" => styled.bold(),
                "italic" => styled.italic(),
                "underline" => styled.underline(),
                "dimmed" => styled.dimmed(),
                _ => styled,
            };
        }

        styled.to_string()
    }

    /// Theme ids are always shown in the same color as their obstacle.
    pub fn theme_label(&self, theme: Theme) -> String {
        self.theme_column(theme, 0)
    }

    /// Like `theme_label`, left-aligned to `width` visible columns. Padding is
    /// applied before coloring so escape codes do not eat into the width.
    pub fn theme_column(&self, theme: Theme, width: usize) -> String {
        let color = match theme {
            Theme::EscapingF => Color::Red,
            Theme::EscapingT => Color::Yellow,
            Theme::RescuingG => Color::Magenta,
        };
        format!("{:<width$}", theme.id()).color(color).bold().to_string()
    }

    pub fn has_style(&self, style_name: &str) -> bool {
        self.styles.contains_key(style_name)
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new("cyan")
    }
}

pub fn parse_color(color_name: &str) -> Option<Color> {
    match color_name.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "bright_black" => Some(Color::BrightBlack),
        "bright_red" => Some(Color::BrightRed),
        "bright_green" => Some(Color::BrightGreen),
        "bright_yellow" => Some(Color::BrightYellow),
        "bright_blue" => Some(Color::BrightBlue),
        "bright_magenta" => Some(Color::BrightMagenta),
        "bright_cyan" => Some(Color::BrightCyan),
        "bright_white" => Some(Color::BrightWhite),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;

    #[test]
    fn test_default_styles() {
        let sheet = StyleSheet::default();
        for name in ["title", "heading", "error", "success", "warning", "separator"] {
            assert!(sheet.has_style(name), "missing style {}", name);
        }
    }

    #[test]
    fn test_apply_style() {
        let sheet = StyleSheet::new("magenta");

        assert_eq!(strip_ansi_codes(&sheet.apply_style("Score", "title")), "Score");
        assert_eq!(sheet.apply_style("Test", "nonexistent"), "Test");
        assert_eq!(strip_ansi_codes(&sheet.theme_label(Theme::RescuingG)), "Rescuing G");
    }

    #[test]
    fn test_theme_column_pads_visible_text() {
        colored::control::set_override(true);
        let sheet = StyleSheet::default();

        let cell = sheet.theme_column(Theme::EscapingF, 12);
        assert!(cell.contains('\x1b'));
        assert_eq!(format!("   {}|", strip_ansi_codes(&cell)), "   Escaping F  |");
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("red"), Some(Color::Red));
        assert_eq!(parse_color("RED"), Some(Color::Red));
        assert_eq!(parse_color("bright_green"), Some(Color::BrightGreen));
        assert_eq!(parse_color("invalid"), None);
    }
}

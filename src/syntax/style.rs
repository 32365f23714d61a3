//! Style types for text rendering
//!
//! This module provides the foundation for styled text rendering,
//! used for syntax highlighting, search matches and compiler diagnostics.

use crate::config::ThemeMode;

/// Terminal colors (ANSI 16-color palette for compatibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Reverse video (swap fg/bg)
    pub reverse: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Create a style with just background color
    pub fn bg(color: Color) -> Self {
        Self {
            bg: color,
            ..Default::default()
        }
    }

    /// Create a reverse video style (for the current match)
    pub fn reverse() -> Self {
        Self {
            reverse: true,
            ..Default::default()
        }
    }

    /// Builder: set background color
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: set italic
    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Layer `over` on top of this style.
    ///
    /// Colors in `over` replace ours unless they are `Default`; attribute
    /// flags are combined.
    pub fn overlay(self, over: Style) -> Style {
        Style {
            fg: if over.fg == Color::Default { self.fg } else { over.fg },
            bg: if over.bg == Color::Default { self.bg } else { over.bg },
            bold: self.bold || over.bold,
            italic: self.italic || over.italic,
            underline: self.underline || over.underline,
            reverse: self.reverse || over.reverse,
        }
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Styles for every kind of decoration the display paints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub keyword: Style,
    pub string: Style,
    pub comment: Style,
    pub search_match: Style,
    pub current_match: Style,
    pub diagnostic: Style,
}

impl Palette {
    /// Dark palette (also used when the theme follows the system)
    pub fn dark() -> Self {
        Self {
            keyword: Style::fg(Color::BrightBlue).with_bold(),
            string: Style::fg(Color::BrightYellow),
            comment: Style::fg(Color::Green).with_italic(),
            search_match: Style::bg(Color::Yellow),
            current_match: Style::reverse(),
            diagnostic: Style::bg(Color::Red),
        }
    }

    /// Light palette
    pub fn light() -> Self {
        Self {
            keyword: Style::fg(Color::Blue).with_bold(),
            string: Style::fg(Color::Red),
            comment: Style::fg(Color::Green).with_italic(),
            search_match: Style::bg(Color::BrightYellow),
            current_match: Style::reverse(),
            diagnostic: Style::bg(Color::BrightRed),
        }
    }

    /// Palette for a theme mode
    pub fn for_theme(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark | ThemeMode::System => Self::dark(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_default() {
        let style = Style::default();
        assert!(style.is_default());
        assert_eq!(style.fg, Color::Default);
        assert_eq!(style.bg, Color::Default);
        assert!(!style.bold);
    }

    #[test]
    fn test_style_builders() {
        let style = Style::fg(Color::Red).with_bold().with_bg(Color::Blue);
        assert_eq!(style.fg, Color::Red);
        assert_eq!(style.bg, Color::Blue);
        assert!(style.bold);
        assert!(!style.is_default());
    }

    #[test]
    fn test_overlay_keeps_foreground_under_background() {
        let keyword = Style::fg(Color::Blue).with_bold();
        let layered = keyword.overlay(Style::bg(Color::Yellow));
        assert_eq!(layered.fg, Color::Blue);
        assert_eq!(layered.bg, Color::Yellow);
        assert!(layered.bold);
    }

    #[test]
    fn test_system_theme_uses_dark_palette() {
        assert_eq!(Palette::for_theme(ThemeMode::System), Palette::dark());
        assert_ne!(Palette::for_theme(ThemeMode::Light), Palette::dark());
    }
}

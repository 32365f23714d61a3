//! Terminal abstraction using crossterm

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyEvent},
    execute, queue,
    style::{self as term_style, Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use lexpad::syntax::{Color, Style};
use lexpad::Result;

/// Terminal wrapper for cross-platform terminal I/O
pub struct Terminal {
    /// Terminal width in columns
    cols: u16,
    /// Terminal height in rows
    rows: u16,
}

impl Terminal {
    /// Create a new terminal instance and enter raw mode
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let (cols, rows) = terminal::size()?;

        let term = Self { cols, rows };
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        Ok(term)
    }

    /// Get terminal width
    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Get terminal height
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Clear the entire screen
    pub fn clear_screen(&mut self) -> Result<()> {
        queue!(io::stdout(), terminal::Clear(ClearType::All))?;
        Ok(())
    }

    /// Clear from cursor to end of line
    pub fn clear_to_eol(&mut self) -> Result<()> {
        queue!(io::stdout(), terminal::Clear(ClearType::UntilNewLine))?;
        Ok(())
    }

    /// Move cursor to position (0-indexed)
    pub fn move_cursor(&mut self, row: u16, col: u16) -> Result<()> {
        queue!(io::stdout(), cursor::MoveTo(col, row))?;
        Ok(())
    }

    /// Write a string at current cursor position
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        queue!(io::stdout(), Print(s))?;
        Ok(())
    }

    /// Flush output buffer to terminal
    pub fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    /// Set cursor visibility
    pub fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            queue!(io::stdout(), cursor::Show)?;
        } else {
            queue!(io::stdout(), cursor::Hide)?;
        }
        Ok(())
    }

    /// Wait up to `timeout` for a key press
    ///
    /// Resize events update the cached size and return `None`, as does a
    /// timeout. Mouse and focus events are ignored.
    pub fn next_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key_event) => Ok(Some(key_event)),
            Event::Resize(cols, rows) => {
                self.cols = cols;
                self.rows = rows;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Set reverse video mode
    pub fn set_reverse(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            queue!(io::stdout(), SetAttribute(Attribute::Reverse))?;
        } else {
            queue!(io::stdout(), SetAttribute(Attribute::NoReverse))?;
        }
        Ok(())
    }

    /// Set dim/faint mode (for line numbers, etc.)
    pub fn set_dim(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            queue!(io::stdout(), SetAttribute(Attribute::Dim))?;
        } else {
            queue!(io::stdout(), SetAttribute(Attribute::NormalIntensity))?;
        }
        Ok(())
    }

    /// Apply a full style; call `reset_attributes` afterwards
    pub fn apply_style(&mut self, style: &Style) -> Result<()> {
        let mut out = io::stdout();
        if let Some(color) = to_crossterm(style.fg) {
            queue!(out, SetForegroundColor(color))?;
        }
        if let Some(color) = to_crossterm(style.bg) {
            queue!(out, SetBackgroundColor(color))?;
        }
        if style.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if style.italic {
            queue!(out, SetAttribute(Attribute::Italic))?;
        }
        if style.underline {
            queue!(out, SetAttribute(Attribute::Underlined))?;
        }
        if style.reverse {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }

    /// Reset all attributes
    pub fn reset_attributes(&mut self) -> Result<()> {
        queue!(io::stdout(), SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    /// Sound the bell
    pub fn beep(&mut self) -> Result<()> {
        print!("\x07");
        self.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Map a palette color to crossterm's; `Default` leaves the terminal's own
fn to_crossterm(color: Color) -> Option<term_style::Color> {
    use term_style::Color as C;
    let mapped = match color {
        Color::Default => return None,
        Color::Black => C::Black,
        Color::Red => C::DarkRed,
        Color::Green => C::DarkGreen,
        Color::Yellow => C::DarkYellow,
        Color::Blue => C::DarkBlue,
        Color::Magenta => C::DarkMagenta,
        Color::Cyan => C::DarkCyan,
        Color::White => C::Grey,
        Color::BrightBlack => C::DarkGrey,
        Color::BrightRed => C::Red,
        Color::BrightGreen => C::Green,
        Color::BrightYellow => C::Yellow,
        Color::BrightBlue => C::Blue,
        Color::BrightMagenta => C::Magenta,
        Color::BrightCyan => C::Cyan,
        Color::BrightWhite => C::White,
    };
    Some(mapped)
}

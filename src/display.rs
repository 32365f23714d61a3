//! Display rendering
//!
//! Screen layout, top to bottom: title line, text area, find bar (when
//! open), notice panel (when there is one), status line, minibuffer.

use unicode_width::UnicodeWidthChar;

use lexpad::decorate::{ApplyReport, StyleMap};
use lexpad::syntax::Style;
use lexpad::{Result, Session};

use crate::editor::PromptState;
use crate::terminal::Terminal;

/// Notice lines always available, however small the screen
const NOTICE_LINES: usize = 7;

/// Display state
pub struct Display {
    /// Whether a full redraw is needed
    needs_redraw: bool,
    /// Message to show in minibuffer (bottom line)
    message: Option<String>,
    /// First document line shown in the text area
    top_line: usize,
    /// Rows in the text area as of the last render
    text_rows: usize,
    /// Outcome of the last decoration pass
    last_report: ApplyReport,
}

impl Display {
    pub fn new() -> Self {
        Self {
            needs_redraw: true,
            message: None,
            top_line: 0,
            text_rows: 1,
            last_report: ApplyReport::default(),
        }
    }

    /// Mark that a full redraw is needed
    pub fn force_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Set a message to display
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Clear the message
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Rows in the text area, for page motion
    pub fn text_rows(&self) -> usize {
        self.text_rows
    }

    /// Render the editor display
    pub fn render(
        &mut self,
        terminal: &mut Terminal,
        session: &Session,
        prompt: &PromptState,
    ) -> Result<()> {
        let cols = terminal.cols() as usize;
        let rows = terminal.rows() as usize;
        if rows < 4 || cols < 10 {
            return Ok(());
        }

        if self.needs_redraw {
            terminal.clear_screen()?;
        }

        let notice_limit = NOTICE_LINES.max(rows / 2).min(rows - 4);
        let notice: Vec<&str> = session
            .notice()
            .map(|n| n.lines().take(notice_limit).collect())
            .unwrap_or_default();
        let find_rows = usize::from(session.find().visible);
        let chrome = 3 + find_rows + notice.len();
        self.text_rows = rows.saturating_sub(chrome).max(1);
        self.scroll_to_cursor(session);

        let mut row = 0;
        self.render_bar(terminal, row, cols, &session.title())?;
        row += 1;

        self.render_text(terminal, session, row, cols)?;
        row += self.text_rows;

        if find_rows > 0 {
            self.render_find_bar(terminal, session, row, cols)?;
            row += 1;
        }

        for line in &notice {
            terminal.move_cursor(row as u16, 0)?;
            terminal.set_dim(true)?;
            terminal.write_str("| ")?;
            terminal.set_dim(false)?;
            terminal.write_str(&truncate_to_width(line, cols.saturating_sub(2)))?;
            terminal.clear_to_eol()?;
            row += 1;
        }

        self.render_bar(terminal, row, cols, &session.status_line())?;
        row += 1;

        self.render_minibuffer(terminal, row, cols, prompt)?;

        if !prompt.active {
            self.position_cursor(terminal, session, cols)?;
        }
        terminal.set_cursor_visible(true)?;
        terminal.flush()?;

        self.needs_redraw = false;
        Ok(())
    }

    fn scroll_to_cursor(&mut self, session: &Session) {
        let cursor_line = session.document().cursor_line();
        if cursor_line < self.top_line {
            self.top_line = cursor_line;
        } else if cursor_line >= self.top_line + self.text_rows {
            self.top_line = cursor_line + 1 - self.text_rows;
        }
        let last = session.document().line_count().saturating_sub(1);
        self.top_line = self.top_line.min(last);
    }

    /// Calculate width needed for line numbers (including separator)
    fn line_number_width(&self, session: &Session) -> usize {
        if !session.config().show_line_numbers {
            return 0;
        }
        let digits = session.document().line_count().to_string().len();
        digits.max(3) + 1
    }

    /// Render the visible lines with every decoration layer applied
    fn render_text(
        &mut self,
        terminal: &mut Terminal,
        session: &Session,
        top_row: usize,
        cols: usize,
    ) -> Result<()> {
        let document = session.document();
        let text = document.text();
        let line_count = document.line_count();
        let last_visible = (self.top_line + self.text_rows).min(line_count) - 1;
        let window = document.line_range(self.top_line).start..document.line_range(last_visible).end;

        let palette = session.palette();
        let mut styles = StyleMap::new(text, window);
        self.last_report = styles.paint(session.decorations(&palette));
        if !self.last_report.is_clean() {
            tracing::debug!(report = %self.last_report, "painted with stale decorations");
        }

        let lnum_width = self.line_number_width(session);
        let text_cols = cols.saturating_sub(lnum_width);
        let tab_width = session.config().tab_width.max(1);

        for offset in 0..self.text_rows {
            let line_idx = self.top_line + offset;
            terminal.move_cursor((top_row + offset) as u16, 0)?;

            if line_idx < line_count {
                if lnum_width > 0 {
                    let lnum = format!("{:>width$} ", line_idx + 1, width = lnum_width - 1);
                    terminal.set_dim(true)?;
                    terminal.write_str(&lnum)?;
                    terminal.set_dim(false)?;
                }
                let range = document.line_range(line_idx);
                self.render_line(terminal, text, range, &styles, text_cols, tab_width)?;
            } else {
                if lnum_width > 0 {
                    terminal.write_str(&" ".repeat(lnum_width))?;
                }
                terminal.set_dim(true)?;
                terminal.write_str("~")?;
                terminal.set_dim(false)?;
            }

            terminal.clear_to_eol()?;
        }
        Ok(())
    }

    /// Render one line, grouping runs of equal style
    fn render_line(
        &self,
        terminal: &mut Terminal,
        text: &str,
        range: std::ops::Range<usize>,
        styles: &StyleMap<'_>,
        max_cols: usize,
        tab_width: usize,
    ) -> Result<()> {
        let mut run = String::new();
        let mut run_style = Style::default();
        let mut col = 0;

        for (i, ch) in text[range.clone()].char_indices() {
            let style = styles.style_at(range.start + i);
            let (glyph, width) = match ch {
                '\t' => {
                    let width = tab_width - col % tab_width;
                    (" ".repeat(width), width)
                }
                '\r' => continue,
                c if c.is_control() => ("?".to_string(), 1),
                c => (c.to_string(), c.width().unwrap_or(1)),
            };
            if col + width > max_cols {
                break;
            }
            if style != run_style && !run.is_empty() {
                write_run(terminal, &run, &run_style)?;
                run.clear();
            }
            run_style = style;
            run.push_str(&glyph);
            col += width;
        }
        if !run.is_empty() {
            write_run(terminal, &run, &run_style)?;
        }
        Ok(())
    }

    /// A full-width reverse-video bar (title, status)
    fn render_bar(&self, terminal: &mut Terminal, row: usize, cols: usize, content: &str) -> Result<()> {
        terminal.move_cursor(row as u16, 0)?;
        terminal.set_reverse(true)?;
        let shown = truncate_to_width(content, cols);
        let used: usize = shown.chars().map(|c| c.width().unwrap_or(1)).sum();
        terminal.write_str(&shown)?;
        terminal.write_str(&" ".repeat(cols.saturating_sub(used)))?;
        terminal.set_reverse(false)?;
        Ok(())
    }

    fn render_find_bar(
        &self,
        terminal: &mut Terminal,
        session: &Session,
        row: usize,
        cols: usize,
    ) -> Result<()> {
        let find = session.find();
        let matcher = session.matcher();
        let position = match matcher.current_index() {
            Some(i) => format!("{}/{}", i + 1, matcher.count()),
            None => "0/0".to_string(),
        };
        let bar = format!(
            "Find: {}  Replace: {}  [{}] [{}]  {}",
            find.query.text,
            find.replacement,
            if find.query.case_sensitive { "Match case" } else { "any case" },
            if find.query.whole_word { "Whole word" } else { "substring" },
            position
        );
        terminal.move_cursor(row as u16, 0)?;
        terminal.write_str(&truncate_to_width(&bar, cols))?;
        terminal.clear_to_eol()?;
        Ok(())
    }

    /// Render the minibuffer (prompt or message)
    fn render_minibuffer(
        &self,
        terminal: &mut Terminal,
        row: usize,
        cols: usize,
        prompt: &PromptState,
    ) -> Result<()> {
        terminal.move_cursor(row as u16, 0)?;

        if prompt.active {
            let line = match &prompt.default {
                Some(default) if prompt.input.is_empty() => {
                    format!("{} (default {}): ", prompt.prompt, default)
                }
                _ => format!("{}: {}", prompt.prompt, prompt.input),
            };
            let shown = truncate_to_width(&line, cols.saturating_sub(1));
            let width: usize = shown.chars().map(|c| c.width().unwrap_or(1)).sum();
            terminal.write_str(&shown)?;
            terminal.clear_to_eol()?;
            terminal.move_cursor(row as u16, width as u16)?;
            return Ok(());
        }

        if let Some(ref msg) = self.message {
            terminal.write_str(&truncate_to_width(msg, cols))?;
        }
        terminal.clear_to_eol()?;
        Ok(())
    }

    /// Position the hardware cursor at the correct location
    fn position_cursor(&self, terminal: &mut Terminal, session: &Session, cols: usize) -> Result<()> {
        let document = session.document();
        let line = document.cursor_line();
        let start = document.line_range(line).start;
        let before = &document.text()[start..document.cursor()];

        let tab_width = session.config().tab_width.max(1);
        let display_col = before.chars().fold(0, |col, ch| {
            if ch == '\t' {
                col + tab_width - col % tab_width
            } else {
                col + ch.width().unwrap_or(1)
            }
        });

        let screen_row = 1 + line.saturating_sub(self.top_line);
        let screen_col = (self.line_number_width(session) + display_col).min(cols - 1);
        terminal.move_cursor(screen_row as u16, screen_col as u16)?;
        Ok(())
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

fn write_run(terminal: &mut Terminal, run: &str, style: &Style) -> Result<()> {
    if style.is_default() {
        terminal.write_str(run)
    } else {
        terminal.apply_style(style)?;
        terminal.write_str(run)?;
        terminal.reset_attributes()
    }
}

/// Truncate a string to fit within a display width
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("hi", 10), "hi");
        // Wide characters take two columns
        assert_eq!(truncate_to_width("日本語", 5), "日本");
    }
}

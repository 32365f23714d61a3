//! The document being edited: text, cursor and file association
//!
//! Text is held as a single `String`; the cursor is a byte offset that
//! always sits on a character boundary. Lines are found on demand by
//! splitting on `\n`.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{EditorError, Result};

/// Name shown for a document with no file
pub const UNTITLED_NAME: &str = "untitled.txt";

fn word_regex() -> Option<&'static Regex> {
    static WORD: OnceLock<Option<Regex>> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\b\w+\b").ok()).as_ref()
}

/// A text buffer with a cursor
#[derive(Debug, Default)]
pub struct Document {
    text: String,
    /// Byte offset of the cursor
    cursor: usize,
    /// Associated file path (None for untitled documents)
    path: Option<PathBuf>,
    /// Whether there are unsaved changes
    modified: bool,
}

impl Document {
    /// Create an empty, untitled document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding `text`
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Read a whole file into a new document
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), bytes = text.len(), "document opened");
        Ok(Self {
            text,
            cursor: 0,
            path: Some(path.to_path_buf()),
            modified: false,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, snapping back to a character boundary
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = floor_boundary(&self.text, offset);
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// Bare file name, if the document has a path
    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().into_owned())
    }

    /// Name for the title line
    pub fn display_name(&self) -> String {
        self.file_name().unwrap_or_else(|| UNTITLED_NAME.to_string())
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Write the whole text to the document's path
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or(EditorError::NoFileName)?;
        self.save_as(path)
    }

    /// Write the whole text to `path` and adopt it as the document's path
    pub fn save_as(&mut self, path: PathBuf) -> Result<()> {
        fs::write(&path, &self.text)?;
        tracing::info!(path = %path.display(), bytes = self.text.len(), "document saved");
        self.path = Some(path);
        self.modified = false;
        Ok(())
    }

    /// Replace the whole text, keeping the cursor as close as possible
    pub fn replace_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = floor_boundary(&self.text, self.cursor);
        self.modified = true;
    }

    /// Insert a character at the cursor
    pub fn insert_char(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        self.modified = true;
    }

    /// Split the line at the cursor
    pub fn newline(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the character before the cursor; false at the start of text
    pub fn backspace(&mut self) -> bool {
        match self.text[..self.cursor].chars().next_back() {
            Some(ch) => {
                self.cursor -= ch.len_utf8();
                self.text.remove(self.cursor);
                self.modified = true;
                true
            }
            None => false,
        }
    }

    /// Delete the character under the cursor; false at the end of text
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        self.text.remove(self.cursor);
        self.modified = true;
        true
    }

    pub fn move_left(&mut self) -> bool {
        match self.text[..self.cursor].chars().next_back() {
            Some(ch) => {
                self.cursor -= ch.len_utf8();
                true
            }
            None => false,
        }
    }

    pub fn move_right(&mut self) -> bool {
        match self.text[self.cursor..].chars().next() {
            Some(ch) => {
                self.cursor += ch.len_utf8();
                true
            }
            None => false,
        }
    }

    /// Move to the previous line, keeping the character column
    pub fn move_up(&mut self) -> bool {
        let line = self.cursor_line();
        if line == 0 {
            return false;
        }
        self.move_to_line(line - 1);
        true
    }

    /// Move to the next line, keeping the character column
    pub fn move_down(&mut self) -> bool {
        let line = self.cursor_line();
        if line + 1 >= self.line_count() {
            return false;
        }
        self.move_to_line(line + 1);
        true
    }

    fn move_to_line(&mut self, target: usize) {
        let column = self.cursor_column();
        let range = self.line_range(target);
        let line = &self.text[range.clone()];
        let offset = line
            .char_indices()
            .nth(column)
            .map_or(line.len(), |(i, _)| i);
        self.cursor = range.start + offset;
    }

    pub fn move_line_start(&mut self) {
        self.cursor = self.line_range(self.cursor_line()).start;
    }

    pub fn move_line_end(&mut self) {
        self.cursor = self.line_range(self.cursor_line()).end;
    }

    pub fn move_text_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_text_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Number of lines; empty text has one
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Byte range of line `index`, without its newline
    ///
    /// Indices past the end give an empty range at the end of the text.
    pub fn line_range(&self, index: usize) -> Range<usize> {
        let mut start = 0;
        for (i, line) in self.text.split('\n').enumerate() {
            if i == index {
                return start..start + line.len();
            }
            start += line.len() + 1;
        }
        self.text.len()..self.text.len()
    }

    /// Line index containing byte `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        self.text[..offset].matches('\n').count()
    }

    pub fn cursor_line(&self) -> usize {
        self.line_of(self.cursor)
    }

    /// Character column of the cursor within its line
    pub fn cursor_column(&self) -> usize {
        let start = self.line_range(self.cursor_line()).start;
        self.text[start..self.cursor].chars().count()
    }

    /// Words as `\b\w+\b` runs
    pub fn word_count(&self) -> usize {
        word_regex().map_or(0, |re| re.find_iter(&self.text).count())
    }

    /// Characters (not bytes)
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Largest character boundary not past `offset`
fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document() {
        let doc = Document::new();
        assert_eq!(doc.text(), "");
        assert_eq!(doc.cursor(), 0);
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.display_name(), "untitled.txt");
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_typing_and_deleting() {
        let mut doc = Document::new();
        for ch in "héllo".chars() {
            doc.insert_char(ch);
        }
        assert_eq!(doc.text(), "héllo");
        assert_eq!(doc.cursor(), 6);
        assert!(doc.is_modified());

        doc.move_left();
        doc.move_left();
        doc.move_left();
        doc.move_left();
        assert_eq!(doc.cursor(), 1);
        assert!(doc.delete());
        assert_eq!(doc.text(), "hllo");
        assert!(doc.backspace());
        assert_eq!(doc.text(), "llo");
        assert!(!doc.backspace());

        doc.move_text_end();
        assert!(!doc.delete());
        doc.newline();
        doc.insert_char('x');
        assert_eq!(doc.text(), "llo\nx");
    }

    #[test]
    fn test_lines() {
        let doc = Document::from_text("ab\n\ncdé\n");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.line_range(0), 0..2);
        assert_eq!(doc.line_range(1), 3..3);
        assert_eq!(doc.line_range(2), 4..8);
        assert_eq!(doc.line_range(3), 9..9);
        assert_eq!(doc.line_range(10), 9..9);
        assert_eq!(doc.line_of(0), 0);
        assert_eq!(doc.line_of(3), 1);
        assert_eq!(doc.line_of(5), 2);
        assert_eq!(doc.line_of(100), 3);
    }

    #[test]
    fn test_vertical_motion_keeps_column() {
        let mut doc = Document::from_text("abcdef\nxy\nétoile");
        doc.set_cursor(4);
        assert!(doc.move_down());
        assert_eq!(doc.cursor(), 9);
        assert!(doc.move_down());
        // column 2 of line 3
        assert_eq!(doc.cursor_line(), 2);
        assert_eq!(doc.cursor_column(), 2);
        assert!(!doc.move_down());
        assert!(doc.move_up());
        assert!(doc.move_up());
        assert_eq!(doc.cursor(), 2);
        assert!(!doc.move_up());

        doc.move_line_end();
        assert_eq!(doc.cursor(), 6);
        doc.move_line_start();
        assert_eq!(doc.cursor(), 0);
    }

    #[test]
    fn test_replace_text_clamps_cursor() {
        let mut doc = Document::from_text("hello world");
        doc.move_text_end();
        doc.replace_text("hé");
        assert_eq!(doc.cursor(), 3);

        doc.set_cursor(2);
        assert_eq!(doc.cursor(), 1);
    }

    #[test]
    fn test_counts() {
        let doc = Document::from_text("val x = 5 // note\nfun é()");
        assert_eq!(doc.word_count(), 6);
        assert_eq!(doc.char_count(), 25);
        assert_eq!(Document::new().word_count(), 0);
    }

    #[test]
    fn test_save_requires_a_path() {
        let mut doc = Document::from_text("x");
        assert!(matches!(doc.save(), Err(EditorError::NoFileName)));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Main.kt");
        let mut doc = Document::from_text("fun main() {}\n");
        doc.set_modified(true);
        doc.save_as(path.clone()).unwrap();
        assert!(!doc.is_modified());
        assert_eq!(doc.file_name().as_deref(), Some("Main.kt"));

        let reopened = Document::from_file(&path).unwrap();
        assert_eq!(reopened.text(), "fun main() {}\n");
        assert_eq!(reopened.path(), Some(path.as_path()));
        assert!(!reopened.is_modified());

        // Overwrite, not append
        doc.replace_text("x");
        doc.save().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x");
    }
}

//! Command dispatch system
//!
//! This module provides the key binding table and command implementations.
//! Commands are organized into submodules by category.

mod editing;
mod files;
mod misc;
mod navigation;
mod search;

use std::collections::HashMap;

use lexpad::Result;

use crate::editor::EditorState;
use crate::input::{special, Key};

/// Command result status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
    Abort,
}

/// Command function signature
pub type CommandFn = fn(&mut EditorState) -> Result<CommandStatus>;

/// Key binding entry with command function and name
struct BindingEntry {
    function: CommandFn,
    name: &'static str,
}

/// Key binding table
pub struct KeyTable {
    bindings: HashMap<u32, BindingEntry>,
}

impl KeyTable {
    /// Create an empty key table
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create key table with default bindings
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.setup_defaults();
        table
    }

    /// Add a key binding with command name
    pub fn bind_named(&mut self, key: Key, cmd: CommandFn, name: &'static str) {
        self.bindings.insert(key.code(), BindingEntry { function: cmd, name });
    }

    /// Look up a command for a key
    pub fn lookup(&self, key: Key) -> Option<CommandFn> {
        self.bindings.get(&key.code()).map(|e| e.function)
    }

    /// Look up a command name for a key
    pub fn lookup_name(&self, key: Key) -> Option<&'static str> {
        self.bindings.get(&key.code()).map(|e| e.name)
    }

    /// All bindings as (key, command name), sorted by command name
    pub fn all_bindings(&self) -> Vec<(Key, &'static str)> {
        let mut bindings: Vec<_> = self
            .bindings
            .iter()
            .map(|(&code, entry)| (Key(code), entry.name))
            .collect();
        bindings.sort_by(|a, b| a.1.cmp(b.1).then(a.0.code().cmp(&b.0.code())));
        bindings
    }

    /// Set up default key bindings
    fn setup_defaults(&mut self) {
        use editing::*;
        use files::*;
        use misc::*;
        use navigation::*;
        use search::*;

        // Cursor movement
        self.bind_named(Key::ctrl('f'), forward_char, "forward-char");
        self.bind_named(Key::ctrl('b'), backward_char, "backward-char");
        self.bind_named(Key::ctrl('n'), next_line, "next-line");
        self.bind_named(Key::ctrl('p'), previous_line, "previous-line");
        self.bind_named(Key::ctrl('a'), beginning_of_line, "beginning-of-line");
        self.bind_named(Key::ctrl('e'), end_of_line, "end-of-line");
        self.bind_named(Key::ctrl('v'), scroll_down, "scroll-down");
        self.bind_named(Key::meta('v'), scroll_up, "scroll-up");
        self.bind_named(Key::meta('<'), beginning_of_buffer, "beginning-of-buffer");
        self.bind_named(Key::meta('>'), end_of_buffer, "end-of-buffer");

        self.bind_named(Key::special(special::RIGHT), forward_char, "forward-char");
        self.bind_named(Key::special(special::LEFT), backward_char, "backward-char");
        self.bind_named(Key::special(special::DOWN), next_line, "next-line");
        self.bind_named(Key::special(special::UP), previous_line, "previous-line");
        self.bind_named(Key::special(special::PAGE_UP), scroll_up, "scroll-up");
        self.bind_named(Key::special(special::PAGE_DOWN), scroll_down, "scroll-down");
        self.bind_named(Key::special(special::HOME), beginning_of_line, "beginning-of-line");
        self.bind_named(Key::special(special::END), end_of_line, "end-of-line");

        // Editing
        self.bind_named(Key::ctrl('m'), newline, "newline");
        self.bind_named(Key::ctrl('i'), insert_tab, "insert-tab");
        self.bind_named(Key::ctrl('d'), delete_char_forward, "delete-char");
        self.bind_named(Key::special(special::DELETE), delete_char_forward, "delete-char");
        self.bind_named(Key::BACKSPACE, delete_char_backward, "delete-backward-char");
        self.bind_named(Key::ctrl('h'), delete_char_backward, "delete-backward-char");

        // Undo
        self.bind_named(Key::ctrl('z'), undo, "undo");
        self.bind_named(Key::ctrl('_'), undo, "undo");
        self.bind_named(Key::ctrl('/'), undo, "undo");
        self.bind_named(Key::ctrl('y'), redo, "redo");

        // Files
        self.bind_named(Key::ctlx_ctrl('n'), new_document, "new-document");
        self.bind_named(Key::ctlx_ctrl('f'), find_file, "find-file");
        self.bind_named(Key::ctlx_ctrl('s'), save_buffer, "save-buffer");
        self.bind_named(Key::ctlx_ctrl('w'), write_file, "write-file");

        // Rule sets
        self.bind_named(Key::ctlx('l'), load_rules, "load-language");
        self.bind_named(Key::ctlx('k'), builtin_rules, "default-language");
        self.bind_named(Key::ctlx('o'), toggle_overlap, "toggle-overlap-mode");

        // Find and replace
        self.bind_named(Key::ctrl('s'), find, "find");
        self.bind_named(Key::meta('n'), find_next, "find-next");
        self.bind_named(Key::f(3), find_next, "find-next");
        self.bind_named(Key::meta('p'), find_previous, "find-previous");
        self.bind_named(Key::f(2), find_previous, "find-previous");
        self.bind_named(Key::meta('c'), toggle_case, "toggle-match-case");
        self.bind_named(Key::meta('w'), toggle_whole_word, "toggle-whole-word");
        self.bind_named(Key::meta('r'), replace_one, "replace");
        self.bind_named(Key::meta('a'), replace_all, "replace-all");

        // Compile
        self.bind_named(Key::f(5), compile, "compile");
        self.bind_named(Key::ctlx('c'), compile, "compile");
        self.bind_named(Key::ctlx('u'), set_compiler_url, "set-compiler-url");

        // View
        self.bind_named(Key::ctlx('t'), cycle_theme, "cycle-theme");
        self.bind_named(Key::ctlx('#'), toggle_line_numbers, "toggle-line-numbers");
        self.bind_named(Key::ctrl('l'), redraw_display, "redraw-display");
        self.bind_named(Key::f(1), describe_bindings, "describe-bindings");

        // Abort / quit
        self.bind_named(Key::ctrl('g'), abort, "keyboard-quit");
        self.bind_named(Key::ctlx_ctrl('c'), quit, "quit");
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let table = KeyTable::with_defaults();
        assert_eq!(table.lookup_name(Key::ctlx_ctrl('s')), Some("save-buffer"));
        assert_eq!(table.lookup_name(Key::f(5)), Some("compile"));
        assert_eq!(table.lookup_name(Key::ctrl('z')), Some("undo"));
        assert!(table.lookup(Key::char('a')).is_none());
    }

    #[test]
    fn test_all_bindings_sorted_by_name() {
        let table = KeyTable::with_defaults();
        let bindings = table.all_bindings();
        assert!(bindings.windows(2).all(|w| w[0].1 <= w[1].1));
        assert!(bindings.iter().any(|(key, name)| *name == "redo" && *key == Key::ctrl('y')));
    }
}

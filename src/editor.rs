//! Editor state and main loop

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use lexpad::search::Query;
use lexpad::{EditorError, Result, Session};

use crate::command::{CommandStatus, KeyTable};
use crate::display::Display;
use crate::input::{InputState, Key};
use crate::terminal::Terminal;

/// Longest the loop sleeps with nothing scheduled
const IDLE_WAIT: Duration = Duration::from_millis(500);
/// Poll interval while a compile is in flight
const COMPILE_POLL: Duration = Duration::from_millis(50);

/// Terminal front end around a [`Session`]
pub struct EditorState {
    /// Terminal interface
    pub terminal: Terminal,
    /// Display state
    pub display: Display,
    /// Input state
    pub input: InputState,
    /// Key bindings
    pub keytab: KeyTable,
    /// Document, highlighting, search and compile state
    pub session: Session,
    /// Minibuffer prompt state
    pub prompt: PromptState,
    /// Whether editor is running
    pub running: bool,
}

/// What action to perform when prompt completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    None,
    FindFile,
    WriteFile,
    LoadRules,
    Find,
    ReplaceOne,
    ReplaceAll,
    CompilerUrl,
    ConfirmQuit,
}

/// Minibuffer prompt state
#[derive(Debug, Clone)]
pub struct PromptState {
    /// Whether prompt is active
    pub active: bool,
    /// The prompt string (e.g., "Find file")
    pub prompt: String,
    /// Current input
    pub input: String,
    /// What to do when complete
    pub action: PromptAction,
    /// Default value (shown in prompt)
    pub default: Option<String>,
}

impl Default for PromptState {
    fn default() -> Self {
        Self {
            active: false,
            prompt: String::new(),
            input: String::new(),
            action: PromptAction::None,
            default: None,
        }
    }
}

impl EditorState {
    pub fn new(terminal: Terminal, session: Session) -> Self {
        Self {
            terminal,
            display: Display::new(),
            input: InputState::new(),
            keytab: KeyTable::with_defaults(),
            session,
            prompt: PromptState::default(),
            running: true,
        }
    }

    /// Main loop
    ///
    /// Sleeps until a key arrives, a highlight pass falls due or the
    /// compile poll interval passes, whichever comes first.
    pub fn run(&mut self) -> Result<()> {
        self.display.force_redraw();

        while self.running {
            self.display
                .render(&mut self.terminal, &self.session, &self.prompt)?;

            let key_event = self.terminal.next_key(self.wait_time())?;
            if let Some(event) = key_event {
                if let Some(key) = self.input.translate_key(event) {
                    self.handle_key(key)?;
                } else if self.input.is_ctlx_pending() {
                    self.display.set_message("C-x -");
                } else if self.input.is_meta_pending() {
                    self.display.set_message("ESC -");
                }
            }

            self.session.tick(Instant::now());
            if self.session.poll_compile() {
                self.display.force_redraw();
            }
        }

        self.session.shutdown();
        Ok(())
    }

    fn wait_time(&self) -> Duration {
        let mut wait = IDLE_WAIT;
        if self.session.is_compiling() {
            wait = wait.min(COMPILE_POLL);
        }
        if let Some(due) = self.session.time_until_pass(Instant::now()) {
            wait = wait.min(due);
        }
        wait
    }

    /// Quit the editor
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn force_redraw(&mut self) {
        self.display.force_redraw();
    }

    /// Show a failed operation without leaving the editor
    pub fn report_error(&mut self, err: &EditorError) {
        tracing::warn!(%err, "command failed");
        self.session.set_status(format!("Error: {}", err));
        self.display.set_message(err.to_string());
    }

    fn handle_key(&mut self, key: Key) -> Result<()> {
        if self.prompt.active {
            return self.handle_prompt_key(key);
        }

        if self.session.notice().is_some() {
            self.session.dismiss_notice();
            self.display.force_redraw();
        }
        self.display.clear_message();

        if let Some(cmd) = self.keytab.lookup(key) {
            match cmd(self)? {
                CommandStatus::Success => {}
                CommandStatus::Failure => {
                    self.terminal.beep()?;
                }
                CommandStatus::Abort => {
                    self.display.set_message("Quit");
                    self.terminal.beep()?;
                }
            }
        } else if key.is_self_insert() {
            if let Some(ch) = key.base_char() {
                self.session.insert_char(ch);
            }
        } else {
            self.terminal.beep()?;
            self.display
                .set_message(format!("Key not bound: {}", key.display_name()));
        }

        Ok(())
    }

    /// Start a minibuffer prompt
    pub fn start_prompt(&mut self, prompt: &str, action: PromptAction, default: Option<String>) {
        self.prompt.active = true;
        self.prompt.prompt = prompt.to_string();
        self.prompt.input.clear();
        self.prompt.action = action;
        self.prompt.default = default;
    }

    /// Handle key press during prompt mode
    fn handle_prompt_key(&mut self, key: Key) -> Result<()> {
        // C-g aborts
        if key == Key::ctrl('g') {
            self.prompt.active = false;
            self.prompt.action = PromptAction::None;
            self.display.set_message("Quit");
            return Ok(());
        }

        // Enter completes
        if key == Key::ctrl('m') {
            let input = if self.prompt.input.is_empty() {
                self.prompt.default.clone().unwrap_or_default()
            } else {
                self.prompt.input.clone()
            };
            let action = self.prompt.action;
            self.prompt.active = false;
            self.prompt.action = PromptAction::None;
            self.display.clear_message();
            return self.complete_prompt(action, input);
        }

        if key == Key::BACKSPACE || key == Key::ctrl('h') {
            self.prompt.input.pop();
            return Ok(());
        }

        if key.is_self_insert() {
            if let Some(ch) = key.base_char() {
                self.prompt.input.push(ch);
            }
            return Ok(());
        }

        self.terminal.beep()
    }

    /// Complete a prompt action
    fn complete_prompt(&mut self, action: PromptAction, input: String) -> Result<()> {
        match action {
            PromptAction::None => {}
            PromptAction::FindFile => {
                if input.is_empty() {
                    self.display.set_message("No file name");
                    return Ok(());
                }
                let path = PathBuf::from(&input);
                match self.session.open(&path) {
                    Ok(()) => {}
                    Err(EditorError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                        self.session.open_new(&path);
                    }
                    Err(e) => self.report_error(&e),
                }
                self.display.force_redraw();
            }
            PromptAction::WriteFile => {
                if input.is_empty() {
                    self.display.set_message("No file name");
                    return Ok(());
                }
                if let Err(e) = self.session.save_as(PathBuf::from(input)) {
                    self.report_error(&e);
                }
            }
            PromptAction::LoadRules => {
                if input.is_empty() {
                    return Ok(());
                }
                if let Err(e) = self.session.load_rules(&PathBuf::from(input)) {
                    self.report_error(&e);
                }
            }
            PromptAction::Find => {
                let current = &self.session.find().query;
                let query = Query::new(input, current.case_sensitive, current.whole_word);
                if self.session.set_query(query) == 0 {
                    self.terminal.beep()?;
                }
            }
            PromptAction::ReplaceOne => {
                self.session.set_replacement(input);
                if !self.session.replace_current() {
                    self.terminal.beep()?;
                }
            }
            PromptAction::ReplaceAll => {
                self.session.set_replacement(input);
                if self.session.replace_all() == 0 {
                    self.terminal.beep()?;
                }
            }
            PromptAction::CompilerUrl => {
                self.session.set_compiler_url(&input);
            }
            PromptAction::ConfirmQuit => {
                if input.trim().eq_ignore_ascii_case("y") || input.trim().eq_ignore_ascii_case("yes") {
                    self.quit();
                }
            }
        }
        Ok(())
    }
}

//! Editing session: everything the editor knows apart from the screen
//!
//! A session owns the document and the machinery around it: undo history,
//! the active rule set and its tokenizer, find/replace state, the
//! highlight debouncer, the compile gateway and the settings. The terminal
//! front end forwards commands here and asks for decorations when drawing.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::compile::{CompileBackend, CompileGateway, CompileOutcome, CompileRequest, Diagnostic, HttpCompiler};
use crate::config::{Config, ThemeMode};
use crate::debounce::Debouncer;
use crate::decorate::Decoration;
use crate::document::Document;
use crate::error::Result;
use crate::history::History;
use crate::search::{Matcher, Query};
use crate::syntax::{self, ActiveRules, OverlapMode, Palette, Span, Tokenizer};

/// Find bar contents
#[derive(Debug, Clone, Default)]
pub struct FindState {
    pub visible: bool,
    pub query: Query,
    pub replacement: String,
}

/// The editing session
pub struct Session {
    document: Document,
    history: History,
    rules: ActiveRules,
    tokenizer: Tokenizer,
    spans: Vec<Span>,
    find: FindState,
    matcher: Matcher,
    debouncer: Debouncer,
    gateway: CompileGateway,
    diagnostics: Vec<Diagnostic>,
    /// Multi-line text to show once (compiler output, diagnostics)
    notice: Option<String>,
    status: String,
    config: Config,
    /// Where settings are persisted; `None` keeps them in memory
    config_path: Option<PathBuf>,
}

impl Session {
    /// Session talking to the compile service named in `config`
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let backend = Arc::new(HttpCompiler::new(config.compiler_url.clone()));
        Self::with_backend(config, config_path, backend)
    }

    /// Session with an explicit compile backend
    pub fn with_backend(
        config: Config,
        config_path: Option<PathBuf>,
        backend: Arc<dyn CompileBackend>,
    ) -> Self {
        let rules = ActiveRules::default();
        let tokenizer = Tokenizer::new(rules.rules(), config.overlap);
        let mut session = Self {
            document: Document::new(),
            history: History::new(),
            rules,
            tokenizer,
            spans: Vec::new(),
            find: FindState::default(),
            matcher: Matcher::new(),
            debouncer: Debouncer::new(config.debounce_ms),
            gateway: CompileGateway::new(backend),
            diagnostics: Vec::new(),
            notice: None,
            status: "Ready".to_string(),
            config,
            config_path,
        };
        session.run_pass();
        session
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rules(&self) -> &ActiveRules {
        &self.rules
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn find(&self) -> &FindState {
        &self.find
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Take the pending notice, if any
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// `lexpad - <file>  [Lang: <rules>]`
    pub fn title(&self) -> String {
        format!(
            "lexpad - {}  [Lang: {}]",
            self.document.display_name(),
            self.rules.name()
        )
    }

    /// `Status: <msg> | Words: N  Chars: M`
    pub fn status_line(&self) -> String {
        format!(
            "Status: {} | Words: {}  Chars: {}",
            self.status,
            self.document.word_count(),
            self.document.char_count()
        )
    }

    // Editing

    /// Run a mutation against the document, recording history if it changed
    fn edit(&mut self, apply: impl FnOnce(&mut Document) -> bool) -> bool {
        let before = self.document.text().to_string();
        if !apply(&mut self.document) {
            return false;
        }
        if self.document.text() != before {
            self.history.push(before);
            self.text_changed();
        }
        true
    }

    pub fn insert_char(&mut self, ch: char) {
        self.edit(|doc| {
            doc.insert_char(ch);
            true
        });
    }

    pub fn newline(&mut self) {
        self.edit(|doc| {
            doc.newline();
            true
        });
    }

    pub fn backspace(&mut self) -> bool {
        self.edit(Document::backspace)
    }

    pub fn delete(&mut self) -> bool {
        self.edit(Document::delete)
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.document.text()) {
            Some(previous) => {
                self.document.replace_text(previous);
                self.text_changed();
                self.status = "Undo".to_string();
                true
            }
            None => {
                self.status = "Nothing to undo".to_string();
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.document.text()) {
            Some(next) => {
                self.document.replace_text(next);
                self.text_changed();
                self.status = "Redo".to_string();
                true
            }
            None => {
                self.status = "Nothing to redo".to_string();
                false
            }
        }
    }

    fn text_changed(&mut self) {
        self.debouncer.schedule(Instant::now());
    }

    // Documents

    /// Start over with an empty, untitled document
    pub fn new_document(&mut self) {
        self.replace_document(Document::new());
        self.status = "New document".to_string();
    }

    /// Replace the document with the contents of `path`
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let document = Document::from_file(path)?;
        let name = document.display_name();
        self.replace_document(document);
        self.status = format!("Opened {}", name);
        Ok(())
    }

    /// Start a new document that will be saved to `path`
    pub fn open_new(&mut self, path: &Path) {
        let mut document = Document::new();
        document.set_path(path.to_path_buf());
        let name = document.display_name();
        self.replace_document(document);
        self.status = format!("(New file) {}", name);
    }

    fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.history.reset();
        self.set_rules(ActiveRules::BuiltIn);
        self.find.visible = false;
        self.matcher.clear();
        self.diagnostics.clear();
        self.notice = None;
        self.gateway.cancel();
        self.debouncer.cancel();
        self.run_pass();
    }

    pub fn save(&mut self) -> Result<()> {
        self.document.save()?;
        self.status = format!("Saved {}", self.document.display_name());
        Ok(())
    }

    pub fn save_as(&mut self, path: PathBuf) -> Result<()> {
        self.document.save_as(path)?;
        self.status = format!("Saved {}", self.document.display_name());
        Ok(())
    }

    // Rule sets

    /// Load a rule set file; on failure the active rules stay as they were
    pub fn load_rules(&mut self, path: &Path) -> Result<()> {
        let rules = syntax::load_file(path)?;
        self.status = format!("Loaded language: {}", rules.name());
        self.set_rules(ActiveRules::Loaded(rules));
        self.run_pass();
        Ok(())
    }

    pub fn use_builtin_rules(&mut self) {
        self.set_rules(ActiveRules::BuiltIn);
        self.run_pass();
        self.status = format!("Language: {}", self.rules.name());
    }

    fn set_rules(&mut self, rules: ActiveRules) {
        self.tokenizer = Tokenizer::new(rules.rules(), self.config.overlap);
        self.rules = rules;
    }

    pub fn set_overlap(&mut self, mode: OverlapMode) {
        self.config.overlap = mode;
        self.tokenizer = Tokenizer::new(self.rules.rules(), mode);
        self.run_pass();
        self.status = format!("Overlap: {}", mode.name());
    }

    // Highlight passes

    /// How long the event loop may sleep before a pass is due
    pub fn time_until_pass(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_due(now)
    }

    /// Run the pending pass if it is due; true if one ran
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.debouncer.take_ready(now).is_some() {
            self.run_pass();
            true
        } else {
            false
        }
    }

    /// Re-tokenize and re-search the current text right away
    pub fn run_pass(&mut self) {
        let snapshot = self.document.text();
        self.spans = self.tokenizer.tokenize(snapshot);
        if self.find.visible && !self.find.query.is_empty() {
            self.matcher.search(snapshot, &self.find.query);
        }
    }

    // Find and replace

    pub fn show_find(&mut self, visible: bool) {
        self.find.visible = visible;
        if !visible {
            self.matcher.clear();
        }
    }

    /// Search for `query`, moving the cursor to the first match
    pub fn set_query(&mut self, query: Query) -> usize {
        self.find.visible = true;
        self.find.query = query;
        self.research()
    }

    pub fn toggle_case_sensitive(&mut self) -> usize {
        self.find.query.case_sensitive = !self.find.query.case_sensitive;
        self.research()
    }

    pub fn toggle_whole_word(&mut self) -> usize {
        self.find.query.whole_word = !self.find.query.whole_word;
        self.research()
    }

    pub fn set_replacement(&mut self, replacement: impl Into<String>) {
        self.find.replacement = replacement.into();
    }

    fn research(&mut self) -> usize {
        if self.find.query.is_empty() {
            self.matcher.clear();
            self.status = "Empty search".to_string();
            return 0;
        }
        let count = self.matcher.search(self.document.text(), &self.find.query);
        self.status = match count {
            0 => format!("Not found: {}", self.find.query.text),
            n => format!("{} matches", n),
        };
        self.jump_to_current();
        count
    }

    /// Step through matches; negative steps go backward
    pub fn find_step(&mut self, step: isize) -> bool {
        if self.matcher.advance(step).is_none() {
            self.status = "No matches".to_string();
            return false;
        }
        if let Some(index) = self.matcher.current_index() {
            self.status = format!("Match {} of {}", index + 1, self.matcher.count());
        }
        self.jump_to_current();
        true
    }

    fn jump_to_current(&mut self) {
        if let Some(current) = self.matcher.current() {
            self.document.set_cursor(current.start);
        }
    }

    /// Match ranges still describe the text as of the last pass; bring them
    /// up to date before a replacement uses them
    fn sync_matches(&mut self) {
        if self.debouncer.is_pending() {
            self.matcher.refresh(self.document.text(), &self.find.query);
        }
    }

    /// Replace the current match with the replacement text
    pub fn replace_current(&mut self) -> bool {
        self.sync_matches();
        let replacement = self.find.replacement.clone();
        let before = self.document.text().to_string();
        match self.matcher.replace_current(&before, &replacement) {
            Some((text, range)) => {
                self.history.push(before);
                self.document.replace_text(text);
                self.document.set_cursor(range.end);
                self.matcher.search(self.document.text(), &self.find.query);
                self.status = format!("Replaced; {} matches left", self.matcher.count());
                self.spans = self.tokenizer.tokenize(self.document.text());
                true
            }
            None => {
                self.status = "Nothing to replace".to_string();
                false
            }
        }
    }

    /// Replace every match in one undoable step
    pub fn replace_all(&mut self) -> usize {
        self.sync_matches();
        let replacement = self.find.replacement.clone();
        let before = self.document.text().to_string();
        match self.matcher.replace_all(&before, &replacement) {
            Some((text, count)) => {
                self.history.push(before);
                self.document.replace_text(text);
                self.run_pass();
                self.status = format!("Replaced {} occurrences", count);
                count
            }
            None => {
                self.status = "Nothing to replace".to_string();
                0
            }
        }
    }

    // Compilation

    pub fn compile(&mut self) -> u64 {
        let request = CompileRequest::new(
            self.document.file_name().as_deref(),
            self.rules.language_tag(),
            self.document.text(),
        );
        self.status = "Compiling...".to_string();
        self.gateway.submit(request)
    }

    pub fn is_compiling(&self) -> bool {
        self.gateway.is_busy()
    }

    /// Apply a finished compile, if one has arrived; true if state changed
    pub fn poll_compile(&mut self) -> bool {
        match self.gateway.poll() {
            Some(outcome) => {
                self.apply_compile(outcome);
                true
            }
            None => false,
        }
    }

    /// Block up to `timeout` for the current compile
    pub fn wait_compile(&mut self, timeout: Duration) -> bool {
        match self.gateway.wait(timeout) {
            Some(outcome) => {
                self.apply_compile(outcome);
                true
            }
            None => false,
        }
    }

    fn apply_compile(&mut self, outcome: CompileOutcome) {
        match outcome.result {
            Ok(response) if response.success => {
                self.diagnostics.clear();
                self.status = "Compiled successfully".to_string();
                if !response.output.is_empty() {
                    self.notice = Some(response.output);
                }
            }
            Ok(response) => {
                self.status = format!("Compilation failed ({} errors)", response.errors.len());
                let summary = response.summary();
                self.notice = if summary.is_empty() {
                    Some(response.output)
                } else {
                    Some(summary)
                };
                self.diagnostics = response.errors;
            }
            Err(err) => {
                self.diagnostics.clear();
                self.status = "Compile error".to_string();
                self.notice = Some(format!("Compile error: {}", err));
            }
        }
    }

    // Settings

    pub fn set_compiler_url(&mut self, url: &str) {
        let url = url.trim();
        if url.is_empty() {
            self.status = "Compiler URL unchanged".to_string();
            return;
        }
        self.config.compiler_url = url.to_string();
        self.gateway.set_backend(Arc::new(HttpCompiler::new(url)));
        self.status = format!("Compiler: {}", url);
        self.persist();
    }

    pub fn cycle_theme(&mut self) -> ThemeMode {
        self.config.theme = self.config.theme.next();
        self.status = format!("Theme: {}", self.config.theme.name());
        self.persist();
        self.config.theme
    }

    pub fn toggle_line_numbers(&mut self) -> bool {
        self.config.show_line_numbers = !self.config.show_line_numbers;
        self.persist();
        self.config.show_line_numbers
    }

    fn persist(&mut self) {
        if let Some(path) = &self.config_path {
            if let Err(err) = self.config.save_to(path) {
                tracing::warn!(%err, "cannot save config");
                self.status = format!("Cannot save settings: {}", err);
            }
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.config.theme)
    }

    // Drawing

    /// Every decoration to paint, lowest layer first
    ///
    /// Ranges come from the last pass and may be stale relative to the
    /// text; the painter checks each one.
    pub fn decorations(&self, palette: &Palette) -> Vec<Decoration> {
        let text = self.document.text();
        let mut decorations: Vec<Decoration> = self
            .spans
            .iter()
            .map(|span| Decoration::new(span.range(), span.category.style(palette)))
            .collect();
        decorations.extend(
            self.matcher
                .matches()
                .iter()
                .map(|m| Decoration::new(m.range(), palette.search_match)),
        );
        if let Some(current) = self.matcher.current() {
            decorations.push(Decoration::new(current.range(), palette.current_match));
        }
        decorations.extend(
            self.diagnostics
                .iter()
                .map(|d| Decoration::new(d.line_range(text), palette.diagnostic)),
        );
        decorations
    }

    /// Stop background work before exit
    pub fn shutdown(&mut self) {
        self.gateway.cancel();
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::CompileResponse;
    use crate::error::CompileError;
    use crate::syntax::Category;

    /// Answers every request with a fixed response
    struct CannedBackend(CompileResponse);

    impl CompileBackend for CannedBackend {
        fn compile(&self, _request: &CompileRequest) -> std::result::Result<CompileResponse, CompileError> {
            Ok(self.0.clone())
        }
    }

    struct DownBackend;

    impl CompileBackend for DownBackend {
        fn compile(&self, _request: &CompileRequest) -> std::result::Result<CompileResponse, CompileError> {
            Err(CompileError::Timeout)
        }
    }

    fn session() -> Session {
        session_with(Arc::new(CannedBackend(CompileResponse::default())))
    }

    fn session_with(backend: Arc<dyn CompileBackend>) -> Session {
        Session::with_backend(Config::default(), None, backend)
    }

    fn type_text(session: &mut Session, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                session.newline();
            } else {
                session.insert_char(ch);
            }
        }
    }

    #[test]
    fn test_title_and_status_line() {
        let mut session = session();
        type_text(&mut session, "val x");
        assert_eq!(session.title(), "lexpad - untitled.txt  [Lang: Kotlin]");
        assert_eq!(session.status_line(), "Status: Ready | Words: 2  Chars: 5");
    }

    #[test]
    fn test_edits_are_undoable() {
        let mut session = session();
        type_text(&mut session, "ab");
        assert!(session.backspace());
        assert_eq!(session.document().text(), "a");

        assert!(session.undo());
        assert_eq!(session.document().text(), "ab");
        assert!(session.undo());
        assert!(session.undo());
        assert_eq!(session.document().text(), "");
        assert!(!session.undo());
        assert_eq!(session.status(), "Nothing to undo");

        assert!(session.redo());
        assert_eq!(session.document().text(), "a");
    }

    #[test]
    fn test_no_op_edit_leaves_history_alone() {
        let mut session = session();
        assert!(!session.backspace());
        assert!(!session.delete());
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_highlighting_is_debounced() {
        let mut session = session();
        type_text(&mut session, "val");
        assert!(session.spans().is_empty());

        let now = Instant::now();
        assert!(session.time_until_pass(now).is_some());
        assert!(!session.tick(now));
        assert!(session.tick(now + Duration::from_secs(1)));
        assert_eq!(session.spans(), &[Span::new(Category::Keyword, 0, 3)]);
        assert!(session.time_until_pass(now).is_none());
    }

    #[test]
    fn test_stale_spans_are_skipped_when_painting() {
        let mut session = session();
        type_text(&mut session, "val x = 1 // long comment");
        session.run_pass();
        while session.backspace() {}

        let palette = session.palette();
        let text = session.document().text();
        let mut map = crate::decorate::StyleMap::new(text, 0..text.len());
        let report = map.paint(session.decorations(&palette));
        assert_eq!(report.applied, 0);
        assert_eq!(report.failed, 2);
    }

    #[test]
    fn test_find_and_replace() {
        let mut session = session();
        type_text(&mut session, "cat concat cat");
        assert_eq!(session.set_query(Query::new("cat", true, true)), 2);
        assert_eq!(session.document().cursor(), 0);
        assert!(session.find_step(1));
        assert_eq!(session.document().cursor(), 11);
        assert_eq!(session.status(), "Match 2 of 2");

        session.set_replacement("dog");
        assert!(session.replace_current());
        assert_eq!(session.document().text(), "cat concat dog");
        assert_eq!(session.matcher().count(), 1);

        assert_eq!(session.replace_all(), 1);
        assert_eq!(session.document().text(), "dog concat dog");

        // Each replacement is one undo step
        session.undo();
        assert_eq!(session.document().text(), "cat concat dog");
        session.undo();
        assert_eq!(session.document().text(), "cat concat cat");
    }

    #[test]
    fn test_replace_after_edit_uses_current_text() {
        let mut session = session();
        type_text(&mut session, "foo bar");
        session.run_pass();
        assert_eq!(session.set_query(Query::new("foo", true, false)), 1);
        assert_eq!(session.document().cursor(), 0);

        // Shifts the match before any pass has run
        type_text(&mut session, "XY");
        session.set_replacement("ZZZ");
        assert!(session.replace_current());
        assert_eq!(session.document().text(), "XYZZZ bar");

        assert_eq!(session.set_query(Query::new("Z", true, false)), 3);
        assert_eq!(session.document().cursor(), 2);
        type_text(&mut session, "Z");
        session.set_replacement("-");
        assert_eq!(session.replace_all(), 4);
        assert_eq!(session.document().text(), "XY---- bar");
    }

    #[test]
    fn test_search_toggles() {
        let mut session = session();
        type_text(&mut session, "Cat cat");
        assert_eq!(session.set_query(Query::new("cat", true, false)), 1);
        assert_eq!(session.toggle_case_sensitive(), 2);
        assert_eq!(session.set_query(Query::new("", false, false)), 0);
        assert_eq!(session.status(), "Empty search");
    }

    #[test]
    fn test_open_resets_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.kt");
        std::fs::write(&path, "fun main() {}").unwrap();
        let rules_path = dir.path().join("rules.json");
        std::fs::write(&rules_path, r#"{"name": "Mini", "keywords": ["let"]}"#).unwrap();

        let mut session = session();
        type_text(&mut session, "edit");
        session.load_rules(&rules_path).unwrap();
        assert_eq!(session.rules().name(), "Mini");
        session.set_query(Query::new("e", true, false));

        session.open(&path).unwrap();
        assert_eq!(session.document().text(), "fun main() {}");
        assert!(!session.history().can_undo());
        assert_eq!(*session.rules(), ActiveRules::BuiltIn);
        assert_eq!(session.matcher().count(), 0);
        assert_eq!(session.spans(), &[Span::new(Category::Keyword, 0, 3)]);
        assert_eq!(session.title(), "lexpad - notes.kt  [Lang: Kotlin]");
    }

    #[test]
    fn test_failed_rule_load_keeps_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut session = session();
        assert!(session.load_rules(&path).is_err());
        assert_eq!(*session.rules(), ActiveRules::BuiltIn);
        assert!(session.load_rules(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_failed_compile_sets_diagnostics() {
        let response = CompileResponse {
            success: false,
            output: String::new(),
            errors: vec![Diagnostic {
                line: 2,
                col: 1,
                message: "Unresolved reference".to_string(),
            }],
        };
        let mut session = session_with(Arc::new(CannedBackend(response)));
        type_text(&mut session, "fun main() {\n  foo()\n}");
        session.compile();
        assert!(session.wait_compile(Duration::from_secs(5)));

        assert_eq!(session.status(), "Compilation failed (1 errors)");
        assert_eq!(session.diagnostics().len(), 1);
        assert_eq!(session.take_notice().as_deref(), Some("Ln 2: Unresolved reference"));

        let palette = session.palette();
        let decorations = session.decorations(&palette);
        let last = decorations.last().unwrap();
        assert_eq!(last.range, 13..20);
        assert_eq!(last.style, palette.diagnostic);
    }

    #[test]
    fn test_successful_compile_clears_diagnostics() {
        let response = CompileResponse {
            success: true,
            output: "Hello".to_string(),
            errors: Vec::new(),
        };
        let mut session = session_with(Arc::new(CannedBackend(response)));
        session.compile();
        assert!(session.wait_compile(Duration::from_secs(5)));
        assert_eq!(session.status(), "Compiled successfully");
        assert!(session.diagnostics().is_empty());
        assert_eq!(session.notice(), Some("Hello"));
    }

    #[test]
    fn test_compile_failure_is_not_fatal() {
        let mut session = session_with(Arc::new(DownBackend));
        session.compile();
        assert!(session.wait_compile(Duration::from_secs(5)));
        assert_eq!(session.status(), "Compile error");
        assert_eq!(session.notice(), Some("Compile error: request timed out"));
    }

    #[test]
    fn test_new_document_discards_pending_compile() {
        let mut session = session();
        session.compile();
        session.new_document();
        assert!(!session.is_compiling());
        assert!(!session.wait_compile(Duration::from_millis(50)));
        assert_eq!(session.status(), "New document");
    }

    #[test]
    fn test_settings_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexpad.toml");
        let mut session = Session::with_backend(
            Config::default(),
            Some(path.clone()),
            Arc::new(DownBackend),
        );
        assert_eq!(session.cycle_theme(), ThemeMode::Light);
        session.set_compiler_url("http://10.1.1.1:8123/compile");

        let saved = Config::load_from(&path);
        assert_eq!(saved.theme, ThemeMode::Light);
        assert_eq!(saved.compiler_url, "http://10.1.1.1:8123/compile");
    }

    #[test]
    fn test_overlap_mode_switch() {
        let mut session = session();
        type_text(&mut session, "\"a // b\"");
        session.set_overlap(OverlapMode::Layered);
        assert_eq!(session.spans().len(), 2);
        session.set_overlap(OverlapMode::Exclusive);
        assert_eq!(session.spans(), &[Span::new(Category::StringLiteral, 0, 8)]);
    }
}

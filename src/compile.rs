//! Remote compilation
//!
//! The buffer is posted as JSON to a compile service; the reply carries the
//! compiler output and a list of diagnostics. Requests run on a worker
//! thread so the editor never blocks on the network. Each request gets a
//! ticket, and only the result for the newest ticket is ever delivered.

use std::io;
use std::ops::Range;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// Default compile service endpoint
pub const DEFAULT_COMPILER_URL: &str = "http://127.0.0.1:8123/compile";

/// File name sent for untitled buffers
pub const UNTITLED_SOURCE_NAME: &str = "Main.kt";

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const READ_TIMEOUT: Duration = Duration::from_secs(20);

/// Diagnostics listed individually in the summary
const SUMMARY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileRequest {
    pub filename: String,
    pub language: String,
    pub source: String,
}

impl CompileRequest {
    pub fn new(filename: Option<&str>, language: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            filename: filename.unwrap_or(UNTITLED_SOURCE_NAME).to_string(),
            language: language.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Diagnostic {
    /// 1-based line; out-of-range values are clamped when decorating
    pub line: i64,
    pub col: i64,
    pub message: String,
}

impl Default for Diagnostic {
    fn default() -> Self {
        Self {
            line: 1,
            col: 1,
            message: "Error".to_string(),
        }
    }
}

impl Diagnostic {
    /// Byte range of the whole line this diagnostic points at
    ///
    /// The line number is clamped into `1..=line_count`, so the result is
    /// always a valid range of `text` (possibly empty).
    pub fn line_range(&self, text: &str) -> Range<usize> {
        let line_count = text.split('\n').count() as i64;
        let target = self.line.clamp(1, line_count) as usize - 1;

        let mut start = 0;
        for (index, line) in text.split('\n').enumerate() {
            let end = start + line.len();
            if index == target {
                let end = if line.ends_with('\r') { end - 1 } else { end };
                return start..end;
            }
            start = end + 1;
        }
        text.len()..text.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct CompileResponse {
    pub success: bool,
    pub output: String,
    pub errors: Vec<Diagnostic>,
}

impl CompileResponse {
    /// Parse a response body, whatever the HTTP status was
    pub fn from_body(body: &str) -> Result<Self, CompileError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Short listing of the diagnostics: the first few as `Ln N: message`,
    /// then a count of the rest
    pub fn summary(&self) -> String {
        let mut lines: Vec<String> = self
            .errors
            .iter()
            .take(SUMMARY_LIMIT)
            .map(|d| format!("Ln {}: {}", d.line, d.message))
            .collect();
        if self.errors.len() > SUMMARY_LIMIT {
            lines.push(format!("…+{} more", self.errors.len() - SUMMARY_LIMIT));
        }
        lines.join("\n")
    }
}

/// Something that can turn a request into a response
pub trait CompileBackend: Send + Sync {
    fn compile(&self, request: &CompileRequest) -> Result<CompileResponse, CompileError>;
}

/// The HTTP compile service
pub struct HttpCompiler {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpCompiler {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .build();
        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }
}

impl CompileBackend for HttpCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<CompileResponse, CompileError> {
        let payload = serde_json::to_string(request)?;
        let response = match self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_string(&payload)
        {
            Ok(response) => response,
            // Error statuses still carry a JSON body
            Err(ureq::Error::Status(code, response)) => {
                tracing::debug!(code, "compile service returned error status");
                response
            }
            Err(ureq::Error::Transport(transport)) => return Err(transport_error(transport)),
        };
        let body = response.into_string()?;
        CompileResponse::from_body(&body)
    }
}

fn transport_error(transport: ureq::Transport) -> CompileError {
    let timed_out = std::error::Error::source(&transport)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .map_or(false, |err| {
            matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
        });
    if timed_out {
        CompileError::Timeout
    } else {
        CompileError::Transport(transport.to_string())
    }
}

/// A finished request
#[derive(Debug)]
pub struct CompileOutcome {
    pub ticket: u64,
    pub result: Result<CompileResponse, CompileError>,
}

/// Runs compile requests off the event loop
///
/// At most one request is current. Submitting a new one, or calling
/// [`CompileGateway::cancel`], supersedes it; a superseded request still
/// runs to completion on its worker but its result is dropped.
pub struct CompileGateway {
    backend: Arc<dyn CompileBackend>,
    sender: Sender<CompileOutcome>,
    receiver: Receiver<CompileOutcome>,
    current: Option<u64>,
    next_ticket: u64,
}

impl CompileGateway {
    pub fn new(backend: Arc<dyn CompileBackend>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            backend,
            sender,
            receiver,
            current: None,
            next_ticket: 0,
        }
    }

    /// Swap the backend; any in-flight request is superseded
    pub fn set_backend(&mut self, backend: Arc<dyn CompileBackend>) {
        self.cancel();
        self.backend = backend;
    }

    /// Start a request and return its ticket
    pub fn submit(&mut self, request: CompileRequest) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        if let Some(old) = self.current.replace(ticket) {
            tracing::debug!(superseded = old, ticket, "compile request superseded");
        }

        let backend = Arc::clone(&self.backend);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let result = backend.compile(&request);
            if let Err(err) = &result {
                tracing::warn!(ticket, %err, "compile request failed");
            }
            // The gateway may be gone by now
            let _ = sender.send(CompileOutcome { ticket, result });
        });
        ticket
    }

    /// Forget the current request
    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Whether a request is outstanding
    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    /// Take the current request's result if it has arrived
    ///
    /// Stale results found along the way are discarded.
    pub fn poll(&mut self) -> Option<CompileOutcome> {
        loop {
            match self.receiver.try_recv() {
                Ok(outcome) => {
                    if let Some(outcome) = self.accept(outcome) {
                        return Some(outcome);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Block until the current request finishes or `timeout` elapses
    pub fn wait(&mut self, timeout: Duration) -> Option<CompileOutcome> {
        let deadline = Instant::now() + timeout;
        while self.current.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(outcome) => {
                    if let Some(outcome) = self.accept(outcome) {
                        return Some(outcome);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
        None
    }

    fn accept(&mut self, outcome: CompileOutcome) -> Option<CompileOutcome> {
        if self.current == Some(outcome.ticket) {
            self.current = None;
            Some(outcome)
        } else {
            tracing::debug!(ticket = outcome.ticket, "discarding stale compile result");
            None
        }
    }
}

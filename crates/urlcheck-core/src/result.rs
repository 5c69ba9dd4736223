//! Check results and the sink that displays them.

use std::io::Write;

use serde::{Deserialize, Serialize};

/// Result of checking one URL, as returned by the backend:
/// `{ url, exists, file, folder, error }`. An empty `error` means success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub url: String,
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub file: bool,
    #[serde(default)]
    pub folder: bool,
    #[serde(default)]
    pub error: String,
}

impl CheckResult {
    /// Error-shaped result: `{ url, error }` with every flag false.
    pub fn error(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            error: message.into(),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// One-line text form shown to the user.
    pub fn summary(&self) -> String {
        if self.is_error() {
            format!("API Error: {} ... URL: {}", self.error, self.url)
        } else {
            format!(
                "Exists: {},  File: {},  Folder: {},  URL: {}",
                self.exists, self.file, self.folder, self.url
            )
        }
    }
}

/// Where results and notices end up.
///
/// `notify` and `clear_notice` drive the single-line message area (validation
/// errors, throttle warnings); `render` replaces the result area.
pub trait ResultSink {
    fn render(&mut self, result: &CheckResult);
    fn notify(&mut self, message: &str);
    fn clear_notice(&mut self);

    /// Ask for the next input; `input_enabled` mirrors the input gate.
    fn prompt(&mut self, _input_enabled: bool) {}
}

/// Sink that prints to a writer (stdout for the CLI).
pub struct WriterSink<W: Write> {
    out: W,
    notice_shown: bool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            notice_shown: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        // Output is best effort; a closed stdout must not abort the session.
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write> ResultSink for WriterSink<W> {
    fn render(&mut self, result: &CheckResult) {
        let text = result.summary();
        self.line(&text);
    }

    fn notify(&mut self, message: &str) {
        self.notice_shown = true;
        self.line(message);
    }

    fn clear_notice(&mut self) {
        // A terminal cannot un-print; only announce the end of a notice.
        if std::mem::take(&mut self.notice_shown) {
            self.line("");
        }
    }

    fn prompt(&mut self, input_enabled: bool) {
        let text = if input_enabled { "url> " } else { "url (locked)> " };
        let _ = write!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

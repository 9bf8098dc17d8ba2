use std::io::{self, IsTerminal, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use itertools::Itertools;
use owo_colors::{OwoColorize, Style};

use crate::constants::DEFAULT_EXCERPT_LIMIT;
use crate::core::{
    domain::{BatchSummary, DifferentialMismatch, Tag, TestCase, Verdict},
    traits::reporter::Reporter,
};

const PADDING: &str = "      ";

/// Quotes `text` for display; text longer than `limit` characters is cut
/// down to `limit`, ellipsis included.
pub fn excerpt(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        format!("{:?}", text)
    } else {
        let cut: String = text.chars().take(limit.saturating_sub(3)).collect();
        format!("{:?}", cut + "...")
    }
}

/// Writes the human-readable report, with ANSI colours when enabled.
pub struct ConsoleReporter {
    out: Mutex<Box<dyn Write + Send>>,
    interactive: bool,
    colored: bool,
    excerpt_limit: usize,
}

impl ConsoleReporter {
    /// Reports to stdout; colours and interactivity follow whether stdout is a
    /// terminal.
    pub fn stdout() -> Self {
        let interactive = io::stdout().is_terminal();
        Self::with_writer(Box::new(io::stdout()), interactive, interactive)
    }

    pub fn with_writer(out: Box<dyn Write + Send>, interactive: bool, colored: bool) -> Self {
        Self {
            out: Mutex::new(out),
            interactive,
            colored,
            excerpt_limit: DEFAULT_EXCERPT_LIMIT,
        }
    }

    pub fn excerpt_limit(mut self, limit: usize) -> Self {
        self.excerpt_limit = limit;
        self
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.colored {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn passed(&self) -> String {
        self.paint("Passed", Style::new().green())
    }

    fn failed(&self) -> String {
        self.paint("Failed", Style::new().red())
    }

    fn tag(&self, tag: &Tag) -> String {
        let style = match tag {
            Tag::TimeLimit => Style::new().cyan(),
            Tag::MemoryLimit => Style::new().magenta(),
            Tag::KnownBug => Style::new().yellow(),
            Tag::Custom(_) => Style::new(),
        };
        self.paint(tag.label(), style)
    }

    /// ` {TL, ML}` or nothing for an untagged test.
    fn tag_suffix(&self, test: &TestCase) -> String {
        if test.tags().is_empty() {
            String::new()
        } else {
            format!(" {{{}}}", test.tags().iter().map(|t| self.tag(t)).join(", "))
        }
    }

    fn excerpt(&self, text: &str) -> String {
        excerpt(text, self.excerpt_limit)
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            tracing::warn!("Failed to write report: {}", e);
        }
    }
}

impl std::fmt::Debug for ConsoleReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleReporter")
            .field("interactive", &self.interactive)
            .field("colored", &self.colored)
            .field("excerpt_limit", &self.excerpt_limit)
            .finish_non_exhaustive()
    }
}

impl Reporter for ConsoleReporter {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn test_started(&self, test: &TestCase) {
        let mut text = format!("[Test #{}]{}\n", test.index(), self.tag_suffix(test));
        text += &format!("{PADDING}Input: {}\n", self.excerpt(test.input()));
        if let Some(expected) = test.expected_output() {
            text += &format!("{PADDING}Expected output: {}\n", self.excerpt(expected));
        }
        self.write(&text);
    }

    fn test_output(&self, _test: &TestCase, output: &str) {
        self.write(&format!("{PADDING}Output: {}\n", self.excerpt(output)));
    }

    fn test_verdict(&self, _test: &TestCase, verdict: &Verdict) {
        match verdict {
            Verdict::Passed => self.write(&format!("{PADDING}{}\n", self.passed())),
            Verdict::Failed(_) => self.write(&format!("{PADDING}{}\n", self.failed())),
            Verdict::Unjudged => {}
        }
    }

    fn test_timed_out(&self, _test: &TestCase, _limit: Duration) {
        self.write(&format!("{PADDING}{} by timeout\n", self.failed()));
    }

    fn batch_finished(&self, summary: &BatchSummary) {
        self.write(&format!(
            "{} tests run: {} passed, {} failed, {} timed out, {} unjudged\n",
            summary.total(),
            summary.passed,
            summary.failed,
            summary.timed_out,
            summary.unjudged
        ));
    }

    fn stress_progress(&self, count: u64, test: &TestCase) {
        self.write(&format!(
            "\rTest #{}:{} {}\x1b[0K",
            count,
            self.tag_suffix(test),
            self.excerpt(test.input())
        ));
    }

    fn stress_mismatch(&self, test: &TestCase, mismatch: &DifferentialMismatch) {
        self.write(&format!(
            "\n{}\n\nTest: {:?}\nTested algo output: {:?}\nTrivial algo output: {:?}\n",
            self.paint("Failed!", Style::new().red()),
            test.input(),
            mismatch.tested_output,
            mismatch.trivial_output
        ));
    }

    fn stress_timed_out(&self, test: &TestCase, limit: Duration) {
        self.write(&format!(
            "\n{} by timeout ({}s)\n\nTest: {:?}\n",
            self.failed(),
            limit.as_secs_f64(),
            test.input()
        ));
    }

    fn stress_finished(&self, count: u64) {
        self.write(&format!("\n{} tests passed, no difference spotted\n", count));
    }
}

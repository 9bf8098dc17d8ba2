use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out test indices. Every call to [`TestCounter::next`] yields a fresh,
/// strictly larger value, so an index is never reused even when the test that
/// received it is thrown away.
#[derive(Debug)]
pub struct TestCounter {
    last: AtomicU64,
}

impl TestCounter {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    pub fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Number of indices handed out so far.
    pub fn issued(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

impl Default for TestCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Display-only label attached to a test.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// Time-consuming test.
    TimeLimit,
    /// Memory-consuming test.
    MemoryLimit,
    /// Regression for a bug that was already caught once.
    KnownBug,
    Custom(String),
}

impl Tag {
    pub fn label(&self) -> &str {
        match self {
            Tag::TimeLimit => "TL",
            Tag::MemoryLimit => "ML",
            Tag::KnownBug => "BUG",
            Tag::Custom(label) => label,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for Tag {
    fn from(label: &str) -> Self {
        Tag::Custom(label.to_string())
    }
}

/// A single test: the input fed to the program and, optionally, the output it
/// must produce. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    index: u64,
    input: String,
    expected_output: Option<String>,
    tags: BTreeSet<Tag>,
    whitespace_insensitive: bool,
}

impl TestCase {
    pub fn builder(input: impl Into<String>) -> TestCaseBuilder {
        TestCaseBuilder {
            input: input.into(),
            expected_output: None,
            tags: BTreeSet::new(),
            whitespace_insensitive: true,
        }
    }

    /// Shorthand for a test with an expected output and default settings.
    pub fn new(
        counter: &TestCounter,
        input: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::builder(input).expected(expected).build(counter)
    }

    /// Shorthand for a run-only test.
    pub fn unjudged(counter: &TestCounter, input: impl Into<String>) -> Self {
        Self::builder(input).build(counter)
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn expected_output(&self) -> Option<&str> {
        self.expected_output.as_deref()
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn whitespace_insensitive(&self) -> bool {
        self.whitespace_insensitive
    }

    /// Applies the whitespace policy of this test to an output.
    pub fn normalize<'a>(&self, output: &'a str) -> &'a str {
        if self.whitespace_insensitive {
            output.trim()
        } else {
            output
        }
    }
}

#[derive(Clone, Debug)]
pub struct TestCaseBuilder {
    input: String,
    expected_output: Option<String>,
    tags: BTreeSet<Tag>,
    whitespace_insensitive: bool,
}

impl TestCaseBuilder {
    pub fn expected(mut self, output: impl Into<String>) -> Self {
        self.expected_output = Some(output.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<Tag>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Compare outputs byte for byte, without stripping marginal whitespace.
    pub fn whitespace_sensitive(mut self) -> Self {
        self.whitespace_insensitive = false;
        self
    }

    pub fn build(self, counter: &TestCounter) -> TestCase {
        TestCase {
            index: counter.next(),
            input: self.input,
            expected_output: self.expected_output,
            tags: self.tags,
            whitespace_insensitive: self.whitespace_insensitive,
        }
    }
}

/// What a stress producer may yield: a bare input or a fully built test.
#[derive(Clone, Debug)]
pub enum Produced {
    Raw(String),
    Case(TestCase),
}

impl Produced {
    pub fn into_case(self, counter: &TestCounter) -> TestCase {
        match self {
            Produced::Raw(input) => TestCase::unjudged(counter, input),
            Produced::Case(test) => test,
        }
    }
}

impl From<String> for Produced {
    fn from(input: String) -> Self {
        Produced::Raw(input)
    }
}

impl From<&str> for Produced {
    fn from(input: &str) -> Self {
        Produced::Raw(input.to_string())
    }
}

impl From<TestCase> for Produced {
    fn from(test: TestCase) -> Self {
        Produced::Case(test)
    }
}

/// Expected and actual outputs of a single-binary run that disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComparisonMismatch {
    pub actual: String,
    pub expected: String,
}

/// Outputs of the tested and the trivial binary that disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DifferentialMismatch {
    pub tested_output: String,
    pub trivial_output: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed(ComparisonMismatch),
    /// No expected output to judge against.
    Unjudged,
}

impl Verdict {
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Failed(_))
    }
}

/// How a driver run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// Ran out of tests.
    Completed,
    Failed,
    /// Stopped at a loop boundary after an interrupt.
    Interrupted,
}

impl Exit {
    pub fn code(self) -> u8 {
        match self {
            Exit::Completed | Exit::Interrupted => 0,
            Exit::Failed => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub passed: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub unjudged: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.timed_out + self.unjudged
    }
}

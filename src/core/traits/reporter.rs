use std::time::Duration;

use crate::core::domain::{BatchSummary, DifferentialMismatch, TestCase, Verdict};

/// Display hooks the drivers call while sequencing tests.
#[mockall::automock]
pub trait Reporter: std::fmt::Debug + Send + Sync {
    /// Whether an interactive display is attached.
    fn is_interactive(&self) -> bool;

    fn test_started(&self, test: &TestCase);
    fn test_output(&self, test: &TestCase, output: &str);
    fn test_verdict(&self, test: &TestCase, verdict: &Verdict);
    fn test_timed_out(&self, test: &TestCase, limit: Duration);
    fn batch_finished(&self, summary: &BatchSummary);

    fn stress_progress(&self, count: u64, test: &TestCase);
    fn stress_mismatch(&self, test: &TestCase, mismatch: &DifferentialMismatch);
    fn stress_timed_out(&self, test: &TestCase, limit: Duration);
    fn stress_finished(&self, count: u64);
}

use std::sync::Arc;

use crate::core::{
    domain::{ComparisonMismatch, TestCase, Verdict},
    traits::comparison::{Comparison, exact_match},
};

/// Judges a single run against the expected output of its test.
#[derive(Clone)]
pub struct OutputChecker {
    comparison: Arc<dyn Comparison>,
}

impl OutputChecker {
    pub fn new(comparison: Arc<dyn Comparison>) -> Self {
        Self { comparison }
    }

    pub fn check(&self, test: &TestCase, actual: &str) -> Verdict {
        let Some(expected) = test.expected_output() else {
            return Verdict::Unjudged;
        };

        if self
            .comparison
            .equal(test.normalize(actual), test.normalize(expected))
        {
            Verdict::Passed
        } else {
            Verdict::Failed(ComparisonMismatch {
                actual: actual.to_string(),
                expected: expected.to_string(),
            })
        }
    }
}

impl Default for OutputChecker {
    fn default() -> Self {
        Self::new(Arc::new(exact_match))
    }
}

impl std::fmt::Debug for OutputChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputChecker").finish_non_exhaustive()
    }
}

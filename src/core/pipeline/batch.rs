use std::path::Path;

use crate::core::{
    checker::OutputChecker,
    domain::{BatchSummary, Exit, TestCase, Verdict},
    errors::{HarnessError, RunError},
    staging::InputStaging,
};
use crate::harness::Harness;

impl Harness {
    /// Runs every test against `binary`, in order, judging each against its
    /// expected output.
    ///
    /// A failing or timed out test ends the run when `halt_on_error` is set.
    /// An interrupt is honoured once the current test is done.
    #[tracing::instrument(skip_all, fields(binary = %binary.as_ref().display()))]
    pub async fn run_all<I>(
        &self,
        tests: I,
        binary: impl AsRef<Path>,
    ) -> Result<Exit, HarnessError>
    where
        I: IntoIterator<Item = TestCase>,
    {
        let binary = binary.as_ref();
        let mut staging = InputStaging::new()?;
        let checker = OutputChecker::new(self.comparison.clone());
        let halt_on_error = self.config.halt_on_error;
        let mut summary = BatchSummary::default();

        let exit = 'run: {
            for test in tests {
                self.reporter.test_started(&test);

                let input = staging.stage(test.input())?;
                match self.runner.run(binary, input, self.config.time_limit).await {
                    Ok(output) => {
                        self.reporter.test_output(&test, &output);
                        let verdict = checker.check(&test, &output);
                        self.reporter.test_verdict(&test, &verdict);
                        tracing::debug!("Test #{} judged: {:?}", test.index(), verdict);

                        match verdict {
                            Verdict::Passed => summary.passed += 1,
                            Verdict::Failed(_) => summary.failed += 1,
                            Verdict::Unjudged => summary.unjudged += 1,
                        }
                        if verdict.is_failure() && halt_on_error {
                            break 'run Exit::Failed;
                        }
                    }
                    Err(RunError::TimeLimitExceeded { limit }) => {
                        summary.timed_out += 1;
                        self.reporter.test_timed_out(&test, limit);
                        if halt_on_error {
                            break 'run Exit::Failed;
                        }
                    }
                    Err(e) => return Err(e.into()),
                }

                if self.interrupt.take() {
                    tracing::info!("Batch interrupted after test #{}", test.index());
                    break 'run Exit::Interrupted;
                }
            }
            Exit::Completed
        };

        self.reporter.batch_finished(&summary);
        tracing::info!("Batch finished: {:?}, {:?}", exit, summary);
        Ok(exit)
    }
}

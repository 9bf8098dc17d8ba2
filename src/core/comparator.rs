use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::core::{
    domain::{DifferentialMismatch, TestCase},
    errors::{RunError, StagingError},
    staging::InputStaging,
    traits::{comparison::Comparison, runner::Runner},
};

#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("outputs differ")]
    Mismatch(DifferentialMismatch),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error(transparent)]
    Staging(#[from] StagingError),
}

/// Runs the tested and the trivial binary on the same input and checks that
/// they agree. Owns the staging file for the whole differential run.
pub struct OutputComparator {
    runner: Arc<dyn Runner>,
    comparison: Arc<dyn Comparison>,
    tested_binary: PathBuf,
    trivial_binary: PathBuf,
    staging: InputStaging,
}

impl OutputComparator {
    pub fn new(
        runner: Arc<dyn Runner>,
        comparison: Arc<dyn Comparison>,
        tested_binary: impl AsRef<Path>,
        trivial_binary: impl AsRef<Path>,
    ) -> Result<Self, StagingError> {
        Ok(Self {
            runner,
            comparison,
            tested_binary: tested_binary.as_ref().into(),
            trivial_binary: trivial_binary.as_ref().into(),
            staging: InputStaging::new()?,
        })
    }

    /// The tested binary always runs first.
    #[tracing::instrument(skip_all, fields(test = test.index()))]
    pub async fn compare(
        &mut self,
        test: &TestCase,
        time_limit: Duration,
    ) -> Result<(), CompareError> {
        let input = self.staging.stage(test.input())?;
        let tested_output = self
            .runner
            .run(&self.tested_binary, input, time_limit)
            .await?;

        let input = self.staging.handle()?;
        let trivial_output = self
            .runner
            .run(&self.trivial_binary, input, time_limit)
            .await?;

        if self
            .comparison
            .equal(test.normalize(&tested_output), test.normalize(&trivial_output))
        {
            tracing::debug!("Outputs agree");
            Ok(())
        } else {
            Err(CompareError::Mismatch(DifferentialMismatch {
                tested_output,
                trivial_output,
            }))
        }
    }
}

impl std::fmt::Debug for OutputComparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputComparator")
            .field("tested_binary", &self.tested_binary)
            .field("trivial_binary", &self.trivial_binary)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        domain::TestCounter, traits::comparison::exact_match, traits::runner::MockRunner,
    };
    use mockall::Sequence;
    use std::io::Read;

    fn comparator(runner: MockRunner) -> OutputComparator {
        OutputComparator::new(Arc::new(runner), Arc::new(exact_match), "./tested", "./trivial")
            .unwrap()
    }

    #[tokio::test]
    async fn test_agreeing_outputs() {
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .times(2)
            .returning(|_, _, _| Ok("42\n".to_string()));
        let counter = TestCounter::new();

        let result = comparator(runner)
            .compare(&TestCase::unjudged(&counter, "40 2"), Duration::from_secs(1))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_tested_runs_first_on_identical_input() {
        let mut seq = Sequence::new();
        let mut runner = MockRunner::new();
        for binary in ["./tested", "./trivial"] {
            runner
                .expect_run()
                .withf(move |path, _, _| path == Path::new(binary))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, input, _| {
                    let mut file: std::fs::File = input.into();
                    let mut content = String::new();
                    file.read_to_string(&mut content).unwrap();
                    Ok(content)
                });
        }
        let counter = TestCounter::new();

        let result = comparator(runner)
            .compare(&TestCase::unjudged(&counter, "echo me"), Duration::from_secs(1))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_mismatch_keeps_raw_outputs() {
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .withf(|path, _, _| path == Path::new("./tested"))
            .returning(|_, _, _| Ok("3\n".to_string()));
        runner
            .expect_run()
            .withf(|path, _, _| path == Path::new("./trivial"))
            .returning(|_, _, _| Ok(" 4 \n".to_string()));
        let counter = TestCounter::new();

        let result = comparator(runner)
            .compare(&TestCase::unjudged(&counter, "2 2"), Duration::from_secs(1))
            .await;

        let Err(CompareError::Mismatch(mismatch)) = result else {
            panic!("Expected mismatch, got {result:?}");
        };
        assert_eq!(mismatch.tested_output, "3\n");
        assert_eq!(mismatch.trivial_output, " 4 \n");
    }

    #[tokio::test]
    async fn test_timeout_is_not_a_mismatch() {
        let mut runner = MockRunner::new();
        runner.expect_run().times(1).returning(|_, _, limit| {
            Err(RunError::TimeLimitExceeded { limit })
        });
        let counter = TestCounter::new();

        let result = comparator(runner)
            .compare(&TestCase::unjudged(&counter, "1"), Duration::from_millis(250))
            .await;

        let Err(CompareError::Run(RunError::TimeLimitExceeded { limit })) = result else {
            panic!("Expected a timeout, got {result:?}");
        };
        assert_eq!(limit, Duration::from_millis(250));
    }
}

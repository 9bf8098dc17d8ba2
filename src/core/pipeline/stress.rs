use std::path::Path;

use crate::core::{
    comparator::{CompareError, OutputComparator},
    domain::{Exit, Produced},
    errors::{HarnessError, RunError},
};
use crate::harness::Harness;

impl Harness {
    /// Feeds every produced input to both binaries until their outputs differ,
    /// the producer runs dry, or an interrupt is honoured between two tests.
    ///
    /// Refuses to start without an interactive display, before anything is
    /// spawned.
    #[tracing::instrument(
        skip_all,
        fields(
            tested = %tested_binary.as_ref().display(),
            trivial = %trivial_binary.as_ref().display(),
        )
    )]
    pub async fn run_stress<I>(
        &self,
        producer: I,
        tested_binary: impl AsRef<Path>,
        trivial_binary: impl AsRef<Path>,
    ) -> Result<Exit, HarnessError>
    where
        I: IntoIterator,
        I::Item: Into<Produced>,
    {
        if !self.reporter.is_interactive() {
            return Err(HarnessError::NonInteractiveEnvironment);
        }

        let mut comparator = OutputComparator::new(
            self.runner.clone(),
            self.comparison.clone(),
            tested_binary,
            trivial_binary,
        )?;
        let mut count = 0u64;

        for produced in producer {
            count += 1;
            let produced: Produced = produced.into();
            let test = produced.into_case(&self.counter);
            self.reporter.stress_progress(count, &test);

            match comparator.compare(&test, self.config.time_limit).await {
                Ok(()) => {}
                Err(CompareError::Mismatch(mismatch)) => {
                    tracing::info!("Outputs differ on test #{}", test.index());
                    self.reporter.stress_mismatch(&test, &mismatch);
                    return Ok(Exit::Failed);
                }
                Err(CompareError::Run(RunError::TimeLimitExceeded { limit })) => {
                    self.reporter.stress_timed_out(&test, limit);
                    return Ok(Exit::Failed);
                }
                Err(CompareError::Run(e)) => return Err(e.into()),
                Err(CompareError::Staging(e)) => return Err(e.into()),
            }

            if self.interrupt.take() {
                tracing::info!("Stress run interrupted after {} tests", count);
                self.reporter.stress_finished(count);
                return Ok(Exit::Interrupted);
            }
        }

        self.reporter.stress_finished(count);
        Ok(Exit::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        domain::{Tag, TestCase},
        interrupt::InterruptToken,
        staging::StagedInput,
        traits::{reporter::MockReporter, runner::MockRunner},
    };
    use std::io::Read;
    use std::sync::Arc;
    use std::time::Duration;

    fn read_input(input: StagedInput) -> String {
        let mut file: std::fs::File = input.into();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn interactive_reporter() -> MockReporter {
        let mut reporter = MockReporter::new();
        reporter.expect_is_interactive().return_const(true);
        reporter.expect_stress_progress().return_const(());
        reporter
    }

    /// Both binaries sum two numbers; the tested one is wrong once the sum
    /// reaches 100.
    fn summing_runner() -> MockRunner {
        let mut runner = MockRunner::new();
        runner.expect_run().returning(|binary, input, _| {
            let sum: i64 = read_input(input)
                .split_whitespace()
                .map(|n| n.parse::<i64>().unwrap())
                .sum();
            if binary == Path::new("./tested") && sum >= 100 {
                Ok(format!("{}\n", sum % 100))
            } else {
                Ok(format!("{}\n", sum))
            }
        });
        runner
    }

    #[tokio::test]
    async fn test_non_interactive_spawns_nothing() {
        let mut runner = MockRunner::new();
        runner.expect_run().times(0);
        let mut reporter = MockReporter::new();
        reporter.expect_is_interactive().return_const(false);
        let harness = Harness::new(Arc::new(runner), Arc::new(reporter), InterruptToken::new());

        let result = harness
            .run_stress(["1 2"], "./tested", "./trivial")
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, HarnessError::NonInteractiveEnvironment));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_producer_completes() {
        let mut reporter = interactive_reporter();
        reporter
            .expect_stress_finished()
            .withf(|count| *count == 3)
            .times(1)
            .return_const(());
        let harness = Harness::new(
            Arc::new(summing_runner()),
            Arc::new(reporter),
            InterruptToken::new(),
        );

        let exit = harness
            .run_stress(["1 2", "40 2", "0 0"], "./tested", "./trivial")
            .await
            .unwrap();

        assert_eq!(exit, Exit::Completed);
    }

    #[tokio::test]
    async fn test_mismatch_halts_with_raw_outputs() {
        let mut reporter = interactive_reporter();
        reporter
            .expect_stress_mismatch()
            .withf(|test, mismatch| {
                test.input() == "60 40"
                    && mismatch.tested_output == "0\n"
                    && mismatch.trivial_output == "100\n"
            })
            .times(1)
            .return_const(());
        let harness = Harness::new(
            Arc::new(summing_runner()),
            Arc::new(reporter),
            InterruptToken::new(),
        );
        let producer = (0..).map(|i| format!("{} 40", i * 20));

        let exit = harness
            .run_stress(producer, "./tested", "./trivial")
            .await
            .unwrap();

        assert_eq!(exit, Exit::Failed);
    }

    #[tokio::test]
    async fn test_interrupt_lets_current_comparison_finish() {
        let token = InterruptToken::new();
        let runner_token = token.clone();
        let mut runner = MockRunner::new();
        // Ctrl-C lands while the tested binary of the second test runs; the
        // trivial binary must still run before the loop stops.
        let mut calls = 0;
        runner.expect_run().times(4).returning(move |_, _, _| {
            calls += 1;
            if calls == 3 {
                runner_token.signal();
            }
            Ok("same\n".to_string())
        });
        let mut reporter = interactive_reporter();
        reporter
            .expect_stress_finished()
            .withf(|count| *count == 2)
            .times(1)
            .return_const(());
        let harness = Harness::new(Arc::new(runner), Arc::new(reporter), token);

        let exit = harness
            .run_stress(std::iter::repeat("x"), "./tested", "./trivial")
            .await
            .unwrap();

        assert_eq!(exit, Exit::Interrupted);
    }

    #[tokio::test]
    async fn test_timeout_fails_run() {
        let mut runner = MockRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_, _, limit| Err(RunError::TimeLimitExceeded { limit }));
        let mut reporter = interactive_reporter();
        reporter
            .expect_stress_timed_out()
            .withf(|_, limit| *limit == Duration::from_secs(1))
            .times(1)
            .return_const(());
        let harness = Harness::new(Arc::new(runner), Arc::new(reporter), InterruptToken::new());

        let exit = harness
            .run_stress(["1"], "./tested", "./trivial")
            .await
            .unwrap();

        assert_eq!(exit, Exit::Failed);
    }

    #[tokio::test]
    async fn test_raw_inputs_get_fresh_indices() {
        let mut reporter = MockReporter::new();
        reporter.expect_is_interactive().return_const(true);
        reporter
            .expect_stress_progress()
            .withf(|count, test| *count == 1 && test.index() == 2 && test.tags().is_empty())
            .times(1)
            .return_const(());
        reporter
            .expect_stress_progress()
            .withf(|count, test| {
                *count == 2 && test.index() == 1 && test.tags().contains(&Tag::TimeLimit)
            })
            .times(1)
            .return_const(());
        reporter.expect_stress_finished().times(1).return_const(());
        let harness = Harness::new(
            Arc::new(summing_runner()),
            Arc::new(reporter),
            InterruptToken::new(),
        );
        let tagged = TestCase::builder("5 5")
            .tag(Tag::TimeLimit)
            .build(harness.counter());
        let producer = vec![Produced::from("1 1"), Produced::from(tagged)];

        let exit = harness
            .run_stress(producer, "./tested", "./trivial")
            .await
            .unwrap();

        assert_eq!(exit, Exit::Completed);
    }
}

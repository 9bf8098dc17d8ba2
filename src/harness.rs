use std::process::ExitCode;
use std::sync::Arc;

use crate::config::HarnessConfig;
use crate::console::ConsoleReporter;
use crate::core::{
    domain::{Exit, TestCounter},
    errors::HarnessError,
    interrupt::InterruptToken,
    traits::{
        comparison::{Comparison, exact_match},
        reporter::Reporter,
        runner::Runner,
    },
};
use crate::native::{interrupt::InterruptController, runner::NativeRunner};

/// Everything a driver run needs: how to run programs, where to report,
/// how to compare outputs, and when to stop.
///
/// Runs are strictly sequential; a harness never has more than one child
/// process alive.
pub struct Harness {
    pub(crate) runner: Arc<dyn Runner>,
    pub(crate) reporter: Arc<dyn Reporter>,
    pub(crate) comparison: Arc<dyn Comparison>,
    pub(crate) config: HarnessConfig,
    pub(crate) counter: TestCounter,
    pub(crate) interrupt: InterruptToken,
}

impl Harness {
    pub fn new(
        runner: Arc<dyn Runner>,
        reporter: Arc<dyn Reporter>,
        interrupt: InterruptToken,
    ) -> Self {
        Self {
            runner,
            reporter,
            comparison: Arc::new(exact_match),
            config: HarnessConfig::default(),
            counter: TestCounter::new(),
            interrupt,
        }
    }

    /// Real processes, report on stdout, Ctrl-C handling installed.
    pub fn native(config: HarnessConfig) -> Result<Self, HarnessError> {
        let interrupt = InterruptController::install()?;
        let reporter = ConsoleReporter::stdout().excerpt_limit(config.excerpt_limit);
        let harness = Self::new(Arc::new(NativeRunner::new()), Arc::new(reporter), interrupt);
        Ok(harness.with_config(config))
    }

    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces plain equality; outputs are normalized before they get here.
    pub fn with_comparison(mut self, comparison: impl Comparison + 'static) -> Self {
        self.comparison = Arc::new(comparison);
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Source of test indices for this session.
    pub fn counter(&self) -> &TestCounter {
        &self.counter
    }

    pub fn interrupt(&self) -> &InterruptToken {
        &self.interrupt
    }
}

impl std::fmt::Debug for Harness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harness")
            .field("runner", &self.runner)
            .field("reporter", &self.reporter)
            .field("config", &self.config)
            .field("counter", &self.counter)
            .field("interrupt", &self.interrupt)
            .finish_non_exhaustive()
    }
}

/// Turns the outcome of a driver run into the process exit code, printing
/// fatal errors to stderr.
pub fn exit_code(result: Result<Exit, HarnessError>) -> ExitCode {
    match result {
        Ok(exit) => ExitCode::from(exit.code()),
        Err(e) => {
            tracing::error!("Harness stopped: {}", e);
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

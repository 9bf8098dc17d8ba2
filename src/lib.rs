//! Black-box testing of executables.
//!
//! A [`Harness`] feeds test inputs to a program on stdin and judges what it
//! prints, either against an expected output ([`Harness::run_all`]) or
//! against a second, trusted program ([`Harness::run_stress`]).
//!
//! ```no_run
//! use blackbox::{Harness, HarnessConfig, Tag, TestCase};
//!
//! # async fn demo() -> Result<(), blackbox::HarnessError> {
//! let harness = Harness::native(HarnessConfig::default())?;
//! let tests = vec![
//!     TestCase::new(harness.counter(), "6", "2 * 3"),
//!     TestCase::builder("1234567890987654321")
//!         .tag(Tag::TimeLimit)
//!         .build(harness.counter()),
//! ];
//! harness.run_all(tests, "./factor").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod console;
pub mod constants;
pub mod core;
pub mod harness;
pub mod logging;
pub mod native;


pub use crate::config::HarnessConfig;
pub use crate::console::ConsoleReporter;
pub use crate::core::{
    domain::{
        BatchSummary, ComparisonMismatch, DifferentialMismatch, Exit, Produced, Tag, TestCase,
        TestCaseBuilder, TestCounter, Verdict,
    },
    errors::{HarnessError, RunError, StagingError},
    interrupt::InterruptToken,
    traits::{comparison::Comparison, reporter::Reporter, runner::Runner},
};
pub use crate::harness::{Harness, exit_code};
pub use crate::native::{interrupt::InterruptController, runner::NativeRunner};

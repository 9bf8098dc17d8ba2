//! Batch run of a factorization program against a table of known answers.
//!
//! ```text
//! cargo run --example factor -- ./factor
//! ```

use std::process::ExitCode;
use std::time::Duration;

use blackbox::{Harness, HarnessConfig, Tag, TestCase, exit_code};

#[tokio::main]
async fn main() -> ExitCode {
    blackbox::logging::init();

    let binary = std::env::args().nth(1).unwrap_or_else(|| "./factor".to_string());
    let config = HarnessConfig::default().with_time_limit(Duration::from_secs(2));
    let harness = match Harness::native(config) {
        Ok(harness) => harness,
        Err(e) => return exit_code(Err(e)),
    };

    let counter = harness.counter();
    let tests = vec![
        TestCase::new(counter, "1", "1"),
        TestCase::new(counter, "6", "2 * 3"),
        TestCase::new(counter, "12", "2^2 * 3"),
        TestCase::new(counter, "30", "2 * 3 * 5"),
        TestCase::new(counter, "997", "997"),
        TestCase::new(counter, "1024", "2^10"),
        TestCase::new(counter, "12167", "23^3"),
        TestCase::new(counter, "32416190071", "32416190071"),
        TestCase::new(counter, "1799704664892149", "104003 * 105751 * 163633"),
        TestCase::builder("501992808086226557")
            .expected("15485867 * 32416190071")
            .tag(Tag::TimeLimit)
            .build(counter),
        TestCase::builder("1234567890987654321")
            .tag(Tag::TimeLimit)
            .build(counter),
    ];

    exit_code(harness.run_all(tests, binary).await)
}

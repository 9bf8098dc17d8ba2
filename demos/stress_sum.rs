//! Stress run of a summing program against a trivially correct one. Stop it
//! with Ctrl-C; press it twice to leave immediately.
//!
//! ```text
//! cargo run --example stress_sum -- ./sum ./trivial
//! ```

use std::process::ExitCode;

use blackbox::{Harness, HarnessConfig, exit_code};
use rand::Rng;

const UPPER_BOUND: u64 = 100_000;
const RANDOM_TESTS: usize = 40;

#[tokio::main]
async fn main() -> ExitCode {
    blackbox::logging::init();

    let mut args = std::env::args().skip(1);
    let tested = args.next().unwrap_or_else(|| "./sum".to_string());
    let trivial = args.next().unwrap_or_else(|| "./trivial".to_string());

    let harness = match Harness::native(HarnessConfig::from_env()) {
        Ok(harness) => harness,
        Err(e) => return exit_code(Err(e)),
    };

    let mut rng = rand::rng();
    let producer = (0..RANDOM_TESTS)
        .map(move |_| {
            format!(
                "{} {}",
                rng.random_range(0..UPPER_BOUND),
                rng.random_range(0..UPPER_BOUND)
            )
        })
        .chain(std::iter::once(format!("{} 0", 0x100000)));

    exit_code(harness.run_stress(producer, tested, trivial).await)
}

use std::path::Path;
use std::time::Duration;

use crate::core::{errors::RunError, staging::StagedInput};

/// Runs an executable on staged input and returns what it printed.
#[mockall::automock]
#[async_trait::async_trait]
pub trait Runner: std::fmt::Debug + Send + Sync {
    async fn run(
        &self,
        binary: &Path,
        input: StagedInput,
        time_limit: Duration,
    ) -> Result<String, RunError>;
}

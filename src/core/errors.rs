use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::string::FromUtf8Error;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("failed to create staging file: {0}")]
    Create(#[source] io::Error),
    #[error("failed to write staged input: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("time limit of {}s exceeded", limit.as_secs_f64())]
    TimeLimitExceeded { limit: Duration },
    #[error("failed to launch {}: {source}", binary.display())]
    Launch {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("i/o error while running {}: {source}", binary.display())]
    Io {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} exited with {status}", binary.display())]
    Crashed { binary: PathBuf, status: ExitStatus },
    #[error("output of {} is not valid UTF-8", binary.display())]
    Decode {
        binary: PathBuf,
        #[source]
        source: FromUtf8Error,
    },
}

impl RunError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RunError::TimeLimitExceeded { .. })
    }
}

/// Errors that stop the harness itself rather than failing a test.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("stress test should be run in a terminal")]
    NonInteractiveEnvironment,
    #[error(transparent)]
    Staging(#[from] StagingError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("failed to install interrupt handler: {0}")]
    Interrupt(#[source] io::Error),
}

impl HarnessError {
    pub fn exit_code(&self) -> u8 {
        match self {
            HarnessError::NonInteractiveEnvironment => 2,
            _ => 1,
        }
    }
}

use std::collections::BTreeSet;
use std::path::Path;
use std::process::Stdio;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::time::{Duration, Instant, timeout};

use crate::core::{errors::RunError, staging::StagedInput, traits::runner::Runner};

/// Pids of children spawned by any `NativeRunner` and not yet reaped.
static RUNNING: Mutex<BTreeSet<u32>> = Mutex::new(BTreeSet::new());

/// Removes its pid from `RUNNING` once the child has been reaped.
struct Tracked(Option<u32>);

impl Drop for Tracked {
    fn drop(&mut self) {
        if let Some(pid) = self.0 {
            RUNNING
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&pid);
        }
    }
}

/// Kills every child still running and terminates the process with `code`.
///
/// The registry stays locked until the process is gone, so no child can be
/// spawned in between and outlive the harness.
pub(crate) fn exit_killing_children(code: i32) -> ! {
    let running = RUNNING.lock().unwrap_or_else(PoisonError::into_inner);
    for &pid in running.iter() {
        kill_child(pid);
    }
    std::process::exit(code)
}

#[cfg(unix)]
fn kill_child(pid: u32) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    if let Err(e) = kill(Pid::from_raw(raw), Signal::SIGKILL) {
        tracing::warn!("Failed to kill child {}: {}", pid, e);
    }
}

// Children do not ignore Ctrl-C here; the console already delivered it to them.
#[cfg(not(unix))]
fn kill_child(pid: u32) {
    tracing::debug!("Leaving child {} to the console interrupt", pid);
}

/// Spawns the binary directly, without arguments, feeding the staged input
/// on stdin. Stderr is inherited so diagnostics reach the terminal.
#[derive(Debug, Default)]
pub struct NativeRunner;

impl NativeRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(binary: &Path, input: StagedInput) -> Command {
        let mut cmd = Command::new(binary);
        cmd.stdin(input)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        #[cfg(unix)]
        ignore_interrupts(&mut cmd);

        cmd
    }

    fn spawn(binary: &Path, input: StagedInput) -> Result<(Child, Tracked), RunError> {
        let mut running = RUNNING.lock().unwrap_or_else(PoisonError::into_inner);
        let child = Self::command(binary, input)
            .spawn()
            .map_err(|e| RunError::Launch {
                binary: binary.into(),
                source: e,
            })?;
        let pid = child.id();
        if let Some(pid) = pid {
            running.insert(pid);
        }
        Ok((child, Tracked(pid)))
    }
}

/// Ctrl-C reaches the whole foreground process group; only the harness must
/// react to it.
#[cfg(unix)]
fn ignore_interrupts(cmd: &mut Command) {
    use nix::sys::signal::{SigHandler, Signal, signal};

    // SAFETY: signal(2) is async-signal-safe and the closure touches nothing else.
    unsafe {
        cmd.pre_exec(|| {
            signal(Signal::SIGINT, SigHandler::SigIgn)
                .map(|_| ())
                .map_err(std::io::Error::from)
        });
    }
}

#[async_trait]
impl Runner for NativeRunner {
    #[tracing::instrument(skip(input))]
    async fn run(
        &self,
        binary: &Path,
        input: StagedInput,
        time_limit: Duration,
    ) -> Result<String, RunError> {
        let start_time = Instant::now();

        let (mut child, tracked) = Self::spawn(binary, input)?;

        let Some(mut stdout) = child.stdout.take() else {
            let _ = child.kill().await;
            return Err(RunError::Io {
                binary: binary.into(),
                source: std::io::Error::other("child stdout was not captured"),
            });
        };

        let waited = timeout(time_limit, async {
            let mut output = Vec::new();
            let (read, status) = tokio::join!(stdout.read_to_end(&mut output), child.wait());
            read?;
            Ok::<_, std::io::Error>((status?, output))
        })
        .await;

        let (status, output) = match waited {
            Ok(result) => result.map_err(|e| RunError::Io {
                binary: binary.into(),
                source: e,
            })?,
            Err(_) => {
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill timed out process: {}", e);
                }
                tracing::warn!(
                    "Time limit exceeded after {}ms",
                    start_time.elapsed().as_millis()
                );
                return Err(RunError::TimeLimitExceeded { limit: time_limit });
            }
        };
        drop(tracked);

        tracing::debug!(
            "Process finished: status={}, elapsed_ms={}, stdout_bytes={}",
            status,
            start_time.elapsed().as_millis(),
            output.len()
        );

        if !status.success() {
            return Err(RunError::Crashed {
                binary: binary.into(),
                status,
            });
        }

        String::from_utf8(output).map_err(|e| RunError::Decode {
            binary: binary.into(),
            source: e,
        })
    }
}

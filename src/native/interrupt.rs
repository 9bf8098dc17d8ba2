use std::sync::{Mutex, PoisonError};

use crate::core::{errors::HarnessError, interrupt::InterruptToken};
use crate::native::runner::exit_killing_children;

static INSTALLED: Mutex<Option<InterruptToken>> = Mutex::new(None);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterruptAction {
    /// Let the current test finish, stop at the next boundary.
    Stop,
    /// Leave right now.
    Exit,
}

fn on_interrupt(token: &InterruptToken) -> InterruptAction {
    if token.is_signalled() {
        InterruptAction::Exit
    } else {
        token.signal();
        InterruptAction::Stop
    }
}

/// Process-wide Ctrl-C handling.
///
/// The first interrupt only sets the returned token. An interrupt arriving
/// while the token is still set kills the running child, if any, and
/// terminates the process with status 0.
#[derive(Debug)]
pub struct InterruptController;

impl InterruptController {
    /// Installs the handler once per process; later calls return the same
    /// token. The handler lives on its own thread, so it outlives whichever
    /// runtime the caller happens to be in.
    pub fn install() -> Result<InterruptToken, HarnessError> {
        let mut installed = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = installed.as_ref() {
            return Ok(token.clone());
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(HarnessError::Interrupt)?;
        let mut signals = {
            let _guard = runtime.enter();
            imp::Interrupts::new().map_err(HarnessError::Interrupt)?
        };
        let token = InterruptToken::new();
        let handler_token = token.clone();

        std::thread::Builder::new()
            .name("blackbox-interrupt".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    while signals.recv().await.is_some() {
                        match on_interrupt(&handler_token) {
                            InterruptAction::Stop => {
                                tracing::info!(
                                    "Interrupt received, stopping after the current test"
                                );
                            }
                            InterruptAction::Exit => {
                                tracing::info!("Second interrupt received, exiting");
                                exit_killing_children(0);
                            }
                        }
                    }
                });
            })
            .map_err(HarnessError::Interrupt)?;

        *installed = Some(token.clone());
        Ok(token)
    }
}

#[cfg(unix)]
mod imp {
    use tokio::signal::unix::{Signal, SignalKind, signal};

    #[derive(Debug)]
    pub(super) struct Interrupts {
        sigint: Signal,
    }

    impl Interrupts {
        pub(super) fn new() -> std::io::Result<Self> {
            Ok(Self {
                sigint: signal(SignalKind::interrupt())?,
            })
        }

        pub(super) async fn recv(&mut self) -> Option<()> {
            self.sigint.recv().await
        }
    }
}

#[cfg(windows)]
mod imp {
    use tokio::signal::windows::{CtrlC, ctrl_c};

    #[derive(Debug)]
    pub(super) struct Interrupts {
        ctrl_c: CtrlC,
    }

    impl Interrupts {
        pub(super) fn new() -> std::io::Result<Self> {
            Ok(Self { ctrl_c: ctrl_c()? })
        }

        pub(super) async fn recv(&mut self) -> Option<()> {
            self.ctrl_c.recv().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_interrupt_stops_second_exits() {
        let token = InterruptToken::new();

        assert_eq!(on_interrupt(&token), InterruptAction::Stop);
        assert!(token.is_signalled());
        assert_eq!(on_interrupt(&token), InterruptAction::Exit);
    }

    #[test]
    fn test_consumed_interrupt_rearms() {
        let token = InterruptToken::new();
        on_interrupt(&token);
        token.take();

        assert_eq!(on_interrupt(&token), InterruptAction::Stop);
    }

    #[test]
    fn test_install_returns_same_token() {
        let first = InterruptController::install().unwrap();
        let second = InterruptController::install().unwrap();

        second.signal();
        assert!(first.take());
    }
}

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative stop flag. Set from the interrupt handler, consumed by the
/// drivers between two tests.
#[derive(Clone, Debug, Default)]
pub struct InterruptToken {
    signalled: Arc<AtomicBool>,
}

impl InterruptToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) {
        self.signalled.store(true, Ordering::SeqCst);
    }

    pub fn is_signalled(&self) -> bool {
        self.signalled.load(Ordering::SeqCst)
    }

    /// Reads and clears the flag.
    pub fn take(&self) -> bool {
        self.signalled.swap(false, Ordering::SeqCst)
    }
}

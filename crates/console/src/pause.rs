use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{runtime::Handle, sync::Notify};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    Completed,
    Interrupted,
}

/// Cuts a running pause short. Clones share one signal.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    state: Arc<InterruptState>,
}

#[derive(Debug, Default)]
struct InterruptState {
    notify: Notify,
    pausing: AtomicBool,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interrupts the pause in progress. Returns `false` when nothing was
    /// pausing; the signal is not remembered for a later pause.
    pub fn raise(&self) -> bool {
        if !self.state.pausing.load(Ordering::SeqCst) {
            return false;
        }
        self.state.notify.notify_waiters();
        true
    }
}

/// Blocking timed wait driven on a tokio runtime, cancellable via [`Interrupt`].
#[derive(Debug, Clone)]
pub struct Pause {
    handle: Handle,
    interrupt: Interrupt,
}

impl Pause {
    pub fn new(handle: Handle, interrupt: Interrupt) -> Self {
        Self { handle, interrupt }
    }

    /// Must be called from outside the runtime's async context.
    pub fn wait(&self, duration: Duration) -> PauseOutcome {
        let state = &self.interrupt.state;
        self.handle.block_on(async {
            // Registered on creation, so a raise after `pausing` flips is seen.
            let notified = state.notify.notified();
            state.pausing.store(true, Ordering::SeqCst);

            let outcome = tokio::select! {
                _ = tokio::time::sleep(duration) => PauseOutcome::Completed,
                _ = notified => PauseOutcome::Interrupted,
            };

            state.pausing.store(false, Ordering::SeqCst);
            debug!(?duration, ?outcome, "pause finished");
            outcome
        })
    }
}

#[cfg(test)]
#[path = "tests/pause_tests.rs"]
mod tests;

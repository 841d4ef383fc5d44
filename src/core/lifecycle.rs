//! Shutdown state machine
//!
//! Moves `Running -> ShuttingDown -> Stopped`, never backwards. The caller
//! that wins the `Running -> ShuttingDown` transition holds a
//! [`ShutdownTicket`] and runs the close-and-drain sequence; everyone else
//! waits until the ticket is dropped.

use parking_lot::{Condvar, Mutex};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    ShuttingDown,
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Running => write!(f, "Running"),
            LifecycleState::ShuttingDown => write!(f, "ShuttingDown"),
            LifecycleState::Stopped => write!(f, "Stopped"),
        }
    }
}

#[derive(Debug)]
pub struct Lifecycle {
    state: Mutex<LifecycleState>,
    stopped: Condvar,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LifecycleState::Running),
            stopped: Condvar::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    /// Claim the shutdown sequence
    ///
    /// Returns a ticket for exactly one caller. Callers arriving while the
    /// sequence runs block until it finishes; callers arriving afterwards
    /// return immediately. Both get `None`.
    pub fn begin_shutdown(&self) -> Option<ShutdownTicket<'_>> {
        let mut state = self.state.lock();
        match *state {
            LifecycleState::Running => {
                *state = LifecycleState::ShuttingDown;
                Some(ShutdownTicket { lifecycle: self })
            }
            LifecycleState::ShuttingDown => {
                while *state != LifecycleState::Stopped {
                    self.stopped.wait(&mut state);
                }
                None
            }
            LifecycleState::Stopped => None,
        }
    }

    fn finish(&self) {
        *self.state.lock() = LifecycleState::Stopped;
        self.stopped.notify_all();
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof of being the one caller that performs shutdown
///
/// Dropping it, on success or unwind, marks the lifecycle `Stopped`.
#[must_use = "dropping the ticket immediately marks the logger stopped"]
pub struct ShutdownTicket<'a> {
    lifecycle: &'a Lifecycle,
}

impl Drop for ShutdownTicket<'_> {
    fn drop(&mut self) {
        self.lifecycle.finish();
    }
}

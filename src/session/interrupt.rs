//! Ctrl-C routing for the browse session
//!
//! Tokio's Ctrl-C listener replaces the default handler for the whole process
//! and cannot be removed again. The session therefore installs one watcher
//! for its lifetime and routes every Ctrl-C through an [`InterruptRoute`]:
//! while a bulk-select runs the signal cancels its token, at any other time
//! the process exits with status 130 as it would without a handler.

use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Exit status of a process ended by SIGINT
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Where the next Ctrl-C goes
#[derive(Debug, Clone, Default)]
pub struct InterruptRoute {
    armed: Arc<Mutex<Option<CancellationToken>>>,
}

impl InterruptRoute {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Send Ctrl-C to `token` until [`disarm`](Self::disarm) is called
    pub fn arm(&self, token: &CancellationToken) {
        if let Ok(mut slot) = self.armed.lock() {
            *slot = Some(token.clone());
        }
    }

    pub fn disarm(&self) {
        if let Ok(mut slot) = self.armed.lock() {
            *slot = None;
        }
    }

    /// Deliver one Ctrl-C
    ///
    /// Returns `true` if it cancelled an armed token, `false` if nothing was
    /// listening and the caller should end the process.
    pub fn interrupt(&self) -> bool {
        let armed = self.armed.lock().ok().and_then(|slot| slot.clone());
        match armed {
            Some(token) => {
                debug!("Ctrl-C cancels the running bulk select");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Spawn the process-wide watcher feeding this route
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn_watcher(&self) -> JoinHandle<()> {
        let route = self.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if !route.interrupt() {
                    std::process::exit(INTERRUPTED_EXIT_CODE);
                }
            }
        })
    }
}

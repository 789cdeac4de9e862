//! # Shutdown Signaling
//! src/shutdown.rs
//!
//! A process-wide cancellation flag plus the OS-signal wiring that sets it.
//! The flag is handed to every long-running loop at construction time; it
//! is set once (idempotently) and only ever polled, never used to preempt a
//! blocking call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::info;

/// Clonable, race-free shutdown flag.
///
/// # Example
/// ```
/// use pulse_server::shutdown::ShutdownFlag;
///
/// let flag = ShutdownFlag::new();
/// assert!(!flag.is_set());
/// flag.set();
/// assert!(flag.is_set());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Safe to call more than once.
    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Installs SIGINT/SIGTERM handlers that set `flag`.
pub fn install_signal_handlers(flag: &ShutdownFlag) -> Result<(), ctrlc::Error> {
    let flag = flag.clone();
    ctrlc::set_handler(move || {
        info!("received shutdown signal");
        flag.set();
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_starts_unset() {
        assert!(!ShutdownFlag::new().is_set());
    }

    #[test]
    fn test_set_is_idempotent() {
        let flag = ShutdownFlag::new();
        flag.set();
        flag.set();
        assert!(flag.is_set());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = ShutdownFlag::new();
        let clone = flag.clone();
        clone.set();
        assert!(flag.is_set());
    }
}

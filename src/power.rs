//! Advisory idle-sleep prevention for the duration of a render.
//!
//! The original tool calls into `IOPM` on macOS to keep the machine awake
//! during a long render, reference counted so nested renders don't fight
//! over the assertion. This crate has no equivalent platform hook on any of
//! its targets, so the guard is a documented no-op, but it keeps the same
//! scoped-acquire/scoped-release shape so a real implementation could be
//! dropped in per platform without changing callers.

use std::sync::atomic::{AtomicU32, Ordering};

static PREVENTION_COUNT: AtomicU32 = AtomicU32::new(0);

/// Held for the duration of a scheduler run. Dropping it (including during
/// unwind) always releases the assertion exactly once.
pub struct SleepGuard;

impl SleepGuard {
    pub fn acquire() -> Self {
        PREVENTION_COUNT.fetch_add(1, Ordering::SeqCst);
        SleepGuard
    }
}

impl Drop for SleepGuard {
    fn drop(&mut self) {
        PREVENTION_COUNT.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_is_reference_counted_and_symmetric() {
        assert_eq!(PREVENTION_COUNT.load(Ordering::SeqCst), 0);
        let a = SleepGuard::acquire();
        assert_eq!(PREVENTION_COUNT.load(Ordering::SeqCst), 1);
        {
            let _b = SleepGuard::acquire();
            assert_eq!(PREVENTION_COUNT.load(Ordering::SeqCst), 2);
        }
        assert_eq!(PREVENTION_COUNT.load(Ordering::SeqCst), 1);
        drop(a);
        assert_eq!(PREVENTION_COUNT.load(Ordering::SeqCst), 0);
    }
}

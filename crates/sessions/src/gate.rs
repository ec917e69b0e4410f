//! In-flight gates.
//!
//! A gate is a boolean that marks one kind of operation as running.
//! `try_acquire` flips it false→true atomically and hands back a guard;
//! dropping the guard flips it back.  Because release lives in `Drop`,
//! the flag is cleared on success, on error, on panic and when the
//! owning future is dropped mid-await.

use std::sync::atomic::{AtomicBool, Ordering};

pub struct InFlightGate {
    name: &'static str,
    busy: AtomicBool,
}

impl InFlightGate {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            busy: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether an operation currently holds the gate.
    pub fn is_set(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the gate.  Returns `None` when it is already held; the
    /// caller must treat that as a refusal, not wait for it.
    pub fn try_acquire(&self) -> Option<GateGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard { gate: self })
    }
}

impl std::fmt::Debug for InFlightGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlightGate")
            .field("name", &self.name)
            .field("busy", &self.is_set())
            .finish()
    }
}

/// Holds a gate for as long as it lives.
#[must_use = "the gate is released as soon as the guard is dropped"]
pub struct GateGuard<'a> {
    gate: &'a InFlightGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
        tracing::trace!(gate = self.gate.name, "gate released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_refused_until_release() {
        let gate = InFlightGate::new("awaiting_answer");
        assert!(!gate.is_set());

        let guard = gate.try_acquire().unwrap();
        assert!(gate.is_set());
        assert!(gate.try_acquire().is_none());

        drop(guard);
        assert!(!gate.is_set());
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn released_on_panic() {
        let gate = InFlightGate::new("uploading");
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = gate.try_acquire().unwrap();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(!gate.is_set());
    }

    #[tokio::test]
    async fn released_when_future_dropped() {
        let gate = InFlightGate::new("awaiting_answer");
        {
            let fut = async {
                let _guard = gate.try_acquire().unwrap();
                std::future::pending::<()>().await;
            };
            let _ = tokio::time::timeout(std::time::Duration::from_millis(10), fut).await;
        }
        assert!(!gate.is_set());
    }
}

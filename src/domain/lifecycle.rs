//! Admission gate and shutdown drain.
//!
//! The controller moves through three phases:
//!
//! ```text
//! Accepting --begin_drain()--> Draining --drain finished or ceiling hit--> Stopped
//! ```
//!
//! While `Accepting`, [`Lifecycle::try_admit`] increments the in-flight counter
//! and returns an [`InFlightGuard`] that decrements it on drop. The phase flag
//! and the counter live in one `watch` channel value and are only mutated
//! under its lock, so "checked accepting" and "counted as in-flight" happen
//! atomically: once the phase flips, no new request can slip into the count.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Phase of the service lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Accepting,
    Draining,
    Stopped,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Accepting => "accepting",
            Phase::Draining => "draining",
            Phase::Stopped => "stopped",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct GateState {
    phase: Phase,
    in_flight: usize,
}

/// How the drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every admitted request finished before the ceiling.
    Completed,
    /// The ceiling elapsed with requests still running. Shutdown proceeds anyway.
    TimedOut { in_flight: usize },
}

/// Shared lifecycle controller. Construct once and share via `Arc`.
#[derive(Debug)]
pub struct Lifecycle {
    state: watch::Sender<GateState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(GateState {
            phase: Phase::Accepting,
            in_flight: 0,
        });
        Self { state }
    }

    /// Admits one unit of work if the service is still accepting.
    ///
    /// Returns `None` once draining has begun; the counter is left untouched.
    pub fn try_admit(self: &Arc<Self>) -> Option<InFlightGuard> {
        let admitted = self.state.send_if_modified(|s| {
            if s.phase == Phase::Accepting {
                s.in_flight += 1;
                true
            } else {
                false
            }
        });

        admitted.then(|| InFlightGuard {
            lifecycle: Arc::clone(self),
        })
    }

    /// Stops admitting new work. Idempotent.
    pub fn begin_drain(&self) {
        self.state.send_if_modified(|s| {
            if s.phase == Phase::Accepting {
                s.phase = Phase::Draining;
                true
            } else {
                false
            }
        });
    }

    /// Begins draining and waits until in-flight work reaches zero or
    /// `ceiling` elapses, whichever comes first. Always ends in `Stopped`.
    pub async fn drain(&self, ceiling: Duration) -> DrainOutcome {
        self.begin_drain();

        let mut rx = self.state.subscribe();
        let waited = tokio::time::timeout(ceiling, async move {
            rx.wait_for(|s| s.in_flight == 0).await.is_ok()
        })
        .await;

        self.state.send_modify(|s| s.phase = Phase::Stopped);

        match waited {
            Ok(_) => {
                tracing::info!("All in-flight requests completed");
                DrainOutcome::Completed
            }
            Err(_) => {
                let in_flight = self.in_flight();
                tracing::warn!(
                    in_flight,
                    ceiling_secs = ceiling.as_secs(),
                    "Drain ceiling reached with requests still in flight"
                );
                DrainOutcome::TimedOut { in_flight }
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn in_flight(&self) -> usize {
        self.state.borrow().in_flight
    }

    pub fn is_accepting(&self) -> bool {
        self.phase() == Phase::Accepting
    }

    fn release(&self) {
        self.state.send_modify(|s| s.in_flight = s.in_flight.saturating_sub(1));
    }
}

/// Scoped in-flight registration. Dropping it releases the slot on every exit path.
#[derive(Debug)]
pub struct InFlightGuard {
    lifecycle: Arc<Lifecycle>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.lifecycle.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.phase(), Phase::Accepting);
        assert_eq!(lifecycle.in_flight(), 0);
        assert!(lifecycle.is_accepting());
    }

    #[test]
    fn test_guard_counts_in_flight() {
        let lifecycle = Arc::new(Lifecycle::new());

        let first = lifecycle.try_admit().unwrap();
        let second = lifecycle.try_admit().unwrap();
        assert_eq!(lifecycle.in_flight(), 2);

        drop(first);
        assert_eq!(lifecycle.in_flight(), 1);
        drop(second);
        assert_eq!(lifecycle.in_flight(), 0);
    }

    #[test]
    fn test_draining_rejects_without_counting() {
        let lifecycle = Arc::new(Lifecycle::new());
        let _held = lifecycle.try_admit().unwrap();

        lifecycle.begin_drain();

        assert_eq!(lifecycle.phase(), Phase::Draining);
        assert!(lifecycle.try_admit().is_none());
        assert_eq!(lifecycle.in_flight(), 1);
    }

    #[test]
    fn test_guard_released_on_panic() {
        let lifecycle = Arc::new(Lifecycle::new());
        let cloned = Arc::clone(&lifecycle);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = cloned.try_admit().unwrap();
            panic!("handler failed");
        }));

        assert!(result.is_err());
        assert_eq!(lifecycle.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_drain_with_nothing_in_flight() {
        let lifecycle = Lifecycle::new();

        let outcome = lifecycle.drain(Duration::from_secs(1)).await;

        assert_eq!(outcome, DrainOutcome::Completed);
        assert_eq!(lifecycle.phase(), Phase::Stopped);
    }

    #[tokio::test]
    async fn test_drain_waits_for_in_flight_work() {
        let lifecycle = Arc::new(Lifecycle::new());
        let guard = lifecycle.try_admit().unwrap();

        let worker = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            drop(guard);
        });

        let outcome = lifecycle.drain(Duration::from_secs(5)).await;

        assert_eq!(outcome, DrainOutcome::Completed);
        assert_eq!(lifecycle.in_flight(), 0);
        worker.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_times_out() {
        let lifecycle = Arc::new(Lifecycle::new());
        let _stuck = lifecycle.try_admit().unwrap();

        let outcome = lifecycle.drain(Duration::from_secs(30)).await;

        assert_eq!(outcome, DrainOutcome::TimedOut { in_flight: 1 });
        assert_eq!(lifecycle.phase(), Phase::Stopped);
        assert!(lifecycle.try_admit().is_none());
    }

    #[tokio::test]
    async fn test_admitted_request_finishes_after_drain_begins() {
        let lifecycle = Arc::new(Lifecycle::new());
        let first = lifecycle.try_admit().unwrap();

        lifecycle.begin_drain();
        assert!(lifecycle.try_admit().is_none());

        drop(first);
        assert_eq!(lifecycle.in_flight(), 0);
        assert_eq!(
            lifecycle.drain(Duration::from_secs(1)).await,
            DrainOutcome::Completed
        );
    }
}

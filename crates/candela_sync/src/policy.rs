//! # Refresh Policy Gate
//!
//! The capability the synchronizer uses to ask "may I apply a
//! destructive reset now?" without knowing about dialogs. A gate may
//! trigger UI asynchronously and answer `false` in the meantime; the
//! synchronizer tolerates being told `false` repeatedly and simply
//! keeps the pending edit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::event::{EventBus, SceneEvent};
use crate::status::StatusSource;

/// Decides whether a pending reset-eligible edit may take effect now.
pub trait RefreshPolicy: Send + Sync {
    /// Returns `true` if a destructive reset may be applied.
    ///
    /// Must not call back into the synchronizer: it is queried with the
    /// editable scene lock held.
    fn allow_refresh(&self) -> bool;
}

/// Gate that always allows. The default policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysAllow;

impl RefreshPolicy for AlwaysAllow {
    fn allow_refresh(&self) -> bool {
        true
    }
}

/// Grace-period gate with asynchronous confirmation.
///
/// Resets are allowed freely while the renderer's elapsed time on the
/// current accumulation is under the grace period. Past it, the gate
/// publishes a single [`SceneEvent::ResetConfirmRequested`] and answers
/// `false` until the user resolves the request (by applying or
/// discarding the pending edits) and [`resolve`](Self::resolve) is
/// called.
///
/// The grace window keys off renderer elapsed time only: a content
/// reset restarts the renderer's clock and so reopens the window, while
/// a mode change leaves it running.
pub struct GracePeriodPolicy {
    status: Arc<dyn StatusSource>,
    events: EventBus,
    grace: Duration,
    confirm_pending: AtomicBool,
}

impl GracePeriodPolicy {
    /// Creates a gate with the given grace period.
    #[must_use]
    pub fn new(status: Arc<dyn StatusSource>, events: EventBus, grace: Duration) -> Self {
        Self {
            status,
            events,
            grace,
            confirm_pending: AtomicBool::new(false),
        }
    }

    /// Marks the outstanding confirmation as answered.
    ///
    /// Call after `apply_pending_edits` or `discard_pending_edits` so
    /// the next over-grace edit raises a fresh request.
    pub fn resolve(&self) {
        self.confirm_pending.store(false, Ordering::Release);
    }

    /// Whether a confirmation request is outstanding.
    #[must_use]
    pub fn is_confirm_pending(&self) -> bool {
        self.confirm_pending.load(Ordering::Acquire)
    }
}

impl RefreshPolicy for GracePeriodPolicy {
    fn allow_refresh(&self) -> bool {
        let elapsed = Duration::from_millis(self.status.status().render_time_ms);
        if elapsed < self.grace {
            return true;
        }
        // One outstanding confirmation at a time.
        if self
            .confirm_pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "reset past grace period, requesting confirmation");
            self.events.publish(&SceneEvent::ResetConfirmRequested);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::RenderStatus;

    struct FixedStatus(RenderStatus);

    impl StatusSource for FixedStatus {
        fn status(&self) -> RenderStatus {
            self.0
        }
    }

    fn policy_at(render_time_ms: u64, grace_ms: u64) -> (GracePeriodPolicy, EventBus) {
        let bus = EventBus::new();
        let status = Arc::new(FixedStatus(RenderStatus {
            render_time_ms,
            spp: 0,
            sps: 0,
        }));
        let policy = GracePeriodPolicy::new(status, bus.clone(), Duration::from_millis(grace_ms));
        (policy, bus)
    }

    #[test]
    fn allows_under_grace() {
        let (policy, bus) = policy_at(10_000, 30_000);
        let rx = bus.subscribe();
        assert!(policy.allow_refresh());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn requests_confirmation_once_past_grace() {
        let (policy, bus) = policy_at(45_000, 30_000);
        let rx = bus.subscribe();

        assert!(!policy.allow_refresh());
        assert!(!policy.allow_refresh());

        // Exactly one request despite repeated queries.
        assert_eq!(rx.try_recv().ok(), Some(SceneEvent::ResetConfirmRequested));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn resolve_reopens_requests() {
        let (policy, bus) = policy_at(45_000, 30_000);
        let rx = bus.subscribe();

        assert!(!policy.allow_refresh());
        let _ = rx.try_recv();

        policy.resolve();
        assert!(!policy.allow_refresh());
        assert_eq!(rx.try_recv().ok(), Some(SceneEvent::ResetConfirmRequested));
    }
}

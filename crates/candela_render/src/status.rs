//! # Shared Render Status
//!
//! Lock-free publisher for render progress. The render loop writes
//! after every pass; the UI, the save path and the grace-period policy
//! read concurrently without blocking the loop.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use candela_sync::{RenderStatus, StatusSource};

/// Atomically published render progress.
#[derive(Debug, Default)]
pub struct SharedRenderStatus {
    render_time_ms: AtomicU64,
    spp: AtomicU32,
    sps: AtomicU32,
}

impl SharedRenderStatus {
    /// Creates a zeroed status publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes progress after a pass.
    pub fn record(&self, spp: u32, render_time_ms: u64, sps: u32) {
        self.spp.store(spp, Ordering::Release);
        self.render_time_ms.store(render_time_ms, Ordering::Release);
        self.sps.store(sps, Ordering::Release);
    }

    /// Zeroes all counters. Called when accumulation restarts, which
    /// also reopens the policy gate's grace window.
    pub fn reset(&self) {
        self.record(0, 0, 0);
    }
}

impl StatusSource for SharedRenderStatus {
    fn status(&self) -> RenderStatus {
        RenderStatus {
            render_time_ms: self.render_time_ms.load(Ordering::Acquire),
            spp: self.spp.load(Ordering::Acquire),
            sps: self.sps.load(Ordering::Acquire),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_reset_round_trip() {
        let status = SharedRenderStatus::new();
        status.record(42, 1500, 96_000);

        let snap = status.status();
        assert_eq!(snap.spp, 42);
        assert_eq!(snap.render_time_ms, 1500);
        assert_eq!(snap.sps, 96_000);

        status.reset();
        assert_eq!(status.status(), RenderStatus::default());
    }
}

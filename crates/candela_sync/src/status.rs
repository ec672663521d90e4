//! # Render Status Snapshot
//!
//! Immutable progress value published by the renderer. The
//! synchronizer reads it when persisting (so a save reflects exactly
//! what has been rendered) and the grace-period policy reads it to
//! decide whether a reset still needs confirmation.

/// A point-in-time snapshot of render progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStatus {
    /// Wall-clock time spent rendering the current accumulation, in ms.
    pub render_time_ms: u64,
    /// Samples per pixel accumulated so far.
    pub spp: u32,
    /// Current throughput in samples per second.
    pub sps: u32,
}

/// Provider of render status snapshots.
///
/// Implemented by the render loop's shared status object; must be
/// cheap and lock-free since the policy gate queries it while the
/// editable scene lock is held.
pub trait StatusSource: Send + Sync {
    /// Returns the current status snapshot.
    fn status(&self) -> RenderStatus;
}

/// Fixed status source for wiring before a renderer exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdleStatus;

impl StatusSource for IdleStatus {
    fn status(&self) -> RenderStatus {
        RenderStatus::default()
    }
}

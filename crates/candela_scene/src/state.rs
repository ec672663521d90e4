//! # Render State Types
//!
//! Reset reasons, render modes and the dirty-state pair that the
//! synchronizer's wait predicate is built on.

use serde::{Deserialize, Serialize};

/// Why the renderer must restart or adjust after a handoff.
///
/// Reasons are ordered by severity. A pending reason is only ever
/// *upgraded*: a second edit before the first is consumed merges into
/// the stronger reason instead of queueing a second generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResetReason {
    /// Only the render mode diverged; accumulated samples survive.
    ModeChange,
    /// Camera, canvas, lighting or another render setting changed.
    SettingsChanged,
    /// Material properties changed.
    MaterialsChanged,
    /// A scene was loaded (or a reset was forced); always a hard reset.
    SceneLoaded,
}

impl ResetReason {
    /// Whether this reason discards accumulated samples.
    ///
    /// `ModeChange` adjusts run/pause behavior only; everything else
    /// restarts accumulation from zero.
    #[must_use]
    pub fn implies_reset(self) -> bool {
        self != Self::ModeChange
    }

    /// Whether this reason bypasses the refresh policy gate.
    ///
    /// Loading a scene is always a hard reset; asking for confirmation
    /// would be meaningless since the old render targets a scene that
    /// no longer exists.
    #[must_use]
    pub fn is_forced(self) -> bool {
        self == Self::SceneLoaded
    }
}

/// Render loop operating mode.
///
/// Lives independently on both scene generations; divergence between
/// the two is itself a (non-resetting) state change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Interactive preview: a few refinement passes, then idle.
    #[default]
    Preview,
    /// Full render: accumulate until the target sample count.
    Rendering,
    /// Paused: keep accumulated samples, render nothing.
    Paused,
}

/// Dirty tracking attached to the editable scene.
///
/// Set by every mutating edit, cleared exactly once per accepted
/// handoff. At most one generation is ever pending: `mark` merges,
/// it never queues.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyState {
    /// Bypass the policy gate for this pending change.
    pub force_reset: bool,
    /// Strongest reset reason recorded since the last handoff.
    pub pending: Option<ResetReason>,
}

impl DirtyState {
    /// Records a reason, upgrading the pending one if `reason` is
    /// stronger. `SceneLoaded` also sets the force flag.
    pub fn mark(&mut self, reason: ResetReason) {
        if reason.is_forced() {
            self.force_reset = true;
        }
        match self.pending {
            Some(prior) if prior >= reason => {}
            _ => self.pending = Some(reason),
        }
    }

    /// Clears both flags. Called once per accepted handoff.
    pub fn clear(&mut self) {
        self.force_reset = false;
        self.pending = None;
    }

    /// Whether a reset-eligible change is waiting for handoff.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }
}

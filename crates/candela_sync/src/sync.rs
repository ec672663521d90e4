//! # SceneSync
//!
//! Owner of the two scene generations and arbiter of the handoff
//! protocol.
//!
//! ## Locking protocol
//!
//! The editable scene sits behind a mutex paired with a condvar; the
//! snapshot sits behind a second, *private* mutex. When both are
//! needed the order is always editable first, snapshot second. No
//! public operation can acquire the snapshot lock on its own except
//! [`SceneSync::save_scene`], which holds nothing else and therefore
//! cannot participate in a cycle. This total order is the single
//! deadlock-avoidance invariant of the component.
//!
//! ## Wakeups
//!
//! Every mutation that can change the truth of the wait predicate
//! signals the condvar before the editable lock is released, so
//! [`SceneSync::await_change`] has no lost-wakeup window. It re-checks
//! the predicate on every wake and never returns spuriously.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use candela_scene::{
    Camera, ChunkCoord, ChunkGeometry, ProgressSink, RenderMode, ResetReason, Scene,
};

use crate::error::{LoadError, SaveError};
use crate::event::{EventBus, SceneEvent};
use crate::policy::{AlwaysAllow, RefreshPolicy};
use crate::status::StatusSource;
use crate::store::SceneStore;

/// The scene state synchronizer.
///
/// Constructed once per session with its collaborators injected; shared
/// by handle (`Arc<SceneSync>`) between the edit side and the render
/// loop. Never reached through ambient state.
pub struct SceneSync {
    editable: Mutex<Scene>,
    changed: Condvar,
    snapshot: Mutex<Scene>,
    policy: Mutex<Arc<dyn RefreshPolicy>>,
    store: Arc<dyn SceneStore>,
    status: Arc<dyn StatusSource>,
    events: EventBus,
}

impl SceneSync {
    /// Creates a synchronizer around a default scene.
    ///
    /// The snapshot generation starts as a structural copy of the
    /// editable one. The policy gate defaults to allow-all.
    #[must_use]
    pub fn new(store: Arc<dyn SceneStore>, status: Arc<dyn StatusSource>) -> Self {
        Self::with_scene(Scene::default(), store, status)
    }

    /// Creates a synchronizer around an existing scene.
    #[must_use]
    pub fn with_scene(
        scene: Scene,
        store: Arc<dyn SceneStore>,
        status: Arc<dyn StatusSource>,
    ) -> Self {
        let snapshot = scene.clone();
        Self {
            editable: Mutex::new(scene),
            changed: Condvar::new(),
            snapshot: Mutex::new(snapshot),
            policy: Mutex::new(Arc::new(AlwaysAllow)),
            store,
            status,
            events: EventBus::new(),
        }
    }

    /// The event bus this synchronizer publishes on.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Replaces the refresh policy gate.
    pub fn set_policy(&self, policy: Arc<dyn RefreshPolicy>) {
        *self.policy.lock() = policy;
    }

    fn current_policy(&self) -> Arc<dyn RefreshPolicy> {
        Arc::clone(&self.policy.lock())
    }

    // =========================================================================
    // Edit-side operations
    // =========================================================================

    /// Runs `f` with exclusive access to the editable scene.
    ///
    /// No other edit or handoff copy runs concurrently with `f`. The
    /// condvar is signaled before the lock is released: any edit may
    /// have satisfied the wait predicate, through dirty marking or mode
    /// divergence, and a missed signal here would strand the render
    /// loop.
    pub fn edit<R>(&self, f: impl FnOnce(&mut Scene) -> R) -> R {
        let mut scene = self.editable.lock();
        let out = f(&mut scene);
        self.changed.notify_all();
        out
    }

    /// Runs `f` against the snapshot generation with live transient
    /// fields merged in.
    ///
    /// Lock order: editable, then snapshot. Only non-reset-relevant
    /// transients (the target sample count) are merged: reset-relevant
    /// fields stay at the last accepted handoff, so a gated edit can
    /// never leak into the snapshot. Live camera readouts go through
    /// [`live_camera`](Self::live_camera) instead.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&Scene) -> R) -> R {
        let scene = self.editable.lock();
        let mut snap = self.snapshot.lock();
        snap.copy_transients(&scene);
        f(&snap)
    }

    /// Live camera pose from the editable generation.
    ///
    /// For overlay readouts that track the pose as the user drags it,
    /// including poses the renderer has not accepted (or never will).
    /// Writes nothing into the snapshot.
    #[must_use]
    pub fn live_camera(&self) -> Camera {
        *self.editable.lock().camera()
    }

    /// Forces the pending edit to be applied regardless of policy.
    ///
    /// Used when the user explicitly confirms a destructive reset.
    pub fn apply_pending_edits(&self) {
        let mut scene = self.editable.lock();
        scene.refresh(ResetReason::SceneLoaded);
        tracing::info!("pending scene changes applied");
        self.changed.notify_all();
    }

    /// Discards the pending edit, rolling the editable scene back to
    /// the snapshot generation.
    ///
    /// Does not wake the render loop: there is nothing new to see.
    pub fn discard_pending_edits(&self) {
        let mut scene = self.editable.lock();
        let snap = self.snapshot.lock();
        scene.copy_state(&snap);
        scene.clear_dirty();
        tracing::info!("pending scene changes discarded");
    }

    // =========================================================================
    // Render-loop operations
    // =========================================================================

    /// Blocks until a state change is ready for the render loop.
    ///
    /// Wakes when the editable scene is dirty and the change is
    /// approved (forced, or allowed by the policy gate), or when the
    /// render modes of the two generations diverge. On a full reset the
    /// reset-relevant fields and mode are copied into the snapshot in
    /// one critical section and the pending reason is returned; on mode
    /// divergence only the mode is copied and `ModeChange` is returned.
    pub fn await_change(&self) -> ResetReason {
        let mut scene = self.editable.lock();
        loop {
            if let Some(reason) = self.try_handoff(&mut scene) {
                return reason;
            }
            self.changed.wait(&mut scene);
        }
    }

    /// Like [`await_change`](Self::await_change) but gives up after
    /// `timeout`.
    ///
    /// This is the cooperative-shutdown variant: a render loop blocks
    /// here and checks its shutdown flag whenever `None` comes back.
    pub fn await_change_timeout(&self, timeout: Duration) -> Option<ResetReason> {
        let deadline = Instant::now() + timeout;
        let mut scene = self.editable.lock();
        loop {
            if let Some(reason) = self.try_handoff(&mut scene) {
                return Some(reason);
            }
            if self.changed.wait_until(&mut scene, deadline).timed_out() {
                // Final probe: the predicate may have become true in the
                // same instant the wait expired.
                return self.try_handoff(&mut scene);
            }
        }
    }

    /// Reports whether [`await_change`](Self::await_change) would
    /// currently return, without mutating any state.
    ///
    /// For cooperative render loops that cannot block.
    #[must_use]
    pub fn poll_change(&self) -> bool {
        let scene = self.editable.lock();
        let dirty = scene.dirty();
        if dirty.is_dirty() && (dirty.force_reset || self.current_policy().allow_refresh()) {
            return true;
        }
        let snap = self.snapshot.lock();
        scene.mode() != snap.mode()
    }

    /// Handoff attempt. Caller holds the editable lock.
    fn try_handoff(&self, scene: &mut Scene) -> Option<ResetReason> {
        let dirty = scene.dirty();
        if let Some(reason) = dirty.pending {
            if dirty.force_reset || self.current_policy().allow_refresh() {
                // Lock order: editable -> snapshot.
                let mut snap = self.snapshot.lock();
                snap.copy_state(scene);
                snap.set_mode(scene.mode());
                drop(snap);
                scene.clear_dirty();
                tracing::debug!(?reason, "scene state handoff");
                return Some(reason);
            }
        }
        let mut snap = self.snapshot.lock();
        if scene.mode() != snap.mode() {
            snap.set_mode(scene.mode());
            return Some(ResetReason::ModeChange);
        }
        None
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Loads the named scene into the editable generation.
    ///
    /// The store validates the whole description before any field is
    /// overwritten; on failure the editable scene is untouched. Loading
    /// always forces a hard reset: `SceneLoaded` bypasses the policy
    /// gate.
    pub fn load_scene(&self, name: &str) -> Result<(), LoadError> {
        {
            let mut scene = self.editable.lock();
            let desc = self.store.load(name)?;
            scene.apply_description(desc);
            scene.refresh(ResetReason::SceneLoaded);
            self.changed.notify_all();
        }
        tracing::info!(scene = name, "scene loaded");
        self.events.publish(&SceneEvent::SceneLoaded {
            name: name.to_owned(),
        });
        Ok(())
    }

    /// Persists the snapshot generation under `name`.
    ///
    /// Takes the snapshot lock only: a save reflects exactly what has
    /// been rendered, never unsaved pending edits. The latest render
    /// status (elapsed time, sample count) is merged in first.
    pub fn save_scene(&self, name: &str) -> Result<(), SaveError> {
        {
            let mut snap = self.snapshot.lock();
            let status = self.status.status();
            snap.set_render_progress(status.spp, status.render_time_ms);
            let mut desc = snap.to_description();
            desc.name = name.to_owned();
            self.store.save(&desc, name)?;
        }
        tracing::info!(scene = name, "scene saved");
        self.events.publish(&SceneEvent::SceneSaved {
            name: name.to_owned(),
        });
        Ok(())
    }

    // =========================================================================
    // Chunk geometry loading
    // =========================================================================

    /// Loads chunks into a cleared scene and recenters the camera.
    ///
    /// The geometry collaborator runs (and may fail) before any scene
    /// field is touched. Forces a hard reset and drops to preview mode.
    pub fn load_fresh_chunks(
        &self,
        geometry: &dyn ChunkGeometry,
        progress: &dyn ProgressSink,
        world: &str,
        chunks: &[ChunkCoord],
    ) -> Result<(), LoadError> {
        {
            let mut scene = self.editable.lock();
            let center = geometry.load_chunks(world, chunks, progress)?;
            scene.clear();
            scene.set_chunks(world, chunks.to_vec());
            scene.move_camera_to_center(center);
            scene.set_mode(RenderMode::Preview);
            self.changed.notify_all();
        }
        tracing::info!(world, count = chunks.len(), "fresh chunks loaded");
        self.events.publish(&SceneEvent::ChunksLoaded {
            world: world.to_owned(),
            count: chunks.len(),
        });
        Ok(())
    }

    /// Loads chunks while preserving camera and settings.
    pub fn load_chunks(
        &self,
        geometry: &dyn ChunkGeometry,
        progress: &dyn ProgressSink,
        world: &str,
        chunks: &[ChunkCoord],
    ) -> Result<(), LoadError> {
        {
            let mut scene = self.editable.lock();
            geometry.load_chunks(world, chunks, progress)?;
            scene.set_chunks(world, chunks.to_vec());
            scene.set_mode(RenderMode::Preview);
            self.changed.notify_all();
        }
        tracing::info!(world, count = chunks.len(), "chunks loaded");
        self.events.publish(&SceneEvent::ChunksLoaded {
            world: world.to_owned(),
            count: chunks.len(),
        });
        Ok(())
    }

    /// Reloads the chunk selection currently held by the editable
    /// scene. No-op if no geometry is loaded.
    pub fn reload_chunks(
        &self,
        geometry: &dyn ChunkGeometry,
        progress: &dyn ProgressSink,
    ) -> Result<(), LoadError> {
        let (world, chunks) = {
            let scene = self.editable.lock();
            match scene.world() {
                Some(world) => (world.to_owned(), scene.chunks().to_vec()),
                None => {
                    tracing::warn!("reload requested with no loaded geometry");
                    return Ok(());
                }
            }
        };
        self.load_chunks(geometry, progress, &world, &chunks)
    }
}

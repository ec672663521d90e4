//! # Render Controller
//!
//! Construction-time wiring: builds the store, status publisher,
//! synchronizer and policy gate, then spawns the render loop. Both the
//! UI layer and any scripting context receive the same explicit
//! handles; nothing is reachable through globals.

use std::sync::Arc;

use candela_render::{
    FrameRenderer, RenderLoop, RenderLoopConfig, RenderLoopHandle, SharedRenderStatus,
};
use candela_scene::Scene;
use candela_sync::{
    EventBus, FsSceneStore, GracePeriodPolicy, RefreshPolicy, SceneSync, StatusSource,
};

use crate::config::CandelaConfig;

/// Owner of a full renderer front-end session.
pub struct RenderController<R: FrameRenderer> {
    sync: Arc<SceneSync>,
    status: Arc<SharedRenderStatus>,
    policy: Arc<GracePeriodPolicy>,
    handle: Option<RenderLoopHandle<R>>,
}

impl<R: FrameRenderer> RenderController<R> {
    /// Builds the session and starts the render loop.
    ///
    /// Fails only if the render thread cannot be spawned.
    pub fn start(config: &CandelaConfig, renderer: R) -> std::io::Result<Self> {
        let status = Arc::new(SharedRenderStatus::new());
        let store = Arc::new(FsSceneStore::new(config.scene_dir.clone()));

        let mut scene = Scene::default();
        scene.set_canvas_size(config.canvas_width, config.canvas_height);
        scene.set_target_spp(config.target_spp);
        scene.clear_dirty();

        let sync = Arc::new(SceneSync::with_scene(
            scene,
            store,
            Arc::clone(&status) as Arc<dyn StatusSource>,
        ));

        let policy = Arc::new(GracePeriodPolicy::new(
            Arc::clone(&status) as Arc<dyn StatusSource>,
            sync.events().clone(),
            config.grace_period(),
        ));
        sync.set_policy(Arc::clone(&policy) as Arc<dyn RefreshPolicy>);

        let handle = RenderLoop::spawn(
            Arc::clone(&sync),
            renderer,
            Arc::clone(&status),
            RenderLoopConfig {
                preview_passes: config.preview_passes,
                idle_wait: config.idle_wait(),
            },
        )?;

        Ok(Self {
            sync,
            status,
            policy,
            handle: Some(handle),
        })
    }

    /// The scene synchronizer handle.
    #[must_use]
    pub fn scene_sync(&self) -> &Arc<SceneSync> {
        &self.sync
    }

    /// The event bus for UI subscriptions.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        self.sync.events()
    }

    /// The shared render status publisher.
    #[must_use]
    pub fn status(&self) -> &Arc<SharedRenderStatus> {
        &self.status
    }

    /// Runs `f` against the renderer's sample buffer (for canvas
    /// drawing or image dumps).
    pub fn with_sample_buffer(&self, f: &mut dyn FnMut(&[f64], u32, u32)) {
        if let Some(handle) = &self.handle {
            handle.with_sample_buffer(f);
        }
    }

    /// User confirmed the destructive reset: apply and close the
    /// outstanding confirmation.
    pub fn confirm_reset(&self) {
        self.sync.apply_pending_edits();
        self.policy.resolve();
    }

    /// User rejected the destructive reset: roll back and close the
    /// outstanding confirmation.
    pub fn reject_reset(&self) {
        self.sync.discard_pending_edits();
        self.policy.resolve();
    }

    /// Stops the render loop and joins its thread.
    pub fn shutdown(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.shutdown();
        }
    }
}

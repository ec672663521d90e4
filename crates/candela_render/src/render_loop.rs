//! # Render Loop
//!
//! Consumes state changes from the synchronizer and drives a
//! [`FrameRenderer`](crate::renderer::FrameRenderer) on its own thread.
//!
//! ## Protocol
//!
//! - Block on the synchronizer (with a short timeout so the shutdown
//!   flag is polled between handoffs).
//! - A content reset replaces the private scene copy and zeroes the
//!   accumulation; a mode change only adjusts run/pause behavior.
//! - Between passes the loop probes `poll_change` so an edit takes
//!   effect after the current pass, never mid-pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use candela_scene::{RenderMode, ResetReason, Scene};
use candela_sync::{SceneEvent, SceneSync};

use crate::renderer::FrameRenderer;
use crate::status::SharedRenderStatus;

/// Render loop tuning knobs.
#[derive(Clone, Copy, Debug)]
pub struct RenderLoopConfig {
    /// Refinement passes rendered per handoff in preview mode.
    pub preview_passes: u32,
    /// How long one blocking wait lasts before the shutdown flag is
    /// re-checked.
    pub idle_wait: Duration,
}

impl Default for RenderLoopConfig {
    fn default() -> Self {
        Self {
            preview_passes: 2,
            idle_wait: Duration::from_millis(50),
        }
    }
}

/// The render-side consumer of a [`SceneSync`].
pub struct RenderLoop<R: FrameRenderer> {
    sync: Arc<SceneSync>,
    renderer: Arc<Mutex<R>>,
    status: Arc<SharedRenderStatus>,
    shutdown: Arc<AtomicBool>,
    config: RenderLoopConfig,

    // Private working copy, refreshed per handoff.
    scene: Scene,
    mode: RenderMode,
    // False until the first content handoff; nothing to render before.
    primed: bool,
    spp: u32,
    // Render time excludes paused stretches: `accumulated` holds the
    // finished running stretches, `started` marks the current one.
    accumulated: Duration,
    started: Instant,
}

impl<R: FrameRenderer> RenderLoop<R> {
    /// Spawns the loop on a dedicated thread and returns its handle.
    ///
    /// `status` is shared so the same object can back the
    /// synchronizer's save path and the policy gate. Fails only if the
    /// OS refuses the thread.
    pub fn spawn(
        sync: Arc<SceneSync>,
        renderer: R,
        status: Arc<SharedRenderStatus>,
        config: RenderLoopConfig,
    ) -> std::io::Result<RenderLoopHandle<R>> {
        let renderer = Arc::new(Mutex::new(renderer));
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut render_loop = Self {
            sync,
            renderer: Arc::clone(&renderer),
            status: Arc::clone(&status),
            shutdown: Arc::clone(&shutdown),
            config,
            scene: Scene::default(),
            mode: RenderMode::Preview,
            primed: false,
            spp: 0,
            accumulated: Duration::ZERO,
            started: Instant::now(),
        };

        let thread = thread::Builder::new()
            .name("candela-render".into())
            .spawn(move || render_loop.run())?;

        Ok(RenderLoopHandle {
            thread: Some(thread),
            shutdown,
            renderer,
            status,
        })
    }

    fn run(&mut self) {
        tracing::info!("render loop started");
        while !self.shutdown.load(Ordering::Acquire) {
            if let Some(reason) = self.sync.await_change_timeout(self.config.idle_wait) {
                self.apply_change(reason);
            } else {
                self.refresh_transients();
            }
            self.render_while_allowed();
        }
        tracing::info!("render loop stopped");
    }

    fn apply_change(&mut self, reason: ResetReason) {
        if reason.implies_reset() {
            self.scene = self.sync.with_snapshot(Scene::clone);
            self.renderer.lock().reset(&self.scene);
            self.primed = true;
            self.spp = 0;
            self.accumulated = Duration::ZERO;
            self.started = Instant::now();
            self.status.reset();
            tracing::debug!(?reason, "accumulation reset");
        }
        let mode = self.sync.with_snapshot(Scene::mode);
        if mode != self.mode {
            if mode == RenderMode::Paused {
                self.accumulated += self.started.elapsed();
            } else if self.mode == RenderMode::Paused {
                self.started = Instant::now();
            }
            self.mode = mode;
            tracing::debug!(?mode, "render mode changed");
            self.sync
                .events()
                .publish(&SceneEvent::RenderStateChanged(mode));
        }
    }

    /// Pulls the transient target spp without a handoff, so a raised
    /// target resumes accumulation of the same image.
    fn refresh_transients(&mut self) {
        let scene = &mut self.scene;
        self.sync.with_snapshot(|snap| scene.copy_transients(snap));
    }

    fn render_while_allowed(&mut self) {
        while self.should_render() && !self.shutdown.load(Ordering::Acquire) {
            {
                let mut renderer = self.renderer.lock();
                renderer.render_pass(&self.scene);
            }
            self.spp += 1;
            self.publish_status();
            // An approved edit preempts further passes.
            if self.sync.poll_change() {
                break;
            }
        }
    }

    fn should_render(&self) -> bool {
        if !self.primed {
            return false;
        }
        match self.mode {
            RenderMode::Paused => false,
            RenderMode::Preview => self.spp < self.config.preview_passes,
            RenderMode::Rendering => self.spp < self.scene.target_spp(),
        }
    }

    fn publish_status(&self) {
        let elapsed = match self.mode {
            RenderMode::Paused => self.accumulated,
            _ => self.accumulated + self.started.elapsed(),
        };
        let (width, height) = self.scene.canvas_size();
        let pixel_samples = u64::from(width) * u64::from(height) * u64::from(self.spp);
        let sps = if elapsed.as_millis() == 0 {
            0
        } else {
            u32::try_from(pixel_samples * 1000 / elapsed.as_millis() as u64).unwrap_or(u32::MAX)
        };
        self.status
            .record(self.spp, elapsed.as_millis() as u64, sps);
    }
}

/// Owner handle for a spawned render loop.
///
/// Dropping the handle shuts the loop down and joins the thread.
pub struct RenderLoopHandle<R> {
    thread: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    renderer: Arc<Mutex<R>>,
    status: Arc<SharedRenderStatus>,
}

impl<R: FrameRenderer> RenderLoopHandle<R> {
    /// The shared status object the loop publishes to.
    #[must_use]
    pub fn status(&self) -> &Arc<SharedRenderStatus> {
        &self.status
    }

    /// Runs `f` against the renderer's sample buffer.
    ///
    /// Blocks the loop for the duration of `f`; keep it short.
    pub fn with_sample_buffer(&self, f: &mut dyn FnMut(&[f64], u32, u32)) {
        self.renderer.lock().with_sample_buffer(f);
    }

    /// Requests shutdown and joins the render thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("render thread panicked during shutdown");
            }
        }
    }
}

impl<R> Drop for RenderLoopHandle<R> {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

//! # Scene
//!
//! The full configuration shape. Two instances exist per session: the
//! editable generation and the snapshot generation. Both are owned by
//! the synchronizer in `candela_sync`; nothing in this crate locks.
//!
//! ## Field classes
//!
//! - **Reset-relevant** (camera, sun, canvas, exposure, materials,
//!   geometry handles): copied by [`Scene::copy_state`] during a
//!   handoff; changing any of them restarts accumulation.
//! - **Transient** (target spp): additionally merged by
//!   [`Scene::copy_transients`]; adjusting it mid-render is safe and
//!   must not wait for a handoff.
//! - **Render progress** (`spp`, `render_time_ms`): written back from
//!   the renderer's status snapshot at save time only.

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Vector3};
use crate::chunk::ChunkCoord;
use crate::state::{DirtyState, RenderMode, ResetReason};
use crate::sun::Sun;

/// Default canvas width.
pub const DEFAULT_WIDTH: u32 = 400;
/// Default canvas height.
pub const DEFAULT_HEIGHT: u32 = 400;
/// Default target samples per pixel.
pub const DEFAULT_TARGET_SPP: u32 = 1000;

/// One generation of scene state.
#[derive(Clone, Debug)]
pub struct Scene {
    name: String,
    camera: Camera,
    sun: Sun,
    width: u32,
    height: u32,
    exposure: f64,
    emitter_intensity: f64,
    target_spp: u32,
    mode: RenderMode,
    world: Option<String>,
    chunks: Vec<ChunkCoord>,

    // Render progress, merged from the status snapshot at save time.
    spp: u32,
    render_time_ms: u64,

    dirty: DirtyState,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("untitled")
    }
}

impl Scene {
    /// Creates an empty scene with default settings.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            camera: Camera::default(),
            sun: Sun::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            exposure: 1.0,
            emitter_intensity: 13.0,
            target_spp: DEFAULT_TARGET_SPP,
            mode: RenderMode::Preview,
            world: None,
            chunks: Vec::new(),
            spp: 0,
            render_time_ms: 0,
            dirty: DirtyState::default(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Scene name, used as the persistence key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Current sun settings.
    #[must_use]
    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    /// Canvas size as (width, height).
    #[must_use]
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Exposure value.
    #[must_use]
    pub fn exposure(&self) -> f64 {
        self.exposure
    }

    /// Emitter intensity material setting.
    #[must_use]
    pub fn emitter_intensity(&self) -> f64 {
        self.emitter_intensity
    }

    /// Target samples per pixel.
    #[must_use]
    pub fn target_spp(&self) -> u32 {
        self.target_spp
    }

    /// Current render mode of this generation.
    #[must_use]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// World the chunk handles refer to, if any geometry is loaded.
    #[must_use]
    pub fn world(&self) -> Option<&str> {
        self.world.as_deref()
    }

    /// Handles of the loaded chunks.
    #[must_use]
    pub fn chunks(&self) -> &[ChunkCoord] {
        &self.chunks
    }

    /// Samples per pixel rendered so far (as of the last status merge).
    #[must_use]
    pub fn spp(&self) -> u32 {
        self.spp
    }

    /// Accumulated render time in milliseconds (as of the last status merge).
    #[must_use]
    pub fn render_time_ms(&self) -> u64 {
        self.render_time_ms
    }

    /// Current dirty state.
    #[must_use]
    pub fn dirty(&self) -> DirtyState {
        self.dirty
    }

    // =========================================================================
    // Mutating setters - each marks the reset reason it implies
    // =========================================================================

    /// Renames the scene. Does not dirty: the rendered image is still valid.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    /// Moves the camera.
    pub fn set_camera_position(&mut self, position: Vector3) {
        self.camera.position = position;
        self.dirty.mark(ResetReason::SettingsChanged);
    }

    /// Re-orients the camera.
    pub fn set_camera_direction(&mut self, yaw: f64, pitch: f64) {
        self.camera.yaw = yaw;
        self.camera.pitch = pitch;
        self.dirty.mark(ResetReason::SettingsChanged);
    }

    /// Changes the camera field of view.
    pub fn set_camera_fov(&mut self, fov: f64) {
        self.camera.fov = fov;
        self.dirty.mark(ResetReason::SettingsChanged);
    }

    /// Changes the sun direction.
    pub fn set_sun_direction(&mut self, azimuth: f64, altitude: f64) {
        self.sun.azimuth = azimuth;
        self.sun.altitude = altitude;
        self.dirty.mark(ResetReason::SettingsChanged);
    }

    /// Changes the sun intensity.
    pub fn set_sun_intensity(&mut self, intensity: f64) {
        self.sun.intensity = intensity;
        self.dirty.mark(ResetReason::SettingsChanged);
    }

    /// Resizes the canvas.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.dirty.mark(ResetReason::SettingsChanged);
    }

    /// Changes the exposure. Transient: tonemapping only, but still a
    /// settings change for the accumulator's postprocess cache.
    pub fn set_exposure(&mut self, exposure: f64) {
        self.exposure = exposure;
        self.dirty.mark(ResetReason::SettingsChanged);
    }

    /// Changes the emitter intensity material setting.
    pub fn set_emitter_intensity(&mut self, intensity: f64) {
        self.emitter_intensity = intensity;
        self.dirty.mark(ResetReason::MaterialsChanged);
    }

    /// Changes the target sample count.
    ///
    /// Deliberately does not dirty: raising or lowering the target
    /// never invalidates samples already accumulated.
    pub fn set_target_spp(&mut self, target: u32) {
        self.target_spp = target;
    }

    /// Switches the render mode.
    ///
    /// Not recorded as a pending reason: the synchronizer detects mode
    /// divergence between the two generations directly.
    pub fn set_mode(&mut self, mode: RenderMode) {
        self.mode = mode;
    }

    /// Marks the scene dirty with an explicit reason.
    pub fn refresh(&mut self, reason: ResetReason) {
        self.dirty.mark(reason);
    }

    /// Clears the dirty flags. Called once per accepted handoff.
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Records render progress, used before persisting.
    pub fn set_render_progress(&mut self, spp: u32, render_time_ms: u64) {
        self.spp = spp;
        self.render_time_ms = render_time_ms;
    }

    /// Replaces the loaded geometry handles.
    pub fn set_chunks(&mut self, world: &str, chunks: Vec<ChunkCoord>) {
        self.world = Some(world.to_owned());
        self.chunks = chunks;
        self.dirty.mark(ResetReason::SceneLoaded);
    }

    /// Drops all loaded geometry and resets settings to defaults,
    /// keeping the scene name.
    pub fn clear(&mut self) {
        let name = std::mem::take(&mut self.name);
        *self = Self::new(&name);
    }

    /// Recenters the camera over the loaded region.
    pub fn move_camera_to_center(&mut self, center: Vector3) {
        self.camera.move_to_center(center);
        self.dirty.mark(ResetReason::SettingsChanged);
    }

    // =========================================================================
    // Generation copies - the handoff and rollback primitives
    // =========================================================================

    /// Copies every reset-relevant field from `other` into `self`.
    ///
    /// Used in both directions: snapshot <- editable on handoff,
    /// editable <- snapshot on discard. Render mode and dirty flags are
    /// deliberately excluded; the synchronizer manages both explicitly.
    pub fn copy_state(&mut self, other: &Scene) {
        self.name = other.name.clone();
        self.camera = other.camera;
        self.sun = other.sun;
        self.width = other.width;
        self.height = other.height;
        self.exposure = other.exposure;
        self.emitter_intensity = other.emitter_intensity;
        self.target_spp = other.target_spp;
        self.world = other.world.clone();
        self.chunks = other.chunks.clone();
    }

    /// Merges only the transient fields from `other` into `self`.
    ///
    /// Strictly non-reset-relevant fields: anything whose setter marks
    /// a reset reason must cross through a handoff only, or a
    /// policy-rejected edit would leak into the accumulating render.
    pub fn copy_transients(&mut self, other: &Scene) {
        self.target_spp = other.target_spp;
    }

    // =========================================================================
    // Persistence conversion
    // =========================================================================

    /// Extracts the serializable description of this generation.
    #[must_use]
    pub fn to_description(&self) -> SceneDescription {
        SceneDescription {
            name: self.name.clone(),
            camera: self.camera,
            sun: self.sun,
            width: self.width,
            height: self.height,
            exposure: self.exposure,
            emitter_intensity: self.emitter_intensity,
            target_spp: self.target_spp,
            mode: self.mode,
            world: self.world.clone(),
            chunks: self.chunks.clone(),
            spp: self.spp,
            render_time_ms: self.render_time_ms,
        }
    }

    /// Replaces this generation's contents from a description.
    ///
    /// All-or-nothing by construction: the description was fully parsed
    /// before this is called, so no field is overwritten on a failed
    /// load. Dirty flags are left alone; the caller marks `SceneLoaded`.
    pub fn apply_description(&mut self, desc: SceneDescription) {
        self.name = desc.name;
        self.camera = desc.camera;
        self.sun = desc.sun;
        self.width = desc.width;
        self.height = desc.height;
        self.exposure = desc.exposure;
        self.emitter_intensity = desc.emitter_intensity;
        self.target_spp = desc.target_spp;
        self.mode = desc.mode;
        self.world = desc.world;
        self.chunks = desc.chunks;
        self.spp = desc.spp;
        self.render_time_ms = desc.render_time_ms;
    }
}

/// Serializable scene description, the persisted form.
///
/// The on-disk layout belongs to the store collaborator; this type is
/// only the schema it serializes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Scene name.
    pub name: String,
    /// Camera pose.
    pub camera: Camera,
    /// Sun settings.
    pub sun: Sun,
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Exposure.
    pub exposure: f64,
    /// Emitter intensity.
    pub emitter_intensity: f64,
    /// Target samples per pixel.
    pub target_spp: u32,
    /// Render mode at save time.
    pub mode: RenderMode,
    /// World the chunks came from.
    pub world: Option<String>,
    /// Loaded chunk handles.
    pub chunks: Vec<ChunkCoord>,
    /// Samples per pixel rendered when saved.
    pub spp: u32,
    /// Render time in milliseconds when saved.
    pub render_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_mark_expected_reasons() {
        let mut scene = Scene::new("test");
        assert!(!scene.dirty().is_dirty());

        scene.set_camera_position(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.dirty().pending, Some(ResetReason::SettingsChanged));

        scene.set_emitter_intensity(20.0);
        assert_eq!(scene.dirty().pending, Some(ResetReason::MaterialsChanged));
    }

    #[test]
    fn mode_and_target_do_not_dirty() {
        let mut scene = Scene::new("test");
        scene.set_mode(RenderMode::Rendering);
        scene.set_target_spp(64);
        assert!(!scene.dirty().is_dirty());
    }

    #[test]
    fn copy_state_excludes_mode_and_dirty() {
        let mut src = Scene::new("src");
        src.set_canvas_size(800, 600);
        src.set_mode(RenderMode::Rendering);

        let mut dst = Scene::new("dst");
        dst.copy_state(&src);

        assert_eq!(dst.canvas_size(), (800, 600));
        assert_eq!(dst.name(), "src");
        assert_eq!(dst.mode(), RenderMode::Preview);
        assert!(!dst.dirty().is_dirty());
    }

    #[test]
    fn copy_transients_carries_only_the_target() {
        let mut src = Scene::new("src");
        src.set_canvas_size(1920, 1080);
        src.set_camera_fov(35.0);
        src.set_exposure(2.5);
        src.set_target_spp(64);

        let mut dst = Scene::new("dst");
        dst.copy_transients(&src);

        assert_eq!(dst.target_spp(), 64);
        // Reset-relevant fields only cross through copy_state.
        assert_eq!(dst.camera().fov, 70.0);
        assert_eq!(dst.exposure(), 1.0);
        assert_eq!(dst.canvas_size(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn description_round_trip() {
        let mut scene = Scene::new("roundtrip");
        scene.set_chunks("overworld", vec![ChunkCoord::new(0, 0), ChunkCoord::new(1, 0)]);
        scene.set_sun_intensity(2.0);
        scene.set_render_progress(120, 45_000);

        let desc = scene.to_description();
        let mut restored = Scene::new("other");
        restored.apply_description(desc);

        assert_eq!(restored.name(), "roundtrip");
        assert_eq!(restored.world(), Some("overworld"));
        assert_eq!(restored.chunks().len(), 2);
        assert_eq!(restored.spp(), 120);
        assert_eq!(restored.render_time_ms(), 45_000);
        assert_eq!(restored.sun().intensity, 2.0);
    }

    #[test]
    fn clear_keeps_name() {
        let mut scene = Scene::new("keepme");
        scene.set_chunks("overworld", vec![ChunkCoord::new(4, 4)]);
        scene.clear();
        assert_eq!(scene.name(), "keepme");
        assert!(scene.chunks().is_empty());
        assert!(scene.world().is_none());
    }
}

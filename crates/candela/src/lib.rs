//! # CANDELA
//!
//! Progressive renderer front-end. The editable scene configuration is
//! mutated by user-driven edits while a long-running render loop
//! consumes snapshots of it; the [`candela_sync::SceneSync`] core
//! arbitrates the handoff so neither side stalls the other and no
//! render is silently discarded.
//!
//! This crate is the wiring layer: configuration, controller
//! construction and the headless binary. The interesting concurrency
//! lives in `candela_sync`.

pub mod config;
pub mod controller;

pub use config::{CandelaConfig, ConfigError};
pub use controller::RenderController;

pub use candela_render::{
    FrameRenderer, PreviewRenderer, RenderLoopConfig, SharedRenderStatus,
};
pub use candela_scene::{Camera, RenderMode, ResetReason, Scene, Sun, Vector3};
pub use candela_sync::{
    EventBus, GracePeriodPolicy, LoadError, RenderStatus, SaveError, SceneEvent, SceneSync,
    StatusSource,
};

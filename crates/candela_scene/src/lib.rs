//! # CANDELA Scene Model
//!
//! The configuration shape shared by the two scene generations:
//! the *editable* scene (user-mutable) and the *snapshot* scene
//! (what the renderer is currently using).
//!
//! ## Architecture Rules
//!
//! 1. **Pure data** - no locks in this crate; all concurrent access is
//!    serialized by `candela_sync`
//! 2. **Setters mark dirty** - every mutating setter records the reset
//!    reason it implies, so an edit can never be silently lost
//! 3. **Whole-generation copies** - `copy_state` transfers every
//!    reset-relevant field in one call, so a handoff is never torn

pub mod camera;
pub mod chunk;
pub mod scene;
pub mod state;
pub mod sun;

pub use camera::{Camera, Vector3};
pub use chunk::{ChunkCoord, ChunkGeometry, ChunkLoadError, NullProgress, ProgressSink};
pub use scene::{Scene, SceneDescription};
pub use state::{DirtyState, RenderMode, ResetReason};
pub use sun::Sun;

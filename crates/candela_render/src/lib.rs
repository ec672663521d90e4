//! # CANDELA Render Loop
//!
//! The compute-side consumer of the scene state synchronizer. The loop
//! blocks on the synchronizer, applies each returned reset reason to
//! its private scene copy, and drives a pluggable [`FrameRenderer`]
//! through accumulation passes.
//!
//! ## State machine
//!
//! ```text
//!            SceneLoaded / SettingsChanged / MaterialsChanged
//!                  │  (reset accumulation to zero)
//!                  ▼
//!   ┌─────────┐  passes  ┌───────────┐   ModeChange    ┌────────┐
//!   │ Preview │─────────>│ Rendering │<───────────────>│ Paused │
//!   └─────────┘          └───────────┘ (samples survive)└────────┘
//! ```

pub mod render_loop;
pub mod renderer;
pub mod status;

pub use render_loop::{RenderLoop, RenderLoopConfig, RenderLoopHandle};
pub use renderer::{FrameRenderer, PreviewRenderer};
pub use status::SharedRenderStatus;

//! # CANDELA Scene State Synchronizer
//!
//! Safe, race-free handoff of a mutable scene configuration between an
//! edit-side context (UI, scripting) and a render loop that runs at its
//! own pace, potentially for hours.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   edit()    ┌──────────────────────────┐
//! │ UI thread  │────────────>│        SceneSync         │
//! └────────────┘             │                          │
//! ┌────────────┐             │  ┌────────┐  ┌────────┐  │
//! │ Scripting  │────────────>│  │Editable│=>│Snapshot│  │
//! └────────────┘             │  └────────┘  └────────┘  │
//!                            │       handoff            │
//! ┌────────────┐ await_change│            ▲             │
//! │ RenderLoop │<────────────│    policy gate           │
//! └────────────┘             └──────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! 1. **Edits are never lost or torn** - every mutating edit marks a
//!    reset reason; all reset-relevant fields cross in one critical
//!    section
//! 2. **The renderer never sees a half-updated scene** - it only reads
//!    the snapshot generation, which is only written during a handoff
//! 3. **Expensive renders are not silently discarded** - a policy gate
//!    with a configurable grace period interposes user confirmation

pub mod error;
pub mod event;
pub mod policy;
pub mod status;
pub mod store;
pub mod sync;

pub use error::{LoadError, SaveError};
pub use event::{EventBus, SceneEvent};
pub use policy::{AlwaysAllow, GracePeriodPolicy, RefreshPolicy};
pub use status::{IdleStatus, RenderStatus, StatusSource};
pub use store::{FsSceneStore, SceneStore};
pub use sync::SceneSync;

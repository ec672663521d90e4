//! # Chunk Geometry Boundary
//!
//! The region-file-backed chunk loader is an external collaborator.
//! This module only defines the boundary: chunk coordinates held by the
//! scene, the loader trait, and a progress-reporting interface so a UI
//! can show a bar while geometry streams in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column coordinate of a loaded chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// Chunk X coordinate.
    pub x: i32,
    /// Chunk Z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    #[must_use]
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Errors from the chunk loading collaborator.
#[derive(Error, Debug)]
pub enum ChunkLoadError {
    /// The named world directory does not exist or is not a world.
    #[error("world not found: {0}")]
    WorldNotFound(String),
    /// A requested chunk is missing from the region files.
    #[error("chunk ({x}, {z}) missing from world")]
    ChunkMissing {
        /// Chunk X coordinate.
        x: i32,
        /// Chunk Z coordinate.
        z: i32,
    },
    /// Underlying I/O failure while reading region data.
    #[error("chunk read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Progress reporting for long-running loads.
///
/// Implementations must be cheap; this is called per chunk.
pub trait ProgressSink: Send + Sync {
    /// Reports `done` of `total` units finished for `task`.
    fn progress(&self, task: &str, done: usize, total: usize);
}

/// Progress sink that discards all reports.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn progress(&self, _task: &str, _done: usize, _total: usize) {}
}

/// The chunk loading collaborator.
///
/// The synchronizer calls this with the editable scene lock held, so
/// implementations must not call back into the synchronizer.
pub trait ChunkGeometry: Send + Sync {
    /// Loads the given chunks from `world` into renderer-side geometry,
    /// reporting progress per chunk.
    ///
    /// Returns the world-space center of the loaded region, used to
    /// recenter the camera on fresh loads.
    fn load_chunks(
        &self,
        world: &str,
        chunks: &[ChunkCoord],
        progress: &dyn ProgressSink,
    ) -> Result<crate::camera::Vector3, ChunkLoadError>;
}

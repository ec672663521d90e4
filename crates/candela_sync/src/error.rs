//! # Synchronizer Error Types
//!
//! Collaborator failures surfaced by load/save operations. The
//! synchronizer itself never fails except through these; policy
//! rejection is not an error (the edit is held, not lost).

use candela_scene::ChunkLoadError;
use thiserror::Error;

/// Errors from loading a scene or its geometry.
///
/// On any load failure the editable scene is left unchanged: the store
/// validates the whole description before a single field is applied.
#[derive(Error, Debug)]
pub enum LoadError {
    /// No scene with the given name exists in the store.
    #[error("scene not found: {0}")]
    NotFound(String),

    /// The scene description exists but cannot be parsed.
    #[error("invalid scene description: {0}")]
    Parse(#[from] toml::de::Error),

    /// Underlying I/O failure while reading the description.
    #[error("failed to read scene: {0}")]
    Io(#[from] std::io::Error),

    /// The chunk geometry collaborator failed.
    #[error("chunk loading failed: {0}")]
    Chunks(#[from] ChunkLoadError),
}

/// Errors from persisting a scene.
///
/// Save is a pure read of the snapshot plus the render status; the
/// snapshot is left untouched on failure.
#[derive(Error, Debug)]
pub enum SaveError {
    /// The description could not be encoded.
    #[error("failed to encode scene description: {0}")]
    Encode(#[from] toml::ser::Error),

    /// Underlying I/O failure while writing.
    #[error("failed to write scene: {0}")]
    Io(#[from] std::io::Error),
}

//! # Scene Store
//!
//! The persistence collaborator boundary, plus a TOML filesystem
//! implementation. The store validates a whole description before the
//! synchronizer applies any of it, which is what makes `load_scene`
//! all-or-nothing.

use std::fs;
use std::path::PathBuf;

use candela_scene::SceneDescription;

use crate::error::{LoadError, SaveError};

/// Persistence collaborator for scene descriptions.
pub trait SceneStore: Send + Sync {
    /// Loads and fully validates the named description.
    fn load(&self, name: &str) -> Result<SceneDescription, LoadError>;

    /// Persists a description under the given name.
    fn save(&self, desc: &SceneDescription, name: &str) -> Result<(), SaveError>;
}

/// Directory-backed store: one TOML document per scene.
pub struct FsSceneStore {
    dir: PathBuf,
}

impl FsSceneStore {
    /// Creates a store rooted at `dir`. The directory is created on
    /// first save, not here.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.toml"))
    }
}

impl SceneStore for FsSceneStore {
    fn load(&self, name: &str) -> Result<SceneDescription, LoadError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(LoadError::NotFound(name.to_owned()));
        }
        let text = fs::read_to_string(&path)?;
        let desc = toml::from_str(&text)?;
        tracing::info!(scene = name, "scene description loaded");
        Ok(desc)
    }

    fn save(&self, desc: &SceneDescription, name: &str) -> Result<(), SaveError> {
        fs::create_dir_all(&self.dir)?;
        let text = toml::to_string_pretty(desc)?;

        // Write-then-rename so a crash never leaves a torn description.
        let tmp = self.dir.join(format!("{name}.toml.tmp"));
        fs::write(&tmp, text)?;
        fs::rename(&tmp, self.path_for(name))?;
        tracing::info!(scene = name, "scene description saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candela_scene::Scene;

    fn temp_store(tag: &str) -> FsSceneStore {
        let dir = std::env::temp_dir().join(format!("candela_store_{tag}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        FsSceneStore::new(dir)
    }

    #[test]
    fn round_trips_a_description() {
        let store = temp_store("roundtrip");
        let mut scene = Scene::new("test");
        scene.set_canvas_size(640, 360);
        scene.set_render_progress(120, 42_000);

        store.save(&scene.to_description(), "test").unwrap();
        let loaded = store.load("test").unwrap();

        assert_eq!(loaded.name, "test");
        assert_eq!((loaded.width, loaded.height), (640, 360));
        assert_eq!(loaded.spp, 120);
        assert_eq!(loaded.render_time_ms, 42_000);
    }

    #[test]
    fn missing_scene_is_not_found() {
        let store = temp_store("missing");
        assert!(matches!(
            store.load("nope"),
            Err(LoadError::NotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let store = temp_store("garbage");
        fs::create_dir_all(&store.dir).unwrap();
        fs::write(store.path_for("bad"), "not [valid toml").unwrap();
        assert!(matches!(store.load("bad"), Err(LoadError::Parse(_))));
    }
}

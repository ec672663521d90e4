//! # Configuration
//!
//! TOML configuration loaded once at startup. Every field has a
//! default so a missing file or a partial document still yields a
//! usable setup.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors from loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML or has wrong field types.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

fn default_scene_dir() -> PathBuf {
    PathBuf::from("scenes")
}

fn default_grace_period_ms() -> u64 {
    30_000
}

fn default_preview_passes() -> u32 {
    2
}

fn default_idle_wait_ms() -> u64 {
    50
}

fn default_canvas_width() -> u32 {
    candela_scene::scene::DEFAULT_WIDTH
}

fn default_canvas_height() -> u32 {
    candela_scene::scene::DEFAULT_HEIGHT
}

fn default_target_spp() -> u32 {
    candela_scene::scene::DEFAULT_TARGET_SPP
}

/// Startup configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct CandelaConfig {
    /// Directory scene descriptions are stored in.
    #[serde(default = "default_scene_dir")]
    pub scene_dir: PathBuf,
    /// How long a render may run before destructive edits need
    /// confirmation.
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,
    /// Refinement passes per handoff in preview mode.
    #[serde(default = "default_preview_passes")]
    pub preview_passes: u32,
    /// Render loop wakeup interval for shutdown polling.
    #[serde(default = "default_idle_wait_ms")]
    pub idle_wait_ms: u64,
    /// Canvas width for a fresh scene.
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    /// Canvas height for a fresh scene.
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    /// Target sample count for a fresh scene.
    #[serde(default = "default_target_spp")]
    pub target_spp: u32,
}

impl Default for CandelaConfig {
    fn default() -> Self {
        Self {
            scene_dir: default_scene_dir(),
            grace_period_ms: default_grace_period_ms(),
            preview_passes: default_preview_passes(),
            idle_wait_ms: default_idle_wait_ms(),
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            target_spp: default_target_spp(),
        }
    }
}

impl CandelaConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Loads from `path` if it exists, otherwise returns defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.is_file() {
            Self::load(path)
        } else {
            tracing::info!(?path, "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Grace period as a duration.
    #[must_use]
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    /// Idle wait as a duration.
    #[must_use]
    pub fn idle_wait(&self) -> Duration {
        Duration::from_millis(self.idle_wait_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_fills_defaults() {
        let config: CandelaConfig = toml::from_str("grace_period_ms = 5000").unwrap();
        assert_eq!(config.grace_period(), Duration::from_millis(5000));
        assert_eq!(config.scene_dir, PathBuf::from("scenes"));
        assert_eq!(config.preview_passes, 2);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config =
            CandelaConfig::load_or_default(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.grace_period_ms, 30_000);
    }
}

//! # Camera
//!
//! Viewpoint state for the scene. The pose is reset-relevant: any
//! change dirties the editable scene and only reaches the renderer
//! through an accepted handoff, which restarts accumulation.

use serde::{Deserialize, Serialize};

/// Plain 3-component vector, f64 like the rest of the scene math.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vector3 {
    /// Creates a vector from components.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Scene camera: position plus yaw/pitch orientation and field of view.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World-space position.
    pub position: Vector3,
    /// Yaw in radians.
    pub yaw: f64,
    /// Pitch in radians.
    pub pitch: f64,
    /// Vertical field of view in degrees.
    pub fov: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector3::default(),
            yaw: 0.0,
            pitch: 0.0,
            fov: 70.0,
        }
    }
}

impl Camera {
    /// Moves the camera to look down on `center` from a fixed offset.
    ///
    /// Used when fresh chunks are loaded and the previous viewpoint is
    /// meaningless.
    pub fn move_to_center(&mut self, center: Vector3) {
        self.position = Vector3::new(center.x, center.y + 64.0, center.z);
        self.yaw = 0.0;
        self.pitch = -std::f64::consts::FRAC_PI_2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_to_center_looks_down() {
        let mut camera = Camera::default();
        camera.move_to_center(Vector3::new(16.0, 64.0, -32.0));
        assert_eq!(camera.position.x, 16.0);
        assert_eq!(camera.position.y, 128.0);
        assert_eq!(camera.position.z, -32.0);
        assert!(camera.pitch < 0.0);
    }
}

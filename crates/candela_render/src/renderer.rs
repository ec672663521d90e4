//! # Frame Renderer Boundary
//!
//! The actual sample-accumulation algorithm lives behind this trait;
//! the loop only needs reset/pass/read. A small deterministic CPU
//! renderer is provided for previews, tests and the headless binary.

use candela_scene::Scene;

/// A renderer the loop can drive through accumulation passes.
///
/// Implementations own their sample buffer. `reset` is called with the
/// freshly handed-off scene whenever a content reset arrives; passes
/// then refine the same accumulation until the next reset.
pub trait FrameRenderer: Send + 'static {
    /// Discards accumulation and re-targets the given scene.
    fn reset(&mut self, scene: &Scene);

    /// Accumulates one sample per pixel.
    fn render_pass(&mut self, scene: &Scene);

    /// Read access to the accumulated sample buffer as (samples, width,
    /// height); samples are RGB triples averaged over all passes.
    fn with_sample_buffer(&self, f: &mut dyn FnMut(&[f64], u32, u32));
}

/// Deterministic CPU renderer: sky gradient lit by the sun.
///
/// Not a path tracer; it exists so the loop has a real accumulator to
/// drive and so tests can assert on pixel values.
pub struct PreviewRenderer {
    samples: Vec<f64>,
    width: u32,
    height: u32,
    passes: u32,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewRenderer {
    /// Creates an empty renderer; `reset` sizes the buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            width: 0,
            height: 0,
            passes: 0,
        }
    }

    fn shade(&self, x: u32, y: u32, scene: &Scene) -> [f64; 3] {
        // Vertical sky gradient scaled by sun intensity, with a hint of
        // camera yaw so camera edits are visible in tests.
        let v = f64::from(y) / f64::from(self.height.max(1));
        let sun = scene.sun();
        let warm = sun.intensity * (1.0 - v);
        let cool = sun.intensity * v;
        let shift = (f64::from(x) / f64::from(self.width.max(1)) + scene.camera().yaw).sin() * 0.1;
        [
            (warm + shift).max(0.0),
            (0.5 * (warm + cool)).max(0.0),
            (cool - shift).max(0.0),
        ]
    }
}

impl FrameRenderer for PreviewRenderer {
    fn reset(&mut self, scene: &Scene) {
        let (width, height) = scene.canvas_size();
        self.width = width;
        self.height = height;
        self.samples = vec![0.0; (width as usize) * (height as usize) * 3];
        self.passes = 0;
    }

    fn render_pass(&mut self, scene: &Scene) {
        let prior = f64::from(self.passes);
        let next = prior + 1.0;
        for y in 0..self.height {
            for x in 0..self.width {
                let rgb = self.shade(x, y, scene);
                let idx = ((y * self.width + x) as usize) * 3;
                for c in 0..3 {
                    // Running average over passes.
                    self.samples[idx + c] = (self.samples[idx + c] * prior + rgb[c]) / next;
                }
            }
        }
        self.passes += 1;
    }

    fn with_sample_buffer(&self, f: &mut dyn FnMut(&[f64], u32, u32)) {
        f(&self.samples, self.width, self.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_sizes_buffer_to_canvas() {
        let mut scene = Scene::new("t");
        scene.set_canvas_size(8, 4);

        let mut renderer = PreviewRenderer::new();
        renderer.reset(&scene);
        renderer.with_sample_buffer(&mut |samples, w, h| {
            assert_eq!((w, h), (8, 4));
            assert_eq!(samples.len(), 8 * 4 * 3);
        });
    }

    #[test]
    fn passes_converge_to_stable_average() {
        let mut scene = Scene::new("t");
        scene.set_canvas_size(4, 4);

        let mut renderer = PreviewRenderer::new();
        renderer.reset(&scene);
        renderer.render_pass(&scene);
        let mut first = Vec::new();
        renderer.with_sample_buffer(&mut |samples, _, _| first = samples.to_vec());

        // The shading is deterministic, so more passes of the same
        // scene keep the same average.
        renderer.render_pass(&scene);
        renderer.with_sample_buffer(&mut |samples, _, _| {
            for (a, b) in samples.iter().zip(&first) {
                assert!((a - b).abs() < 1e-9);
            }
        });
    }

    #[test]
    fn sun_intensity_changes_the_image() {
        let mut scene = Scene::new("t");
        scene.set_canvas_size(4, 4);

        let mut renderer = PreviewRenderer::new();
        renderer.reset(&scene);
        renderer.render_pass(&scene);
        let mut dim = 0.0;
        renderer.with_sample_buffer(&mut |samples, _, _| dim = samples.iter().sum());

        scene.set_sun_intensity(10.0);
        renderer.reset(&scene);
        renderer.render_pass(&scene);
        let mut bright = 0.0;
        renderer.with_sample_buffer(&mut |samples, _, _| bright = samples.iter().sum());

        assert!(bright > dim);
    }
}

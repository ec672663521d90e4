//! # Handoff Benchmark
//!
//! Measures the edit -> handoff hot path: how quickly a dirty editable
//! scene can be copied into the snapshot generation, and the cost of an
//! edit critical section under contention-free conditions.

#![allow(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parking_lot::Mutex;

use candela_scene::{ChunkCoord, SceneDescription, Vector3};
use candela_sync::{
    IdleStatus, LoadError, SaveError, SceneStore, SceneSync,
};

#[derive(Default)]
struct MemStore {
    scenes: Mutex<HashMap<String, SceneDescription>>,
}

impl SceneStore for MemStore {
    fn load(&self, name: &str) -> Result<SceneDescription, LoadError> {
        self.scenes
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(name.to_owned()))
    }

    fn save(&self, desc: &SceneDescription, name: &str) -> Result<(), SaveError> {
        self.scenes.lock().insert(name.to_owned(), desc.clone());
        Ok(())
    }
}

fn bench_sync() -> SceneSync {
    SceneSync::new(Arc::new(MemStore::default()), Arc::new(IdleStatus))
}

fn bench_edit_and_handoff(c: &mut Criterion) {
    let mut group = c.benchmark_group("handoff");

    for chunk_count in [0usize, 256, 4096] {
        let sync = bench_sync();
        let chunks: Vec<_> = (0..chunk_count)
            .map(|i| ChunkCoord::new(i as i32, -(i as i32)))
            .collect();
        sync.edit(|scene| {
            if !chunks.is_empty() {
                scene.set_chunks("bench", chunks.clone());
            }
        });
        // Drain the seeding edit.
        let _ = sync.await_change_timeout(std::time::Duration::ZERO);

        group.bench_function(format!("edit_then_handoff_{chunk_count}_chunks"), |b| {
            let mut x = 0.0f64;
            b.iter(|| {
                x += 1.0;
                sync.edit(|scene| scene.set_camera_position(Vector3::new(x, x, x)));
                black_box(sync.await_change());
            });
        });
    }

    group.finish();
}

fn bench_poll_clean(c: &mut Criterion) {
    let sync = bench_sync();
    c.bench_function("poll_change_clean", |b| {
        b.iter(|| black_box(sync.poll_change()));
    });
}

criterion_group!(benches, bench_edit_and_handoff, bench_poll_clean);
criterion_main!(benches);

//! Headless renderer: load a saved scene, render to its target sample
//! count, save the result back.
//!
//! ```text
//! candela_headless <scene-name> [config.toml]
//! ```

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use candela::{CandelaConfig, PreviewRenderer, RenderController, RenderMode, StatusSource};

fn main() -> ExitCode {
    tracing_subscriber::fmt().init();

    let mut args = std::env::args().skip(1);
    let Some(scene_name) = args.next() else {
        tracing::error!("usage: candela_headless <scene-name> [config.toml]");
        return ExitCode::FAILURE;
    };
    let config_path = args.next().unwrap_or_else(|| "candela.toml".to_owned());

    let config = match CandelaConfig::load_or_default(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let controller = match RenderController::start(&config, PreviewRenderer::new()) {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!("could not start render loop: {e}");
            return ExitCode::FAILURE;
        }
    };
    let sync = controller.scene_sync().clone();

    if let Err(e) = sync.load_scene(&scene_name) {
        tracing::error!("could not load scene {scene_name}: {e}");
        controller.shutdown();
        return ExitCode::FAILURE;
    }
    sync.edit(|scene| scene.set_mode(RenderMode::Rendering));

    // Rendering runs on the loop thread; poll progress here.
    let target = sync.with_snapshot(|snap| snap.target_spp());
    loop {
        let status = controller.status().status();
        tracing::info!(
            spp = status.spp,
            target,
            sps = status.sps,
            "rendering"
        );
        if status.spp >= target {
            break;
        }
        std::thread::sleep(Duration::from_millis(500));
    }

    if let Err(e) = sync.save_scene(&scene_name) {
        tracing::error!("could not save scene {scene_name}: {e}");
        controller.shutdown();
        return ExitCode::FAILURE;
    }

    controller.shutdown();
    ExitCode::SUCCESS
}

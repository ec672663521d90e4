//! End-to-end session tests: controller wiring, render-to-target,
//! persistence round trip, and the reset confirmation flow.

use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use candela::{
    CandelaConfig, PreviewRenderer, RenderController, RenderMode, SceneEvent, StatusSource,
};

fn test_config(tag: &str, grace_period_ms: u64) -> CandelaConfig {
    CandelaConfig {
        scene_dir: std::env::temp_dir().join(format!("candela_session_{tag}_{}", std::process::id())),
        grace_period_ms,
        preview_passes: 1,
        idle_wait_ms: 10,
        ..CandelaConfig::default()
    }
}

fn wait_for_spp(controller: &RenderController<PreviewRenderer>, target: u32) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if controller.status().status().spp >= target {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("timed out waiting for {target} spp");
}

fn expect_event(rx: &Receiver<SceneEvent>, pred: impl Fn(&SceneEvent) -> bool) -> SceneEvent {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if let Ok(event) = rx.recv_timeout(Duration::from_millis(100)) {
            if pred(&event) {
                return event;
            }
        }
    }
    panic!("expected event did not arrive");
}

#[test]
fn render_save_load_round_trip() {
    let config = test_config("roundtrip", 60_000);
    let controller = RenderController::start(&config, PreviewRenderer::new()).expect("start");
    let sync = controller.scene_sync().clone();
    let events = controller.events().subscribe();

    sync.edit(|scene| {
        scene.set_canvas_size(8, 8);
        scene.set_target_spp(3);
        scene.set_mode(RenderMode::Rendering);
    });
    wait_for_spp(&controller, 3);

    controller.with_sample_buffer(&mut |samples, w, h| {
        assert_eq!((w, h), (8, 8));
        assert!(samples.iter().any(|&s| s > 0.0));
    });

    sync.save_scene("demo").expect("save");
    expect_event(&events, |e| matches!(e, SceneEvent::SceneSaved { name } if name == "demo"));

    // Saved progress reflects what was actually rendered.
    let reloaded = sync.load_scene("demo");
    assert!(reloaded.is_ok());
    expect_event(&events, |e| matches!(e, SceneEvent::SceneLoaded { name } if name == "demo"));
    sync.edit(|scene| assert_eq!(scene.spp(), 3));

    controller.shutdown();
}

#[test]
fn destructive_edits_need_confirmation_past_grace() {
    // Zero grace: every non-forced reset needs confirmation.
    let config = test_config("confirm", 0);
    let controller = RenderController::start(&config, PreviewRenderer::new()).expect("start");
    let sync = controller.scene_sync().clone();
    let events = controller.events().subscribe();

    // Even the initial setup edit is gated; force it through.
    sync.edit(|scene| {
        scene.set_canvas_size(8, 8);
        scene.set_target_spp(2);
        scene.set_mode(RenderMode::Rendering);
    });
    expect_event(&events, |e| matches!(e, SceneEvent::ResetConfirmRequested));
    controller.confirm_reset();
    wait_for_spp(&controller, 2);

    // A destructive edit mid-session raises a fresh request.
    sync.edit(|scene| scene.set_sun_intensity(9.0));
    expect_event(&events, |e| matches!(e, SceneEvent::ResetConfirmRequested));

    // Rejecting rolls the editable scene back to the rendered state.
    controller.reject_reset();
    sync.edit(|scene| {
        assert_eq!(scene.sun().intensity, 1.25);
        assert!(!scene.dirty().is_dirty());
    });

    controller.shutdown();
}

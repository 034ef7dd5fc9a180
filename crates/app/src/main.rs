//! Vitrine demo shell
//!
//! Plays the part of the host engine: spawns the headless collaborator's
//! render loop, registers the bridge plugin, and runs one surface through its
//! full lifecycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{error, info, warn};
use vitrine_bridge::{
    BridgePlugin, EnginePlugin, NodePath, RenderEventListener, SceneBackend, SurfaceBridge,
    SurfaceView,
};
use vitrine_config::BridgeConfig;
use vitrine_ipc::InputEvent;
use vitrine_scene::{HeadlessScene, RenderLoop};

/// Stands in for a view that would repaint its pixels into the bound texture:
/// tallies the frame callbacks it receives.
#[derive(Default)]
struct FrameCounter {
    frames: AtomicUsize,
    ticks: AtomicUsize,
}

impl RenderEventListener for FrameCounter {
    fn on_render_process(&self, _node_path: &NodePath, _delta: f32) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    fn on_render_draw_frame(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    fn on_input_press(&self, node_path: &NodePath, x_pct: f32, y_pct: f32) {
        info!("press on {} at ({:.2}, {:.2})", node_path, x_pct, y_pct);
    }
}

fn load_config() -> BridgeConfig {
    match std::env::var("VITRINE_CONFIG") {
        Ok(path) => BridgeConfig::load(&path).unwrap_or_else(|err| {
            warn!("failed to load config from {path}: {err}, using defaults");
            BridgeConfig::default()
        }),
        Err(_) => BridgeConfig::default(),
    }
}

fn main() {
    env_logger::init();

    let config = load_config();
    info!(
        "starting vitrine shell ({}x{} surfaces at {} fps)",
        config.surface.width, config.surface.height, config.frame.target_fps
    );

    let scene = Arc::new(HeadlessScene::new());
    let backend: Arc<dyn SceneBackend> = scene.clone();
    let bridge = Arc::new(SurfaceBridge::new(backend));
    let render_loop = RenderLoop::spawn(
        Arc::clone(&scene),
        bridge.dispatcher(),
        config.frame.frame_delta(),
    );

    let mut plugin = BridgePlugin::new(Arc::clone(&bridge));
    info!("registered plugin '{}'", plugin.plugin_name());
    plugin.on_main_loop_started();

    let counter = Arc::new(FrameCounter::default());
    bridge.add_event_listener(counter.clone());

    let quad = match bridge.surfaces().acquire_and_bind_quad(&scene.root_path()) {
        Ok(quad) => quad,
        Err(err) => {
            error!("failed to acquire surface quad: {err}");
            return;
        }
    };
    match bridge.surfaces().external_texture_id(&quad, None) {
        Ok(texture_id) => info!("surface {} backed by texture {}", quad, texture_id),
        Err(err) => warn!("texture query failed: {err}"),
    }

    let root_view = plugin.on_main_create_view();
    root_view.attach(SurfaceView::with_size(
        quad.clone(),
        config.surface.width,
        config.surface.height,
    ));

    let updates = [
        bridge
            .surfaces()
            .set_quad_size(&quad, config.surface.aspect_ratio(), 1.0),
        bridge.surfaces().set_local_translation(&quad, 0.0, 1.5, -2.0),
        bridge.surfaces().set_visibility(&quad, false, true),
    ];
    for result in updates {
        if let Err(err) = result {
            warn!("scene update failed: {err}");
        }
    }

    match InputEvent::press(quad.as_str(), 0.5, 0.5) {
        Ok(event) => scene.push_input(event),
        Err(err) => warn!("bad input event: {err}"),
    }

    // Let the render loop run for a moment before tearing down.
    thread::sleep(Duration::from_millis(250));
    info!(
        "rendered {} frames, {} process ticks",
        counter.frames.load(Ordering::Relaxed),
        counter.ticks.load(Ordering::Relaxed)
    );

    plugin.root_view_mut().detach(&quad);
    if let Err(err) = bridge.surfaces().unbind_and_release_quad(&quad) {
        warn!("failed to release surface quad: {err}");
    }
    plugin.on_main_destroy();
    render_loop.stop();
    info!("shell exited cleanly");
}

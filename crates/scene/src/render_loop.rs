//! Frame driver standing in for the engine's render thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};
use vitrine_bridge::RenderLoopDispatcher;

use crate::headless::HeadlessScene;

/// Drives the render thread the way the native engine would: per frame, one
/// `begin_frame`, queued input, a process tick per bound node, then the
/// draw-frame notification.
pub struct RenderLoop {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RenderLoop {
    /// Spawn the render thread at the given frame interval.
    pub fn spawn(
        scene: Arc<HeadlessScene>,
        dispatcher: RenderLoopDispatcher,
        frame_delta: Duration,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("render".into())
            .spawn(move || {
                let delta = frame_delta.as_secs_f32();
                while flag.load(Ordering::Acquire) {
                    dispatcher.begin_frame();
                    for event in scene.drain_input() {
                        dispatcher.dispatch_input(&event);
                    }
                    for path in scene.bound_paths() {
                        dispatcher.dispatch_process(&path, delta);
                    }
                    dispatcher.dispatch_draw_frame();
                    thread::sleep(frame_delta);
                }
                dispatcher.close();
                debug!("render loop exited");
            })
            .expect("failed to spawn render thread");
        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop after the current frame and join the thread.
    ///
    /// Call this after the bridge has stopped. The exiting loop closes the
    /// marshaling queue, so a bridge call that arrives too late fails with
    /// `RenderThreadGone` rather than blocking.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("render thread panicked");
        }
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

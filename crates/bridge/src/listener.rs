//! Per-frame event listeners and their registry.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error};
use vitrine_ipc::InputEvent;

use crate::node::NodePath;

/// Subscriber to events dispatched by the surface bridge.
///
/// All callbacks are invoked on the render thread. Implementations that need
/// to touch UI-thread state must hand that work off themselves.
pub trait RenderEventListener: Send + Sync {
    /// Forward of a bound node's per-frame process tick, carrying the frame
    /// delta in seconds.
    fn on_render_process(&self, node_path: &NodePath, delta: f32);

    /// Fired once per frame after scene rendering completes.
    fn on_render_draw_frame(&self);

    /// Pointer hover over a bound surface, in `[0, 1]` surface coordinates.
    fn on_input_hover(&self, _node_path: &NodePath, _x_pct: f32, _y_pct: f32) {}

    /// Pointer press on a bound surface.
    fn on_input_press(&self, _node_path: &NodePath, _x_pct: f32, _y_pct: f32) {}

    /// Pointer release over a bound surface.
    fn on_input_release(&self, _node_path: &NodePath, _x_pct: f32, _y_pct: f32) {}
}

/// Thread-safe set of render event listeners.
///
/// `add`/`remove` are safe from any thread while a dispatch pass is iterating
/// on the render thread. Dispatch walks a snapshot, so a listener added
/// mid-pass may or may not be visited in that pass, and iteration order is
/// unspecified. Listener identity is `Arc` pointer identity.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: RwLock<Vec<Arc<dyn RenderEventListener>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. A pointer-identity duplicate is ignored, so a
    /// double add never double-dispatches.
    pub fn add(&self, listener: Arc<dyn RenderEventListener>) {
        let mut listeners = self.listeners.write();
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            debug!("listener already registered, ignoring duplicate add");
            return;
        }
        listeners.push(listener);
    }

    /// Remove a previously registered listener; no-op when absent.
    pub fn remove(&self, listener: &Arc<dyn RenderEventListener>) {
        self.listeners.write().retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Invoke `on_render_process` on every registered listener.
    pub fn dispatch_process(&self, node_path: &NodePath, delta: f32) {
        for listener in self.snapshot() {
            guarded("process", || listener.on_render_process(node_path, delta));
        }
    }

    /// Invoke `on_render_draw_frame` on every registered listener.
    pub fn dispatch_draw_frame(&self) {
        for listener in self.snapshot() {
            guarded("draw-frame", || listener.on_render_draw_frame());
        }
    }

    /// Route an input event to the matching listener hook.
    pub fn dispatch_input(&self, event: &InputEvent) {
        let node_path = NodePath::from(event.node_path());
        for listener in self.snapshot() {
            guarded("input", || match *event {
                InputEvent::Hover { x_pct, y_pct, .. } => {
                    listener.on_input_hover(&node_path, x_pct, y_pct)
                }
                InputEvent::Press { x_pct, y_pct, .. } => {
                    listener.on_input_press(&node_path, x_pct, y_pct)
                }
                InputEvent::Release { x_pct, y_pct, .. } => {
                    listener.on_input_release(&node_path, x_pct, y_pct)
                }
            });
        }
    }

    fn snapshot(&self) -> Vec<Arc<dyn RenderEventListener>> {
        self.listeners.read().clone()
    }
}

/// One listener's panic must not starve the rest of the pass.
fn guarded(pass: &str, f: impl FnOnce()) {
    if panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
        error!("listener panicked during {pass} dispatch, continuing with remaining listeners");
    }
}

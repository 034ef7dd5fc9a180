//! The surface bridge itself.

use std::sync::Arc;

use crate::binding::SurfaceBindings;
use crate::dispatch::RenderLoopDispatcher;
use crate::error::BridgeError;
use crate::lifecycle::{LifecycleController, LifecycleState};
use crate::listener::{ListenerRegistry, RenderEventListener};
use crate::scene::SceneBackend;
use crate::tasks::RenderTaskQueue;

/// The cross-thread resource-binding and event-dispatch bridge.
///
/// Owns the listener registry, the binding state machine, and the lifecycle
/// controller; the collaborator drives it through the
/// [`RenderLoopDispatcher`] handle. Constructed once by the host shell and
/// tied to that shell's lifetime.
pub struct SurfaceBridge {
    listeners: Arc<ListenerRegistry>,
    lifecycle: Arc<LifecycleController>,
    surfaces: SurfaceBindings,
    tasks: RenderTaskQueue,
}

impl SurfaceBridge {
    pub fn new(backend: Arc<dyn SceneBackend>) -> Self {
        let tasks = RenderTaskQueue::new();
        let listeners = Arc::new(ListenerRegistry::new());
        let lifecycle = Arc::new(LifecycleController::new(
            Arc::clone(&backend),
            tasks.clone(),
        ));
        let surfaces = SurfaceBindings::new(backend, tasks.clone(), Arc::clone(&lifecycle));
        Self {
            listeners,
            lifecycle,
            surfaces,
            tasks,
        }
    }

    /// Dispatcher handle for the collaborator's render loop.
    pub fn dispatcher(&self) -> RenderLoopDispatcher {
        RenderLoopDispatcher::new(
            Arc::clone(&self.listeners),
            self.tasks.clone(),
            Arc::clone(&self.lifecycle),
        )
    }

    /// Subscribe to per-frame bridge events.
    pub fn add_event_listener(&self, listener: Arc<dyn RenderEventListener>) {
        self.listeners.add(listener);
    }

    /// Unsubscribe a previously added listener; no-op when absent.
    pub fn remove_event_listener(&self, listener: &Arc<dyn RenderEventListener>) {
        self.listeners.remove(listener);
    }

    /// Binding state machine and scene-graph pass-throughs.
    pub fn surfaces(&self) -> &SurfaceBindings {
        &self.surfaces
    }

    /// Initialize the collaborator; see [`LifecycleController::start`].
    pub fn start(&self) -> Result<(), BridgeError> {
        self.lifecycle.start()
    }

    /// Tear the collaborator down; see [`LifecycleController::stop`].
    pub fn stop(&self) -> Result<(), BridgeError> {
        self.lifecycle.stop()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

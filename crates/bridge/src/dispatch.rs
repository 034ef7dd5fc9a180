//! Per-frame dispatch entry points for the render loop.

use std::sync::Arc;

use tracing::trace;
use vitrine_ipc::InputEvent;

use crate::lifecycle::LifecycleController;
use crate::listener::ListenerRegistry;
use crate::node::NodePath;
use crate::tasks::RenderTaskQueue;

/// Handle the collaborator's render loop drives once per frame.
///
/// Expected call pattern, all on the render thread: one `begin_frame`, any
/// number of process and input dispatches, then exactly one
/// `dispatch_draw_frame` after scene rendering completes. Handles are cheap
/// clones of the same bridge state.
#[derive(Clone)]
pub struct RenderLoopDispatcher {
    listeners: Arc<ListenerRegistry>,
    tasks: RenderTaskQueue,
    lifecycle: Arc<LifecycleController>,
}

impl RenderLoopDispatcher {
    pub(crate) fn new(
        listeners: Arc<ListenerRegistry>,
        tasks: RenderTaskQueue,
        lifecycle: Arc<LifecycleController>,
    ) -> Self {
        Self {
            listeners,
            tasks,
            lifecycle,
        }
    }

    /// Drain work marshaled from other threads.
    ///
    /// Teardown scheduled by `stop()` executes here, which is what orders it
    /// after the previous frame's dispatch passes without a separate lock.
    pub fn begin_frame(&self) {
        let drained = self.tasks.pump();
        if drained > 0 {
            trace!("drained {} marshaled tasks", drained);
        }
    }

    /// Close the marshaling queue when the render loop exits.
    ///
    /// Marshaled calls issued afterwards fail with `RenderThreadGone`
    /// instead of blocking on a pump that will never come; callers already
    /// blocked are released the same way.
    pub fn close(&self) {
        self.tasks.close();
    }

    /// Forward one bound node's process tick. The collaborator decides how
    /// many of these occur per frame; the dispatcher imposes no rate limit.
    pub fn dispatch_process(&self, node_path: &NodePath, delta: f32) {
        if !self.lifecycle.state().accepts_dispatch() {
            trace!("process dispatch skipped, bridge not running");
            return;
        }
        self.listeners.dispatch_process(node_path, delta);
    }

    /// Forward the draw-frame notification.
    pub fn dispatch_draw_frame(&self) {
        if !self.lifecycle.state().accepts_dispatch() {
            trace!("draw-frame dispatch skipped, bridge not running");
            return;
        }
        self.listeners.dispatch_draw_frame();
    }

    /// Forward a pointer event against a bound surface.
    pub fn dispatch_input(&self, event: &InputEvent) {
        if !self.lifecycle.state().accepts_dispatch() {
            trace!("input dispatch skipped, bridge not running");
            return;
        }
        self.listeners.dispatch_input(event);
    }
}

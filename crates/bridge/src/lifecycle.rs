//! Process-wide bridge lifecycle.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::BridgeError;
use crate::scene::SceneBackend;
use crate::tasks::RenderTaskQueue;

/// Lifecycle states of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Running,
    ShuttingDown,
    Stopped,
}

impl LifecycleState {
    /// Whether per-frame dispatch may proceed in this state.
    pub(crate) fn accepts_dispatch(self) -> bool {
        matches!(self, Self::Running | Self::ShuttingDown)
    }
}

/// Orchestrates collaborator initialize/shutdown, guaranteeing both execute
/// under the render-thread affinity the native resources were created with.
pub struct LifecycleController {
    backend: Arc<dyn SceneBackend>,
    tasks: RenderTaskQueue,
    state: Mutex<LifecycleState>,
}

impl LifecycleController {
    pub(crate) fn new(backend: Arc<dyn SceneBackend>, tasks: RenderTaskQueue) -> Self {
        Self {
            backend,
            tasks,
            state: Mutex::new(LifecycleState::Uninitialized),
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    pub(crate) fn ensure_running(&self) -> Result<(), BridgeError> {
        let state = self.state();
        if state == LifecycleState::Running {
            Ok(())
        } else {
            Err(BridgeError::InvalidState { state })
        }
    }

    /// Initialize the collaborator on the render thread; blocks until done.
    ///
    /// Invoked once when the host's main loop begins. Not re-entrant: a
    /// second call fails with `InvalidState`.
    pub fn start(&self) -> Result<(), BridgeError> {
        {
            let state = self.state.lock();
            if *state != LifecycleState::Uninitialized {
                return Err(BridgeError::InvalidState { state: *state });
            }
        }
        info!("starting surface bridge");
        let backend = Arc::clone(&self.backend);
        self.tasks.call(move || backend.initialize())?;
        *self.state.lock() = LifecycleState::Running;
        Ok(())
    }

    /// Shut the collaborator down on the render thread; blocks until done.
    ///
    /// The state moves to `ShuttingDown` before the teardown task is queued,
    /// so no new binding operation can slip in ahead of it; frame work
    /// already queued on the render thread still drains first.
    pub fn stop(&self) -> Result<(), BridgeError> {
        {
            let mut state = self.state.lock();
            if *state != LifecycleState::Running {
                return Err(BridgeError::InvalidState { state: *state });
            }
            *state = LifecycleState::ShuttingDown;
        }
        info!("shutting down surface bridge");
        let backend = Arc::clone(&self.backend);
        self.tasks.call(move || backend.shutdown())?;
        *self.state.lock() = LifecycleState::Stopped;
        debug!("surface bridge stopped");
        Ok(())
    }
}

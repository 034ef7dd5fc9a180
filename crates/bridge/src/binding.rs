//! Surface binding state machine.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::error::BridgeError;
use crate::lifecycle::LifecycleController;
use crate::node::NodePath;
use crate::scene::SceneBackend;
use crate::tasks::RenderTaskQueue;

/// Live association between a UI-backed pixel surface and a scene-graph mesh
/// node plus its GPU texture handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceBinding {
    pub node_path: NodePath,
    /// Parent the node was acquired under; `None` when the mesh was created
    /// outside the bridge and bound after the fact.
    pub parent_path: Option<NodePath>,
    /// Texture handle recorded at bind time, valid until unbind.
    pub texture_id: i32,
    /// Surface slot the recorded handle belongs to; `None` is the default
    /// slot.
    pub surface_index: Option<u32>,
}

/// The create/bind/unbind/release state machine for UI-backed mesh nodes.
///
/// At most one binding exists per node path. Each operation validates the
/// binding state here, then marshals the forwarded call onto the render
/// thread; all of them require the bridge to be running.
pub struct SurfaceBindings {
    backend: Arc<dyn SceneBackend>,
    tasks: RenderTaskQueue,
    lifecycle: Arc<LifecycleController>,
    bindings: Mutex<HashMap<NodePath, SurfaceBinding>>,
}

impl SurfaceBindings {
    pub(crate) fn new(
        backend: Arc<dyn SceneBackend>,
        tasks: RenderTaskQueue,
        lifecycle: Arc<LifecycleController>,
    ) -> Self {
        Self {
            backend,
            tasks,
            lifecycle,
            bindings: Mutex::new(HashMap::new()),
        }
    }

    /// Create a quad mesh node under `parent` and bind it in one step,
    /// returning the new node's path.
    ///
    /// The parent must already exist; the new node comes back bound with its
    /// default-slot texture allocated.
    pub fn acquire_and_bind_quad(&self, parent: &NodePath) -> Result<NodePath, BridgeError> {
        self.lifecycle.ensure_running()?;
        let backend = Arc::clone(&self.backend);
        let parent_path = parent.clone();
        let (path, texture_id) = self.tasks.call(move || {
            let path = backend.acquire_and_bind_quad(&parent_path)?;
            let texture_id = backend.external_texture_id(&path, None)?;
            Ok::<_, BridgeError>((path, texture_id))
        })??;
        self.bindings.lock().insert(
            path.clone(),
            SurfaceBinding {
                node_path: path.clone(),
                parent_path: Some(parent.clone()),
                texture_id,
                surface_index: None,
            },
        );
        info!("acquired and bound quad mesh {} (texture {})", path, texture_id);
        Ok(path)
    }

    /// Bind an already-existing mesh node for surface support.
    ///
    /// Fails with `AlreadyBound` when a binding exists, and `NotFound` when
    /// the node is missing or is not a mesh.
    pub fn bind_mesh(&self, path: &NodePath) -> Result<(), BridgeError> {
        self.lifecycle.ensure_running()?;
        if self.bindings.lock().contains_key(path) {
            return Err(BridgeError::AlreadyBound(path.clone()));
        }
        let backend = Arc::clone(&self.backend);
        let node_path = path.clone();
        let texture_id = self.tasks.call(move || {
            backend.bind_mesh(&node_path)?;
            backend.external_texture_id(&node_path, None)
        })??;
        self.bindings.lock().insert(
            path.clone(),
            SurfaceBinding {
                node_path: path.clone(),
                parent_path: None,
                texture_id,
                surface_index: None,
            },
        );
        debug!("bound existing mesh {} (texture {})", path, texture_id);
        Ok(())
    }

    /// Release the texture association but keep the mesh node alive.
    ///
    /// Idempotent: unbinding a path with no active binding is a no-op.
    pub fn unbind_mesh(&self, path: &NodePath) -> Result<(), BridgeError> {
        self.lifecycle.ensure_running()?;
        if self.bindings.lock().remove(path).is_none() {
            trace!("unbind of {} ignored, no active binding", path);
            return Ok(());
        }
        let backend = Arc::clone(&self.backend);
        let node_path = path.clone();
        self.tasks.call(move || backend.unbind_mesh(&node_path))??;
        debug!("unbound mesh {}", path);
        Ok(())
    }

    /// Counterpart to [`SurfaceBindings::acquire_and_bind_quad`]: unbind and
    /// destroy the node. The path is invalid for further use afterwards.
    pub fn unbind_and_release_quad(&self, path: &NodePath) -> Result<(), BridgeError> {
        self.lifecycle.ensure_running()?;
        if self.bindings.lock().remove(path).is_none() {
            return Err(BridgeError::NotBound(path.clone()));
        }
        let backend = Arc::clone(&self.backend);
        let node_path = path.clone();
        self.tasks
            .call(move || backend.unbind_and_release_quad(&node_path))??;
        info!("released quad mesh {}", path);
        Ok(())
    }

    /// Query the GPU texture handle backing a bound node's surface slot.
    ///
    /// Pass-through: the collaborator distinguishes a missing node
    /// (`NotFound`) from an existing unbound one (`NotBound`).
    pub fn external_texture_id(
        &self,
        path: &NodePath,
        surface_index: Option<u32>,
    ) -> Result<i32, BridgeError> {
        self.lifecycle.ensure_running()?;
        let backend = Arc::clone(&self.backend);
        let node_path = path.clone();
        self.tasks
            .call(move || backend.external_texture_id(&node_path, surface_index))?
    }

    /// Re-parent a node within the scene graph, returning its (possibly
    /// re-identified) path. A binding keyed by the old path is re-keyed when
    /// the collaborator changes it.
    pub fn reparent(
        &self,
        path: &NodePath,
        new_parent: &NodePath,
    ) -> Result<NodePath, BridgeError> {
        self.lifecycle.ensure_running()?;
        let backend = Arc::clone(&self.backend);
        let node_path = path.clone();
        let parent_path = new_parent.clone();
        let moved = self
            .tasks
            .call(move || backend.reparent(&node_path, &parent_path))??;

        let mut bindings = self.bindings.lock();
        if let Some(mut binding) = bindings.remove(path) {
            binding.node_path = moved.clone();
            binding.parent_path = Some(new_parent.clone());
            bindings.insert(moved.clone(), binding);
        }
        debug!("reparented {} under {} as {}", path, new_parent, moved);
        Ok(moved)
    }

    /// Set a node's visibility; with `inherit_parent`, the parent's
    /// visibility cascades instead of the explicit value.
    pub fn set_visibility(
        &self,
        path: &NodePath,
        inherit_parent: bool,
        visible: bool,
    ) -> Result<(), BridgeError> {
        let path = path.clone();
        self.forward(move |backend| backend.set_visibility(&path, inherit_parent, visible))
    }

    /// Resize a quad mesh, in scene units.
    pub fn set_quad_size(&self, path: &NodePath, width: f32, height: f32) -> Result<(), BridgeError> {
        let path = path.clone();
        self.forward(move |backend| backend.set_quad_size(&path, width, height))
    }

    pub fn set_local_translation(
        &self,
        path: &NodePath,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), BridgeError> {
        let path = path.clone();
        self.forward(move |backend| backend.set_local_translation(&path, x, y, z))
    }

    pub fn set_local_scale(&self, path: &NodePath, x: f32, y: f32) -> Result<(), BridgeError> {
        let path = path.clone();
        self.forward(move |backend| backend.set_local_scale(&path, x, y))
    }

    pub fn set_local_rotation(
        &self,
        path: &NodePath,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), BridgeError> {
        let path = path.clone();
        self.forward(move |backend| backend.set_local_rotation(&path, x, y, z))
    }

    /// Whether the node participates in pointer collision checks.
    pub fn set_collidable(&self, path: &NodePath, collidable: bool) -> Result<(), BridgeError> {
        let path = path.clone();
        self.forward(move |backend| backend.set_collidable(&path, collidable))
    }

    /// Whether the node renders above the rest of the scene.
    pub fn set_render_on_top(&self, path: &NodePath, enabled: bool) -> Result<(), BridgeError> {
        let path = path.clone();
        self.forward(move |backend| backend.set_render_on_top(&path, enabled))
    }

    /// Surface opacity, `0.0` transparent to `1.0` opaque.
    pub fn set_alpha(&self, path: &NodePath, alpha: f32) -> Result<(), BridgeError> {
        let path = path.clone();
        self.forward(move |backend| backend.set_alpha(&path, alpha))
    }

    /// Whether the node follows the viewer's gaze.
    pub fn set_gaze_tracking(&self, path: &NodePath, enabled: bool) -> Result<(), BridgeError> {
        let path = path.clone();
        self.forward(move |backend| backend.set_gaze_tracking(&path, enabled))
    }

    /// Height fraction of the edge gradient fade; `0.0` disables it.
    pub fn set_gradient_height_ratio(
        &self,
        path: &NodePath,
        ratio: f32,
    ) -> Result<(), BridgeError> {
        let path = path.clone();
        self.forward(move |backend| backend.set_gradient_height_ratio(&path, ratio))
    }

    /// Snapshot of the binding recorded for `path`, if any.
    pub fn binding(&self, path: &NodePath) -> Option<SurfaceBinding> {
        self.bindings.lock().get(path).cloned()
    }

    /// Number of active bindings.
    pub fn bound_count(&self) -> usize {
        self.bindings.lock().len()
    }

    /// Property pass-through with the shared running check and render-thread
    /// marshal.
    fn forward(
        &self,
        f: impl FnOnce(&dyn SceneBackend) -> Result<(), BridgeError> + Send + 'static,
    ) -> Result<(), BridgeError> {
        self.lifecycle.ensure_running()?;
        let backend = Arc::clone(&self.backend);
        self.tasks.call(move || f(backend.as_ref()))?
    }
}

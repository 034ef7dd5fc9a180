//! Boundary with the native rendering collaborator.

use crate::error::BridgeError;
use crate::node::NodePath;

/// Operation set the bridge forwards into the native rendering library.
///
/// Every method is invoked under render-thread affinity, so implementations
/// may assume serialized access to scene-graph state. `NotFound`,
/// `NotBound`, and `AlreadyBound` are the only recoverable failures;
/// anything unrecoverable at this layer (resource exhaustion, device loss)
/// should panic.
pub trait SceneBackend: Send + Sync + 'static {
    /// One-time setup. Runs on the render thread before any other call.
    fn initialize(&self);

    /// Teardown counterpart to [`SceneBackend::initialize`], same thread
    /// affinity.
    fn shutdown(&self);

    /// Create a quad mesh node under `parent` and bind it in one step,
    /// returning the path of the new node.
    fn acquire_and_bind_quad(&self, parent: &NodePath) -> Result<NodePath, BridgeError>;

    /// Bind an existing mesh node for surface support.
    fn bind_mesh(&self, path: &NodePath) -> Result<(), BridgeError>;

    /// Release the surface association but keep the node alive.
    fn unbind_mesh(&self, path: &NodePath) -> Result<(), BridgeError>;

    /// Unbind and destroy a node created by
    /// [`SceneBackend::acquire_and_bind_quad`]. The path is invalid
    /// afterwards.
    fn unbind_and_release_quad(&self, path: &NodePath) -> Result<(), BridgeError>;

    /// GPU texture handle backing the given surface slot of a bound node.
    /// `None` selects the default slot; multi-surface nodes may expose
    /// several distinct targets.
    fn external_texture_id(
        &self,
        path: &NodePath,
        surface_index: Option<u32>,
    ) -> Result<i32, BridgeError>;

    /// Move a node under a new parent, returning its (possibly
    /// re-identified) path.
    fn reparent(&self, path: &NodePath, new_parent: &NodePath) -> Result<NodePath, BridgeError>;

    /// Set a node's visibility. When `inherit_parent` is set the parent's
    /// visibility cascades instead of the explicit value.
    fn set_visibility(
        &self,
        path: &NodePath,
        inherit_parent: bool,
        visible: bool,
    ) -> Result<(), BridgeError>;

    /// Resize a quad mesh, in scene units.
    fn set_quad_size(&self, path: &NodePath, width: f32, height: f32) -> Result<(), BridgeError>;

    fn set_local_translation(
        &self,
        path: &NodePath,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), BridgeError>;

    fn set_local_scale(&self, path: &NodePath, x: f32, y: f32) -> Result<(), BridgeError>;

    fn set_local_rotation(&self, path: &NodePath, x: f32, y: f32, z: f32)
    -> Result<(), BridgeError>;

    /// Whether the node participates in pointer collision checks.
    fn set_collidable(&self, path: &NodePath, collidable: bool) -> Result<(), BridgeError>;

    /// Whether the node renders above the rest of the scene.
    fn set_render_on_top(&self, path: &NodePath, enabled: bool) -> Result<(), BridgeError>;

    /// Opacity of the node's surface, `0.0` (transparent) to `1.0` (opaque).
    fn set_alpha(&self, path: &NodePath, alpha: f32) -> Result<(), BridgeError>;

    /// Whether the node tracks the viewer's gaze instead of holding its
    /// transform.
    fn set_gaze_tracking(&self, path: &NodePath, enabled: bool) -> Result<(), BridgeError>;

    /// Height fraction of the edge gradient fade, `0.0` disables it.
    fn set_gradient_height_ratio(&self, path: &NodePath, ratio: f32) -> Result<(), BridgeError>;
}

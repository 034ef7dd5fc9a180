//! In-memory scene graph implementing the collaborator boundary.

use std::collections::HashMap;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use vitrine_bridge::{BridgeError, NodePath, SceneBackend};
use vitrine_ipc::InputEvent;

/// Path of the scene root every [`HeadlessScene`] starts with.
pub const ROOT_PATH: &str = "/root";

/// What a scene-graph node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Plain transform node.
    Spatial,
    /// Quad mesh capable of carrying a surface binding.
    QuadMesh,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodePath>,
    children: Vec<NodePath>,
    translation: [f32; 3],
    scale: [f32; 2],
    rotation: [f32; 3],
    size: (f32, f32),
    visible: bool,
    collidable: bool,
    render_on_top: bool,
    alpha: f32,
    gaze_tracking: bool,
    gradient_height_ratio: f32,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodePath>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            translation: [0.0; 3],
            scale: [1.0, 1.0],
            rotation: [0.0; 3],
            size: (1.0, 1.0),
            visible: true,
            collidable: true,
            render_on_top: false,
            alpha: 1.0,
            gaze_tracking: false,
            gradient_height_ratio: 0.0,
        }
    }
}

/// Read-only copy of a node's state, for assertions and inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub kind: NodeKind,
    pub parent: Option<NodePath>,
    pub translation: [f32; 3],
    pub scale: [f32; 2],
    pub rotation: [f32; 3],
    pub size: (f32, f32),
    pub visible: bool,
    pub collidable: bool,
    pub render_on_top: bool,
    pub alpha: f32,
    pub gaze_tracking: bool,
    pub gradient_height_ratio: f32,
}

struct SceneState {
    nodes: HashMap<NodePath, Node>,
    /// Bound node -> default-slot texture id.
    bound: HashMap<NodePath, i32>,
    next_quad: u32,
    next_texture_id: i32,
    initialized: bool,
}

/// In-memory stand-in for the native rendering library.
///
/// Gives the bridge a collaborator with real scene-graph and binding
/// semantics but no GPU behind it: texture ids are allocated from a
/// monotonic non-negative counter and acquired quads are named
/// `<parent>/quad_N`. Drives the integration tests and the demo shell.
pub struct HeadlessScene {
    state: Mutex<SceneState>,
    input_tx: Sender<InputEvent>,
    input_rx: Receiver<InputEvent>,
}

impl HeadlessScene {
    /// Scene containing a single root node at [`ROOT_PATH`].
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodePath::from(ROOT_PATH), Node::new(NodeKind::Spatial, None));
        let (input_tx, input_rx) = crossbeam_channel::unbounded();
        Self {
            state: Mutex::new(SceneState {
                nodes,
                bound: HashMap::new(),
                next_quad: 1,
                next_texture_id: 0,
                initialized: false,
            }),
            input_tx,
            input_rx,
        }
    }

    pub fn root_path(&self) -> NodePath {
        NodePath::from(ROOT_PATH)
    }

    /// Add a plain spatial node under `parent`.
    pub fn add_spatial_node(&self, path: &NodePath, parent: &NodePath) -> Result<(), BridgeError> {
        self.insert_node(path, parent, NodeKind::Spatial)
    }

    /// Add a mesh node created outside the bridge, ready for `bind_mesh`.
    pub fn add_mesh_node(&self, path: &NodePath, parent: &NodePath) -> Result<(), BridgeError> {
        self.insert_node(path, parent, NodeKind::QuadMesh)
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.state.lock().nodes.contains_key(path)
    }

    pub fn is_initialized(&self) -> bool {
        self.state.lock().initialized
    }

    /// Paths of all currently bound nodes.
    pub fn bound_paths(&self) -> Vec<NodePath> {
        self.state.lock().bound.keys().cloned().collect()
    }

    pub fn children_of(&self, path: &NodePath) -> Vec<NodePath> {
        self.state
            .lock()
            .nodes
            .get(path)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    pub fn snapshot(&self, path: &NodePath) -> Option<NodeSnapshot> {
        self.state.lock().nodes.get(path).map(|node| NodeSnapshot {
            kind: node.kind,
            parent: node.parent.clone(),
            translation: node.translation,
            scale: node.scale,
            rotation: node.rotation,
            size: node.size,
            visible: node.visible,
            collidable: node.collidable,
            render_on_top: node.render_on_top,
            alpha: node.alpha,
            gaze_tracking: node.gaze_tracking,
            gradient_height_ratio: node.gradient_height_ratio,
        })
    }

    /// Queue a collaborator-side input report; the render loop forwards it
    /// on the next frame.
    pub fn push_input(&self, event: InputEvent) {
        let _ = self.input_tx.send(event);
    }

    pub(crate) fn drain_input(&self) -> Vec<InputEvent> {
        self.input_rx.try_iter().collect()
    }

    fn insert_node(
        &self,
        path: &NodePath,
        parent: &NodePath,
        kind: NodeKind,
    ) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        if !state.nodes.contains_key(parent) {
            return Err(BridgeError::NotFound(parent.clone()));
        }
        state
            .nodes
            .insert(path.clone(), Node::new(kind, Some(parent.clone())));
        if let Some(parent_node) = state.nodes.get_mut(parent) {
            parent_node.children.push(path.clone());
        }
        Ok(())
    }

    fn with_node(
        &self,
        path: &NodePath,
        f: impl FnOnce(&mut Node),
    ) -> Result<(), BridgeError> {
        match self.state.lock().nodes.get_mut(path) {
            Some(node) => {
                f(node);
                Ok(())
            }
            None => Err(BridgeError::NotFound(path.clone())),
        }
    }
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBackend for HeadlessScene {
    fn initialize(&self) {
        self.state.lock().initialized = true;
        info!("headless scene initialized");
    }

    fn shutdown(&self) {
        let mut state = self.state.lock();
        state.bound.clear();
        state.initialized = false;
        info!("headless scene shut down");
    }

    fn acquire_and_bind_quad(&self, parent: &NodePath) -> Result<NodePath, BridgeError> {
        let mut state = self.state.lock();
        if !state.nodes.contains_key(parent) {
            return Err(BridgeError::NotFound(parent.clone()));
        }
        let index = state.next_quad;
        state.next_quad += 1;
        let path = NodePath::from(format!("{}/quad_{}", parent, index));

        state
            .nodes
            .insert(path.clone(), Node::new(NodeKind::QuadMesh, Some(parent.clone())));
        if let Some(parent_node) = state.nodes.get_mut(parent) {
            parent_node.children.push(path.clone());
        }

        let texture_id = state.next_texture_id;
        state.next_texture_id += 1;
        state.bound.insert(path.clone(), texture_id);
        debug!("acquired quad {} (texture {})", path, texture_id);
        Ok(path)
    }

    fn bind_mesh(&self, path: &NodePath) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        match state.nodes.get(path) {
            None => return Err(BridgeError::NotFound(path.clone())),
            Some(node) if node.kind != NodeKind::QuadMesh => {
                warn!("bind target {} is not a mesh", path);
                return Err(BridgeError::NotFound(path.clone()));
            }
            Some(_) => {}
        }
        if state.bound.contains_key(path) {
            return Err(BridgeError::AlreadyBound(path.clone()));
        }
        let texture_id = state.next_texture_id;
        state.next_texture_id += 1;
        state.bound.insert(path.clone(), texture_id);
        debug!("bound mesh {} (texture {})", path, texture_id);
        Ok(())
    }

    fn unbind_mesh(&self, path: &NodePath) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        if !state.nodes.contains_key(path) {
            return Err(BridgeError::NotFound(path.clone()));
        }
        state.bound.remove(path);
        Ok(())
    }

    fn unbind_and_release_quad(&self, path: &NodePath) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        let node = state
            .nodes
            .remove(path)
            .ok_or_else(|| BridgeError::NotFound(path.clone()))?;
        state.bound.remove(path);
        if let Some(parent) = node.parent
            && let Some(parent_node) = state.nodes.get_mut(&parent)
        {
            parent_node.children.retain(|child| child != path);
        }
        debug!("released quad {}", path);
        Ok(())
    }

    fn external_texture_id(
        &self,
        path: &NodePath,
        surface_index: Option<u32>,
    ) -> Result<i32, BridgeError> {
        let state = self.state.lock();
        if !state.nodes.contains_key(path) {
            return Err(BridgeError::NotFound(path.clone()));
        }
        let Some(&texture_id) = state.bound.get(path) else {
            return Err(BridgeError::NotBound(path.clone()));
        };
        match surface_index {
            // Headless quads expose a single surface slot.
            None | Some(0) => Ok(texture_id),
            Some(slot) => {
                warn!("no surface slot {} on {}", slot, path);
                Err(BridgeError::NotBound(path.clone()))
            }
        }
    }

    fn reparent(&self, path: &NodePath, new_parent: &NodePath) -> Result<NodePath, BridgeError> {
        let mut state = self.state.lock();
        if !state.nodes.contains_key(path) {
            return Err(BridgeError::NotFound(path.clone()));
        }
        if !state.nodes.contains_key(new_parent) {
            return Err(BridgeError::NotFound(new_parent.clone()));
        }

        let old_parent = state
            .nodes
            .get_mut(path)
            .and_then(|node| node.parent.replace(new_parent.clone()));
        if let Some(old_parent) = old_parent
            && let Some(parent_node) = state.nodes.get_mut(&old_parent)
        {
            parent_node.children.retain(|child| child != path);
        }
        if let Some(parent_node) = state.nodes.get_mut(new_parent) {
            parent_node.children.push(path.clone());
        }
        // Node identity is stable here; a real scene graph may re-identify.
        Ok(path.clone())
    }

    fn set_visibility(
        &self,
        path: &NodePath,
        inherit_parent: bool,
        visible: bool,
    ) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        if !state.nodes.contains_key(path) {
            return Err(BridgeError::NotFound(path.clone()));
        }
        let value = if inherit_parent {
            let parent = state.nodes.get(path).and_then(|node| node.parent.clone());
            parent
                .and_then(|parent| state.nodes.get(&parent))
                .map_or(visible, |parent_node| parent_node.visible)
        } else {
            visible
        };
        if let Some(node) = state.nodes.get_mut(path) {
            node.visible = value;
        }
        Ok(())
    }

    fn set_quad_size(&self, path: &NodePath, width: f32, height: f32) -> Result<(), BridgeError> {
        let mut state = self.state.lock();
        match state.nodes.get_mut(path) {
            None => Err(BridgeError::NotFound(path.clone())),
            Some(node) if node.kind != NodeKind::QuadMesh => {
                warn!("resize target {} is not a quad mesh", path);
                Err(BridgeError::NotFound(path.clone()))
            }
            Some(node) => {
                node.size = (width, height);
                Ok(())
            }
        }
    }

    fn set_local_translation(
        &self,
        path: &NodePath,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), BridgeError> {
        self.with_node(path, |node| node.translation = [x, y, z])
    }

    fn set_local_scale(&self, path: &NodePath, x: f32, y: f32) -> Result<(), BridgeError> {
        self.with_node(path, |node| node.scale = [x, y])
    }

    fn set_local_rotation(
        &self,
        path: &NodePath,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), BridgeError> {
        self.with_node(path, |node| node.rotation = [x, y, z])
    }

    fn set_collidable(&self, path: &NodePath, collidable: bool) -> Result<(), BridgeError> {
        self.with_node(path, |node| node.collidable = collidable)
    }

    fn set_render_on_top(&self, path: &NodePath, enabled: bool) -> Result<(), BridgeError> {
        self.with_node(path, |node| node.render_on_top = enabled)
    }

    fn set_alpha(&self, path: &NodePath, alpha: f32) -> Result<(), BridgeError> {
        self.with_node(path, |node| node.alpha = alpha.clamp(0.0, 1.0))
    }

    fn set_gaze_tracking(&self, path: &NodePath, enabled: bool) -> Result<(), BridgeError> {
        self.with_node(path, |node| node.gaze_tracking = enabled)
    }

    fn set_gradient_height_ratio(&self, path: &NodePath, ratio: f32) -> Result<(), BridgeError> {
        self.with_node(path, |node| node.gradient_height_ratio = ratio)
    }
}

//! UI-thread view containers.

use std::marker::PhantomData;

use tracing::debug;
use vitrine_config::{DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};

use crate::node::NodePath;

/// A host-toolkit view driving one surface binding's pixel content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceView {
    pub node_path: NodePath,
    /// Backing surface width in pixels.
    pub width: u32,
    /// Backing surface height in pixels.
    pub height: u32,
    pub visible: bool,
}

impl SurfaceView {
    /// View with the configured default surface dimensions.
    pub fn new(node_path: NodePath) -> Self {
        Self::with_size(node_path, DEFAULT_SURFACE_WIDTH, DEFAULT_SURFACE_HEIGHT)
    }

    pub fn with_size(node_path: NodePath, width: u32, height: u32) -> Self {
        Self {
            node_path,
            width,
            height,
            visible: true,
        }
    }
}

/// Root parent for all surface views.
///
/// Owned and mutated exclusively by the UI/main thread (the `!Send` marker
/// keeps it there). Created once by the shell's view hook and destroyed only
/// at process shutdown; surfaces register and unregister their views here as
/// bindings come and go.
#[derive(Debug, Default)]
pub struct RootContainerView {
    children: Vec<SurfaceView>,
    _ui_thread: PhantomData<*const ()>,
}

impl RootContainerView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a surface view, replacing any previous view for the same node.
    pub fn attach(&mut self, view: SurfaceView) {
        if let Some(existing) = self
            .children
            .iter_mut()
            .find(|child| child.node_path == view.node_path)
        {
            debug!("replacing surface view for {}", view.node_path);
            *existing = view;
            return;
        }
        debug!("attaching surface view for {}", view.node_path);
        self.children.push(view);
    }

    /// Detach and return the view for `path`, if attached.
    pub fn detach(&mut self, path: &NodePath) -> Option<SurfaceView> {
        let index = self
            .children
            .iter()
            .position(|child| child.node_path == *path)?;
        debug!("detaching surface view for {}", path);
        Some(self.children.remove(index))
    }

    pub fn child(&self, path: &NodePath) -> Option<&SurfaceView> {
        self.children.iter().find(|child| child.node_path == *path)
    }

    pub fn child_mut(&mut self, path: &NodePath) -> Option<&mut SurfaceView> {
        self.children
            .iter_mut()
            .find(|child| child.node_path == *path)
    }

    pub fn children(&self) -> &[SurfaceView] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

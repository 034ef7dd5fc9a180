//! Vitrine surface bridge
//!
//! Displays UI content produced by the host toolkit's views as textured,
//! interactive surfaces inside a collaborator-owned 3D scene. The UI thread
//! owns the view hierarchy, the render thread owns the scene graph; every
//! call that crosses that boundary goes through the render-thread task queue
//! in [`RenderTaskQueue`].
//!
//! The collaborator drives the bridge once per frame through a
//! [`RenderLoopDispatcher`], which fans process, draw-frame, and input events
//! out to registered [`RenderEventListener`]s.

mod binding;
mod dispatch;
mod error;
mod lifecycle;
mod listener;
mod manager;
mod node;
mod plugin;
mod scene;
mod tasks;
mod view;

pub use binding::{SurfaceBinding, SurfaceBindings};
pub use dispatch::RenderLoopDispatcher;
pub use error::BridgeError;
pub use lifecycle::{LifecycleController, LifecycleState};
pub use listener::{ListenerRegistry, RenderEventListener};
pub use manager::SurfaceBridge;
pub use node::NodePath;
pub use plugin::{BridgePlugin, EnginePlugin};
pub use scene::SceneBackend;
pub use tasks::RenderTaskQueue;
pub use view::{RootContainerView, SurfaceView};

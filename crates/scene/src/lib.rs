//! In-memory rendering collaborator for the Vitrine bridge
//!
//! Provides [`HeadlessScene`], a scene graph with real binding semantics but
//! no GPU, and [`RenderLoop`], a frame driver that exercises the bridge the
//! way the native engine's render thread would. Used by the integration
//! tests and the demo shell.

mod headless;
mod render_loop;

pub use headless::{HeadlessScene, NodeKind, NodeSnapshot, ROOT_PATH};
pub use render_loop::RenderLoop;

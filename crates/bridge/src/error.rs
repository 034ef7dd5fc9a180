//! Error types for the surface bridge

use thiserror::Error;

use crate::lifecycle::LifecycleState;
use crate::node::NodePath;

/// Failures reported synchronously by bridge operations.
///
/// Collaborator faults with no recovery path at this layer (GPU resource
/// exhaustion and the like) are not represented here; they surface as panics
/// on the render thread.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The referenced node does not exist in the scene graph.
    #[error("node not found: {0}")]
    NotFound(NodePath),

    /// The node already has an active surface binding.
    #[error("node already bound: {0}")]
    AlreadyBound(NodePath),

    /// The operation requires an active surface binding.
    #[error("node not bound: {0}")]
    NotBound(NodePath),

    /// The bridge is not in a lifecycle state that allows the operation.
    #[error("operation invalid in lifecycle state {state:?}")]
    InvalidState { state: LifecycleState },

    /// The render thread went away before a marshaled call completed.
    #[error("render thread is gone")]
    RenderThreadGone,
}

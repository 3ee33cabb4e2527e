//! Error types for scene mutation

use thiserror::Error;

use crate::object::ObjectId;

/// Scene graph errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Object id is not (or no longer) part of the scene
    #[error("Object not found: {0}")]
    UnknownObject(ObjectId),

    /// Children can only be attached to groups
    #[error("Object {0} is not a group")]
    NotAGroup(ObjectId),

    /// Re-kinding a group that still has children
    #[error("Object {0} still has children")]
    HasChildren(ObjectId),

    /// Attaching would make an object its own ancestor
    #[error("Attaching {child} under {group} would create a cycle")]
    CycleDetected { group: ObjectId, child: ObjectId },
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;

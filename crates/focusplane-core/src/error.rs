//! Error types for focusplane-rs.

use thiserror::Error;

use crate::attr::{Attr, NodeId};

/// The main error type for focusplane-rs operations.
#[derive(Error, Debug)]
pub enum FocusPlaneError {
    /// Nothing in the current selection resolves to a camera.
    #[error("You need to select a camera.")]
    NoCameraSelected,

    /// A node handed to the builder is not a camera shape.
    #[error("'{0}' is not a camera")]
    NotACamera(String),

    /// A camera shape has no transform parent.
    #[error("camera '{0}' has no parent transform")]
    MissingParent(String),

    /// A node handle no longer refers to a node in the scene.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The node exists but does not carry the requested attribute.
    #[error("attribute '{attr}' not found on '{node}'")]
    AttributeNotFound { node: String, attr: Attr },

    /// A user-level write hit a locked attribute.
    #[error("attribute '{node}.{attr}' is locked")]
    AttributeLocked { node: String, attr: Attr },

    /// A subscription handle was already released or never existed.
    #[error("subscription {0} not found")]
    SubscriptionNotFound(u64),

    /// A chain of change notifications exceeded the delivery budget.
    #[error("change notification storm: more than {limit} deliveries in one dispatch")]
    NotificationStorm { limit: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for focusplane-rs operations.
pub type Result<T> = std::result::Result<T, FocusPlaneError>;

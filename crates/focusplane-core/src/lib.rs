//! Core abstractions for focusplane-rs.
//!
//! This crate provides the types shared by the focus plane tool and the hosts
//! it runs against:
//! - [`SceneGraph`] port trait through which every scene access goes
//! - [`Attr`], [`Plug`] and [`NodeId`] for addressing host attributes
//! - [`Expression`] for standing, host-evaluated formulas
//! - [`Options`] and the [`FocusPlaneError`] type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Host attribute values are compared exactly on purpose
#![allow(clippy::float_cmp)]

pub mod attr;
pub mod error;
pub mod expression;
pub mod options;
pub mod port;
pub mod transform;

pub use attr::{as_flag, flag, Attr, NodeId, NodeKind, Plug};
pub use error::{FocusPlaneError, Result};
pub use expression::{Binding, Expr, Expression, ExpressionId};
pub use options::{Options, PanelOptions, PlaneOptions};
pub use port::{
    AttrChangeHandler, CheckBoxLayout, FocusPair, PanelLayout, PlaneSpec, SceneGraph,
    Subscription,
};
pub use transform::TransformChannels;

// Re-export glam types for convenience
pub use glam::{DMat4, DVec3};

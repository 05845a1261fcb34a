//! In-memory scene host for focusplane-rs.
//!
//! Provides [`InMemoryScene`], a [`SceneGraph`](focusplane_core::SceneGraph)
//! implementation with nodes, locked attributes, live expressions and
//! synchronous change notifications. It stands in for a real authoring host
//! in tests and demos.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]
// Grid indices stay small, subdivisions are clamped
#![allow(clippy::cast_possible_truncation)]

pub mod mesh;
pub mod node;
pub mod scene;

pub use mesh::{PlaneMesh, MAX_SUBDIVISIONS};
pub use node::Node;
pub use scene::{InMemoryScene, SceneOptions};

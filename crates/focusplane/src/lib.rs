//! focusplane-rs: a depth-of-field focus plane helper for scene cameras.
//!
//! Select a camera and [`run`] the command. The first time, it builds a quad
//! proxy under the camera that sits at the camera's focus distance and is
//! scaled by a live host expression to fill the camera's film gate. Moving the
//! proxy along its view axis changes the focus distance, and changing the focus
//! distance moves the proxy. Running the command again on the same camera just
//! reopens its controls.
//!
//! # Quick Start
//!
//! ```
//! use focusplane_rs::*;
//!
//! fn main() -> Result<()> {
//!     let mut scene = InMemoryScene::new();
//!     let (camera, shape) = scene.create_camera("shotCam")?;
//!     scene.set_selection(&[camera])?;
//!
//!     let outcome = run(&mut scene, &Options::default())?;
//!     let pair = *outcome.pair();
//!
//!     scene.set_attr(pair.focus_distance(), 12.0)?;
//!     assert_eq!(scene.get_attr(pair.offset())?, -12.0);
//!     assert_eq!(pair.camera, shape);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`builder`] creates the proxy, its scale expression and its locks
//! - [`sync`] keeps focus distance and proxy offset equal in both directions
//! - [`controls`] shows the frustum and plane toggles
//! - [`command`] is the entry point tying them together
//!
//! The host is reached only through the [`SceneGraph`] trait.
//! [`InMemoryScene`] is a complete in-memory host.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]

pub mod builder;
pub mod command;
pub mod controls;
pub mod sync;

// Re-export core types
pub use focusplane_core::{
    as_flag, flag, Attr, AttrChangeHandler, CheckBoxLayout, DMat4, DVec3, Expr, Expression,
    ExpressionId, FocusPair, FocusPlaneError, NodeId, NodeKind, Options, PanelLayout,
    PanelOptions, PlaneOptions, PlaneSpec, Plug, Result, SceneGraph, Subscription,
};

// Re-export the in-memory host
pub use focusplane_scene::{InMemoryScene, PlaneMesh, SceneOptions};

pub use builder::{build_focus_plane, frame_scale, scale_expression, FocusPlane, MM_PER_INCH};
pub use command::{find_focus_plane, run, selected_cameras, CommandOutcome};
pub use controls::{open_controls, ControlsPanel};
pub use sync::{
    sync_state, update_camera_from_plane, update_plane_from_camera, SyncOutcome, SyncState,
};

/// Installs the `env_logger` backend for the `log` facade.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
    log::info!("focusplane-rs {} logging initialized", env!("CARGO_PKG_VERSION"));
}

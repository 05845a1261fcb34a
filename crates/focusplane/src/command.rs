//! The user-facing focus plane command.

use focusplane_core::{
    FocusPair, FocusPlaneError, NodeId, NodeKind, Options, Result, SceneGraph,
};

use crate::builder::{build_focus_plane, resolve_camera, FocusPlane};
use crate::controls::{open_controls, ControlsPanel};

/// What a command invocation did.
#[derive(Debug)]
pub enum CommandOutcome {
    /// No proxy existed; one was built.
    Built(FocusPlane),
    /// A proxy already existed; its controls were reopened.
    Reopened {
        /// The camera and the proxy that was found.
        pair: FocusPair,
        /// The reopened controls.
        controls: ControlsPanel,
    },
}

impl CommandOutcome {
    /// The pair the command acted on.
    pub fn pair(&self) -> &FocusPair {
        match self {
            CommandOutcome::Built(plane) => &plane.pair,
            CommandOutcome::Reopened { pair, .. } => pair,
        }
    }
}

/// Camera shapes reachable from the selection, in selection order.
///
/// A selected camera shape counts directly, a selected transform counts
/// through the camera shapes below it.
pub fn selected_cameras(scene: &dyn SceneGraph) -> Result<Vec<NodeId>> {
    let mut cameras = Vec::new();
    for node in scene.selection() {
        let candidates = match scene.kind(node)? {
            NodeKind::Camera => vec![node],
            NodeKind::Transform => scene.descendants(node)?,
            NodeKind::Mesh => Vec::new(),
        };
        for candidate in candidates {
            if scene.kind(candidate)? == NodeKind::Camera && !cameras.contains(&candidate) {
                cameras.push(candidate);
            }
        }
    }
    Ok(cameras)
}

fn has_camera_shape(scene: &dyn SceneGraph, node: NodeId) -> Result<bool> {
    for child in scene.children(node)? {
        if scene.kind(child)? == NodeKind::Camera {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Finds an existing proxy below a camera transform by its name marker.
///
/// Searches depth-first. Subtrees of other camera transforms parented below
/// are skipped, since proxies found there belong to those cameras.
pub fn find_focus_plane(
    scene: &dyn SceneGraph,
    camera_transform: NodeId,
    options: &Options,
) -> Result<Option<NodeId>> {
    let mut stack: Vec<NodeId> = scene.children(camera_transform)?;
    stack.reverse();
    while let Some(node) = stack.pop() {
        if scene.kind(node)? != NodeKind::Transform || has_camera_shape(scene, node)? {
            continue;
        }
        if options.is_proxy_name(&scene.name(node)?) {
            return Ok(Some(node));
        }
        stack.extend(scene.children(node)?.into_iter().rev());
    }
    Ok(None)
}

/// Runs the focus plane command on the current selection.
///
/// With no camera selected, or a camera shape without a transform, reports
/// one error and leaves the scene alone. Otherwise reopens the controls of
/// the camera's existing proxy, or builds a new one.
pub fn run(scene: &mut dyn SceneGraph, options: &Options) -> Result<CommandOutcome> {
    let cameras = selected_cameras(scene)?;
    let Some(&camera) = cameras.first() else {
        let err = FocusPlaneError::NoCameraSelected;
        scene.report_error(&err.to_string());
        return Err(err);
    };
    if cameras.len() > 1 {
        log::warn!(
            "{} cameras selected, using '{}'",
            cameras.len(),
            scene.name(camera)?
        );
    }

    let camera_transform = resolve_camera(scene, camera)?;
    if let Some(proxy) = find_focus_plane(scene, camera_transform, options)? {
        log::info!("reusing focus plane '{}'", scene.name(proxy)?);
        let pair = FocusPair {
            camera,
            camera_transform,
            proxy,
        };
        let controls = open_controls(scene, pair, &options.panel)?;
        return Ok(CommandOutcome::Reopened { pair, controls });
    }

    build_focus_plane(scene, camera, options).map(CommandOutcome::Built)
}

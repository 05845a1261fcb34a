//! Builds the focus plane proxy for a camera.
//!
//! The proxy is a subdivided quad parented under the camera transform. A
//! standing host expression scales it so that, at the focus distance, it
//! exactly fills the camera's film gate:
//!
//! ```text
//! scale = scaleZ * ((focusDistance / farClip) * farClip) * aperture * 25.4 / focalLength
//! ```
//!
//! Aperture is in inches and focal length in millimeters, hence `25.4`. The
//! far clip factor cancels out; it is kept as written.

use focusplane_core::{
    Attr, Expr, Expression, ExpressionId, FocusPair, FocusPlaneError, NodeId, NodeKind, Options,
    PlaneSpec, Plug, Result, SceneGraph, Subscription,
};

use crate::controls::{open_controls, ControlsPanel};
use crate::sync::{subscribe_sync, update_plane_from_camera};

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Proxy channels locked after the build. Only `translateZ` stays free.
pub const LOCKED_CHANNELS: [Attr; 13] = [
    Attr::ScaleX,
    Attr::ScaleY,
    Attr::ScaleZ,
    Attr::RotateX,
    Attr::RotateY,
    Attr::RotateZ,
    Attr::RotateOrder,
    Attr::TranslateX,
    Attr::TranslateY,
    Attr::ShearXY,
    Attr::ShearXZ,
    Attr::ShearYZ,
    Attr::InheritsTransform,
];

/// A freshly built proxy and everything wired to it.
#[derive(Debug)]
pub struct FocusPlane {
    /// Camera, camera transform and proxy.
    pub pair: FocusPair,
    /// The scale expression.
    pub expression: ExpressionId,
    /// `[camera -> plane, plane -> camera]` reactions.
    pub subscriptions: [Subscription; 2],
    /// The controls window opened at the end of the build.
    pub controls: ControlsPanel,
}

impl FocusPlane {
    /// Stops both sync reactions. The proxy and its expression stay.
    pub fn detach(self, scene: &mut dyn SceneGraph) -> Result<()> {
        for subscription in self.subscriptions {
            scene.unsubscribe(subscription)?;
        }
        log::info!("detached focus plane sync from {}", self.pair.proxy);
        Ok(())
    }
}

/// Evaluates the scale formula for one axis.
pub fn frame_scale(
    scale_z: f64,
    focus_distance: f64,
    far_clip: f64,
    aperture: f64,
    focal_length: f64,
) -> f64 {
    scale_z * ((focus_distance / far_clip) * far_clip) * aperture * MM_PER_INCH / focal_length
}

fn axis_scale(pair: &FocusPair, aperture: Attr) -> Expr {
    let cam = |attr| Expr::attr(Plug::new(pair.camera, attr));
    Expr::attr(Plug::new(pair.proxy, Attr::ScaleZ))
        * (cam(Attr::FocusDistance) / cam(Attr::FarClipPlane) * cam(Attr::FarClipPlane))
        * cam(aperture)
        * Expr::constant(MM_PER_INCH)
        / cam(Attr::FocalLength)
}

/// The expression driving `scaleX` and `scaleY` of the proxy.
pub fn scale_expression(name: impl Into<String>, pair: &FocusPair) -> Expression {
    Expression::new(name)
        .with_binding(
            Plug::new(pair.proxy, Attr::ScaleX),
            axis_scale(pair, Attr::HorizontalFilmAperture),
        )
        .with_binding(
            Plug::new(pair.proxy, Attr::ScaleY),
            axis_scale(pair, Attr::VerticalFilmAperture),
        )
}

/// Checks that `camera` is a camera shape and returns its transform.
pub fn camera_transform(scene: &dyn SceneGraph, camera: NodeId) -> Result<NodeId> {
    if scene.kind(camera)? != NodeKind::Camera {
        return Err(FocusPlaneError::NotACamera(scene.name(camera)?));
    }
    scene
        .parent(camera)?
        .ok_or_else(|| FocusPlaneError::MissingParent(scene.name(camera).unwrap_or_default()))
}

/// [`camera_transform`], reporting a failure to the user before returning it.
pub(crate) fn resolve_camera(scene: &mut dyn SceneGraph, camera: NodeId) -> Result<NodeId> {
    match camera_transform(scene, camera) {
        Ok(transform) => Ok(transform),
        Err(err) => {
            scene.report_error(&err.to_string());
            Err(err)
        }
    }
}

/// Builds the proxy for `camera`, wires the sync reactions and opens the
/// controls.
///
/// Reports an error and leaves the scene untouched when `camera` is not a
/// camera shape. The selection in place on entry is restored on success.
pub fn build_focus_plane(
    scene: &mut dyn SceneGraph,
    camera: NodeId,
    options: &Options,
) -> Result<FocusPlane> {
    let camera_transform = resolve_camera(scene, camera)?;
    let prior_selection = scene.selection();
    let camera_name = scene.name(camera_transform)?;

    let proxy = scene.create_plane(&PlaneSpec {
        name: options.proxy_name(&camera_name),
        width: options.plane.width,
        height: options.plane.height,
        subdivisions_x: options.plane.subdivisions_x,
        subdivisions_y: options.plane.subdivisions_y,
    })?;
    scene.freeze_transform(proxy)?;
    scene.set_attr(Plug::new(proxy, Attr::RotatePivotZ), 0.0)?;
    scene.set_attr(Plug::new(proxy, Attr::ScalePivotZ), 0.0)?;
    scene.set_attr(Plug::new(proxy, Attr::RotateY), 180.0)?;

    let pair = FocusPair {
        camera,
        camera_transform,
        proxy,
    };
    let proxy_name = scene.name(proxy)?;
    let expression =
        scene.create_expression(scale_expression(format!("{proxy_name}_Expr"), &pair))?;

    scene.parent_relative(proxy, camera_transform)?;
    for attr in LOCKED_CHANNELS {
        scene.lock_attr(Plug::new(proxy, attr), true)?;
    }
    update_plane_from_camera(scene, &pair)?;
    scene.set_template(proxy, true)?;

    let subscriptions = subscribe_sync(scene, pair)?;
    let controls = open_controls(scene, pair, &options.panel)?;
    scene.set_selection(&prior_selection)?;

    log::info!("built focus plane '{proxy_name}' for camera '{camera_name}'");
    Ok(FocusPlane {
        pair,
        expression,
        subscriptions,
        controls,
    })
}

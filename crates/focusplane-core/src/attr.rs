//! Node handles and the attributes the focus plane tool touches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to a node in the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is, as far as the tool cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A DAG transform. Cameras and meshes hang below one.
    Transform,
    /// A camera shape.
    Camera,
    /// A polygon mesh shape.
    Mesh,
}

/// Attributes read or written by the tool.
///
/// Transform channels live on transform nodes, lens and display attributes
/// live on camera shapes. [`Attr::name`] gives the host-facing spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attr {
    TranslateX,
    TranslateY,
    TranslateZ,
    RotateX,
    RotateY,
    RotateZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    ShearXY,
    ShearXZ,
    ShearYZ,
    RotatePivotX,
    RotatePivotY,
    RotatePivotZ,
    ScalePivotX,
    ScalePivotY,
    ScalePivotZ,
    RotateOrder,
    InheritsTransform,
    Visibility,
    Template,

    FocalLength,
    HorizontalFilmAperture,
    VerticalFilmAperture,
    NearClipPlane,
    FarClipPlane,
    FocusDistance,
    DisplayCameraFrustum,
    DisplayCameraNearClip,
    DisplayCameraFarClip,
}

impl Attr {
    /// Every channel carried by a transform node.
    pub const TRANSFORM: [Attr; 22] = [
        Attr::TranslateX,
        Attr::TranslateY,
        Attr::TranslateZ,
        Attr::RotateX,
        Attr::RotateY,
        Attr::RotateZ,
        Attr::ScaleX,
        Attr::ScaleY,
        Attr::ScaleZ,
        Attr::ShearXY,
        Attr::ShearXZ,
        Attr::ShearYZ,
        Attr::RotatePivotX,
        Attr::RotatePivotY,
        Attr::RotatePivotZ,
        Attr::ScalePivotX,
        Attr::ScalePivotY,
        Attr::ScalePivotZ,
        Attr::RotateOrder,
        Attr::InheritsTransform,
        Attr::Visibility,
        Attr::Template,
    ];

    /// Every attribute carried by a camera shape.
    pub const CAMERA: [Attr; 9] = [
        Attr::FocalLength,
        Attr::HorizontalFilmAperture,
        Attr::VerticalFilmAperture,
        Attr::NearClipPlane,
        Attr::FarClipPlane,
        Attr::FocusDistance,
        Attr::DisplayCameraFrustum,
        Attr::DisplayCameraNearClip,
        Attr::DisplayCameraFarClip,
    ];

    /// The three camera flags that together draw the frustum.
    pub const FRUSTUM_DISPLAY: [Attr; 3] = [
        Attr::DisplayCameraFrustum,
        Attr::DisplayCameraNearClip,
        Attr::DisplayCameraFarClip,
    ];

    /// Host-facing attribute name.
    pub fn name(self) -> &'static str {
        match self {
            Attr::TranslateX => "translateX",
            Attr::TranslateY => "translateY",
            Attr::TranslateZ => "translateZ",
            Attr::RotateX => "rotateX",
            Attr::RotateY => "rotateY",
            Attr::RotateZ => "rotateZ",
            Attr::ScaleX => "scaleX",
            Attr::ScaleY => "scaleY",
            Attr::ScaleZ => "scaleZ",
            Attr::ShearXY => "shearXY",
            Attr::ShearXZ => "shearXZ",
            Attr::ShearYZ => "shearYZ",
            Attr::RotatePivotX => "rotatePivotX",
            Attr::RotatePivotY => "rotatePivotY",
            Attr::RotatePivotZ => "rotatePivotZ",
            Attr::ScalePivotX => "scalePivotX",
            Attr::ScalePivotY => "scalePivotY",
            Attr::ScalePivotZ => "scalePivotZ",
            Attr::RotateOrder => "rotateOrder",
            Attr::InheritsTransform => "inheritsTransform",
            Attr::Visibility => "visibility",
            Attr::Template => "template",
            Attr::FocalLength => "focalLength",
            Attr::HorizontalFilmAperture => "horizontalFilmAperture",
            Attr::VerticalFilmAperture => "verticalFilmAperture",
            Attr::NearClipPlane => "nearClipPlane",
            Attr::FarClipPlane => "farClipPlane",
            Attr::FocusDistance => "focusDistance",
            Attr::DisplayCameraFrustum => "displayCameraFrustum",
            Attr::DisplayCameraNearClip => "displayCameraNearClip",
            Attr::DisplayCameraFarClip => "displayCameraFarClip",
        }
    }

    /// Value a freshly created node starts with.
    pub fn default_value(self) -> f64 {
        match self {
            Attr::ScaleX
            | Attr::ScaleY
            | Attr::ScaleZ
            | Attr::InheritsTransform
            | Attr::Visibility => 1.0,
            Attr::FocalLength => 35.0,
            Attr::HorizontalFilmAperture => 1.417,
            Attr::VerticalFilmAperture => 0.945,
            Attr::NearClipPlane => 0.1,
            Attr::FarClipPlane => 10_000.0,
            Attr::FocusDistance => 5.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single attribute on a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Plug {
    /// Node carrying the attribute.
    pub node: NodeId,
    /// The attribute itself.
    pub attr: Attr,
}

impl Plug {
    /// Creates a plug.
    pub fn new(node: NodeId, attr: Attr) -> Self {
        Self { node, attr }
    }
}

/// Converts a host boolean attribute value.
pub fn as_flag(value: f64) -> bool {
    value != 0.0
}

/// Encodes a boolean for a host attribute.
pub fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

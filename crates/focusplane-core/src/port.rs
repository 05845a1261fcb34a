//! The host scene graph as seen by the focus plane tool.
//!
//! Everything the tool does to a scene goes through [`SceneGraph`]. A real
//! host binding implements it over the host's own API; `focusplane-scene`
//! implements it in memory.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::attr::{flag, Attr, NodeId, NodeKind, Plug};
use crate::error::Result;
use crate::expression::{Expression, ExpressionId};

/// The three nodes a focus plane ties together.
///
/// Handed to every change reaction so that reactions never capture handles
/// implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FocusPair {
    /// Camera shape carrying lens and focus attributes.
    pub camera: NodeId,
    /// Transform above the camera shape.
    pub camera_transform: NodeId,
    /// Proxy transform.
    pub proxy: NodeId,
}

impl FocusPair {
    /// The camera's focus distance plug.
    pub fn focus_distance(&self) -> Plug {
        Plug::new(self.camera, Attr::FocusDistance)
    }

    /// The proxy's offset along the view axis.
    pub fn offset(&self) -> Plug {
        Plug::new(self.proxy, Attr::TranslateZ)
    }
}

/// A reaction to an attribute change.
pub trait AttrChangeHandler {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Runs after the watched plug was written.
    fn on_change(&self, scene: &mut dyn SceneGraph, pair: &FocusPair) -> Result<()>;
}

/// Handle returned by [`SceneGraph::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription(pub u64);

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job {}", self.0)
    }
}

/// Parameters for a new polygon plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneSpec {
    /// Requested transform name. The host may uniquify it.
    pub name: String,
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub height: f64,
    /// Faces along X.
    pub subdivisions_x: u32,
    /// Faces along Y.
    pub subdivisions_y: u32,
}

/// A checkbox in a host panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckBoxLayout {
    /// Label next to the box.
    pub label: String,
    /// Whether the box is ticked.
    pub value: bool,
}

/// A small modeless host window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelLayout {
    /// Window title.
    pub title: String,
    /// Window width in pixels.
    pub width: u32,
    /// Checkboxes, top to bottom.
    pub checkboxes: Vec<CheckBoxLayout>,
}

/// Capability surface of the host application.
///
/// Calls are synchronous. Attribute writes made through [`SceneGraph::set_attr`]
/// are user-level writes: they respect locks and notify subscribers.
pub trait SceneGraph {
    /// Current selection, in selection order.
    fn selection(&self) -> Vec<NodeId>;

    /// Replaces the selection.
    fn set_selection(&mut self, nodes: &[NodeId]) -> Result<()>;

    /// Kind of a node.
    fn kind(&self, node: NodeId) -> Result<NodeKind>;

    /// Short name of a node.
    fn name(&self, node: NodeId) -> Result<String>;

    /// Parent of a node, `None` at the root.
    fn parent(&self, node: NodeId) -> Result<Option<NodeId>>;

    /// Direct children in creation order.
    fn children(&self, node: NodeId) -> Result<Vec<NodeId>>;

    /// All descendants, depth first.
    fn descendants(&self, node: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = self.children(node)?;
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut grandchildren = self.children(next)?;
            grandchildren.reverse();
            stack.extend(grandchildren);
        }
        Ok(out)
    }

    /// Reads an attribute.
    fn get_attr(&self, plug: Plug) -> Result<f64>;

    /// Writes an attribute and notifies subscribers of `plug`.
    fn set_attr(&mut self, plug: Plug, value: f64) -> Result<()>;

    /// Locks or unlocks an attribute against user writes.
    fn lock_attr(&mut self, plug: Plug, locked: bool) -> Result<()>;

    /// Whether an attribute is locked.
    fn is_locked(&self, plug: Plug) -> Result<bool>;

    /// Creates a plane mesh facing +Z under a new transform, selects it and
    /// returns the transform.
    fn create_plane(&mut self, spec: &PlaneSpec) -> Result<NodeId>;

    /// Bakes translate, rotate and scale into the shapes below `node` and
    /// resets those channels to identity.
    fn freeze_transform(&mut self, node: NodeId) -> Result<()>;

    /// Moves `child` under `parent`, keeping its local channel values.
    fn parent_relative(&mut self, child: NodeId, parent: NodeId) -> Result<()>;

    /// Installs a standing expression and evaluates it once.
    fn create_expression(&mut self, expression: Expression) -> Result<ExpressionId>;

    /// Registers `handler` to run whenever `plug` is written.
    fn subscribe(
        &mut self,
        plug: Plug,
        pair: FocusPair,
        handler: Rc<dyn AttrChangeHandler>,
    ) -> Result<Subscription>;

    /// Removes a subscription.
    fn unsubscribe(&mut self, subscription: Subscription) -> Result<()>;

    /// Opens a panel.
    fn present_panel(&mut self, panel: &PanelLayout) -> Result<()>;

    /// Shows a user-facing error.
    fn report_error(&mut self, message: &str);

    /// Shows or hides a node.
    fn set_visibility(&mut self, node: NodeId, visible: bool) -> Result<()> {
        self.set_attr(Plug::new(node, Attr::Visibility), flag(visible))
    }

    /// Turns template display on or off.
    fn set_template(&mut self, node: NodeId, template: bool) -> Result<()> {
        self.set_attr(Plug::new(node, Attr::Template), flag(template))
    }
}

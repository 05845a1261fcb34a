//! Scene nodes and their attribute storage.

use std::collections::{HashMap, HashSet};

use focusplane_core::{Attr, DVec3, NodeId, NodeKind, TransformChannels};

use crate::mesh::PlaneMesh;

/// A node in the in-memory scene.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    attrs: HashMap<Attr, f64>,
    locked: HashSet<Attr>,
    pub(crate) mesh: Option<PlaneMesh>,
}

impl Node {
    /// Creates a node carrying the attributes of its kind at default values.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        let attrs: &[Attr] = match kind {
            NodeKind::Transform => &Attr::TRANSFORM,
            NodeKind::Camera => &Attr::CAMERA,
            NodeKind::Mesh => &[Attr::Visibility],
        };
        Self {
            name: name.into(),
            kind,
            parent: None,
            children: Vec::new(),
            attrs: attrs.iter().map(|a| (*a, a.default_value())).collect(),
            locked: HashSet::new(),
            mesh: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Geometry, for mesh shapes.
    pub fn mesh(&self) -> Option<&PlaneMesh> {
        self.mesh.as_ref()
    }

    pub fn has_attr(&self, attr: Attr) -> bool {
        self.attrs.contains_key(&attr)
    }

    pub fn attr(&self, attr: Attr) -> Option<f64> {
        self.attrs.get(&attr).copied()
    }

    /// Stores a value. Returns `false` when the node has no such attribute.
    pub(crate) fn store(&mut self, attr: Attr, value: f64) -> bool {
        match self.attrs.get_mut(&attr) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn is_locked(&self, attr: Attr) -> bool {
        self.locked.contains(&attr)
    }

    pub(crate) fn set_locked(&mut self, attr: Attr, locked: bool) {
        if locked {
            self.locked.insert(attr);
        } else {
            self.locked.remove(&attr);
        }
    }

    /// Translate/rotate/scale channels; identity for shapes.
    pub fn channels(&self) -> TransformChannels {
        if self.kind != NodeKind::Transform {
            return TransformChannels::identity();
        }
        let v = |x: Attr, y: Attr, z: Attr| {
            DVec3::new(
                self.attr(x).unwrap_or_default(),
                self.attr(y).unwrap_or_default(),
                self.attr(z).unwrap_or_default(),
            )
        };
        TransformChannels {
            translate: v(Attr::TranslateX, Attr::TranslateY, Attr::TranslateZ),
            rotate_degrees: v(Attr::RotateX, Attr::RotateY, Attr::RotateZ),
            scale: v(Attr::ScaleX, Attr::ScaleY, Attr::ScaleZ),
        }
    }
}

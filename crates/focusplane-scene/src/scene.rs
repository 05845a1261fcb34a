//! In-memory host scene.
//!
//! [`InMemoryScene`] implements the [`SceneGraph`] port with the behaviors the
//! focus plane tool relies on from a real host: attribute locks, standing
//! expressions that re-evaluate when an input changes, and synchronous change
//! notifications delivered one reaction at a time.

use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use focusplane_core::{
    as_flag, Attr, AttrChangeHandler, DMat4, Expression, ExpressionId, FocusPair,
    FocusPlaneError, NodeId, NodeKind, PanelLayout, PlaneSpec, Plug, Result, SceneGraph,
    Subscription,
};
use serde::{Deserialize, Serialize};

use crate::mesh::PlaneMesh;
use crate::node::Node;

/// Host-side knobs of the in-memory scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    /// Reactions delivered by one dispatch before it is declared a storm.
    pub max_notifications_per_dispatch: usize,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            max_notifications_per_dispatch: 1024,
        }
    }
}

struct SubscriptionEntry {
    plug: Plug,
    pair: FocusPair,
    handler: Rc<dyn AttrChangeHandler>,
}

/// A scene held entirely in memory.
#[derive(Default)]
pub struct InMemoryScene {
    options: SceneOptions,
    nodes: BTreeMap<NodeId, Node>,
    next_node: u64,
    selection: Vec<NodeId>,
    expressions: BTreeMap<ExpressionId, Expression>,
    next_expression: u64,
    subscriptions: BTreeMap<u64, SubscriptionEntry>,
    next_subscription: u64,
    pending: VecDeque<Plug>,
    dispatching: bool,
    mutations: usize,
    errors: Vec<String>,
    panels: Vec<PanelLayout>,
}

impl InMemoryScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty scene with custom host options.
    pub fn with_options(options: SceneOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    /// Adds a node of any kind, optionally under `parent`.
    pub fn create_node(
        &mut self,
        name: &str,
        kind: NodeKind,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        let id = self.insert(Node::new(self.unique_name(name), kind));
        if let Some(parent) = parent {
            self.attach(id, parent)?;
        }
        Ok(id)
    }

    /// Adds a transform, optionally under `parent`.
    pub fn create_transform(&mut self, name: &str, parent: Option<NodeId>) -> Result<NodeId> {
        self.create_node(name, NodeKind::Transform, parent)
    }

    /// Adds a camera: a transform called `name` with a camera shape below it.
    ///
    /// Returns `(transform, shape)`.
    pub fn create_camera(&mut self, name: &str) -> Result<(NodeId, NodeId)> {
        let transform = self.create_transform(name, None)?;
        let shape_name = format!("{}Shape", self.node(transform)?.name);
        let shape = self.create_node(&shape_name, NodeKind::Camera, Some(transform))?;
        log::debug!("created camera '{name}' ({transform}, shape {shape})");
        Ok((transform, shape))
    }

    /// Looks a node up by exact name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| *id)
    }

    /// Borrows a node.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(FocusPlaneError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or(FocusPlaneError::NodeNotFound(id))
    }

    /// Geometry of a mesh shape, or of the first mesh shape below a transform.
    pub fn mesh(&self, id: NodeId) -> Option<&PlaneMesh> {
        let node = self.nodes.get(&id)?;
        node.mesh().or_else(|| {
            node.children()
                .iter()
                .find_map(|child| self.nodes.get(child).and_then(Node::mesh))
        })
    }

    /// Object-to-world matrix of a node.
    pub fn world_matrix(&self, id: NodeId) -> Result<DMat4> {
        let mut matrix = DMat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            matrix = node.channels().to_matrix() * matrix;
            if node.kind == NodeKind::Transform
                && !as_flag(node.attr(Attr::InheritsTransform).unwrap_or(1.0))
            {
                break;
            }
            current = node.parent;
        }
        Ok(matrix)
    }

    /// Number of scene mutations performed so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    /// User-facing errors reported so far.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Panels presented so far, oldest first.
    pub fn panels(&self) -> &[PanelLayout] {
        &self.panels
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Installed expressions.
    pub fn expressions(&self) -> impl Iterator<Item = &Expression> {
        self.expressions.values()
    }

    /// Host-syntax text of an installed expression.
    pub fn expression_text(&self, id: ExpressionId) -> Option<String> {
        let expression = self.expressions.get(&id)?;
        let name_of = |node: NodeId| {
            self.nodes
                .get(&node)
                .map_or_else(|| node.to_string(), |n| n.name.clone())
        };
        Some(expression.render(&name_of))
    }

    fn insert(&mut self, node: Node) -> NodeId {
        self.next_node += 1;
        let id = NodeId(self.next_node);
        self.nodes.insert(id, node);
        self.mutations += 1;
        id
    }

    /// Host-style unique naming: `name`, then `name1`, `name2`, ...
    fn unique_name(&self, base: &str) -> String {
        let taken = |candidate: &str| self.nodes.values().any(|n| n.name == candidate);
        if !taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{base}{i}"))
            .find(|candidate| !taken(candidate.as_str()))
            .unwrap_or_else(|| base.to_string())
    }

    fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        self.node(parent)?;
        if let Some(old) = self.node(child)?.parent {
            self.node_mut(old)?.children.retain(|c| *c != child);
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        self.mutations += 1;
        Ok(())
    }

    fn write_raw(&mut self, plug: Plug, value: f64) -> Result<()> {
        let node = self.node_mut(plug.node)?;
        if !node.store(plug.attr, value) {
            return Err(FocusPlaneError::AttributeNotFound {
                node: node.name.clone(),
                attr: plug.attr,
            });
        }
        self.mutations += 1;
        Ok(())
    }

    /// Writes, queues the notification and re-evaluates dependent expressions.
    fn write_notify(&mut self, plug: Plug, value: f64) -> Result<()> {
        self.write_raw(plug, value)?;
        self.pending.push_back(plug);
        self.propagate(plug)
    }

    fn propagate(&mut self, origin: Plug) -> Result<()> {
        let limit = self.options.max_notifications_per_dispatch;
        let mut work = vec![origin];
        let mut evaluations = 0usize;
        while let Some(changed) = work.pop() {
            let dependents: Vec<Expression> = self
                .expressions
                .values()
                .filter(|e| e.depends_on(changed))
                .cloned()
                .collect();
            for expression in dependents {
                evaluations += 1;
                if evaluations > limit {
                    return Err(FocusPlaneError::NotificationStorm { limit });
                }
                work.extend(self.evaluate(&expression)?);
            }
        }
        Ok(())
    }

    /// Runs every statement of `expression`. Driven plugs ignore locks.
    fn evaluate(&mut self, expression: &Expression) -> Result<Vec<Plug>> {
        let mut written = Vec::with_capacity(expression.bindings.len());
        for binding in &expression.bindings {
            let value = binding.expr.eval(&mut |plug: Plug| self.get_attr(plug))?;
            self.write_raw(binding.target, value)?;
            self.pending.push_back(binding.target);
            written.push(binding.target);
        }
        log::trace!("evaluated expression '{}'", expression.name);
        Ok(written)
    }

    /// Delivers queued notifications unless a dispatch is already running.
    ///
    /// Writes made by a reaction are queued and delivered after it returns,
    /// so reactions never overlap.
    fn dispatch(&mut self) -> Result<()> {
        if self.dispatching {
            return Ok(());
        }
        self.dispatching = true;
        let result = self.drain_pending();
        self.dispatching = false;
        if result.is_err() {
            self.pending.clear();
        }
        result
    }

    fn drain_pending(&mut self) -> Result<()> {
        let limit = self.options.max_notifications_per_dispatch;
        let mut delivered = 0usize;
        while let Some(plug) = self.pending.pop_front() {
            let reactions: Vec<(u64, FocusPair, Rc<dyn AttrChangeHandler>)> = self
                .subscriptions
                .iter()
                .filter(|(_, entry)| entry.plug == plug)
                .map(|(id, entry)| (*id, entry.pair, Rc::clone(&entry.handler)))
                .collect();
            for (id, pair, handler) in reactions {
                // A previous reaction may have unsubscribed this one.
                if !self.subscriptions.contains_key(&id) {
                    continue;
                }
                delivered += 1;
                if delivered > limit {
                    log::error!(
                        "notification storm on {}: stopped after {limit} deliveries",
                        plug.attr
                    );
                    return Err(FocusPlaneError::NotificationStorm { limit });
                }
                log::trace!("{} fired by {}", handler.name(), plug.attr);
                handler.on_change(self, &pair)?;
            }
        }
        Ok(())
    }

    fn check_writable(&self, plug: Plug) -> Result<()> {
        let node = self.node(plug.node)?;
        if !node.has_attr(plug.attr) {
            return Err(FocusPlaneError::AttributeNotFound {
                node: node.name.clone(),
                attr: plug.attr,
            });
        }
        if node.is_locked(plug.attr) {
            return Err(FocusPlaneError::AttributeLocked {
                node: node.name.clone(),
                attr: plug.attr,
            });
        }
        Ok(())
    }
}

impl SceneGraph for InMemoryScene {
    fn selection(&self) -> Vec<NodeId> {
        self.selection.clone()
    }

    fn set_selection(&mut self, nodes: &[NodeId]) -> Result<()> {
        for node in nodes {
            self.node(*node)?;
        }
        self.selection = nodes.to_vec();
        self.mutations += 1;
        Ok(())
    }

    fn kind(&self, node: NodeId) -> Result<NodeKind> {
        Ok(self.node(node)?.kind)
    }

    fn name(&self, node: NodeId) -> Result<String> {
        Ok(self.node(node)?.name.clone())
    }

    fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(node)?.parent)
    }

    fn children(&self, node: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.node(node)?.children.clone())
    }

    fn get_attr(&self, plug: Plug) -> Result<f64> {
        let node = self.node(plug.node)?;
        node.attr(plug.attr)
            .ok_or_else(|| FocusPlaneError::AttributeNotFound {
                node: node.name.clone(),
                attr: plug.attr,
            })
    }

    fn set_attr(&mut self, plug: Plug, value: f64) -> Result<()> {
        self.check_writable(plug)?;
        self.write_notify(plug, value)?;
        self.dispatch()
    }

    fn lock_attr(&mut self, plug: Plug, locked: bool) -> Result<()> {
        let node = self.node_mut(plug.node)?;
        if !node.has_attr(plug.attr) {
            return Err(FocusPlaneError::AttributeNotFound {
                node: node.name.clone(),
                attr: plug.attr,
            });
        }
        node.set_locked(plug.attr, locked);
        self.mutations += 1;
        Ok(())
    }

    fn is_locked(&self, plug: Plug) -> Result<bool> {
        Ok(self.node(plug.node)?.is_locked(plug.attr))
    }

    fn create_plane(&mut self, spec: &PlaneSpec) -> Result<NodeId> {
        let transform = self.create_transform(&spec.name, None)?;
        let shape_name = format!("{}Shape", self.node(transform)?.name);
        let mut shape = Node::new(self.unique_name(&shape_name), NodeKind::Mesh);
        shape.mesh = Some(PlaneMesh::grid(
            spec.width,
            spec.height,
            spec.subdivisions_x,
            spec.subdivisions_y,
        ));
        let shape = self.insert(shape);
        self.attach(shape, transform)?;
        self.set_selection(&[transform])?;
        log::debug!("created plane '{}' ({transform})", spec.name);
        Ok(transform)
    }

    fn freeze_transform(&mut self, node: NodeId) -> Result<()> {
        let matrix = self.node(node)?.channels().to_matrix();
        for child in self.node(node)?.children.clone() {
            if let Some(mesh) = self.node_mut(child)?.mesh.as_mut() {
                mesh.apply_matrix(&matrix);
                self.mutations += 1;
            }
        }
        for attr in [
            Attr::TranslateX,
            Attr::TranslateY,
            Attr::TranslateZ,
            Attr::RotateX,
            Attr::RotateY,
            Attr::RotateZ,
            Attr::ScaleX,
            Attr::ScaleY,
            Attr::ScaleZ,
        ] {
            self.write_notify(Plug::new(node, attr), attr.default_value())?;
        }
        self.dispatch()
    }

    fn parent_relative(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        self.attach(child, parent)
    }

    fn create_expression(&mut self, expression: Expression) -> Result<ExpressionId> {
        for plug in expression.inputs() {
            self.get_attr(plug)?;
        }
        self.next_expression += 1;
        let id = ExpressionId(self.next_expression);
        self.mutations += 1;
        let written = self.evaluate(&expression)?;
        self.expressions.insert(id, expression);
        for plug in written {
            self.propagate(plug)?;
        }
        self.dispatch()?;
        Ok(id)
    }

    fn subscribe(
        &mut self,
        plug: Plug,
        pair: FocusPair,
        handler: Rc<dyn AttrChangeHandler>,
    ) -> Result<Subscription> {
        self.get_attr(plug)?;
        self.next_subscription += 1;
        let id = self.next_subscription;
        log::debug!(
            "subscribed {} to {}.{}",
            handler.name(),
            self.node(plug.node)?.name,
            plug.attr
        );
        self.subscriptions.insert(
            id,
            SubscriptionEntry {
                plug,
                pair,
                handler,
            },
        );
        Ok(Subscription(id))
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> Result<()> {
        self.subscriptions
            .remove(&subscription.0)
            .map(|_| ())
            .ok_or(FocusPlaneError::SubscriptionNotFound(subscription.0))
    }

    fn present_panel(&mut self, panel: &PanelLayout) -> Result<()> {
        log::debug!("showing window '{}'", panel.title);
        self.panels.push(panel.clone());
        Ok(())
    }

    fn report_error(&mut self, message: &str) {
        log::error!("{message}");
        self.errors.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use focusplane_core::{flag, Expr};

    use super::*;

    struct Counter {
        hits: Cell<usize>,
    }

    impl AttrChangeHandler for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn on_change(&self, _scene: &mut dyn SceneGraph, _pair: &FocusPair) -> Result<()> {
            self.hits.set(self.hits.get() + 1);
            Ok(())
        }
    }

    /// Copies focus distance into the proxy offset on every change, unguarded.
    struct Echo;

    impl AttrChangeHandler for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn on_change(&self, scene: &mut dyn SceneGraph, pair: &FocusPair) -> Result<()> {
            let d = scene.get_attr(pair.focus_distance())?;
            scene.set_attr(pair.offset(), -d)
        }
    }

    /// Copies the proxy offset back into focus distance, unguarded.
    struct EchoBack;

    impl AttrChangeHandler for EchoBack {
        fn name(&self) -> &str {
            "echo back"
        }

        fn on_change(&self, scene: &mut dyn SceneGraph, pair: &FocusPair) -> Result<()> {
            let d = scene.get_attr(pair.offset())?.abs();
            scene.set_attr(pair.focus_distance(), d)
        }
    }

    fn camera_and_plane(scene: &mut InMemoryScene) -> FocusPair {
        let (camera_transform, camera) = scene.create_camera("camera1").unwrap();
        let proxy = scene.create_transform("camera1FocusPlane", Some(camera_transform)).unwrap();
        FocusPair {
            camera,
            camera_transform,
            proxy,
        }
    }

    #[test]
    fn test_create_camera() {
        let mut scene = InMemoryScene::new();
        let (xform, shape) = scene.create_camera("camera1").unwrap();
        assert_eq!(scene.kind(xform).unwrap(), NodeKind::Transform);
        assert_eq!(scene.kind(shape).unwrap(), NodeKind::Camera);
        assert_eq!(scene.name(shape).unwrap(), "camera1Shape");
        assert_eq!(scene.parent(shape).unwrap(), Some(xform));
        assert_eq!(scene.find("camera1"), Some(xform));
    }

    #[test]
    fn test_unique_names() {
        let mut scene = InMemoryScene::new();
        let a = scene.create_transform("grp", None).unwrap();
        let b = scene.create_transform("grp", None).unwrap();
        let c = scene.create_transform("grp", None).unwrap();
        assert_eq!(scene.name(a).unwrap(), "grp");
        assert_eq!(scene.name(b).unwrap(), "grp1");
        assert_eq!(scene.name(c).unwrap(), "grp2");
    }

    #[test]
    fn test_descendants_depth_first() {
        let mut scene = InMemoryScene::new();
        let root = scene.create_transform("root", None).unwrap();
        let a = scene.create_transform("a", Some(root)).unwrap();
        let a1 = scene.create_transform("a1", Some(a)).unwrap();
        let b = scene.create_transform("b", Some(root)).unwrap();
        assert_eq!(scene.descendants(root).unwrap(), vec![a, a1, b]);
    }

    #[test]
    fn test_missing_attribute() {
        let mut scene = InMemoryScene::new();
        let (xform, _) = scene.create_camera("camera1").unwrap();
        let plug = Plug::new(xform, Attr::FocusDistance);
        assert!(matches!(
            scene.get_attr(plug),
            Err(FocusPlaneError::AttributeNotFound { .. })
        ));
        assert!(scene.set_attr(plug, 1.0).is_err());
        assert!(matches!(
            scene.get_attr(Plug::new(NodeId(999), Attr::TranslateZ)),
            Err(FocusPlaneError::NodeNotFound(NodeId(999)))
        ));
    }

    #[test]
    fn test_locked_attribute_rejects_writes() {
        let mut scene = InMemoryScene::new();
        let node = scene.create_transform("t", None).unwrap();
        let plug = Plug::new(node, Attr::ScaleX);
        scene.lock_attr(plug, true).unwrap();
        assert!(scene.is_locked(plug).unwrap());
        assert!(matches!(
            scene.set_attr(plug, 2.0),
            Err(FocusPlaneError::AttributeLocked { .. })
        ));
        assert_eq!(scene.get_attr(plug).unwrap(), 1.0);
    }

    #[test]
    fn test_create_plane_selects_it() {
        let mut scene = InMemoryScene::new();
        let plane = scene
            .create_plane(&PlaneSpec {
                name: "p".into(),
                width: 1.0,
                height: 1.0,
                subdivisions_x: 3,
                subdivisions_y: 3,
            })
            .unwrap();
        assert_eq!(scene.selection(), vec![plane]);
        assert_eq!(scene.mesh(plane).unwrap().num_faces(), 9);
        let shape = scene.children(plane).unwrap()[0];
        assert_eq!(scene.kind(shape).unwrap(), NodeKind::Mesh);
    }

    #[test]
    fn test_freeze_bakes_into_vertices() {
        let mut scene = InMemoryScene::new();
        let plane = scene
            .create_plane(&PlaneSpec {
                name: "p".into(),
                width: 1.0,
                height: 1.0,
                subdivisions_x: 1,
                subdivisions_y: 1,
            })
            .unwrap();
        scene.set_attr(Plug::new(plane, Attr::TranslateZ), 2.0).unwrap();
        scene.set_attr(Plug::new(plane, Attr::ScaleX), 4.0).unwrap();
        scene.freeze_transform(plane).unwrap();

        assert!(scene.node(plane).unwrap().channels().is_identity());
        let (lo, hi) = scene.mesh(plane).unwrap().bounding_box().unwrap();
        assert!((lo.x + 2.0).abs() < 1e-12 && (hi.x - 2.0).abs() < 1e-12);
        assert!((lo.z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_expression_is_live() {
        let mut scene = InMemoryScene::new();
        let pair = camera_and_plane(&mut scene);
        let target = Plug::new(pair.proxy, Attr::ScaleX);
        let expression = Expression::new("e").with_binding(
            target,
            Expr::attr(pair.focus_distance()) * Expr::constant(2.0),
        );
        let id = scene.create_expression(expression).unwrap();
        assert_eq!(scene.get_attr(target).unwrap(), 10.0);

        scene.set_attr(pair.focus_distance(), 7.0).unwrap();
        assert_eq!(scene.get_attr(target).unwrap(), 14.0);
        assert_eq!(
            scene.expression_text(id).unwrap(),
            "camera1FocusPlane.scaleX = camera1Shape.focusDistance * 2;"
        );
    }

    #[test]
    fn test_expressions_listed_in_install_order() {
        let mut scene = InMemoryScene::new();
        let pair = camera_and_plane(&mut scene);
        let mut ids = Vec::new();
        for (name, attr) in [("sx", Attr::ScaleX), ("sy", Attr::ScaleY), ("sz", Attr::ScaleZ)] {
            let expression = Expression::new(name)
                .with_binding(Plug::new(pair.proxy, attr), Expr::attr(pair.focus_distance()));
            ids.push(scene.create_expression(expression).unwrap());
        }
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        let names: Vec<_> = scene.expressions().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["sx", "sy", "sz"]);
        assert!(scene.expression_text(ids[1]).unwrap().starts_with("camera1FocusPlane.scaleY"));
    }

    #[test]
    fn test_loose_shape_has_no_parent() {
        let mut scene = InMemoryScene::new();
        let shape = scene.create_node("looseShape", NodeKind::Camera, None).unwrap();
        assert_eq!(scene.kind(shape).unwrap(), NodeKind::Camera);
        assert_eq!(scene.parent(shape).unwrap(), None);
        assert_eq!(scene.get_attr(Plug::new(shape, Attr::FocusDistance)).unwrap(), 5.0);
    }

    #[test]
    fn test_expression_drives_locked_plug() {
        let mut scene = InMemoryScene::new();
        let pair = camera_and_plane(&mut scene);
        let target = Plug::new(pair.proxy, Attr::ScaleY);
        scene.lock_attr(target, true).unwrap();
        scene
            .create_expression(
                Expression::new("e").with_binding(target, Expr::attr(pair.focus_distance())),
            )
            .unwrap();
        scene.set_attr(pair.focus_distance(), 3.0).unwrap();
        assert_eq!(scene.get_attr(target).unwrap(), 3.0);
    }

    #[test]
    fn test_every_write_notifies() {
        let mut scene = InMemoryScene::new();
        let pair = camera_and_plane(&mut scene);
        let counter = Rc::new(Counter { hits: Cell::new(0) });
        scene
            .subscribe(pair.focus_distance(), pair, counter.clone())
            .unwrap();
        scene.set_attr(pair.focus_distance(), 5.0).unwrap();
        scene.set_attr(pair.focus_distance(), 5.0).unwrap();
        scene.set_attr(pair.offset(), 1.0).unwrap();
        assert_eq!(counter.hits.get(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let mut scene = InMemoryScene::new();
        let pair = camera_and_plane(&mut scene);
        let counter = Rc::new(Counter { hits: Cell::new(0) });
        let sub = scene
            .subscribe(pair.focus_distance(), pair, counter.clone())
            .unwrap();
        scene.unsubscribe(sub).unwrap();
        scene.set_attr(pair.focus_distance(), 9.0).unwrap();
        assert_eq!(counter.hits.get(), 0);
        assert_eq!(scene.subscription_count(), 0);
        assert!(matches!(
            scene.unsubscribe(sub),
            Err(FocusPlaneError::SubscriptionNotFound(_))
        ));
    }

    #[test]
    fn test_unguarded_cycle_is_a_storm() {
        let mut scene = InMemoryScene::with_options(SceneOptions {
            max_notifications_per_dispatch: 64,
        });
        let pair = camera_and_plane(&mut scene);
        scene.subscribe(pair.focus_distance(), pair, Rc::new(Echo)).unwrap();
        scene.subscribe(pair.offset(), pair, Rc::new(EchoBack)).unwrap();

        let result = scene.set_attr(pair.focus_distance(), 12.0);
        assert!(matches!(
            result,
            Err(FocusPlaneError::NotificationStorm { limit: 64 })
        ));

        // The queue is dropped; the scene stays usable.
        scene.set_attr(Plug::new(pair.proxy, Attr::Visibility), flag(false)).ok();
        assert_eq!(scene.get_attr(Plug::new(pair.proxy, Attr::Visibility)).unwrap(), 0.0);
    }

    #[test]
    fn test_world_matrix_follows_parent() {
        let mut scene = InMemoryScene::new();
        let pair = camera_and_plane(&mut scene);
        scene
            .set_attr(Plug::new(pair.camera_transform, Attr::TranslateX), 3.0)
            .unwrap();
        scene.set_attr(pair.offset(), -2.0).unwrap();
        let origin = scene
            .world_matrix(pair.proxy)
            .unwrap()
            .transform_point3(focusplane_core::DVec3::ZERO);
        assert!((origin - focusplane_core::DVec3::new(3.0, 0.0, -2.0)).length() < 1e-12);
    }

    #[test]
    fn test_panels_and_errors_are_recorded() {
        let mut scene = InMemoryScene::new();
        let before = scene.mutation_count();
        scene.report_error("boom");
        scene
            .present_panel(&PanelLayout {
                title: "t".into(),
                width: 10,
                checkboxes: Vec::new(),
            })
            .unwrap();
        assert_eq!(scene.errors(), ["boom".to_string()]);
        assert_eq!(scene.panels().len(), 1);
        assert_eq!(scene.mutation_count(), before);
    }
}

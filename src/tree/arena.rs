//! The element tree: a slotmap arena of nodes plus parent/child topology.
//!
//! All structural mutation goes through [`Tree`]: instantiating blueprints,
//! attaching and removing subtrees, swapping a component's children after a
//! rebuild. The tree also owns the controlled state-mutation path
//! ([`Tree::set_state`]) and the dispatch of behavior slots.
//!
//! Nodes never hold references to each other; topology lives in secondary
//! maps keyed by [`NodeId`], so there are no ownership cycles and removal is
//! a map operation.

use slotmap::{SecondaryMap, SlotMap};

use crate::component::{ComponentCell, StateError, Value};
use crate::scheduler::SchedulerHandle;
use crate::tree::element::Element;
use crate::tree::node::{NodeData, NodeId, SlotHandler};

/// Errors from structural tree mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error("node does not exist in the tree")]
    NodeNotFound,
    /// Attaching here would make the node its own ancestor.
    #[error("attach would create a cycle")]
    Cycle,
}

/// Arena-backed element tree.
#[derive(Default)]
pub struct Tree {
    nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    /// Scheduler binding, inherited from the parent at attach time.
    context: SecondaryMap<NodeId, SchedulerHandle>,
    /// Structure epoch, bumped on this node and every ancestor whenever the
    /// subtree below changes. Lets layout caches validate entries cheaply.
    epoch: SecondaryMap<NodeId, u64>,
    root: Option<NodeId>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// The root node, if one has been instantiated.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node's data, if it is alive.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to the node's data, if it is alive.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// The node's children, in order. Empty for missing nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The node's parent, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// The node's component cell, if it is a component.
    pub fn cell(&self, id: NodeId) -> Option<&ComponentCell> {
        self.nodes.get(id).and_then(|n| n.cell.as_ref())
    }

    /// Mutable access to the node's component cell.
    pub fn cell_mut(&mut self, id: NodeId) -> Option<&mut ComponentCell> {
        self.nodes.get_mut(id).and_then(|n| n.cell.as_mut())
    }

    /// The node's structure epoch. Bumped whenever its subtree changes.
    pub fn epoch(&self, id: NodeId) -> u64 {
        self.epoch.get(id).copied().unwrap_or(0)
    }

    /// Whether the node is flagged dirty.
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.nodes.get(id).map(|n| n.dirty).unwrap_or(false)
    }

    /// Pre-order traversal of the subtree rooted at `id`.
    pub fn walk_depth_first(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            out.push(current);
            // Reverse push keeps children in document order.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Visit every node of the subtree rooted at `id`, pre-order.
    pub fn visit<F>(&self, id: NodeId, mut f: F)
    where
        F: FnMut(NodeId, &NodeData),
    {
        for node in self.walk_depth_first(id) {
            if let Some(data) = self.nodes.get(node) {
                f(node, data);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Instantiation and structure
    // -----------------------------------------------------------------------

    /// Instantiate a blueprint into arena nodes, detached from any parent.
    ///
    /// Component nodes are mounted here (their `on_mount` hook runs) and
    /// flagged dirty so their first build is pending. The first instantiated
    /// subtree becomes the root. Use [`bind_context`] or [`attach`] to hook
    /// the subtree up to a scheduler.
    ///
    /// [`bind_context`]: Tree::bind_context
    /// [`attach`]: Tree::attach
    pub fn instantiate(&mut self, element: Element) -> NodeId {
        let id = self.instantiate_under(element, None);
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    fn instantiate_under(&mut self, element: Element, parent: Option<NodeId>) -> NodeId {
        let Element {
            kind,
            slots,
            children,
            component,
        } = element;

        let mut data = match component {
            Some(behavior) => NodeData::component(ComponentCell::new(behavior)),
            None => NodeData::new(kind),
        };
        data.slots = slots;
        let is_component = data.cell.is_some();
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());

        let context = if let Some(parent) = parent {
            self.parent.insert(id, parent);
            self.children[parent].push(id);
            self.context.get(parent).cloned()
        } else {
            None
        };
        if let Some(handle) = context {
            self.context.insert(id, handle);
        }

        if is_component {
            if let Some(cell) = self.cell_mut(id) {
                cell.mount();
            }
            // First build is pending from the moment the node exists.
            self.mark_dirty(id);
        }

        for child in children {
            self.instantiate_under(child, Some(id));
        }
        id
    }

    /// Attach a detached node (and its subtree) under a parent.
    ///
    /// Rejects attaches that would make a node its own ancestor. A node
    /// already attached elsewhere is detached from its old parent first. The
    /// parent's scheduler binding propagates into the whole attached subtree,
    /// and any dirty nodes in it are scheduled.
    pub fn attach(&mut self, child: NodeId, parent: NodeId) -> Result<(), StructuralError> {
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            return Err(StructuralError::NodeNotFound);
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(StructuralError::Cycle);
        }

        if let Some(old_parent) = self.parent.get(child).copied() {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&c| c != child);
            }
            self.bump_epochs(old_parent);
        }
        if self.root == Some(child) {
            self.root = None;
        }

        self.parent.insert(child, parent);
        self.children[parent].push(child);
        let inherited = self.context.get(parent).cloned();
        self.propagate_context(child, inherited);
        self.bump_epochs(parent);
        Ok(())
    }

    /// Remove a node and its whole subtree, unmounting components.
    ///
    /// Unmount hooks run children-first. Returns `false` for a stale id.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        if let Some(parent) = self.parent.get(id).copied() {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.retain(|&c| c != id);
            }
            self.bump_epochs(parent);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        self.teardown(id);
        true
    }

    /// Swap a node's children for freshly instantiated blueprints.
    ///
    /// The old child subtrees are torn down (components unmounted); the new
    /// blueprints inherit the node's scheduler binding, so any components in
    /// them are scheduled for their first build. Structure epochs along the
    /// ancestor chain are bumped.
    pub fn replace_children(&mut self, id: NodeId, elements: Vec<Element>) {
        if !self.nodes.contains_key(id) {
            return;
        }
        let old = std::mem::take(&mut self.children[id]);
        for child in old {
            self.teardown(child);
        }
        for element in elements {
            self.instantiate_under(element, Some(id));
        }
        self.bump_epochs(id);
    }

    /// Tear down a subtree: unmount components children-first and free the
    /// arena slots.
    fn teardown(&mut self, id: NodeId) {
        let order = self.walk_depth_first(id);
        for &node in order.iter().rev() {
            if let Some(cell) = self.cell_mut(node) {
                cell.unmount();
            }
            self.nodes.remove(node);
            self.children.remove(node);
            self.parent.remove(node);
            self.context.remove(node);
            self.epoch.remove(node);
        }
    }

    /// Whether `ancestor` lies on the parent chain of `node` (or is `node`).
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent.get(id).copied();
        }
        false
    }

    fn bump_epochs(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node) = current {
            let next = self.epoch.get(node).copied().unwrap_or(0) + 1;
            self.epoch.insert(node, next);
            current = self.parent.get(node).copied();
        }
    }

    // -----------------------------------------------------------------------
    // Scheduler binding
    // -----------------------------------------------------------------------

    /// Bind a scheduler handle to a subtree.
    ///
    /// Every node in the subtree gets the handle as its context; nodes that
    /// are already dirty (freshly instantiated components, for instance) are
    /// scheduled immediately.
    pub fn bind_context(&mut self, id: NodeId, handle: SchedulerHandle) {
        self.propagate_context(id, Some(handle));
    }

    /// The scheduler handle bound to a node, if any.
    pub fn context(&self, id: NodeId) -> Option<&SchedulerHandle> {
        self.context.get(id)
    }

    fn propagate_context(&mut self, id: NodeId, handle: Option<SchedulerHandle>) {
        for node in self.walk_depth_first(id) {
            match &handle {
                Some(handle) => {
                    self.context.insert(node, handle.clone());
                    if self.is_dirty(node) {
                        handle.schedule(node);
                    }
                }
                None => {
                    self.context.remove(node);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Dirty marking and state
    // -----------------------------------------------------------------------

    /// Flag a node dirty and, if a scheduler is bound, queue it for rebuild.
    ///
    /// Without a binding the flag still sticks, so the node is scheduled as
    /// soon as a context arrives. No-op for stale ids.
    pub fn mark_dirty(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.dirty = true;
        if let Some(handle) = self.context.get(id) {
            handle.schedule(id);
        }
    }

    /// Clear a node's dirty flag.
    pub fn clear_dirty(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.dirty = false;
        }
    }

    /// Write a component's state through the controlled mutation path.
    ///
    /// Stores `value` under `key` in the component's private store. If the
    /// stored value actually changed and the component is mounted, the node is
    /// marked dirty. Returns whether the value changed.
    pub fn set_state(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<bool, StateError> {
        if !self.nodes.contains_key(id) {
            return Err(StateError::NodeNotFound);
        }
        let Some(cell) = self.cell_mut(id) else {
            return Err(StateError::NotAComponent);
        };
        let changed = cell.state_mut().set(key, value);
        if changed && cell.is_mounted() {
            self.mark_dirty(id);
        }
        Ok(changed)
    }

    // -----------------------------------------------------------------------
    // Slot dispatch
    // -----------------------------------------------------------------------

    /// Invoke a node's click slot. Returns whether a handler ran.
    pub fn trigger_click(&mut self, id: NodeId) -> bool {
        self.trigger_slot(id, |n| &mut n.slots.on_click)
    }

    /// Invoke a node's drag slot. Returns whether a handler ran.
    pub fn trigger_drag(&mut self, id: NodeId) -> bool {
        self.trigger_slot(id, |n| &mut n.slots.on_drag)
    }

    /// Take the handler out, run it without borrowing the tree, and put it
    /// back if the node is still alive.
    fn trigger_slot<F>(&mut self, id: NodeId, slot: F) -> bool
    where
        F: Fn(&mut NodeData) -> &mut Option<SlotHandler>,
    {
        let Some(mut handler) = self.nodes.get_mut(id).and_then(|n| slot(n).take()) else {
            return false;
        };
        handler();
        if let Some(node) = self.nodes.get_mut(id) {
            let restored = slot(node);
            if restored.is_none() {
                *restored = Some(handler);
            }
        }
        true
    }
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.nodes.len())
            .field("root", &self.root)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{BuildError, Component, StateStore};
    use crate::geometry::Size;
    use crate::scheduler::Scheduler;
    use crate::tree::node::NodeKind;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counter;

    impl Component for Counter {
        fn type_name(&self) -> &str {
            "Counter"
        }

        fn build(&self, state: &StateStore) -> Result<Element, BuildError> {
            Ok(Element::text(format!("count: {}", state.int("count", 0))))
        }

        fn on_mount(&mut self, state: &mut StateStore) {
            state.set("count", 0i64);
        }
    }

    /// Flips shared flags so tests can observe lifecycle hooks.
    struct Probe {
        mounted: Rc<Cell<bool>>,
        unmounted: Rc<Cell<bool>>,
    }

    impl Component for Probe {
        fn build(&self, _state: &StateStore) -> Result<Element, BuildError> {
            Ok(Element::fixed(Size::ZERO))
        }

        fn on_mount(&mut self, _state: &mut StateStore) {
            self.mounted.set(true);
        }

        fn on_unmount(&mut self) {
            self.unmounted.set(true);
        }
    }

    fn probe() -> (Element, Rc<Cell<bool>>, Rc<Cell<bool>>) {
        let mounted = Rc::new(Cell::new(false));
        let unmounted = Rc::new(Cell::new(false));
        let el = Element::component(Probe {
            mounted: mounted.clone(),
            unmounted: unmounted.clone(),
        });
        (el, mounted, unmounted)
    }

    // -----------------------------------------------------------------------
    // Instantiation
    // -----------------------------------------------------------------------

    #[test]
    fn instantiate_builds_topology() {
        let mut tree = Tree::new();
        let root = tree.instantiate(
            Element::vstack(10.0)
                .with_child(Element::fixed(Size::new(40.0, 20.0)))
                .with_child(Element::fixed(Size::new(60.0, 30.0))),
        );
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.children(root).len(), 2);
        for &child in tree.children(root) {
            assert_eq!(tree.parent(child), Some(root));
        }
    }

    #[test]
    fn first_instantiate_becomes_root() {
        let mut tree = Tree::new();
        let a = tree.instantiate(Element::text("a"));
        let b = tree.instantiate(Element::text("b"));
        assert_eq!(tree.root(), Some(a));
        assert_ne!(a, b);
    }

    #[test]
    fn instantiate_mounts_components() {
        let mut tree = Tree::new();
        let (el, mounted, _) = probe();
        let id = tree.instantiate(el);
        assert!(mounted.get());
        assert!(tree.cell(id).unwrap().is_mounted());
        // First build pending even without a scheduler bound.
        assert!(tree.is_dirty(id));
    }

    #[test]
    fn on_mount_state_lands_without_scheduling() {
        let scheduler = Scheduler::new();
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::component(Counter));
        // Mount wrote initial state directly.
        assert_eq!(tree.cell(id).unwrap().state().int("count", -1), 0);
        // Only the first-build entry is pending, not a second one from the
        // mount hook's writes.
        tree.bind_context(id, scheduler.handle());
        assert_eq!(scheduler.handle().pending_count(), 1);
    }

    #[test]
    fn instantiate_carries_slots() {
        let clicked = Rc::new(Cell::new(0));
        let count = clicked.clone();
        let mut tree = Tree::new();
        let id = tree.instantiate(
            Element::fixed(Size::ZERO).on_click(move || count.set(count.get() + 1)),
        );
        assert!(tree.trigger_click(id));
        assert!(tree.trigger_click(id));
        assert_eq!(clicked.get(), 2);
    }

    #[test]
    fn trigger_without_handler_is_false() {
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::text("x"));
        assert!(!tree.trigger_click(id));
        assert!(!tree.trigger_drag(id));
    }

    // -----------------------------------------------------------------------
    // Attach
    // -----------------------------------------------------------------------

    #[test]
    fn attach_rejects_self() {
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::text("x"));
        assert_eq!(tree.attach(id, id), Err(StructuralError::Cycle));
    }

    #[test]
    fn attach_rejects_ancestor_cycle() {
        let mut tree = Tree::new();
        let root = tree.instantiate(Element::vstack(0.0).with_child(Element::vstack(0.0)));
        let inner = tree.children(root)[0];
        assert_eq!(tree.attach(root, inner), Err(StructuralError::Cycle));
    }

    #[test]
    fn attach_missing_node_errors() {
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::text("x"));
        let ghost = tree.instantiate(Element::text("ghost"));
        tree.remove(ghost);
        assert_eq!(tree.attach(ghost, id), Err(StructuralError::NodeNotFound));
        assert_eq!(tree.attach(id, ghost), Err(StructuralError::NodeNotFound));
    }

    #[test]
    fn attach_detaches_from_old_parent() {
        let mut tree = Tree::new();
        let a = tree.instantiate(Element::vstack(0.0));
        let b = tree.instantiate(Element::vstack(0.0));
        let child = tree.instantiate(Element::text("x"));

        tree.attach(child, a).unwrap();
        assert_eq!(tree.children(a), &[child]);

        tree.attach(child, b).unwrap();
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[child]);
        assert_eq!(tree.parent(child), Some(b));
    }

    #[test]
    fn attach_propagates_context_and_schedules_dirty() {
        let scheduler = Scheduler::new();
        let mut tree = Tree::new();
        let root = tree.instantiate(Element::vstack(0.0));
        tree.bind_context(root, scheduler.handle());

        let orphan = tree.instantiate(Element::component(Counter));
        assert!(!scheduler.handle().is_scheduled(orphan));

        tree.attach(orphan, root).unwrap();
        assert!(tree.context(orphan).is_some());
        assert!(scheduler.handle().is_scheduled(orphan));
    }

    // -----------------------------------------------------------------------
    // Remove / teardown
    // -----------------------------------------------------------------------

    #[test]
    fn remove_unmounts_subtree() {
        let mut tree = Tree::new();
        let (el, _, unmounted) = probe();
        let root = tree.instantiate(Element::vstack(0.0).with_child(el));
        assert_eq!(tree.len(), 2);

        assert!(tree.remove(root));
        assert!(unmounted.get());
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn remove_detaches_from_parent() {
        let mut tree = Tree::new();
        let root = tree
            .instantiate(Element::vstack(0.0).with_child(Element::text("a")).with_child(Element::text("b")));
        let a = tree.children(root)[0];
        assert!(tree.remove(a));
        assert_eq!(tree.children(root).len(), 1);
        assert!(!tree.contains(a));
    }

    #[test]
    fn remove_stale_id_is_false() {
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::text("x"));
        assert!(tree.remove(id));
        assert!(!tree.remove(id));
    }

    // -----------------------------------------------------------------------
    // replace_children
    // -----------------------------------------------------------------------

    #[test]
    fn replace_children_swaps_subtree() {
        let mut tree = Tree::new();
        let root = tree.instantiate(Element::vstack(0.0).with_child(Element::text("old")));
        let old = tree.children(root)[0];

        tree.replace_children(root, vec![Element::text("a"), Element::text("b")]);
        assert!(!tree.contains(old));
        assert_eq!(tree.children(root).len(), 2);
    }

    #[test]
    fn replace_children_unmounts_old_components() {
        let mut tree = Tree::new();
        let (el, _, unmounted) = probe();
        let root = tree.instantiate(Element::vstack(0.0).with_child(el));

        tree.replace_children(root, vec![]);
        assert!(unmounted.get());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn replace_children_schedules_new_components() {
        let scheduler = Scheduler::new();
        let mut tree = Tree::new();
        let root = tree.instantiate(Element::vstack(0.0));
        tree.bind_context(root, scheduler.handle());

        tree.replace_children(root, vec![Element::component(Counter)]);
        let inner = tree.children(root)[0];
        assert!(scheduler.handle().is_scheduled(inner));
        assert!(tree.cell(inner).unwrap().is_mounted());
    }

    // -----------------------------------------------------------------------
    // Epochs
    // -----------------------------------------------------------------------

    #[test]
    fn replace_children_bumps_ancestor_epochs() {
        let mut tree = Tree::new();
        let root = tree.instantiate(Element::vstack(0.0).with_child(Element::vstack(0.0)));
        let inner = tree.children(root)[0];
        let root_before = tree.epoch(root);
        let inner_before = tree.epoch(inner);

        tree.replace_children(inner, vec![Element::text("x")]);
        assert!(tree.epoch(inner) > inner_before);
        assert!(tree.epoch(root) > root_before);
    }

    #[test]
    fn sibling_epoch_unaffected() {
        let mut tree = Tree::new();
        let root = tree.instantiate(
            Element::vstack(0.0)
                .with_child(Element::vstack(0.0))
                .with_child(Element::vstack(0.0)),
        );
        let a = tree.children(root)[0];
        let b = tree.children(root)[1];
        let b_before = tree.epoch(b);
        tree.replace_children(a, vec![Element::text("x")]);
        assert_eq!(tree.epoch(b), b_before);
    }

    // -----------------------------------------------------------------------
    // Dirty marking and state
    // -----------------------------------------------------------------------

    #[test]
    fn mark_dirty_without_context_sticks() {
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::text("x"));
        tree.mark_dirty(id);
        assert!(tree.is_dirty(id));
    }

    #[test]
    fn mark_dirty_with_context_schedules() {
        let scheduler = Scheduler::new();
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::text("x"));
        tree.bind_context(id, scheduler.handle());
        tree.mark_dirty(id);
        assert!(scheduler.handle().is_scheduled(id));
    }

    #[test]
    fn set_state_changed_marks_dirty() {
        let scheduler = Scheduler::new();
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::component(Counter));
        tree.bind_context(id, scheduler.handle());
        tree.clear_dirty(id);

        assert_eq!(tree.set_state(id, "count", 5i64), Ok(true));
        assert!(tree.is_dirty(id));
    }

    #[test]
    fn set_state_unchanged_is_quiet() {
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::component(Counter));
        tree.clear_dirty(id);

        // on_mount already stored count = 0.
        assert_eq!(tree.set_state(id, "count", 0i64), Ok(false));
        assert!(!tree.is_dirty(id));
    }

    #[test]
    fn set_state_on_non_component_errors() {
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::text("x"));
        assert_eq!(
            tree.set_state(id, "k", 1i64),
            Err(StateError::NotAComponent)
        );
    }

    #[test]
    fn set_state_on_stale_id_errors() {
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::component(Counter));
        tree.remove(id);
        assert_eq!(tree.set_state(id, "k", 1i64), Err(StateError::NodeNotFound));
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    #[test]
    fn walk_is_preorder_document_order() {
        let mut tree = Tree::new();
        let root = tree.instantiate(
            Element::vstack(0.0)
                .with_child(Element::hstack(0.0).with_child(Element::text("a")))
                .with_child(Element::text("b")),
        );
        let hstack = tree.children(root)[0];
        let a = tree.children(hstack)[0];
        let b = tree.children(root)[1];
        assert_eq!(tree.walk_depth_first(root), vec![root, hstack, a, b]);
    }

    #[test]
    fn visit_sees_kinds() {
        let mut tree = Tree::new();
        let root = tree.instantiate(Element::vstack(0.0).with_child(Element::text("x")));
        let mut names = Vec::new();
        tree.visit(root, |_, data| names.push(data.kind.name()));
        assert_eq!(names, vec!["VStack", "Text"]);
    }

    #[test]
    fn walk_stale_root_is_empty() {
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::text("x"));
        tree.remove(id);
        assert!(tree.walk_depth_first(id).is_empty());
    }

    #[test]
    fn kind_survives_instantiation() {
        let mut tree = Tree::new();
        let id = tree.instantiate(Element::fixed(Size::new(3.0, 4.0)));
        assert_eq!(
            tree.get(id).unwrap().kind,
            NodeKind::Fixed { size: Size::new(3.0, 4.0) }
        );
    }
}

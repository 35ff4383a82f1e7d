//! Node types: NodeId, NodeKind, behavior slots.

use std::fmt;

use slotmap::new_key_type;

use crate::component::ComponentCell;
use crate::geometry::{EdgeInsets, Size};

new_key_type! {
    /// Unique identifier for a tree node. Copy, lightweight (u64).
    ///
    /// Ids are assigned at insertion and never reused while the node is alive;
    /// a stale id is simply absent from the arena.
    pub struct NodeId;
}

// ---------------------------------------------------------------------------
// Layout enums
// ---------------------------------------------------------------------------

/// The axis a sequential stack flows along (its main axis).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StackAxis {
    /// Children flow top to bottom (a VStack).
    #[default]
    Vertical,
    /// Children flow left to right (an HStack).
    Horizontal,
}

/// Cross-axis placement of stack children, and per-axis placement of overlay
/// children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StackAlign {
    Start,
    #[default]
    Center,
    End,
    /// The child is given the full extent of the axis regardless of its
    /// measured size.
    Stretch,
}

// ---------------------------------------------------------------------------
// NodeKind
// ---------------------------------------------------------------------------

/// Closed set of layout behaviors a node can have.
///
/// Each variant carries its own layout parameters; the measure/arrange pass
/// dispatches by pattern match. Concrete visual widgets are expressed as
/// compositions of these kinds plus behavior slots, not as new variants.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Leaf with an intrinsic size derived from its content.
    Text { content: String, font_size: f64 },
    /// Leaf with an explicit intrinsic size.
    Fixed { size: Size },
    /// Sequential stack: sums children along `axis`, maxes the cross axis.
    Stack {
        axis: StackAxis,
        spacing: f64,
        align: StackAlign,
    },
    /// Overlay stack: children overlap; size is the max on both axes.
    Overlay {
        halign: StackAlign,
        valign: StackAlign,
    },
    /// Single-child box that adds padding around whatever its child measures.
    Container { padding: EdgeInsets },
    /// Stateful node whose children are produced by a [`Component`] build.
    ///
    /// [`Component`]: crate::component::Component
    Component,
}

impl NodeKind {
    /// A short name for diagnostics and tooling.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Text { .. } => "Text",
            NodeKind::Fixed { .. } => "Fixed",
            NodeKind::Stack { axis: StackAxis::Vertical, .. } => "VStack",
            NodeKind::Stack { axis: StackAxis::Horizontal, .. } => "HStack",
            NodeKind::Overlay { .. } => "Overlay",
            NodeKind::Container { .. } => "Container",
            NodeKind::Component => "Component",
        }
    }

    /// Whether this kind ignores children when measuring.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeKind::Text { .. } | NodeKind::Fixed { .. })
    }
}

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// Handler invoked through a behavior slot.
pub type SlotHandler = Box<dyn FnMut()>;

/// Typed behavior slots attached to a node.
///
/// A closed set of optional hooks replaces the original open string-keyed
/// metadata map, so every cross-cutting behavior a node can carry is visible
/// in the type. Attached by fluent setters before the node enters the tree.
#[derive(Default)]
pub struct Slots {
    pub on_click: Option<SlotHandler>,
    pub on_drag: Option<SlotHandler>,
}

impl Slots {
    /// Slots with no handlers attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any handler is attached.
    pub fn is_empty(&self) -> bool {
        self.on_click.is_none() && self.on_drag.is_none()
    }
}

impl fmt::Debug for Slots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slots")
            .field("on_click", &self.on_click.is_some())
            .field("on_drag", &self.on_drag.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// NodeData
// ---------------------------------------------------------------------------

/// Data stored for a single node in the arena.
pub struct NodeData {
    /// Which layout behavior applies.
    pub kind: NodeKind,
    /// Needs rebuild/relayout before the next paint.
    pub dirty: bool,
    /// Behavior slots (click/drag hooks).
    pub slots: Slots,
    /// Component state and behavior; present iff `kind == NodeKind::Component`.
    pub cell: Option<ComponentCell>,
}

impl NodeData {
    /// Create node data for a non-component kind.
    pub fn new(kind: NodeKind) -> Self {
        debug_assert!(
            !matches!(kind, NodeKind::Component),
            "component nodes are created with NodeData::component"
        );
        Self {
            kind,
            dirty: false,
            slots: Slots::new(),
            cell: None,
        }
    }

    /// Create node data for a component node.
    pub fn component(cell: ComponentCell) -> Self {
        Self {
            kind: NodeKind::Component,
            dirty: false,
            slots: Slots::new(),
            cell: Some(cell),
        }
    }
}

impl fmt::Debug for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeData")
            .field("kind", &self.kind)
            .field("dirty", &self.dirty)
            .field("slots", &self.slots)
            .field("component", &self.cell.is_some())
            .finish()
    }
}

//! Constraint-based layout: the measure and arrange passes.
//!
//! Measure flows constraints down and sizes up; arrange assigns each node a
//! positioned [`Rect`] top-down from the measured sizes. Both passes dispatch
//! on [`NodeKind`], so the full layout protocol is visible in one match per
//! pass.
//!
//! Measured sizes are cached per node, keyed by the incoming constraints and
//! the node's structure epoch. A subtree whose constraints and structure are
//! unchanged is not re-measured.

use std::collections::HashMap;

use crate::geometry::{Constraints, Rect, Size};
use crate::tree::node::{NodeId, NodeKind, StackAlign, StackAxis};
use crate::tree::Tree;

/// Fraction of the font size one character advances horizontally.
///
/// A heuristic metric; real text shaping would replace this per-platform.
const CHAR_ADVANCE: f64 = 0.6;

/// Line height as a fraction of the font size.
const LINE_HEIGHT: f64 = 1.2;

/// Non-fatal problems detected during a layout pass.
///
/// Layout always completes with finite geometry; these record where it had to
/// force a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The node measured to a non-finite size (an unbounded leaf under
    /// unbounded constraints). Its size was forced to zero.
    #[error("node measured to a non-finite size")]
    UnboundedSize { node: NodeId },
    /// The node's sizing rule asked for more than its max bounds allow; the
    /// result was clamped. Clamping up to a minimum is normal and not
    /// reported.
    #[error("node measured beyond its max constraints")]
    ConstraintViolation { node: NodeId },
    /// A stale id reached the layout pass; it measured as the smallest
    /// satisfying size.
    #[error("node is not in the tree")]
    MissingNode { node: NodeId },
}

#[derive(Debug, Clone, Copy)]
struct MeasureEntry {
    constraints: Constraints,
    size: Size,
    epoch: u64,
}

/// Computes and retains geometry for a tree.
///
/// Owns the measure cache, the arranged rects, and the diagnostics of the
/// most recent passes. One engine serves one tree; feeding it nodes from
/// several trees mixes caches.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    measured: HashMap<NodeId, MeasureEntry>,
    geometry: HashMap<NodeId, Rect>,
    diagnostics: Vec<LayoutError>,
}

impl LayoutEngine {
    /// Create an engine with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure and arrange the whole tree from its root.
    ///
    /// The root is measured under `constraints` and arranged at the origin.
    /// Geometry for removed nodes is pruned. Returns the root's resolved
    /// size; zero if the tree has no root.
    pub fn layout(&mut self, tree: &Tree, constraints: Constraints) -> Size {
        let Some(root) = tree.root() else {
            self.measured.clear();
            self.geometry.clear();
            return Size::ZERO;
        };
        let size = self.measure(tree, root, constraints);
        self.arrange(tree, root, Rect::from_size(size));
        self.prune(tree);
        size
    }

    /// The arranged rect of a node, if the last pass reached it.
    pub fn rect_of(&self, id: NodeId) -> Option<Rect> {
        self.geometry.get(&id).copied()
    }

    /// All arranged rects from the last pass.
    pub fn geometry(&self) -> &HashMap<NodeId, Rect> {
        &self.geometry
    }

    /// Drain the diagnostics accumulated since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<LayoutError> {
        std::mem::take(&mut self.diagnostics)
    }

    // -----------------------------------------------------------------------
    // Measure
    // -----------------------------------------------------------------------

    /// Measure one node under the given constraints.
    ///
    /// The result always satisfies `constraints` and is always finite; a
    /// non-finite intrinsic size is recorded as a diagnostic and forced to
    /// zero before clamping.
    pub fn measure(&mut self, tree: &Tree, id: NodeId, constraints: Constraints) -> Size {
        let Some(data) = tree.get(id) else {
            self.diagnostics.push(LayoutError::MissingNode { node: id });
            return constraints.smallest();
        };

        let epoch = tree.epoch(id);
        if let Some(entry) = self.measured.get(&id) {
            if entry.constraints == constraints && entry.epoch == epoch {
                return entry.size;
            }
        }

        let raw = match &data.kind {
            NodeKind::Text { content, font_size } => Size::new(
                content.chars().count() as f64 * CHAR_ADVANCE * font_size,
                LINE_HEIGHT * font_size,
            ),
            NodeKind::Fixed { size } => *size,
            NodeKind::Stack { axis, spacing, .. } => {
                self.measure_stack(tree, id, constraints, *axis, *spacing)
            }
            NodeKind::Overlay { .. } => self.measure_overlay(tree, id, constraints),
            NodeKind::Container { padding } => {
                let padding = *padding;
                let inner = constraints.deflate(padding);
                match tree.children(id).first() {
                    Some(&child) => self.measure(tree, child, inner).inflate(padding),
                    None => Size::new(padding.horizontal(), padding.vertical()),
                }
            }
            NodeKind::Component => match tree.children(id).first() {
                Some(&child) => self.measure(tree, child, constraints),
                None => constraints.smallest(),
            },
        };

        let finite = if raw.is_unbounded() {
            self.diagnostics.push(LayoutError::UnboundedSize { node: id });
            raw.finite_or_zero()
        } else {
            raw
        };
        if finite.width > constraints.max_width || finite.height > constraints.max_height {
            self.diagnostics.push(LayoutError::ConstraintViolation { node: id });
        }
        let size = constraints.constrain(finite);

        self.measured.insert(id, MeasureEntry { constraints, size, epoch });
        size
    }

    /// Sequential stack: children measured loosely, summed along the main
    /// axis with spacing between, maxed on the cross axis.
    fn measure_stack(
        &mut self,
        tree: &Tree,
        id: NodeId,
        constraints: Constraints,
        axis: StackAxis,
        spacing: f64,
    ) -> Size {
        let child_constraints = constraints.loosen();
        let children = tree.children(id).to_vec();
        let count = children.len();

        let mut main = 0.0_f64;
        let mut cross = 0.0_f64;
        for child in children {
            let size = self.measure(tree, child, child_constraints);
            match axis {
                StackAxis::Vertical => {
                    main += size.height;
                    cross = cross.max(size.width);
                }
                StackAxis::Horizontal => {
                    main += size.width;
                    cross = cross.max(size.height);
                }
            }
        }
        if count > 1 {
            main += spacing * (count - 1) as f64;
        }
        match axis {
            StackAxis::Vertical => Size::new(cross, main),
            StackAxis::Horizontal => Size::new(main, cross),
        }
    }

    /// Overlay: children measured loosely and stacked in place; the overlay
    /// is as large as its largest child on each axis.
    fn measure_overlay(&mut self, tree: &Tree, id: NodeId, constraints: Constraints) -> Size {
        let child_constraints = constraints.loosen();
        let mut size = Size::ZERO;
        for child in tree.children(id).to_vec() {
            let child_size = self.measure(tree, child, child_constraints);
            size.width = size.width.max(child_size.width);
            size.height = size.height.max(child_size.height);
        }
        size
    }

    // -----------------------------------------------------------------------
    // Arrange
    // -----------------------------------------------------------------------

    /// Assign `rect` to a node and position its children from the sizes the
    /// measure pass resolved.
    ///
    /// Arranging the same tree with the same rect again produces identical
    /// geometry.
    pub fn arrange(&mut self, tree: &Tree, id: NodeId, rect: Rect) {
        let Some(data) = tree.get(id) else {
            self.diagnostics.push(LayoutError::MissingNode { node: id });
            return;
        };
        self.geometry.insert(id, rect);

        match &data.kind {
            NodeKind::Text { .. } | NodeKind::Fixed { .. } => {}
            NodeKind::Stack { axis, spacing, align } => {
                self.arrange_stack(tree, id, rect, *axis, *spacing, *align);
            }
            NodeKind::Overlay { halign, valign } => {
                let (halign, valign) = (*halign, *valign);
                for child in tree.children(id).to_vec() {
                    let size = self.measured_size(child);
                    let (x, width) = place(halign, rect.x, rect.width, size.width);
                    let (y, height) = place(valign, rect.y, rect.height, size.height);
                    self.arrange(tree, child, Rect::new(x, y, width, height));
                }
            }
            NodeKind::Container { padding } => {
                let inner = rect.shrink(*padding);
                for child in tree.children(id).to_vec() {
                    self.arrange(tree, child, inner);
                }
            }
            NodeKind::Component => {
                for child in tree.children(id).to_vec() {
                    self.arrange(tree, child, rect);
                }
            }
        }
    }

    fn arrange_stack(
        &mut self,
        tree: &Tree,
        id: NodeId,
        rect: Rect,
        axis: StackAxis,
        spacing: f64,
        align: StackAlign,
    ) {
        let mut cursor = match axis {
            StackAxis::Vertical => rect.y,
            StackAxis::Horizontal => rect.x,
        };
        for child in tree.children(id).to_vec() {
            let size = self.measured_size(child);
            let child_rect = match axis {
                StackAxis::Vertical => {
                    let (x, width) = place(align, rect.x, rect.width, size.width);
                    let r = Rect::new(x, cursor, width, size.height);
                    cursor += size.height + spacing;
                    r
                }
                StackAxis::Horizontal => {
                    let (y, height) = place(align, rect.y, rect.height, size.height);
                    let r = Rect::new(cursor, y, size.width, height);
                    cursor += size.width + spacing;
                    r
                }
            };
            self.arrange(tree, child, child_rect);
        }
    }

    /// The size the measure pass resolved for a node; zero if it was never
    /// measured (detached mid-pass).
    fn measured_size(&self, id: NodeId) -> Size {
        self.measured.get(&id).map(|e| e.size).unwrap_or(Size::ZERO)
    }

    /// Drop cache and geometry entries for nodes no longer in the tree.
    fn prune(&mut self, tree: &Tree) {
        self.measured.retain(|&id, _| tree.contains(id));
        self.geometry.retain(|&id, _| tree.contains(id));
    }
}

/// Place an extent of `child` within `[origin, origin + extent)` per the
/// alignment. Returns the offset and the final length (Stretch fills).
fn place(align: StackAlign, origin: f64, extent: f64, child: f64) -> (f64, f64) {
    match align {
        StackAlign::Start => (origin, child),
        StackAlign::Center => (origin + (extent - child) / 2.0, child),
        StackAlign::End => (origin + extent - child, child),
        StackAlign::Stretch => (origin, extent),
    }
}

// ===========================================================================
// Tests
// ===========================================================================

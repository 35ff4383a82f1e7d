//! Painting: walking arranged geometry out to a renderer backend.
//!
//! The frame walk is backend-agnostic: implement [`Renderer`] for a real
//! surface, or use [`RecordingRenderer`] in tests to assert on the paint
//! stream.

use crate::geometry::{Rect, Size};
use crate::layout::LayoutEngine;
use crate::tree::node::{NodeId, NodeKind};
use crate::tree::Tree;

/// One node as handed to the renderer: identity, kind, and arranged rect.
#[derive(Debug)]
pub struct PaintNode<'a> {
    pub id: NodeId,
    pub kind: &'a NodeKind,
    pub rect: Rect,
    /// Depth below the root; the root paints at zero.
    pub depth: usize,
}

/// A paint backend. Called once per frame, nodes in pre-order, so parents
/// paint under their children.
pub trait Renderer {
    fn begin_frame(&mut self, viewport: Size);
    fn paint_node(&mut self, node: &PaintNode<'_>);
    fn end_frame(&mut self);
}

/// Paint one frame: every node the last layout pass arranged, pre-order.
///
/// Nodes without geometry (never reached by arrange) are skipped along with
/// their subtrees.
pub fn paint(tree: &Tree, engine: &LayoutEngine, renderer: &mut dyn Renderer, viewport: Size) {
    renderer.begin_frame(viewport);
    if let Some(root) = tree.root() {
        paint_subtree(tree, engine, renderer, root, 0);
    }
    renderer.end_frame();
}

fn paint_subtree(
    tree: &Tree,
    engine: &LayoutEngine,
    renderer: &mut dyn Renderer,
    id: NodeId,
    depth: usize,
) {
    let (Some(data), Some(rect)) = (tree.get(id), engine.rect_of(id)) else {
        return;
    };
    renderer.paint_node(&PaintNode {
        id,
        kind: &data.kind,
        rect,
        depth,
    });
    for &child in tree.children(id) {
        paint_subtree(tree, engine, renderer, child, depth + 1);
    }
}

// ---------------------------------------------------------------------------
// RecordingRenderer
// ---------------------------------------------------------------------------

/// One recorded paint event.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Begin(Size),
    Node {
        name: &'static str,
        rect: Rect,
        depth: usize,
    },
    End,
}

/// Renderer that records its paint stream for assertions.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub ops: Vec<PaintOp>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Just the painted node names, frame brackets stripped.
    pub fn node_names(&self) -> Vec<&'static str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Node { name, .. } => Some(*name),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, viewport: Size) {
        self.ops.push(PaintOp::Begin(viewport));
    }

    fn paint_node(&mut self, node: &PaintNode<'_>) {
        self.ops.push(PaintOp::Node {
            name: node.kind.name(),
            rect: node.rect,
            depth: node.depth,
        });
    }

    fn end_frame(&mut self) {
        self.ops.push(PaintOp::End);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

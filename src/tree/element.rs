//! Element blueprints: the detached subtrees components build.
//!
//! An [`Element`] describes a node (and its descendants) before it enters the
//! tree. Widget authors construct elements with the fluent constructors here,
//! chain setters to attach behavior slots, and return them from
//! [`Component::build`](crate::component::Component::build). The tree
//! instantiates a blueprint into arena nodes on attach.

use std::fmt;

use crate::component::Component;
use crate::geometry::{EdgeInsets, Size};
use crate::tree::node::{NodeKind, Slots, StackAlign, StackAxis};

/// Default font size for [`Element::text`], in layout units.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// A blueprint for one node and its subtree.
pub struct Element {
    pub(crate) kind: NodeKind,
    pub(crate) slots: Slots,
    pub(crate) children: Vec<Element>,
    pub(crate) component: Option<Box<dyn Component>>,
}

impl Element {
    fn from_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            slots: Slots::new(),
            children: Vec::new(),
            component: None,
        }
    }

    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// A text leaf with the default font size.
    pub fn text(content: impl Into<String>) -> Self {
        Self::from_kind(NodeKind::Text {
            content: content.into(),
            font_size: DEFAULT_FONT_SIZE,
        })
    }

    /// A leaf with an explicit intrinsic size.
    pub fn fixed(size: Size) -> Self {
        Self::from_kind(NodeKind::Fixed { size })
    }

    /// A vertical sequential stack.
    pub fn vstack(spacing: f64) -> Self {
        Self::from_kind(NodeKind::Stack {
            axis: StackAxis::Vertical,
            spacing,
            align: StackAlign::Center,
        })
    }

    /// A horizontal sequential stack.
    pub fn hstack(spacing: f64) -> Self {
        Self::from_kind(NodeKind::Stack {
            axis: StackAxis::Horizontal,
            spacing,
            align: StackAlign::Center,
        })
    }

    /// An overlay stack; children overlap, centered by default.
    pub fn overlay() -> Self {
        Self::from_kind(NodeKind::Overlay {
            halign: StackAlign::Center,
            valign: StackAlign::Center,
        })
    }

    /// A single-child padding container.
    pub fn container(padding: EdgeInsets) -> Self {
        Self::from_kind(NodeKind::Container { padding })
    }

    /// A component node. Its children are produced by `behavior`'s first
    /// build once the node is mounted and flushed.
    pub fn component(behavior: impl Component + 'static) -> Self {
        Self {
            kind: NodeKind::Component,
            slots: Slots::new(),
            children: Vec::new(),
            component: Some(Box::new(behavior)),
        }
    }

    // -----------------------------------------------------------------------
    // Fluent setters
    // -----------------------------------------------------------------------

    /// Append a child (builder).
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children (builder).
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set the cross-axis alignment of a stack (builder).
    ///
    /// No-op for non-stack kinds.
    pub fn align(mut self, value: StackAlign) -> Self {
        if let NodeKind::Stack { align, .. } = &mut self.kind {
            *align = value;
        }
        self
    }

    /// Set the per-axis alignment of an overlay (builder).
    ///
    /// No-op for non-overlay kinds.
    pub fn overlay_align(mut self, h: StackAlign, v: StackAlign) -> Self {
        if let NodeKind::Overlay { halign, valign } = &mut self.kind {
            *halign = h;
            *valign = v;
        }
        self
    }

    /// Set the font size of a text leaf (builder).
    ///
    /// No-op for non-text kinds.
    pub fn font_size(mut self, value: f64) -> Self {
        if let NodeKind::Text { font_size, .. } = &mut self.kind {
            *font_size = value;
        }
        self
    }

    /// Attach a click handler slot (builder).
    pub fn on_click(mut self, handler: impl FnMut() + 'static) -> Self {
        self.slots.on_click = Some(Box::new(handler));
        self
    }

    /// Attach a drag handler slot (builder).
    pub fn on_drag(mut self, handler: impl FnMut() + 'static) -> Self {
        self.slots.on_drag = Some(Box::new(handler));
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The node kind this blueprint instantiates.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The blueprint's direct children.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Whether this blueprint carries a component behavior.
    pub fn is_component(&self) -> bool {
        self.component.is_some()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.kind)
            .field("children", &self.children.len())
            .field("slots", &self.slots)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{BuildError, StateStore};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn text_defaults() {
        let el = Element::text("hello");
        match el.kind() {
            NodeKind::Text { content, font_size } => {
                assert_eq!(content, "hello");
                assert_eq!(*font_size, DEFAULT_FONT_SIZE);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn text_font_size_setter() {
        let el = Element::text("x").font_size(24.0);
        match el.kind() {
            NodeKind::Text { font_size, .. } => assert_eq!(*font_size, 24.0),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn fixed_carries_size() {
        let el = Element::fixed(Size::new(40.0, 20.0));
        assert_eq!(
            el.kind(),
            &NodeKind::Fixed { size: Size::new(40.0, 20.0) }
        );
    }

    #[test]
    fn vstack_defaults_centered() {
        let el = Element::vstack(10.0);
        assert_eq!(
            el.kind(),
            &NodeKind::Stack {
                axis: StackAxis::Vertical,
                spacing: 10.0,
                align: StackAlign::Center,
            }
        );
    }

    #[test]
    fn hstack_axis() {
        let el = Element::hstack(4.0);
        match el.kind() {
            NodeKind::Stack { axis, .. } => assert_eq!(*axis, StackAxis::Horizontal),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn align_setter_on_stack() {
        let el = Element::vstack(0.0).align(StackAlign::Start);
        match el.kind() {
            NodeKind::Stack { align, .. } => assert_eq!(*align, StackAlign::Start),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn align_setter_noop_on_leaf() {
        let el = Element::fixed(Size::ZERO).align(StackAlign::End);
        assert_eq!(el.kind(), &NodeKind::Fixed { size: Size::ZERO });
    }

    #[test]
    fn overlay_align_setter() {
        let el = Element::overlay().overlay_align(StackAlign::Start, StackAlign::End);
        assert_eq!(
            el.kind(),
            &NodeKind::Overlay {
                halign: StackAlign::Start,
                valign: StackAlign::End,
            }
        );
    }

    #[test]
    fn children_builders() {
        let el = Element::vstack(0.0)
            .with_child(Element::text("a"))
            .with_children([Element::text("b"), Element::text("c")]);
        assert_eq!(el.children().len(), 3);
    }

    #[test]
    fn container_padding() {
        let el = Element::container(EdgeInsets::all(5.0));
        assert_eq!(
            el.kind(),
            &NodeKind::Container { padding: EdgeInsets::all(5.0) }
        );
    }

    #[test]
    fn on_click_slot_attached() {
        let clicked = Rc::new(Cell::new(false));
        let flag = clicked.clone();
        let mut el = Element::fixed(Size::ZERO).on_click(move || flag.set(true));
        assert!(!el.slots.is_empty());
        (el.slots.on_click.as_mut().unwrap())();
        assert!(clicked.get());
    }

    #[test]
    fn component_blueprint() {
        struct Empty;
        impl crate::component::Component for Empty {
            fn build(&self, _state: &StateStore) -> Result<Element, BuildError> {
                Ok(Element::fixed(Size::ZERO))
            }
        }
        let el = Element::component(Empty);
        assert!(el.is_component());
        assert_eq!(el.kind(), &NodeKind::Component);
    }

    #[test]
    fn non_component_blueprint() {
        assert!(!Element::text("x").is_component());
    }
}

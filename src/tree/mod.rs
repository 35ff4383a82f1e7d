//! The retained element tree: node types, blueprints, and the arena.

pub mod arena;
pub mod element;
pub mod node;

pub use arena::{StructuralError, Tree};
pub use element::{Element, DEFAULT_FONT_SIZE};
pub use node::{NodeData, NodeId, NodeKind, Slots, StackAlign, StackAxis};

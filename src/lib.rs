//! trellis-ui: a retained-mode UI core.
//!
//! The crate keeps a persistent element tree between frames and reconciles it
//! incrementally: state changes mark nodes dirty, a scheduler batches the
//! dirty set into rebuild passes, and a constraint-based layout engine turns
//! the resulting tree into positioned geometry.
//!
//! The pieces compose bottom-up:
//!
//! - [`geometry`]: sizes, insets, constraints, rects.
//! - [`tree`]: the slotmap arena, node kinds, and element blueprints.
//! - [`component`]: stateful behaviors and their lifecycle.
//! - [`scheduler`]: dirty-set batching and the rebuild batch stream.
//! - [`layout`]: the measure/arrange passes and their cache.
//! - [`render`]: walking arranged geometry out to a paint backend.
//! - [`app`]: the shell that wires it all together.

pub mod app;
pub mod component;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod scheduler;
pub mod tree;

pub use app::{App, AppConfig};
pub use component::{BuildError, Component, ComponentCell, StateError, StateStore, Value};
pub use geometry::{Constraints, EdgeInsets, Rect, Size};
pub use layout::{LayoutEngine, LayoutError};
pub use render::{paint, PaintNode, Renderer};
pub use scheduler::{FlushError, RebuildBatch, Scheduler, SchedulerHandle};
pub use tree::{Element, NodeId, NodeKind, StackAlign, StackAxis, StructuralError, Tree};

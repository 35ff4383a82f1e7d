//! Constraint-based measure/arrange layout.

pub mod engine;

pub use engine::{LayoutEngine, LayoutError};

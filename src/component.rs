//! Component trait, keyed state store, and the per-node component cell.
//!
//! A component is a stateful node: it owns a private [`StateStore`] and
//! produces a replacement subtree on demand via [`Component::build`]. Build
//! takes only shared references, so a build cannot mutate its own state
//! re-entrantly — the infinite-rebuild hazard is rejected by the type system
//! instead of detected at runtime.

use std::collections::HashMap;
use std::fmt;

use crate::tree::element::Element;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A state value. Closed set of clonable, cheaply-comparable types so the
/// "changed?" check in [`StateStore::set`] is a plain `PartialEq`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// The boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The float payload, if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// The string payload, if this is a `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

// ---------------------------------------------------------------------------
// StateStore
// ---------------------------------------------------------------------------

/// Private key/value state owned by one component.
///
/// Mutation from outside the component goes through
/// [`Tree::set_state`](crate::tree::Tree::set_state), which performs the
/// equality check and dirty-marking. Inside lifecycle hooks the component may
/// write directly (initialization never schedules a rebuild).
#[derive(Debug, Default)]
pub struct StateStore {
    values: HashMap<String, Value>,
}

impl StateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a value by key, or a default when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.values.get(key).unwrap_or(default)
    }

    /// Convenience: integer state with a fallback.
    pub fn int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(Value::as_int).unwrap_or(default)
    }

    /// Convenience: boolean state with a fallback.
    pub fn bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Convenience: text state with a fallback.
    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Value::as_text).unwrap_or(default)
    }

    /// Store `value` under `key`. Returns `true` if the stored value changed.
    ///
    /// Absent keys compare as [`Value::Null`], so writing `Null` to a missing
    /// key is not a change.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        let value = value.into();
        let old = self.values.get(&key).cloned().unwrap_or_default();
        if old == value {
            return false;
        }
        self.values.insert(key, value);
        true
    }

    /// Whether the store has a value for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure produced by a component's `build`.
///
/// Caught per-node by the scheduler: the component keeps its previous subtree
/// and the failure is reported on the batch stream's error channel.
#[derive(Debug, Clone, thiserror::Error)]
#[error("build failed: {message}")]
pub struct BuildError {
    pub message: String,
}

impl BuildError {
    /// Create a build error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Errors from state mutation through the tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("node does not exist in the tree")]
    NodeNotFound,
    #[error("node is not a component")]
    NotAComponent,
}

// ---------------------------------------------------------------------------
// Component trait
// ---------------------------------------------------------------------------

/// Behavior of a stateful node.
///
/// `build` must be a pure function of the state at call time: it returns a
/// fresh [`Element`] subtree that the scheduler swaps in for the component's
/// previous children. Side effects such as logging are tolerated; mutation is
/// not possible through the shared references.
pub trait Component {
    /// A short name for diagnostics.
    fn type_name(&self) -> &str {
        "Component"
    }

    /// Produce the component's subtree from its current state.
    fn build(&self, state: &StateStore) -> Result<Element, BuildError>;

    /// Called when the node is mounted. Initial state written here does not
    /// schedule a rebuild; the first build is already scheduled when the node
    /// enters the tree.
    fn on_mount(&mut self, state: &mut StateStore) {
        let _ = state;
    }

    /// Called when the node is unmounted. Terminal: a torn-down component is
    /// never remounted.
    fn on_unmount(&mut self) {}
}

// ---------------------------------------------------------------------------
// ComponentCell
// ---------------------------------------------------------------------------

/// Per-node storage for a component: behavior, state, and the mounted flag.
pub struct ComponentCell {
    behavior: Box<dyn Component>,
    state: StateStore,
    mounted: bool,
}

impl ComponentCell {
    /// Wrap a component behavior in an unmounted cell with empty state.
    pub fn new(behavior: Box<dyn Component>) -> Self {
        Self {
            behavior,
            state: StateStore::new(),
            mounted: false,
        }
    }

    /// Whether the component is currently mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The component's state store.
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    /// Mutable access to the state store. Used by the tree's controlled
    /// `set_state` operation and by lifecycle hooks.
    pub fn state_mut(&mut self) -> &mut StateStore {
        &mut self.state
    }

    /// Diagnostic name of the wrapped behavior.
    pub fn type_name(&self) -> &str {
        self.behavior.type_name()
    }

    /// Run the mount hook and flip the mounted flag.
    ///
    /// State written inside `on_mount` lands directly in the store without
    /// dirty-marking, so mounting never schedules a redundant rebuild.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.behavior.on_mount(&mut self.state);
        self.mounted = true;
    }

    /// Run the unmount hook and clear the mounted flag. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.behavior.on_unmount();
    }

    /// Build the component's subtree from its current state.
    pub fn build(&self) -> Result<Element, BuildError> {
        self.behavior.build(&self.state)
    }
}

impl fmt::Debug for ComponentCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentCell")
            .field("type_name", &self.behavior.type_name())
            .field("mounted", &self.mounted)
            .field("state_len", &self.state.len())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    struct Counter;

    impl Component for Counter {
        fn type_name(&self) -> &str {
            "Counter"
        }

        fn build(&self, state: &StateStore) -> Result<Element, BuildError> {
            let count = state.int("count", 0);
            Ok(Element::text(format!("count: {count}")))
        }

        fn on_mount(&mut self, state: &mut StateStore) {
            state.set("count", 0i64);
        }
    }

    struct Failing;

    impl Component for Failing {
        fn build(&self, _state: &StateStore) -> Result<Element, BuildError> {
            Err(BuildError::new("boom"))
        }
    }

    // -----------------------------------------------------------------------
    // Value
    // -----------------------------------------------------------------------

    #[test]
    fn value_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Float(1.5).as_float(), Some(1.5));
        assert_eq!(Value::Text("x".into()).as_text(), Some("x"));
        assert_eq!(Value::Null.as_int(), None);
    }

    #[test]
    fn value_from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(3i64), Value::Int(3));
        assert_eq!(Value::from(3i32), Value::Int(3));
        assert_eq!(Value::from(2.5), Value::Float(2.5));
        assert_eq!(Value::from("hi"), Value::Text("hi".into()));
        assert_eq!(Value::from(String::from("hi")), Value::Text("hi".into()));
    }

    // -----------------------------------------------------------------------
    // StateStore
    // -----------------------------------------------------------------------

    #[test]
    fn store_set_and_get() {
        let mut store = StateStore::new();
        assert!(store.set("count", 1i64));
        assert_eq!(store.get("count"), Some(&Value::Int(1)));
        assert_eq!(store.int("count", 0), 1);
    }

    #[test]
    fn store_set_unchanged_returns_false() {
        let mut store = StateStore::new();
        store.set("name", "a");
        assert!(!store.set("name", "a"));
        assert!(store.set("name", "b"));
    }

    #[test]
    fn store_set_null_on_missing_is_no_change() {
        let mut store = StateStore::new();
        assert!(!store.set("ghost", Value::Null));
        assert!(!store.contains("ghost"));
    }

    #[test]
    fn store_defaults() {
        let store = StateStore::new();
        assert_eq!(store.int("missing", 42), 42);
        assert!(store.bool("missing", true));
        assert_eq!(store.text("missing", "d"), "d");
        assert_eq!(store.get_or("missing", &Value::Int(9)), &Value::Int(9));
    }

    #[test]
    fn store_len_and_contains() {
        let mut store = StateStore::new();
        store.set("a", 1i64);
        store.set("b", 2i64);
        assert_eq!(store.len(), 2);
        assert!(store.contains("a"));
        assert!(!store.contains("c"));
        assert!(!store.is_empty());
    }

    // -----------------------------------------------------------------------
    // ComponentCell lifecycle
    // -----------------------------------------------------------------------

    #[test]
    fn cell_starts_unmounted() {
        let cell = ComponentCell::new(Box::new(Counter));
        assert!(!cell.is_mounted());
        assert_eq!(cell.type_name(), "Counter");
    }

    #[test]
    fn mount_runs_hook_and_flips_flag() {
        let mut cell = ComponentCell::new(Box::new(Counter));
        cell.mount();
        assert!(cell.is_mounted());
        assert_eq!(cell.state().int("count", -1), 0);
    }

    #[test]
    fn mount_is_idempotent() {
        let mut cell = ComponentCell::new(Box::new(Counter));
        cell.mount();
        cell.state_mut().set("count", 5i64);
        cell.mount(); // second mount must not re-run the hook
        assert_eq!(cell.state().int("count", -1), 5);
    }

    #[test]
    fn unmount_is_terminal_and_idempotent() {
        let mut cell = ComponentCell::new(Box::new(Counter));
        cell.mount();
        cell.unmount();
        assert!(!cell.is_mounted());
        cell.unmount(); // no panic, no effect
        assert!(!cell.is_mounted());
    }

    #[test]
    fn unmount_before_mount_is_noop() {
        let mut cell = ComponentCell::new(Box::new(Counter));
        cell.unmount();
        assert!(!cell.is_mounted());
        // Hook never ran, so no state was initialized.
        assert!(cell.state().is_empty());
    }

    #[test]
    fn build_reads_current_state() {
        let mut cell = ComponentCell::new(Box::new(Counter));
        cell.mount();
        cell.state_mut().set("count", 3i64);
        let el = cell.build().unwrap();
        match el.kind() {
            crate::tree::node::NodeKind::Text { content, .. } => {
                assert_eq!(content, "count: 3");
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn build_error_carries_message() {
        let cell = ComponentCell::new(Box::new(Failing));
        let err = cell.build().unwrap_err();
        assert_eq!(err.message, "boom");
        assert_eq!(err.to_string(), "build failed: boom");
    }

    #[test]
    fn default_type_name() {
        struct Anon;
        impl Component for Anon {
            fn build(&self, _state: &StateStore) -> Result<Element, BuildError> {
                Ok(Element::fixed(Size::ZERO))
            }
        }
        assert_eq!(ComponentCell::new(Box::new(Anon)).type_name(), "Component");
    }
}

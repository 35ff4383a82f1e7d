//! Application shell: owns the tree, scheduler, and layout engine.
//!
//! [`App`] wires the pieces together for the common case: mount a root
//! element, drive frames, dispatch input, shut down. Everything it does is
//! also reachable through the parts directly; tests that want finer control
//! use [`Tree`] and [`Scheduler`] on their own.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::geometry::{Constraints, Rect, Size};
use crate::layout::{LayoutEngine, LayoutError};
use crate::render::{paint, Renderer};
use crate::scheduler::{FlushError, RebuildBatch, Scheduler, SchedulerHandle};
use crate::tree::node::NodeId;
use crate::tree::{Element, Tree};

/// Configuration for an [`App`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// The root viewport; the root element is laid out tight to this.
    pub root_size: Size,
    /// How long the frame loop waits after the first dirty mark before
    /// flushing, so a burst of state changes lands in one batch.
    pub coalesce_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_size: Size::new(800.0, 600.0),
            coalesce_delay: Duration::from_millis(1),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root viewport size (builder).
    pub fn with_root_size(mut self, size: Size) -> Self {
        self.root_size = size;
        self
    }

    /// Set the coalescing delay (builder).
    pub fn with_coalesce_delay(mut self, delay: Duration) -> Self {
        self.coalesce_delay = delay;
        self
    }
}

/// The running application: tree, scheduler, layout engine, and services.
pub struct App {
    config: AppConfig,
    tree: Tree,
    scheduler: Scheduler,
    engine: LayoutEngine,
    services: HashMap<TypeId, Box<dyn Any>>,
}

impl App {
    /// Create an app with no mounted root.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            tree: Tree::new(),
            scheduler: Scheduler::new(),
            engine: LayoutEngine::new(),
            services: HashMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Mounting and shutdown
    // -----------------------------------------------------------------------

    /// Mount an element as the root, replacing any previous root.
    ///
    /// The subtree is bound to the scheduler, so components in it have their
    /// first build pending when this returns.
    pub fn mount(&mut self, root: Element) -> NodeId {
        if let Some(old) = self.tree.root() {
            tracing::debug!("replacing mounted root");
            self.tree.remove(old);
        }
        let id = self.tree.instantiate(root);
        self.tree.bind_context(id, self.scheduler.handle());
        tracing::debug!(nodes = self.tree.len(), "mounted root");
        id
    }

    /// Tear down the tree, unmounting every component, and drop services.
    pub fn shutdown(&mut self) {
        if let Some(root) = self.tree.root() {
            self.tree.remove(root);
        }
        self.services.clear();
        tracing::debug!("app shut down");
    }

    // -----------------------------------------------------------------------
    // Frames
    // -----------------------------------------------------------------------

    /// Flush pending rebuilds and lay the tree out against the viewport.
    ///
    /// Returns the root's resolved size, which under the tight root
    /// constraints is the viewport size whenever a root is mounted.
    pub fn render_frame(&mut self) -> Result<Size, FlushError> {
        self.scheduler.flush_now(&mut self.tree)?;
        let size = self
            .engine
            .layout(&self.tree, Constraints::tight(self.config.root_size));
        Ok(size)
    }

    /// One iteration of the frame loop: wait for dirt, let a burst of state
    /// changes coalesce, then flush and lay out.
    pub async fn tick(&mut self) -> Result<Size, FlushError> {
        self.scheduler.wait_for_work().await;
        tokio::time::sleep(self.config.coalesce_delay).await;
        self.render_frame()
    }

    /// Paint the last arranged frame to a renderer.
    pub fn paint_frame(&self, renderer: &mut dyn Renderer) {
        paint(&self.tree, &self.engine, renderer, self.config.root_size);
    }

    /// Change the viewport. Takes effect on the next frame: the changed root
    /// constraints miss the measure cache, so the tree is laid out fresh
    /// without rebuilding any component.
    pub fn resize(&mut self, size: Size) {
        self.config.root_size = size;
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// A scheduler handle for background work.
    pub fn handle(&self) -> SchedulerHandle {
        self.scheduler.handle()
    }

    /// Subscribe to the rebuild batch stream.
    pub fn subscribe(&self) -> broadcast::Receiver<RebuildBatch> {
        self.scheduler.subscribe()
    }

    /// The arranged rect of a node from the last frame.
    pub fn rect_of(&self, id: NodeId) -> Option<Rect> {
        self.engine.rect_of(id)
    }

    /// Drain layout diagnostics accumulated since the last call.
    pub fn take_layout_diagnostics(&mut self) -> Vec<LayoutError> {
        self.engine.take_diagnostics()
    }

    /// Dispatch a click to a node's slot. Returns whether a handler ran.
    pub fn click(&mut self, id: NodeId) -> bool {
        self.tree.trigger_click(id)
    }

    // -----------------------------------------------------------------------
    // Services
    // -----------------------------------------------------------------------

    /// Register a shared service by type. One instance per type; registering
    /// again replaces the previous instance.
    pub fn register_service<T: Any>(&mut self, service: T) {
        self.services.insert(TypeId::of::<T>(), Box::new(service));
    }

    /// Look up a registered service by type.
    pub fn service<T: Any>(&self) -> Option<&T> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|s| s.downcast_ref::<T>())
    }

    /// Mutable access to a registered service.
    pub fn service_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.services
            .get_mut(&TypeId::of::<T>())
            .and_then(|s| s.downcast_mut::<T>())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("nodes", &self.tree.len())
            .field("services", &self.services.len())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

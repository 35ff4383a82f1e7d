//! Rebuild scheduler: dirty-set batching, flush passes, batch stream.
//!
//! State mutations mark nodes dirty; the scheduler collects them (set
//! semantics — a node queued twice collapses to one entry) and rebuilds them
//! together in a flush pass. Each pass emits one [`RebuildBatch`] on a
//! broadcast channel that devtools and tests can subscribe to.
//!
//! The dirty set is the only lock-guarded structure: [`SchedulerHandle`] is
//! `Send + Sync` so background completion callbacks may schedule while a flush
//! runs on the owner thread. `build()` never executes under the lock.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use tokio::sync::{broadcast, Notify};

use crate::tree::node::NodeId;
use crate::tree::Tree;

/// Bound on drain cycles per [`Scheduler::flush_now`] call. Flushing can
/// enqueue new dirt (a rebuilt subtree may contain fresh components that need
/// their own first build); exceeding the cap means a runaway rebuild storm.
pub const MAX_FLUSH_CYCLES: usize = 1000;

/// Capacity of the batch broadcast channel.
const BATCH_CHANNEL_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// Phase and shared state
// ---------------------------------------------------------------------------

/// Where the scheduler is in its pending cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No dirt queued, no flush arranged.
    Idle,
    /// Dirt queued, a flush is pending.
    Collecting,
    /// A flush pass is running on the owner thread.
    Flushing,
}

#[derive(Debug)]
struct DirtyState {
    /// Queued nodes in insertion order.
    queued: Vec<NodeId>,
    /// Set view of `queued` for O(1) dedup.
    queued_set: HashSet<NodeId>,
    phase: Phase,
}

impl DirtyState {
    fn take_queued(&mut self) -> Vec<NodeId> {
        self.queued_set.clear();
        std::mem::take(&mut self.queued)
    }
}

#[derive(Debug)]
struct Shared {
    state: Mutex<DirtyState>,
    /// Wakes the owner thread's coalescing loop when dirt arrives while Idle.
    notify: Notify,
}

// ---------------------------------------------------------------------------
// SchedulerHandle
// ---------------------------------------------------------------------------

/// Cheap clonable handle for registering dirty nodes.
///
/// Bound into the tree as each node's `Context` and handed to background
/// workers. Only touches the dirty set; never the tree.
#[derive(Clone, Debug)]
pub struct SchedulerHandle {
    shared: Arc<Shared>,
}

impl SchedulerHandle {
    /// Add a node to the dirty set. Duplicate calls collapse to one entry.
    ///
    /// If the scheduler is idle this transitions it to collecting and wakes
    /// the coalescing loop; during a flush the node starts the next cycle.
    pub fn schedule(&self, id: NodeId) {
        let mut state = self.shared.state.lock().expect("scheduler mutex poisoned");
        if state.queued_set.insert(id) {
            state.queued.push(id);
        }
        if state.phase == Phase::Idle {
            state.phase = Phase::Collecting;
            self.shared.notify.notify_one();
        }
    }

    /// Whether a node is currently queued for rebuild.
    pub fn is_scheduled(&self, id: NodeId) -> bool {
        let state = self.shared.state.lock().expect("scheduler mutex poisoned");
        state.queued_set.contains(&id)
    }

    /// Number of queued nodes.
    pub fn pending_count(&self) -> usize {
        let state = self.shared.state.lock().expect("scheduler mutex poisoned");
        state.queued.len()
    }
}

// ---------------------------------------------------------------------------
// RebuildBatch
// ---------------------------------------------------------------------------

/// A per-node build failure, reported on the batch's error channel.
#[derive(Clone, Debug)]
pub struct BatchFailure {
    pub node: NodeId,
    /// Diagnostic name of the failing component.
    pub component: String,
    pub message: String,
}

/// Record of one flush cycle: the nodes rebuilt together.
#[derive(Clone, Debug)]
pub struct RebuildBatch {
    /// When the batch was processed.
    pub timestamp: SystemTime,
    /// Nodes whose rebuild completed.
    pub rebuilt: Vec<NodeId>,
    /// Captured nodes skipped because they were detached or unmounted before
    /// the flush reached them.
    pub dropped: Vec<NodeId>,
    /// Per-node build failures; the failing nodes kept their previous subtree.
    pub errors: Vec<BatchFailure>,
}

// ---------------------------------------------------------------------------
// FlushError
// ---------------------------------------------------------------------------

/// Errors from a flush pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlushError {
    /// `flush_now` was called while a flush was already running.
    #[error("flush_now called re-entrantly during an active flush")]
    ReentrantFlush,
    /// The drain loop exceeded [`MAX_FLUSH_CYCLES`]; something keeps marking
    /// nodes dirty faster than they can be rebuilt.
    #[error("rebuild storm: flush did not settle after {cycles} cycles")]
    RunawayRebuild { cycles: usize },
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Collects dirty nodes and batches them into rebuild passes.
///
/// Owned by the [`App`](crate::app::App) (or directly by tests); handles and
/// batch subscriptions are handed out from here.
#[derive(Debug)]
pub struct Scheduler {
    shared: Arc<Shared>,
    batches: broadcast::Sender<RebuildBatch>,
}

impl Scheduler {
    /// Create an idle scheduler.
    pub fn new() -> Self {
        let (batches, _) = broadcast::channel(BATCH_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(DirtyState {
                    queued: Vec::new(),
                    queued_set: HashSet::new(),
                    phase: Phase::Idle,
                }),
                notify: Notify::new(),
            }),
            batches,
        }
    }

    /// A clonable handle for registering dirty nodes.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle { shared: self.shared.clone() }
    }

    /// Subscribe to the rebuild batch stream.
    ///
    /// Each receiver observes batches emitted after its subscription; multiple
    /// independent subscriptions are fine.
    pub fn subscribe(&self) -> broadcast::Receiver<RebuildBatch> {
        self.batches.subscribe()
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.shared.state.lock().expect("scheduler mutex poisoned").phase
    }

    /// Whether any nodes are queued.
    pub fn has_pending(&self) -> bool {
        !self
            .shared
            .state
            .lock()
            .expect("scheduler mutex poisoned")
            .queued
            .is_empty()
    }

    /// Wait until dirt arrives while the scheduler is idle.
    ///
    /// Used by the application's coalescing loop; tests use [`flush_now`]
    /// directly.
    ///
    /// [`flush_now`]: Scheduler::flush_now
    pub async fn wait_for_work(&self) {
        self.shared.notify.notified().await;
    }

    /// Synchronously drain the dirty set, rebuilding components in batches
    /// until no dirt remains. Returns the number of batches emitted.
    ///
    /// The swap of the dirty set happens in one critical section, so
    /// `schedule` calls arriving during the flush start a new cycle instead of
    /// being lost. Per-node build failures are caught and reported, never
    /// propagated. Bounded by [`MAX_FLUSH_CYCLES`].
    pub fn flush_now(&self, tree: &mut Tree) -> Result<usize, FlushError> {
        {
            let mut state = self.shared.state.lock().expect("scheduler mutex poisoned");
            if state.phase == Phase::Flushing {
                return Err(FlushError::ReentrantFlush);
            }
            state.phase = Phase::Flushing;
        }

        let mut cycles = 0;
        loop {
            let captured = {
                let mut state = self.shared.state.lock().expect("scheduler mutex poisoned");
                if state.queued.is_empty() {
                    state.phase = Phase::Idle;
                    return Ok(cycles);
                }
                if cycles >= MAX_FLUSH_CYCLES {
                    state.phase = Phase::Idle;
                    tracing::error!(
                        pending = state.queued.len(),
                        "rebuild storm: flush did not settle, aborting"
                    );
                    return Err(FlushError::RunawayRebuild { cycles });
                }
                state.take_queued()
            };

            self.process_batch(tree, captured);
            cycles += 1;
        }
    }

    /// Rebuild one captured set of nodes and emit the batch record.
    fn process_batch(&self, tree: &mut Tree, captured: Vec<NodeId>) {
        let mut rebuilt = Vec::new();
        let mut dropped = Vec::new();
        let mut errors = Vec::new();

        for id in captured {
            // Liveness is checked here, at flush time: a node detached or
            // unmounted after scheduling (including by an earlier rebuild in
            // this very batch) must not be built.
            if !tree.contains(id) {
                dropped.push(id);
                continue;
            }
            // Build against a shared borrow, mutate afterwards.
            let built = match tree.cell(id) {
                Some(cell) if cell.is_mounted() => {
                    Some((cell.build(), cell.type_name().to_owned()))
                }
                Some(_) => {
                    dropped.push(id);
                    continue;
                }
                None => {
                    // Plain nodes carry no build step; marking them dirty just
                    // requests relayout, which the next frame performs.
                    tree.clear_dirty(id);
                    rebuilt.push(id);
                    continue;
                }
            };
            if let Some((result, name)) = built {
                match result {
                    Ok(subtree) => {
                        tree.replace_children(id, vec![subtree]);
                        tree.clear_dirty(id);
                        rebuilt.push(id);
                    }
                    Err(err) => {
                        // The component keeps its previous subtree.
                        tracing::warn!(
                            component = %name,
                            error = %err,
                            "component rebuild failed"
                        );
                        errors.push(BatchFailure {
                            node: id,
                            component: name,
                            message: err.message,
                        });
                    }
                }
            }
        }

        let batch = RebuildBatch {
            timestamp: SystemTime::now(),
            rebuilt,
            dropped,
            errors,
        };
        // No subscribers is fine; the stream is optional tooling.
        let _ = self.batches.send(batch);
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

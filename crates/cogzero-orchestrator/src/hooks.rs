//! Host lifecycle hooks
//!
//! The host runtime calls [`LoopHooks::on_start`] / [`LoopHooks::on_end`]
//! synchronously around each task execution. [`HookTracker`] turns those
//! calls into registry updates: elapsed time is measured from the matching
//! start, and each outcome is also queued for homeostatic feedback.
//!
//! Hook failures are returned to the host, which is expected to log them
//! without aborting its task loop.

use cogzero_common::{AgentError, AgentId, Genome, HookError, Result};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::orchestrator::Orchestrator;

/// Start/end instrumentation around one task execution
pub trait LoopHooks: Send + Sync {
    /// Record the start of a task loop for a live agent
    fn on_start(&self, agent_id: &AgentId) -> Result<()>;

    /// Close the loop; returns the elapsed seconds that were recorded
    fn on_end(&self, agent_id: &AgentId, succeeded: bool) -> Result<f64>;
}

/// Default hook implementation backed by an [`Orchestrator`]
pub struct HookTracker {
    orchestrator: Arc<Orchestrator>,
    /// Loop start instants by agent
    starts: DashMap<AgentId, Instant>,
    /// Outcomes not yet consumed by adaptation, oldest first
    pending: Mutex<VecDeque<bool>>,
    pending_capacity: usize,
}

impl HookTracker {
    pub fn new(orchestrator: Arc<Orchestrator>, pending_capacity: usize) -> Self {
        Self {
            orchestrator,
            starts: DashMap::new(),
            pending: Mutex::new(VecDeque::with_capacity(pending_capacity)),
            pending_capacity: pending_capacity.max(1),
        }
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    /// Agent initialization: register under a generated id
    pub fn on_agent_init(&self, initial_genome: Genome) -> Result<AgentId> {
        self.orchestrator
            .register_agent(initial_genome)
            .map_err(|e| HookError::Registration(e.to_string()).into())
    }

    /// Agent initialization: register under the host's own id
    pub fn on_agent_init_as(&self, agent_id: AgentId, initial_genome: Genome) -> Result<AgentId> {
        self.orchestrator
            .register_agent_as(agent_id, initial_genome)
            .map_err(|e| HookError::Registration(e.to_string()).into())
    }

    /// Agent termination: unregister and drop any open loop
    pub fn on_agent_terminate(&self, agent_id: &AgentId) -> Result<()> {
        self.orchestrator.unregister_agent(agent_id)?;
        if self.starts.remove(agent_id).is_some() {
            debug!(agent_id = %agent_id, "Discarded open loop of terminated agent");
        }
        Ok(())
    }

    /// Take all queued outcomes, oldest first
    pub fn drain_outcomes(&self) -> Vec<bool> {
        self.pending.lock().drain(..).collect()
    }

    pub fn pending_outcomes(&self) -> usize {
        self.pending.lock().len()
    }

    /// Number of loops started but not yet ended
    pub fn open_loops(&self) -> usize {
        self.starts.len()
    }

    fn push_outcome(&self, succeeded: bool) {
        let mut pending = self.pending.lock();
        if pending.len() == self.pending_capacity {
            pending.pop_front();
        }
        pending.push_back(succeeded);
    }
}

impl LoopHooks for HookTracker {
    fn on_start(&self, agent_id: &AgentId) -> Result<()> {
        if !self.orchestrator.is_live(agent_id) {
            return Err(AgentError::NotFound(agent_id.to_string()).into());
        }
        if self.starts.insert(agent_id.clone(), Instant::now()).is_some() {
            warn!(agent_id = %agent_id, "Loop restarted before previous loop ended");
        }
        Ok(())
    }

    fn on_end(&self, agent_id: &AgentId, succeeded: bool) -> Result<f64> {
        let (_, started) = self
            .starts
            .remove(agent_id)
            .ok_or_else(|| HookError::NoLoopStart(agent_id.to_string()))?;
        let elapsed = started.elapsed().as_secs_f64();

        self.orchestrator
            .update_metrics(agent_id, succeeded, elapsed)?;
        self.push_outcome(succeeded);

        debug!(agent_id = %agent_id, succeeded, elapsed, "Task loop ended");
        Ok(elapsed)
    }
}

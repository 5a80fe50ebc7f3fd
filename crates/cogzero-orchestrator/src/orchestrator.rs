//! Orchestrator - agent registry, fitness ranking, and task coordination
//!
//! The registry and the knowledge graph live behind one coarse
//! [`RwLock`]: every mutation takes the write lock, and every read
//! (`get_stats`, `knowledge`, `population`, ...) observes a consistent
//! snapshot under the read lock. No operation blocks on I/O.

use chrono::{DateTime, Utc};
use cogzero_common::{
    AgentError, AgentId, Genome, PropertyMap, PropertyValue, Result, TaskId, NODE_TYPE_AGENT,
    NODE_TYPE_GENERATION, NODE_TYPE_TASK, RELATION_ASSIGNED, RELATION_EVOLVED, RELATION_PRESERVED,
};
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::fitness::FitnessCalculator;
use crate::graph::{KnowledgeGraph, Node};
use crate::registry::{AgentMetrics, AgentRecord, AgentState};
use crate::telemetry::OrchestratorMetrics;

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Maximum number of agents ever registered (terminated agents included)
    pub max_agents: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_agents: crate::DEFAULT_MAX_AGENTS,
        }
    }
}

/// Point-in-time view of one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub state: AgentState,
    pub metrics: AgentMetrics,
    pub genome: Genome,
    pub fitness: f64,
    pub success_rate: f64,
    pub avg_response_time: f64,
    pub created_at: DateTime<Utc>,
}

/// Active agent as seen by the evolutionary system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: AgentId,
    pub fitness: f64,
    pub genome: Genome,
    pub created_at: DateTime<Utc>,
    pub seq: u64,
}

/// Result of a task coordination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordination {
    pub task_id: TaskId,
    /// Assigned agents, fittest first
    pub agents: Vec<AgentId>,
}

/// Orchestrator statistics snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorStats {
    pub orchestrator_id: Uuid,
    /// Every agent ever registered, terminated ones included
    pub total_agents: usize,
    pub active_agents: usize,
    pub total_tasks_processed: u64,
    /// Mean success rate over non-terminated agents
    pub average_success_rate: f64,
    pub graph_node_count: usize,
    pub graph_edge_count: usize,
}

/// Outcome of one generation cycle, applied atomically by [`Orchestrator::commit_generation`]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationCommit {
    /// Graph node id for the generation
    pub node_id: String,
    pub properties: PropertyMap,
    /// Elite agents kept unchanged
    pub preserved: Vec<AgentId>,
    /// New genomes for non-elite agents
    pub replacements: Vec<(AgentId, Genome)>,
}

/// What a commit actually changed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitReport {
    pub applied: Vec<AgentId>,
    /// Agents no longer active at commit time
    pub skipped: Vec<AgentId>,
}

struct RegistryState {
    agents: HashMap<AgentId, AgentRecord>,
    next_seq: u64,
    graph: KnowledgeGraph,
}

impl RegistryState {
    fn live(&self, id: &AgentId) -> Result<&AgentRecord> {
        match self.agents.get(id) {
            Some(record) if !record.is_terminated() => Ok(record),
            _ => Err(AgentError::NotFound(id.to_string()).into()),
        }
    }

    fn live_mut(&mut self, id: &AgentId) -> Result<&mut AgentRecord> {
        match self.agents.get_mut(id) {
            Some(record) if !record.is_terminated() => Ok(record),
            _ => Err(AgentError::NotFound(id.to_string()).into()),
        }
    }

    fn active_count(&self) -> usize {
        self.agents.values().filter(|r| r.is_active()).count()
    }

    /// Active agents, fittest first; ties go to the earliest registration
    fn ranked_active(&self) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .agents
            .values()
            .filter(|r| r.is_active())
            .map(|r| Candidate {
                id: r.id.clone(),
                fitness: FitnessCalculator::calculate(&r.metrics),
                genome: r.genome.clone(),
                created_at: r.created_at,
                seq: r.seq,
            })
            .collect();
        candidates.sort_by_key(|c| (Reverse(OrderedFloat(c.fitness)), c.created_at, c.seq));
        candidates
    }

    fn select(&self, n: usize) -> Result<Vec<AgentId>> {
        let ranked = self.ranked_active();
        if n > ranked.len() {
            return Err(AgentError::InsufficientAgents {
                requested: n,
                available: ranked.len(),
            }
            .into());
        }
        Ok(ranked.into_iter().take(n).map(|c| c.id).collect())
    }
}

/// Central coordinator owning the agent registry and knowledge graph
///
/// Constructed explicitly and shared by reference (typically `Arc<Orchestrator>`).
pub struct Orchestrator {
    id: Uuid,
    started_at: DateTime<Utc>,
    config: OrchestratorConfig,
    state: RwLock<RegistryState>,
    metrics: Option<OrchestratorMetrics>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(OrchestratorConfig::default())
    }
}

impl Orchestrator {
    pub fn new(config: OrchestratorConfig) -> Self {
        let id = Uuid::now_v7();
        info!(orchestrator_id = %id, max_agents = config.max_agents, "Orchestrator initialized");
        Self {
            id,
            started_at: Utc::now(),
            config,
            state: RwLock::new(RegistryState {
                agents: HashMap::new(),
                next_seq: 0,
                graph: KnowledgeGraph::new(),
            }),
            metrics: None,
        }
    }

    /// Attach Prometheus metrics
    pub fn with_metrics(mut self, metrics: OrchestratorMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time since construction
    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }

    /// Register an agent under a generated id
    pub fn register_agent(&self, initial_genome: Genome) -> Result<AgentId> {
        self.register_agent_as(AgentId::generate(), initial_genome)
    }

    /// Register an agent under a host-supplied id
    ///
    /// Ids are never reused: an id that was ever registered (or names any
    /// other graph node) is rejected.
    #[instrument(skip(self, initial_genome), fields(genes = initial_genome.len()))]
    pub fn register_agent_as(&self, id: AgentId, initial_genome: Genome) -> Result<AgentId> {
        let mut state = self.state.write();

        if state.agents.len() >= self.config.max_agents {
            warn!(capacity = self.config.max_agents, "Agent capacity exhausted");
            return Err(AgentError::CapacityExhausted {
                capacity: self.config.max_agents,
            }
            .into());
        }
        if state.agents.contains_key(&id) || state.graph.contains(id.as_str()) {
            return Err(AgentError::AlreadyRegistered(id.to_string()).into());
        }

        let seq = state.next_seq;
        let mut record = AgentRecord::new(id.clone(), initial_genome, seq);
        record.transition(AgentState::Active)?;

        let mut properties = PropertyMap::new();
        properties.insert("state".into(), record.state.as_str().into());
        properties.insert("created_at".into(), record.created_at.into());
        state
            .graph
            .add_node(id.as_str(), NODE_TYPE_AGENT, properties)?;

        state.next_seq += 1;
        state.agents.insert(id.clone(), record);

        if let Some(metrics) = &self.metrics {
            metrics.registrations.inc();
            metrics.active_agents.set(state.active_count() as i64);
        }
        info!(agent_id = %id, "Registered agent");
        Ok(id)
    }

    /// Terminate an agent; its record and graph node remain for history
    #[instrument(skip(self))]
    pub fn unregister_agent(&self, id: &AgentId) -> Result<()> {
        let mut state = self.state.write();
        let record = state.live_mut(id)?;
        record.transition(AgentState::Terminated)?;

        let mut properties = PropertyMap::new();
        properties.insert("state".into(), AgentState::Terminated.as_str().into());
        properties.insert("terminated_at".into(), Utc::now().into());
        state.graph.merge_properties(id.as_str(), properties)?;

        if let Some(metrics) = &self.metrics {
            metrics.unregistrations.inc();
            metrics.active_agents.set(state.active_count() as i64);
        }
        info!(agent_id = %id, "Unregistered agent");
        Ok(())
    }

    /// Record one task outcome for an agent
    pub fn update_metrics(&self, id: &AgentId, success: bool, response_time: f64) -> Result<()> {
        if !response_time.is_finite() || response_time < 0.0 {
            return Err(AgentError::InvalidMetric(format!(
                "response time must be a non-negative number, got {}",
                response_time
            ))
            .into());
        }

        let mut state = self.state.write();
        let record = state.live_mut(id)?;
        record.metrics.record(success, response_time);
        debug!(
            agent_id = %id,
            success,
            response_time,
            completed = record.metrics.tasks_completed,
            failed = record.metrics.tasks_failed,
            "Updated agent metrics"
        );

        if let Some(metrics) = &self.metrics {
            metrics.record_outcome(success);
        }
        Ok(())
    }

    /// Whether `id` is registered and not terminated
    pub fn is_live(&self, id: &AgentId) -> bool {
        self.state.read().live(id).is_ok()
    }

    /// Fitness in [0, 1] for a live agent
    pub fn compute_fitness(&self, id: &AgentId) -> Result<f64> {
        let state = self.state.read();
        Ok(FitnessCalculator::calculate(&state.live(id)?.metrics))
    }

    /// The `n` fittest active agents, fittest first
    pub fn select_agents(&self, n: usize) -> Result<Vec<AgentId>> {
        self.state.read().select(n)
    }

    /// Assign the `n` fittest active agents to a new task
    #[instrument(skip(self))]
    pub fn coordinate_task(&self, description: &str, n: usize) -> Result<Coordination> {
        if n == 0 {
            return Err(AgentError::InvalidRequest("num_agents must be positive".into()).into());
        }

        let mut state = self.state.write();
        let agents = state.select(n)?;

        let task_id = TaskId::generate();
        let mut properties = PropertyMap::new();
        properties.insert("description".into(), description.into());
        properties.insert("num_agents".into(), n.into());
        properties.insert("started_at".into(), Utc::now().into());
        state
            .graph
            .add_node(task_id.as_str(), NODE_TYPE_TASK, properties)?;

        for agent in &agents {
            state
                .graph
                .add_edge(task_id.as_str(), agent.as_str(), RELATION_ASSIGNED)?;
        }

        if let Some(metrics) = &self.metrics {
            metrics.coordinations.inc();
        }
        info!(task_id = %task_id, agents = agents.len(), "Coordinated agents for task");
        Ok(Coordination { task_id, agents })
    }

    /// Consistent statistics snapshot; no side effects
    pub fn get_stats(&self) -> OrchestratorStats {
        let state = self.state.read();

        let live: Vec<&AgentRecord> = state
            .agents
            .values()
            .filter(|r| !r.is_terminated())
            .collect();
        let average_success_rate = if live.is_empty() {
            0.0
        } else {
            live.iter().map(|r| r.metrics.success_rate()).sum::<f64>() / live.len() as f64
        };

        OrchestratorStats {
            orchestrator_id: self.id,
            total_agents: state.agents.len(),
            active_agents: state.active_count(),
            total_tasks_processed: state.agents.values().map(|r| r.metrics.total_tasks()).sum(),
            average_success_rate,
            graph_node_count: state.graph.node_count(),
            graph_edge_count: state.graph.edge_count(),
        }
    }

    /// Snapshot of one agent, terminated agents included
    pub fn agent(&self, id: &AgentId) -> Result<AgentSnapshot> {
        let state = self.state.read();
        state
            .agents
            .get(id)
            .map(snapshot)
            .ok_or_else(|| AgentError::NotFound(id.to_string()).into())
    }

    /// Snapshots of every registered agent, in registration order
    pub fn agents(&self) -> Vec<AgentSnapshot> {
        let state = self.state.read();
        let mut records: Vec<&AgentRecord> = state.agents.values().collect();
        records.sort_by_key(|r| r.seq);
        records.into_iter().map(snapshot).collect()
    }

    /// Active agents ranked by fitness, for the evolutionary system
    pub fn population(&self) -> Vec<Candidate> {
        self.state.read().ranked_active()
    }

    /// Knowledge-graph nodes, optionally filtered by type
    pub fn knowledge(&self, node_type: Option<&str>) -> Vec<Node> {
        let state = self.state.read();
        match node_type {
            Some(t) => state.graph.query_by_type(t),
            None => state.graph.nodes(),
        }
    }

    /// Run a read-only closure against the knowledge graph
    pub fn with_graph<R>(&self, f: impl FnOnce(&KnowledgeGraph) -> R) -> R {
        f(&self.state.read().graph)
    }

    /// Apply a generation: provenance node and edges plus genome replacement
    ///
    /// Each replaced agent moves `active → evolving → active` under the same
    /// write lock, so readers never observe a half-applied generation.
    #[instrument(skip(self, commit), fields(node_id = %commit.node_id))]
    pub fn commit_generation(&self, commit: GenerationCommit) -> Result<CommitReport> {
        let mut state = self.state.write();

        state
            .graph
            .add_node(commit.node_id.as_str(), NODE_TYPE_GENERATION, commit.properties)?;
        for id in &commit.preserved {
            state
                .graph
                .add_edge(&commit.node_id, id.as_str(), RELATION_PRESERVED)?;
        }

        let mut report = CommitReport::default();
        for (id, genome) in commit.replacements {
            let record = match state.agents.get_mut(&id) {
                Some(record) if record.is_active() => record,
                _ => {
                    warn!(agent_id = %id, "Agent left the active pool mid-cycle, skipping");
                    report.skipped.push(id);
                    continue;
                }
            };

            record.transition(AgentState::Evolving)?;
            record.genome = genome;
            record.transition(AgentState::Active)?;

            state
                .graph
                .add_edge(&commit.node_id, id.as_str(), RELATION_EVOLVED)?;
            report.applied.push(id);
        }

        debug!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "Committed generation"
        );
        Ok(report)
    }
}

/// Terminated agents keep their metrics but report fitness 0
fn snapshot(record: &AgentRecord) -> AgentSnapshot {
    let fitness = if record.is_terminated() {
        0.0
    } else {
        FitnessCalculator::calculate(&record.metrics)
    };
    AgentSnapshot {
        id: record.id.clone(),
        state: record.state,
        metrics: record.metrics.clone(),
        genome: record.genome.clone(),
        fitness,
        success_rate: record.metrics.success_rate(),
        avg_response_time: record.metrics.avg_response_time(),
        created_at: record.created_at,
    }
}

/// Helper for building a property map from pairs
pub fn properties<I, K, V>(pairs: I) -> PropertyMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<PropertyValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

//! Flat command records and their structured responses
//!
//! Commands arrive as JSON objects tagged by `action`:
//!
//! ```json
//! {"action": "coordinate", "task_description": "analyze feedback", "num_agents": 3}
//! {"action": "knowledge", "node_type": "task"}
//! {"action": "loop_end", "agent_id": "agent_0_ctx", "succeeded": true}
//! ```

use cogzero_common::{AgentId, Genome};
use cogzero_darwinian::{Adaptation, EvolutionResult, EvolutionStats};
use cogzero_orchestrator::{
    AgentMetrics, AgentSnapshot, AgentState, Coordination, FitnessBreakdown, Node,
    OrchestratorStats,
};
use serde::{Deserialize, Serialize};

/// Default number of agents for `coordinate`
pub const DEFAULT_NUM_AGENTS: usize = 3;

fn default_num_agents() -> usize {
    DEFAULT_NUM_AGENTS
}

/// One host request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    Status,
    Coordinate {
        task_description: String,
        #[serde(default = "default_num_agents")]
        num_agents: usize,
    },
    QueryAgents,
    Knowledge {
        #[serde(default)]
        node_type: Option<String>,
    },
    Fitness {
        agent_id: AgentId,
    },
    Evolve,
    Adapt {
        /// Outcomes reported directly, applied after the hook tracker's
        #[serde(default)]
        outcomes: Vec<bool>,
        #[serde(default)]
        avg_response_time: Option<f64>,
        #[serde(default)]
        task_variety: Option<f64>,
    },
    Environment,
    Metrics,

    // Lifecycle hooks
    Register {
        #[serde(default)]
        agent_id: Option<AgentId>,
        #[serde(default)]
        genome: Genome,
    },
    LoopStart {
        agent_id: AgentId,
    },
    LoopEnd {
        agent_id: AgentId,
        succeeded: bool,
    },
    Unregister {
        agent_id: AgentId,
    },
}

impl Command {
    pub fn action(&self) -> &'static str {
        match self {
            Command::Status => "status",
            Command::Coordinate { .. } => "coordinate",
            Command::QueryAgents => "query_agents",
            Command::Knowledge { .. } => "knowledge",
            Command::Fitness { .. } => "fitness",
            Command::Evolve => "evolve",
            Command::Adapt { .. } => "adapt",
            Command::Environment => "environment",
            Command::Metrics => "metrics",
            Command::Register { .. } => "register",
            Command::LoopStart { .. } => "loop_start",
            Command::LoopEnd { .. } => "loop_end",
            Command::Unregister { .. } => "unregister",
        }
    }
}

/// Orchestrator status with service-level counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub stats: OrchestratorStats,
    pub uptime_seconds: f64,
    pub generation: u64,
    pub open_loops: usize,
    pub pending_outcomes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessReport {
    pub agent_id: AgentId,
    pub state: AgentState,
    pub fitness: f64,
    /// Absent for terminated agents
    pub breakdown: Option<FitnessBreakdown>,
    pub metrics: AgentMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptReport {
    pub adaptation: Adaptation,
    /// Outcomes folded into the feedback window by this call
    pub outcomes_applied: usize,
    /// Cycle run because adaptation recommended it
    pub evolution: Option<EvolutionResult>,
}

/// Structured result of a [`Command`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Response {
    Status(StatusReport),
    Coordination(Coordination),
    Agents(Vec<AgentSnapshot>),
    Knowledge(Vec<Node>),
    Fitness(FitnessReport),
    Evolution(EvolutionResult),
    Adaptation(AdaptReport),
    Environment(EvolutionStats),
    /// Prometheus text exposition
    Metrics(String),
    Registered { agent_id: AgentId },
    LoopStarted { agent_id: AgentId },
    LoopEnded { agent_id: AgentId, elapsed_seconds: f64 },
    Unregistered { agent_id: AgentId },
}

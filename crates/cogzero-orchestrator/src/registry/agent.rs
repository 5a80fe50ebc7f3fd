//! Agent records and performance metrics
//!
//! Lifecycle:
//!
//! ```text
//! initializing → active ⇄ {idle, learning, evolving}
//!      └────────────┴──────────────┴──────────→ terminated
//! ```
//!
//! `terminated` is final. Records of terminated agents stay in the registry
//! for historical queries and their ids are never reused.

use chrono::{DateTime, Utc};
use cogzero_common::{AgentError, AgentId, Genome};
use serde::{Deserialize, Serialize};

/// States in the agent lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Initializing,
    Active,
    Idle,
    Learning,
    Evolving,
    Terminated,
}

impl AgentState {
    /// Whether `self → next` is a legal lifecycle step
    pub fn can_transition_to(self, next: AgentState) -> bool {
        use AgentState::*;
        match (self, next) {
            (Terminated, _) => false,
            (_, Terminated) => true,
            (Initializing, Active) => true,
            (Active, Idle | Learning | Evolving) => true,
            (Idle | Learning | Evolving, Active) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentState::Initializing => "initializing",
            AgentState::Active => "active",
            AgentState::Idle => "idle",
            AgentState::Learning => "learning",
            AgentState::Evolving => "evolving",
            AgentState::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task performance counters for one agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    /// Sum of reported response times in seconds
    pub total_response_time: f64,
    pub last_active: Option<DateTime<Utc>>,
}

impl AgentMetrics {
    /// Record one task outcome
    pub fn record(&mut self, success: bool, response_time: f64) {
        if success {
            self.tasks_completed += 1;
        } else {
            self.tasks_failed += 1;
        }
        self.total_response_time += response_time;
        self.last_active = Some(Utc::now());
    }

    pub fn total_tasks(&self) -> u64 {
        self.tasks_completed + self.tasks_failed
    }

    /// completed / (completed + failed), 0 with no tasks
    pub fn success_rate(&self) -> f64 {
        let total = self.total_tasks();
        if total == 0 {
            return 0.0;
        }
        self.tasks_completed as f64 / total as f64
    }

    /// total_response_time / completed, 0 with no completions
    pub fn avg_response_time(&self) -> f64 {
        if self.tasks_completed == 0 {
            return 0.0;
        }
        self.total_response_time / self.tasks_completed as f64
    }
}

/// Registry entry for one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: AgentId,
    pub state: AgentState,
    pub metrics: AgentMetrics,
    pub genome: Genome,
    pub created_at: DateTime<Utc>,
    /// Registration sequence number; breaks `created_at` ties
    pub seq: u64,
}

impl AgentRecord {
    /// New record in `initializing` state
    pub fn new(id: AgentId, genome: Genome, seq: u64) -> Self {
        Self {
            id,
            state: AgentState::Initializing,
            metrics: AgentMetrics::default(),
            genome,
            created_at: Utc::now(),
            seq,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == AgentState::Active
    }

    pub fn is_terminated(&self) -> bool {
        self.state == AgentState::Terminated
    }

    /// Move to `next`, rejecting illegal lifecycle steps
    pub fn transition(&mut self, next: AgentState) -> Result<(), AgentError> {
        if !self.state.can_transition_to(next) {
            return Err(AgentError::InvalidRequest(format!(
                "agent {} cannot move from {} to {}",
                self.id, self.state, next
            )));
        }
        self.state = next;
        Ok(())
    }
}

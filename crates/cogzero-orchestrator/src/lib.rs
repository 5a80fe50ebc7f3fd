//! # CogZero Orchestrator
//!
//! Agent registry, fitness scoring, and knowledge graph for the CogZero
//! orchestration engine.
//!
//! ## Fitness Formula
//!
//! ```text
//! η = 0.5 × success_rate + 0.3 × speed + 0.2 × volume
//! ```
//!
//! Where:
//! - success_rate: completed / (completed + failed)
//! - speed: 1 / (1 + mean response time over completed tasks)
//! - volume: ln(1 + completed) / 10, capped at 1
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 Orchestrator                 │
//! │  ┌──────────────┐        ┌────────────────┐  │
//! │  │   Registry   │        │ KnowledgeGraph │  │
//! │  │ AgentRecords │        │  nodes + edges │  │
//! │  └──────────────┘        └────────────────┘  │
//! │        one RwLock guards both                │
//! └──────────────────────┬───────────────────────┘
//!                        │
//!                 HookTracker (host lifecycle hooks)
//! ```

pub mod fitness;
pub mod graph;
pub mod hooks;
pub mod orchestrator;
pub mod registry;
pub mod telemetry;

pub use fitness::{FitnessBreakdown, FitnessCalculator};
pub use graph::{Edge, KnowledgeGraph, Node};
pub use hooks::{HookTracker, LoopHooks};
pub use orchestrator::{
    properties, AgentSnapshot, Candidate, CommitReport, Coordination, GenerationCommit,
    Orchestrator, OrchestratorConfig, OrchestratorStats,
};
pub use registry::{AgentMetrics, AgentRecord, AgentState};
pub use telemetry::OrchestratorMetrics;

/// Default registry capacity
pub const DEFAULT_MAX_AGENTS: usize = 10_000;

/// Default capacity of the hook tracker's pending-outcome buffer
pub const DEFAULT_PENDING_OUTCOMES: usize = 1_000;

//! # CogZero Common
//!
//! Shared types and errors for the CogZero orchestration engine.
//!
//! ## Core Types
//!
//! - [`AgentId`]/[`TaskId`]: opaque identifiers assigned at registration and coordination
//! - [`Genome`]: named numeric (and pass-through) parameters evolved per agent
//! - [`PropertyValue`]: closed set of value kinds stored on knowledge-graph nodes
//!
//! ## Errors
//!
//! - [`CogZeroError`]: unified error with per-concern variants
//!   ([`AgentError`], [`GraphError`], [`EvolutionError`], [`HookError`])

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{AgentError, CogZeroError, EvolutionError, GraphError, HookError, Result};
pub use types::{
    genome::{GeneValue, Genome},
    ids::{AgentId, TaskId},
    property::{PropertyMap, PropertyValue},
};

/// CogZero version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Weight of the success-rate term in the fitness formula
pub const SUCCESS_WEIGHT: f64 = 0.5;

/// Weight of the speed term in the fitness formula
pub const SPEED_WEIGHT: f64 = 0.3;

/// Weight of the task-volume term in the fitness formula
pub const VOLUME_WEIGHT: f64 = 0.2;

/// Divisor applied to `ln(1 + tasks_completed)` for the volume term
pub const VOLUME_SCALE: f64 = 10.0;

/// Node type used for agents in the knowledge graph
pub const NODE_TYPE_AGENT: &str = "agent";

/// Node type used for coordinated tasks in the knowledge graph
pub const NODE_TYPE_TASK: &str = "task";

/// Node type used for generation records in the knowledge graph
pub const NODE_TYPE_GENERATION: &str = "generation";

/// Relation from a task to each agent assigned to it
pub const RELATION_ASSIGNED: &str = "assigned";

/// Relation from a generation to each elite agent kept unchanged
pub const RELATION_PRESERVED: &str = "preserved";

/// Relation from a generation to each agent whose genome was replaced
pub const RELATION_EVOLVED: &str = "evolved";

//! Error types for CogZero
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

/// Result type alias using CogZeroError
pub type Result<T> = std::result::Result<T, CogZeroError>;

/// Unified error type for CogZero operations
#[derive(Debug, Error)]
pub enum CogZeroError {
    // Agent registry errors
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    // Knowledge graph integrity errors
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    // Evolution errors
    #[error("Evolution error: {0}")]
    Evolution(#[from] EvolutionError),

    // Lifecycle hook errors
    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Agent registry errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentError {
    #[error("Agent not found or terminated: {0}")]
    NotFound(String),

    #[error("Agent id already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Insufficient active agents: requested {requested}, available {available}")]
    InsufficientAgents { requested: usize, available: usize },

    #[error("Agent capacity exhausted: {capacity} agents registered")]
    CapacityExhausted { capacity: usize },

    #[error("Invalid metric value: {0}")]
    InvalidMetric(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Knowledge graph errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("Edge references unknown node: {0}")]
    UnknownNode(String),

    #[error("Node not found: {0}")]
    NotFound(String),
}

/// Evolutionary system errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvolutionError {
    #[error("Cannot evolve an empty population")]
    EmptyPopulation,

    #[error("Invalid evolutionary config: {0}")]
    InvalidConfig(String),
}

/// Lifecycle hook errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HookError {
    #[error("No loop start recorded for agent {0}")]
    NoLoopStart(String),

    #[error("Agent registration failed: {0}")]
    Registration(String),
}

impl CogZeroError {
    /// True when the error refers to an unknown or terminated agent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CogZeroError::Agent(AgentError::NotFound(_)) | CogZeroError::Graph(GraphError::NotFound(_))
        )
    }
}

impl From<serde_json::Error> for CogZeroError {
    fn from(err: serde_json::Error) -> Self {
        CogZeroError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for CogZeroError {
    fn from(err: anyhow::Error) -> Self {
        CogZeroError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CogZeroError::Agent(AgentError::NotFound("agent_deadbeef".to_string()));
        assert!(err.to_string().contains("agent_deadbeef"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_insufficient_agents() {
        let err = AgentError::InsufficientAgents {
            requested: 4,
            available: 2,
        };
        assert!(err.to_string().contains("requested 4, available 2"));
    }

    #[test]
    fn test_from_conversion() {
        let err: CogZeroError = EvolutionError::EmptyPopulation.into();
        assert!(matches!(err, CogZeroError::Evolution(EvolutionError::EmptyPopulation)));
        assert!(!err.is_not_found());
    }
}

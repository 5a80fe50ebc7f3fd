//! Agent and task identifiers
//!
//! Identifiers are opaque strings. Generated ids take the form
//! `agent_<32 hex>` / `task_<32 hex>` from a full v7 UUID, so they sort by
//! creation time and carry 74 random bits. Hosts may also supply their own
//! agent ids.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn uuid_suffix() -> String {
    Uuid::now_v7().simple().to_string()
}

/// Unique agent identifier, immutable once assigned
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Generate a fresh `agent_<uuid>` id
    pub fn generate() -> Self {
        Self(format!("agent_{}", uuid_suffix()))
    }

    /// Wrap a host-supplied id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a coordinated task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh `task_<uuid>` id
    pub fn generate() -> Self {
        Self(format!("task_{}", uuid_suffix()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//! Agent registry types
pub mod agent;

pub use self::agent::{AgentMetrics, AgentRecord, AgentState};

//! Generation history and evolution statistics

use chrono::{DateTime, Utc};
use cogzero_common::AgentId;
use serde::{Deserialize, Serialize};

use crate::environment::EnvironmentState;

/// Immutable summary of one generation cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Starts at 1; generation 0 is the unevolved population
    pub generation_number: u64,
    pub average_fitness: f64,
    pub max_fitness: f64,
    /// Fittest first
    pub top_agent_ids: Vec<AgentId>,
    pub population_size: usize,
    pub offspring: usize,
    /// Environment at the time of the cycle
    pub complexity: f64,
    pub volatility: f64,
    pub timestamp: DateTime<Utc>,
}

/// Direction of recent average fitness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessTrend {
    Improving,
    Declining,
    Stable,
    Unknown,
}

impl FitnessTrend {
    /// Compare the last two records
    pub fn from_history(history: &[GenerationRecord]) -> Self {
        match history {
            [.., previous, latest] => {
                if latest.average_fitness > previous.average_fitness {
                    FitnessTrend::Improving
                } else if latest.average_fitness < previous.average_fitness {
                    FitnessTrend::Declining
                } else {
                    FitnessTrend::Stable
                }
            }
            _ => FitnessTrend::Unknown,
        }
    }
}

impl std::fmt::Display for FitnessTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitnessTrend::Improving => write!(f, "improving"),
            FitnessTrend::Declining => write!(f, "declining"),
            FitnessTrend::Stable => write!(f, "stable"),
            FitnessTrend::Unknown => write!(f, "unknown"),
        }
    }
}

/// Evolution statistics snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStats {
    pub generation: u64,
    pub history_length: usize,
    /// Mean average_fitness over the most recent generations
    pub recent_average_fitness: f64,
    pub trend: FitnessTrend,
    pub environment: EnvironmentState,
}

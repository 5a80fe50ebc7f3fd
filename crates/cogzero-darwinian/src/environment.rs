//! Environment model the population adapts to

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shared environment parameters, each clamped to [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    pub complexity: f64,
    pub volatility: f64,
    pub resource_availability: f64,
    pub task_diversity: f64,
    pub last_updated: DateTime<Utc>,
}

impl Default for EnvironmentState {
    fn default() -> Self {
        Self {
            complexity: 0.5,
            volatility: 0.5,
            resource_availability: 1.0,
            task_diversity: 0.5,
            last_updated: Utc::now(),
        }
    }
}

impl EnvironmentState {
    pub fn set_complexity(&mut self, value: f64) {
        self.complexity = clamp_unit(value, self.complexity);
    }

    pub fn set_volatility(&mut self, value: f64) {
        self.volatility = clamp_unit(value, self.volatility);
    }

    pub fn set_resource_availability(&mut self, value: f64) {
        self.resource_availability = clamp_unit(value, self.resource_availability);
    }

    pub fn set_task_diversity(&mut self, value: f64) {
        self.task_diversity = clamp_unit(value, self.task_diversity);
    }

    /// Refresh `last_updated`
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

/// Clamp to [0, 1]; NaN keeps the previous value
fn clamp_unit(value: f64, previous: f64) -> f64 {
    if value.is_nan() {
        previous
    } else {
        value.clamp(0.0, 1.0)
    }
}

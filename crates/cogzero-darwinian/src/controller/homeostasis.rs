//! Homeostatic complexity controller
//!
//! Dead-band step controller: success above `target + band` makes the
//! environment harder, success below `target - band` makes it easier.

use serde::{Deserialize, Serialize};

/// Direction of a complexity adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityAdjustment {
    Increased,
    Decreased,
    Unchanged,
}

pub struct HomeostaticController {
    target: f64,
    band: f64,
    step: f64,
}

impl HomeostaticController {
    pub fn new(target: f64, band: f64, step: f64) -> Self {
        Self { target, band, step }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// New complexity in [0, 1] for the observed success rate
    pub fn compute(&self, complexity: f64, observed_success_rate: f64) -> (f64, ComplexityAdjustment) {
        if observed_success_rate > self.target + self.band {
            ((complexity + self.step).min(1.0), ComplexityAdjustment::Increased)
        } else if observed_success_rate < self.target - self.band {
            ((complexity - self.step).max(0.0), ComplexityAdjustment::Decreased)
        } else {
            (complexity, ComplexityAdjustment::Unchanged)
        }
    }
}

//! Fitness calculation
//!
//! ```text
//! success = completed / (completed + failed)
//! speed   = 1 / (1 + total_response_time / completed)
//! volume  = min(ln(1 + completed) / 10, 1)
//! η       = 0.5·success + 0.3·speed + 0.2·volume   ∈ [0, 1]
//! ```
//!
//! With no completions the speed term is 0, so an agent without any
//! recorded tasks scores 0.

use cogzero_common::{SPEED_WEIGHT, SUCCESS_WEIGHT, VOLUME_SCALE, VOLUME_WEIGHT};
use serde::{Deserialize, Serialize};

use crate::registry::AgentMetrics;

/// Per-term fitness breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    pub success_rate: f64,
    pub speed_score: f64,
    pub volume_score: f64,
    pub fitness: f64,
}

pub struct FitnessCalculator;

impl FitnessCalculator {
    /// Calculate fitness in [0, 1]
    pub fn calculate(metrics: &AgentMetrics) -> f64 {
        Self::breakdown(metrics).fitness
    }

    pub fn breakdown(metrics: &AgentMetrics) -> FitnessBreakdown {
        let success_rate = metrics.success_rate();

        let speed_score = if metrics.tasks_completed == 0 {
            0.0
        } else {
            let avg = metrics.avg_response_time();
            if avg.is_finite() && avg >= 0.0 {
                1.0 / (1.0 + avg)
            } else {
                0.0
            }
        };

        let volume_score = ((metrics.tasks_completed as f64).ln_1p() / VOLUME_SCALE).min(1.0);

        let fitness = (SUCCESS_WEIGHT * success_rate
            + SPEED_WEIGHT * speed_score
            + VOLUME_WEIGHT * volume_score)
            .clamp(0.0, 1.0);

        FitnessBreakdown {
            success_rate,
            speed_score,
            volume_score,
            fitness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn metrics(completed: u64, failed: u64, total_response_time: f64) -> AgentMetrics {
        AgentMetrics {
            tasks_completed: completed,
            tasks_failed: failed,
            total_response_time,
            last_active: None,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let b = FitnessCalculator::breakdown(&metrics(5, 1, 6.15));
        assert!((b.success_rate - 0.8333).abs() < 1e-4);
        assert!((b.speed_score - 0.4484).abs() < 1e-4);
        assert!((b.volume_score - 0.1792).abs() < 1e-4);
        assert!((b.fitness - 0.5868).abs() < 1e-3);
    }

    #[test]
    fn test_no_tasks_scores_zero() {
        assert_eq!(FitnessCalculator::calculate(&metrics(0, 0, 0.0)), 0.0);
    }

    #[test]
    fn test_only_failures() {
        // Failures only: no success, no speed, no volume
        assert_eq!(FitnessCalculator::calculate(&metrics(0, 7, 12.0)), 0.0);
    }

    #[test]
    fn test_volume_term_capped() {
        let b = FitnessCalculator::breakdown(&metrics(u64::MAX / 2, 0, 0.0));
        assert!(b.volume_score <= 1.0);
        assert!(b.fitness <= 1.0);
    }

    proptest! {
        #[test]
        fn prop_fitness_in_unit_interval(
            completed in 0u64..1_000_000,
            failed in 0u64..1_000_000,
            total in 0.0f64..1.0e9,
        ) {
            let f = FitnessCalculator::calculate(&metrics(completed, failed, total));
            prop_assert!((0.0..=1.0).contains(&f));
        }
    }
}

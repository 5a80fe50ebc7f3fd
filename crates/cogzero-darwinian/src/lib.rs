//! # Darwinian
//!
//! Evolutionary selection and homeostatic adaptation for the CogZero
//! agent population.
//!
//! ## Generation Cycle
//!
//! ```text
//! rank by fitness → keep top elite_size → tournament-select parents
//!                 → crossover → mutate → replace lowest-ranked genomes
//! ```
//!
//! ## Homeostasis
//!
//! Rolling success rate over the last `feedback_window` outcomes:
//! above `target + band` raises environment complexity by `step`,
//! below `target - band` lowers it. An evolution cycle is recommended
//! (never run directly) when population fitness drops below
//! `adaptation_threshold`.

pub mod controller;
pub mod engine;
pub mod environment;
pub mod history;
pub mod operators;
pub mod selection;
pub mod telemetry;

pub use controller::{ComplexityAdjustment, FeedbackWindow, HomeostaticController};
pub use engine::{Adaptation, EvolutionResult, EvolutionarySystem, Feedback, GenerationOutcome};
pub use environment::EnvironmentState;
pub use history::{EvolutionStats, FitnessTrend, GenerationRecord};
pub use selection::tournament_select;
pub use telemetry::EvolutionMetrics;

use cogzero_common::EvolutionError;
use serde::{Deserialize, Serialize};

/// Number of fittest agent ids reported per generation
pub const TOP_AGENTS_REPORTED: usize = 3;

/// Generations averaged for stats and trend
pub const RECENT_GENERATIONS: usize = 5;

/// Evolutionary configuration, immutable per engine instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionaryConfig {
    /// Upper bound on agents taking part in one generation
    pub population_size: usize,
    /// Per-gene mutation probability
    pub mutation_rate: f64,
    /// Probability that a child mixes both parents
    pub crossover_rate: f64,
    /// Fittest agents kept unchanged each generation
    pub elite_size: usize,
    /// Agents sampled per tournament
    pub tournament_size: usize,
    /// Population fitness below which evolution is recommended
    pub adaptation_threshold: f64,
    /// Desired rolling success rate
    pub homeostasis_target: f64,
    /// Outcomes kept in the rolling window
    pub feedback_window: usize,
    /// Dead band around the target
    pub homeostasis_band: f64,
    /// Complexity change per adjustment
    pub complexity_step: f64,
    /// Relative bound of a float mutation (±scale·|value|)
    pub mutation_scale: f64,
}

impl Default for EvolutionaryConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            mutation_rate: 0.1,
            crossover_rate: 0.7,
            elite_size: 2,
            tournament_size: 3,
            adaptation_threshold: 0.5,
            homeostasis_target: 0.7,
            feedback_window: 10,
            homeostasis_band: 0.1,
            complexity_step: 0.05,
            mutation_scale: 0.1,
        }
    }
}

impl EvolutionaryConfig {
    /// Check ranges: rates in [0, 1], sizes positive, elite_size < population_size
    pub fn validate(&self) -> Result<(), EvolutionError> {
        let unit = |name: &str, v: f64| {
            if v.is_finite() && (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(EvolutionError::InvalidConfig(format!(
                    "{} must be in [0, 1], got {}",
                    name, v
                )))
            }
        };
        let positive = |name: &str, v: usize| {
            if v > 0 {
                Ok(())
            } else {
                Err(EvolutionError::InvalidConfig(format!("{} must be positive", name)))
            }
        };

        positive("population_size", self.population_size)?;
        positive("elite_size", self.elite_size)?;
        positive("tournament_size", self.tournament_size)?;
        positive("feedback_window", self.feedback_window)?;
        if self.elite_size >= self.population_size {
            return Err(EvolutionError::InvalidConfig(format!(
                "elite_size ({}) must be smaller than population_size ({})",
                self.elite_size, self.population_size
            )));
        }

        unit("mutation_rate", self.mutation_rate)?;
        unit("crossover_rate", self.crossover_rate)?;
        unit("adaptation_threshold", self.adaptation_threshold)?;
        unit("homeostasis_target", self.homeostasis_target)?;
        unit("homeostasis_band", self.homeostasis_band)?;
        unit("complexity_step", self.complexity_step)?;
        unit("mutation_scale", self.mutation_scale)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        EvolutionaryConfig::default().validate().unwrap();
    }

    #[test]
    fn test_elite_must_be_smaller_than_population() {
        let config = EvolutionaryConfig {
            population_size: 2,
            elite_size: 2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EvolutionError::InvalidConfig(_))));
    }

    #[test]
    fn test_rates_out_of_range() {
        for config in [
            EvolutionaryConfig { mutation_rate: 1.5, ..Default::default() },
            EvolutionaryConfig { crossover_rate: -0.1, ..Default::default() },
            EvolutionaryConfig { homeostasis_target: f64::NAN, ..Default::default() },
        ] {
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_zero_sizes_rejected() {
        assert!(EvolutionaryConfig { tournament_size: 0, ..Default::default() }
            .validate()
            .is_err());
        assert!(EvolutionaryConfig { feedback_window: 0, ..Default::default() }
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: EvolutionaryConfig =
            serde_json::from_str(r#"{"population_size": 20, "elite_size": 4}"#).unwrap();
        assert_eq!(config.population_size, 20);
        assert_eq!(config.tournament_size, 3);
        config.validate().unwrap();
    }
}

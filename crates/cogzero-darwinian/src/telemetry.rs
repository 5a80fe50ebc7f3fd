//! Prometheus metrics for evolution and adaptation

use cogzero_common::{CogZeroError, Result};
use prometheus::{Gauge, IntCounter, Registry};

#[derive(Clone)]
pub struct EvolutionMetrics {
    pub generations: IntCounter,
    pub offspring: IntCounter,
    pub adaptation_triggers: IntCounter,
    pub average_fitness: Gauge,
    pub max_fitness: Gauge,
    pub complexity: Gauge,
}

impl EvolutionMetrics {
    pub fn new() -> Result<Self> {
        Ok(Self {
            generations: IntCounter::new("cogzero_generations_total", "Generation cycles completed")
                .map_err(prom_err)?,
            offspring: IntCounter::new("cogzero_offspring_total", "Genomes produced by evolution")
                .map_err(prom_err)?,
            adaptation_triggers: IntCounter::new(
                "cogzero_adaptation_triggers_total",
                "Adaptations that recommended an evolution cycle",
            )
            .map_err(prom_err)?,
            average_fitness: Gauge::new(
                "cogzero_generation_average_fitness",
                "Average fitness of the latest generation",
            )
            .map_err(prom_err)?,
            max_fitness: Gauge::new(
                "cogzero_generation_max_fitness",
                "Maximum fitness of the latest generation",
            )
            .map_err(prom_err)?,
            complexity: Gauge::new("cogzero_environment_complexity", "Environment complexity")
                .map_err(prom_err)?,
        })
    }

    pub fn register(registry: &Registry) -> Result<Self> {
        let metrics = Self::new()?;
        registry
            .register(Box::new(metrics.generations.clone()))
            .map_err(prom_err)?;
        registry
            .register(Box::new(metrics.offspring.clone()))
            .map_err(prom_err)?;
        registry
            .register(Box::new(metrics.adaptation_triggers.clone()))
            .map_err(prom_err)?;
        registry
            .register(Box::new(metrics.average_fitness.clone()))
            .map_err(prom_err)?;
        registry
            .register(Box::new(metrics.max_fitness.clone()))
            .map_err(prom_err)?;
        registry
            .register(Box::new(metrics.complexity.clone()))
            .map_err(prom_err)?;
        Ok(metrics)
    }
}

fn prom_err(err: prometheus::Error) -> CogZeroError {
    CogZeroError::Internal(format!("metrics: {}", err))
}

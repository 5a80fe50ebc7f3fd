//! Evolutionary system: generation cycles and homeostatic adaptation
//!
//! The engine never holds the orchestrator's lock while it computes.
//! [`EvolutionarySystem::evolve`] takes a population snapshot, runs a pure
//! [`EvolutionarySystem::run_generation_cycle`] over it and hands the
//! result back through [`Orchestrator::commit_generation`], so metric
//! updates that arrive mid-cycle count toward the next generation.

use chrono::Utc;
use cogzero_common::{AgentId, EvolutionError, Genome, PropertyMap, Result};
use cogzero_orchestrator::{properties, Candidate, GenerationCommit, Orchestrator};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::controller::{ComplexityAdjustment, FeedbackWindow, HomeostaticController};
use crate::environment::EnvironmentState;
use crate::history::{EvolutionStats, FitnessTrend, GenerationRecord};
use crate::operators::{crossover, mutate};
use crate::selection::tournament_select;
use crate::telemetry::EvolutionMetrics;
use crate::{EvolutionaryConfig, RECENT_GENERATIONS, TOP_AGENTS_REPORTED};

/// Result of a generation cycle before it is applied
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOutcome {
    pub record: GenerationRecord,
    /// Agents kept unchanged, fittest first
    pub elites: Vec<AgentId>,
    /// New genomes for the lowest-ranked agents
    pub replacements: Vec<(AgentId, Genome)>,
}

/// Result of a committed generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionResult {
    pub record: GenerationRecord,
    pub applied: Vec<AgentId>,
    /// Agents that left the active pool before the commit
    pub skipped: Vec<AgentId>,
}

/// Recent task outcomes plus optional environment signals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub outcomes: Vec<bool>,
    /// Mean response time in seconds; drives volatility
    #[serde(default)]
    pub avg_response_time: Option<f64>,
    /// Observed task variety in [0, 1]; drives task_diversity
    #[serde(default)]
    pub task_variety: Option<f64>,
}

impl Feedback {
    pub fn from_outcomes(outcomes: Vec<bool>) -> Self {
        Self {
            outcomes,
            ..Default::default()
        }
    }
}

/// Result of one adaptation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adaptation {
    pub environment: EnvironmentState,
    /// Rolling success rate, `None` while the window is empty
    pub observed_success_rate: Option<f64>,
    pub adjustment: ComplexityAdjustment,
    pub average_fitness: Option<f64>,
    /// Population fitness fell below `adaptation_threshold`
    pub evolution_recommended: bool,
}

pub struct EvolutionarySystem {
    config: EvolutionaryConfig,
    rng: Box<dyn RngCore + Send>,
    environment: EnvironmentState,
    history: Vec<GenerationRecord>,
    feedback: FeedbackWindow,
    controller: HomeostaticController,
    /// Distinguishes this system's generation nodes in a shared graph
    tag: String,
    metrics: Option<EvolutionMetrics>,
}

impl EvolutionarySystem {
    /// Create a system with an injected random source
    pub fn new(config: EvolutionaryConfig, rng: impl RngCore + Send + 'static) -> Result<Self> {
        config.validate()?;

        let tag = Uuid::now_v7().simple().to_string();
        info!(
            tag = %tag,
            population_size = config.population_size,
            elite_size = config.elite_size,
            "Evolutionary system initialized"
        );

        Ok(Self {
            feedback: FeedbackWindow::new(config.feedback_window),
            controller: HomeostaticController::new(
                config.homeostasis_target,
                config.homeostasis_band,
                config.complexity_step,
            ),
            config,
            rng: Box::new(rng),
            environment: EnvironmentState::default(),
            history: Vec::new(),
            tag,
            metrics: None,
        })
    }

    /// Reproducible system seeded from `seed`
    pub fn from_seed(config: EvolutionaryConfig, seed: u64) -> Result<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: EvolutionaryConfig) -> Result<Self> {
        Self::new(config, StdRng::from_entropy())
    }

    /// Attach Prometheus metrics
    pub fn with_metrics(mut self, metrics: EvolutionMetrics) -> Self {
        metrics.complexity.set(self.environment.complexity);
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &EvolutionaryConfig {
        &self.config
    }

    pub fn environment(&self) -> &EnvironmentState {
        &self.environment
    }

    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    /// Number of completed generations
    pub fn generation(&self) -> u64 {
        self.history.last().map_or(0, |r| r.generation_number)
    }

    /// Graph node id of generation `n`
    pub fn generation_node_id(&self, n: u64) -> String {
        format!("generation_{}_{}", n, self.tag)
    }

    /// Run one generation over a population snapshot
    ///
    /// The top `elite_size` agents survive unchanged. Each remaining slot up
    /// to `population_size` gets a child of two tournament-selected parents,
    /// which replaces the genome of the lowest-ranked non-elite agent.
    #[instrument(skip(self, population), fields(population = population.len()))]
    pub fn run_generation_cycle(&mut self, population: &[Candidate]) -> Result<GenerationOutcome> {
        let outcome = self.plan_generation(population)?;
        self.record_generation(&outcome.record, outcome.elites.len());
        Ok(outcome)
    }

    /// Rank, select and breed without touching history
    fn plan_generation(&mut self, population: &[Candidate]) -> Result<GenerationOutcome> {
        if population.is_empty() {
            return Err(EvolutionError::EmptyPopulation.into());
        }

        let mut ranked = population.to_vec();
        ranked.sort_by_key(|c| (Reverse(OrderedFloat(c.fitness)), c.created_at, c.seq));

        let cohort = self.config.population_size.min(ranked.len());
        let elite_count = self.config.elite_size.min(cohort);
        let offspring = cohort - elite_count;

        let elites: Vec<AgentId> = ranked[..elite_count].iter().map(|c| c.id.clone()).collect();

        let mut replacements = Vec::with_capacity(offspring);
        for target in &ranked[ranked.len() - offspring..] {
            let parent_a = tournament_select(&ranked, self.config.tournament_size, &mut *self.rng)?;
            let parent_b = tournament_select(&ranked, self.config.tournament_size, &mut *self.rng)?;

            let child = crossover(
                &parent_a.genome,
                &parent_b.genome,
                self.config.crossover_rate,
                &mut *self.rng,
            );
            let child = mutate(
                &child,
                self.config.mutation_rate,
                self.config.mutation_scale,
                &mut *self.rng,
            );
            debug!(
                agent_id = %target.id,
                parent_a = %parent_a.id,
                parent_b = %parent_b.id,
                "Produced offspring"
            );
            replacements.push((target.id.clone(), child));
        }

        let average_fitness = ranked.iter().map(|c| c.fitness).sum::<f64>() / ranked.len() as f64;
        let max_fitness = ranked[0].fitness;

        let record = GenerationRecord {
            generation_number: self.generation() + 1,
            average_fitness,
            max_fitness,
            top_agent_ids: ranked
                .iter()
                .take(TOP_AGENTS_REPORTED)
                .map(|c| c.id.clone())
                .collect(),
            population_size: ranked.len(),
            offspring,
            complexity: self.environment.complexity,
            volatility: self.environment.volatility,
            timestamp: Utc::now(),
        };

        Ok(GenerationOutcome {
            record,
            elites,
            replacements,
        })
    }

    fn record_generation(&mut self, record: &GenerationRecord, elites: usize) {
        self.history.push(record.clone());

        if let Some(metrics) = &self.metrics {
            metrics.generations.inc();
            metrics.offspring.inc_by(record.offspring as u64);
            metrics.average_fitness.set(record.average_fitness);
            metrics.max_fitness.set(record.max_fitness);
        }
        info!(
            generation = record.generation_number,
            average_fitness = record.average_fitness,
            max_fitness = record.max_fitness,
            elites,
            offspring = record.offspring,
            "Generation complete"
        );
    }

    /// Snapshot the orchestrator's active population, evolve it and commit
    ///
    /// History only advances once the orchestrator accepted the commit.
    pub fn evolve(&mut self, orchestrator: &Orchestrator) -> Result<EvolutionResult> {
        let population = orchestrator.population();
        let outcome = self.plan_generation(&population)?;
        let record = outcome.record;
        let elite_count = outcome.elites.len();

        let commit = GenerationCommit {
            node_id: self.generation_node_id(record.generation_number),
            properties: generation_properties(&record),
            preserved: outcome.elites,
            replacements: outcome.replacements,
        };
        let report = orchestrator.commit_generation(commit)?;
        self.record_generation(&record, elite_count);

        Ok(EvolutionResult {
            record,
            applied: report.applied,
            skipped: report.skipped,
        })
    }

    /// Fold feedback into the rolling window and adjust the environment
    ///
    /// Evolution is only recommended through the returned flag, never run.
    pub fn adapt(&mut self, feedback: &Feedback, average_fitness: Option<f64>) -> Adaptation {
        self.feedback.extend(feedback.outcomes.iter().copied());
        let observed_success_rate = self.feedback.success_rate();

        let adjustment = match observed_success_rate {
            Some(rate) => {
                let (complexity, adjustment) =
                    self.controller.compute(self.environment.complexity, rate);
                self.environment.set_complexity(complexity);
                adjustment
            }
            None => ComplexityAdjustment::Unchanged,
        };

        if let Some(t) = feedback.avg_response_time.filter(|t| t.is_finite() && *t >= 0.0) {
            self.environment.set_volatility(1.0 / (1.0 + t));
        }
        if let Some(variety) = feedback.task_variety {
            self.environment.set_task_diversity(variety);
        }
        self.environment.touch();

        let evolution_recommended =
            average_fitness.map_or(false, |f| f < self.config.adaptation_threshold);

        if let Some(metrics) = &self.metrics {
            metrics.complexity.set(self.environment.complexity);
            if evolution_recommended {
                metrics.adaptation_triggers.inc();
            }
        }
        debug!(
            observed_success_rate = ?observed_success_rate,
            complexity = self.environment.complexity,
            adjustment = ?adjustment,
            evolution_recommended,
            "Adapted environment"
        );

        Adaptation {
            environment: self.environment.clone(),
            observed_success_rate,
            adjustment,
            average_fitness,
            evolution_recommended,
        }
    }

    /// [`adapt`](Self::adapt) against the orchestrator's current population
    pub fn adapt_from(&mut self, orchestrator: &Orchestrator, feedback: &Feedback) -> Adaptation {
        let population = orchestrator.population();
        let average_fitness = if population.is_empty() {
            None
        } else {
            Some(population.iter().map(|c| c.fitness).sum::<f64>() / population.len() as f64)
        };
        self.adapt(feedback, average_fitness)
    }

    pub fn stats(&self) -> EvolutionStats {
        let recent = &self.history[self.history.len().saturating_sub(RECENT_GENERATIONS)..];
        let recent_average_fitness = if recent.is_empty() {
            0.0
        } else {
            recent.iter().map(|r| r.average_fitness).sum::<f64>() / recent.len() as f64
        };

        EvolutionStats {
            generation: self.generation(),
            history_length: self.history.len(),
            recent_average_fitness,
            trend: FitnessTrend::from_history(recent),
            environment: self.environment.clone(),
        }
    }
}

fn generation_properties(record: &GenerationRecord) -> PropertyMap {
    let mut props = properties([
        ("average_fitness", record.average_fitness),
        ("max_fitness", record.max_fitness),
        ("complexity", record.complexity),
    ]);
    props.insert("generation_number".into(), (record.generation_number as i64).into());
    props.insert("population_size".into(), record.population_size.into());
    props.insert("offspring".into(), record.offspring.into());
    props.insert("timestamp".into(), record.timestamp.into());
    props
}

//! Host command surface
//!
//! One entry point per action. [`CogZeroService::execute`] dispatches a
//! parsed [`Command`]; [`CogZeroService::respond`] wraps the whole
//! parse/execute/encode round trip for line-oriented transports.

use cogzero_common::{AgentError, AgentId, CogZeroError, Genome, Result};
use cogzero_darwinian::{
    EvolutionMetrics, EvolutionResult, EvolutionStats, EvolutionarySystem, Feedback,
};
use cogzero_orchestrator::{
    AgentSnapshot, AgentState, Coordination, FitnessCalculator, HookTracker, LoopHooks, Node, Orchestrator,
    OrchestratorMetrics,
};
use parking_lot::Mutex;
use prometheus::{Encoder, Registry, TextEncoder};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::command::{AdaptReport, Command, FitnessReport, Response, StatusReport};
use crate::config::CogZeroConfig;

pub struct CogZeroService {
    orchestrator: Arc<Orchestrator>,
    hooks: HookTracker,
    evolution: Mutex<EvolutionarySystem>,
    evolve_on_adapt: bool,
    registry: Option<Registry>,
}

impl CogZeroService {
    pub fn new(config: &CogZeroConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Service whose orchestrator and evolution metrics register in `registry`
    pub fn with_registry(config: &CogZeroConfig, registry: Registry) -> Result<Self> {
        Self::build(config, Some(registry))
    }

    fn build(config: &CogZeroConfig, registry: Option<Registry>) -> Result<Self> {
        let mut orchestrator = Orchestrator::new(config.orchestrator.clone());
        let mut evolution = match config.service.seed {
            Some(seed) => EvolutionarySystem::from_seed(config.evolution.clone(), seed)?,
            None => EvolutionarySystem::from_entropy(config.evolution.clone())?,
        };

        if let Some(registry) = &registry {
            orchestrator = orchestrator.with_metrics(OrchestratorMetrics::register(registry)?);
            evolution = evolution.with_metrics(EvolutionMetrics::register(registry)?);
        }

        let orchestrator = Arc::new(orchestrator);
        info!(
            orchestrator_id = %orchestrator.id(),
            evolve_on_adapt = config.service.evolve_on_adapt,
            "CogZero service initialized"
        );

        Ok(Self {
            hooks: HookTracker::new(orchestrator.clone(), config.service.pending_outcomes),
            orchestrator,
            evolution: Mutex::new(evolution),
            evolve_on_adapt: config.service.evolve_on_adapt,
            registry,
        })
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.orchestrator
    }

    pub fn hooks(&self) -> &HookTracker {
        &self.hooks
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            stats: self.orchestrator.get_stats(),
            uptime_seconds: self.orchestrator.uptime().num_milliseconds() as f64 / 1000.0,
            generation: self.evolution.lock().generation(),
            open_loops: self.hooks.open_loops(),
            pending_outcomes: self.hooks.pending_outcomes(),
        }
    }

    pub fn coordinate(&self, task_description: &str, num_agents: usize) -> Result<Coordination> {
        if task_description.trim().is_empty() {
            return Err(AgentError::InvalidRequest("task_description is required".into()).into());
        }
        self.orchestrator.coordinate_task(task_description, num_agents)
    }

    pub fn query_agents(&self) -> Vec<AgentSnapshot> {
        self.orchestrator.agents()
    }

    pub fn knowledge(&self, node_type: Option<&str>) -> Vec<Node> {
        self.orchestrator.knowledge(node_type)
    }

    /// Fitness of any registered agent
    ///
    /// Terminated agents report fitness 0 and no breakdown.
    pub fn fitness(&self, agent_id: &AgentId) -> Result<FitnessReport> {
        let agent = self.orchestrator.agent(agent_id)?;
        let breakdown = (agent.state != AgentState::Terminated)
            .then(|| FitnessCalculator::breakdown(&agent.metrics));
        Ok(FitnessReport {
            agent_id: agent.id,
            state: agent.state,
            fitness: agent.fitness,
            breakdown,
            metrics: agent.metrics,
        })
    }

    pub fn evolve(&self) -> Result<EvolutionResult> {
        self.evolution.lock().evolve(&self.orchestrator)
    }

    /// Adapt on the hook tracker's queued outcomes plus any in `feedback`
    ///
    /// Runs one evolution cycle when adaptation recommends it and
    /// `evolve_on_adapt` is set. The adaptation stands even if that cycle
    /// fails; the failure is logged and `evolution` is `None`.
    pub fn adapt(&self, feedback: Feedback) -> Result<AdaptReport> {
        let mut outcomes = self.hooks.drain_outcomes();
        outcomes.extend(feedback.outcomes);
        let feedback = Feedback {
            outcomes,
            ..feedback
        };

        let mut evolution = self.evolution.lock();
        let adaptation = evolution.adapt_from(&self.orchestrator, &feedback);

        let evolution_result = if adaptation.evolution_recommended && self.evolve_on_adapt {
            info!(
                average_fitness = ?adaptation.average_fitness,
                "Adaptation triggered an evolution cycle"
            );
            match evolution.evolve(&self.orchestrator) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!(error = %e, "Evolution after adaptation failed");
                    None
                }
            }
        } else {
            None
        };

        Ok(AdaptReport {
            adaptation,
            outcomes_applied: feedback.outcomes.len(),
            evolution: evolution_result,
        })
    }

    pub fn environment(&self) -> EvolutionStats {
        self.evolution.lock().stats()
    }

    /// Prometheus text exposition of the attached registry
    pub fn metrics(&self) -> Result<String> {
        let registry = self
            .registry
            .as_ref()
            .ok_or_else(|| CogZeroError::Config("no metrics registry attached".into()))?;

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&registry.gather(), &mut buffer)
            .map_err(|e| CogZeroError::Internal(format!("metrics: {}", e)))?;
        String::from_utf8(buffer).map_err(|e| CogZeroError::Internal(format!("metrics: {}", e)))
    }

    pub fn register(&self, agent_id: Option<AgentId>, genome: Genome) -> Result<AgentId> {
        match agent_id {
            Some(id) => self.hooks.on_agent_init_as(id, genome),
            None => self.hooks.on_agent_init(genome),
        }
    }

    pub fn execute(&self, command: Command) -> Result<Response> {
        debug!(action = command.action(), "Executing command");

        let response = match command {
            Command::Status => Response::Status(self.status()),
            Command::Coordinate {
                task_description,
                num_agents,
            } => Response::Coordination(self.coordinate(&task_description, num_agents)?),
            Command::QueryAgents => Response::Agents(self.query_agents()),
            Command::Knowledge { node_type } => {
                Response::Knowledge(self.knowledge(node_type.as_deref()))
            }
            Command::Fitness { agent_id } => Response::Fitness(self.fitness(&agent_id)?),
            Command::Evolve => Response::Evolution(self.evolve()?),
            Command::Adapt {
                outcomes,
                avg_response_time,
                task_variety,
            } => Response::Adaptation(self.adapt(Feedback {
                outcomes,
                avg_response_time,
                task_variety,
            })?),
            Command::Environment => Response::Environment(self.environment()),
            Command::Metrics => Response::Metrics(self.metrics()?),
            Command::Register { agent_id, genome } => Response::Registered {
                agent_id: self.register(agent_id, genome)?,
            },
            Command::LoopStart { agent_id } => {
                self.hooks.on_start(&agent_id)?;
                Response::LoopStarted { agent_id }
            }
            Command::LoopEnd {
                agent_id,
                succeeded,
            } => {
                let elapsed_seconds = self.hooks.on_end(&agent_id, succeeded)?;
                Response::LoopEnded {
                    agent_id,
                    elapsed_seconds,
                }
            }
            Command::Unregister { agent_id } => {
                self.hooks.on_agent_terminate(&agent_id)?;
                Response::Unregistered { agent_id }
            }
        };
        Ok(response)
    }

    /// Handle one JSON command line; never fails
    ///
    /// Returns `{"ok": <response>}` or `{"error": "<message>"}`.
    pub fn respond(&self, line: &str) -> Value {
        let command: Command = match serde_json::from_str(line) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "Rejected malformed command");
                return json!({ "error": format!("invalid command: {}", e) });
            }
        };

        let action = command.action();
        match self.execute(command) {
            Ok(response) => match serde_json::to_value(&response) {
                Ok(value) => json!({ "ok": value }),
                Err(e) => json!({ "error": CogZeroError::from(e).to_string() }),
            },
            Err(e) => {
                warn!(action, error = %e, "Command failed");
                json!({ "error": e.to_string() })
            }
        }
    }
}

//! Prometheus metrics for the orchestrator
//!
//! Metrics are registered into a caller-supplied [`Registry`]; nothing is
//! installed globally.

use cogzero_common::{CogZeroError, Result};
use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};

/// Orchestrator counters and gauges
#[derive(Clone)]
pub struct OrchestratorMetrics {
    pub registrations: IntCounter,
    pub unregistrations: IntCounter,
    /// Task outcomes labelled `result="success"|"failure"`
    pub task_outcomes: IntCounterVec,
    pub coordinations: IntCounter,
    pub active_agents: IntGauge,
}

impl OrchestratorMetrics {
    /// Create metrics without registering them
    pub fn new() -> Result<Self> {
        Ok(Self {
            registrations: IntCounter::new(
                "cogzero_agent_registrations_total",
                "Agents registered with the orchestrator",
            )
            .map_err(prom_err)?,
            unregistrations: IntCounter::new(
                "cogzero_agent_unregistrations_total",
                "Agents terminated through unregistration",
            )
            .map_err(prom_err)?,
            task_outcomes: IntCounterVec::new(
                Opts::new("cogzero_task_outcomes_total", "Task outcomes recorded per result"),
                &["result"],
            )
            .map_err(prom_err)?,
            coordinations: IntCounter::new(
                "cogzero_coordinations_total",
                "Tasks coordinated across selected agents",
            )
            .map_err(prom_err)?,
            active_agents: IntGauge::new("cogzero_active_agents", "Agents currently active")
                .map_err(prom_err)?,
        })
    }

    /// Create metrics and register them into `registry`
    pub fn register(registry: &Registry) -> Result<Self> {
        let metrics = Self::new()?;
        registry
            .register(Box::new(metrics.registrations.clone()))
            .map_err(prom_err)?;
        registry
            .register(Box::new(metrics.unregistrations.clone()))
            .map_err(prom_err)?;
        registry
            .register(Box::new(metrics.task_outcomes.clone()))
            .map_err(prom_err)?;
        registry
            .register(Box::new(metrics.coordinations.clone()))
            .map_err(prom_err)?;
        registry
            .register(Box::new(metrics.active_agents.clone()))
            .map_err(prom_err)?;
        Ok(metrics)
    }

    pub(crate) fn record_outcome(&self, success: bool) {
        let label = if success { "success" } else { "failure" };
        self.task_outcomes.with_label_values(&[label]).inc();
    }
}

fn prom_err(err: prometheus::Error) -> CogZeroError {
    CogZeroError::Internal(format!("metrics: {}", err))
}

//! CogZero service configuration

use anyhow::Result;
use cogzero_darwinian::EvolutionaryConfig;
use cogzero_orchestrator::{OrchestratorConfig, DEFAULT_PENDING_OUTCOMES};
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CogZeroConfig {
    pub orchestrator: OrchestratorConfig,
    pub evolution: EvolutionaryConfig,
    pub service: ServiceSettings,
}

impl CogZeroConfig {
    /// Load from `.env`, an optional `cogzero.toml`, then `COGZERO__*` variables
    ///
    /// Nested keys use `__`, e.g. `COGZERO__EVOLUTION__POPULATION_SIZE=20`.
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("cogzero").required(false))
            .add_source(
                config::Environment::with_prefix("COGZERO")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(builder)
    }

    /// Build and validate from an assembled source stack
    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.evolution.validate()?;
        Ok(cfg)
    }
}

/// Command-surface settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Seed for the evolutionary RNG; entropy when unset
    pub seed: Option<u64>,
    /// Capacity of the hook tracker's pending-outcome buffer
    pub pending_outcomes: usize,
    /// Run one evolution cycle when `adapt` recommends it
    pub evolve_on_adapt: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            seed: None,
            pending_outcomes: DEFAULT_PENDING_OUTCOMES,
            evolve_on_adapt: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn test_defaults() {
        let cfg = CogZeroConfig::default();
        assert_eq!(cfg.orchestrator.max_agents, 10_000);
        assert_eq!(cfg.evolution.population_size, 10);
        assert_eq!(cfg.service.pending_outcomes, DEFAULT_PENDING_OUTCOMES);
        assert!(cfg.service.evolve_on_adapt);
    }

    #[test]
    fn test_toml_overrides_merge_with_defaults() {
        let toml = r#"
            [evolution]
            population_size = 20
            elite_size = 4

            [service]
            seed = 7
            evolve_on_adapt = false
        "#;
        let builder = config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        let cfg = CogZeroConfig::from_builder(builder).unwrap();

        assert_eq!(cfg.evolution.population_size, 20);
        assert_eq!(cfg.evolution.elite_size, 4);
        assert_eq!(cfg.evolution.tournament_size, 3);
        assert_eq!(cfg.service.seed, Some(7));
        assert!(!cfg.service.evolve_on_adapt);
        assert_eq!(cfg.orchestrator.max_agents, 10_000);
    }

    #[test]
    fn test_invalid_evolution_config_rejected() {
        let toml = r#"
            [evolution]
            population_size = 2
            elite_size = 3
        "#;
        let builder = config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        assert!(CogZeroConfig::from_builder(builder).is_err());
    }
}

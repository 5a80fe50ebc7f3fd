//! # CogZero Tool
//!
//! Host command surface over the orchestrator and the evolutionary system.
//!
//! ## Actions
//!
//! | Action | Effect |
//! |---|---|
//! | `status` | orchestrator statistics, uptime, generation |
//! | `coordinate` | assign the fittest agents to a new task |
//! | `query_agents` | snapshot of every registered agent |
//! | `knowledge` | knowledge-graph nodes, optionally by type |
//! | `fitness` | fitness breakdown of one agent |
//! | `evolve` | run and commit one generation cycle |
//! | `adapt` | fold outcomes into the environment, evolve if recommended |
//! | `environment` | environment state and evolution statistics |
//! | `metrics` | Prometheus text exposition |
//!
//! Lifecycle hooks (`register`, `loop_start`, `loop_end`, `unregister`)
//! ride on the same transport.

pub mod command;
pub mod config;
pub mod service;

pub use command::{AdaptReport, Command, FitnessReport, Response, StatusReport};
pub use config::{CogZeroConfig, ServiceSettings};
pub use service::CogZeroService;

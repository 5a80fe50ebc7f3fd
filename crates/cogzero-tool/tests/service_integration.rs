//! End-to-end tests of the command surface

use cogzero_common::{AgentId, Genome, NODE_TYPE_GENERATION, NODE_TYPE_TASK, RELATION_ASSIGNED};
use cogzero_darwinian::{ComplexityAdjustment, FitnessTrend};
use cogzero_orchestrator::AgentState;
use cogzero_tool::{CogZeroConfig, CogZeroService, Command, Response};
use std::sync::Arc;

fn service_with(configure: impl FnOnce(&mut CogZeroConfig)) -> CogZeroService {
    let mut config = CogZeroConfig::default();
    config.service.seed = Some(7);
    configure(&mut config);
    CogZeroService::new(&config).unwrap()
}

fn service() -> CogZeroService {
    service_with(|_| {})
}

fn genome() -> Genome {
    Genome::new()
        .with("temperature", 0.7)
        .with("max_steps", 8i64)
        .with("strategy", "greedy")
}

/// `n` agents; agent `i` has `i` successful tasks at 1s each
fn populate(svc: &CogZeroService, n: usize) -> Vec<AgentId> {
    let ids: Vec<AgentId> = (0..n).map(|_| svc.register(None, genome()).unwrap()).collect();
    for (i, id) in ids.iter().enumerate() {
        for _ in 0..i {
            svc.orchestrator().update_metrics(id, true, 1.0).unwrap();
        }
    }
    ids
}

#[test]
fn coordinate_assigns_fittest_agents() {
    let svc = service();
    let ids = populate(&svc, 5);

    let coordination = svc.coordinate("analyze feedback", 3).unwrap();
    assert_eq!(coordination.agents, vec![ids[4].clone(), ids[3].clone(), ids[2].clone()]);

    let tasks = svc.knowledge(Some(NODE_TYPE_TASK));
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, coordination.task_id.as_str());
    assert_eq!(tasks[0].properties["description"].as_str(), Some("analyze feedback"));
    assert_eq!(tasks[0].properties["num_agents"].as_i64(), Some(3));

    let edges = svc
        .orchestrator()
        .with_graph(|g| g.edges_from(coordination.task_id.as_str()));
    assert_eq!(edges.len(), 3);
    assert!(edges.iter().all(|e| e.relation == RELATION_ASSIGNED));

    let status = svc.status();
    assert_eq!(status.stats.total_agents, 5);
    assert_eq!(status.stats.total_tasks_processed, 10);
    assert_eq!(status.stats.graph_edge_count, 3);
}

#[test]
fn coordinate_with_too_few_agents_fails() {
    let svc = service();
    populate(&svc, 2);
    let err = svc.coordinate("too big", 3).unwrap_err();
    assert!(err.to_string().contains("requested 3, available 2"));
    assert!(svc.knowledge(Some(NODE_TYPE_TASK)).is_empty());
}

#[test]
fn hook_loop_feeds_metrics_and_adaptation() {
    let svc = service_with(|c| c.service.evolve_on_adapt = false);
    let id = svc.register(Some(AgentId::new("agent_0_ctx")), genome()).unwrap();

    for _ in 0..10 {
        svc.execute(Command::LoopStart { agent_id: id.clone() }).unwrap();
        svc.execute(Command::LoopEnd {
            agent_id: id.clone(),
            succeeded: true,
        })
        .unwrap();
    }
    assert_eq!(svc.hooks().pending_outcomes(), 10);

    let fitness = svc.fitness(&id).unwrap();
    assert_eq!(fitness.metrics.tasks_completed, 10);
    assert_eq!(fitness.breakdown.unwrap().success_rate, 1.0);

    let report = svc.adapt(Default::default()).unwrap();
    assert_eq!(report.outcomes_applied, 10);
    assert_eq!(report.adaptation.adjustment, ComplexityAdjustment::Increased);
    assert!(report.adaptation.environment.complexity > 0.5);
    assert!(!report.adaptation.evolution_recommended);
    assert!(report.evolution.is_none());
    assert_eq!(svc.hooks().pending_outcomes(), 0);
}

#[test]
fn loop_end_without_start_is_an_error() {
    let svc = service();
    let id = svc.register(None, genome()).unwrap();
    let err = svc
        .execute(Command::LoopEnd {
            agent_id: id,
            succeeded: true,
        })
        .unwrap_err();
    assert!(err.to_string().contains("Hook error"));
}

#[test]
fn loop_start_requires_live_agent() {
    let svc = service();
    for i in 0..1_000 {
        let agent_id = AgentId::new(format!("agent_ghost_{}", i));
        assert!(svc.execute(Command::LoopStart { agent_id }).is_err());
    }
    assert_eq!(svc.status().open_loops, 0);

    let id = svc.register(None, genome()).unwrap();
    svc.execute(Command::LoopStart { agent_id: id.clone() }).unwrap();
    svc.execute(Command::Unregister { agent_id: id.clone() }).unwrap();
    assert_eq!(svc.status().open_loops, 0);
    assert!(svc.execute(Command::LoopStart { agent_id: id }).is_err());
}

#[test]
fn adapt_runs_recommended_evolution() {
    let svc = service_with(|c| {
        c.evolution.population_size = 4;
        c.evolution.elite_size = 1;
    });
    // Fresh agents have fitness 0, below the default threshold
    for _ in 0..4 {
        svc.register(None, genome()).unwrap();
    }

    let report = svc.adapt(Default::default()).unwrap();
    assert!(report.adaptation.evolution_recommended);
    let evolution = report.evolution.expect("evolution should have run");
    assert_eq!(evolution.record.generation_number, 1);
    assert_eq!(evolution.applied.len(), 3);

    assert_eq!(svc.knowledge(Some(NODE_TYPE_GENERATION)).len(), 1);
    assert_eq!(svc.status().generation, 1);
}

#[test]
fn evolve_then_environment_stats() {
    let svc = service_with(|c| {
        c.evolution.population_size = 5;
        c.evolution.elite_size = 2;
    });
    let ids = populate(&svc, 5);

    assert!(svc.evolve().is_ok());
    for id in ids.iter().skip(1) {
        svc.orchestrator().update_metrics(id, true, 0.5).unwrap();
    }
    let second = svc.evolve().unwrap();
    assert_eq!(second.record.generation_number, 2);

    let stats = svc.environment();
    assert_eq!(stats.generation, 2);
    assert_eq!(stats.history_length, 2);
    assert_eq!(stats.trend, FitnessTrend::Improving);

    for agent in svc.query_agents() {
        assert_eq!(agent.state, AgentState::Active);
    }
}

#[test]
fn evolve_empty_population_fails() {
    let svc = service();
    let err = svc.evolve().unwrap_err();
    assert!(err.to_string().contains("empty population"));
    assert_eq!(svc.environment().generation, 0);
}

#[test]
fn unregistered_agent_stays_queryable() {
    let svc = service();
    let ids = populate(&svc, 3);

    let response = svc
        .execute(Command::Unregister {
            agent_id: ids[2].clone(),
        })
        .unwrap();
    assert!(matches!(response, Response::Unregistered { .. }));

    let fitness = svc.fitness(&ids[2]).unwrap();
    assert_eq!(fitness.state, AgentState::Terminated);
    assert_eq!(fitness.fitness, 0.0);
    assert!(fitness.breakdown.is_none());
    assert_eq!(fitness.metrics.tasks_completed, 2);
    assert_eq!(svc.status().stats.active_agents, 2);

    let agents = svc.query_agents();
    assert_eq!(agents.len(), 3);
    assert_eq!(agents[2].fitness, 0.0);
    assert!(agents[1].fitness > 0.0);

    // Selection only sees active agents
    let coordination = svc.coordinate("after unregister", 2).unwrap();
    assert!(!coordination.agents.contains(&ids[2]));
}

#[test]
fn json_lines_round_trip() {
    let svc = service();

    let reply = svc.respond(r#"{"action": "register", "agent_id": "agent_7", "genome": {"depth": 2}}"#);
    assert_eq!(reply["ok"]["kind"], "registered");
    assert_eq!(reply["ok"]["data"]["agent_id"], "agent_7");

    let reply = svc.respond(r#"{"action": "fitness", "agent_id": "agent_7"}"#);
    assert_eq!(reply["ok"]["data"]["fitness"], 0.0);

    let reply = svc.respond(r#"{"action": "fitness", "agent_id": "agent_404"}"#);
    assert!(reply["error"].as_str().unwrap().contains("agent_404"));

    let reply = svc.respond(r#"{"action": "knowledge", "node_type": "agent"}"#);
    assert_eq!(reply["ok"]["data"].as_array().unwrap().len(), 1);

    let reply = svc.respond(r#"{"action": "environment"}"#);
    assert_eq!(reply["ok"]["data"]["environment"]["complexity"], 0.5);
    assert_eq!(reply["ok"]["data"]["trend"], "unknown");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_hook_loops() {
    let svc = Arc::new(service());
    let ids = populate(&svc, 8);

    let mut handles = Vec::new();
    for id in ids.clone() {
        let svc = svc.clone();
        handles.push(tokio::spawn(async move {
            for round in 0..25 {
                svc.execute(Command::LoopStart { agent_id: id.clone() }).unwrap();
                svc.execute(Command::LoopEnd {
                    agent_id: id.clone(),
                    succeeded: round % 5 != 0,
                })
                .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let status = svc.status();
    // populate() recorded 0 + 1 + ... + 7 = 28 tasks up front
    assert_eq!(status.stats.total_tasks_processed, 28 + 8 * 25);
    assert_eq!(status.open_loops, 0);
    assert_eq!(status.pending_outcomes, 8 * 25);

    let report = svc.adapt(Default::default()).unwrap();
    assert_eq!(report.outcomes_applied, 8 * 25);
    // The window keeps only the most recent outcomes
    assert!(report.adaptation.observed_success_rate.is_some());
}

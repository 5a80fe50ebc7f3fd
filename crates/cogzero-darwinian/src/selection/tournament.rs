//! Tournament selection: best of `k` distinct random agents

use cogzero_common::EvolutionError;
use cogzero_orchestrator::Candidate;
use rand::seq::index;
use rand::Rng;

/// Sample `k` distinct candidates and return the fittest.
///
/// `k` is capped at the population size. Ties go to the candidate sampled
/// first.
pub fn tournament_select<'a, R: Rng + ?Sized>(
    population: &'a [Candidate],
    k: usize,
    rng: &mut R,
) -> Result<&'a Candidate, EvolutionError> {
    if population.is_empty() {
        return Err(EvolutionError::EmptyPopulation);
    }

    let amount = k.clamp(1, population.len());
    let mut winner: Option<&Candidate> = None;
    for i in index::sample(rng, population.len(), amount).iter() {
        let contender = &population[i];
        match winner {
            Some(best) if contender.fitness <= best.fitness => {}
            _ => winner = Some(contender),
        }
    }

    winner.ok_or(EvolutionError::EmptyPopulation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cogzero_common::{AgentId, Genome};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population(fitness: &[f64]) -> Vec<Candidate> {
        fitness
            .iter()
            .enumerate()
            .map(|(i, f)| Candidate {
                id: AgentId::new(format!("a{}", i)),
                fitness: *f,
                genome: Genome::new(),
                created_at: Utc::now(),
                seq: i as u64,
            })
            .collect()
    }

    #[test]
    fn test_empty_population_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            tournament_select(&[], 3, &mut rng).unwrap_err(),
            EvolutionError::EmptyPopulation
        );
    }

    #[test]
    fn test_full_tournament_picks_best() {
        let pop = population(&[0.2, 0.9, 0.4, 0.1]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let winner = tournament_select(&pop, 4, &mut rng).unwrap();
            assert_eq!(winner.id.as_str(), "a1");
        }
    }

    #[test]
    fn test_k_capped_at_population() {
        let pop = population(&[0.3, 0.6]);
        let mut rng = StdRng::seed_from_u64(3);
        let winner = tournament_select(&pop, 10, &mut rng).unwrap();
        assert_eq!(winner.id.as_str(), "a1");
    }

    #[test]
    fn test_ties_go_to_first_sampled() {
        let pop = population(&[0.5; 8]);
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let first = index::sample(&mut rng.clone(), pop.len(), 3).index(0);

            let winner = tournament_select(&pop, 3, &mut rng).unwrap();
            assert_eq!(winner.id, pop[first].id, "seed {}", seed);
        }
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let pop = population(&[0.1, 0.5, 0.3, 0.8, 0.2, 0.7]);
        let pick = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| tournament_select(&pop, 2, &mut rng).unwrap().id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(pick(42), pick(42));
    }

    #[test]
    fn test_single_sample_is_uniform_pick() {
        // With k = 1 every candidate can win, including the weakest
        let pop = population(&[0.9, 0.0]);
        let mut rng = StdRng::seed_from_u64(11);
        let weakest_won = (0..200)
            .any(|_| tournament_select(&pop, 1, &mut rng).unwrap().id.as_str() == "a1");
        assert!(weakest_won);
    }
}

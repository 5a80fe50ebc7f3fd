//! Mutation: bounded random perturbation of numeric genes
//!
//! - `Int`: ±1, floored at 1
//! - `Float`: ±`scale`·|value|, floored at 0.0
//! - anything else passes through

use cogzero_common::{GeneValue, Genome};
use rand::Rng;

/// Perturb each numeric gene independently with probability `rate`
pub fn mutate<R: Rng + ?Sized>(genome: &Genome, rate: f64, scale: f64, rng: &mut R) -> Genome {
    genome
        .iter()
        .map(|(name, value)| {
            let value = match value {
                GeneValue::Int(v) if rng.gen::<f64>() < rate => {
                    let delta = if rng.gen_bool(0.5) { 1 } else { -1 };
                    GeneValue::Int(v.saturating_add(delta).max(1))
                }
                GeneValue::Float(v) if v.is_finite() && rng.gen::<f64>() < rate => {
                    let delta = v.abs() * rng.gen_range(-scale..=scale);
                    GeneValue::Float((v + delta).max(0.0))
                }
                other => other.clone(),
            };
            (name.clone(), value)
        })
        .collect()
}

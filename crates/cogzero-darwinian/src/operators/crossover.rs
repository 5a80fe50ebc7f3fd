//! Uniform crossover between two parent genomes

use cogzero_common::Genome;
use rand::Rng;

/// With probability `rate` draw each gene from a random parent; otherwise copy `a`.
///
/// The child always has exactly `a`'s gene names. Genes missing from `b`
/// come from `a`.
pub fn crossover<R: Rng + ?Sized>(a: &Genome, b: &Genome, rate: f64, rng: &mut R) -> Genome {
    if rng.gen::<f64>() >= rate {
        return a.clone();
    }

    a.iter()
        .map(|(name, value)| {
            let chosen = match b.get(name) {
                Some(other) if rng.gen_bool(0.5) => other,
                _ => value,
            };
            (name.clone(), chosen.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogzero_common::GeneValue;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parents() -> (Genome, Genome) {
        let a = (0..16).fold(Genome::new(), |g, i| g.with(format!("g{}", i), 0i64));
        let b = (0..16).fold(Genome::new(), |g, i| g.with(format!("g{}", i), 1i64));
        (a, b)
    }

    #[test]
    fn test_zero_rate_copies_first_parent() {
        let (a, b) = parents();
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(crossover(&a, &b, 0.0, &mut rng), a);
    }

    #[test]
    fn test_full_rate_mixes_parents() {
        let (a, b) = parents();
        let mut rng = StdRng::seed_from_u64(5);
        let child = crossover(&a, &b, 1.0, &mut rng);

        let from_b = child
            .iter()
            .filter(|(_, v)| **v == GeneValue::Int(1))
            .count();
        assert_eq!(child.len(), 16);
        // 16 fair coin flips all landing the same way has odds 2^-15
        assert!(from_b > 0 && from_b < 16);
    }

    #[test]
    fn test_genes_only_in_first_parent_kept() {
        let a = Genome::new().with("shared", 1.0).with("only_a", "x");
        let b = Genome::new().with("shared", 2.0).with("only_b", 3i64);
        let mut rng = StdRng::seed_from_u64(6);
        let child = crossover(&a, &b, 1.0, &mut rng);

        assert_eq!(child.get("only_a"), Some(&GeneValue::Text("x".into())));
        assert!(child.get("only_b").is_none());
        assert!(child.get("shared").is_some());
    }
}

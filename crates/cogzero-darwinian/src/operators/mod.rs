//! Genetic operators over agent genomes
pub mod crossover;
pub mod mutation;

pub use self::crossover::crossover;
pub use self::mutation::mutate;

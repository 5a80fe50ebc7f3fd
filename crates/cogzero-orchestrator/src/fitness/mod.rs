//! Fitness scoring
pub mod calculator;

pub use self::calculator::{FitnessBreakdown, FitnessCalculator};

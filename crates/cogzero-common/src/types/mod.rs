//! Core data types for CogZero

pub mod genome;
pub mod ids;
pub mod property;

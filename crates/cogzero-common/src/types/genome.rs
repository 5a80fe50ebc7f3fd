//! Genome - named parameters evolved per agent
//!
//! The engine treats genomes as opaque beyond their numeric bounds: only
//! [`GeneValue::Int`] and [`GeneValue::Float`] are mutated, everything else
//! passes through generations unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single genome parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl GeneValue {
    /// Whether mutation applies to this gene
    pub fn is_numeric(&self) -> bool {
        matches!(self, GeneValue::Int(_) | GeneValue::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GeneValue::Int(v) => Some(*v as f64),
            GeneValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i64> for GeneValue {
    fn from(v: i64) -> Self {
        GeneValue::Int(v)
    }
}

impl From<f64> for GeneValue {
    fn from(v: f64) -> Self {
        GeneValue::Float(v)
    }
}

impl From<bool> for GeneValue {
    fn from(v: bool) -> Self {
        GeneValue::Bool(v)
    }
}

impl From<&str> for GeneValue {
    fn from(v: &str) -> Self {
        GeneValue::Text(v.to_string())
    }
}

/// Agent genome: parameter name to value, iterated in name order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome(BTreeMap<String, GeneValue>);

impl Genome {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<GeneValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<GeneValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&GeneValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &GeneValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of mutable (numeric) parameters
    pub fn numeric_len(&self) -> usize {
        self.0.values().filter(|v| v.is_numeric()).count()
    }
}

impl FromIterator<(String, GeneValue)> for Genome {
    fn from_iter<I: IntoIterator<Item = (String, GeneValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

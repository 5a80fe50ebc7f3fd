//! Knowledge graph module
pub mod knowledge_graph;

pub use self::knowledge_graph::{Edge, KnowledgeGraph, Node};

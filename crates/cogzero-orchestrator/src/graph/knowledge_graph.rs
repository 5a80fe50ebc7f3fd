//! Knowledge graph storage
//!
//! Append-mostly store of typed nodes and directed relationship edges.
//! Node ids are unique; edges are never updated and always reference
//! existing nodes. Node properties can be merged but never removed.

use chrono::{DateTime, Utc};
use cogzero_common::{GraphError, PropertyMap};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A typed node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub node_type: String,
    pub properties: PropertyMap,
    pub created_at: DateTime<Utc>,
}

/// A directed relationship between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub relation: String,
    pub created_at: DateTime<Utc>,
}

/// In-memory knowledge graph
///
/// Not synchronized on its own; the orchestrator keeps it behind the same
/// lock as the agent registry.
#[derive(Debug, Default)]
pub struct KnowledgeGraph {
    /// Nodes by id
    nodes: HashMap<String, Node>,
    /// Node ids by type, in insertion order
    by_type: HashMap<String, Vec<String>>,
    /// All node ids in insertion order
    order: Vec<String>,
    /// Edges in insertion order
    edges: Vec<Edge>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; fails if the id already exists
    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        node_type: impl Into<String>,
        properties: PropertyMap,
    ) -> Result<Node, GraphError> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }

        let node = Node {
            id: id.clone(),
            node_type: node_type.into(),
            properties,
            created_at: Utc::now(),
        };

        self.by_type
            .entry(node.node_type.clone())
            .or_default()
            .push(id.clone());
        self.order.push(id.clone());
        self.nodes.insert(id, node.clone());

        Ok(node)
    }

    /// Add a directed edge; both endpoints must exist
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        relation: impl Into<String>,
    ) -> Result<Edge, GraphError> {
        for endpoint in [source, target] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphError::UnknownNode(endpoint.to_string()));
            }
        }

        let edge = Edge {
            source: source.to_string(),
            target: target.to_string(),
            relation: relation.into(),
            created_at: Utc::now(),
        };
        self.edges.push(edge.clone());
        Ok(edge)
    }

    /// Merge properties into an existing node (insert or overwrite keys)
    pub fn merge_properties(&mut self, id: &str, properties: PropertyMap) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;
        node.properties.extend(properties);
        Ok(())
    }

    /// Nodes of a type, in insertion order
    pub fn query_by_type(&self, node_type: &str) -> Vec<Node> {
        self.by_type
            .get(node_type)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.nodes.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn query_by_id(&self, id: &str) -> Result<Node, GraphError> {
        self.nodes
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> Vec<Node> {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id).cloned())
            .collect()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_from(&self, id: &str) -> Vec<Edge> {
        self.edges.iter().filter(|e| e.source == id).cloned().collect()
    }

    pub fn edges_to(&self, id: &str) -> Vec<Edge> {
        self.edges.iter().filter(|e| e.target == id).cloned().collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogzero_common::PropertyValue;

    fn props(pairs: &[(&str, PropertyValue)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_add_and_query_nodes() {
        let mut graph = KnowledgeGraph::new();
        graph.add_node("a1", "agent", PropertyMap::new()).unwrap();
        graph.add_node("t1", "task", PropertyMap::new()).unwrap();
        graph.add_node("a2", "agent", PropertyMap::new()).unwrap();

        let agents = graph.query_by_type("agent");
        let ids: Vec<_> = agents.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
        assert_eq!(graph.query_by_type("task").len(), 1);
        assert!(graph.query_by_type("concept").is_empty());
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut graph = KnowledgeGraph::new();
        graph.add_node("a1", "agent", PropertyMap::new()).unwrap();
        let err = graph.add_node("a1", "task", PropertyMap::new()).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNode("a1".into()));
        // Original node untouched
        assert_eq!(graph.query_by_id("a1").unwrap().node_type, "agent");
    }

    #[test]
    fn test_edge_requires_endpoints() {
        let mut graph = KnowledgeGraph::new();
        graph.add_node("t1", "task", PropertyMap::new()).unwrap();

        let err = graph.add_edge("t1", "missing", "assigned").unwrap_err();
        assert_eq!(err, GraphError::UnknownNode("missing".into()));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_parallel_edges_with_different_relations() {
        let mut graph = KnowledgeGraph::new();
        graph.add_node("g1", "generation", PropertyMap::new()).unwrap();
        graph.add_node("a1", "agent", PropertyMap::new()).unwrap();
        graph.add_edge("g1", "a1", "preserved").unwrap();
        graph.add_edge("g1", "a1", "evolved").unwrap();

        assert_eq!(graph.edges_from("g1").len(), 2);
        assert_eq!(graph.edges_to("a1").len(), 2);
        assert!(graph.edges_from("a1").is_empty());
    }

    #[test]
    fn test_merge_properties() {
        let mut graph = KnowledgeGraph::new();
        graph
            .add_node("a1", "agent", props(&[("state", "active".into()), ("rank", 1i64.into())]))
            .unwrap();
        graph
            .merge_properties("a1", props(&[("state", "terminated".into())]))
            .unwrap();

        let node = graph.query_by_id("a1").unwrap();
        assert_eq!(node.properties["state"].as_str(), Some("terminated"));
        assert_eq!(node.properties["rank"].as_i64(), Some(1));

        assert!(matches!(
            graph.merge_properties("nope", PropertyMap::new()),
            Err(GraphError::NotFound(_))
        ));
    }
}

use std::collections::HashMap;

use extract::DocumentGraph;

use crate::ComponentConfig;

/// Undirected view of a document graph restricted to a tag/relation filter.
#[derive(Debug, Clone)]
pub struct FilteredGraph {
    pub nodes: Vec<usize>,          // segment ordinals, ascending
    pub edges: Vec<(usize, usize)>, // (node_idx, node_idx)
    pub ordinal_to_idx: HashMap<usize, usize>,
}

impl FilteredGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            ordinal_to_idx: HashMap::new(),
        }
    }

    pub fn add_node(&mut self, ordinal: usize) -> usize {
        if let Some(&idx) = self.ordinal_to_idx.get(&ordinal) {
            return idx;
        }

        let idx = self.nodes.len();
        self.nodes.push(ordinal);
        self.ordinal_to_idx.insert(ordinal, idx);
        idx
    }

    pub fn add_edge(&mut self, source: usize, target: usize) {
        self.edges.push((source, target));
    }

    /// Keep segments whose tag passes the filter, and relations whose kind
    /// passes it with both endpoints kept.
    pub fn from_document(graph: &DocumentGraph, config: &ComponentConfig) -> Self {
        let mut filtered = Self::new();

        for segment in &graph.segments {
            if config.accepts_tag(segment.tag) {
                filtered.add_node(segment.ordinal);
            }
        }

        for relation in &graph.relations {
            if !config.accepts_relation(relation.kind) {
                continue;
            }
            let source = filtered.ordinal_to_idx.get(&relation.source).copied();
            let target = filtered.ordinal_to_idx.get(&relation.target).copied();
            if let (Some(source), Some(target)) = (source, target) {
                filtered.add_edge(source, target);
            }
        }

        filtered
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for FilteredGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::{Outcome, RelationKind, Tag};

    #[test]
    fn test_filter_drops_foreign_endpoints() {
        let mut graph = DocumentGraph::new("doc", Outcome::Rejected);
        graph.add_segment(Tag::Req, "r".to_string(), None);
        graph.add_segment(Tag::Fact, "f".to_string(), None);
        graph.add_segment(Tag::Arg, "a".to_string(), None);
        graph.add_relation(0, 1, RelationKind::Next);
        graph.add_relation(1, 2, RelationKind::Next);
        graph.add_relation(2, 0, RelationKind::Support);

        let config = ComponentConfig::new([Tag::Req, Tag::Arg], [RelationKind::Next]);
        let filtered = FilteredGraph::from_document(&graph, &config);

        assert_eq!(filtered.nodes, vec![0, 2]);
        assert!(filtered.edges.is_empty());
    }
}

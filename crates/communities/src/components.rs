use petgraph::unionfind::UnionFind;
use std::collections::HashMap;

use crate::filtered::FilteredGraph;

pub struct ComponentDetector {
    graph: FilteredGraph,
}

impl ComponentDetector {
    pub fn new(graph: FilteredGraph) -> Self {
        Self { graph }
    }

    /// Group the filtered segments into connected components.
    /// Returns segment ordinals per component: members ascending, components
    /// ordered by their smallest member.
    pub fn detect_components(&self) -> Vec<Vec<usize>> {
        let n = self.graph.len();

        if n == 0 {
            return Vec::new();
        }

        // Edge direction is irrelevant for reachability here
        let mut sets: UnionFind<usize> = UnionFind::new(n);
        for &(source, target) in &self.graph.edges {
            sets.union(source, target);
        }
        let labels = sets.into_labeling();

        // Nodes are stored in ascending ordinal order, so the first time a
        // label shows up is at its component's smallest member
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut label_to_group: HashMap<usize, usize> = HashMap::new();
        for (idx, &label) in labels.iter().enumerate() {
            let group = *label_to_group.entry(label).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[group].push(self.graph.nodes[idx]);
        }

        tracing::debug!(nodes = n, components = groups.len(), "Detected connected components");
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with(nodes: &[usize], edges: &[(usize, usize)]) -> FilteredGraph {
        let mut graph = FilteredGraph::new();
        for &ordinal in nodes {
            graph.add_node(ordinal);
        }
        for &(source, target) in edges {
            graph.add_edge(source, target);
        }
        graph
    }

    #[test]
    fn test_two_components() {
        // 0-1 and 2-3 with the edge stored target-first
        let graph = graph_with(&[0, 1, 2, 3], &[(0, 1), (3, 2)]);
        let components = ComponentDetector::new(graph).detect_components();

        assert_eq!(components, vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_interleaved_members_stay_sorted() {
        // Ordinals 1, 4, 6 are kept; 4 links back to 1
        let graph = graph_with(&[1, 4, 6], &[(1, 0)]);
        let components = ComponentDetector::new(graph).detect_components();

        assert_eq!(components, vec![vec![1, 4], vec![6]]);
    }

    #[test]
    fn test_empty_graph() {
        let components = ComponentDetector::new(FilteredGraph::new()).detect_components();
        assert!(components.is_empty());
    }
}

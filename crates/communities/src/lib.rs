//! Contraction of segment graphs into connected components.

pub mod components;
pub mod filtered;
pub mod merge;

pub use components::ComponentDetector;
pub use filtered::FilteredGraph;
pub use merge::{Component, ContractedGraph};

use extract::{DocumentGraph, RelationKind, Tag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_DELIMITER: &str = "\n";

/// Which segments may be merged, and along which relations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    pub tags: BTreeSet<Tag>,
    pub relations: BTreeSet<RelationKind>,
}

impl ComponentConfig {
    pub fn new(
        tags: impl IntoIterator<Item = Tag>,
        relations: impl IntoIterator<Item = RelationKind>,
    ) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            relations: relations.into_iter().collect(),
        }
    }

    /// Contraction with an empty tag or relation set changes nothing
    pub fn is_identity(&self) -> bool {
        self.tags.is_empty() || self.relations.is_empty()
    }

    pub fn accepts_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn accepts_relation(&self, kind: RelationKind) -> bool {
        self.relations.contains(&kind)
    }
}

pub struct Contractor {
    config: ComponentConfig,
    delimiter: String,
}

impl Contractor {
    pub fn new(config: ComponentConfig, delimiter: impl Into<String>) -> Self {
        Self {
            config,
            delimiter: delimiter.into(),
        }
    }

    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    /// Merge the segments of `graph` that are connected under the filter.
    ///
    /// Segments outside the tag filter stay as singleton nodes. The node
    /// list is ordered by each node's smallest segment ordinal.
    pub fn contract(&self, graph: DocumentGraph) -> ContractedGraph {
        if self.config.is_identity() {
            return ContractedGraph::identity(graph, &self.delimiter);
        }

        // Step 1: Restrict to the filtered subgraph
        let filtered = FilteredGraph::from_document(&graph, &self.config);

        // Step 2: Find components
        let groups = ComponentDetector::new(filtered).detect_components();

        // Step 3: Merge texts, keep untouched segments alongside
        let mut nodes: Vec<Component> = groups
            .into_iter()
            .map(|members| Component::from_members(&graph, members, true, &self.delimiter))
            .collect();
        nodes.extend(
            graph
                .segments
                .iter()
                .filter(|s| !self.config.accepts_tag(s.tag))
                .map(|s| Component::from_members(&graph, vec![s.ordinal], false, &self.delimiter)),
        );
        nodes.sort_by_key(Component::first_ordinal);

        tracing::debug!(
            doc_id = %graph.doc_id,
            segments = graph.len(),
            nodes = nodes.len(),
            "Contracted document graph"
        );

        ContractedGraph {
            graph,
            nodes,
            contracted: true,
            delimiter: self.delimiter.clone(),
        }
    }
}

impl Default for Contractor {
    fn default() -> Self {
        Self::new(ComponentConfig::default(), DEFAULT_DELIMITER)
    }
}

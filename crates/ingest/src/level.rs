use communities::{Component, ComponentConfig, ContractedGraph};
use extract::Tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::row::{Row, RowContent};

/// Granularity of the output rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Document,
    Segment,
    ConnectedComponents,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Document, Level::Segment, Level::ConnectedComponents];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Document => "document",
            Level::Segment => "segment",
            Level::ConnectedComponents => "connected_components",
        }
    }

    /// Check that the component configuration can serve this level
    pub fn validate(&self, components: &ComponentConfig) -> Result<(), ConfigurationError> {
        if *self != Level::ConnectedComponents {
            return Ok(());
        }
        if components.tags.is_empty() {
            return Err(ConfigurationError::MissingComponentTags);
        }
        if components.relations.is_empty() {
            return Err(ConfigurationError::MissingEdgeRelations);
        }
        Ok(())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ConfigurationError;

    /// Accepts `CONNECTED_COMPONENTS`, `connected-components`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == wanted)
            .ok_or_else(|| ConfigurationError::UnknownLevel(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown level {0:?} (expected document, segment or connected_components)")]
    UnknownLevel(String),

    #[error("level connected_components requires at least one connected-component tag")]
    MissingComponentTags,

    #[error("level connected_components requires at least one edge relation")]
    MissingEdgeRelations,

    #[error("level connected_components needs a contracted graph for document {0:?}")]
    Uncontracted(String),

    #[error("no input folders given")]
    NoInputFolders,

    #[error("document file extension must not be empty")]
    EmptyExtension,
}

/// Flatten one (possibly contracted) document into rows.
pub fn select_rows(
    level: Level,
    contracted: &ContractedGraph,
) -> Result<Vec<Row>, ConfigurationError> {
    let graph = &contracted.graph;

    let rows = match level {
        Level::Document => {
            let ordinals = (0..graph.len()).collect();
            let whole = Component::from_members(graph, ordinals, false, &contracted.delimiter);
            let content = RowContent {
                position: None,
                tag: None,
                tags: None,
                segment_count: whole.members.len() as u32,
                tag_texts: tag_texts(contracted, &whole),
                text: whole.text,
            };
            vec![Row::new(graph.doc_id.clone(), level, graph.outcome, content)]
        }
        Level::Segment => contracted
            .nodes
            .iter()
            .map(|node| node_row(contracted, node, level))
            .collect(),
        Level::ConnectedComponents => {
            if !contracted.contracted {
                return Err(ConfigurationError::Uncontracted(graph.doc_id.clone()));
            }
            contracted
                .components()
                .map(|node| node_row(contracted, node, level))
                .collect()
        }
    };

    Ok(rows)
}

fn node_row(contracted: &ContractedGraph, node: &Component, level: Level) -> Row {
    let content = RowContent {
        position: Some(node.first_ordinal() as u32),
        tag: node.single_tag(),
        tags: Some(node.tags.clone()),
        segment_count: node.members.len() as u32,
        text: node.text.clone(),
        tag_texts: tag_texts(contracted, node),
    };
    Row::new(contracted.graph.doc_id.clone(), level, contracted.graph.outcome, content)
}

fn tag_texts(contracted: &ContractedGraph, node: &Component) -> BTreeMap<Tag, String> {
    node.tags
        .iter()
        .filter_map(|&tag| contracted.tag_text(node, tag).map(|text| (tag, text)))
        .collect()
}

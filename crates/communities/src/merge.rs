use serde::Serialize;

use extract::{DocumentGraph, Tag};

/// A node of the contracted graph: one or more segments merged together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    /// Segment ordinals, ascending
    pub members: Vec<usize>,
    /// Distinct member tags, sorted
    pub tags: Vec<Tag>,
    pub text: String,
    /// `true` when the node came out of the tag/relation filter
    pub grouped: bool,
}

impl Component {
    pub fn from_members(
        graph: &DocumentGraph,
        members: Vec<usize>,
        grouped: bool,
        delimiter: &str,
    ) -> Self {
        let mut tags: Vec<Tag> = members.iter().map(|&m| graph.segments[m].tag).collect();
        tags.sort();
        tags.dedup();

        let text = members
            .iter()
            .map(|&m| graph.segments[m].text.as_str())
            .collect::<Vec<_>>()
            .join(delimiter);

        Self {
            members,
            tags,
            text,
            grouped,
        }
    }

    pub fn first_ordinal(&self) -> usize {
        self.members[0]
    }

    pub fn single_tag(&self) -> Option<Tag> {
        match self.tags.as_slice() {
            [tag] => Some(*tag),
            _ => None,
        }
    }

    /// Join the texts of the members carrying `tag`, in ordinal order
    pub fn tag_text(&self, graph: &DocumentGraph, tag: Tag, delimiter: &str) -> Option<String> {
        let texts: Vec<&str> = self
            .members
            .iter()
            .map(|&m| &graph.segments[m])
            .filter(|s| s.tag == tag)
            .map(|s| s.text.as_str())
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.join(delimiter))
        }
    }
}

/// A document graph together with its contracted node list.
#[derive(Debug, Clone)]
pub struct ContractedGraph {
    pub graph: DocumentGraph,
    pub nodes: Vec<Component>,
    /// `false` when the contraction was the identity
    pub contracted: bool,
    pub delimiter: String,
}

impl ContractedGraph {
    /// Every segment as its own singleton node
    pub fn identity(graph: DocumentGraph, delimiter: &str) -> Self {
        let nodes = (0..graph.len())
            .map(|ordinal| Component::from_members(&graph, vec![ordinal], false, delimiter))
            .collect();

        Self {
            graph,
            nodes,
            contracted: false,
            delimiter: delimiter.to_string(),
        }
    }

    pub fn doc_id(&self) -> &str {
        &self.graph.doc_id
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.nodes.iter().filter(|node| node.grouped)
    }

    pub fn tag_text(&self, node: &Component, tag: Tag) -> Option<String> {
        node.tag_text(&self.graph, tag, &self.delimiter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract::Outcome;

    #[test]
    fn test_component_text_and_tags() {
        let mut graph = DocumentGraph::new("doc", Outcome::Upheld);
        graph.add_segment(Tag::Mot, "m1".to_string(), None);
        graph.add_segment(Tag::Arg, "a1".to_string(), None);
        graph.add_segment(Tag::Mot, "m2".to_string(), None);

        let component = Component::from_members(&graph, vec![0, 1, 2], true, " | ");

        assert_eq!(component.text, "m1 | a1 | m2");
        assert_eq!(component.tags, vec![Tag::Arg, Tag::Mot]);
        assert_eq!(component.single_tag(), None);
        assert_eq!(component.tag_text(&graph, Tag::Mot, " | ").as_deref(), Some("m1 | m2"));
        assert_eq!(component.tag_text(&graph, Tag::Dec, " | "), None);
    }

    #[test]
    fn test_identity_keeps_every_segment() {
        let mut graph = DocumentGraph::new("doc", Outcome::Upheld);
        graph.add_segment(Tag::Req, "r".to_string(), None);
        graph.add_segment(Tag::Dec, "d".to_string(), None);

        let contracted = ContractedGraph::identity(graph, "\n");

        assert!(!contracted.contracted);
        assert_eq!(contracted.nodes.len(), 2);
        assert_eq!(contracted.nodes[1].single_tag(), Some(Tag::Dec));
        assert_eq!(contracted.components().count(), 0);
    }
}

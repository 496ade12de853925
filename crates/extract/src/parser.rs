use roxmltree::{Node, ParsingOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::normalizer::TextNormalizer;
use crate::schema::{DocumentGraph, Outcome, RelationKind, Tag};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed markup: {0}")]
    Markup(#[from] roxmltree::Error),

    #[error("required tag <{0}> is missing")]
    MissingTag(Tag),

    #[error("duplicate segment ID {0:?}")]
    DuplicateId(String),

    #[error("{attribute} references unknown segment ID {id:?}")]
    UnknownReference { attribute: &'static str, id: String },

    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Deepest element nesting accepted before the markup is handed to the DOM
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Tags every document must contain at least once
    pub required_tags: Vec<Tag>,
    pub normalize_whitespace: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            required_tags: vec![Tag::Req, Tag::Arg, Tag::Claim, Tag::Mot, Tag::Dec],
            normalize_whitespace: false,
        }
    }
}

/// Cross references are resolved once every `ID` in the document is known.
struct PendingReference {
    source: usize,
    kind: RelationKind,
    attribute: &'static str,
    target_id: String,
}

#[derive(Default)]
struct ParseState {
    tags: Vec<Tag>,
    texts: Vec<String>,
    markup_ids: Vec<Option<String>>,
    ids: HashMap<String, usize>,
    contains: Vec<(usize, usize)>,
    references: Vec<PendingReference>,
    decisions: Vec<Outcome>,
}

pub struct DocumentParser {
    config: ParserConfig,
    normalizer: TextNormalizer,
}

impl DocumentParser {
    pub fn new(config: ParserConfig) -> Self {
        let normalizer = TextNormalizer::new(config.normalize_whitespace);
        Self { config, normalizer }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse one judgement into its segment graph.
    ///
    /// Elements named after a [`Tag`] become segments, numbered in the
    /// order their opening tags appear. Any other element is transparent:
    /// its text belongs to the nearest enclosing segment. Text outside every
    /// segment is dropped.
    pub fn parse(&self, doc_id: &str, markup: &str) -> Result<DocumentGraph, ParseError> {
        check_nesting(markup, MAX_DEPTH)?;

        // Judgements may carry a DOCTYPE; external subsets are never fetched
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document = roxmltree::Document::parse_with_options(markup, options)?;

        let mut state = ParseState::default();
        walk(document.root_element(), &mut state)?;

        let outcome = Outcome::combine(state.decisions.iter().copied());
        let mut graph = DocumentGraph::new(doc_id, outcome);

        for ((tag, text), markup_id) in state
            .tags
            .into_iter()
            .zip(state.texts)
            .zip(state.markup_ids)
        {
            graph.add_segment(tag, self.normalizer.normalize(&text), markup_id);
        }

        for (parent, child) in state.contains {
            graph.add_relation(parent, child, RelationKind::Contains);
        }
        for ordinal in 1..graph.len() {
            graph.add_relation(ordinal - 1, ordinal, RelationKind::Next);
        }
        for reference in state.references {
            let target = state
                .ids
                .get(&reference.target_id)
                .copied()
                .ok_or(ParseError::UnknownReference {
                    attribute: reference.attribute,
                    id: reference.target_id,
                })?;
            graph.add_relation(reference.source, target, reference.kind);
        }

        for &tag in &self.config.required_tags {
            if !graph.has_tag(tag) {
                return Err(ParseError::MissingTag(tag));
            }
        }

        debug!(
            doc_id,
            segments = graph.len(),
            relations = graph.relations.len(),
            outcome = graph.outcome.as_str(),
            "Parsed document"
        );
        Ok(graph)
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

/// Depth-first, in document order, without recursion.
fn walk(root: Node<'_, '_>, state: &mut ParseState) -> Result<(), ParseError> {
    let mut stack: Vec<(Node<'_, '_>, Option<usize>)> = vec![(root, None)];

    while let Some((node, enclosing)) = stack.pop() {
        if node.is_text() {
            if let (Some(ordinal), Some(text)) = (enclosing, node.text()) {
                state.texts[ordinal].push_str(text);
            }
            continue;
        }
        if !node.is_element() {
            continue;
        }

        let current = match Tag::from_element_name(node.tag_name().name()) {
            Some(tag) => {
                let ordinal = open_segment(node, tag, state)?;
                if let Some(parent) = enclosing {
                    state.contains.push((parent, ordinal));
                }
                Some(ordinal)
            }
            None => enclosing,
        };

        for child in node.children().rev() {
            stack.push((child, current));
        }
    }

    Ok(())
}

/// Reject markup whose element nesting exceeds `limit`.
///
/// Only counts tags; well-formedness is left to the DOM parser.
fn check_nesting(markup: &str, limit: usize) -> Result<(), ParseError> {
    let mut depth = 0usize;
    let mut rest = markup;

    while let Some(start) = rest.find('<') {
        rest = &rest[start..];

        let skip = if rest.starts_with("<!--") {
            skip_past(rest, "-->")
        } else if rest.starts_with("<![CDATA[") {
            skip_past(rest, "]]>")
        } else if rest.starts_with("<?") {
            skip_past(rest, "?>")
        } else if rest.starts_with("<!") {
            declaration_end(rest)
        } else if rest.starts_with("</") {
            depth = depth.saturating_sub(1);
            skip_past(rest, ">")
        } else {
            let end = start_tag_end(rest);
            if !rest[..end].ends_with("/>") {
                depth += 1;
                if depth > limit {
                    return Err(ParseError::TooDeep(limit));
                }
            }
            end
        };

        rest = &rest[skip..];
    }

    Ok(())
}

fn skip_past(text: &str, terminator: &str) -> usize {
    text.find(terminator)
        .map_or(text.len(), |i| i + terminator.len())
}

/// End of a `<!DOCTYPE ...>`, including an internal `[...]` subset
fn declaration_end(text: &str) -> usize {
    match (text.find('['), text.find('>')) {
        (Some(open), Some(close)) if open < close => {
            let subset_end = skip_past(&text[open..], "]") + open;
            subset_end + skip_past(&text[subset_end..], ">")
        }
        _ => skip_past(text, ">"),
    }
}

/// End of a start tag; `>` inside quoted attribute values does not count
fn start_tag_end(text: &str) -> usize {
    let mut quote = None;
    for (i, c) in text.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '>') => return i + 1,
            _ => {}
        }
    }
    text.len()
}

fn open_segment(
    node: Node<'_, '_>,
    tag: Tag,
    state: &mut ParseState,
) -> Result<usize, ParseError> {
    let ordinal = state.tags.len();
    let markup_id = attribute(node, "ID").map(|id| id.trim().to_string());

    if let Some(id) = &markup_id {
        if state.ids.insert(id.clone(), ordinal).is_some() {
            return Err(ParseError::DuplicateId(id.clone()));
        }
    }

    for kind in RelationKind::ALL {
        let Some(name) = kind.attribute() else { continue };
        if let Some(value) = attribute(node, name) {
            for target_id in split_references(value) {
                state.references.push(PendingReference {
                    source: ordinal,
                    kind,
                    attribute: name,
                    target_id: target_id.to_string(),
                });
            }
        }
    }

    if tag == Tag::Dec {
        if let Some(esito) = attribute(node, "esito") {
            state.decisions.push(Outcome::from_esito(esito));
        }
    }

    state.tags.push(tag);
    state.texts.push(String::new());
    state.markup_ids.push(markup_id);
    Ok(ordinal)
}

/// Attribute lookup ignoring case: annotators were not consistent.
fn attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attr| attr.name().eq_ignore_ascii_case(name))
        .map(|attr| attr.value())
}

fn split_references(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| c == '|' || c == ',' || c.is_whitespace())
        .filter(|id| !id.is_empty())
}

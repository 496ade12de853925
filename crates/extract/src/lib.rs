//! Turns annotated judgement markup into a graph of labeled segments.

pub mod normalizer;
pub mod parser;
pub mod schema;

pub use normalizer::TextNormalizer;
pub use parser::{DocumentParser, ParseError, ParserConfig};
pub use schema::{DocumentGraph, Outcome, Relation, RelationKind, Segment, Tag, UnknownIdentifier};

use std::path::Path;

/// Document identifier derived from a file path: the file stem
pub fn doc_id_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Parse a document with the default schema requirements
pub fn parse_document(doc_id: &str, markup: &str) -> Result<DocumentGraph, ParseError> {
    DocumentParser::default().parse(doc_id, markup)
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic role of a labeled span in a judgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Fact,
    Req,
    Arg,
    Claim,
    Mot,
    Dec,
}

impl Tag {
    pub const ALL: [Tag; 6] = [Tag::Fact, Tag::Req, Tag::Arg, Tag::Claim, Tag::Mot, Tag::Dec];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Fact => "fact",
            Tag::Req => "req",
            Tag::Arg => "arg",
            Tag::Claim => "claim",
            Tag::Mot => "mot",
            Tag::Dec => "dec",
        }
    }

    /// Match an element name; anything else is a plain container.
    pub fn from_element_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownIdentifier::new("tag", s))
    }
}

/// Type of a directed edge between two segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationKind {
    /// Nearest enclosing segment -> nested segment
    Contains,
    /// Segment -> the segment that follows it in document order
    Next,
    /// Declared with the `SUP` attribute
    Support,
    /// Declared with the `ATT` attribute
    Attack,
}

impl RelationKind {
    pub const ALL: [RelationKind; 4] = [
        RelationKind::Contains,
        RelationKind::Next,
        RelationKind::Support,
        RelationKind::Attack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Contains => "contains",
            RelationKind::Next => "next",
            RelationKind::Support => "support",
            RelationKind::Attack => "attack",
        }
    }

    /// Markup attribute that declares this kind of cross reference.
    pub fn attribute(&self) -> Option<&'static str> {
        match self {
            RelationKind::Support => Some("SUP"),
            RelationKind::Attack => Some("ATT"),
            RelationKind::Contains | RelationKind::Next => None,
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = UnknownIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownIdentifier::new("relation", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} identifier: {value:?}")]
pub struct UnknownIdentifier {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownIdentifier {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Verdict of a judgement, as read from the `esito` attribute of decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Upheld,
    Rejected,
    Other,
}

impl Outcome {
    pub fn from_esito(value: &str) -> Self {
        let value = value.trim().to_lowercase();
        // accolto, accoglie, accoglimento
        if value.starts_with("accol") || value.starts_with("accog") {
            Outcome::Upheld
        } else if value.starts_with("rigett") || value.starts_with("respin") {
            Outcome::Rejected
        } else {
            Outcome::Other
        }
    }

    /// Combine per-decision outcomes: any upheld decision wins over rejections.
    pub fn combine<I: IntoIterator<Item = Outcome>>(outcomes: I) -> Self {
        let mut result = Outcome::Other;
        for outcome in outcomes {
            match outcome {
                Outcome::Upheld => return Outcome::Upheld,
                Outcome::Rejected => result = Outcome::Rejected,
                Outcome::Other => {}
            }
        }
        result
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Upheld => "upheld",
            Outcome::Rejected => "rejected",
            Outcome::Other => "other",
        }
    }

    /// Binary classification label: `true` for rejected appeals.
    pub fn label(&self) -> bool {
        matches!(self, Outcome::Rejected)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub doc_id: String,
    pub ordinal: usize,
    pub tag: Tag,
    pub text: String,
    /// Value of the markup `ID` attribute, if any
    pub markup_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub source: usize, // segment ordinal
    pub target: usize,
    pub kind: RelationKind,
}

/// Segments and relations of one document, stored as an arena.
///
/// `segments[i].ordinal == i` always holds, and every relation endpoint is
/// an index into `segments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentGraph {
    pub doc_id: String,
    pub outcome: Outcome,
    pub segments: Vec<Segment>,
    pub relations: Vec<Relation>,
}

impl DocumentGraph {
    pub fn new(doc_id: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            doc_id: doc_id.into(),
            outcome,
            segments: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn add_segment(&mut self, tag: Tag, text: String, markup_id: Option<String>) -> usize {
        let ordinal = self.segments.len();
        self.segments.push(Segment {
            doc_id: self.doc_id.clone(),
            ordinal,
            tag,
            text,
            markup_id,
        });
        ordinal
    }

    pub fn add_relation(&mut self, source: usize, target: usize, kind: RelationKind) {
        debug_assert!(source < self.segments.len() && target < self.segments.len());
        self.relations.push(Relation { source, target, kind });
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.segments.iter().any(|s| s.tag == tag)
    }

    pub fn relations_of_kind(&self, kind: RelationKind) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(move |r| r.kind == kind)
    }

    /// Join every segment text in ordinal order.
    pub fn full_text(&self, delimiter: &str) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(delimiter)
    }
}

use regex::bytes::Regex;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::PipelineError;

/// Encoding labels decoded as ISO-8859-1, besides UTF-8
const LATIN1_LABELS: [&str; 6] = [
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "latin1",
    "latin-1",
    "l1",
];

/// Where a document's markup comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File(PathBuf),
    /// Markup compiled into the binary
    Embedded(&'static str),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::File(path) => write!(f, "{}", path.display()),
            Origin::Embedded(_) => f.write_str("<bundled>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub doc_id: String,
    pub origin: Origin,
}

impl SourceDocument {
    pub fn embedded(doc_id: impl Into<String>, markup: &'static str) -> Self {
        Self {
            doc_id: doc_id.into(),
            origin: Origin::Embedded(markup),
        }
    }
}

pub struct DocumentReader {
    extension: String,
}

impl DocumentReader {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// List the documents directly inside `dir`, sorted by file name.
    /// Subdirectories are not explored.
    pub fn discover(&self, dir: &Path) -> Result<Vec<SourceDocument>, PipelineError> {
        let metadata = fs::metadata(dir).map_err(|source| PipelineError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(PipelineError::NotADirectory(dir.to_path_buf()));
        }

        let mut documents = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|err| PipelineError::Io {
                path: dir.to_path_buf(),
                source: io::Error::from(err),
            })?;
            let path = entry.path();

            if path.is_file() && self.matches(path) {
                documents.push(SourceDocument {
                    doc_id: extract::doc_id_from_path(path),
                    origin: Origin::File(path.to_path_buf()),
                });
            }
        }

        Ok(documents)
    }

    pub fn read(&self, document: &SourceDocument) -> io::Result<String> {
        match &document.origin {
            Origin::File(path) => decode(fs::read(path)?),
            Origin::Embedded(markup) => Ok(markup.to_string()),
        }
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str())
    }
}

/// Decode document bytes as UTF-8, or as ISO-8859-1 when the XML
/// declaration asks for it.
pub fn decode(bytes: Vec<u8>) -> io::Result<String> {
    let bytes = match String::from_utf8(bytes) {
        Ok(text) => return Ok(text),
        Err(e) => e.into_bytes(),
    };

    match declared_encoding(&bytes) {
        Some(label) if LATIN1_LABELS.iter().any(|l| l.eq_ignore_ascii_case(&label)) => {
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        Some(label) => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("not valid UTF-8 and declared encoding {label:?} is unsupported"),
        )),
        None => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "not valid UTF-8 and no encoding is declared",
        )),
    }
}

fn declared_encoding(bytes: &[u8]) -> Option<String> {
    // Byte-oriented: the declaration is ASCII whatever the body encoding
    let re = Regex::new(
        r#"(?-u)^(?:\xEF\xBB\xBF)?<\?xml[^>]*?encoding\s*=\s*["']([A-Za-z0-9._-]+)["']"#,
    )
    .ok()?;
    let caps = re.captures(bytes)?;
    Some(String::from_utf8_lossy(&caps[1]).into_owned())
}

impl Default for DocumentReader {
    fn default() -> Self {
        Self::new("xml")
    }
}

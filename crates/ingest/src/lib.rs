//! Corpus aggregation: discover judgements, parse, contract and flatten
//! them into dataset rows.

pub mod level;
pub mod reader;
pub mod row;

pub use level::{ConfigurationError, Level, select_rows};
pub use reader::{DocumentReader, Origin, SourceDocument};
pub use row::{Row, RowContent};

use communities::{ComponentConfig, Contractor, DEFAULT_DELIMITER};
use extract::{DocumentParser, Outcome, ParserConfig};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("cannot read input folder {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("input path {0:?} is not a directory")]
    NotADirectory(PathBuf),
}

/// Everything the aggregator needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_folders: Vec<PathBuf>,
    /// Documents processed after the folders, in the given order
    pub embedded: Vec<SourceDocument>,
    pub level: Level,
    pub components: ComponentConfig,
    pub delimiter: String,
    pub parser: ParserConfig,
    /// Extension of document files, without the dot
    pub extension: String,
    /// Keep documents whose decisions carry no clear outcome
    pub keep_other_outcomes: bool,
}

impl PipelineConfig {
    pub fn new(input_folders: Vec<PathBuf>, level: Level) -> Self {
        Self {
            input_folders,
            embedded: Vec::new(),
            level,
            components: ComponentConfig::default(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            parser: ParserConfig::default(),
            extension: "xml".to_string(),
            keep_other_outcomes: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.input_folders.is_empty() && self.embedded.is_empty() {
            return Err(ConfigurationError::NoInputFolders);
        }
        if self.extension.is_empty() {
            return Err(ConfigurationError::EmptyExtension);
        }
        self.level.validate(&self.components)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub discovered: usize,
    pub parsed: usize,
    /// Unreadable or malformed documents
    pub skipped: usize,
    /// Documents dropped by the outcome filter
    pub filtered: usize,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct Corpus {
    pub rows: Vec<Row>,
    pub stats: CorpusStats,
}

enum DocumentResult {
    Rows(Vec<Row>),
    Skipped,
    Filtered,
}

pub struct CorpusAggregator {
    config: PipelineConfig,
    reader: DocumentReader,
    parser: DocumentParser,
    contractor: Contractor,
}

impl CorpusAggregator {
    /// Fails before touching the filesystem if the configuration is unusable
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let reader = DocumentReader::new(config.extension.clone());
        let parser = DocumentParser::new(config.parser.clone());
        let contractor = Contractor::new(config.components.clone(), config.delimiter.clone());

        Ok(Self {
            config,
            reader,
            parser,
            contractor,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Main aggregation pipeline
    pub fn run(&self) -> Result<Corpus, PipelineError> {
        // Step 1: Discover every folder up front so a bad path aborts early
        let mut sources = Vec::new();
        for folder in &self.config.input_folders {
            let documents = self.reader.discover(folder)?;
            info!(folder = %folder.display(), documents = documents.len(), "Discovered documents");
            sources.extend(documents);
        }
        if !self.config.embedded.is_empty() {
            info!(documents = self.config.embedded.len(), "Using bundled documents");
            sources.extend(self.config.embedded.iter().cloned());
        }

        let mut stats = CorpusStats {
            discovered: sources.len(),
            ..Default::default()
        };
        let mut rows = Vec::new();

        // Step 2: Process documents one at a time, in discovery order
        for source in &sources {
            match self.process(source) {
                DocumentResult::Rows(document_rows) => {
                    stats.parsed += 1;
                    rows.extend(document_rows);
                }
                DocumentResult::Filtered => {
                    stats.parsed += 1;
                    stats.filtered += 1;
                }
                DocumentResult::Skipped => stats.skipped += 1,
            }
        }
        stats.rows = rows.len();

        info!(
            level = %self.config.level,
            discovered = stats.discovered,
            parsed = stats.parsed,
            skipped = stats.skipped,
            filtered = stats.filtered,
            rows = stats.rows,
            "Corpus aggregated"
        );

        Ok(Corpus { rows, stats })
    }

    fn process(&self, source: &SourceDocument) -> DocumentResult {
        let markup = match self.reader.read(source) {
            Ok(markup) => markup,
            Err(e) => {
                warn!(
                    doc_id = %source.doc_id,
                    origin = %source.origin,
                    error = %e,
                    "Skipping unreadable document"
                );
                return DocumentResult::Skipped;
            }
        };

        let graph = match self.parser.parse(&source.doc_id, &markup) {
            Ok(graph) => graph,
            Err(e) => {
                warn!(
                    doc_id = %source.doc_id,
                    origin = %source.origin,
                    error = %e,
                    "Skipping malformed document"
                );
                return DocumentResult::Skipped;
            }
        };

        if graph.outcome == Outcome::Other && !self.config.keep_other_outcomes {
            info!(doc_id = %source.doc_id, "Dropping document without a clear outcome");
            return DocumentResult::Filtered;
        }

        let contracted = self.contractor.contract(graph);
        match select_rows(self.config.level, &contracted) {
            Ok(rows) => {
                debug!(doc_id = %source.doc_id, rows = rows.len(), "Flattened document");
                DocumentResult::Rows(rows)
            }
            // Unreachable once the config is validated, but never fatal per document
            Err(e) => {
                warn!(doc_id = %source.doc_id, error = %e, "Skipping document");
                DocumentResult::Skipped
            }
        }
    }
}

/// Validate `config` and aggregate every document it points at
pub fn aggregate(config: PipelineConfig) -> Result<Corpus, PipelineError> {
    CorpusAggregator::new(config)?.run()
}

use anyhow::{Context, Result};
use communities::{ComponentConfig, DEFAULT_DELIMITER};
use extract::{ParserConfig, RelationKind, Tag};
use ingest::{Level, PipelineConfig, SourceDocument};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Second-instance judgements compiled into the binary
const BUNDLED: [(&str, &str); 4] = [
    (
        "ctr_2019_0142",
        include_str!("../../../dataset/second_instance/ctr_2019_0142.xml"),
    ),
    (
        "ctr_2019_0388",
        include_str!("../../../dataset/second_instance/ctr_2019_0388.xml"),
    ),
    (
        "ctr_2020_0051",
        include_str!("../../../dataset/second_instance/ctr_2020_0051.xml"),
    ),
    (
        "ctr_2020_0217",
        include_str!("../../../dataset/second_instance/ctr_2020_0217.xml"),
    ),
];

/// The bundled corpus, used when no input folder is configured
pub fn bundled_corpus() -> Vec<SourceDocument> {
    BUNDLED
        .iter()
        .map(|&(doc_id, markup)| SourceDocument::embedded(doc_id, markup))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Empty means the bundled dataset
    pub input_folders: Vec<PathBuf>,
    pub level: Level,
    pub edge_relations: Vec<RelationKind>,
    pub cc_tags: Vec<Tag>,
    pub delimiter: String,
    pub extension: String,
    pub keep_other_outcomes: bool,
    pub parser: ParserConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_folders: Vec::new(),
            level: Level::Document,
            edge_relations: Vec::new(),
            cc_tags: Vec::new(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            extension: "xml".to_string(),
            keep_other_outcomes: false,
            parser: ParserConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    pub fn into_pipeline(self) -> PipelineConfig {
        let embedded = if self.input_folders.is_empty() {
            bundled_corpus()
        } else {
            Vec::new()
        };

        PipelineConfig {
            input_folders: self.input_folders,
            embedded,
            level: self.level,
            components: ComponentConfig::new(self.cc_tags, self.edge_relations),
            delimiter: self.delimiter,
            parser: self.parser,
            extension: self.extension,
            keep_other_outcomes: self.keep_other_outcomes,
        }
    }
}

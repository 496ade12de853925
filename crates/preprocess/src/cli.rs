use anyhow::Result;
use clap::Parser;
use extract::{RelationKind, Tag};
use ingest::Level;
use std::path::PathBuf;

use crate::config::AppConfig;

/// Preprocess annotated judgements into a Parquet dataset.
///
/// Documents are read from the input folders (the bundled second-instance
/// corpus by default), split into tagged segments and flattened into one
/// row per document, per segment or per connected component.
#[derive(Debug, Parser)]
#[command(name = "preprocess", version)]
pub struct Cli {
    /// Parquet file to write; an existing file is replaced
    pub output_file: PathBuf,

    /// Row granularity: document, segment or connected_components
    #[arg(short, long)]
    pub level: Option<Level>,

    /// Folder of XML judgements; repeat or list several (default: bundled corpus)
    #[arg(short = 'i', long = "input-folder", num_args = 1.., value_name = "DIR")]
    pub input_folders: Vec<PathBuf>,

    /// Relation merging segments into components: contains, next, support, attack
    #[arg(short = 'e', long = "edge-relation", num_args = 1.., value_name = "RELATION")]
    pub edge_relations: Vec<RelationKind>,

    /// Tag of segments eligible for merging: fact, req, arg, claim, mot, dec
    #[arg(short = 't', long = "cc-tag", num_args = 1.., value_name = "TAG")]
    pub cc_tags: Vec<Tag>,

    /// JSON configuration file; command line flags take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// String placed between concatenated segment texts
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Collapse runs of whitespace inside segment text
    #[arg(long)]
    pub normalize_whitespace: bool,

    /// Keep documents whose decision has no upheld/rejected outcome
    #[arg(long)]
    pub keep_other_outcomes: bool,

    /// Print corpus statistics as JSON on stdout when done
    #[arg(long)]
    pub stats: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Config file (or defaults) overridden by the flags that were given
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(level) = self.level {
            config.level = level;
        }
        if !self.input_folders.is_empty() {
            config.input_folders = self.input_folders.clone();
        }
        if !self.edge_relations.is_empty() {
            config.edge_relations = self.edge_relations.clone();
        }
        if !self.cc_tags.is_empty() {
            config.cc_tags = self.cc_tags.clone();
        }
        if let Some(delimiter) = &self.delimiter {
            config.delimiter = delimiter.clone();
        }
        if self.normalize_whitespace {
            config.parser.normalize_whitespace = true;
        }
        if self.keep_other_outcomes {
            config.keep_other_outcomes = true;
        }

        Ok(config)
    }
}

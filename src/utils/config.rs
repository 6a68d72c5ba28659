use crate::index::reader::LookupStrategy;
use crate::index::types::{LOOKUP_FILE, POSTINGS_FILE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Indexer and query configuration, read from an optional JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Words never indexed
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,

    #[serde(default)]
    pub lookup_strategy: LookupStrategy,

    /// Collection prefix restored on result identifiers
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Expected length of a normalized DocNo (`wsj8703240001`)
    #[serde(default = "default_docno_length")]
    pub docno_length: usize,

    /// Where the numeric document id starts inside the DocNo
    #[serde(default = "default_docno_digits_offset")]
    pub docno_digits_offset: usize,

    #[serde(default = "default_lookup_file")]
    pub lookup_file: String,

    #[serde(default = "default_postings_file")]
    pub postings_file: String,

    /// Show a progress spinner while indexing
    #[serde(default = "default_progress")]
    pub progress: bool,
}

fn default_stopwords() -> Vec<String> {
    ["the", "be", "to", "of", "and", "a", "in", "that"]
        .iter()
        .map(|w| w.to_string())
        .collect()
}

fn default_id_prefix() -> String {
    "WSJ".to_string()
}

fn default_docno_length() -> usize {
    13
}

fn default_docno_digits_offset() -> usize {
    4
}

fn default_lookup_file() -> String {
    LOOKUP_FILE.to_string()
}

fn default_postings_file() -> String {
    POSTINGS_FILE.to_string()
}

fn default_progress() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stopwords: default_stopwords(),
            lookup_strategy: LookupStrategy::default(),
            id_prefix: default_id_prefix(),
            docno_length: default_docno_length(),
            docno_digits_offset: default_docno_digits_offset(),
            lookup_file: default_lookup_file(),
            postings_file: default_postings_file(),
            progress: default_progress(),
        }
    }
}

impl Config {
    /// Load config from `path`, or return the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn lookup_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.lookup_file)
    }

    pub fn postings_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.postings_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_path_gives_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.stopwords.len(), 8);
        assert_eq!(config.lookup_strategy, LookupStrategy::Binary);
        assert_eq!(config.lookup_path(Path::new("idx")), Path::new("idx").join("lookup.bin"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "lookup_strategy": "linear", "stopwords": ["foo"] }"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.lookup_strategy, LookupStrategy::Linear);
        assert_eq!(config.stopwords, vec!["foo"]);
        assert_eq!(config.id_prefix, "WSJ");
        assert_eq!(config.docno_length, 13);
        assert!(config.progress);
    }

    #[test]
    fn test_bad_files_fail_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = Config::load(Some(&missing)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        let err = Config::load(Some(&broken)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}

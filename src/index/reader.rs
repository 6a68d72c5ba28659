use crate::index::types::*;
use crate::utils::{decode_term_field, stored_term_bytes, term_field_bytes, u32_le_at};
use anyhow::{Context, Result, bail};
use log::debug;
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// How a query term is located in the lookup table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStrategy {
    /// Scan every record from the start of the table
    Linear,
    /// Binary search over the sorted fixed-width records
    #[default]
    Binary,
}

/// Read-only bytes of an index file
enum IndexBytes {
    Mapped(Mmap),
    Empty,
}

impl IndexBytes {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("Failed to stat {}", path.display()))?
            .len();
        if len == 0 {
            return Ok(Self::Empty);
        }
        let mmap = unsafe { Mmap::map(&file) }.with_context(|| format!("Failed to map {}", path.display()))?;
        Ok(Self::Mapped(mmap))
    }
}

impl Deref for IndexBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Self::Mapped(mmap) => &mmap[..],
            Self::Empty => &[],
        }
    }
}

/// Memory-mapped reader over `lookup.bin` and `postings.bin`
pub struct IndexReader {
    lookup_path: PathBuf,
    lookup: IndexBytes,
    postings: IndexBytes,
    strategy: LookupStrategy,
}

impl IndexReader {
    /// Open the default index files inside `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        Self::open_files(&dir.join(LOOKUP_FILE), &dir.join(POSTINGS_FILE))
    }

    /// Open an explicit lookup/postings pair
    pub fn open_files(lookup_path: &Path, postings_path: &Path) -> Result<Self> {
        let lookup = IndexBytes::open(lookup_path).context("Couldn't load index files")?;
        let postings = IndexBytes::open(postings_path).context("Couldn't load index files")?;

        if lookup.len() % LOOKUP_RECORD_SIZE != 0 {
            bail!(
                "{} is not a lookup table ({} bytes is not a multiple of {})",
                lookup_path.display(),
                lookup.len(),
                LOOKUP_RECORD_SIZE
            );
        }

        Ok(Self {
            lookup_path: lookup_path.to_path_buf(),
            lookup,
            postings,
            strategy: LookupStrategy::default(),
        })
    }

    pub fn with_strategy(mut self, strategy: LookupStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> LookupStrategy {
        self.strategy
    }

    /// Number of lookup records (unique stored terms)
    pub fn term_count(&self) -> usize {
        self.lookup.len() / LOOKUP_RECORD_SIZE
    }

    /// Every lookup record in file order
    pub fn entries(&self) -> impl Iterator<Item = LookupRecord> + '_ {
        (0..self.term_count()).map(move |i| self.record(i))
    }

    /// First lookup record matching `term`
    pub fn lookup(&self, term: &str) -> Option<LookupRecord> {
        self.lookup_all(term).into_iter().next()
    }

    /// All lookup records matching `term`.
    ///
    /// Terms are compared on their stored prefix, so distinct long terms
    /// sharing that prefix resolve to every one of their records.
    pub fn lookup_all(&self, term: &str) -> Vec<LookupRecord> {
        let key = stored_term_bytes(term);
        let range = match self.strategy {
            LookupStrategy::Linear => self.scan_linear(key),
            LookupStrategy::Binary => self.search_binary(key),
        };
        debug!("lookup '{}' -> {} record(s) via {:?}", term, range.len(), self.strategy);
        range.into_iter().map(|i| self.record(i)).collect()
    }

    /// Decode the postings run addressed by `record`
    pub fn postings(&self, record: &LookupRecord) -> Result<Vec<PostingEntry>> {
        if record.length as usize % POSTING_RECORD_SIZE != 0 {
            bail!(
                "Corrupt index: postings length {} for '{}' is not a multiple of {}",
                record.length,
                record.term,
                POSTING_RECORD_SIZE
            );
        }

        let start = record.offset as usize;
        let end = start + record.length as usize;
        let Some(run) = self.postings.get(start..end) else {
            bail!(
                "Corrupt index: postings for '{}' ({}..{}) lie outside the {}-byte postings file",
                record.term,
                start,
                end,
                self.postings.len()
            );
        };

        Ok(run
            .chunks_exact(POSTING_RECORD_SIZE)
            .map(|chunk| PostingEntry {
                doc_id: u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
                frequency: u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]),
            })
            .collect())
    }

    pub fn lookup_path(&self) -> &Path {
        &self.lookup_path
    }

    fn term_bytes(&self, index: usize) -> &[u8] {
        let start = index * LOOKUP_RECORD_SIZE;
        term_field_bytes(&self.lookup[start..start + TERM_FIELD_WIDTH])
    }

    fn record(&self, index: usize) -> LookupRecord {
        let start = index * LOOKUP_RECORD_SIZE;
        let term = decode_term_field(&self.lookup[start..start + TERM_FIELD_WIDTH]);
        // Record bounds are guaranteed by the size check in `open_files`
        let offset = u32_le_at(&self.lookup, start + TERM_FIELD_WIDTH).unwrap_or(0);
        let length = u32_le_at(&self.lookup, start + TERM_FIELD_WIDTH + 4).unwrap_or(0);
        LookupRecord { term, offset, length }
    }

    fn scan_linear(&self, key: &[u8]) -> Vec<usize> {
        (0..self.term_count())
            .filter(|&i| self.term_bytes(i) == key)
            .collect()
    }

    fn search_binary(&self, key: &[u8]) -> Vec<usize> {
        let count = self.term_count();

        // First record not less than `key`
        let (mut lo, mut hi) = (0, count);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.term_bytes(mid) < key {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        let mut end = lo;
        while end < count && self.term_bytes(end) == key {
            end += 1;
        }
        (lo..end).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tree::TermTree;
    use crate::index::writer::IndexWriter;
    use tempfile::TempDir;

    fn build(words: &[(&str, DocId)]) -> (TempDir, TermTree) {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = TermTree::new();
        for &(word, doc) in words {
            tree.insert(word, doc);
        }
        (dir, tree)
    }

    fn written(words: &[(&str, DocId)]) -> (TempDir, IndexReader) {
        let (dir, tree) = build(words);
        IndexWriter::new(dir.path()).write(tree).unwrap();
        let reader = IndexReader::open(dir.path()).unwrap();
        (dir, reader)
    }

    #[test]
    fn test_round_trip_matches_memory() {
        let words = [
            ("apple", 1),
            ("apple", 1),
            ("banana", 1),
            ("apple", 2),
            ("cherry", 2),
            ("banana", 3),
            ("banana", 3),
            ("date", 3),
        ];
        let (dir, tree) = build(&words);
        let expected: Vec<(String, Vec<PostingEntry>)> = tree
            .iter()
            .map(|(t, p)| (t.to_string(), p.iter().copied().collect()))
            .collect();
        IndexWriter::new(dir.path()).write(tree).unwrap();

        for strategy in [LookupStrategy::Linear, LookupStrategy::Binary] {
            let reader = IndexReader::open(dir.path()).unwrap().with_strategy(strategy);
            assert_eq!(reader.term_count(), expected.len());
            for (term, postings) in &expected {
                let record = reader.lookup(term).unwrap();
                assert_eq!(&reader.postings(&record).unwrap(), postings);
            }
        }
    }

    #[test]
    fn test_missing_term_is_none() {
        let (dir, _) = written(&[("apple", 1), ("cherry", 1)]);
        for strategy in [LookupStrategy::Linear, LookupStrategy::Binary] {
            let reader = IndexReader::open(dir.path()).unwrap().with_strategy(strategy);
            assert!(reader.lookup("banana").is_none());
            assert!(reader.lookup("aaa").is_none());
            assert!(reader.lookup("zzz").is_none());
            assert!(reader.lookup("").is_none());
        }
    }

    #[test]
    fn test_entries_are_sorted() {
        let (_dir, reader) = written(&[("pear", 1), ("apple", 1), ("fig", 2), ("apple", 2)]);
        let terms: Vec<_> = reader.entries().map(|r| r.term).collect();
        assert_eq!(terms, vec!["apple", "fig", "pear"]);

        let apple = reader.lookup("apple").unwrap();
        assert_eq!(apple.offset, 0);
        assert_eq!(apple.posting_count(), 2);
    }

    #[test]
    fn test_truncated_terms_resolve_to_all_records() {
        let long_a = "internationalizationa";
        let long_b = "internationalizationb";
        let (dir, _) = written(&[(long_a, 1), (long_b, 2), ("short", 3)]);

        for strategy in [LookupStrategy::Linear, LookupStrategy::Binary] {
            let reader = IndexReader::open(dir.path()).unwrap().with_strategy(strategy);
            let records = reader.lookup_all(long_a);
            assert_eq!(records.len(), 2);
            assert!(records.iter().all(|r| r.term == "internationalizatio"));

            let docs: Vec<_> = records
                .iter()
                .flat_map(|r| reader.postings(r).unwrap())
                .map(|p| p.doc_id)
                .collect();
            assert_eq!(docs, vec![1, 2]);
        }
    }

    #[test]
    fn test_empty_index_opens() {
        let (_dir, reader) = written(&[]);
        assert_eq!(reader.term_count(), 0);
        assert!(reader.lookup("anything").is_none());
    }

    #[test]
    fn test_missing_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        let err = IndexReader::open(dir.path()).err().unwrap();
        assert!(format!("{:#}", err).contains("Couldn't load index files"));
    }

    #[test]
    fn test_out_of_range_postings_is_an_error() {
        let (_dir, reader) = written(&[("apple", 1)]);
        let bogus = LookupRecord {
            term: "apple".to_string(),
            offset: 64,
            length: 8,
        };
        assert!(reader.postings(&bogus).is_err());

        let ragged = LookupRecord {
            term: "apple".to_string(),
            offset: 0,
            length: 5,
        };
        assert!(reader.postings(&ragged).is_err());
    }
}

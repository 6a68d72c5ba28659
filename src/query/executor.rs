use crate::index::reader::IndexReader;
use crate::index::types::DocId;
use crate::query::results::AccumulatorTree;
use anyhow::Result;
use log::debug;

/// A document in a ranked result list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedDoc {
    pub doc_id: DocId,
    pub score: f32,
}

/// Split a query line into lowercase terms
pub fn parse_terms(line: &str) -> Vec<String> {
    line.split_whitespace().map(|t| t.to_lowercase()).collect()
}

/// Query executor.
///
/// Each call builds its own accumulation and ranking trees; nothing is shared
/// between queries.
pub struct QueryExecutor<'a> {
    reader: &'a IndexReader,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(reader: &'a IndexReader) -> Self {
        Self { reader }
    }

    /// Rank the documents matching a raw query line
    pub fn search(&self, line: &str) -> Result<Vec<RankedDoc>> {
        let terms = parse_terms(line);
        self.search_terms(&terms)
    }

    /// Rank the documents matching already normalized terms
    pub fn search_terms<S: AsRef<str>>(&self, terms: &[S]) -> Result<Vec<RankedDoc>> {
        let accumulator = self.accumulate(terms)?;
        debug!("{} candidate document(s)", accumulator.len());

        let mut results = Vec::with_capacity(accumulator.len());
        accumulator
            .into_ranking()
            .drain(|doc_id, score| results.push(RankedDoc { doc_id, score }));
        Ok(results)
    }

    /// First pass: sum every term's normalized frequency per document.
    ///
    /// A posting contributes `frequency / postings_for_term`. Terms missing
    /// from the index contribute nothing.
    pub fn accumulate<S: AsRef<str>>(&self, terms: &[S]) -> Result<AccumulatorTree> {
        let mut accumulator = AccumulatorTree::new();

        for term in terms {
            let term = term.as_ref();
            for record in self.reader.lookup_all(term) {
                let postings = self.reader.postings(&record)?;
                let count = record.posting_count() as f32;
                for entry in postings {
                    accumulator.add(entry.doc_id, entry.frequency as f32 / count);
                }
            }
        }

        Ok(accumulator)
    }
}

/// Internal document identifier, resolved from a document's DocNo
pub type DocId = u32;

/// Width of the term field in a lookup record, including the NUL terminator
pub const TERM_FIELD_WIDTH: usize = 20;

/// Longest term prefix that survives in the lookup table
pub const MAX_STORED_TERM_LEN: usize = TERM_FIELD_WIDTH - 1;

/// Size of a lookup record: term field, postings offset, postings length
pub const LOOKUP_RECORD_SIZE: usize = TERM_FIELD_WIDTH + 4 + 4;

/// Size of a postings record: doc id and frequency
pub const POSTING_RECORD_SIZE: usize = 4 + 4;

/// Default file name of the lookup table
pub const LOOKUP_FILE: &str = "lookup.bin";

/// Default file name of the postings stream
pub const POSTINGS_FILE: &str = "postings.bin";

/// Node color in the term index tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// One (document, frequency) pair of a term's postings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostingEntry {
    pub doc_id: DocId,
    pub frequency: u32,
}

impl PostingEntry {
    pub fn new(doc_id: DocId) -> Self {
        Self {
            doc_id,
            frequency: 1,
        }
    }
}

/// Lookup table entry mapping a term to its postings byte range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRecord {
    /// Stored term, already truncated to `MAX_STORED_TERM_LEN` bytes
    pub term: String,
    /// Byte offset into the postings stream
    pub offset: u32,
    /// Byte length of the term's postings run
    pub length: u32,
}

impl LookupRecord {
    /// Number of postings records covered by this entry
    pub fn posting_count(&self) -> usize {
        self.length as usize / POSTING_RECORD_SIZE
    }
}

/// Totals reported after writing an index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSummary {
    pub terms: usize,
    pub postings: usize,
    pub lookup_bytes: u64,
    pub postings_bytes: u64,
}

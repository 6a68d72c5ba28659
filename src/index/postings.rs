use crate::index::types::{DocId, PostingEntry};

/// Postings of a single term.
///
/// Entries are kept oldest-first internally and exposed newest-first, so the
/// "head" of the list is always the most recently added document. Only a
/// repeat of the head merges; a document that comes back after another one
/// gets a fresh entry. Documents are indexed one after another, so every
/// occurrence of a term inside one document lands on the head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    entries: Vec<PostingEntry>,
}

impl PostingList {
    /// Create a list holding a single occurrence of `doc_id`
    pub fn with_doc(doc_id: DocId) -> Self {
        Self {
            entries: vec![PostingEntry::new(doc_id)],
        }
    }

    /// Record one more occurrence of the term in `doc_id`
    pub fn store(&mut self, doc_id: DocId) {
        match self.entries.last_mut() {
            Some(head) if head.doc_id == doc_id => head.frequency += 1,
            _ => self.entries.push(PostingEntry::new(doc_id)),
        }
    }

    /// Most recently added entry
    pub fn head(&self) -> Option<&PostingEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in list order, newest first
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &PostingEntry> + '_ {
        self.entries.iter().rev()
    }

    /// Sum of all frequencies
    pub fn total_frequency(&self) -> u64 {
        self.entries.iter().map(|e| e.frequency as u64).sum()
    }
}

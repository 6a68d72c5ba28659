use crate::index::reader::IndexReader;
use crate::output::print_dump_entry;
use anyhow::Result;
use std::io::Write;

/// Counts gathered while dumping an index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpStats {
    pub terms: usize,
    pub postings: usize,
}

/// Print every lookup record and its postings, followed by the number of
/// unique words
pub fn dump_index<W: Write>(reader: &IndexReader, out: &mut W) -> Result<DumpStats> {
    let mut stats = DumpStats::default();

    for record in reader.entries() {
        let postings = reader.postings(&record)?;
        print_dump_entry(out, &record, &postings)?;
        stats.terms += 1;
        stats.postings += postings.len();
    }

    writeln!(out, "Unique words: {}", stats.terms)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tree::TermTree;
    use crate::index::writer::IndexWriter;

    #[test]
    fn test_dump_two_terms() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = TermTree::new();
        tree.insert("banana", 1);
        tree.insert("apple", 1);
        tree.insert("apple", 1);
        tree.insert("apple", 2);
        IndexWriter::new(dir.path()).write(tree).unwrap();

        let reader = IndexReader::open(dir.path()).unwrap();
        let mut out = Vec::new();
        let stats = dump_index(&reader, &mut out).unwrap();

        assert_eq!(stats, DumpStats { terms: 2, postings: 3 });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Word: apple, \tPostings Location: 0, Postings Length: 16\n\
             \tDoc Number: 2, Occurrence: 1\n\
             \tDoc Number: 1, Occurrence: 2\n\
             Word: banana, \tPostings Location: 16, Postings Length: 8\n\
             \tDoc Number: 1, Occurrence: 1\n\
             Unique words: 2\n"
        );
    }

    #[test]
    fn test_dump_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        IndexWriter::new(dir.path()).write(TermTree::new()).unwrap();

        let reader = IndexReader::open(dir.path()).unwrap();
        let mut out = Vec::new();
        dump_index(&reader, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Unique words: 0\n");
    }
}

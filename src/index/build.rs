use crate::index::tree::TermTree;
use crate::index::types::{DocId, IndexSummary};
use crate::index::writer::IndexWriter;
use crate::utils::progress::{ProgressBar, ProgressStyle};
use crate::utils::{Config, MarkupSink, tokenize};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;

/// Which part of a document the tokenizer is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    None,
    DocNo,
    Text,
}

/// Indexing context driven by the markup tokenizer.
///
/// Words inside `<docno>` build the document number; words inside `<text>`
/// or `<in>` are indexed under the most recent valid document number.
pub struct Indexer {
    stopwords: HashSet<String>,
    docno_length: usize,
    docno_digits_offset: usize,
    mode: Mode,
    docno: String,
    doc_id: DocId,
    tree: TermTree,
    documents: usize,
    bad_docnos: usize,
}

impl Indexer {
    pub fn new(config: &Config) -> Self {
        Self {
            stopwords: config.stopwords.iter().cloned().collect(),
            docno_length: config.docno_length,
            docno_digits_offset: config.docno_digits_offset,
            mode: Mode::None,
            docno: String::new(),
            doc_id: 0,
            tree: TermTree::new(),
            documents: 0,
            bad_docnos: 0,
        }
    }

    /// Document numbers successfully resolved so far
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Document numbers rejected so far
    pub fn bad_docnos(&self) -> usize {
        self.bad_docnos
    }

    /// Document id words are currently indexed under
    pub fn current_doc(&self) -> DocId {
        self.doc_id
    }

    pub fn tree(&self) -> &TermTree {
        &self.tree
    }

    pub fn finish(self) -> TermTree {
        self.tree
    }

    fn resolve_docno(&mut self) {
        if self.docno.len() != self.docno_length {
            warn!("Unrecognized DocNo format: '{}'", self.docno);
            self.bad_docnos += 1;
            return;
        }

        let digits = self.docno.get(self.docno_digits_offset..).unwrap_or("");
        match digits.parse::<DocId>() {
            Ok(id) => {
                debug!("document {} -> {}", self.docno, id);
                self.doc_id = id;
                self.documents += 1;
            }
            Err(e) => {
                warn!("Unrecognized DocNo format: '{}' ({})", self.docno, e);
                self.bad_docnos += 1;
            }
        }
    }
}

impl MarkupSink for Indexer {
    fn start_tag(&mut self, name: &str) {
        match name {
            "docno" => {
                self.mode = Mode::DocNo;
                self.docno.clear();
            }
            "text" | "in" => self.mode = Mode::Text,
            _ => {}
        }
    }

    fn end_tag(&mut self, name: &str) {
        match name {
            "docno" => self.resolve_docno(),
            "text" => self.docno.clear(),
            _ => {}
        }
        self.mode = Mode::None;
    }

    fn word(&mut self, word: &str) {
        if self.stopwords.contains(word) {
            return;
        }
        match self.mode {
            Mode::DocNo => self.docno.push_str(word),
            Mode::Text => self.tree.insert(word, self.doc_id),
            Mode::None => {}
        }
    }
}

/// Outcome of indexing one collection file
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub documents: usize,
    pub bad_docnos: usize,
    pub summary: IndexSummary,
}

/// Reader that advances a progress bar by the bytes it hands out
struct ProgressReader<R> {
    inner: R,
    bar: Option<ProgressBar>,
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if let Some(bar) = &self.bar {
            bar.inc(n as u64);
        }
        Ok(n)
    }
}

/// Tokenize and index `input` without writing anything
pub fn index_reader<R: Read>(input: R, config: &Config) -> Result<Indexer> {
    let mut indexer = Indexer::new(config);
    tokenize(input, &mut indexer).context("Failed to read input document")?;
    Ok(indexer)
}

/// Index the collection in `input` and write it with `writer`
pub fn build_index(input: &Path, writer: &IndexWriter, config: &Config) -> Result<BuildReport> {
    let start = Instant::now();
    let file = File::open(input).with_context(|| format!("Unable to open {}", input.display()))?;
    let total = file.metadata().map(|m| m.len()).unwrap_or(0);

    if config.progress {
        println!("Indexing: {}", input.display());
    }

    let bar = config.progress.then(|| {
        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
        {
            pb.set_style(style.progress_chars("█▓▒░  "));
        }
        pb
    });

    let reader = ProgressReader {
        inner: file,
        bar: bar.clone(),
    };
    let indexer = index_reader(reader, config)
        .with_context(|| format!("Failed to index {}", input.display()))?;

    if let Some(pb) = &bar {
        pb.finish_with_message(format!("{} documents", indexer.documents()));
    }

    let documents = indexer.documents();
    let bad_docnos = indexer.bad_docnos();
    let tree = indexer.finish();
    info!("{} unique terms across {} documents", tree.len(), documents);

    if config.progress {
        println!("Writing index...");
    }
    let summary = writer.write(tree)?;

    info!("index built in {:?}", start.elapsed());
    Ok(BuildReport {
        documents,
        bad_docnos,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::postings::PostingList;
    use crate::index::types::PostingEntry;

    const COLLECTION: &str = "\
<DOC>
<DOCNO> WSJ870324-0001 </DOCNO>
<HL> The Headline Is Ignored </HL>
<TEXT>
Apple apple BANANA and the cherry.
</TEXT>
</DOC>
<DOC>
<DOCNO> WSJ900102-0007 </DOCNO>
<IN> banking </IN>
<TEXT>
Banana split's &amp; apple-pie
</TEXT>
</DOC>
";

    fn index(text: &str) -> Indexer {
        index_reader(text.as_bytes(), &Config::default()).unwrap()
    }

    fn postings(indexer: &Indexer, term: &str) -> Vec<PostingEntry> {
        indexer
            .tree()
            .get(term)
            .map(|p: &PostingList| p.iter().copied().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_indexes_text_under_docno() {
        let indexer = index(COLLECTION);
        assert_eq!(indexer.documents(), 2);
        assert_eq!(indexer.bad_docnos(), 0);

        // newest posting first
        assert_eq!(
            postings(&indexer, "apple"),
            vec![
                PostingEntry::new(1020007),
                PostingEntry { doc_id: 703240001, frequency: 2 },
            ]
        );
        assert_eq!(postings(&indexer, "banking"), vec![PostingEntry::new(1020007)]);
        assert_eq!(postings(&indexer, "split"), vec![PostingEntry::new(1020007)]);
        assert_eq!(postings(&indexer, "cherry"), vec![PostingEntry::new(703240001)]);
    }

    #[test]
    fn test_stopwords_and_outside_text_are_skipped() {
        let indexer = index(COLLECTION);
        assert!(indexer.tree().get("the").is_none());
        assert!(indexer.tree().get("and").is_none());
        assert!(indexer.tree().get("headline").is_none());
        assert!(indexer.tree().get("wsj870324").is_none());
    }

    #[test]
    fn test_bad_docno_keeps_previous_id() {
        let text = "<DOCNO> WSJ870324-0001 </DOCNO><TEXT> first </TEXT>\
                    <DOCNO> WSJ87-1 </DOCNO><TEXT> second </TEXT>";
        let indexer = index(text);
        assert_eq!(indexer.documents(), 1);
        assert_eq!(indexer.bad_docnos(), 1);
        assert_eq!(postings(&indexer, "second"), vec![PostingEntry::new(703240001)]);
    }

    #[test]
    fn test_non_numeric_docno_is_rejected() {
        let indexer = index("<DOCNO> abcdefghijklm </DOCNO><TEXT> word </TEXT>");
        assert_eq!(indexer.bad_docnos(), 1);
        assert_eq!(indexer.current_doc(), 0);
        assert_eq!(postings(&indexer, "word"), vec![PostingEntry::new(0)]);
    }

    #[test]
    fn test_any_end_tag_leaves_text_mode() {
        let indexer = index("<TEXT> kept <B>bold</B> dropped </TEXT>");
        assert!(indexer.tree().get("kept").is_some());
        assert!(indexer.tree().get("bold").is_some());
        assert!(indexer.tree().get("dropped").is_none());
    }

    #[test]
    fn test_custom_stopwords() {
        let config = Config {
            stopwords: vec!["apple".to_string()],
            ..Config::default()
        };
        let indexer = index_reader("<TEXT> apple the </TEXT>".as_bytes(), &config).unwrap();
        assert!(indexer.tree().get("apple").is_none());
        assert!(indexer.tree().get("the").is_some());
    }

    #[test]
    fn test_build_index_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("collection.txt");
        std::fs::write(&input, COLLECTION).unwrap();

        let config = Config {
            progress: false,
            ..Config::default()
        };
        let writer = IndexWriter::new(dir.path());
        let report = build_index(&input, &writer, &config).unwrap();

        assert_eq!(report.documents, 2);
        assert!(report.summary.terms > 0);
        assert!(writer.lookup_path().exists());
        assert!(writer.postings_path().exists());
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let writer = IndexWriter::new(dir.path());
        let err = build_index(&dir.path().join("nope.txt"), &writer, &Config::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("Unable to open"));
    }
}

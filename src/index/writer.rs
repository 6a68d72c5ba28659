use crate::index::postings::PostingList;
use crate::index::tree::TermTree;
use crate::index::types::*;
use crate::utils::{encode_term_field, write_u32_le};
use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Serializes a term tree into a lookup table and a postings stream
pub struct IndexWriter {
    lookup_path: PathBuf,
    postings_path: PathBuf,
}

impl IndexWriter {
    /// Writer producing the default file names inside `dir`
    pub fn new(dir: &Path) -> Self {
        Self::with_files(dir.join(LOOKUP_FILE), dir.join(POSTINGS_FILE))
    }

    /// Writer producing explicit lookup and postings paths
    pub fn with_files(lookup_path: PathBuf, postings_path: PathBuf) -> Self {
        Self {
            lookup_path,
            postings_path,
        }
    }

    pub fn lookup_path(&self) -> &Path {
        &self.lookup_path
    }

    pub fn postings_path(&self) -> &Path {
        &self.postings_path
    }

    /// Write `tree` to disk, consuming it
    pub fn write(&self, tree: TermTree) -> Result<IndexSummary> {
        let lookup_file = File::create(&self.lookup_path)
            .with_context(|| format!("Unable to create {}", self.lookup_path.display()))?;
        let postings_file = File::create(&self.postings_path)
            .with_context(|| format!("Unable to create {}", self.postings_path.display()))?;

        let mut lookup = BufWriter::new(lookup_file);
        let mut postings = BufWriter::new(postings_file);

        let summary = serialize(tree, &mut lookup, &mut postings)?;

        lookup.flush()?;
        postings.flush()?;

        info!(
            "wrote {} terms ({} postings) to {} and {}",
            summary.terms,
            summary.postings,
            self.lookup_path.display(),
            self.postings_path.display()
        );

        Ok(summary)
    }
}

/// Serialize `tree` in ascending term order.
///
/// Every term produces one lookup record pointing at its postings run. The
/// tree is drained with the destructive traversal and cannot be reused.
pub fn serialize<L, P>(tree: TermTree, lookup: &mut L, postings: &mut P) -> Result<IndexSummary>
where
    L: Write,
    P: Write,
{
    let mut summary = IndexSummary::default();
    let mut offset: u32 = 0;

    tree.try_drain(|term, list| -> Result<()> {
        let length = write_postings(postings, &list)?;

        lookup.write_all(&encode_term_field(&term))?;
        write_u32_le(lookup, offset)?;
        write_u32_le(lookup, length)?;

        offset = match offset.checked_add(length) {
            Some(next) => next,
            None => bail!("Postings stream exceeds 4 GiB at term '{}'", term),
        };

        summary.terms += 1;
        summary.postings += list.len();
        Ok(())
    })?;

    summary.lookup_bytes = (summary.terms * LOOKUP_RECORD_SIZE) as u64;
    summary.postings_bytes = offset as u64;
    debug!("serialized {} lookup bytes, {} postings bytes", summary.lookup_bytes, summary.postings_bytes);

    Ok(summary)
}

/// Write one postings run, newest entry first, returning its byte length
fn write_postings<P: Write>(postings: &mut P, list: &PostingList) -> Result<u32> {
    let mut length: u32 = 0;
    for entry in list.iter() {
        write_u32_le(postings, entry.doc_id)?;
        write_u32_le(postings, entry.frequency)?;
        length = length
            .checked_add(POSTING_RECORD_SIZE as u32)
            .context("Postings run exceeds 4 GiB")?;
    }
    Ok(length)
}

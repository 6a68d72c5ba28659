//! # tagsearch - Ranked Search over Tagged Document Collections
//!
//! tagsearch indexes SGML-style tagged collections (one `<DOC>` per
//! article, with `<DOCNO>` and `<TEXT>` sections) into a compact on-disk
//! inverted index, and answers free-text queries with a ranked document
//! list.
//!
//! ## Architecture
//!
//! - [`index`] - Term tree, binary index writer and memory-mapped reader
//! - [`query`] - Per-document score accumulation and ranking
//! - [`output`] - Result and dump formatting, external identifiers
//! - [`utils`] - Markup tokenizer, configuration, encoding helpers
//!
//! ## Quick Start
//!
//! ```no_run
//! use tagsearch::index::IndexReader;
//! use tagsearch::query::QueryExecutor;
//! use std::path::Path;
//!
//! let reader = IndexReader::open(Path::new(".")).unwrap();
//! let results = QueryExecutor::new(&reader).search("oil prices").unwrap();
//!
//! for result in results {
//!     println!("{} {:.6}", result.doc_id, result.score);
//! }
//! ```
//!
//! ## Index Format
//!
//! Two files, both little-endian:
//!
//! 1. **`lookup.bin`** - 28-byte records `[term:20][offset:4][length:4]`,
//!    sorted by term. Terms are cut to 19 bytes and NUL padded.
//! 2. **`postings.bin`** - 8-byte records `[doc:4][frequency:4]`, one run
//!    per term, addressed by the lookup record.

pub mod index;
pub mod output;
pub mod query;
pub mod utils;

pub mod build;
pub mod postings;
pub mod reader;
pub mod stats;
pub mod traversal;
pub mod tree;
pub mod types;
pub mod writer;

pub use build::{BuildReport, Indexer};
pub use reader::{IndexReader, LookupStrategy};
pub use tree::TermTree;
pub use types::*;
pub use writer::IndexWriter;

//! Utility functions and data structures.
//!
//! ## Modules
//!
//! - [`config`] - JSON configuration with per-field defaults
//! - [`encoding`] - Fixed-width term fields and little-endian integers
//! - [`progress`] - Progress bar, or a no-op without the `progress` feature
//! - [`tokenizer`] - Tag and word extraction from tagged collections
//!
//! ## Key Functions
//!
//! ```
//! use tagsearch::utils::{tokenize_bytes, MarkupEvent};
//!
//! let mut events: Vec<MarkupEvent> = Vec::new();
//! tokenize_bytes(b"<TEXT>Hello World</TEXT>", &mut events);
//! assert_eq!(events[1], MarkupEvent::Word("hello".to_string()));
//! ```

pub mod config;
pub mod encoding;
pub mod progress;
pub mod tokenizer;

pub use config::*;
pub use encoding::*;
pub use tokenizer::*;

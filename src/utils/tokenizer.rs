//! Byte-level tokenizer for SGML-style tagged document collections.
//!
//! The tokenizer does not build a tree of the markup. It reports a flat
//! stream of start tags, end tags and words to a [`MarkupSink`], and the
//! sink decides what each word means based on the tags around it.

use std::io::{self, BufReader, Read};

/// Receives the tokens found in a markup stream
pub trait MarkupSink {
    /// `<name>`; `name` may be empty
    fn start_tag(&mut self, name: &str);
    /// `</name>`; `name` may be empty
    fn end_tag(&mut self, name: &str);
    /// A lowercased alphanumeric word of at least two bytes
    fn word(&mut self, word: &str);
}

/// A single token, for sinks that just want to record the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    StartTag(String),
    EndTag(String),
    Word(String),
}

impl MarkupSink for Vec<MarkupEvent> {
    fn start_tag(&mut self, name: &str) {
        self.push(MarkupEvent::StartTag(name.to_string()));
    }

    fn end_tag(&mut self, name: &str) {
        self.push(MarkupEvent::EndTag(name.to_string()));
    }

    fn word(&mut self, word: &str) {
        self.push(MarkupEvent::Word(word.to_string()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Word,
    StartTag,
    EndTag,
}

/// Token being assembled
struct Pending {
    // Only ASCII alphanumerics are ever pushed
    buf: String,
    kind: TokenKind,
}

impl Pending {
    fn new() -> Self {
        Self {
            buf: String::with_capacity(64),
            kind: TokenKind::Word,
        }
    }

    fn push(&mut self, byte: u8) {
        self.buf.push(byte.to_ascii_lowercase() as char);
    }

    /// Close the current token and hand it to `sink`
    fn flush<S: MarkupSink>(&mut self, sink: &mut S) {
        match self.kind {
            TokenKind::StartTag => sink.start_tag(&self.buf),
            TokenKind::EndTag => sink.end_tag(&self.buf),
            TokenKind::Word if self.buf.len() > 1 => sink.word(&self.buf),
            TokenKind::Word => {}
        }
        self.buf.clear();
        self.kind = TokenKind::Word;
    }
}

/// Tokenize `reader` into `sink`.
///
/// - ASCII letters and digits are lowercased into the current token
/// - `<` closes the current token and starts a tag; `</` starts an end tag
/// - `&` skips an entity up to and including its `;`
/// - `'` is dropped along with a directly following `s`
/// - space, newline, `>` and `-` close the current token
/// - every other byte is ignored without closing the token
///
/// A token still open at end of input is flushed.
pub fn tokenize<R: Read, S: MarkupSink>(reader: R, sink: &mut S) -> io::Result<()> {
    let mut bytes = BufReader::with_capacity(64 * 1024, reader).bytes();
    let mut pending = Pending::new();
    let mut next = bytes.next().transpose()?;

    while let Some(byte) = next {
        next = bytes.next().transpose()?;

        match byte {
            b if b.is_ascii_alphanumeric() => pending.push(b),
            b'<' => {
                pending.flush(sink);
                pending.kind = TokenKind::StartTag;
                if next == Some(b'/') {
                    pending.kind = TokenKind::EndTag;
                    next = bytes.next().transpose()?;
                }
            }
            b'&' => {
                let mut current = next;
                while let Some(b) = current {
                    if b == b';' {
                        break;
                    }
                    current = bytes.next().transpose()?;
                }
                next = match current {
                    Some(_) => bytes.next().transpose()?,
                    None => None,
                };
            }
            b'\'' => {
                if next == Some(b's') {
                    next = bytes.next().transpose()?;
                }
            }
            b' ' | b'>' | b'-' | b'\n' => pending.flush(sink),
            _ => {}
        }
    }

    if pending.kind != TokenKind::Word || !pending.buf.is_empty() {
        pending.flush(sink);
    }
    Ok(())
}

/// Tokenize an in-memory buffer
pub fn tokenize_bytes<S: MarkupSink>(data: &[u8], sink: &mut S) {
    // Reading from a slice cannot fail
    let _ = tokenize(data, sink);
}

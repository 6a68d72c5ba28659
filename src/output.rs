//! Output formatting for ranked results and index dumps

use crate::index::types::{DocId, LookupRecord, PostingEntry};
use crate::query::executor::RankedDoc;
use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Rebuild the external document number from an internal id.
///
/// The internal id keeps only the digits after the collection prefix and
/// the first digit of the year, with leading zeros dropped. The missing
/// digits are restored from the length and leading digit of the id:
///
/// - 7 digits: `900` (1990 dates whose month starts with 0)
/// - 8 digits: `90` (1990 dates whose year digit was followed by 0)
/// - leading `1` or `2`: `9` (1991 and 1992)
/// - leading `6` to `9`: `8` (1986 to 1989)
/// - anything else: nothing
///
/// The result is split after its ninth byte with a `-` and cut to 14 bytes,
/// e.g. `WSJ870324-0001`. Results shorter than nine bytes are returned
/// without a separator.
pub fn format_external_id(prefix: &str, doc_id: DocId) -> String {
    let digits = doc_id.to_string();
    let pad = match (digits.len(), digits.as_bytes()[0]) {
        (7, _) => "900",
        (8, _) => "90",
        (_, b'1' | b'2') => "9",
        (_, b'6'..=b'9') => "8",
        _ => "",
    };

    let joined = format!("{}{}{}", prefix, pad, digits);
    if joined.len() < 9 || !joined.is_char_boundary(9) {
        return joined;
    }

    let mut id = String::with_capacity(14);
    id.push_str(&joined[..9]);
    id.push('-');
    for ch in joined[9..].chars() {
        if id.len() + ch.len_utf8() > 14 {
            break;
        }
        id.push(ch);
    }
    id
}

/// Downgrade `Auto` to `Never` when stdout is not a terminal
pub fn color_choice(requested: ColorChoice) -> ColorChoice {
    match requested {
        ColorChoice::Auto if !io::stdout().is_terminal() => ColorChoice::Never,
        other => other,
    }
}

/// Stdout stream honoring `choice`
pub fn stdout(choice: ColorChoice) -> StandardStream {
    StandardStream::stdout(choice)
}

/// Print ranked results, one `<external id> <score>` line each
pub fn print_results<W: WriteColor>(out: &mut W, results: &[RankedDoc], prefix: &str) -> io::Result<()> {
    for result in results {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{}", format_external_id(prefix, result.doc_id))?;
        out.reset()?;
        writeln!(out, " {:.6}", result.score)?;
    }
    Ok(())
}

/// Print one lookup record of an index dump
pub fn print_dump_entry<W: Write>(out: &mut W, record: &LookupRecord, postings: &[PostingEntry]) -> io::Result<()> {
    writeln!(
        out,
        "Word: {}, \tPostings Location: {}, Postings Length: {}",
        record.term, record.offset, record.length
    )?;
    for entry in postings {
        writeln!(out, "\tDoc Number: {}, Occurrence: {}", entry.doc_id, entry.frequency)?;
    }
    Ok(())
}

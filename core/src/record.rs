//! Line format shared by the parser (writer) and the index builder (reader):
//! `title \x03 body \x03 url \n`, one document per line.

use crate::error::{Error, Result};
use crate::store::Document;

pub const RECORD_SEPARATOR: char = '\u{3}';

/// `line_no` is 1-based and only used for error reporting.
pub fn parse_record(line: &str, line_no: usize) -> Result<Document> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fields: Vec<&str> = line.split(RECORD_SEPARATOR).collect();
    match fields.as_slice() {
        [title, body, url] => Ok(Document {
            title: (*title).to_string(),
            body: (*body).to_string(),
            url: (*url).to_string(),
        }),
        _ => Err(Error::MalformedRecord {
            line: line_no,
            reason: format!("expected 3 fields, found {}", fields.len()),
        }),
    }
}

/// Serializes a document as one record line, trailing newline included.
/// Separator bytes and line breaks inside fields are replaced by spaces so the
/// line always splits back into the same three fields.
pub fn format_record(doc: &Document) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .map(|c| if c == RECORD_SEPARATOR || c == '\n' || c == '\r' { ' ' } else { c })
            .collect()
    };
    let mut out = clean(&doc.title);
    out.push(RECORD_SEPARATOR);
    out.push_str(&clean(&doc.body));
    out.push(RECORD_SEPARATOR);
    out.push_str(&clean(&doc.url));
    out.push('\n');
    out
}

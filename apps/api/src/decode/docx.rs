//! Raw text from a DOCX file.
//!
//! DOCX is a ZIP archive; the body lives in `word/document.xml`. Only text
//! runs are kept: each paragraph ends with `\n`, `w:tab` becomes a tab and
//! `w:br`/`w:cr` become line breaks. Styling is ignored.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::decode::{DecodeError, MAX_EXPANDED_BYTES};

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_text(data: &[u8]) -> Result<String, DecodeError> {
    extract_text_capped(data, MAX_EXPANDED_BYTES)
}

/// Reads the document part without inflating more than `limit` bytes. Both the
/// declared entry size and the bytes actually inflated are checked, since the
/// header can lie.
fn extract_text_capped(data: &[u8], limit: usize) -> Result<String, DecodeError> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| DecodeError::Malformed(format!("Failed to open DOCX archive: {e}")))?;

    let entry = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| DecodeError::Malformed(format!("DOCX has no {DOCUMENT_PART}: {e}")))?;

    if entry.size() > limit as u64 {
        return Err(too_large(limit));
    }

    let mut xml = String::new();
    entry
        .take(limit as u64 + 1)
        .read_to_string(&mut xml)
        .map_err(|e| DecodeError::Malformed(format!("Failed to read {DOCUMENT_PART}: {e}")))?;

    if xml.len() > limit {
        return Err(too_large(limit));
    }

    text_from_document_xml(&xml)
}

fn too_large(limit: usize) -> DecodeError {
    DecodeError::Malformed(format!(
        "DOCX content expands beyond {limit} bytes; the file is too large to process"
    ))
}

fn text_from_document_xml(xml: &str) -> Result<String, DecodeError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" | b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| DecodeError::Malformed(format!("Bad text in DOCX: {e}")))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DecodeError::Malformed(format!("DOCX XML parse error: {e}")));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

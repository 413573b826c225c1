//! Text extraction from PDF and DOCX documents

use crate::error::{PrepScoreError, Result};
use crate::input::file_detector::{DocumentKind, MIME_DOCX, MIME_PDF};
use std::io::Read;

/// Cap on the decompressed size of a single ZIP entry.
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Extract plain text from in-memory document bytes by declared MIME type.
pub fn extract_text(bytes: &[u8], mime: &str) -> Result<String> {
    match DocumentKind::from_mime(mime) {
        DocumentKind::Pdf => extract_pdf(bytes),
        DocumentKind::Docx => extract_docx(bytes),
        DocumentKind::Unknown => Err(PrepScoreError::UnsupportedFormat(format!(
            "unsupported MIME type '{}'; accepted: {}, {}",
            mime, MIME_PDF, MIME_DOCX
        ))),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PrepScoreError::Decode(format!("PDF extraction failed: {}", e)))
}

/// Pull `word/document.xml` out of the DOCX container and walk its `w:t`
/// text runs. Paragraph ends become newlines so line-based section
/// detection still works downstream.
fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| PrepScoreError::Decode(format!("DOCX is not a valid archive: {}", e)))?;

    let entry = archive
        .by_name("word/document.xml")
        .map_err(|_| PrepScoreError::Decode("word/document.xml not found".to_string()))?;
    let mut doc_xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut doc_xml)
        .map_err(|e| PrepScoreError::Decode(format!("DOCX read failed: {}", e)))?;
    if doc_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(PrepScoreError::Decode(
            "word/document.xml exceeds size limit".to_string(),
        ));
    }

    walk_text_runs(&doc_xml)
}

fn walk_text_runs(xml: &[u8]) -> Result<String> {
    let mut out = String::new();
    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut in_text = false;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            }
            Ok(quick_xml::events::Event::Text(te)) if in_text => {
                out.push_str(te.unescape().unwrap_or_default().as_ref());
                in_text = false;
            }
            Ok(quick_xml::events::Event::End(e)) => {
                match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"p" => out.push('\n'),
                    _ => {}
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => {
                return Err(PrepScoreError::Decode(format!(
                    "DOCX XML parse failed: {}",
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

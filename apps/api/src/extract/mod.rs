//! Text Extractor — converts an uploaded resume (PDF or DOCX) to plain text.
//!
//! Failures are a typed error rather than a marker substring in the returned
//! text; the analyze handler turns them into the user-facing message.

use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type. Please upload a PDF or DOCX file.")]
    UnsupportedType,

    #[error("Error processing file: {0}")]
    Parse(String),
}

/// Extracts plain text from an uploaded document, dispatching on the file
/// extension (case-insensitive). PDF pages are concatenated in page order;
/// DOCX paragraphs are joined with newlines in document order.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => extract_pdf(bytes),
        Some("docx") => extract_docx(bytes),
        _ => Err(ExtractError::UnsupportedType),
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Parse(e.to_string()))
}

/// A .docx file is a zip archive; the document body lives in
/// `word/document.xml`. Text runs are `<w:t>` elements, paragraphs `<w:p>`.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive =
        zip::ZipArchive::new(cursor).map_err(|e| ExtractError::Parse(e.to_string()))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Parse(e.to_string()))?
        .read_to_string(&mut document_xml)
        .map_err(|e| ExtractError::Parse(e.to_string()))?;

    let mut reader = Reader::from_str(&document_xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t.unescape().map_err(|e| ExtractError::Parse(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Parse(e.to_string())),
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn synth_docx(document_xml: &str) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("word/document.xml", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    const TWO_PARAGRAPH_DOC: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
        "<w:body>",
        "<w:p><w:r><w:t>Senior Rust Engineer</w:t></w:r></w:p>",
        "<w:p><w:r><w:t>5 years of </w:t></w:r><w:r><w:t>systems experience</w:t></w:r></w:p>",
        "</w:body></w:document>",
    );

    #[test]
    fn test_docx_paragraphs_in_order() {
        let bytes = synth_docx(TWO_PARAGRAPH_DOC);
        let text = extract_text("resume.docx", &bytes).unwrap();
        assert_eq!(text, "Senior Rust Engineer\n5 years of systems experience");
    }

    #[test]
    fn test_docx_extension_is_case_insensitive() {
        let bytes = synth_docx(TWO_PARAGRAPH_DOC);
        assert!(extract_text("Resume.DOCX", &bytes).is_ok());
    }

    #[test]
    fn test_pdf_yields_nonempty_text() {
        let sentence = "Senior Rust Engineer with five years of systems experience";
        let pdf = crate::render::render_pdf(&format!("<p>{sentence}</p>")).unwrap();
        let text = extract_text("resume.pdf", &pdf).unwrap();
        assert!(text.contains(sentence), "extracted: {text:?}");
    }

    #[test]
    fn test_unsupported_extension() {
        let result = extract_text("resume.txt", b"plain text");
        assert!(matches!(result, Err(ExtractError::UnsupportedType)));
    }

    #[test]
    fn test_missing_extension() {
        let result = extract_text("resume", b"bytes");
        assert!(matches!(result, Err(ExtractError::UnsupportedType)));
    }

    #[test]
    fn test_corrupt_pdf_is_parse_error() {
        let result = extract_text("resume.pdf", b"definitely not a pdf");
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[test]
    fn test_corrupt_docx_is_parse_error() {
        let result = extract_text("resume.docx", b"not a zip archive");
        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }
}

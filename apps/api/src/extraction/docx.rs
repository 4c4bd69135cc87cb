//! DOCX text extraction.
//!
//! A DOCX file is a zip archive; the document body lives in
//! `word/document.xml`. Paragraph text (`<w:t>` runs inside `<w:p>`) is
//! concatenated in document order, one paragraph per line.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DocxError {
    #[error("not a valid DOCX archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("missing word/document.xml")]
    MissingDocumentXml,

    #[error("malformed document.xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub(crate) fn extract_paragraphs(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| DocxError::MissingDocumentXml)?
        .read_to_string(&mut document_xml)?;

    parse_document_xml(&document_xml)
}

fn parse_document_xml(xml: &str) -> Result<String, DocxError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(ref e) if e.name().as_ref() == b"w:t" => in_text_run = false,
            Event::Text(ref t) if in_text_run => {
                text.push_str(&t.unescape()?);
            }
            // Tab and line-break elements inside runs become whitespace.
            Event::Empty(ref e) if e.name().as_ref() == b"w:tab" => text.push(' '),
            Event::Empty(ref e) if e.name().as_ref() == b"w:br" => text.push('\n'),
            Event::End(ref e) if e.name().as_ref() == b"w:p" => text.push('\n'),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_with_body(body_xml: &str) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            let document = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body_xml}</w:body></w:document>"#
            );
            writer.write_all(document.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_paragraphs_one_per_line_in_order() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Second paragraph</w:t></w:r></w:p>",
        );
        let text = extract_paragraphs(&bytes).unwrap();
        assert_eq!(text, "First paragraph\nSecond paragraph\n");
    }

    #[test]
    fn test_split_runs_are_joined_within_a_paragraph() {
        let bytes = docx_with_body(
            "<w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p>",
        );
        let text = extract_paragraphs(&bytes).unwrap();
        assert_eq!(text, "Hello world\n");
    }

    #[test]
    fn test_entities_unescaped() {
        let bytes = docx_with_body("<w:p><w:r><w:t>R&amp;D engineer</w:t></w:r></w:p>");
        let text = extract_paragraphs(&bytes).unwrap();
        assert_eq!(text, "R&D engineer\n");
    }

    #[test]
    fn test_missing_document_xml() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("other.txt", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"nope").unwrap();
            writer.finish().unwrap();
        }
        let result = extract_paragraphs(&cursor.into_inner());
        assert!(matches!(result, Err(DocxError::MissingDocumentXml)));
    }

    #[test]
    fn test_non_zip_bytes_rejected() {
        assert!(matches!(
            extract_paragraphs(b"plain text"),
            Err(DocxError::Archive(_))
        ));
    }
}

use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::Read as _;
use std::path::Path;

/// Extracts paragraph text from a Word document (a zip archive holding
/// WordprocessingML), paragraphs space-joined.
pub fn extract_text(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("word/document.xml missing from archive")?
        .read_to_string(&mut xml)?;

    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    // Runs outside any w:p element still count as content.
    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join(" "))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write as _;
    use std::path::Path;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    pub(crate) fn write_minimal_docx(path: &Path, paragraphs: &[&str]) {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );

        let file = std::fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn paragraphs_join_with_spaces() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>First paragraph</w:t></w:r></w:p><w:p><w:r><w:t>Second</w:t></w:r><w:r><w:t> half</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(
            parse_document_xml(xml).unwrap(),
            "First paragraph Second half"
        );
    }

    #[test]
    fn empty_paragraphs_contribute_empty_segments() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p/><w:p><w:r><w:t>Only</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(parse_document_xml(xml).unwrap(), "Only");
    }

    #[test]
    fn entities_are_unescaped() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>AML &amp; KYC</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(parse_document_xml(xml).unwrap(), "AML & KYC");
    }

    #[test]
    fn archive_without_document_xml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file("unrelated.txt", options).unwrap();
        writer.write_all(b"nothing").unwrap();
        writer.finish().unwrap();

        assert!(extract_text(&path).is_err());
    }

    #[test]
    fn roundtrip_through_archive() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.docx");
        write_minimal_docx(&path, &["Hello", "world"]);
        assert_eq!(extract_text(&path).unwrap(), "Hello world");
    }
}

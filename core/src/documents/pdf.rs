use anyhow::Result;
use lopdf::Document;
use std::path::Path;

/// Extracts the text of every page, space-joined in page order. A page with
/// no extractable text contributes an empty segment rather than an error.
pub fn extract_text(path: &Path) -> Result<String> {
    let doc = Document::load(path)?;

    let pages: Vec<String> = doc
        .get_pages()
        .keys()
        .map(|page| {
            doc.extract_text(&[*page])
                .map(|text| text.trim().to_string())
                .unwrap_or_default()
        })
        .collect();

    Ok(pages.join(" "))
}

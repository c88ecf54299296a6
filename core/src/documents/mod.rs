pub mod docx;
pub mod pdf;

use crate::error::LoadError;
use std::path::Path;

/// Reads every supported document in `dir` and returns their extracted text,
/// newline-joined in directory-enumeration order. Enumeration order is
/// filesystem-dependent and not guaranteed stable.
///
/// Unsupported extensions are silently skipped. A file that fails to parse
/// contributes an empty string instead of aborting the batch. Only failure
/// to enumerate the directory itself is fatal.
pub fn load_documents(dir: &Path) -> Result<String, LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut docs = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        let result = match path.extension().and_then(|ext| ext.to_str()) {
            Some("pdf") => pdf::extract_text(&path),
            Some("docx") => docx::extract_text(&path),
            _ => continue,
        };

        match result {
            Ok(text) => docs.push(text),
            Err(e) => {
                tracing::warn!("Failed to extract text from {}: {}", path.display(), e);
                docs.push(String::new());
            }
        }
    }

    Ok(docs.join("\n"))
}

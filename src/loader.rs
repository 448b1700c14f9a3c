// WHY: Newline normalization is length-preserving so report offsets computed
// by the checker line up byte-for-byte with the text the renderer loads

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

/// Read a UTF-8 document and flatten line breaks to spaces.
pub fn load_document(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    debug!("Loaded {} bytes from {}", raw.len(), path.display());
    Ok(normalize_text(&raw))
}

/// Replace every `\r` and `\n` with a space. Byte length is unchanged, so
/// offsets into the normalized text are also offsets into the file.
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

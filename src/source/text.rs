use std::fs;
use std::path::Path;

use icu_normalizer::ComposingNormalizerBorrowed;

use crate::config::CharCase;
use crate::source::LoadError;

pub const LOREM_TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis \
nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.";

/// Reads a plain-text file for typing, resolved against the working
/// directory when relative.
pub fn load_text_file(path: &Path) -> Result<String, LoadError> {
    let resolved = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let raw = fs::read_to_string(&resolved).map_err(|source| LoadError::Read {
        path: resolved.clone(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Err(LoadError::EmptyText(resolved.display().to_string()));
    }
    Ok(raw)
}

/// Line breaks and tabs become spaces; Enter and Tab are not typing keys.
pub fn flatten_whitespace(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .chars()
        .map(|ch| if ch == '\n' || ch == '\t' || ch == '\r' { ' ' } else { ch })
        .collect()
}

/// Turns raw text into what gets typed: NFC-composed so one glyph is one
/// keystroke, whitespace flattened, trailing whitespace dropped, then cased.
pub fn prepare_text(raw: &str, case: CharCase) -> String {
    let composed = ComposingNormalizerBorrowed::new_nfc().normalize(raw);
    let flattened = flatten_whitespace(&composed);
    case.apply(flattened.trim_end())
}

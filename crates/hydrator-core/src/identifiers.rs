//! Name normalization.
//!
//! Source names, condition names, cast option names and cache keys are all
//! compared in one canonical camel-case form so that `"query_string"`,
//! `"Query-String"` and `"query string"` refer to the same entry.

use crate::error::{Error, Result};

/// Canonicalize an identifier into lower camel case.
///
/// The whole string is lower-cased, every character outside
/// `[a-z0-9_\- ]` is dropped, `_` and `-` become word breaks, each word is
/// capitalised, the breaks are removed and the first character is
/// lower-cased again.
///
/// ```
/// use hydrator_core::identifiers::normalize;
///
/// assert_eq!(normalize("XyZ_abc-def").unwrap(), "xyzAbcDef");
/// assert_eq!(normalize("xyz abc def").unwrap(), "xyzAbcDef");
/// ```
///
/// Fails with [`Error::EmptyResult`] when nothing survives.
pub fn normalize(name: &str) -> Result<String> {
    let lowered = name.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut word_start = true;

    for ch in lowered.chars() {
        match ch {
            'a'..='z' | '0'..='9' => {
                if word_start {
                    out.push(ch.to_ascii_uppercase());
                } else {
                    out.push(ch);
                }
                word_start = false;
            }
            '_' | '-' | ' ' => word_start = true,
            _ => {}
        }
    }

    let mut chars = out.chars();
    let Some(first) = chars.next() else {
        return Err(Error::EmptyResult {
            input: name.to_string(),
        });
    };
    let mut normalized = String::with_capacity(out.len());
    normalized.push(first.to_ascii_lowercase());
    normalized.push_str(chars.as_str());
    Ok(normalized)
}

/// Normalize and upper-case the first character, for use inside cache keys.
pub fn normalize_pascal(name: &str) -> Result<String> {
    let normalized = normalize(name)?;
    let mut chars = normalized.chars();
    Ok(match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => normalized,
    })
}

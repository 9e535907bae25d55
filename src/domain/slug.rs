//! Slug derivation for editor-created posts.
//!
//! Titles are lowercased and every run of characters outside `[a-z0-9]`
//! collapses to a single `-`, with leading and trailing dashes trimmed. The
//! `slug` crate handles the ASCII folding so accented titles keep their
//! letters (`Café` becomes `cafe`).

use slug::slugify;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a URL slug from a human-readable title.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

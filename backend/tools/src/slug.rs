//! URL slugs from free text.
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("empty string not permitted")]
    Empty,
    #[error("slug created with a length of zero")]
    NoSlugCharacters,
}

/// Lowercase `s`, collapse every run of characters outside `[a-z0-9]` into a
/// single `-`, and trim leading and trailing dashes.
pub fn slugify(s: &str) -> Result<String, SlugError> {
    if s.is_empty() {
        return Err(SlugError::Empty);
    }

    let lowered = s.to_lowercase();
    let slug = NON_SLUG_CHARS.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        return Err(SlugError::NoSlugCharacters);
    }
    Ok(slug.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_slugs() {
        assert_eq!(slugify("Now is the time 123").unwrap(), "now-is-the-time-123");
        assert_eq!(slugify("  --Hello,   World!!--  ").unwrap(), "hello-world");
        assert_eq!(slugify("already-a-slug").unwrap(), "already-a-slug");
    }

    #[test]
    fn non_ascii_letters_become_separators() {
        assert_eq!(slugify("Café au lait").unwrap(), "caf-au-lait");
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert_eq!(slugify(""), Err(SlugError::Empty));
        assert_eq!(slugify("!!! ???"), Err(SlugError::NoSlugCharacters));
        assert_eq!(slugify("日本語"), Err(SlugError::NoSlugCharacters));
    }
}

//! Log Redaction
//!
//! Client-supplied file names are attacker-controlled: they can be huge or
//! carry control characters that forge log lines. Scrub them before logging.

use regex::Regex;
use std::sync::LazyLock;

static CONTROL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{Cc}").unwrap());

/// Longest stem kept verbatim.
const MAX_STEM_CHARS: usize = 48;

/// Make a client-supplied file name safe to log.
///
/// Control characters become `?`. Long stems are cut and marked with `~`
/// while the extension is kept, so `report.pdf` style information survives.
pub fn redact_file_name(name: &str) -> String {
    let clean = CONTROL_RE.replace_all(name, "?");

    let (stem, ext) = match clean.rfind('.') {
        Some(idx) if idx > 0 => clean.split_at(idx),
        _ => (&clean[..], ""),
    };

    if stem.chars().count() <= MAX_STEM_CHARS {
        return clean.into_owned();
    }

    let mut out: String = stem.chars().take(MAX_STEM_CHARS).collect();
    out.push('~');
    out.push_str(ext);
    out
}

use std::collections::BTreeSet;

/// Whether a sniffed content type passes the allow-list.
///
/// An empty list allows everything. Otherwise the type must be listed
/// verbatim: no wildcards, no prefix matching, no parameter stripping.
pub fn is_allowed(content_type: &str, allow_list: &BTreeSet<String>) -> bool {
    allow_list.is_empty() || allow_list.contains(content_type)
}

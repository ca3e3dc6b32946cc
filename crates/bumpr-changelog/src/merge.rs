//! Section merging and file normalization

use std::sync::OnceLock;

use regex::Regex;

/// Prepend `section` to `existing` unless `existing` already starts with it.
///
/// Merging the same section twice leaves the content unchanged. A file that
/// holds nothing but the normalized section also counts as already merged.
pub fn merge_section(existing: &str, section: &str) -> String {
    if existing.starts_with(section) || normalize(section) == existing {
        return existing.to_string();
    }
    format!("{}{}", section, existing)
}

fn leading_blank_lines() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\A(?:[ \t]*\r?\n){2,}").ok())
        .as_ref()
}

fn trailing_blank_lines() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\r?\n[ \t]*){2,}\z").ok())
        .as_ref()
}

/// Collapse two or more blank lines at the very start or end of `content`
/// into a single newline
pub fn normalize(content: &str) -> String {
    let mut out = content.to_string();
    if let Some(re) = leading_blank_lines() {
        out = re.replace(&out, "\n").into_owned();
    }
    if let Some(re) = trailing_blank_lines() {
        out = re.replace(&out, "\n").into_owned();
    }
    out
}

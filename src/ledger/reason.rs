//! Reason-tag codec.
//!
//! The points table has no category column: whether an entry is a presence
//! grant, an operator-defined extra, or a patrol bonus is encoded in the
//! free-text `reason`, always suffixed with `" em {activity title}"`. This
//! module is the only place that generates or parses those strings; the rest
//! of the crate works with [`EntryCategory`].

use chrono::Utc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Extra categories every roll sheet starts with.
pub const DEFAULT_EXTRA_LABELS: [&str; 2] = ["Uniforme", "Comportamento"];

/// Semantic category of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryCategory {
    Presence,
    PatrolBonus,
    /// Operator-defined extra; carries the decoded label.
    Extra(String),
}

pub fn presence_reason(title: &str) -> String {
    format!("Presença em {title}")
}

pub fn bonus_reason(title: &str) -> String {
    format!("Bônus patrulha em {title}")
}

pub fn extra_reason(label: &str, title: &str) -> String {
    format!("{label} em {title}")
}

/// Classify a reason against an activity title. Exact equality against the
/// two fixed encodings wins; everything else is an extra whose label is the
/// reason with the trailing `" em {title}"` removed. A reason without that
/// suffix keeps its full text as the label (best-effort: foreign-looking
/// reasons must not fail, see hydration).
pub fn classify(reason: &str, title: &str) -> EntryCategory {
    if reason == presence_reason(title) {
        EntryCategory::Presence
    } else if reason == bonus_reason(title) {
        EntryCategory::PatrolBonus
    } else {
        EntryCategory::Extra(decode_label(reason, title).to_string())
    }
}

/// Strip the literal `" em {title}"` suffix; the title is matched verbatim,
/// never as a pattern.
pub fn decode_label<'a>(reason: &'a str, title: &str) -> &'a str {
    let suffix = format!(" em {title}");
    reason.strip_suffix(suffix.as_str()).unwrap_or(reason)
}

/// Stable key for an extra definition: lowercase, NFD-normalize and drop
/// combining marks, collapse runs of non-alphanumerics to one hyphen, trim
/// hyphens. `slug("Pontualidade & Zelo")` is `"pontualidade-zelo"`.
pub fn slug(label: &str) -> String {
    let lowered = label.to_lowercase();
    let stripped: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let mut out = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// Slug with a time-based synthetic fallback for labels that slug to nothing.
pub fn slug_or_synthetic(label: &str) -> String {
    let s = slug(label);
    if s.is_empty() {
        format!("extra-{}", Utc::now().timestamp_millis())
    } else {
        s
    }
}

//! Bounded-length shortening of rendered messages.

use std::borrow::Cow;

/// Marker appended to truncated messages unless configured otherwise.
pub const DEFAULT_TRUNCATED_TEXT: &str = "_TRUNCATED_";

/// Shortens `text` to at most `limit` characters, ending it with `marker` when the marker fits.
///
/// A missing, zero or negative `limit` disables truncation. Text is left alone as long as it is
/// no longer than `limit` plus the marker length. Lengths are counted in Unicode scalar values.
///
/// ```
/// use json_diag_logger::truncate;
///
/// assert_eq!(truncate("abcdefghijklmnop", Some(8), "..."), "abcde...");
/// assert_eq!(truncate("abcdefghijklmnop", Some(2), "..."), "ab");
/// assert_eq!(truncate("abcdefghijk", Some(8), "..."), "abcdefghijk");
/// assert_eq!(truncate("abcdefghijklmnop", None, "..."), "abcdefghijklmnop");
/// ```
#[must_use]
pub fn truncate<'a>(text: &'a str, limit: Option<i64>, marker: &str) -> Cow<'a, str> {
    let Some(limit) = limit
        .filter(|limit| *limit > 0)
        .and_then(|limit| usize::try_from(limit).ok())
    else {
        return Cow::Borrowed(text);
    };

    let marker_len = marker.chars().count();
    if text.chars().count() <= limit.saturating_add(marker_len) {
        return Cow::Borrowed(text);
    }

    if limit > marker_len {
        let mut shortened = prefix(text, limit - marker_len).to_string();
        shortened.push_str(marker);
        Cow::Owned(shortened)
    } else {
        Cow::Borrowed(prefix(text, limit))
    }
}

/// The first `count` characters of `text`.
fn prefix(text: &str, count: usize) -> &str {
    text.char_indices()
        .nth(count)
        .and_then(|(end, _)| text.get(..end))
        .unwrap_or(text)
}

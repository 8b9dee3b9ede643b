//! Escaping and cleanup of raw post bodies.
//!
//! Everything downstream of [`sanitize`] works on escaped text: the link
//! and greentext patterns look for `&gt;`, never a raw `>`.

use std::borrow::Cow;

use crate::post::Capcode;

/// Opening wrapper the upstream board used for administrator posts.
const ADMIN_DIV_OPEN: &str = r#"<div style="padding: 5px;margin-left: .5em;border-color: #faa;border: 2px dashed rgba(255,0,0,.1);border-radius: 2px">"#;
const ADMIN_DIV_CLOSE: &str = "</div>";

/// Inline variant of the administrator wrapper. Its body was closed with a
/// spoiler tag rather than a matching `</span>`.
const ADMIN_SPAN_OPEN: &str = r#"<span style="padding: 5px;margin-left: .5em;border-color: #faa;border: 2px dashed rgba(255,0,0,.1);border-radius: 2px">"#;
const ADMIN_SPAN_CLOSE: &str = "[/spoiler]";

/// Sanitize a raw post body: drop legacy administrator wrappers, then
/// escape the text for HTML.
///
/// # Example
///
/// ```
/// use kako_renderer::{Capcode, sanitize::sanitize};
///
/// assert_eq!(sanitize("<b> & &amp;", Capcode::None), "&lt;b&gt; &amp; &amp;");
/// ```
pub fn sanitize(comment: &str, capcode: Capcode) -> String {
    escape_text(strip_admin_wrapper(comment, capcode)).into_owned()
}

/// Remove the legacy administrator formatting from the start (and matching
/// closer from the end) of an admin post body.
///
/// Bodies of other capcodes are returned untouched.
pub fn strip_admin_wrapper(comment: &str, capcode: Capcode) -> &str {
    if capcode != Capcode::Admin {
        return comment;
    }

    let mut comment = comment;
    for (open, close) in [
        (ADMIN_DIV_OPEN, ADMIN_DIV_CLOSE),
        (ADMIN_SPAN_OPEN, ADMIN_SPAN_CLOSE),
    ] {
        if let Some(rest) = comment.strip_prefix(open) {
            comment = rest.strip_suffix(close).unwrap_or(rest);
        }
    }
    comment
}

/// Escape `&`, `<`, `>` and `"` without double-encoding entities that are
/// already well formed.
///
/// Applying it twice gives the same result as applying it once.
pub fn escape_text(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + s.len() / 8);
    for (i, c) in s.char_indices() {
        match c {
            '&' if entity_len(&s[i..]).is_some() => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape `&`, `<`, `>` and `"` unconditionally.
///
/// Used for short display fields (names, titles) which are never
/// pre-escaped.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Decode bytes as UTF-8, dropping invalid sequences instead of failing or
/// substituting replacement characters.
pub fn strip_invalid_utf8(bytes: &[u8]) -> Cow<'_, str> {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    Cow::Owned(out)
}

/// Longest reference name looked at, one more than
/// `CounterClockwiseContourIntegral`.
const MAX_ENTITY_NAME: usize = 32;

/// Length of the character reference at the start of `s` (`&amp;`,
/// `&#62;`, `&#x3e;`), if there is a well-formed one.
fn entity_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix('&')?;
    let end = body
        .bytes()
        .take(MAX_ENTITY_NAME + 1)
        .position(|b| b == b';')?;
    let name = &body[..end];

    let valid = if let Some(hex) = name.strip_prefix('#').and_then(|n| n.strip_prefix(['x', 'X'])) {
        !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit())
    } else if let Some(dec) = name.strip_prefix('#') {
        !dec.is_empty() && dec.bytes().all(|b| b.is_ascii_digit())
    } else {
        name.bytes().next().is_some_and(|b| b.is_ascii_alphabetic())
            && name.bytes().all(|b| b.is_ascii_alphanumeric())
    };

    valid.then_some(end + 2)
}

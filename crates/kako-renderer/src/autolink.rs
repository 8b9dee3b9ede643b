//! Turning bare URLs into anchors.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

// Word characters and whitespace are ASCII only: a URL may run through
// non-ASCII text, but only starts after an ASCII word character.
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^|[\t\n\x0B\x0C\r ]|\(|\])((?:https?://|www\.)(?-u:\w)+[^\t\n\x0B\x0C\r )<]+)")
        .unwrap()
});

/// What to link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkifyMode {
    /// Web addresses only.
    #[default]
    Url,
    /// Email addresses only. Posts never link emails, so this is a no-op.
    Email,
    Both,
}

/// Wrap `http://`, `https://` and `www.` runs in anchors.
///
/// A run must follow the start of the text, whitespace, `(` or `]`, and ends
/// at whitespace, `)` or `<`. Text inside existing anchors is never matched
/// again, so linking twice is the same as linking once.
///
/// # Example
///
/// ```
/// use kako_renderer::autolink::{LinkifyMode, autolink};
///
/// assert_eq!(
///     autolink("see https://example.org", LinkifyMode::Url, false),
///     r#"see <a href="https://example.org">https://example.org</a>"#
/// );
/// ```
pub fn autolink(text: &str, mode: LinkifyMode, target_blank: bool) -> Cow<'_, str> {
    if mode == LinkifyMode::Email {
        return Cow::Borrowed(text);
    }

    let target = if target_blank { r#" target="_blank""# } else { "" };
    URL.replace_all(text, format!(r#"$1<a href="$2"{target}>$2</a>"#).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::Capcode;
    use crate::sanitize::sanitize;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_links_at_start() {
        assert_eq!(
            autolink("http://a.org/x", LinkifyMode::Url, false),
            r#"<a href="http://a.org/x">http://a.org/x</a>"#
        );
    }

    #[test]
    fn test_www_with_target() {
        assert_eq!(
            autolink("go www.example.com now", LinkifyMode::Both, true),
            r#"go <a href="www.example.com" target="_blank">www.example.com</a> now"#
        );
    }

    #[test]
    fn test_stops_at_paren_and_tag() {
        assert_eq!(
            autolink("(https://a.org/b) https://c.org<br />", LinkifyMode::Url, false),
            r#"(<a href="https://a.org/b">https://a.org/b</a>) <a href="https://c.org">https://c.org</a><br />"#
        );
    }

    #[test]
    fn test_after_closing_bracket() {
        assert_eq!(
            autolink("[/b]https://a.org", LinkifyMode::Url, false),
            r#"[/b]<a href="https://a.org">https://a.org</a>"#
        );
    }

    #[test]
    fn test_requires_boundary() {
        assert_eq!(autolink("xhttp://a.org", LinkifyMode::Url, false), "xhttp://a.org");
        assert_eq!(autolink("http://", LinkifyMode::Url, false), "http://");
    }

    #[test]
    fn test_email_mode_is_noop() {
        assert_eq!(autolink("http://a.org", LinkifyMode::Email, false), "http://a.org");
    }

    #[test]
    fn test_case_insensitive_scheme() {
        assert_eq!(
            autolink("HTTP://A.ORG", LinkifyMode::Url, false),
            r#"<a href="HTTP://A.ORG">HTTP://A.ORG</a>"#
        );
    }

    #[test]
    fn test_ascii_boundaries() {
        assert_eq!(autolink("http://éa.org", LinkifyMode::Url, false), "http://éa.org");
        assert_eq!(
            autolink("http://a.org/é\u{a0}x", LinkifyMode::Url, false),
            "<a href=\"http://a.org/é\u{a0}x\">http://a.org/é\u{a0}x</a>"
        );
        assert_eq!(
            autolink("x\u{3000}http://a.org", LinkifyMode::Url, false),
            "x\u{3000}http://a.org"
        );
    }

    #[test]
    fn test_relinking_sanitized_output_escapes_first_anchor() {
        let link = |text: &str| {
            let escaped = sanitize(text, Capcode::None);
            autolink(&escaped, LinkifyMode::Url, false).into_owned()
        };

        let once = link("a & b https://example.org/x");
        assert_eq!(
            once,
            r#"a &amp; b <a href="https://example.org/x">https://example.org/x</a>"#
        );

        let twice = link(&once);
        assert_eq!(
            twice,
            "a &amp; b &lt;a href=&quot;https://example.org/x&quot;&gt;https://example.org/x&lt;/a&gt;"
        );
    }

    /// Whether no anchor opens inside another one.
    fn anchors_are_flat(html: &str) -> bool {
        let mut inside = false;
        let mut rest = html;
        while let Some(at) = rest.find("<a ").into_iter().chain(rest.find("</a>")).min() {
            let opening = rest[at..].starts_with("<a ");
            if opening == inside {
                return false;
            }
            inside = opening;
            rest = &rest[at + 1..];
        }
        !inside
    }

    proptest! {
        #[test]
        fn prop_sanitize_then_link_never_double_encodes(
            words in proptest::collection::vec("(https?://|www\\.)[a-z]{1,8}\\.[a-z]{2,3}|[a-z<>&\" ]{1,8}", 0..8),
            target_blank in any::<bool>(),
        ) {
            let mut html = words.join(" ");
            for _ in 0..3 {
                let escaped = sanitize(&html, Capcode::None);
                html = autolink(&escaped, LinkifyMode::Url, target_blank).into_owned();
                prop_assert!(!html.contains("&amp;amp;"), "{html}");
                prop_assert!(anchors_are_flat(&html), "{html}");
            }
        }

        #[test]
        fn prop_linking_is_idempotent(
            words in proptest::collection::vec("(https?://|www\\.)[a-z]{1,8}\\.[a-z]{2,3}|[a-z]{1,8}", 0..8),
            target_blank in any::<bool>(),
        ) {
            let text = words.join(" ");
            let once = autolink(&text, LinkifyMode::Url, target_blank).into_owned();
            let twice = autolink(&once, LinkifyMode::Url, target_blank).into_owned();
            prop_assert_eq!(once, twice);
        }
    }
}

//! Quote ("greentext") annotation.

/// Markup wrapped around a quoted line.
///
/// Replaceable through [`Hooks::on_greentext`](crate::Hooks::on_greentext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreentextMarkup {
    pub open: String,
    pub close: String,
}

impl Default for GreentextMarkup {
    fn default() -> Self {
        Self {
            open: r#"<span class="greentext">"#.to_owned(),
            close: "</span>".to_owned(),
        }
    }
}

/// Wrap every line of escaped text that starts with `&gt;` in `markup`.
///
/// Line breaks are preserved; a `\r` before the `\n` stays outside the
/// wrapper.
///
/// # Example
///
/// ```
/// use kako_renderer::greentext::{GreentextMarkup, annotate};
///
/// let html = annotate("hi\n&gt;implying", &GreentextMarkup::default());
/// assert_eq!(html, "hi\n<span class=\"greentext\">&gt;implying</span>");
/// ```
pub fn annotate(text: &str, markup: &GreentextMarkup) -> String {
    let mut out = String::with_capacity(text.len() + 32);

    for line in text.split_inclusive('\n') {
        let (body, eol) = split_line_ending(line);
        if is_quote(body) {
            out.push_str(&markup.open);
            out.push_str(body);
            out.push_str(&markup.close);
        } else {
            out.push_str(body);
        }
        out.push_str(eol);
    }

    out
}

fn is_quote(line: &str) -> bool {
    line.get(..4).is_some_and(|prefix| prefix.eq_ignore_ascii_case("&gt;"))
}

fn split_line_ending(line: &str) -> (&str, &str) {
    let body = line
        .strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line);
    line.split_at(body.len())
}

//! Markup tags: `[b]bold[/b]`, `[spoiler]hidden[/spoiler]`, `[code]x[/code]`.
//!
//! Tags are parsed into a tree and rendered with two limits that keep
//! hostile input cheap and readable: a subscript or superscript inside
//! another one renders as plain content, and so does any tag nested more
//! than [`MAX_DEPTH`] levels deep.
//!
//! Malformed input never fails. Unknown tags, tags opened where they are
//! not allowed, stray closers and tags left open all render as the text
//! that was written.
//!
//! # Example
//!
//! ```
//! use kako_renderer::markup::render_markup;
//!
//! assert_eq!(render_markup("[b]bold[/b] [i]open", false), "<b>bold</b> [i]open");
//! assert_eq!(render_markup("[code]a\nb[/code]", false), "<pre>a\nb</pre>");
//! ```

mod parser;
mod render;
mod tag;
mod tree;

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

pub use tag::TagKind;

/// Deepest nesting level at which tags still render.
pub const MAX_DEPTH: usize = 4;

static LITERAL_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[(/?(?:banned|moot|spoiler|code)):lit\]").unwrap());

/// Render markup tags in escaped text.
///
/// `special` enables the staff-only tags.
pub fn render_markup(text: &str, special: bool) -> String {
    if !text.contains('[') {
        return text.to_owned();
    }
    render::render(&parser::parse(text, special))
}

/// Turn the literal forms `[code:lit]` / `[/code:lit]` (and the same for
/// `banned`, `moot` and `spoiler`) into the plain tag text.
///
/// Runs after [`render_markup`], so the result is displayed, not parsed.
pub fn unescape_literal_tags(text: &str) -> Cow<'_, str> {
    LITERAL_TAG.replace_all(text, "[$1]")
}

//! Tag vocabulary.

/// A supported markup tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Overline,
    Subscript,
    Superscript,
    Monospace,
    /// Inline code, promoted to a preformatted block when it spans lines.
    Code,
    /// Preformatted block. Only allowed at the top level.
    Pre,
    Spoiler,
    Expert,
    /// Staff annotation, only in canonical posts of archive boards.
    Banned,
    /// Legacy administrator wrapper, rendered as its content. Same
    /// restriction as [`TagKind::Banned`].
    Moot,
}

const ALL: [TagKind; 14] = [
    TagKind::Bold,
    TagKind::Italic,
    TagKind::Underline,
    TagKind::Strikethrough,
    TagKind::Overline,
    TagKind::Subscript,
    TagKind::Superscript,
    TagKind::Monospace,
    TagKind::Code,
    TagKind::Pre,
    TagKind::Spoiler,
    TagKind::Expert,
    TagKind::Banned,
    TagKind::Moot,
];

impl TagKind {
    /// Look up a tag by name, ignoring case.
    ///
    /// Staff-only tags are only recognized when `special` is set.
    #[must_use]
    pub fn from_name(name: &str, special: bool) -> Option<Self> {
        ALL.into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .filter(|kind| special || !kind.is_special())
    }

    /// Name used in `[name]`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Underline => "u",
            Self::Strikethrough => "s",
            Self::Overline => "o",
            Self::Subscript => "sub",
            Self::Superscript => "sup",
            Self::Monospace => "m",
            Self::Code => "code",
            Self::Pre => "pre",
            Self::Spoiler => "spoiler",
            Self::Expert => "expert",
            Self::Banned => "banned",
            Self::Moot => "moot",
        }
    }

    /// HTML placed around the content.
    #[must_use]
    pub const fn wrapper(self) -> (&'static str, &'static str) {
        match self {
            Self::Bold => ("<b>", "</b>"),
            Self::Italic => ("<em>", "</em>"),
            Self::Underline => (r#"<span class="underline">"#, "</span>"),
            Self::Strikethrough => (r#"<span class="strikethrough">"#, "</span>"),
            Self::Overline => (r#"<span class="overline">"#, "</span>"),
            Self::Subscript => ("<sub>", "</sub>"),
            Self::Superscript => ("<sup>", "</sup>"),
            Self::Monospace => (r#"<tt class="code">"#, "</tt>"),
            Self::Code => ("<code>", "</code>"),
            Self::Pre => ("<pre>", "</pre>"),
            Self::Spoiler => (r#"<span class="spoiler">"#, "</span>"),
            Self::Expert => (r#"<span class="expert">"#, "</span>"),
            Self::Banned => (r#"<span class="banned">"#, "</span>"),
            Self::Moot => ("", ""),
        }
    }

    /// Block tags may only appear at the top level.
    #[must_use]
    pub const fn is_block(self) -> bool {
        matches!(self, Self::Pre)
    }

    /// Literal tags take their content verbatim, without nested tags.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::Code | Self::Pre)
    }

    #[must_use]
    pub const fn is_script(self) -> bool {
        matches!(self, Self::Subscript | Self::Superscript)
    }

    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(self, Self::Banned | Self::Moot)
    }

    /// Whether a tag of kind `child` may open inside this one.
    #[must_use]
    pub const fn accepts(self, child: Self) -> bool {
        !self.is_literal() && !child.is_block()
    }
}

//! Cross-reference resolution: `>>123` quotes within a board and
//! `>>>/board/123` quotes across boards.
//!
//! Both run on escaped text, so the patterns look for `&gt;`.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::backlinks::StagedBacklinks;
use crate::board::BoardLookup;
use crate::hooks::{ExternalLinkContext, Hooks, InternalLinkContext};
use crate::index::ThreadIndex;
use crate::post::{Board, Post, PostId};
use crate::uri::UriBuilder;

static INTERNAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&gt;&gt;([0-9]+(?:,[0-9]+)?)").unwrap());

static EXTERNAL_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)&gt;&gt;&gt;(/([A-Za-z0-9_]+)/([A-Za-z0-9_-]+(?:,[0-9]+)?)?/?)").unwrap()
});

/// Markup placed around a generated anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTags {
    pub open: String,
    pub close: String,
}

impl LinkTags {
    fn wrap(&self, anchor: &str) -> String {
        format!("{}{anchor}{}", self.open, self.close)
    }
}

/// Building blocks of a `>>123` anchor, passed through the internal link
/// hook before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalLinkParts {
    pub tags: LinkTags,
    /// Prefix of the fragment identifier (`#{hash}{post}`).
    pub hash: String,
    /// Attributes of a link to a post in the quoting post's thread.
    pub attr: String,
    /// Attributes of a link to the opening post of a thread.
    pub attr_op: String,
    /// Attributes of a link to a post in another thread.
    pub attr_cross_thread: String,
    /// Attributes of a link to a post this pass does not know.
    pub attr_unknown: String,
    /// Attributes of the backlink registered for the quoting post.
    pub attr_backlink: String,
}

impl InternalLinkParts {
    /// Default parts for a quote of `target` by `source` (both in anchor
    /// form) on `board`.
    #[must_use]
    pub fn new(board: &str, target: &str, source: &str) -> Self {
        let data = |post: &str| {
            format!(
                r#"data-function="highlight" data-backlink="true" data-board="{board}" data-post="{post}""#
            )
        };

        Self {
            tags: LinkTags::default(),
            hash: String::new(),
            attr: format!(r#"class="backlink" {}"#, data(target)),
            attr_op: format!(r#"class="backlink op" {}"#, data(target)),
            attr_cross_thread: format!(r#"class="backlink crossthread" {}"#, data(target)),
            attr_unknown: format!(r#"class="backlink unknown" {}"#, data(target)),
            attr_backlink: format!(r#"class="backlink" {}"#, data(source)),
        }
    }
}

/// Building blocks of a `>>>/board/123` anchor, passed through the external
/// link hook before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLinkParts {
    pub tags: LinkTags,
    /// Link to the board root on the remote site.
    pub short_link: String,
    /// Link to the quoted post on the remote site.
    pub query_link: String,
    /// Extra attributes for links carrying a query.
    pub attributes: String,
    /// Highlighting attributes for quotes of a known board's post.
    pub backlink_attr: String,
}

impl ExternalLinkParts {
    /// Default parts, pointing unknown boards at `remote`.
    #[must_use]
    pub fn new(remote: &str, shortname: &str, query: &str) -> Self {
        let remote = remote.trim_end_matches('/');
        Self {
            tags: LinkTags::default(),
            short_link: format!("{remote}/{shortname}/"),
            query_link: format!("{remote}/{shortname}/res/{query}"),
            attributes: String::new(),
            backlink_attr: format!(
                r#" class="backlink" data-function="highlight" data-backlink="true" data-board="{shortname}" data-post="{query}""#
            ),
        }
    }
}

/// Where a quoted post was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The token is a thread number: link to that thread's opening post.
    Op(u64),
    /// A post of the quoting post's thread.
    SameThread(u64),
    /// A post of another thread of this pass.
    OtherThread(u64),
    /// Not registered in this pass.
    Unknown,
}

/// Resolve a quoted post against the index.
///
/// Thread numbers win over post lists, then the first thread containing the
/// post. `None` (a token that is not a valid post id) never resolves.
pub fn resolve(index: &ThreadIndex, target: Option<PostId>, thread_num: u64) -> Resolution {
    let Some(id) = target else {
        return Resolution::Unknown;
    };

    if !id.is_ghost() && index.contains_thread(id.num) {
        return Resolution::Op(id.num);
    }

    match index.thread_of(id) {
        Some(thread) if thread == thread_num => Resolution::SameThread(thread),
        Some(thread) => Resolution::OtherThread(thread),
        None => Resolution::Unknown,
    }
}

/// Everything link resolution reads while processing one post.
pub(crate) struct LinkContext<'a> {
    pub post: &'a Post,
    pub board: &'a Board,
    pub boards: &'a dyn BoardLookup,
    pub uri: &'a dyn UriBuilder,
    pub hooks: &'a Hooks,
    pub index: &'a ThreadIndex,
    pub controller_method: &'a str,
    pub hash_only: bool,
    pub remote_board_url: &'a str,
}

/// Replace `>>123` and `>>123,4` quotes with anchors, staging a backlink for
/// every quote.
///
/// A post without a number yet (a preview) is returned unchanged.
pub(crate) fn internal_links(text: &str, ctx: &LinkContext<'_>, staged: &mut StagedBacklinks) -> String {
    let post = ctx.post;
    if post.num == 0 {
        return text.to_owned();
    }

    let board = ctx.board.shortname.as_str();
    let source = post.id();
    let source_token = source.underscore();
    let thread = post.thread_num.to_string();
    let thread_uri = ctx.uri.create(&[board, ctx.controller_method, thread.as_str()]);

    let replaced = INTERNAL_LINK.replace_all(text, |caps: &Captures<'_>| {
        let token = &caps[1];
        let parsed = token.parse::<PostId>().ok();
        let target = parsed.map_or_else(|| token.replace(',', "_"), |id| id.underscore());

        let hook_ctx = InternalLinkContext {
            board: board.to_owned(),
            source,
            thread_num: post.thread_num,
            target: target.clone(),
        };
        let parts = ctx
            .hooks
            .internal_link
            .apply(&hook_ctx, InternalLinkParts::new(board, &target, &source_token));

        staged.push(
            target.clone(),
            source_token.clone(),
            parts.tags.wrap(&format!(
                r#"<a href="{thread_uri}#{}{source_token}" {}>&gt;&gt;{source}</a>"#,
                parts.hash, parts.attr_backlink
            )),
        );

        let fragment = format!("#{}{target}", parts.hash);
        let (href, attr) = match resolve(ctx.index, parsed, post.thread_num) {
            Resolution::Op(_) if ctx.hash_only => (fragment, &parts.attr_op),
            Resolution::SameThread(_) if ctx.hash_only => (fragment, &parts.attr),
            Resolution::Op(op) => {
                let uri = ctx.uri.create(&[board, ctx.controller_method, op.to_string().as_str()]);
                (format!("{uri}{fragment}"), &parts.attr_op)
            }
            Resolution::SameThread(_) => (format!("{thread_uri}{fragment}"), &parts.attr),
            Resolution::OtherThread(other) => {
                let other = other.to_string();
                let uri = ctx.uri.create(&[board, ctx.controller_method, other.as_str()]);
                let anchor = format!(
                    r#"<a href="{uri}{fragment}" {} data-thread="{other}">&gt;&gt;{token}</a>"#,
                    parts.attr_cross_thread
                );
                return parts.tags.wrap(&anchor);
            }
            Resolution::Unknown => {
                tracing::debug!(board = %board, post = %source, target = %token, "Quoted post not in this pass");
                (ctx.uri.create(&[board, "post", target.as_str()]), &parts.attr_unknown)
            }
        };

        parts
            .tags
            .wrap(&format!(r#"<a href="{href}" {attr}>&gt;&gt;{token}</a>"#))
    });

    replaced.into_owned()
}

/// Replace `>>>/board/` and `>>>/board/123` quotes with anchors.
///
/// Boards the archive does not carry link to the remote site.
pub(crate) fn external_links(text: &str, ctx: &LinkContext<'_>) -> String {
    let replaced = EXTERNAL_LINK.replace_all(text, |caps: &Captures<'_>| {
        let link = &caps[1];
        let shortname = &caps[2];
        let query = caps.get(3).map(|m| m.as_str());
        let known = ctx.boards.board(shortname);

        let hook_ctx = ExternalLinkContext {
            shortname: shortname.to_owned(),
            known: known.is_some(),
            query: query.map(str::to_owned),
        };
        let parts = ctx.hooks.external_link.apply(
            &hook_ctx,
            ExternalLinkParts::new(ctx.remote_board_url, shortname, query.unwrap_or_default()),
        );

        let anchor = match (known, query) {
            (None, Some(_)) => {
                tracing::debug!(board = %shortname, "Quoted board not archived, linking to remote");
                format!(
                    r#"<a href="{}"{}>&gt;&gt;&gt;{link}</a>"#,
                    parts.query_link, parts.attributes
                )
            }
            (None, None) => format!(r#"<a href="{}">&gt;&gt;&gt;{link}</a>"#, parts.short_link),
            (Some(board), Some(query)) => format!(
                r#"<a href="{}"{}{}>&gt;&gt;&gt;{link}</a>"#,
                ctx.uri.create(&[board.shortname.as_str(), "post", query]),
                parts.attributes,
                parts.backlink_attr
            ),
            (Some(board), None) => format!(
                r#"<a href="{}">&gt;&gt;&gt;{link}</a>"#,
                ctx.uri.create(&[board.shortname.as_str()])
            ),
        };
        parts.tags.wrap(&anchor)
    });

    replaced.into_owned()
}

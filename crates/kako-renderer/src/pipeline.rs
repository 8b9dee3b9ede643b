//! The comment rendering pipeline and its per-page state.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::autolink::autolink;
use crate::backlinks::{Backlink, BacklinkRegistry, StagedBacklinks};
use crate::error::RenderError;
use crate::greentext::{self, GreentextMarkup};
use crate::index::ThreadIndex;
use crate::links::{self, LinkContext};
use crate::markup::{render_markup, unescape_literal_tags};
use crate::post::{Board, Post, PostId, RenderedPost};
use crate::renderer::Renderer;
use crate::sanitize::sanitize;

static PRE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<pre>(.*?)</pre>").unwrap());

/// State of rendering one page of posts.
///
/// Owns the thread index and the backlink registry. A post quoting another
/// resolves to an in-thread link only if the quoted post was registered
/// before the quoting post is rendered; register every post of a page first
/// when quotes of later posts must resolve.
///
/// Passes are independent: concurrent requests each take their own pass from
/// the shared [`Renderer`].
///
/// # Example
///
/// ```
/// use kako_renderer::{Board, BoardCollection, Post, PostId, Renderer, SiteUri};
///
/// let boards: BoardCollection = [Board::new("a")].into_iter().collect();
/// let renderer = Renderer::new(boards, SiteUri::new(""));
/// let op = Post::new("a", 1, PostId::canonical(1)).with_comment("hello");
/// let reply = Post::new("a", 1, PostId::canonical(2)).with_comment(">>1\nhi");
///
/// let mut pass = renderer.pass();
/// pass.register(&op);
/// pass.register(&reply);
/// let html = pass.render(&reply).unwrap();
///
/// assert!(html.contains(r##"href="/a/thread/1/#1""##));
/// assert_eq!(pass.backlinks(op.id()).len(), 1);
/// ```
pub struct RenderPass<'r> {
    renderer: &'r Renderer,
    index: ThreadIndex,
    backlinks: BacklinkRegistry,
    controller_method: String,
    hash_only: bool,
}

impl<'r> RenderPass<'r> {
    pub(crate) fn new(renderer: &'r Renderer) -> Self {
        let options = renderer.options();
        Self {
            renderer,
            index: ThreadIndex::new(),
            backlinks: BacklinkRegistry::new(),
            controller_method: options.controller_method.clone(),
            hash_only: options.backlinks_hash_only,
        }
    }

    /// Route for thread links of this page, e.g. `last/50`.
    #[must_use]
    pub fn with_controller_method(mut self, method: impl Into<String>) -> Self {
        self.controller_method = method.into();
        self
    }

    /// Link posts on this page by fragment only.
    #[must_use]
    pub fn with_hash_only(mut self, hash_only: bool) -> Self {
        self.hash_only = hash_only;
        self
    }

    /// Add a post to the thread index.
    pub fn register(&mut self, post: &Post) {
        self.index.register(post.thread_num, post.id());
    }

    /// Render a post body, recording a backlink for every quote in it.
    ///
    /// Fails only when the post's board is not configured; the registry is
    /// left untouched in that case.
    pub fn render(&mut self, post: &Post) -> Result<String, RenderError> {
        let board = self.renderer.board(&post.board)?;

        let mut staged = StagedBacklinks::default();
        let html = self.process(post, board, &mut staged);

        tracing::debug!(
            board = %board.shortname,
            post = %post.id(),
            quotes = staged.len(),
            "Rendered post"
        );
        self.backlinks.commit(staged);

        Ok(html)
    }

    /// Render a post, then register it.
    ///
    /// This is the order posts are handled in when they are loaded one by
    /// one: a post can link to posts loaded before it, never after.
    pub fn ingest(&mut self, post: &Post) -> Result<String, RenderError> {
        let html = self.render(post)?;
        self.register(post);
        Ok(html)
    }

    /// Posts quoting `post`, sorted by their token as a string.
    #[must_use]
    pub fn backlinks(&self, post: PostId) -> Vec<Backlink> {
        self.backlinks.get(&post.underscore())
    }

    #[must_use]
    pub fn index(&self) -> &ThreadIndex {
        &self.index
    }

    #[must_use]
    pub fn registry(&self) -> &BacklinkRegistry {
        &self.backlinks
    }

    /// Forget every registered post and backlink.
    pub fn reset(&mut self) {
        self.index.clear();
        self.backlinks.clear();
    }

    /// Assemble the presentation view of a rendered post.
    ///
    /// Backlinks are read now, so call this once every post quoting `post`
    /// has been rendered.
    #[must_use]
    pub fn view(&self, post: &Post, comment_processed: String) -> RenderedPost {
        RenderedPost {
            num: post.num,
            subnum: post.subnum,
            thread_num: post.thread_num,
            op: post.op,
            board: post.board.clone(),
            capcode: post.capcode,
            comment_sanitized: post.comment.clone().unwrap_or_default(),
            comment_processed,
            fields: self.renderer.processed_fields(post),
            backlinks: self.backlinks(post.id()),
        }
    }

    fn process(&self, post: &Post, board: &Board, staged: &mut StagedBacklinks) -> String {
        let renderer = self.renderer;
        let options = renderer.options();
        // Staff-only tags and their literal escapes.
        let special = board.archive && !post.is_ghost();

        let text = sanitize(post.comment.as_deref().unwrap_or_default(), post.capcode);

        let markup = renderer.hooks().greentext.apply(post, GreentextMarkup::default());
        let text = greentext::annotate(&text, &markup);

        let ctx = LinkContext {
            post,
            board,
            boards: renderer.boards(),
            uri: renderer.uri(),
            hooks: renderer.hooks(),
            index: &self.index,
            controller_method: &self.controller_method,
            hash_only: self.hash_only,
            remote_board_url: &options.remote_board_url,
        };
        let text = links::internal_links(&text, &ctx, staged);
        let text = links::external_links(&text, &ctx);

        let text = render_markup(&text, special);
        let text = autolink(&text, options.linkify, options.link_target_blank);
        let text = if special {
            unescape_literal_tags(&text).into_owned()
        } else {
            text.into_owned()
        };

        strip_pre_breaks(&nl2br(trim_blank(&text)))
    }
}

/// Trim the characters the archive has always trimmed from bodies.
fn trim_blank(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}

/// Insert `<br />` before every line break (`\r\n`, `\n\r`, `\n` or `\r`),
/// keeping the break itself.
fn nl2br(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        if c != '\r' && c != '\n' {
            continue;
        }

        out.pop();
        out.push_str("<br />");
        out.push(c);
        let pair = if c == '\r' { '\n' } else { '\r' };
        if chars.next_if_eq(&pair).is_some() {
            out.push(pair);
        }
    }

    out
}

/// Drop the `<br />`s [`nl2br`] put inside preformatted blocks.
fn strip_pre_breaks(html: &str) -> String {
    if !html.contains("<pre>") {
        return html.to_owned();
    }

    PRE_BLOCK
        .replace_all(html, |caps: &Captures<'_>| {
            format!("<pre>{}</pre>", caps[1].replace("<br />", ""))
        })
        .into_owned()
}

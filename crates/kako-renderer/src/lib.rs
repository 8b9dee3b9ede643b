//! Imageboard post rendering.
//!
//! Turns a stored post body into display HTML:
//!
//! 1. [`sanitize`](sanitize::sanitize) escapes the body and drops legacy
//!    administrator wrappers.
//! 2. [`greentext`] wraps quoted lines.
//! 3. [`links`] resolves `>>123` and `>>>/board/123` quotes, recording a
//!    backlink on the quoted post.
//! 4. [`markup`] renders `[b]`, `[spoiler]`, `[code]` and friends.
//! 5. [`autolink`] links bare URLs.
//! 6. Line breaks become `<br />`, except inside preformatted blocks.
//!
//! A [`Renderer`] holds the process-wide configuration and hooks. Each page
//! is rendered through a [`RenderPass`] owning the page's thread index and
//! backlink registry.
//!
//! # Example
//!
//! ```
//! use kako_renderer::{Board, BoardCollection, Post, PostId, Renderer, SiteUri};
//!
//! let boards: BoardCollection = [Board::new("g")].into_iter().collect();
//! let renderer = Renderer::new(boards, SiteUri::new("https://archive.example"));
//!
//! let mut pass = renderer.pass();
//! let post = Post::new("g", 1, PostId::canonical(1)).with_comment("[b]hi[/b] <3");
//! pass.register(&post);
//!
//! assert_eq!(pass.render(&post).unwrap(), "<b>hi</b> &lt;3");
//! ```

pub mod autolink;
mod backlinks;
mod board;
mod error;
pub mod greentext;
mod hooks;
mod index;
pub mod links;
pub mod markup;
mod pipeline;
mod post;
mod renderer;
pub mod sanitize;
mod uri;

pub use backlinks::{Backlink, BacklinkRegistry, StagedBacklinks};
pub use board::{BoardCollection, BoardLookup};
pub use error::RenderError;
pub use hooks::{CleanContext, ExternalLinkContext, Hooks, InternalLinkContext, Listeners};
pub use index::ThreadIndex;
pub use links::{ExternalLinkParts, InternalLinkParts, LinkTags};
pub use pipeline::RenderPass;
pub use post::{
    Board, Capcode, ParsePostIdError, Post, PostId, ProcessedFields, RenderedPost,
};
pub use renderer::{DEFAULT_REMOTE_BOARD_URL, RenderOptions, Renderer};
pub use uri::{SiteUri, UriBuilder};

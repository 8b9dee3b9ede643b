//! Process-scoped renderer.

use std::collections::HashMap;
use std::fmt;

use kako_tripcode::SecureSalt;

use crate::autolink::LinkifyMode;
use crate::board::BoardLookup;
use crate::error::RenderError;
use crate::hooks::Hooks;
use crate::pipeline::RenderPass;
use crate::post::{Board, Post, ProcessedFields};
use crate::uri::UriBuilder;

/// Remote site quotes of unknown boards point at.
pub const DEFAULT_REMOTE_BOARD_URL: &str = "//boards.4chan.org";

/// Rendering options shared by every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Route used for thread links (`thread`, `last/50`, ...).
    pub controller_method: String,
    /// Link posts on the same page by fragment only.
    pub backlinks_hash_only: bool,
    /// Open autolinked URLs in a new tab.
    pub link_target_blank: bool,
    pub linkify: LinkifyMode,
    /// Base of links to boards the archive does not carry.
    pub remote_board_url: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            controller_method: "thread".to_owned(),
            backlinks_hash_only: false,
            link_target_blank: true,
            linkify: LinkifyMode::Url,
            remote_board_url: DEFAULT_REMOTE_BOARD_URL.to_owned(),
        }
    }
}

/// Post renderer.
///
/// Holds everything that outlives a single page: board lookup, URI builder,
/// hooks and options. It is immutable while rendering and can be shared
/// across threads; per-page state lives in the [`RenderPass`] returned by
/// [`Renderer::pass`].
pub struct Renderer {
    boards: Box<dyn BoardLookup>,
    uri: Box<dyn UriBuilder>,
    hooks: Hooks,
    options: RenderOptions,
    salt: SecureSalt,
    countries: HashMap<String, String>,
}

impl Renderer {
    #[must_use]
    pub fn new(boards: impl BoardLookup + 'static, uri: impl UriBuilder + 'static) -> Self {
        Self {
            boards: Box::new(boards),
            uri: Box::new(uri),
            hooks: Hooks::default(),
            options: RenderOptions::default(),
            salt: SecureSalt::empty(),
            countries: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Salt for secure tripcodes found in name fields.
    #[must_use]
    pub fn with_secure_salt(mut self, salt: SecureSalt) -> Self {
        self.salt = salt;
        self
    }

    /// Country code (upper case) to display name.
    #[must_use]
    pub fn with_countries(mut self, countries: HashMap<String, String>) -> Self {
        self.countries = countries;
        self
    }

    #[must_use]
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Hooks for registration or teardown after construction.
    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub(crate) fn boards(&self) -> &dyn BoardLookup {
        self.boards.as_ref()
    }

    pub(crate) fn uri(&self) -> &dyn UriBuilder {
        self.uri.as_ref()
    }

    /// Board a post belongs to.
    pub fn board(&self, shortname: &str) -> Result<&Board, RenderError> {
        self.boards.board(shortname).ok_or_else(|| {
            tracing::warn!(board = %shortname, "Rendering post of unconfigured board");
            RenderError::MissingBoard(shortname.to_owned())
        })
    }

    /// Start a render pass with an empty thread index and backlink registry.
    #[must_use]
    pub fn pass(&self) -> RenderPass<'_> {
        RenderPass::new(self)
    }

    /// Display fields of a post.
    #[must_use]
    pub fn processed_fields(&self, post: &Post) -> ProcessedFields {
        ProcessedFields::compute(post, &self.salt, &self.countries)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("hooks", &self.hooks)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

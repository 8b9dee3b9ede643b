//! Extension hooks.
//!
//! A hook receives a context and the value the renderer is about to use, and
//! returns the value to use instead. Listeners run in registration order,
//! each one receiving the previous listener's result. A hook without
//! listeners passes the value through.
//!
//! Hooks live on the process-scoped [`Renderer`](crate::Renderer), so they are
//! registered once at startup and shared by every render pass.
//!
//! # Example
//!
//! ```
//! use kako_renderer::Hooks;
//!
//! let hooks = Hooks::new().on_greentext(|_post, mut markup| {
//!     markup.open = "<q>".to_owned();
//!     markup.close = "</q>".to_owned();
//!     markup
//! });
//! assert_eq!(hooks.greentext.len(), 1);
//! ```

use std::fmt;

use crate::greentext::GreentextMarkup;
use crate::links::{ExternalLinkParts, InternalLinkParts};
use crate::post::{Post, PostId};

type Listener<C, T> = Box<dyn Fn(&C, T) -> T + Send + Sync>;

/// Ordered listeners of a single hook.
pub struct Listeners<C, T> {
    items: Vec<Listener<C, T>>,
}

impl<C, T> Listeners<C, T> {
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Register a listener after the existing ones.
    pub fn add(&mut self, listener: impl Fn(&C, T) -> T + Send + Sync + 'static) {
        self.items.push(Box::new(listener));
    }

    /// Run `value` through every listener.
    pub fn apply(&self, ctx: &C, value: T) -> T {
        self.items.iter().fold(value, |value, listener| listener(ctx, value))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<C, T> Default for Listeners<C, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, T> fmt::Debug for Listeners<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.items.len())
            .finish()
    }
}

/// Context of the internal link hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalLinkContext {
    /// Board shortname of the quoting post.
    pub board: String,
    /// The quoting post.
    pub source: PostId,
    /// Thread of the quoting post.
    pub thread_num: u64,
    /// Quoted token in anchor form (`123` or `123_4`).
    pub target: String,
}

/// Context of the external (cross-board) link hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLinkContext {
    /// Board shortname as written in the quote.
    pub shortname: String,
    /// Whether the board is known to the archive.
    pub known: bool,
    /// Post or page the quote points at, if any.
    pub query: Option<String>,
}

/// Context of the before-clean hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanContext {
    /// Whether the viewer may see poster IPs.
    pub reveal_ip: bool,
}

/// All extension hooks of the renderer.
#[derive(Debug, Default)]
pub struct Hooks {
    /// Replaces the markup wrapped around quoted lines.
    pub greentext: Listeners<Post, GreentextMarkup>,
    /// Replaces the parts of a `>>123` anchor.
    pub internal_link: Listeners<InternalLinkContext, InternalLinkParts>,
    /// Replaces the parts of a `>>>/board/123` anchor.
    pub external_link: Listeners<ExternalLinkContext, ExternalLinkParts>,
    /// Observes or alters a post before its private fields are dropped.
    pub before_clean: Listeners<CleanContext, Post>,
}

impl Hooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_greentext(
        mut self,
        listener: impl Fn(&Post, GreentextMarkup) -> GreentextMarkup + Send + Sync + 'static,
    ) -> Self {
        self.greentext.add(listener);
        self
    }

    #[must_use]
    pub fn on_internal_link(
        mut self,
        listener: impl Fn(&InternalLinkContext, InternalLinkParts) -> InternalLinkParts
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.internal_link.add(listener);
        self
    }

    #[must_use]
    pub fn on_external_link(
        mut self,
        listener: impl Fn(&ExternalLinkContext, ExternalLinkParts) -> ExternalLinkParts
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.external_link.add(listener);
        self
    }

    #[must_use]
    pub fn on_before_clean(
        mut self,
        listener: impl Fn(&CleanContext, Post) -> Post + Send + Sync + 'static,
    ) -> Self {
        self.before_clean.add(listener);
        self
    }

    /// Remove every listener of every hook.
    pub fn clear(&mut self) {
        self.greentext.clear();
        self.internal_link.clear();
        self.external_link.clear();
        self.before_clean.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_listeners_pass_through() {
        let listeners: Listeners<(), i32> = Listeners::new();
        assert_eq!(listeners.apply(&(), 7), 7);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_listeners_chain_in_order() {
        let mut listeners: Listeners<i32, String> = Listeners::new();
        listeners.add(|_, s| s + "a");
        listeners.add(|ctx, s| format!("{s}{ctx}"));
        assert_eq!(listeners.apply(&1, String::new()), "a1");
    }

    #[test]
    fn test_clear_removes_all() {
        let mut hooks = Hooks::new()
            .on_greentext(|_, markup| markup)
            .on_internal_link(|_, parts| parts)
            .on_external_link(|_, parts| parts)
            .on_before_clean(|_, post| post);
        assert_eq!(hooks.greentext.len(), 1);

        hooks.clear();
        assert!(hooks.greentext.is_empty());
        assert!(hooks.internal_link.is_empty());
        assert!(hooks.external_link.is_empty());
        assert!(hooks.before_clean.is_empty());
    }

    #[test]
    fn test_hooks_are_shareable() {
        static_assertions::assert_impl_all!(Hooks: Send, Sync);
    }
}

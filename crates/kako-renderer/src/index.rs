//! Posts registered in a render pass, grouped by thread.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::post::PostId;

/// Ordered thread -> posts mapping of one render pass.
///
/// Threads keep the order they were first registered in. Looking a post up
/// yields the first registered thread containing it, the same answer a scan
/// over the threads in order would give.
#[derive(Debug, Default, Clone)]
pub struct ThreadIndex {
    threads: Vec<(u64, Vec<PostId>)>,
    slots: HashMap<u64, usize>,
    first_slot: HashMap<PostId, usize>,
}

impl ThreadIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `post` to the post list of `thread`.
    pub fn register(&mut self, thread: u64, post: PostId) {
        let slot = match self.slots.entry(thread) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                self.threads.push((thread, Vec::new()));
                *entry.insert(self.threads.len() - 1)
            }
        };

        self.threads[slot].1.push(post);
        self.first_slot
            .entry(post)
            .and_modify(|first| *first = (*first).min(slot))
            .or_insert(slot);
    }

    /// Whether any post of `thread` was registered.
    #[must_use]
    pub fn contains_thread(&self, thread: u64) -> bool {
        self.slots.contains_key(&thread)
    }

    /// First registered thread containing `post`.
    #[must_use]
    pub fn thread_of(&self, post: PostId) -> Option<u64> {
        self.first_slot.get(&post).map(|&slot| self.threads[slot].0)
    }

    /// Posts of `thread` in registration order.
    #[must_use]
    pub fn posts(&self, thread: u64) -> &[PostId] {
        self.slots
            .get(&thread)
            .map(|&slot| self.threads[slot].1.as_slice())
            .unwrap_or_default()
    }

    /// Registered thread numbers in registration order.
    pub fn threads(&self) -> impl Iterator<Item = u64> + '_ {
        self.threads.iter().map(|(thread, _)| *thread)
    }

    /// Number of threads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn clear(&mut self) {
        self.threads.clear();
        self.slots.clear();
        self.first_slot.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_keeps_order() {
        let mut index = ThreadIndex::new();
        index.register(7, PostId::canonical(7));
        index.register(3, PostId::canonical(3));
        index.register(7, PostId::canonical(8));
        index.register(7, PostId::new(8, 1));

        assert_eq!(index.threads().collect::<Vec<_>>(), [7, 3]);
        assert_eq!(
            index.posts(7),
            [PostId::canonical(7), PostId::canonical(8), PostId::new(8, 1)]
        );
        assert!(index.posts(99).is_empty());
    }

    #[test]
    fn test_thread_of_prefers_first_thread() {
        let mut index = ThreadIndex::new();
        index.register(1, PostId::canonical(1));
        index.register(2, PostId::canonical(5));
        index.register(1, PostId::canonical(5));

        assert_eq!(index.thread_of(PostId::canonical(5)), Some(1));
        assert_eq!(index.thread_of(PostId::canonical(6)), None);
    }

    #[test]
    fn test_contains_thread() {
        let mut index = ThreadIndex::new();
        index.register(1, PostId::canonical(2));
        assert!(index.contains_thread(1));
        assert!(!index.contains_thread(2));
    }

    #[test]
    fn test_clear() {
        let mut index = ThreadIndex::new();
        index.register(1, PostId::canonical(1));
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.thread_of(PostId::canonical(1)), None);
    }
}

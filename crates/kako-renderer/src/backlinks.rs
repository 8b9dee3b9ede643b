//! Registry of "quoted by" links.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// One post quoting another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Backlink {
    /// Quoting post in anchor form (`123` or `123_4`).
    pub post: String,
    /// Anchor pointing back at the quoting post.
    pub html: String,
}

/// Backlinks produced while rendering one post.
///
/// Kept apart from the registry until the render finished, so a failed
/// render leaves no partial entries behind.
#[derive(Debug, Default)]
pub struct StagedBacklinks {
    entries: Vec<(String, String, String)>,
}

impl StagedBacklinks {
    /// Stage a backlink from `source` to `target`.
    pub fn push(&mut self, target: String, source: String, html: String) {
        self.entries.push((target, source, html));
    }

    /// `(target, source, html)` triples in staging order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.entries
            .iter()
            .map(|(target, source, html)| (target.as_str(), source.as_str(), html.as_str()))
    }

    /// Quoted posts in staging order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(target, _, _)| target.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Quoted post token -> quoting post token -> anchor.
///
/// Quoting tokens are kept ordered as strings, which is the order backlinks
/// are listed in (`"10"` sorts before `"9"`).
#[derive(Debug, Default, Clone)]
pub struct BacklinkRegistry {
    entries: HashMap<String, BTreeMap<String, String>>,
}

impl BacklinkRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `source` quotes `target`. A later entry for the same pair
    /// replaces the earlier one.
    pub fn insert(&mut self, target: String, source: String, html: String) {
        self.entries.entry(target).or_default().insert(source, html);
    }

    /// Move staged backlinks into the registry.
    pub fn commit(&mut self, staged: StagedBacklinks) {
        for (target, source, html) in staged.entries {
            self.insert(target, source, html);
        }
    }

    /// Backlinks of `target`, sorted by quoting token.
    #[must_use]
    pub fn get(&self, target: &str) -> Vec<Backlink> {
        self.entries
            .get(target)
            .map(|sources| {
                sources
                    .iter()
                    .map(|(post, html)| Backlink {
                        post: post.clone(),
                        html: html.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of quoted posts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_missing_is_empty() {
        assert!(BacklinkRegistry::new().get("1").is_empty());
    }

    #[test]
    fn test_sorted_as_strings() {
        let mut registry = BacklinkRegistry::new();
        registry.insert("1".to_owned(), "9".to_owned(), "nine".to_owned());
        registry.insert("1".to_owned(), "10".to_owned(), "ten".to_owned());
        registry.insert("1".to_owned(), "2_1".to_owned(), "ghost".to_owned());

        let posts: Vec<_> = registry.get("1").into_iter().map(|b| b.post).collect();
        assert_eq!(posts, ["10", "2_1", "9"]);
    }

    #[test]
    fn test_same_pair_replaces() {
        let mut registry = BacklinkRegistry::new();
        registry.insert("1".to_owned(), "2".to_owned(), "old".to_owned());
        registry.insert("1".to_owned(), "2".to_owned(), "new".to_owned());

        assert_eq!(
            registry.get("1"),
            [Backlink {
                post: "2".to_owned(),
                html: "new".to_owned()
            }]
        );
    }

    #[test]
    fn test_commit_and_clear() {
        let mut staged = StagedBacklinks::default();
        staged.push("3".to_owned(), "5".to_owned(), "a".to_owned());
        staged.push("4".to_owned(), "5".to_owned(), "b".to_owned());

        let mut registry = BacklinkRegistry::new();
        registry.commit(staged);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("4")[0].html, "b");

        registry.clear();
        assert!(registry.is_empty());
    }
}

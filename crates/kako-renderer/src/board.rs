//! Board lookup.

use std::collections::HashMap;

use crate::post::Board;

/// Resolves board shortnames.
pub trait BoardLookup: Send + Sync {
    fn board(&self, shortname: &str) -> Option<&Board>;
}

/// In-memory set of boards, keyed by shortname.
#[derive(Debug, Default, Clone)]
pub struct BoardCollection {
    boards: HashMap<String, Board>,
}

impl BoardCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a board, replacing any board with the same shortname.
    pub fn insert(&mut self, board: Board) {
        self.boards.insert(board.shortname.clone(), board);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

impl BoardLookup for BoardCollection {
    fn board(&self, shortname: &str) -> Option<&Board> {
        self.boards.get(shortname)
    }
}

impl FromIterator<Board> for BoardCollection {
    fn from_iter<I: IntoIterator<Item = Board>>(iter: I) -> Self {
        let mut collection = Self::new();
        for board in iter {
            collection.insert(board);
        }
        collection
    }
}

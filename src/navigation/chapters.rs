//! ChapterIndex: ordered chapter list for previous/next navigation
//!
//! Built once from the sidebar's links, in document order. Immutable after
//! construction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::address::{Address, DELIMITER};
use super::paths::document_path;

/// One addressable document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub identifier: String,
    pub document_path: String,
    /// Zero-based, contiguous position in the index
    pub order: usize,
}

/// Previous/next chapter around the current one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacency {
    pub previous: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChapterIndex {
    chapters: Vec<Chapter>,
    positions: HashMap<String, usize>,
}

impl ChapterIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from sidebar hrefs.
    ///
    /// Only fragment references (`#...`) are chapters; external links are
    /// skipped. `#a#b` counts as chapter `a`. Repeated chapters keep their
    /// first position.
    pub fn from_links<I, S>(hrefs: I, index_document: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut chapters = Vec::new();
        let mut positions = HashMap::new();

        for href in hrefs {
            let href = href.as_ref().trim();
            if !href.starts_with(DELIMITER) {
                continue;
            }
            let identifier = Address::from_fragment(href).chapter;
            if positions.contains_key(&identifier) {
                continue;
            }
            let order = chapters.len();
            positions.insert(identifier.clone(), order);
            chapters.push(Chapter {
                document_path: document_path(&identifier, index_document),
                identifier,
                order,
            });
        }

        Self { chapters, positions }
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn position_of(&self, address: &Address) -> Option<usize> {
        self.positions.get(&address.chapter).copied()
    }

    pub fn chapter_at(&self, position: usize) -> Option<&Chapter> {
        self.chapters.get(position)
    }

    /// Neighbours of `address`. Both sides are empty when the address is
    /// not in the index.
    pub fn adjacency(&self, address: &Address) -> Adjacency {
        let Some(position) = self.position_of(address) else {
            return Adjacency::default();
        };
        let previous = position
            .checked_sub(1)
            .and_then(|p| self.chapter_at(p))
            .map(|c| c.identifier.clone());
        let next = self.chapter_at(position + 1).map(|c| c.identifier.clone());
        Adjacency { previous, next }
    }
}

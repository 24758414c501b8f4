//! Frontier and visited-set management
//!
//! This module handles:
//! - The FIFO queue of URLs awaiting a fetch attempt (breadth-first order)
//! - The set of URL identities that have already been processed
//!
//! Membership for discovery is checked against the visited set only, so a
//! URL can sit in the frontier more than once until it is first processed.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Queue of URLs waiting to be fetched
#[derive(Debug, Default, Clone)]
pub struct Frontier {
    queue: VecDeque<Url>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL at the tail
    pub fn push(&mut self, url: Url) {
        self.queue.push_back(url);
    }

    /// Removes and returns the URL at the head
    pub fn pop(&mut self) -> Option<Url> {
        self.queue.pop_front()
    }

    /// Returns the number of queued URLs, duplicates included
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Set of URL identities already processed in this run
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    urls: HashSet<Url>,
}

impl VisitedSet {
    /// Creates an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `url` has been processed
    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url)
    }

    /// Marks `url` as processed
    ///
    /// Returns false if it was already present. Check and insert happen in
    /// one step, so callers racing on the same URL see exactly one `true`.
    pub fn insert(&mut self, url: Url) -> bool {
        self.urls.insert(url)
    }

    /// Returns the number of distinct URLs processed
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns whether nothing has been processed yet
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Forgets every visited URL
    pub fn clear(&mut self) {
        self.urls.clear();
    }
}

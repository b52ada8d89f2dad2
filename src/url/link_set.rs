use std::collections::BTreeSet;

/// Uniqueness-enforcing set of canonical repository URLs
///
/// This is the set carried from the search phase into the enrich phase.
/// Iteration order is sorted by URL so runs over the same input visit
/// repositories in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoLinkSet {
    links: BTreeSet<String>,
}

impl RepoLinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a canonical URL, returning false if it was already present
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.links.insert(url.into())
    }

    /// Moves every link of `other` into this set
    pub fn merge(&mut self, other: RepoLinkSet) {
        self.links.extend(other.links);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.links.contains(url)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }
}

impl IntoIterator for RepoLinkSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

impl FromIterator<String> for RepoLinkSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            links: iter.into_iter().collect(),
        }
    }
}

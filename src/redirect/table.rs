//! Redirect lookup tables.
//!
//! # Responsibilities
//! - Resolve a request path to a redirect target
//! - Exact-match map for programmatic mappings
//! - Ordered entry list for mappings decoded from structured data
//!
//! # Design Decisions
//! - Path comparison is case-sensitive, byte-exact
//! - `PathMap` is O(1) average, `EntryList` is an O(n) scan
//! - `EntryList` keeps duplicates; the first one wins

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Trait for resolving a request path to a redirect URL.
pub trait RedirectTable: Send + Sync + std::fmt::Debug {
    /// Returns the target URL for `path`, if one is configured.
    fn lookup(&self, path: &str) -> Option<&str>;

    /// Number of configured redirects.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One `(path, url)` record from a redirect document.
///
/// A field absent from the record decodes as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entry {
    /// Request path, matched against the decoded request path.
    #[serde(default)]
    pub path: String,

    /// Redirect target.
    #[serde(default, rename = "url")]
    pub url: String,
}

impl Entry {
    pub fn new(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }
}

/// Exact-match table keyed by path.
#[derive(Debug, Clone, Default)]
pub struct PathMap {
    paths_to_urls: HashMap<String, String>,
}

impl PathMap {
    pub fn new(paths_to_urls: HashMap<String, String>) -> Self {
        Self { paths_to_urls }
    }
}

impl From<HashMap<String, String>> for PathMap {
    fn from(paths_to_urls: HashMap<String, String>) -> Self {
        Self::new(paths_to_urls)
    }
}

impl<K, V> FromIterator<(K, V)> for PathMap
where
    K: Into<String>,
    V: Into<String>,
{
    /// Later pairs overwrite earlier ones with the same path.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl RedirectTable for PathMap {
    fn lookup(&self, path: &str) -> Option<&str> {
        self.paths_to_urls.get(path).map(String::as_str)
    }

    fn len(&self) -> usize {
        self.paths_to_urls.len()
    }
}

/// Ordered table scanned front to back.
#[derive(Debug, Clone, Default)]
pub struct EntryList {
    entries: Vec<Entry>,
}

impl EntryList {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

impl From<Vec<Entry>> for EntryList {
    fn from(entries: Vec<Entry>) -> Self {
        Self::new(entries)
    }
}

impl RedirectTable for EntryList {
    fn lookup(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| entry.url.as_str())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

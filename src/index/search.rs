// Strategies for locating indexed token sequences in a tokenized input.

use std::collections::{BTreeSet, HashMap};

use crate::index::{TermIndexEntry, TermMatch};
use crate::tokenize::WordToken;

pub trait SearchStrategy<Id>: Send + Sync {
    /// Entries without tokens are ignored.
    fn index(&mut self, entry: TermIndexEntry<Id>);

    /// Removes every entry stored under `id`.
    fn unindex(&mut self, id: &Id);

    fn find(&self, tokens: &[WordToken]) -> Vec<TermMatch<Id>> {
        self.find_where(tokens, &|_| true)
    }

    /// Like `find`, but entries whose id is not accepted are never considered,
    /// so they cannot shadow accepted ones.
    fn find_where(&self, tokens: &[WordToken], accept: &dyn Fn(&Id) -> bool) -> Vec<TermMatch<Id>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scans left to right, preferring the longest term at each position. Matches
/// never overlap; all entries of the winning length that match are reported,
/// so the same term stored under several ids matches all of them.
pub struct LongestMatchStrategy<Id> {
    entries: HashMap<usize, TermIndexEntry<Id>>,
    // Root token candidate -> keys of the entries starting with it.
    roots: HashMap<String, BTreeSet<usize>>,
    next_key: usize,
}

impl<Id> Default for LongestMatchStrategy<Id> {
    fn default() -> Self {
        LongestMatchStrategy {
            entries: HashMap::new(),
            roots: HashMap::new(),
            next_key: 0,
        }
    }
}

impl<Id> LongestMatchStrategy<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    fn candidates(&self, token: &WordToken) -> Vec<&TermIndexEntry<Id>> {
        let keys: BTreeSet<usize> = token
            .candidates()
            .into_iter()
            .filter_map(|candidate| self.roots.get(candidate))
            .flatten()
            .copied()
            .collect();
        let mut entries: Vec<&TermIndexEntry<Id>> =
            keys.iter().filter_map(|key| self.entries.get(key)).collect();
        // Stable, so equal lengths keep insertion order.
        entries.sort_by(|a, b| b.len().cmp(&a.len()));
        entries
    }
}

impl<Id> SearchStrategy<Id> for LongestMatchStrategy<Id>
where
    Id: Clone + PartialEq + Send + Sync,
{
    fn index(&mut self, entry: TermIndexEntry<Id>) {
        let root = match entry.root_token() {
            Some(root) => root,
            None => return,
        };
        let key = self.next_key;
        self.next_key += 1;
        for candidate in root.candidates() {
            self.roots
                .entry(candidate.to_string())
                .or_default()
                .insert(key);
        }
        self.entries.insert(key, entry);
    }

    fn unindex(&mut self, id: &Id) {
        let keys: Vec<usize> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.id() == id)
            .map(|(key, _)| *key)
            .collect();
        for key in keys {
            let entry = match self.entries.remove(&key) {
                Some(entry) => entry,
                None => continue,
            };
            let candidates = entry.root_token().map(WordToken::candidates).unwrap_or_default();
            for candidate in candidates {
                if let Some(bucket) = self.roots.get_mut(candidate) {
                    bucket.remove(&key);
                    if bucket.is_empty() {
                        self.roots.remove(candidate);
                    }
                }
            }
        }
    }

    fn find_where(&self, tokens: &[WordToken], accept: &dyn Fn(&Id) -> bool) -> Vec<TermMatch<Id>> {
        let mut matches = Vec::new();
        let mut pos = 0;
        while pos < tokens.len() {
            let mut matched_len: Option<usize> = None;
            for entry in self.candidates(&tokens[pos]) {
                if !accept(entry.id()) {
                    continue;
                }
                if matched_len.map_or(false, |len| entry.len() < len) {
                    break;
                }
                let end = pos + entry.len();
                if end > tokens.len() {
                    continue;
                }
                let window = &tokens[pos..end];
                if WordToken::all_share_candidates(entry.tokens(), window) {
                    matched_len = Some(entry.len());
                    matches.push(TermMatch::new(entry.id().clone(), window.to_vec()));
                }
            }
            pos += matched_len.unwrap_or(1);
        }
        matches
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Compares every entry at every position and reports all matches, including
/// overlapping ones.
pub struct NaiveSearchStrategy<Id> {
    entries: Vec<TermIndexEntry<Id>>,
}

impl<Id> Default for NaiveSearchStrategy<Id> {
    fn default() -> Self {
        NaiveSearchStrategy {
            entries: Vec::new(),
        }
    }
}

impl<Id> NaiveSearchStrategy<Id> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<Id> SearchStrategy<Id> for NaiveSearchStrategy<Id>
where
    Id: Clone + PartialEq + Send + Sync,
{
    fn index(&mut self, entry: TermIndexEntry<Id>) {
        if !entry.is_empty() {
            self.entries.push(entry);
        }
    }

    fn unindex(&mut self, id: &Id) {
        self.entries.retain(|entry| entry.id() != id);
    }

    fn find_where(&self, tokens: &[WordToken], accept: &dyn Fn(&Id) -> bool) -> Vec<TermMatch<Id>> {
        let mut matches = Vec::new();
        for pos in 0..tokens.len() {
            for entry in self.entries.iter().filter(|entry| accept(entry.id())) {
                let end = pos + entry.len();
                if end > tokens.len() {
                    continue;
                }
                let window = &tokens[pos..end];
                if WordToken::all_share_candidates(entry.tokens(), window) {
                    matches.push(TermMatch::new(entry.id().clone(), window.to_vec()));
                }
            }
        }
        matches
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

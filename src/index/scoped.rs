use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use crate::index::{SimpleTermIndex, TermIndex, TermMatch};
use crate::tokenize::WordTokenizer;

/// A term index whose ids are grouped into scopes, e.g. the concepts of one project.
pub struct ScopedTermIndex<Scope, Id> {
    index: SimpleTermIndex<Id>,
    scoped_ids: HashMap<Scope, HashSet<Id>>,
}

impl<Scope, Id> ScopedTermIndex<Scope, Id>
where
    Scope: Eq + Hash,
    Id: Clone + Eq + Hash + Send + Sync + 'static,
{
    pub fn new(tokenizer: Arc<dyn WordTokenizer>) -> Self {
        Self::from_index(SimpleTermIndex::new(tokenizer))
    }

    pub fn from_index(index: SimpleTermIndex<Id>) -> Self {
        ScopedTermIndex {
            index,
            scoped_ids: HashMap::new(),
        }
    }

    pub fn add(&mut self, scope: Scope, id: Id, text: &str) {
        self.add_all(scope, [(id, text)]);
    }

    /// Scopes are only created once one of their terms is indexed.
    pub fn add_all<I, T>(&mut self, scope: Scope, terms: I)
    where
        I: IntoIterator<Item = (Id, T)>,
        T: AsRef<str>,
    {
        let mut indexed = Vec::new();
        for (id, text) in terms {
            if self.index.index_term(id.clone(), text.as_ref()) {
                indexed.push(id);
            }
        }
        if !indexed.is_empty() {
            self.scoped_ids.entry(scope).or_default().extend(indexed);
        }
    }

    /// Removes `id` from the index and from every scope.
    pub fn remove(&mut self, id: &Id) {
        self.index.remove(id);
        for ids in self.scoped_ids.values_mut() {
            ids.remove(id);
        }
        self.scoped_ids.retain(|_, ids| !ids.is_empty());
    }

    /// Drops a scope, unindexing the ids that no other scope holds.
    pub fn remove_scope(&mut self, scope: &Scope) {
        let ids = match self.scoped_ids.remove(scope) {
            Some(ids) => ids,
            None => return,
        };
        for id in ids {
            let shared = self.scoped_ids.values().any(|other| other.contains(&id));
            if !shared {
                self.index.remove(&id);
            }
        }
    }

    pub fn match_text(&self, input: &str) -> Vec<TermMatch<Id>> {
        self.index.match_text(input)
    }

    pub fn match_in_scope(&self, scope: &Scope, input: &str) -> Vec<TermMatch<Id>> {
        let ids = match self.scoped_ids.get(scope) {
            Some(ids) => ids,
            None => return Vec::new(),
        };
        self.index.match_where(input, &|id| ids.contains(id))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

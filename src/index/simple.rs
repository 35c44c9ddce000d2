use std::hash::Hash;
use std::sync::Arc;

use crate::index::search::{LongestMatchStrategy, SearchStrategy};
use crate::index::{TermIndex, TermIndexEntry, TermMatch};
use crate::tokenize::WordTokenizer;

/// Normalizes stored terms and queries with the same tokenizer and delegates
/// matching to a search strategy.
pub struct SimpleTermIndex<Id> {
    tokenizer: Arc<dyn WordTokenizer>,
    strategy: Box<dyn SearchStrategy<Id>>,
}

impl<Id> SimpleTermIndex<Id>
where
    Id: Clone + Eq + Hash + Send + Sync + 'static,
{
    pub fn new(tokenizer: Arc<dyn WordTokenizer>) -> Self {
        Self::with_strategy(tokenizer, Box::new(LongestMatchStrategy::new()))
    }
}

impl<Id> SimpleTermIndex<Id> {
    pub fn with_strategy(
        tokenizer: Arc<dyn WordTokenizer>,
        strategy: Box<dyn SearchStrategy<Id>>,
    ) -> Self {
        SimpleTermIndex {
            tokenizer,
            strategy,
        }
    }

    /// Indexes `text` under `id`, returning false when it produced no tokens.
    pub fn index_term(&mut self, id: Id, text: &str) -> bool {
        let tokens = self.tokenizer.tokenize(text);
        if tokens.is_empty() {
            tracing::debug!(text, "term produced no tokens, skipping");
            return false;
        }
        self.strategy.index(TermIndexEntry::new(id, tokens));
        true
    }

    /// Matches `input` against the terms whose id is accepted.
    pub fn match_where(&self, input: &str, accept: &dyn Fn(&Id) -> bool) -> Vec<TermMatch<Id>> {
        let tokens = self.tokenizer.tokenize(input);
        self.strategy.find_where(&tokens, accept)
    }

    pub fn tokenizer(&self) -> &Arc<dyn WordTokenizer> {
        &self.tokenizer
    }

    pub fn len(&self) -> usize {
        self.strategy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategy.is_empty()
    }
}

impl<Id> TermIndex<Id> for SimpleTermIndex<Id> {
    fn add(&mut self, id: Id, text: &str) {
        self.index_term(id, text);
    }

    fn remove(&mut self, id: &Id) {
        self.strategy.unindex(id);
    }

    fn match_text(&self, input: &str) -> Vec<TermMatch<Id>> {
        let tokens = self.tokenizer.tokenize(input);
        self.strategy.find(&tokens)
    }
}

use crate::tokenize::WordToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermIndexEntry<Id> {
    id: Id,
    tokens: Vec<WordToken>,
}

impl<Id> TermIndexEntry<Id> {
    pub fn new(id: Id, tokens: Vec<WordToken>) -> Self {
        TermIndexEntry { id, tokens }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn tokens(&self) -> &[WordToken] {
        &self.tokens
    }

    /// The first token of the term, which candidate lookups are keyed on.
    pub fn root_token(&self) -> Option<&WordToken> {
        self.tokens.first()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

use serde::Serialize;

use crate::tokenize::WordToken;

/// An occurrence of an indexed term in some input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermMatch<Id> {
    id: Id,
    tokens: Vec<WordToken>,
}

impl<Id> TermMatch<Id> {
    pub fn new(id: Id, tokens: Vec<WordToken>) -> Self {
        TermMatch { id, tokens }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn into_id(self) -> Id {
        self.id
    }

    pub fn tokens(&self) -> &[WordToken] {
        &self.tokens
    }

    // Matches are never built from an empty window.
    pub fn begin(&self) -> usize {
        self.tokens.first().map_or(0, WordToken::begin)
    }

    pub fn end(&self) -> usize {
        self.tokens.last().map_or(0, WordToken::end)
    }
}

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    Lemma,
    Token,
}

/// A word from some input text along with the normalized forms it can be matched by.
///
/// Positions are byte offsets into the original input and are ignored by equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordToken {
    lexemes: BTreeMap<AnnotationType, String>,
    begin: usize,
    end: usize,
}

impl WordToken {
    pub fn new(lexemes: BTreeMap<AnnotationType, String>, begin: usize, end: usize) -> Self {
        WordToken { lexemes, begin, end }
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn lexeme(&self, annotation: AnnotationType) -> Option<&str> {
        self.lexemes.get(&annotation).map(String::as_str)
    }

    pub fn lexemes(&self) -> &BTreeMap<AnnotationType, String> {
        &self.lexemes
    }

    pub fn candidates(&self) -> BTreeSet<&str> {
        self.lexemes.values().map(String::as_str).collect()
    }

    /// True iff this token has any candidate in common with `other`.
    pub fn shares_candidates(&self, other: &WordToken) -> bool {
        other
            .lexemes
            .values()
            .any(|candidate| self.lexemes.values().any(|own| own == candidate))
    }

    /// Pairwise `shares_candidates` over two token sequences of the same length.
    /// Empty sequences never match.
    pub fn all_share_candidates(a: &[WordToken], b: &[WordToken]) -> bool {
        if a.is_empty() || a.len() != b.len() {
            return false;
        }
        a.iter().zip(b.iter()).all(|(x, y)| x.shares_candidates(y))
    }
}

impl PartialEq for WordToken {
    fn eq(&self, other: &Self) -> bool {
        self.lexemes == other.lexemes
    }
}

impl Eq for WordToken {}

impl Hash for WordToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lexemes.hash(state);
    }
}

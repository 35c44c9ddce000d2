// Normalizers decide which lexemes a tagged word is indexed and matched by.
// They run in order and the first one returning `Some` wins; an empty map
// elides the word.

use std::collections::BTreeMap;

use crate::tokenize::pos_tag::PartOfSpeechTag;
use crate::tokenize::AnnotationType;

pub type Lexemes = BTreeMap<AnnotationType, String>;

/// A segmented word after tagging and lemmatization.
#[derive(Debug, Clone)]
pub struct LabeledWord<'a> {
    pub text: &'a str,
    pub tag: PartOfSpeechTag,
    pub lemma: String,
}

pub trait WordNormalizer: Send + Sync {
    fn normalize(&self, word: &LabeledWord) -> Option<Lexemes>;
}

pub struct StopwordNormalizer {
    stopwords: Vec<(String, String)>,
}

impl StopwordNormalizer {
    pub fn new(stopwords: &[(&str, &str)]) -> Self {
        let stopwords = stopwords
            .iter()
            .map(|(text, tag)| (text.to_string(), tag.to_string()))
            .collect();
        StopwordNormalizer { stopwords }
    }
}

impl Default for StopwordNormalizer {
    fn default() -> Self {
        StopwordNormalizer::new(&[("can", "MD"), ("will", "MD"), ("be", "VB")])
    }
}

impl WordNormalizer for StopwordNormalizer {
    fn normalize(&self, word: &LabeledWord) -> Option<Lexemes> {
        let is_stopword = self
            .stopwords
            .iter()
            .any(|(text, tag)| text == word.text && tag == word.tag.as_str());
        if is_stopword {
            Some(Lexemes::new())
        } else {
            None
        }
    }
}

/// Integers match on their digits alone, so `-30` and `30` are the same term.
pub struct NumericalNormalizer;

impl WordNormalizer for NumericalNormalizer {
    fn normalize(&self, word: &LabeledWord) -> Option<Lexemes> {
        let digits = word.text.strip_prefix('-').unwrap_or(word.text);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(Lexemes::from([(AnnotationType::Token, digits.to_string())]))
    }
}

/// Upper-case nouns are treated as acronyms and keep their case.
pub struct AcronymNormalizer;

impl WordNormalizer for AcronymNormalizer {
    fn normalize(&self, word: &LabeledWord) -> Option<Lexemes> {
        let is_upper = !word.text.is_empty() && word.text.chars().all(|c| c.is_ascii_uppercase());
        if !is_upper || !word.tag.is_noun() {
            return None;
        }
        Some(Lexemes::from([(AnnotationType::Token, word.text.to_string())]))
    }
}

pub struct DefaultNormalizer;

impl WordNormalizer for DefaultNormalizer {
    fn normalize(&self, word: &LabeledWord) -> Option<Lexemes> {
        Some(Lexemes::from([
            (AnnotationType::Lemma, word.lemma.to_lowercase()),
            (AnnotationType::Token, word.text.to_lowercase()),
        ]))
    }
}

pub fn default_normalizers() -> Vec<Box<dyn WordNormalizer>> {
    vec![
        Box::new(StopwordNormalizer::default()),
        Box::new(NumericalNormalizer),
        Box::new(AcronymNormalizer),
        Box::new(DefaultNormalizer),
    ]
}

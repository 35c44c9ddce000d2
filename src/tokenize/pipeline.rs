// Word tokenization pipeline: markup masking, segmentation on Unicode word
// boundaries, tagging, lemmatization and normalization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};
use crate::tokenize::lemmatizer::lemmatize;
use crate::tokenize::normalizer::{default_normalizers, LabeledWord, WordNormalizer};
use crate::tokenize::pos_tag::tag_word;
use crate::tokenize::{WordToken, WordTokenizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self> {
        match code.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            _ => Err(Error::UnsupportedLanguage(code.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

pub struct PipelineBuilder {
    language: Language,
    split_hyphenated: bool,
    normalizers: Vec<Box<dyn WordNormalizer>>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        PipelineBuilder {
            language: Language::English,
            split_hyphenated: true,
            normalizers: Vec::new(),
        }
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(mut self, code: &str) -> Result<Self> {
        self.language = code.parse()?;
        Ok(self)
    }

    pub fn split_hyphenated(mut self, split: bool) -> Self {
        self.split_hyphenated = split;
        self
    }

    /// Custom normalizers replace the default chain and run in insertion order.
    pub fn add_normalizer(mut self, normalizer: Box<dyn WordNormalizer>) -> Self {
        self.normalizers.push(normalizer);
        self
    }

    pub fn build(self) -> NlpWordTokenizer {
        let normalizers = if self.normalizers.is_empty() {
            default_normalizers()
        } else {
            self.normalizers
        };
        NlpWordTokenizer {
            language: self.language,
            split_hyphenated: self.split_hyphenated,
            normalizers,
        }
    }
}

pub struct NlpWordTokenizer {
    language: Language,
    split_hyphenated: bool,
    normalizers: Vec<Box<dyn WordNormalizer>>,
}

impl NlpWordTokenizer {
    pub fn create(language: &str) -> Result<Self> {
        let tokenizer = PipelineBuilder::new().language(language)?.build();
        tracing::debug!(language = %tokenizer.language, "created word tokenizer");
        Ok(tokenizer)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn spans(&self, text: &str) -> Vec<(usize, usize)> {
        let mut spans: Vec<(usize, usize)> = Vec::new();
        for (begin, word) in segment(text) {
            let end = begin + word.len();
            if let Some(last) = spans.last_mut() {
                if last.1 == begin && self.joins(text, *last, word) {
                    last.1 = end;
                    continue;
                }
            }
            spans.push((begin, end));
        }
        spans
    }

    // Whether `word` continues the adjacent span `last` as a single token.
    fn joins(&self, text: &str, last: (usize, usize), word: &str) -> bool {
        let prev = &text[last.0..last.1];
        let starts_alnum = word.chars().next().map_or(false, char::is_alphanumeric);

        // A sign at the start of a word belongs to the number after it.
        if prev == "-" && starts_at_word_boundary(text, last.0) {
            return word.chars().all(|c| c.is_ascii_digit());
        }
        if self.split_hyphenated {
            return false;
        }
        let prev_ends_alnum = prev.chars().next_back().map_or(false, char::is_alphanumeric);
        (word == "-" && prev_ends_alnum) || (prev.len() > 1 && prev.ends_with('-') && starts_alnum)
    }
}

impl WordTokenizer for NlpWordTokenizer {
    fn tokenize(&self, input: &str) -> Vec<WordToken> {
        let text = mask_markup(input);
        let mut tokens = Vec::new();

        for (begin, end) in self.spans(&text) {
            let word = &text[begin..end];
            let tag = tag_word(word);

            // Skip punctuation, but keep sentence delimiters.
            let delimiter = tag.is_sentence_delimiter();
            if !delimiter && (tag.is_punctuation() || !has_token_chars(word)) {
                continue;
            }

            let lemma = lemmatize(word, &tag);
            let labeled = LabeledWord { text: word, tag, lemma };
            let lexemes = self
                .normalizers
                .iter()
                .find_map(|normalizer| normalizer.normalize(&labeled))
                .unwrap_or_default();

            // Elided.
            if lexemes.is_empty() {
                continue;
            }
            tokens.push(WordToken::new(lexemes, begin, end));
        }
        tokens
    }
}

pub(crate) fn segment(s: &str) -> impl Iterator<Item = (usize, &str)> {
    s.split_word_bound_indices()
        .filter(|(_, w)| w.chars().any(|c| !c.is_whitespace()))
}

fn starts_at_word_boundary(text: &str, pos: usize) -> bool {
    text[..pos].chars().next_back().map_or(true, char::is_whitespace)
}

fn has_token_chars(word: &str) -> bool {
    word.chars()
        .any(|c| c.is_alphanumeric() || "&'()*+,-.".contains(c))
}

/// Blank out markup tags and slashes with spaces, preserving byte offsets.
pub(crate) fn mask_markup(input: &str) -> String {
    let mut masked = String::with_capacity(input.len());
    let mut skip_until = 0;
    for (idx, ch) in input.char_indices() {
        if idx < skip_until {
            continue;
        }
        if ch == '<' {
            if let Some(len) = markup_tag_len(&input.as_bytes()[idx..]) {
                masked.extend(std::iter::repeat(' ').take(len));
                skip_until = idx + len;
                continue;
            }
        }
        masked.push(if ch == '/' { ' ' } else { ch });
    }
    masked
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

// Length of a `<\s*/?\s*\w+\s*>` tag at the start of `bytes`.
fn markup_tag_len(bytes: &[u8]) -> Option<usize> {
    let mut i = skip_whitespace(bytes, 1);
    if i < bytes.len() && bytes[i] == b'/' {
        i += 1;
    }
    i = skip_whitespace(bytes, i);
    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    i = skip_whitespace(bytes, i);
    if i < bytes.len() && bytes[i] == b'>' {
        Some(i + 1)
    } else {
        None
    }
}

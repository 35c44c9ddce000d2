pub mod lemmatizer;
pub mod normalizer;
pub mod pipeline;
pub mod pos_tag;
pub mod word_token;

pub use self::normalizer::WordNormalizer;
pub use self::pipeline::{Language, NlpWordTokenizer, PipelineBuilder};
pub use self::pos_tag::PartOfSpeechTag;
pub use self::word_token::{AnnotationType, WordToken};

/// Splits natural-language text into word tokens.
pub trait WordTokenizer: Send + Sync {
    fn tokenize(&self, input: &str) -> Vec<WordToken>;
}

// Rule-based part-of-speech tagging for English, using Penn Treebank tag names.
//
// Only the distinctions the normalizers and the lemmatizer rely on are made:
// punctuation classes, numbers, acronyms, nouns (singular/plural/proper),
// modals, and the closed-class words around them.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartOfSpeechTag {
    tag: String,
}

impl PartOfSpeechTag {
    pub fn new(tag: &str) -> Self {
        PartOfSpeechTag {
            tag: tag.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        self.tag.as_str()
    }

    pub fn is_noun(&self) -> bool {
        self.tag.starts_with("NN")
    }

    pub fn is_plural_noun(&self) -> bool {
        self.tag == "NNS" || self.tag == "NNPS"
    }

    /// Punctuation tags are the symbolic ones, except the sentence delimiter tag `.`.
    pub fn is_punctuation(&self) -> bool {
        self.tag != "." && !self.tag.chars().any(|c| c.is_ascii_alphabetic())
    }

    pub fn is_sentence_delimiter(&self) -> bool {
        self.tag == "."
    }
}

impl fmt::Display for PartOfSpeechTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

const CLOSED_CLASS: &[(&str, &str)] = &[
    ("a", "DT"),
    ("an", "DT"),
    ("the", "DT"),
    ("this", "DT"),
    ("that", "DT"),
    ("these", "DT"),
    ("those", "DT"),
    ("each", "DT"),
    ("every", "DT"),
    ("some", "DT"),
    ("any", "DT"),
    ("no", "DT"),
    ("all", "DT"),
    ("of", "IN"),
    ("in", "IN"),
    ("on", "IN"),
    ("at", "IN"),
    ("by", "IN"),
    ("for", "IN"),
    ("with", "IN"),
    ("from", "IN"),
    ("into", "IN"),
    ("onto", "IN"),
    ("about", "IN"),
    ("over", "IN"),
    ("under", "IN"),
    ("between", "IN"),
    ("through", "IN"),
    ("during", "IN"),
    ("without", "IN"),
    ("within", "IN"),
    ("as", "IN"),
    ("than", "IN"),
    ("if", "IN"),
    ("because", "IN"),
    ("while", "IN"),
    ("after", "IN"),
    ("before", "IN"),
    ("to", "TO"),
    ("and", "CC"),
    ("or", "CC"),
    ("but", "CC"),
    ("nor", "CC"),
    ("you", "PRP"),
    ("he", "PRP"),
    ("she", "PRP"),
    ("it", "PRP"),
    ("we", "PRP"),
    ("they", "PRP"),
    ("me", "PRP"),
    ("him", "PRP"),
    ("us", "PRP"),
    ("them", "PRP"),
    ("my", "PRP$"),
    ("your", "PRP$"),
    ("his", "PRP$"),
    ("her", "PRP$"),
    ("its", "PRP$"),
    ("our", "PRP$"),
    ("their", "PRP$"),
    ("which", "WDT"),
    ("what", "WP"),
    ("who", "WP"),
    ("whom", "WP"),
    ("whose", "WP$"),
    ("there", "EX"),
    ("not", "RB"),
    ("very", "RB"),
    ("also", "RB"),
    ("can", "MD"),
    ("could", "MD"),
    ("will", "MD"),
    ("would", "MD"),
    ("shall", "MD"),
    ("should", "MD"),
    ("may", "MD"),
    ("might", "MD"),
    ("must", "MD"),
    ("be", "VB"),
    ("am", "VBP"),
    ("are", "VBP"),
    ("is", "VBZ"),
    ("was", "VBD"),
    ("were", "VBD"),
    ("been", "VBN"),
    ("being", "VBG"),
    ("have", "VBP"),
    ("has", "VBZ"),
    ("had", "VBD"),
    ("having", "VBG"),
    ("do", "VBP"),
    ("does", "VBZ"),
    ("did", "VBD"),
    ("done", "VBN"),
    ("doing", "VBG"),
];

fn punctuation_tag(word: &str) -> Option<&'static str> {
    let tag = match word {
        "." | "?" | "!" | "..." | "…" => ".",
        "," => ",",
        ":" | ";" | "-" | "--" | "–" | "—" => ":",
        "(" | "[" | "{" => "-LRB-",
        ")" | "]" | "}" => "-RRB-",
        "\"" | "'" | "`" | "“" | "”" | "‘" | "’" => "''",
        "$" => "$",
        "#" => "#",
        _ => return None,
    };
    Some(tag)
}

pub(crate) fn is_number(word: &str) -> bool {
    let digits = word.strip_prefix('-').unwrap_or(word);
    let mut groups = digits.split(|c| c == '.' || c == ',');
    groups.all(|group| !group.is_empty() && group.chars().all(|c| c.is_ascii_digit()))
}

pub(crate) fn is_plural_form(lower: &str) -> bool {
    lower.len() > 3
        && lower.ends_with('s')
        && !["ss", "us", "is", "ous"].iter().any(|suffix| lower.ends_with(suffix))
}

/// Tag a single segmented word.
pub fn tag_word(word: &str) -> PartOfSpeechTag {
    if let Some(tag) = punctuation_tag(word) {
        return PartOfSpeechTag::new(tag);
    }
    if is_number(word) {
        return PartOfSpeechTag::new("CD");
    }
    if !word.chars().any(char::is_alphanumeric) {
        return PartOfSpeechTag::new("SYM");
    }
    if word == "I" {
        return PartOfSpeechTag::new("PRP");
    }
    if word.chars().count() > 1 && word.chars().all(|c| c.is_ascii_uppercase()) {
        return PartOfSpeechTag::new("NNP");
    }

    let lower = word.to_lowercase();
    if let Some((_, tag)) = CLOSED_CLASS.iter().find(|(w, _)| *w == lower) {
        return PartOfSpeechTag::new(tag);
    }
    if lower.len() > 4 && lower.ends_with("ing") {
        return PartOfSpeechTag::new("VBG");
    }
    if lower.len() > 3 && lower.ends_with("ed") {
        return PartOfSpeechTag::new("VBD");
    }
    if lower.len() > 3 && lower.ends_with("ly") {
        return PartOfSpeechTag::new("RB");
    }
    if is_plural_form(&lower) {
        return PartOfSpeechTag::new("NNS");
    }
    if word.chars().next().map_or(false, char::is_uppercase) {
        return PartOfSpeechTag::new("NNP");
    }
    PartOfSpeechTag::new("NN")
}

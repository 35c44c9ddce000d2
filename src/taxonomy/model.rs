use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Language-tagged literals, keyed by language code.
pub type PlainLiterals = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub slug: String,
    #[serde(default)]
    pub title: PlainLiterals,
}

impl Project {
    pub fn new(slug: &str) -> Self {
        Project {
            slug: slug.to_string(),
            title: PlainLiterals::new(),
        }
    }
}

pub fn validate_slug(slug: &str) -> Result<()> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidSlug(slug.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Broader,
    Narrower,
    Related,
}

impl Relationship {
    pub const ALL: [Relationship; 3] = [
        Relationship::Broader,
        Relationship::Narrower,
        Relationship::Related,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Broader => "broader",
            Relationship::Narrower => "narrower",
            Relationship::Related => "related",
        }
    }

    pub fn inverse(&self) -> Relationship {
        match self {
            Relationship::Broader => Relationship::Narrower,
            Relationship::Narrower => Relationship::Broader,
            Relationship::Related => Relationship::Related,
        }
    }

    /// Only the hierarchy can be followed past the first step.
    pub fn is_transitive(&self) -> bool {
        !matches!(self, Relationship::Related)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub id: Uuid,
    pub project: String,
    #[serde(default)]
    pub pref_label: PlainLiterals,
    #[serde(default)]
    pub alt_label: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub broader: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub narrower: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<Uuid>,
}

impl Concept {
    pub fn new(id: Uuid, project: &str, draft: ConceptDraft) -> Self {
        Concept {
            id,
            project: project.to_string(),
            pref_label: draft.pref_label,
            alt_label: draft.alt_label,
            broader: draft.broader,
            narrower: draft.narrower,
            related: draft.related,
        }
    }

    /// Preferred then alternative labels in `language`.
    pub fn labels<'a>(&'a self, language: &str) -> impl Iterator<Item = &'a str> + 'a {
        let pref = self.pref_label.get(language).map(String::as_str);
        let alt = self
            .alt_label
            .get(language)
            .into_iter()
            .flatten()
            .map(String::as_str);
        pref.into_iter().chain(alt)
    }

    /// The concepts this one names under `kind`, as stored.
    pub fn relations(&self, kind: Relationship) -> &[Uuid] {
        match kind {
            Relationship::Broader => &self.broader,
            Relationship::Narrower => &self.narrower,
            Relationship::Related => &self.related,
        }
    }

    pub(crate) fn forget(&mut self, id: &Uuid) {
        self.broader.retain(|other| other != id);
        self.narrower.retain(|other| other != id);
        self.related.retain(|other| other != id);
    }

    pub(crate) fn has_preferred_label(&self) -> bool {
        self.pref_label.values().any(|label| !label.trim().is_empty())
    }
}

/// The editable part of a concept, as sent by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptDraft {
    #[serde(default)]
    pub pref_label: PlainLiterals,
    #[serde(default)]
    pub alt_label: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub broader: Vec<Uuid>,
    #[serde(default)]
    pub narrower: Vec<Uuid>,
    #[serde(default)]
    pub related: Vec<Uuid>,
}

impl ConceptDraft {
    pub fn preferred(language: &str, label: &str) -> Self {
        ConceptDraft {
            pref_label: PlainLiterals::from([(language.to_string(), label.to_string())]),
            ..ConceptDraft::default()
        }
    }

    pub fn with_alt(mut self, language: &str, label: &str) -> Self {
        self.alt_label
            .entry(language.to_string())
            .or_default()
            .push(label.to_string());
        self
    }

    pub fn with_relation(mut self, kind: Relationship, id: Uuid) -> Self {
        match kind {
            Relationship::Broader => self.broader.push(id),
            Relationship::Narrower => self.narrower.push(id),
            Relationship::Related => self.related.push(id),
        }
        self
    }

    pub fn has_preferred_label(&self) -> bool {
        self.pref_label.values().any(|label| !label.trim().is_empty())
    }
}

/// A named grouping of a project's concepts, rooted at its top concepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptScheme {
    pub id: Uuid,
    pub project: String,
    #[serde(default)]
    pub title: PlainLiterals,
    #[serde(default)]
    pub top_concepts: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptSchemeDraft {
    #[serde(default)]
    pub title: PlainLiterals,
    #[serde(default)]
    pub top_concepts: Vec<Uuid>,
}

/// A scheme and its concepts in one document. Concepts refer to each other
/// by `key` until the import assigns them ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeImport {
    #[serde(default)]
    pub title: PlainLiterals,
    #[serde(default)]
    pub concepts: Vec<ImportedConcept>,
    #[serde(default)]
    pub top_concepts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedConcept {
    pub key: String,
    #[serde(default)]
    pub pref_label: PlainLiterals,
    #[serde(default)]
    pub alt_label: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub broader: Vec<String>,
    #[serde(default)]
    pub narrower: Vec<String>,
    #[serde(default)]
    pub related: Vec<String>,
}

impl ImportedConcept {
    pub fn new(key: &str, language: &str, label: &str) -> Self {
        ImportedConcept {
            key: key.to_string(),
            pref_label: PlainLiterals::from([(language.to_string(), label.to_string())]),
            ..ImportedConcept::default()
        }
    }

    pub fn relations(&self, kind: Relationship) -> &[String] {
        match kind {
            Relationship::Broader => &self.broader,
            Relationship::Narrower => &self.narrower,
            Relationship::Related => &self.related,
        }
    }
}

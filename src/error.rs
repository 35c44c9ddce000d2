// Errors raised by the analysis engine and the taxonomy store.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid project slug: {0:?}")]
    InvalidSlug(String),

    #[error("Project with identifier {0} already exists.")]
    ProjectAlreadyExists(String),

    #[error("Project with identifier {0} does not exist.")]
    ProjectNotFound(String),

    #[error("Concept {0} does not exist.")]
    ConceptNotFound(Uuid),

    #[error("Concept scheme {0} does not exist.")]
    ConceptSchemeNotFound(Uuid),

    #[error("A concept needs at least one non-blank preferred label.")]
    MissingPreferredLabel,

    #[error("{property} refers to {target}, which does not exist.")]
    InvalidReference {
        property: &'static str,
        target: String,
    },

    #[error("{0} of a concept cannot include the concept itself.")]
    SelfReference(&'static str),

    #[error("Concept key {0} appears more than once.")]
    DuplicateKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

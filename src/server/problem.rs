// RFC 7807 problem responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub const PROBLEM_JSON: &str = "application/problem+json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub property: String,
    pub message: String,
}

impl Violation {
    pub fn new(property: &str, message: &str) -> Self {
        Violation {
            property: property.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Project with identifier {0} already exists.")]
    ProjectAlreadyExists(String),

    #[error("Project with identifier {0} does not exist.")]
    ProjectNotFound(String),

    #[error("Concept {0} does not exist.")]
    ConceptNotFound(Uuid),

    #[error("Concept scheme {0} does not exist.")]
    ConceptSchemeNotFound(Uuid),

    #[error("No resource at {0}.")]
    RouteNotFound(String),

    #[error("Request contents failed validation")]
    Validation(Vec<Violation>),

    /// The request could not be read, e.g. malformed JSON or a bad path segment.
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },

    #[error("An unexpected error occurred")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ProjectAlreadyExists(_) => StatusCode::CONFLICT,
            ApiError::ProjectNotFound(_)
            | ApiError::ConceptNotFound(_)
            | ApiError::ConceptSchemeNotFound(_)
            | ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(property: &str, message: &str) -> Self {
        ApiError::Validation(vec![Violation::new(property, message)])
    }
}

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        use crate::Error;
        match err {
            Error::ProjectAlreadyExists(slug) => ApiError::ProjectAlreadyExists(slug),
            Error::ProjectNotFound(slug) => ApiError::ProjectNotFound(slug),
            Error::ConceptNotFound(id) => ApiError::ConceptNotFound(id),
            Error::ConceptSchemeNotFound(id) => ApiError::ConceptSchemeNotFound(id),
            Error::MissingPreferredLabel => {
                ApiError::invalid("pref_label", "must contain at least one non-blank label")
            }
            Error::InvalidReference { property, target } => {
                ApiError::invalid(property, &format!("refers to {}, which does not exist", target))
            }
            Error::SelfReference(property) => {
                ApiError::invalid(property, "must not include the concept itself")
            }
            Error::DuplicateKey(key) => {
                ApiError::invalid("concepts", &format!("key {} appears more than once", key))
            }
            Error::InvalidSlug(_) => {
                ApiError::invalid("slug", "must be non-empty and contain only a-z, 0-9 and '-'")
            }
            err @ Error::UnsupportedLanguage(_) => ApiError::invalid("language", &err.to_string()),
            err => ApiError::Internal(err.into()),
        }
    }
}

// Well-formed JSON of the wrong shape is a validation failure, anything else
// keeps the status axum picked.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => ApiError::invalid("body", &err.body_text()),
            rejection => ApiError::Rejected {
                status: rejection.status(),
                detail: rejection.body_text(),
            },
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

#[derive(Serialize)]
struct Problem<'a> {
    title: &'a str,
    detail: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<&'a [Violation]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(cause) = &self {
            tracing::error!(error = ?cause, "request failed");
        }
        let violations = match &self {
            ApiError::Validation(violations) => Some(violations.as_slice()),
            _ => None,
        };
        let problem = Problem {
            title: status.canonical_reason().unwrap_or("Error"),
            detail: self.to_string(),
            status: status.as_u16(),
            violations,
        };
        (status, [(header::CONTENT_TYPE, PROBLEM_JSON)], Json(problem)).into_response()
    }
}

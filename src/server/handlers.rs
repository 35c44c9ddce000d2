use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::server::extract::{ApiJson, ApiPath, ApiQuery};
use crate::server::problem::ApiError;
use crate::server::AppState;
use crate::taxonomy::{
    AnalysisInput, AnalysisResult, Concept, ConceptDraft, ConceptScheme, ConceptSchemeDraft,
    Project, Relationship, SchemeImport, TextAnalyzer,
};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// Always empty for now.
pub async fn suggestions() -> Json<Vec<String>> {
    Json(Vec::new())
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

pub async fn list_projects(State(state): State<AppState>) -> Json<Vec<Project>> {
    let taxonomy = state.taxonomy.read().await;
    Json(taxonomy.list_projects().into_iter().cloned().collect())
}

pub async fn create_project(
    State(state): State<AppState>,
    ApiJson(project): ApiJson<Project>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let created = state.taxonomy.write().await.create_project(project)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_project(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> ApiResult<Json<Project>> {
    let taxonomy = state.taxonomy.read().await;
    Ok(Json(taxonomy.get_project(&slug)?.clone()))
}

pub async fn update_project(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiJson(project): ApiJson<Project>,
) -> ApiResult<StatusCode> {
    state.taxonomy.write().await.update_project(&slug, project)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_project(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> ApiResult<StatusCode> {
    state.taxonomy.write().await.delete_project(&slug)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_concept(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiJson(draft): ApiJson<ConceptDraft>,
) -> ApiResult<(StatusCode, Json<Concept>)> {
    let concept = state.taxonomy.write().await.create_concept(&slug, draft)?;
    Ok((StatusCode::CREATED, Json(concept)))
}

pub async fn get_concept(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Concept>> {
    let taxonomy = state.taxonomy.read().await;
    Ok(Json(taxonomy.get_concept(&id)?.clone()))
}

pub async fn update_concept(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(draft): ApiJson<ConceptDraft>,
) -> ApiResult<StatusCode> {
    state.taxonomy.write().await.update_concept(&id, draft)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_concept(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.taxonomy.write().await.delete_concept(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct LabelQuery {
    pub label: String,
    /// Defaults to the analysis language.
    pub language: Option<String>,
}

pub async fn search_concepts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LabelQuery>,
) -> ApiResult<Json<Vec<Concept>>> {
    if query.label.trim().is_empty() {
        return Err(ApiError::invalid("label", "must not be blank"));
    }
    let taxonomy = state.taxonomy.read().await;
    let language = query
        .language
        .unwrap_or_else(|| taxonomy.language().code().to_string());
    let concepts = taxonomy.find_by_partial_label(&query.label, &language);
    Ok(Json(concepts.into_iter().cloned().collect()))
}

fn default_depth() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub struct RelationshipQuery {
    #[serde(rename = "type")]
    pub kind: Relationship,
    #[serde(default = "default_depth")]
    pub depth: usize,
}

pub async fn find_related(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<RelationshipQuery>,
) -> ApiResult<Json<Vec<Concept>>> {
    let taxonomy = state.taxonomy.read().await;
    let related = taxonomy.find_related(&id, query.kind, query.depth)?;
    Ok(Json(related.into_iter().cloned().collect()))
}

pub async fn list_schemes(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> ApiResult<Json<Vec<ConceptScheme>>> {
    let taxonomy = state.taxonomy.read().await;
    taxonomy.get_project(&slug)?;
    Ok(Json(taxonomy.schemes_in(&slug).into_iter().cloned().collect()))
}

pub async fn create_scheme(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiJson(draft): ApiJson<ConceptSchemeDraft>,
) -> ApiResult<(StatusCode, Json<ConceptScheme>)> {
    let scheme = state.taxonomy.write().await.create_scheme(&slug, draft)?;
    Ok((StatusCode::CREATED, Json(scheme)))
}

pub async fn import_scheme(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiJson(import): ApiJson<SchemeImport>,
) -> ApiResult<(StatusCode, Json<ConceptScheme>)> {
    let scheme = state.taxonomy.write().await.import_scheme(&slug, import)?;
    Ok((StatusCode::CREATED, Json(scheme)))
}

pub async fn get_scheme(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ConceptScheme>> {
    let taxonomy = state.taxonomy.read().await;
    Ok(Json(taxonomy.get_scheme(&id)?.clone()))
}

pub async fn scheme_members(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<Concept>>> {
    let taxonomy = state.taxonomy.read().await;
    let members = taxonomy.scheme_members(&id)?;
    Ok(Json(members.into_iter().cloned().collect()))
}

pub async fn update_scheme(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(draft): ApiJson<ConceptSchemeDraft>,
) -> ApiResult<StatusCode> {
    state.taxonomy.write().await.update_scheme(&id, draft)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_scheme(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.taxonomy.write().await.delete_scheme(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn analyze(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AnalysisInput>,
) -> ApiResult<Json<AnalysisResult>> {
    if input.text.trim().is_empty() {
        return Err(ApiError::invalid("text", "must not be blank"));
    }
    let taxonomy = state.taxonomy.read().await;
    let result = TextAnalyzer::new(&taxonomy).tag_document(&input)?;
    Ok(Json(result))
}

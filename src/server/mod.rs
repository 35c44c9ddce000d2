// HTTP surface over the taxonomy: project, concept and concept scheme CRUD plus
// document analysis.

pub mod extract;
pub mod handlers;
pub mod problem;

use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServeArgs;
use crate::taxonomy::{load_taxonomy, Taxonomy};

pub use self::problem::{ApiError, Violation};

#[derive(Clone)]
pub struct AppState {
    pub taxonomy: Arc<RwLock<Taxonomy>>,
}

impl AppState {
    pub fn new(taxonomy: Taxonomy) -> Self {
        AppState {
            taxonomy: Arc::new(RwLock::new(taxonomy)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v0.1/concept-scheme/suggestions",
            get(handlers::suggestions),
        )
        .route(
            "/v0.1/project",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/v0.1/project/:slug",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/v0.1/project/:slug/concept", post(handlers::create_concept))
        .route(
            "/v0.1/project/:slug/concept-scheme",
            get(handlers::list_schemes).post(handlers::create_scheme),
        )
        .route(
            "/v0.1/project/:slug/concept-scheme/import",
            post(handlers::import_scheme),
        )
        .route("/v0.1/concept", get(handlers::search_concepts))
        .route(
            "/v0.1/concept/:id",
            get(handlers::get_concept)
                .put(handlers::update_concept)
                .delete(handlers::delete_concept),
        )
        .route("/v0.1/concept/:id/relationships", get(handlers::find_related))
        .route(
            "/v0.1/concept-scheme/:id",
            get(handlers::get_scheme)
                .put(handlers::update_scheme)
                .delete(handlers::delete_scheme),
        )
        .route(
            "/v0.1/concept-scheme/:id/concepts",
            get(handlers::scheme_members),
        )
        .route("/v0.1/analysis", post(handlers::analyze))
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(args: &ServeArgs) -> Result<()> {
    let taxonomy = load_taxonomy(&args.language, args.seed.as_deref())?;
    let listener = TcpListener::bind(args.bind).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        language = %taxonomy.language(),
        "taxman listening"
    );
    axum::serve(listener, router(AppState::new(taxonomy)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use crate::tokenize::{Language, NlpWordTokenizer};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let tokenizer = Arc::new(NlpWordTokenizer::create("en").unwrap());
        router(AppState::new(Taxonomy::new(tokenizer, Language::English)))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_suggestions_are_empty() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/v0.1/concept-scheme/suggestions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_duplicate_project_conflicts() {
        let app = app();
        let project = json!({"slug": "foo", "title": {"en": "Foo"}});
        let (status, body) = send(&app, Method::POST, "/v0.1/project", Some(project.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["slug"], "foo");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/v0.1/project")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(project.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], problem::PROBLEM_JSON);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let problem: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(problem["status"], 409);
        assert_eq!(problem["title"], "Conflict");
        assert!(problem["detail"].as_str().unwrap().contains("foo"));
    }

    #[tokio::test]
    async fn test_project_lifecycle() {
        let app = app();
        send(&app, Method::POST, "/v0.1/project", Some(json!({"slug": "metals"}))).await;

        let update = json!({"slug": "metals", "title": {"en": "Metals"}});
        let (status, _) = send(&app, Method::PUT, "/v0.1/project/metals", Some(update)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, "/v0.1/project/metals", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"]["en"], "Metals");

        let (_, body) = send(&app, Method::GET, "/v0.1/project", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::DELETE, "/v0.1/project/metals", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(&app, Method::GET, "/v0.1/project/metals", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn test_invalid_slug() {
        let app = app();
        let (status, body) =
            send(&app, Method::POST, "/v0.1/project", Some(json!({"slug": "Not Valid"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["violations"][0]["property"], "slug");
    }

    #[tokio::test]
    async fn test_concept_in_missing_project() {
        let app = app();
        let concept = json!({"pref_label": {"en": "steel"}});
        let (status, _) = send(&app, Method::POST, "/v0.1/project/missing/concept", Some(concept)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_analysis_extents() {
        let app = app();
        send(&app, Method::POST, "/v0.1/project", Some(json!({"slug": "metals"}))).await;
        let concept = json!({"pref_label": {"en": "finished steel"}});
        let (status, created) =
            send(&app, Method::POST, "/v0.1/project/metals/concept", Some(concept)).await;
        assert_eq!(status, StatusCode::CREATED);

        let text = "We sell finished steel and iron.";
        let (status, body) =
            send(&app, Method::POST, "/v0.1/analysis", Some(json!({"text": text}))).await;
        assert_eq!(status, StatusCode::OK);
        let members = body["members"].as_array().unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0]["id"], created["id"]);

        let extent = members[0]["extents"][0].as_str().unwrap();
        let (begin, end) = extent.split_once(':').unwrap();
        let (begin, end): (usize, usize) = (begin.parse().unwrap(), end.parse().unwrap());
        assert_eq!(&text[begin..end], "finished steel");
    }

    #[tokio::test]
    async fn test_concept_update_and_delete() {
        let app = app();
        send(&app, Method::POST, "/v0.1/project", Some(json!({"slug": "metals"}))).await;
        let (_, created) = send(
            &app,
            Method::POST,
            "/v0.1/project/metals/concept",
            Some(json!({"pref_label": {"en": "steel"}})),
        )
        .await;
        let uri = format!("/v0.1/concept/{}", created["id"].as_str().unwrap());

        let update = json!({"pref_label": {"en": "copper"}});
        let (status, _) = send(&app, Method::PUT, &uri, Some(update)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(body["pref_label"]["en"], "copper");

        let analysis = json!({"text": "copper wire", "project_id": "metals"});
        let (_, body) = send(&app, Method::POST, "/v0.1/analysis", Some(analysis.clone())).await;
        assert_eq!(body["members"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, body) = send(&app, Method::POST, "/v0.1/analysis", Some(analysis)).await;
        assert!(body["members"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concept_without_label() {
        let app = app();
        send(&app, Method::POST, "/v0.1/project", Some(json!({"slug": "metals"}))).await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/v0.1/project/metals/concept",
            Some(json!({"pref_label": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["violations"][0]["property"], "pref_label");
    }

    #[tokio::test]
    async fn test_blank_analysis_text() {
        let app = app();
        let (status, body) =
            send(&app, Method::POST, "/v0.1/analysis", Some(json!({"text": "  "}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "Request contents failed validation");
        assert_eq!(body["violations"][0]["property"], "text");
    }

    #[tokio::test]
    async fn test_malformed_requests_are_problems() {
        let app = app();
        send(&app, Method::POST, "/v0.1/project", Some(json!({"slug": "metals"}))).await;

        // Syntax errors keep axum's status but use the problem format.
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v0.1/project")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"slug\": "))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], problem::PROBLEM_JSON);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let problem: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(problem["status"], 400);

        // A missing field is a validation failure.
        let (status, body) = send(&app, Method::POST, "/v0.1/analysis", Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["violations"][0]["property"], "body");
        assert!(body["violations"][0]["message"].as_str().unwrap().contains("text"));

        let (status, body) = send(&app, Method::GET, "/v0.1/concept/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/v0.1/project")
            .body(Body::from(json!({"slug": "foo"}).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(response.headers()[header::CONTENT_TYPE], problem::PROBLEM_JSON);
    }

    #[tokio::test]
    async fn test_unknown_route_is_problem() {
        let app = app();
        let request = Request::builder()
            .uri("/v0.2/nothing")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], problem::PROBLEM_JSON);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let problem: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(problem["status"], 404);
        assert!(problem["detail"].as_str().unwrap().contains("/v0.2/nothing"));
    }

    async fn create_concept(app: &Router, project: &str, concept: Value) -> String {
        let uri = format!("/v0.1/project/{}/concept", project);
        let (status, body) = send(app, Method::POST, &uri, Some(concept)).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_relationships_and_label_search() {
        let app = app();
        send(&app, Method::POST, "/v0.1/project", Some(json!({"slug": "metals"}))).await;
        let metal = create_concept(&app, "metals", json!({"pref_label": {"en": "metal"}})).await;
        let steel = create_concept(
            &app,
            "metals",
            json!({"pref_label": {"en": "steel"}, "broader": [metal]}),
        )
        .await;

        let uri = format!("/v0.1/concept/{}/relationships?type=narrower", metal);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], steel.as_str());

        let uri = format!("/v0.1/concept/{}/relationships?type=sideways", metal);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);

        let missing = json!({"pref_label": {"en": "iron"}, "related": [uuid::Uuid::nil()]});
        let (status, body) =
            send(&app, Method::POST, "/v0.1/project/metals/concept", Some(missing)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["violations"][0]["property"], "related");

        let (status, body) = send(&app, Method::GET, "/v0.1/concept?label=ST", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], steel.as_str());
        let (_, body) = send(&app, Method::GET, "/v0.1/concept?label=st&language=fr", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_scheme_lifecycle() {
        let app = app();
        send(&app, Method::POST, "/v0.1/project", Some(json!({"slug": "metals"}))).await;
        let metal = create_concept(&app, "metals", json!({"pref_label": {"en": "metal"}})).await;

        let draft = json!({"title": {"en": "Metals"}, "top_concepts": [metal]});
        let (status, scheme) =
            send(&app, Method::POST, "/v0.1/project/metals/concept-scheme", Some(draft)).await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/v0.1/concept-scheme/{}", scheme["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"]["en"], "Metals");
        let (_, body) = send(&app, Method::GET, "/v0.1/project/metals/concept-scheme", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let update = json!({"title": {"en": "All metals"}, "top_concepts": []});
        let (status, _) = send(&app, Method::PUT, &uri, Some(update)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&app, Method::GET, &format!("{}/concepts", uri), None).await;
        assert_eq!(body, json!([]));

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);

        // The static suggestions route still wins over the scheme id.
        let (status, _) = send(&app, Method::GET, "/v0.1/concept-scheme/suggestions", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_scheme_import() {
        let app = app();
        send(&app, Method::POST, "/v0.1/project", Some(json!({"slug": "metals"}))).await;
        let import = json!({
            "title": {"en": "Alloys"},
            "concepts": [
                {"key": "alloy", "pref_label": {"en": "alloy"}},
                {"key": "bronze", "pref_label": {"en": "bronze"}, "broader": ["alloy"]}
            ],
            "top_concepts": ["alloy"]
        });
        let (status, scheme) = send(
            &app,
            Method::POST,
            "/v0.1/project/metals/concept-scheme/import",
            Some(import),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/v0.1/concept-scheme/{}/concepts", scheme["id"].as_str().unwrap());
        let (_, members) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(members[0]["pref_label"]["en"], "alloy");
        assert_eq!(members[1]["pref_label"]["en"], "bronze");

        let (_, body) =
            send(&app, Method::POST, "/v0.1/analysis", Some(json!({"text": "bronze bells"}))).await;
        assert_eq!(body["members"].as_array().unwrap().len(), 1);

        let broken = json!({
            "concepts": [{"key": "tin", "pref_label": {"en": "tin"}, "related": ["lead"]}]
        });
        let (status, body) = send(
            &app,
            Method::POST,
            "/v0.1/project/metals/concept-scheme/import",
            Some(broken),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["violations"][0]["property"], "related");
    }

    #[tokio::test]
    async fn test_analysis_unknown_project() {
        let app = app();
        let input = json!({"text": "steel", "project_id": "unknown"});
        let (status, _) = send(&app, Method::POST, "/v0.1/analysis", Some(input)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

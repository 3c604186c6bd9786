//! REST surface for notes.
//!
//! | Method | Path           | Success          |
//! |--------|----------------|------------------|
//! | GET    | `/notes/`      | 200, all notes   |
//! | POST   | `/notes/`      | 201, new note    |
//! | GET    | `/notes/{id}`  | 200, one note    |
//! | PUT    | `/notes/{id}`  | 200, updated     |
//! | DELETE | `/notes/{id}`  | 204              |
//!
//! `/notes` without the slash answers 307 to `/notes/`.

pub mod error;
mod routes;

pub use error::ApiError;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{any, get};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::service::NoteService;

/// Build the application router around `service`.
///
/// With no `cors_origins` any origin is accepted; otherwise only the listed
/// origins are, with credentials allowed.
pub fn router(service: NoteService, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/notes", any(routes::redirect_to_collection))
        .route(
            "/notes/",
            get(routes::list_notes).post(routes::create_note),
        )
        .route(
            "/notes/{id}",
            get(routes::get_note)
                .put(routes::update_note)
                .delete(routes::delete_note),
        )
        .fallback(routes::fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
        .with_state(service)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Serve `app` on `listener` until Ctrl-C or SIGTERM.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    tracing::info!(addr = %listener.local_addr()?, "notes API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Note, NoteId};
    use crate::error::NotesError;
    use crate::storage::{MemoryStore, NewNote, NoteChanges, NoteStore};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const UNASSIGNED_ID: &str = "64b7f0c2a1e4d3b2c1a09f8e";

    fn app() -> Router {
        router(NoteService::new(Arc::new(MemoryStore::new())), &[])
    }

    struct UnreachableStore;

    #[async_trait]
    impl NoteStore for UnreachableStore {
        async fn list(&self, _limit: usize) -> Result<Vec<Note>> {
            Err(NotesError::StoreUnavailable("server selection timeout".to_string()))
        }
        async fn get(&self, _id: &NoteId) -> Result<Option<Note>> {
            Err(NotesError::StoreUnavailable("server selection timeout".to_string()))
        }
        async fn insert(&self, _note: NewNote) -> Result<Note> {
            Err(NotesError::StoreUnavailable("server selection timeout".to_string()))
        }
        async fn replace(&self, _id: &NoteId, _changes: NoteChanges) -> Result<Option<Note>> {
            Err(NotesError::StoreUnavailable("server selection timeout".to_string()))
        }
        async fn delete(&self, _id: &NoteId) -> Result<bool> {
            Err(NotesError::StoreUnavailable("server selection timeout".to_string()))
        }
        async fn ping(&self) -> Result<()> {
            Err(NotesError::StoreUnavailable("server selection timeout".to_string()))
        }
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, body: Value) -> Note {
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/notes/", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        serde_json::from_value(body_json(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_list_empty() {
        let response = app()
            .oneshot(empty_request(Method::GET, "/notes/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_create_returns_201_with_full_note() {
        let app = app();
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/notes/",
                json!({"title": "T", "content": "C", "tags": ["x", "y"]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["title"], "T");
        assert_eq!(body["content"], "C");
        assert_eq!(body["tags"], json!(["x", "y"]));
        assert_eq!(body["id"].as_str().unwrap().len(), 24);
        assert_eq!(body["created_at"], body["updated_at"]);
    }

    #[tokio::test]
    async fn test_create_without_tags() {
        let note = create(&app(), json!({"title": "T", "content": "C"})).await;
        assert!(note.tags.is_empty());
    }

    #[tokio::test]
    async fn test_create_validation_errors_are_422() {
        let app = app();
        let bodies = [
            json!({"content": "C"}),
            json!({"title": "T"}),
            json!({"title": 1, "content": "C"}),
            json!({"title": "T", "content": "C", "tags": "x"}),
            json!({"title": "", "content": "C"}),
            json!({"title": format!("{}{}", "a".repeat(500), " ".repeat(5000)), "content": "C"}),
        ];
        for body in bodies {
            let response = app
                .clone()
                .oneshot(json_request(Method::POST, "/notes/", body.clone()))
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "body: {}",
                body
            );
            assert!(body_json(response).await["detail"].is_string());
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_422() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/notes/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_422() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/notes/")
            .body(Body::from(r#"{"title":"T","content":"C"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let app = app();
        let note = create(&app, json!({"title": "T", "content": "C"})).await;

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, &format!("/notes/{}", note.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: Note = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(fetched, note);
    }

    #[tokio::test]
    async fn test_invalid_id_is_400_for_every_item_route() {
        let app = app();
        let requests = [
            empty_request(Method::GET, "/notes/not-an-id"),
            json_request(
                Method::PUT,
                "/notes/not-an-id",
                json!({"title": "T", "content": "C"}),
            ),
            empty_request(Method::DELETE, "/notes/not-an-id"),
        ];
        for request in requests {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(response).await,
                json!({"detail": "Invalid note ID"})
            );
        }
    }

    #[tokio::test]
    async fn test_undecodable_id_is_400_json_for_every_item_route() {
        let app = app();
        let requests = [
            empty_request(Method::GET, "/notes/%FF"),
            json_request(Method::PUT, "/notes/%FF", json!({"title": "T", "content": "C"})),
            empty_request(Method::DELETE, "/notes/%FF"),
        ];
        for request in requests {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                response.headers()[header::CONTENT_TYPE],
                "application/json"
            );
            assert_eq!(
                body_json(response).await,
                json!({"detail": "Invalid note ID"})
            );
        }
    }

    #[tokio::test]
    async fn test_unreachable_store_is_503() {
        let app = router(NoteService::new(Arc::new(UnreachableStore)), &[]);
        let requests = [
            empty_request(Method::GET, "/notes/"),
            json_request(Method::POST, "/notes/", json!({"title": "T", "content": "C"})),
            empty_request(Method::GET, &format!("/notes/{}", UNASSIGNED_ID)),
        ];
        for request in requests {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(
                body_json(response).await,
                json!({"detail": "Document store unavailable"})
            );
        }
    }

    #[tokio::test]
    async fn test_unassigned_id_is_404_for_every_item_route() {
        let app = app();
        let uri = format!("/notes/{}", UNASSIGNED_ID);
        let requests = [
            empty_request(Method::GET, &uri),
            json_request(Method::PUT, &uri, json!({"title": "T", "content": "C"})),
            empty_request(Method::DELETE, &uri),
        ];
        for request in requests {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(
                body_json(response).await,
                json!({"detail": "Note not found"})
            );
        }
    }

    #[tokio::test]
    async fn test_update_replaces_note() {
        let app = app();
        let note = create(&app, json!({"title": "T", "content": "C", "tags": ["x"]})).await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                &format!("/notes/{}", note.id),
                json!({"title": "T2", "content": "C2", "tags": []}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let updated: Note = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(updated.id, note.id);
        assert_eq!(updated.title, "T2");
        assert!(updated.tags.is_empty());
        assert_eq!(updated.created_at, note.created_at);
        assert!(updated.updated_at >= note.updated_at);
    }

    #[tokio::test]
    async fn test_update_with_bad_body_is_422() {
        let app = app();
        let note = create(&app, json!({"title": "T", "content": "C"})).await;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PUT,
                &format!("/notes/{}", note.id),
                json!({"title": "T2"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_delete_returns_204_then_404() {
        let app = app();
        let note = create(&app, json!({"title": "T", "content": "C"})).await;
        let uri = format!("/notes/{}", note.id);

        let response = app
            .clone()
            .oneshot(empty_request(Method::DELETE, &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());

        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_collection_without_slash_redirects() {
        let response = app()
            .oneshot(empty_request(Method::GET, "/notes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/notes/");

        let response = app()
            .oneshot(json_request(
                Method::POST,
                "/notes",
                json!({"title": "T", "content": "C"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_json() {
        let response = app()
            .oneshot(empty_request(Method::GET, "/nothing"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"detail": "Not Found"}));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/notes/")
            .header(header::ORIGIN, "http://localhost:8501")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:8501"
        );
    }

    #[tokio::test]
    async fn test_cors_restricted_origins() {
        let app = router(
            NoteService::new(Arc::new(MemoryStore::new())),
            &["https://notes.example".to_string()],
        );

        let allowed = Request::builder()
            .uri("/notes/")
            .header(header::ORIGIN, "https://notes.example")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(allowed).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://notes.example"
        );

        let denied = Request::builder()
            .uri("/notes/")
            .header(header::ORIGIN, "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(denied).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}

//! Axum router configuration with middleware.
//!
//! Middleware: CORS, request tracing, and a body limit on the upload route.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use parlance_types::config::ServerConfig;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);
    let max_upload = state.config.server.max_upload_bytes;

    let upload_routes = Router::new()
        .route("/upload_media/", post(handlers::upload::upload_media))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/start_conversation/",
            post(handlers::conversation::start_conversation),
        )
        .route("/send_message/", post(handlers::conversation::send_message))
        .route(
            "/conversation_history/",
            get(handlers::conversation::conversation_history),
        )
        .route("/select_model/", post(handlers::model::select_model))
        .route("/model/", get(handlers::model::current_model))
        .merge(upload_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS from the configured origin list; `*` allows any origin.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if server.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use std::sync::RwLock;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use parlance_core::llm::backend::{ModelBackend, check_model_name};
    use parlance_core::llm::box_backend::BoxModelBackend;
    use parlance_types::chat::Turn;
    use parlance_types::config::AppConfig;
    use parlance_types::error::ModelError;

    use super::*;

    /// Replies `"<model> says: <last message>"`; fails on the message "boom".
    struct EchoBackend {
        model: RwLock<String>,
        allowed: Vec<String>,
    }

    impl ModelBackend for EchoBackend {
        fn name(&self) -> &str {
            "echo"
        }

        fn current_model(&self) -> String {
            self.model.read().unwrap().clone()
        }

        fn available_models(&self) -> Vec<String> {
            self.allowed.clone()
        }

        fn set_model(&self, name: &str) -> Result<(), ModelError> {
            check_model_name(name, &self.allowed)?;
            *self.model.write().unwrap() = name.to_string();
            Ok(())
        }

        async fn chat(&self, transcript: &[Turn]) -> Result<String, ModelError> {
            let last = transcript.last().ok_or(ModelError::EmptyResponse)?;
            if last.content == "boom" {
                return Err(ModelError::Provider {
                    message: "backend exploded".to_string(),
                });
            }
            Ok(format!("{} says: {}", self.current_model(), last.content))
        }
    }

    fn test_state(config: AppConfig) -> AppState {
        let backend = EchoBackend {
            model: RwLock::new("m1".to_string()),
            allowed: vec!["m1".to_string(), "gpt-x".to_string()],
        };
        AppState::with_backend(config, BoxModelBackend::new(backend))
    }

    fn test_app() -> (AppState, Router) {
        let state = test_state(AppConfig::default());
        (state.clone(), build_router(state))
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let (_, app) = test_app();

        let (status, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "message": "Welcome to the Web-based Chat Assistant API" })
        );

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_full_conversation_flow() {
        let (_, app) = test_app();

        let (status, body) = send(&app, post_empty("/start_conversation/?session_id=abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "started", "session_id": "abc" }));

        let (_, body) = send(&app, get("/conversation_history/?session_id=abc")).await;
        assert_eq!(body, json!({ "history": [] }));

        let (status, body) = send(&app, post_form("/send_message/", "session_id=abc&message=hi")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "response": "m1 says: hi" }));

        let (status, body) = send(&app, post_form("/select_model/", "model_name=gpt-x")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "model switched", "model": "gpt-x" }));

        let (_, body) = send(&app, post_form("/send_message/", "session_id=abc&message=again")).await;
        assert_eq!(body["response"], "gpt-x says: again");

        let (_, body) = send(&app, get("/conversation_history/?session_id=abc")).await;
        assert_eq!(
            body,
            json!({
                "history": [
                    { "role": "user", "content": "hi" },
                    { "role": "assistant", "content": "m1 says: hi" },
                    { "role": "user", "content": "again" },
                    { "role": "assistant", "content": "gpt-x says: again" },
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_session_is_400() {
        let (state, app) = test_app();

        let (status, body) =
            send(&app, post_form("/send_message/", "session_id=ghost&message=hi")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid session_id" }));
        assert!(state.chat_service.history("ghost").is_err());

        let (status, body) = send(&app, get("/conversation_history/?session_id=ghost")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid session_id");
    }

    #[tokio::test]
    async fn test_missing_inputs_are_422() {
        let (_, app) = test_app();

        let (status, body) = send(&app, post_empty("/start_conversation/")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "session_id is required");

        let (status, _) = send(&app, post_empty("/start_conversation/?session_id=")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        send(&app, post_empty("/start_conversation/?session_id=abc")).await;
        let (status, body) = send(&app, post_form("/send_message/", "session_id=abc")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "message is required");

        let (status, _) = send(&app, post_form("/select_model/", "")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_whitespace_inputs_are_accepted() {
        let (_, app) = test_app();

        let (status, body) = send(&app, post_empty("/start_conversation/?session_id=%20")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_id"], " ");

        let (status, body) =
            send(&app, post_form("/send_message/", "session_id=%20&message=%20%20")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "m1 says:   ");

        let (_, body) = send(&app, get("/conversation_history/?session_id=%20")).await;
        assert_eq!(body["history"][0], json!({ "role": "user", "content": "  " }));
    }

    #[tokio::test]
    async fn test_form_without_content_type_is_422() {
        let (_, app) = test_app();
        send(&app, post_empty("/start_conversation/?session_id=abc")).await;

        let request = Request::builder()
            .method("POST")
            .uri("/send_message/")
            .body(Body::from("session_id=abc&message=hi"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());

        let (_, body) = send(&app, get("/conversation_history/?session_id=abc")).await;
        assert_eq!(body, json!({ "history": [] }));
    }

    #[tokio::test]
    async fn test_undecodable_query_is_422() {
        let (_, app) = test_app();

        let (status, body) =
            send(&app, get("/conversation_history/?session_id=a&session_id=b")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_model_failure_is_500_and_keeps_user_turn() {
        let (_, app) = test_app();
        send(&app, post_empty("/start_conversation/?session_id=abc")).await;

        let (status, body) =
            send(&app, post_form("/send_message/", "session_id=abc&message=boom")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("backend exploded"));

        let (_, body) = send(&app, get("/conversation_history/?session_id=abc")).await;
        assert_eq!(
            body,
            json!({ "history": [{ "role": "user", "content": "boom" }] })
        );
    }

    #[tokio::test]
    async fn test_invalid_model_is_400() {
        let (_, app) = test_app();

        let (status, body) = send(&app, post_form("/select_model/", "model_name=nope")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("nope"));

        let (_, body) = send(&app, get("/model/")).await;
        assert_eq!(
            body,
            json!({ "provider": "echo", "model": "m1", "available": ["m1", "gpt-x"] })
        );
    }

    #[tokio::test]
    async fn test_restart_resets_history() {
        let (_, app) = test_app();
        send(&app, post_empty("/start_conversation/?session_id=abc")).await;
        send(&app, post_form("/send_message/", "session_id=abc&message=hi")).await;

        send(&app, post_empty("/start_conversation/?session_id=abc")).await;
        let (_, body) = send(&app, get("/conversation_history/?session_id=abc")).await;
        assert_eq!(body, json!({ "history": [] }));
    }

    fn multipart_request(field: &str, filename: &str, content: &str) -> Request<Body> {
        let boundary = "parlance-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: image/png\r\n\
             \r\n\
             {content}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/upload_media/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_reports_metadata() {
        let (_, app) = test_app();

        let (status, body) = send(&app, multipart_request("file", "cat.png", "0123456789")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "filename": "cat.png", "content_type": "image/png", "size": 10 })
        );
    }

    #[tokio::test]
    async fn test_upload_without_file_field_is_422() {
        let (_, app) = test_app();

        let (status, body) = send(&app, multipart_request("other", "cat.png", "x")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], "file is required");
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let mut config = AppConfig::default();
        config.server.max_upload_bytes = 64;
        let app = build_router(test_state(config));

        let response = app
            .oneshot(multipart_request("file", "big.bin", &"x".repeat(1024)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let mut config = AppConfig::default();
        config.server.cors_allow_origins = vec!["http://localhost:5173".to_string()];
        let app = build_router(test_state(config));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_cors_wildcard_by_default() {
        let (_, app) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}

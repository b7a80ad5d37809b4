//! HTTP surface: `POST /translate` and `GET /health`.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn, Instrument};

use crate::error::{Result, TranslatorError};
use crate::transcript::{validate_segments, TranscriptSegment};
use crate::translate::Translator;

#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<dyn Translator>,
}

impl IntoResponse for TranslatorError {
    fn into_response(self) -> Response {
        let status = match &self {
            TranslatorError::Validation(_) => StatusCode::BAD_REQUEST,
            e if e.is_upstream() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/translate", post(translate_handler))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_request))
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn log_request(request: Request<Body>, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!(
        "request",
        id = %request_id,
        method = %request.method(),
        path = %request.uri().path()
    );

    async move {
        let started = Instant::now();
        let response = next.run(request).await;
        let status = response.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), elapsed_ms = started.elapsed().as_millis() as u64, "Request failed");
        } else {
            info!(status = status.as_u16(), elapsed_ms = started.elapsed().as_millis() as u64, "Request completed");
        }
        response
    }
    .instrument(span)
    .await
}

async fn health() -> &'static str {
    "OK"
}

async fn translate_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<Vec<TranscriptSegment>>, JsonRejection>,
) -> std::result::Result<Json<Vec<TranscriptSegment>>, TranslatorError> {
    let Json(mut segments) = body.map_err(|rejection| {
        warn!("Rejected transcript body: {}", rejection.body_text());
        TranslatorError::Validation(rejection.body_text())
    })?;

    if let Err(e) = validate_segments(&segments) {
        warn!("Rejected transcript body: {}", e);
        return Err(e);
    }

    if let Err(e) = state.translator.translate(&mut segments).await {
        warn!("Translation failed: {}", e);
        return Err(e);
    }

    Ok(Json(segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    /// Uppercases every sentence, or fails when `fail` is set
    struct StubTranslator {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Translator for StubTranslator {
        async fn translate(&self, segments: &mut [TranscriptSegment]) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TranslatorError::EmptyResponse);
            }
            for segment in segments.iter_mut() {
                segment.sentence = segment.sentence.to_uppercase();
            }
            Ok(())
        }
    }

    fn app(fail: bool) -> (Router, Arc<StubTranslator>) {
        let stub = Arc::new(StubTranslator { calls: AtomicUsize::new(0), fail });
        let state = AppState { translator: stub.clone() };
        (router(state), stub)
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/translate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_translate_ok() {
        let (app, stub) = app(false);

        let res = app
            .oneshot(post_json(r#"[{"speaker":"Seif","time":"20:00","sentence":"hello"}]"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json, json!([{"speaker": "Seif", "time": "20:00", "sentence": "HELLO"}]));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let (app, stub) = app(false);

        let res = app
            .oneshot(post_json(r#"[{"speaker":"Seif","sentence":"hello"}]"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = body_json(res).await;
        assert!(json["error"].as_str().unwrap().contains("time"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_fields_are_bad_request() {
        let (app, stub) = app(false);

        let res = app
            .oneshot(post_json(r#"[{"speaker":"","time":"","sentence":""}]"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = body_json(res).await;
        assert!(json["error"].as_str().unwrap().contains("speaker"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _) = app(false);

        let res = app.oneshot(post_json("[{not json")).await.unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(res).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_translation_failure_returns_only_error_body() {
        let (app, _) = app(true);

        let res = app
            .oneshot(post_json(r#"[{"speaker":"Seif","time":"20:00","sentence":"تيست"}]"#))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(res).await;
        assert_eq!(json, json!({"error": "OpenAI Response didn't contain choices"}));
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(false);

        let res = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }
}

//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Create the application router.
///
/// There are no routes: the conversion handler is the fallback for every
/// path.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(handlers::convert)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use dsvg_core::{BasicRenderer, Converter, encode_payload};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    const MODEL: &str = concat!(
        "<mxGraphModel><root>",
        r#"<mxCell id="0"/><mxCell id="1" parent="0"/>"#,
        r#"<mxCell id="2" value="Box" vertex="1" parent="1">"#,
        r#"<mxGeometry x="0" y="0" width="80" height="30" as="geometry"/></mxCell>"#,
        "</root></mxGraphModel>"
    );

    fn router() -> Router {
        create_router(Arc::new(AppState {
            converter: Arc::new(Converter::new(BasicRenderer::new())),
        }))
    }

    async fn send(method: &str, uri: &str, body: impl Into<Body>) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body.into())
            .unwrap();
        router().oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_post_converts_on_any_path() {
        let input = format!("<mxfile><diagram>{MODEL}</diagram></mxfile>");
        let response = send("POST", "/some/path", input).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "image/svg+xml"
        );
        let svg = body_text(response).await;
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("data-cell-id=\"2\""));
    }

    #[tokio::test]
    async fn test_post_minify_compressed() {
        let input = format!(
            "<mxfile><diagram>{}</diagram></mxfile>",
            encode_payload(MODEL).unwrap()
        );
        let response = send("POST", "/?minify=1", input).await;

        assert_eq!(response.status(), StatusCode::OK);
        let svg = body_text(response).await;
        assert!(svg.contains("<style>"));
        assert!(svg.contains(r#"pointer-events="all""#));
        assert!(!svg.contains("data-cell-id"));
    }

    #[tokio::test]
    async fn test_conversion_error_is_500() {
        let response = send("POST", "/", "<mxfile/>").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let text = body_text(response).await;
        assert!(text.contains("no <diagram> element"), "{text}");
    }

    #[tokio::test]
    async fn test_non_post_is_405() {
        for method in ["GET", "PUT", "DELETE"] {
            let response = send(method, "/", Body::empty()).await;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body_text(response).await, "Method Not Allowed");
        }
    }

    #[tokio::test]
    async fn test_non_post_with_repeated_query_is_405() {
        let response = send("GET", "/?minify=1&minify=0", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_repeated_minify_uses_first_value() {
        let input = format!("<mxfile><diagram>{MODEL}</diagram></mxfile>");

        let response = send("POST", "/?minify=1&minify=1", input.clone()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<style>"));

        let response = send("POST", "/?minify=0&minify=1", input).await;
        assert_eq!(response.status(), StatusCode::OK);
        let svg = body_text(response).await;
        assert!(!svg.contains("<style>"));
        assert!(svg.contains("data-cell-id"));
    }
}

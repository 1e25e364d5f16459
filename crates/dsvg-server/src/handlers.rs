//! Conversion endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use dsvg_core::ConvertOptions;

use crate::error::ServerError;
use crate::state::AppState;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Handle any request: `POST` converts the body, everything else is 405.
pub(crate) async fn convert(
    State(state): State<Arc<AppState>>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Response, ServerError> {
    if method != Method::POST {
        return Ok((
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "Method Not Allowed",
        )
            .into_response());
    }

    let options = ConvertOptions {
        minify: first_param(query.as_deref(), "minify") == Some("1"),
    };
    tracing::debug!(bytes = body.len(), minify = options.minify, "Converting diagram");

    let converter = Arc::clone(&state.converter);
    let svg = tokio::task::spawn_blocking(move || converter.convert(&body, options)).await??;

    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg).into_response())
}

/// Value of the first `key` pair in a raw query string. A bare key yields `""`.
fn first_param<'q>(query: Option<&'q str>, key: &str) -> Option<&'q str> {
    query?.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        (name == key).then_some(value)
    })
}

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use strata_page::{ContentPage, NotFound, PageError};
use tracing::error;

/// Serve the content addressed by the request path.
///
/// The path is percent-decoded before it reaches the page. Content is sent
/// as-is with no `Content-Type`; missing content is a `404` carrying the
/// not-found message.
pub async fn serve_content(State(page): State<Arc<ContentPage>>, uri: Uri) -> Response {
    let raw = uri.path().to_string();
    let path = match percent_decode_str(&raw).decode_utf8() {
        Ok(path) => path.into_owned(),
        Err(_) => return not_found(NotFound::new(uri.path())),
    };

    // Store reads are blocking filesystem calls.
    match tokio::task::spawn_blocking(move || page.handle(&path)).await {
        Ok(Ok(content)) => Response::new(Body::from(content)),
        Ok(Err(PageError::NotFound(nf))) => not_found(nf),
        Ok(Err(err)) => {
            error!(path = %raw, error = %err, "failed to read content");
            internal_error()
        }
        Err(err) => {
            error!(path = %raw, error = %err, "content task failed");
            internal_error()
        }
    }
}

fn not_found(nf: NotFound) -> Response {
    (StatusCode::NOT_FOUND, nf.message).into_response()
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

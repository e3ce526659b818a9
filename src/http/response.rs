//! HTTP response building module
//!
//! Builders for the responses the wiki sends, decoupled from handler logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Build a plain-text response, falling back to a bare body if the builder fails
fn build_text_response(
    status: StatusCode,
    body: impl Into<Bytes>,
    extra_headers: &[(&str, &str)],
) -> Response<Full<Bytes>> {
    let body = body.into();
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8");
    for (name, value) in extra_headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Full::new(body.clone())).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        Response::new(Full::new(body))
    })
}

/// Build 400 Bad Request response
pub fn build_400_response(message: &str) -> Response<Full<Bytes>> {
    build_text_response(StatusCode::BAD_REQUEST, format!("400 Bad Request: {message}"), &[])
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "404 page not found", &[])
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    build_text_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "405 Method Not Allowed",
        &[("Allow", allow)],
    )
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large", &[])
}

/// Build 415 Unsupported Media Type response
pub fn build_415_response(content_type: &str) -> Response<Full<Bytes>> {
    build_text_response(
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
        format!("415 Unsupported Media Type: {content_type}"),
        &[("Accept", "application/x-www-form-urlencoded")],
    )
}

/// Build 500 response carrying the raw error text
pub fn build_500_response(message: &str) -> Response<Full<Bytes>> {
    build_text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("{message}\n"),
        &[],
    )
}

/// Build 302 redirect response
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    build_text_response(StatusCode::FOUND, "Redirecting...", &[("Location", target)])
}

/// Build HTML page response; HEAD keeps the length but drops the body
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

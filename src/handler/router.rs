//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body limits, route resolution,
//! dispatch to the wiki handlers, and access logging.

use crate::config::AppState;
use crate::handler::wiki;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{Action, RouteMatch};
use crate::storage::Title;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, REFERER, SERVER, USER_AGENT,
};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// What a wiki handler gets to see of the request
pub struct RequestContext<'a> {
    pub title: Title,
    pub is_head: bool,
    /// Request `Content-Type`, if any
    pub content_type: Option<&'a str>,
    /// Raw request body (urlencoded form for saves)
    pub form: &'a [u8],
    pub query: Option<&'a str>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = version_label(parts.version).to_string();
    entry.referer = header_string(&parts.headers, &REFERER);
    entry.user_agent = header_string(&parts.headers, &USER_AGENT);

    let max_body_size = state.config.http.max_body_size;
    let mut response = if let Some(resp) = check_body_size(&parts.headers, max_body_size) {
        resp
    } else {
        match read_body(body, max_body_size).await {
            Ok(form) => {
                let content_type = parts.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
                dispatch(
                    &parts.method,
                    parts.uri.path(),
                    parts.uri.query(),
                    content_type,
                    &form,
                    &state,
                )
                .await
            }
            Err(resp) => resp,
        }
    };

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve the request against the route table and run the matching handler
pub async fn dispatch(
    method: &Method,
    path: &str,
    query: Option<&str>,
    content_type: Option<&str>,
    form: &[u8],
    state: &AppState,
) -> Response<Full<Bytes>> {
    match state.routes.resolve(method, path) {
        RouteMatch::Found { action, title } => {
            let ctx = RequestContext {
                title,
                is_head: *method == Method::HEAD,
                content_type,
                form,
                query,
            };
            match action {
                Action::View => wiki::view(&ctx, state).await,
                Action::Edit => wiki::edit(&ctx, state).await,
                Action::Save => wiki::save(&ctx, state).await,
            }
        }
        RouteMatch::MethodNotAllowed { allow } => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            http::build_405_response(&allow)
        }
        RouteMatch::NotFound => {
            logger::log_invalid_path(path);
            http::build_404_response()
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect the body, enforcing the limit for chunked uploads too
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!(
                "Request body exceeded {max_body_size} bytes while reading"
            ));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            Err(http::build_400_response(&e.to_string()))
        }
    }
}

fn header_string(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

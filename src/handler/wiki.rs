//! Wiki page handlers
//!
//! view, edit and save. Each runs once per request against the page store.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use crate::routing::Action;
use crate::storage::{Page, StoreError};

/// Form field holding the page body
const BODY_FIELD: &str = "body";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Show a page, or send the client to the edit form when it cannot be loaded
pub async fn view(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    logger::log_page_request(Action::View.as_str(), ctx.title.as_str());
    match state.store.load(&ctx.title).await {
        Ok(page) => render(state, "view", &page, ctx.is_head),
        Err(e) => {
            log_load_failure(&e);
            http::build_redirect_response(&Action::Edit.path(&ctx.title))
        }
    }
}

/// Show the edit form, blank for a page that does not exist yet
pub async fn edit(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    logger::log_page_request(Action::Edit.as_str(), ctx.title.as_str());
    let page = match state.store.load(&ctx.title).await {
        Ok(page) => page,
        Err(e) => {
            log_load_failure(&e);
            Page::empty(ctx.title.clone())
        }
    };
    render(state, "edit", &page, ctx.is_head)
}

/// Persist the submitted body and redirect to the page
pub async fn save(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    logger::log_page_request(Action::Save.as_str(), ctx.title.as_str());
    if !is_form_body(ctx.content_type, ctx.form) {
        let content_type = ctx.content_type.unwrap_or("none");
        logger::log_warning(&format!(
            "Refusing to save {}: unsupported Content-Type {content_type}",
            ctx.title
        ));
        return http::build_415_response(content_type);
    }

    let body = form_value(ctx.form, ctx.query, BODY_FIELD);
    let page = Page::new(ctx.title.clone(), body.into_bytes());
    if let Err(e) = state.store.save(&page).await {
        logger::log_error(&format!("Failed to save page {}: {e}", ctx.title));
        return http::build_500_response(&e.to_string());
    }
    http::build_redirect_response(&Action::View.path(&ctx.title))
}

fn render(state: &AppState, name: &str, page: &Page, is_head: bool) -> Response<Full<Bytes>> {
    match state.templates.render(name, page) {
        Ok(html) => http::build_html_response(html, is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to render {name} for {}: {e}", page.title));
            http::build_500_response(&e.to_string())
        }
    }
}

/// Missing pages are routine; anything else is worth a warning
fn log_load_failure(err: &StoreError) {
    if !matches!(err, StoreError::NotFound(_)) {
        logger::log_warning(&format!("Failed to load page: {err}"));
    }
}

/// Whether the request body can be read as an urlencoded form
///
/// Without a Content-Type only an empty body is accepted, so the query
/// string alone can still carry the field.
fn is_form_body(content_type: Option<&str>, form: &[u8]) -> bool {
    match content_type {
        Some(ct) => ct
            .split(';')
            .next()
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(FORM_URLENCODED)),
        None => form.is_empty(),
    }
}

/// First value of `field` in the urlencoded form body, then the query string
///
/// An absent field yields an empty string. Decoding is lossy and never fails.
fn form_value(form: &[u8], query: Option<&str>, field: &str) -> String {
    let from_form: Vec<(String, String)> = serde_urlencoded::from_bytes(form).unwrap_or_default();
    if let Some((_, value)) = from_form.into_iter().find(|(k, _)| k == field) {
        return value;
    }

    let from_query: Vec<(String, String)> = query
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();
    from_query
        .into_iter()
        .find(|(k, _)| k == field)
        .map(|(_, v)| v)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::{MemoryStore, Title};
    use hyper::StatusCode;
    use std::sync::Arc;

    #[test]
    fn test_form_value_decodes() {
        let value = form_value(b"body=Hello+world%21%0Aline+2&other=x", None, "body");
        assert_eq!(value, "Hello world!\nline 2");
    }

    #[test]
    fn test_form_value_first_wins() {
        assert_eq!(form_value(b"body=a&body=b", None, "body"), "a");
    }

    #[test]
    fn test_form_value_falls_back_to_query() {
        assert_eq!(form_value(b"", Some("body=from+query"), "body"), "from query");
        assert_eq!(form_value(b"body=form", Some("body=query"), "body"), "form");
    }

    #[test]
    fn test_form_value_missing_is_empty() {
        assert_eq!(form_value(b"", None, "body"), "");
        assert_eq!(form_value(b"title=x", None, "body"), "");
        assert_eq!(form_value(b"body=", None, "body"), "");
    }

    #[test]
    fn test_form_value_invalid_utf8_is_replaced() {
        assert_eq!(form_value(b"body=ok%FF", None, "body"), "ok\u{FFFD}");
    }

    #[test]
    fn test_is_form_body() {
        assert!(is_form_body(Some(FORM_URLENCODED), b"body=x"));
        assert!(is_form_body(
            Some("Application/X-WWW-Form-Urlencoded; charset=UTF-8"),
            b"body=x"
        ));
        assert!(is_form_body(None, b""));

        assert!(!is_form_body(None, b"body=x"));
        assert!(!is_form_body(Some("multipart/form-data; boundary=XyZ"), b"--XyZ"));
        assert!(!is_form_body(Some("text/plain"), b"body=x"));
    }

    #[tokio::test]
    async fn test_undefined_template_is_500_with_error_text() {
        let config = Config::load_with("does-not-exist", None).expect("config");
        let state = AppState::new(config, Arc::new(MemoryStore::new())).expect("state");
        let page = Page::empty(Title::parse("Rust").expect("title"));

        let resp = render(&state, "history", &page, false);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = http_body_util::BodyExt::collect(resp.into_body())
            .await
            .expect("body")
            .to_bytes();
        assert_eq!(&body[..], b"template \"history\" is undefined\n");
    }
}

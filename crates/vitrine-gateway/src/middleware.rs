//! Request middleware: traffic logging and the locale/session resolver.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use vitrine_core::resolver::{CookieSet, RequestParts, Resolution};

use crate::AppState;

pub async fn log_page_traffic(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::info!(
        "[VITRINE] {} {} -> {}",
        method,
        path,
        response.status().as_u16()
    );
    response
}

/// Resolve locale and session before the page handler runs. Redirects are
/// answered here; otherwise the [`LocaleContext`](vitrine_core::LocaleContext)
/// is inserted into the request extensions. Either way the merged cookie set
/// is appended to the outgoing response.
pub async fn resolve_locale(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let parts = request_parts(&request);

    match state.pipeline.resolve(&parts).await {
        Resolution::Bypass => next.run(request).await,
        Resolution::Routed {
            context,
            response: mutation,
            authenticated,
        } => {
            tracing::debug!(
                "[VITRINE] {} locale={} default={} authenticated={}",
                parts.path,
                context.resolved_locale(),
                context.is_default(),
                authenticated
            );
            let mut response = match &mutation.redirect {
                Some(location) => Redirect::temporary(location).into_response(),
                None => {
                    request.extensions_mut().insert(context);
                    next.run(request).await
                }
            };
            append_cookies(&mut response, &mutation.cookies);
            response
        }
    }
}

fn request_parts(request: &Request<Body>) -> RequestParts {
    let uri = request.uri();
    let mut parts = RequestParts::new(uri.path(), uri.query(), None);
    let headers = request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok());
    parts.cookies = vitrine_core::resolver::RequestCookies::parse(headers);
    parts
}

fn append_cookies(response: &mut Response, cookies: &CookieSet) {
    for cookie in cookies.iter() {
        match HeaderValue::from_str(&cookie.to_header_value()) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => {
                tracing::warn!("[VITRINE] dropping unencodable cookie {}: {}", cookie.name, e);
            }
        }
    }
}

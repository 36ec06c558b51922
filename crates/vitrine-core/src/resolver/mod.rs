//! Request-locale resolver.
//!
//! Every page request passes through [`ResolverPipeline::resolve`] before a
//! handler runs: excluded paths bypass it, everything else gets a session
//! refresh, a locale decision and one merged cookie set.

pub mod cookies;
pub mod locale_stage;
pub mod matcher;
pub mod pipeline;
pub mod session;

pub use cookies::{Cookie, CookieSet, RequestCookies, SameSite};
pub use locale_stage::{LocaleStage, DEFAULT_LOCALE_COOKIE};
pub use matcher::RouteMatcher;
pub use pipeline::{merge, Resolution, ResolverPipeline, ResponseMutation, StageName};
pub use session::{
    AnonymousSession, SessionCookieNames, SessionError, SessionOutcome, SessionRefresher,
    TokenEndpointRefresher,
};

/// The parts of an inbound request the resolver looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParts {
    pub path: String,
    pub query: Option<String>,
    pub cookies: RequestCookies,
}

impl RequestParts {
    pub fn new(path: &str, query: Option<&str>, cookie_header: Option<&str>) -> Self {
        Self {
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query: query.map(str::to_string),
            cookies: RequestCookies::parse(cookie_header),
        }
    }
}

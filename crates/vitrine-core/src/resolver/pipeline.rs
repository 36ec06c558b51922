//! The resolver pipeline: `session` → `locale` → `merge`.

use std::fmt;
use std::sync::Arc;

use super::cookies::CookieSet;
use super::locale_stage::LocaleStage;
use super::matcher::RouteMatcher;
use super::session::{SessionOutcome, SessionRefresher};
use super::RequestParts;
use crate::locale::LocaleContext;

/// Partial response produced by one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMutation {
    pub cookies: CookieSet,
    /// `Location` of a temporary redirect; `None` lets the request through.
    pub redirect: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageName {
    Session,
    Locale,
    Merge,
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageName::Session => "session",
            StageName::Locale => "locale",
            StageName::Merge => "merge",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Excluded path: nothing ran, nothing to set.
    Bypass,
    Routed {
        context: LocaleContext,
        response: ResponseMutation,
        authenticated: bool,
    },
}

/// Session cookies overwrite locale cookies on name collision; the locale
/// stage's redirect is kept as-is.
pub fn merge(session: &ResponseMutation, mut locale: ResponseMutation) -> ResponseMutation {
    let collided = locale.cookies.overwrite_from(&session.cookies);
    for name in &collided {
        tracing::debug!(
            target: "vitrine::resolver",
            "[{}] cookie {} set by both stages; session value kept",
            StageName::Merge,
            name
        );
    }
    locale
}

pub struct ResolverPipeline {
    matcher: RouteMatcher,
    session: Arc<dyn SessionRefresher>,
    locale: LocaleStage,
}

impl ResolverPipeline {
    pub fn new(matcher: RouteMatcher, session: Arc<dyn SessionRefresher>, locale: LocaleStage) -> Self {
        Self {
            matcher,
            session,
            locale,
        }
    }

    pub fn matcher(&self) -> &RouteMatcher {
        &self.matcher
    }

    pub fn locale_stage(&self) -> &LocaleStage {
        &self.locale
    }

    pub async fn resolve(&self, request: &RequestParts) -> Resolution {
        if self.matcher.is_excluded(&request.path) {
            return Resolution::Bypass;
        }

        let session = match self.session.refresh(&request.cookies).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    target: "vitrine::resolver",
                    "[{}] refresh failed, continuing unauthenticated: {}",
                    StageName::Session,
                    e
                );
                SessionOutcome::anonymous()
            }
        };
        let session_mutation = ResponseMutation {
            cookies: session.cookies,
            redirect: None,
        };

        let (context, locale_mutation) = self.locale.resolve(request);
        tracing::debug!(
            target: "vitrine::resolver",
            "[{}] {} -> {} (redirect: {:?})",
            StageName::Locale,
            request.path,
            context.resolved_locale(),
            locale_mutation.redirect
        );

        Resolution::Routed {
            context,
            response: merge(&session_mutation, locale_mutation),
            authenticated: session.authenticated,
        }
    }
}

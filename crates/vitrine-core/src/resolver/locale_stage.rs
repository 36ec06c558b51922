//! Locale stage: path prefix, then cookie, then default; always prefix the URL.

use super::cookies::{Cookie, CookieSet, SameSite};
use super::pipeline::ResponseMutation;
use super::RequestParts;
use crate::locale::{Locale, LocaleContext, LocaleSet};

pub const DEFAULT_LOCALE_COOKIE: &str = "NEXT_LOCALE";

/// One year, matching the locale cookie lifetime browsers keep for the site.
const LOCALE_COOKIE_MAX_AGE: i64 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone)]
pub struct LocaleStage {
    locales: LocaleSet,
    cookie_name: String,
    detection: bool,
}

impl LocaleStage {
    /// `detection` enables the cookie fallback between path prefix and default.
    pub fn new(locales: LocaleSet, cookie_name: impl Into<String>, detection: bool) -> Self {
        Self {
            locales,
            cookie_name: cookie_name.into(),
            detection,
        }
    }

    pub fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn resolve(&self, request: &RequestParts) -> (LocaleContext, ResponseMutation) {
        let (first, rest) = split_first_segment(&request.path);

        let (context, redirect) = match self.locales.lookup(first) {
            Some(locale) => {
                let context = self.locales.resolve(Some(first));
                // Non-canonical casing (`/PT-br/...`) is redirected to the canonical code.
                let redirect = (first != locale.code())
                    .then(|| prefixed(locale.code(), rest, request.query.as_deref()));
                (context, redirect)
            }
            None => {
                let from_cookie = if self.detection {
                    request.cookies.get(&self.cookie_name)
                } else {
                    None
                };
                let context = self.locales.resolve(from_cookie);
                let path = if request.path == "/" { "" } else { request.path.as_str() };
                let redirect = prefixed(
                    context.resolved_locale().code(),
                    path,
                    request.query.as_deref(),
                );
                (context, Some(redirect))
            }
        };

        let mut cookies = CookieSet::new();
        cookies.set(
            Cookie::new(&self.cookie_name, context.resolved_locale().code())
                .with_path("/")
                .with_max_age(LOCALE_COOKIE_MAX_AGE)
                .with_same_site(SameSite::Lax),
        );

        (context, ResponseMutation { cookies, redirect })
    }

    /// The same page under `locale` (`/pt-BR/terms` → `/en/terms`). A path
    /// without a supported prefix is taken as the unprefixed page. The query is kept.
    pub fn path_for(&self, request: &RequestParts, locale: Locale) -> String {
        let (first, rest) = split_first_segment(&request.path);
        let rest = if self.locales.lookup(first).is_some() {
            rest
        } else if request.path == "/" {
            ""
        } else {
            request.path.as_str()
        };
        prefixed(locale.code(), rest, request.query.as_deref())
    }

    /// `(hreflang, path)` for every supported locale, then `x-default`.
    pub fn alternates(&self, request: &RequestParts) -> Vec<(&'static str, String)> {
        let mut links: Vec<_> = self
            .locales
            .supported()
            .iter()
            .map(|locale| (locale.code(), self.path_for(request, *locale)))
            .collect();
        links.push((
            "x-default",
            self.path_for(request, self.locales.default_locale()),
        ));
        links
    }
}

/// `/en/terms` → (`en`, `/terms`); `/` → (``, ``).
fn split_first_segment(path: &str) -> (&str, &str) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    match trimmed.find('/') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx..]),
        None => (trimmed, ""),
    }
}

fn prefixed(code: &str, path: &str, query: Option<&str>) -> String {
    let mut location = format!("/{}{}", code, path);
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(query);
    }
    location
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(detection: bool) -> LocaleStage {
        LocaleStage::new(LocaleSet::default(), DEFAULT_LOCALE_COOKIE, detection)
    }

    fn request(path: &str, query: Option<&str>, cookie: Option<&str>) -> RequestParts {
        RequestParts::new(path, query, cookie)
    }

    #[test]
    fn supported_prefix_passes_through() {
        let (ctx, mutation) = stage(false).resolve(&request("/en/terms", None, None));
        assert_eq!(ctx.resolved_locale(), Locale::En);
        assert_eq!(ctx.requested_locale(), Some("en"));
        assert_eq!(mutation.redirect, None);
        assert_eq!(mutation.cookies.value("NEXT_LOCALE"), Some("en"));
    }

    #[test]
    fn root_redirects_to_default() {
        let (ctx, mutation) = stage(false).resolve(&request("/", None, None));
        assert!(ctx.is_default());
        assert_eq!(ctx.requested_locale(), None);
        assert_eq!(mutation.redirect.as_deref(), Some("/pt-BR"));
        assert_eq!(mutation.cookies.value("NEXT_LOCALE"), Some("pt-BR"));
    }

    #[test]
    fn unprefixed_path_keeps_path_and_query() {
        let (_, mutation) = stage(false).resolve(&request("/terms", Some("utm_source=ig"), None));
        assert_eq!(mutation.redirect.as_deref(), Some("/pt-BR/terms?utm_source=ig"));
    }

    #[test]
    fn unsupported_prefix_resolves_to_default() {
        let (ctx, mutation) = stage(false).resolve(&request("/fr/terms", None, None));
        assert_eq!(ctx.resolved_locale(), Locale::PtBr);
        assert!(ctx.is_default());
        assert_eq!(mutation.redirect.as_deref(), Some("/pt-BR/fr/terms"));
    }

    #[test]
    fn cookie_is_ignored_when_detection_is_off() {
        let (ctx, _) = stage(false).resolve(&request("/", None, Some("NEXT_LOCALE=en")));
        assert_eq!(ctx.resolved_locale(), Locale::PtBr);
    }

    #[test]
    fn cookie_is_used_when_detection_is_on() {
        let (ctx, mutation) = stage(true).resolve(&request("/privacy", None, Some("NEXT_LOCALE=en")));
        assert_eq!(ctx.resolved_locale(), Locale::En);
        assert_eq!(ctx.requested_locale(), Some("en"));
        assert_eq!(mutation.redirect.as_deref(), Some("/en/privacy"));
    }

    #[test]
    fn unsupported_cookie_falls_back() {
        let (ctx, _) = stage(true).resolve(&request("/", None, Some("NEXT_LOCALE=de")));
        assert_eq!(ctx.resolved_locale(), Locale::PtBr);
        assert_eq!(ctx.requested_locale(), Some("de"));
    }

    #[test]
    fn path_prefix_beats_cookie() {
        let (ctx, mutation) = stage(true).resolve(&request("/pt-BR", None, Some("NEXT_LOCALE=en")));
        assert_eq!(ctx.resolved_locale(), Locale::PtBr);
        assert_eq!(mutation.redirect, None);
    }

    #[test]
    fn non_canonical_casing_redirects() {
        let (ctx, mutation) = stage(false).resolve(&request("/PT-br/refund", Some("a=1"), None));
        assert_eq!(ctx.resolved_locale(), Locale::PtBr);
        assert_eq!(mutation.redirect.as_deref(), Some("/pt-BR/refund?a=1"));
    }

    #[test]
    fn path_for_swaps_the_locale_prefix() {
        let stage = stage(false);
        assert_eq!(stage.path_for(&request("/pt-BR/terms", None, None), Locale::En), "/en/terms");
        assert_eq!(stage.path_for(&request("/en", None, None), Locale::PtBr), "/pt-BR");
        assert_eq!(
            stage.path_for(&request("/PT-br/refund", Some("a=1"), None), Locale::En),
            "/en/refund?a=1"
        );
        assert_eq!(stage.path_for(&request("/terms", None, None), Locale::En), "/en/terms");
        assert_eq!(stage.path_for(&request("/", None, None), Locale::En), "/en");
    }

    #[test]
    fn alternates_cover_every_locale_and_default() {
        let links = stage(false).alternates(&request("/en/privacy", None, None));
        assert_eq!(
            links,
            vec![
                ("pt-BR", "/pt-BR/privacy".to_string()),
                ("en", "/en/privacy".to_string()),
                ("x-default", "/pt-BR/privacy".to_string()),
            ]
        );
    }

    #[test]
    fn splits_segments() {
        assert_eq!(split_first_segment("/"), ("", ""));
        assert_eq!(split_first_segment("/en"), ("en", ""));
        assert_eq!(split_first_segment("/en/a/b"), ("en", "/a/b"));
    }
}

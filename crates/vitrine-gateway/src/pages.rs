//! Page handlers and the HTML shell every locale-prefixed page is served in.
//! Section markup and copy are rendered client-side from the locale bundles.

use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Extension,
};
use serde_json::json;
use vitrine_core::dispatcher::{AnalyticsEvent, DispatcherConfig, TrackedSection};
use vitrine_core::resolver::RequestParts;
use vitrine_core::{AnalyticsSettings, LocaleContext};

use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Terms,
    Privacy,
    Refund,
    Account,
}

impl Page {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.trim_matches('/') {
            "" => Some(Page::Home),
            "terms" => Some(Page::Terms),
            "privacy" => Some(Page::Privacy),
            "refund" => Some(Page::Refund),
            "account" => Some(Page::Account),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Terms => "terms",
            Page::Privacy => "privacy",
            Page::Refund => "refund",
            Page::Account => "account",
        }
    }
}

pub async fn home(
    State(state): State<AppState>,
    uri: Uri,
    context: Option<Extension<LocaleContext>>,
) -> Response {
    match context {
        Some(Extension(ctx)) => render(&state, &uri, &ctx, Page::Home),
        None => not_found().await.into_response(),
    }
}

pub async fn page(
    State(state): State<AppState>,
    Path((_locale, slug)): Path<(String, String)>,
    uri: Uri,
    context: Option<Extension<LocaleContext>>,
) -> Response {
    match (context, Page::from_slug(&slug)) {
        (Some(Extension(ctx)), Some(page)) => render(&state, &uri, &ctx, page),
        _ => not_found().await.into_response(),
    }
}

fn render(state: &AppState, uri: &Uri, ctx: &LocaleContext, page: Page) -> Response {
    let request = RequestParts::new(uri.path(), None, None);
    let alternates = state.pipeline.locale_stage().alternates(&request);
    let tracked_sections = DispatcherConfig::default().tracked_sections;
    Html(
        Shell {
            site_name: &state.config.site_name,
            context: ctx,
            page,
            analytics: &state.config.analytics,
            alternates: &alternates,
            tracked_sections: &tracked_sections,
        }
        .render(),
    )
    .into_response()
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Everything the HTML shell of one page needs.
pub struct Shell<'a> {
    pub site_name: &'a str,
    pub context: &'a LocaleContext,
    pub page: Page,
    pub analytics: &'a AnalyticsSettings,
    /// `(hreflang, href)` pairs, see [`LocaleStage::alternates`](vitrine_core::resolver::LocaleStage::alternates).
    pub alternates: &'a [(&'static str, String)],
    pub tracked_sections: &'a [TrackedSection],
}

impl Shell<'_> {
    /// `<html lang>`, `og:locale`, hreflang alternates, the page id, and the
    /// tracking bootstrap. With a pixel configured the bootstrap carries the
    /// initial `PageView` call; the interaction dispatcher handles the rest.
    pub fn render(&self) -> String {
        let locale = self.context.resolved_locale();
        let on_load: Vec<_> = match &self.analytics.pixel_id {
            Some(_) => {
                let page_view = AnalyticsEvent::PageView;
                vec![json!([page_view.event_type().as_str(), page_view.name()])]
            }
            None => Vec::new(),
        };
        let sections: Vec<_> = self
            .tracked_sections
            .iter()
            .map(|s| {
                json!({
                    "id": s.id,
                    "contentName": s.content_name,
                    "contentCategory": s.content_category,
                })
            })
            .collect();
        let analytics_config = json!({
            "pixelId": self.analytics.pixel_id,
            "clarityId": self.analytics.clarity_id,
            "onLoad": on_load,
            "trackedSections": sections,
        });
        let alternates: String = self
            .alternates
            .iter()
            .map(|(lang, href)| {
                format!(
                    "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}\">\n",
                    html_escape(lang),
                    html_escape(href)
                )
            })
            .collect();
        format!(
            r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta property="og:locale" content="{og}">
<meta property="og:site_name" content="{title}">
{alternates}<script type="application/json" id="analytics-config">{config}</script>
</head>
<body data-page="{page}" data-locale="{lang}">
<div id="app"></div>
<script type="module" src="/static/app.js"></script>
</body>
</html>
"#,
            lang = locale.code(),
            og = locale.og_locale(),
            title = html_escape(self.site_name),
            alternates = alternates,
            page = self.page.slug(),
            config = script_safe(&analytics_config.to_string()),
        )
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// JSON embedded in a `<script>` block must not be able to close it.
fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::LocaleSet;

    fn shell_html(site_name: &str, ctx: &LocaleContext, page: Page, analytics: &AnalyticsSettings) -> String {
        let alternates = vec![
            ("pt-BR", "/pt-BR/terms".to_string()),
            ("en", "/en/terms".to_string()),
            ("x-default", "/pt-BR/terms".to_string()),
        ];
        Shell {
            site_name,
            context: ctx,
            page,
            analytics,
            alternates: &alternates,
            tracked_sections: &[TrackedSection::pricing()],
        }
        .render()
    }

    #[test]
    fn slugs() {
        assert_eq!(Page::from_slug(""), Some(Page::Home));
        assert_eq!(Page::from_slug("terms/"), Some(Page::Terms));
        assert_eq!(Page::from_slug("blog"), None);
    }

    #[test]
    fn shell_carries_locale_and_tracking_ids() {
        let ctx = LocaleSet::default().resolve(Some("en"));
        let analytics = AnalyticsSettings {
            pixel_id: Some("1274".into()),
            clarity_id: None,
        };
        let html = shell_html("Vitrine", &ctx, Page::Terms, &analytics);
        assert!(html.contains(r#"<html lang="en">"#));
        assert!(html.contains(r#"content="en_US""#));
        assert!(html.contains(r#""pixelId":"1274""#));
        assert!(html.contains(r#"data-page="terms""#));
    }

    #[test]
    fn shell_lists_hreflang_alternates() {
        let ctx = LocaleSet::default().resolve(Some("pt-BR"));
        let html = shell_html("Vitrine", &ctx, Page::Terms, &AnalyticsSettings::default());
        assert!(html.contains(r#"<link rel="alternate" hreflang="en" href="/en/terms">"#));
        assert!(html.contains(r#"<link rel="alternate" hreflang="pt-BR" href="/pt-BR/terms">"#));
        assert!(html.contains(r#"<link rel="alternate" hreflang="x-default" href="/pt-BR/terms">"#));
    }

    #[test]
    fn page_view_call_only_with_a_pixel() {
        let ctx = LocaleSet::default().resolve(None);
        let with_pixel = AnalyticsSettings {
            pixel_id: Some("1274".into()),
            clarity_id: None,
        };
        let html = shell_html("Vitrine", &ctx, Page::Home, &with_pixel);
        assert!(html.contains(r#""onLoad":[["track","PageView"]]"#));
        assert!(html.contains(r#""contentName":"Pricing Section""#));
        assert!(html.contains(r#""contentCategory":"Pacotes Premium""#));

        let html = shell_html("Vitrine", &ctx, Page::Home, &AnalyticsSettings::default());
        assert!(html.contains(r#""onLoad":[]"#));
        assert!(html.contains(r#""id":"pricing""#));
    }

    #[test]
    fn script_payload_cannot_close_the_tag() {
        let ctx = LocaleSet::default().resolve(None);
        let analytics = AnalyticsSettings {
            pixel_id: Some("</script><script>alert(1)".into()),
            clarity_id: None,
        };
        let html = shell_html("<Vitrine>", &ctx, Page::Home, &analytics);
        assert!(!html.contains("</script><script>alert"));
        assert!(html.contains("&lt;Vitrine&gt;"));
    }
}

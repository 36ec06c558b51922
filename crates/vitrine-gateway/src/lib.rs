//! Vitrine Gateway: locale-prefixed pages, lead capture and static assets.
//!
//! Every page request runs through the resolver middleware first; handlers
//! read the resulting [`LocaleContext`](vitrine_core::LocaleContext) from the
//! request extensions.

pub mod leads;
pub mod middleware;
pub mod pages;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use vitrine_core::resolver::{
    AnonymousSession, LocaleStage, ResolverPipeline, SessionRefresher, TokenEndpointRefresher,
};
use vitrine_core::{ConfigError, LeadForwarder, SiteConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub pipeline: Arc<ResolverPipeline>,
    pub leads: Arc<LeadForwarder>,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("session backend: {0}")]
    Session(#[from] vitrine_core::resolver::SessionError),

    #[error("lead forwarder: {0}")]
    Leads(#[from] vitrine_core::LeadError),
}

impl AppState {
    /// Build the resolver and lead forwarder from configuration.
    pub fn from_config(config: SiteConfig) -> Result<Self, StartupError> {
        let session: Arc<dyn SessionRefresher> = match &config.auth {
            Some(auth) => Arc::new(TokenEndpointRefresher::new(auth.clone())?),
            None => {
                tracing::info!("[VITRINE] No auth backend configured; all visitors are anonymous.");
                Arc::new(AnonymousSession)
            }
        };
        let locale = LocaleStage::new(
            config.locale_set()?,
            config.locale_cookie.clone(),
            config.locale_detection,
        );
        let pipeline = ResolverPipeline::new(config.route_matcher()?, session, locale);
        let leads = LeadForwarder::new(&config.leads)?;
        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            leads: Arc::new(leads),
        })
    }
}

pub fn build_app(state: AppState) -> Router {
    let pages = Router::new()
        .route("/", get(pages::not_found))
        .route("/:locale", get(pages::home))
        .route("/:locale/*page", get(pages::page))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::resolve_locale,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/leads", post(leads::submit_lead))
        .nest_service("/static", ServeDir::new(&state.config.assets_dir))
        .merge(pages)
        .layer(axum::middleware::from_fn(middleware::log_page_traffic))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

//! Vitrine Gateway: serves the localized landing pages.
//! Config from `config/site.toml` + `VITRINE_*` env; `RUST_LOG` controls verbosity.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitrine_core::SiteConfig;
use vitrine_gateway::{build_app, AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[vitrine-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match SiteConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[vitrine-gateway] invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let bind_addr = config.bind_addr.clone();

    let state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("[vitrine-gateway] startup failed: {}", e);
            std::process::exit(1);
        }
    };

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    tracing::info!("[VITRINE] Gateway listening on {}", bind_addr);

    axum::serve(listener, app).await.unwrap();
}

//! Site configuration.
//!
//! Precedence: env `VITRINE_CONFIG` path > `config/site.toml` > built-in defaults,
//! with `VITRINE_*` environment variables layered on top (`__` separates nested
//! keys, e.g. `VITRINE_AUTH__URL`). List keys accept comma-separated values.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | bind_addr | 127.0.0.1:8000 | Gateway listen address. |
//! | locales | pt-BR,en | Supported locale codes. |
//! | default_locale | pt-BR | Used when neither path nor cookie yields a supported locale. |
//! | locale_detection | false | Consult the locale cookie before falling back to the default. |
//! | locale_cookie | NEXT_LOCALE | Locale cookie name. |
//! | excluded_prefixes / excluded_extensions | see [`crate::resolver::matcher`] | Paths that bypass the resolver. |
//! | auth.* | unset | Session refresh backend; unset means every visitor is anonymous. |
//! | leads.webhook_url | unset | Where accepted leads are forwarded. |
//! | analytics.pixel_id / analytics.clarity_id | unset | Tracking IDs rendered into pages. |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::locale::{Locale, LocaleSet, UnknownLocale};
use crate::resolver::locale_stage::DEFAULT_LOCALE_COOKIE;
use crate::resolver::matcher::{RouteMatcher, DEFAULT_EXCLUDED_EXTENSIONS, DEFAULT_EXCLUDED_PREFIXES};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error(transparent)]
    Locale(#[from] UnknownLocale),

    #[error("invalid exclusion pattern: {0}")]
    Matcher(#[from] regex::Error),
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_site_name() -> String {
    "Vitrine".to_string()
}

fn default_locales() -> Vec<String> {
    Locale::ALL.iter().map(|l| l.code().to_string()).collect()
}

fn default_locale_code() -> String {
    Locale::PtBr.code().to_string()
}

fn default_locale_cookie() -> String {
    DEFAULT_LOCALE_COOKIE.to_string()
}

fn default_excluded_prefixes() -> Vec<String> {
    DEFAULT_EXCLUDED_PREFIXES.iter().map(|s| s.to_string()).collect()
}

fn default_excluded_extensions() -> Vec<String> {
    DEFAULT_EXCLUDED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_assets_dir() -> String {
    "./public".to_string()
}

fn default_cookie_prefix() -> String {
    "sb".to_string()
}

fn default_auth_timeout_ms() -> u64 {
    2000
}

fn default_refresh_margin_secs() -> i64 {
    60
}

/// Auth backend used by the session refresh stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_cookie_prefix")]
    pub cookie_prefix: String,
    #[serde(default = "default_auth_timeout_ms")]
    pub timeout_ms: u64,
    /// Refresh this many seconds before the access token expires.
    #[serde(default = "default_refresh_margin_secs")]
    pub refresh_margin_secs: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSettings {
    #[serde(default)]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    #[serde(default)]
    pub pixel_id: Option<String>,
    #[serde(default)]
    pub clarity_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    #[serde(default = "default_locale_code")]
    pub default_locale: String,
    pub locale_detection: bool,
    #[serde(default = "default_locale_cookie")]
    pub locale_cookie: String,
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,
    #[serde(default = "default_excluded_extensions")]
    pub excluded_extensions: Vec<String>,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    pub auth: Option<AuthSettings>,
    pub leads: LeadSettings,
    pub analytics: AnalyticsSettings,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            bind_addr: default_bind_addr(),
            locales: default_locales(),
            default_locale: default_locale_code(),
            locale_detection: false,
            locale_cookie: default_locale_cookie(),
            excluded_prefixes: default_excluded_prefixes(),
            excluded_extensions: default_excluded_extensions(),
            assets_dir: default_assets_dir(),
            auth: None,
            leads: LeadSettings::default(),
            analytics: AnalyticsSettings::default(),
        }
    }
}

impl SiteConfig {
    /// Load from file and environment, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("VITRINE_CONFIG").unwrap_or_else(|_| "config/site".to_string());
        Self::load_from(Path::new(&config_path))
    }

    /// `path` may omit the extension (`config/site` finds `config/site.toml`).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("VITRINE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("locales")
                    .with_list_parse_key("excluded_prefixes")
                    .with_list_parse_key("excluded_extensions"),
            );
        let cfg: SiteConfig = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.locale_set()?;
        self.route_matcher()?;
        Ok(())
    }

    pub fn locale_set(&self) -> Result<LocaleSet, ConfigError> {
        let supported = self
            .locales
            .iter()
            .map(|code| code.parse::<Locale>())
            .collect::<Result<Vec<_>, _>>()?;
        let default = self.default_locale.parse::<Locale>()?;
        Ok(LocaleSet::new(supported, default)?)
    }

    pub fn route_matcher(&self) -> Result<RouteMatcher, ConfigError> {
        Ok(RouteMatcher::new(
            &self.excluded_prefixes,
            &self.excluded_extensions,
        )?)
    }
}

//! Session refresh stage: keeps the auth token pair in the cookie jar fresh.
//!
//! Runs before locale resolution on every routed request. It only ever
//! produces cookies; failures are reported to the pipeline, which treats them
//! as "no session".

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::cookies::{Cookie, CookieSet, RequestCookies, SameSite};
use crate::config::AuthSettings;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("auth endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("auth endpoint rejected refresh: HTTP {0}")]
    Rejected(u16),

    #[error("malformed token response: {0}")]
    Malformed(String),
}

/// Cookies the session stage wants set, and whether the visitor is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOutcome {
    pub cookies: CookieSet,
    pub authenticated: bool,
}

impl SessionOutcome {
    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[async_trait]
pub trait SessionRefresher: Send + Sync {
    async fn refresh(&self, cookies: &RequestCookies) -> Result<SessionOutcome, SessionError>;
}

/// Used when no auth backend is configured: every visitor is anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousSession;

#[async_trait]
impl SessionRefresher for AnonymousSession {
    async fn refresh(&self, _cookies: &RequestCookies) -> Result<SessionOutcome, SessionError> {
        Ok(SessionOutcome::anonymous())
    }
}

/// Names of the three session cookies, derived from a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookieNames {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: String,
}

impl SessionCookieNames {
    pub fn new(prefix: &str) -> Self {
        Self {
            access_token: format!("{}-access-token", prefix),
            refresh_token: format!("{}-refresh-token", prefix),
            expires_at: format!("{}-expires-at", prefix),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
}

/// Refreshes against a GoTrue-style token endpoint
/// (`POST {url}/auth/v1/token?grant_type=refresh_token`).
pub struct TokenEndpointRefresher {
    client: reqwest::Client,
    settings: AuthSettings,
    names: SessionCookieNames,
}

impl TokenEndpointRefresher {
    pub fn new(settings: AuthSettings) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;
        let names = SessionCookieNames::new(&settings.cookie_prefix);
        Ok(Self {
            client,
            settings,
            names,
        })
    }

    pub fn cookie_names(&self) -> &SessionCookieNames {
        &self.names
    }

    fn token_url(&self) -> String {
        format!(
            "{}/auth/v1/token?grant_type=refresh_token",
            self.settings.url.trim_end_matches('/')
        )
    }

    fn session_cookie(&self, name: &str, value: String) -> Cookie {
        Cookie::new(name, value)
            .with_path("/")
            .http_only()
            .with_same_site(SameSite::Lax)
    }
}

#[async_trait]
impl SessionRefresher for TokenEndpointRefresher {
    async fn refresh(&self, cookies: &RequestCookies) -> Result<SessionOutcome, SessionError> {
        let refresh_token = match cookies.get(&self.names.refresh_token) {
            Some(token) if !token.is_empty() => token,
            _ => return Ok(SessionOutcome::anonymous()),
        };

        let now = chrono::Utc::now().timestamp();
        let expires_at = cookies
            .get(&self.names.expires_at)
            .and_then(|v| v.parse::<i64>().ok());
        let access_present = cookies
            .get(&self.names.access_token)
            .map(|t| !t.is_empty())
            .unwrap_or(false);
        if access_present
            && expires_at
                .map(|at| at - self.settings.refresh_margin_secs > now)
                .unwrap_or(false)
        {
            return Ok(SessionOutcome {
                cookies: CookieSet::new(),
                authenticated: true,
            });
        }

        let response = self
            .client
            .post(self.token_url())
            .header("apikey", &self.settings.anon_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Rejected(status.as_u16()));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SessionError::Malformed(e.to_string()))?;
        if token.access_token.is_empty() || token.refresh_token.is_empty() {
            return Err(SessionError::Malformed("empty token".to_string()));
        }
        let expires_at = token
            .expires_at
            .or_else(|| token.expires_in.map(|secs| now + secs))
            .unwrap_or(now);

        tracing::debug!(target: "vitrine::session", "session refreshed; expires_at={}", expires_at);

        let mut out = CookieSet::new();
        out.set(self.session_cookie(&self.names.access_token, token.access_token));
        out.set(self.session_cookie(&self.names.refresh_token, token.refresh_token));
        out.set(self.session_cookie(&self.names.expires_at, expires_at.to_string()));
        Ok(SessionOutcome {
            cookies: out,
            authenticated: true,
        })
    }
}

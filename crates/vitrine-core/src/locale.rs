//! Supported locales and the per-request locale context.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A locale the site is translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::PtBr, Locale::En];

    /// Canonical BCP 47 code, as used in URL prefixes and the locale cookie.
    pub fn code(self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::En => "en",
        }
    }

    /// Open Graph locale (`og:locale` meta).
    pub fn og_locale(self) -> &'static str {
        match self {
            Locale::PtBr => "pt_BR",
            Locale::En => "en_US",
        }
    }

    /// Case-insensitive lookup by code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_code(s.trim()).ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

/// The enumerated set of supported locales plus the designated default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    supported: Vec<Locale>,
    default: Locale,
}

impl LocaleSet {
    /// Fails when `default` is not one of `supported`.
    pub fn new(supported: Vec<Locale>, default: Locale) -> Result<Self, UnknownLocale> {
        if !supported.contains(&default) {
            return Err(UnknownLocale(default.code().to_string()));
        }
        let mut deduped = Vec::with_capacity(supported.len());
        for locale in supported {
            if !deduped.contains(&locale) {
                deduped.push(locale);
            }
        }
        Ok(Self {
            supported: deduped,
            default,
        })
    }

    pub fn supported(&self) -> &[Locale] {
        &self.supported
    }

    pub fn default_locale(&self) -> Locale {
        self.default
    }

    /// Case-insensitive lookup restricted to the supported set.
    pub fn lookup(&self, code: &str) -> Option<Locale> {
        Locale::from_code(code).filter(|l| self.supported.contains(l))
    }

    /// Resolve a requested code; anything unsupported or absent becomes the default.
    pub fn resolve(&self, requested: Option<&str>) -> LocaleContext {
        let resolved = requested
            .and_then(|code| self.lookup(code))
            .unwrap_or(self.default);
        LocaleContext {
            requested_locale: requested.map(str::to_string),
            resolved_locale: resolved,
            is_default: resolved == self.default,
        }
    }
}

impl Default for LocaleSet {
    fn default() -> Self {
        Self {
            supported: Locale::ALL.to_vec(),
            default: Locale::PtBr,
        }
    }
}

/// Outcome of locale resolution for one request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleContext {
    requested_locale: Option<String>,
    resolved_locale: Locale,
    is_default: bool,
}

impl LocaleContext {
    /// What the request asked for (path prefix or cookie), verbatim.
    pub fn requested_locale(&self) -> Option<&str> {
        self.requested_locale.as_deref()
    }

    pub fn resolved_locale(&self) -> Locale {
        self.resolved_locale
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_parse_case_insensitively() {
        assert_eq!("pt-br".parse::<Locale>().unwrap(), Locale::PtBr);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn unsupported_request_falls_back_to_default() {
        let set = LocaleSet::default();
        let ctx = set.resolve(Some("fr"));
        assert_eq!(ctx.resolved_locale(), Locale::PtBr);
        assert!(ctx.is_default());
        assert_eq!(ctx.requested_locale(), Some("fr"));
    }

    #[test]
    fn supported_request_wins() {
        let ctx = LocaleSet::default().resolve(Some("en"));
        assert_eq!(ctx.resolved_locale(), Locale::En);
        assert!(!ctx.is_default());
    }

    #[test]
    fn lookup_respects_the_supported_set() {
        let set = LocaleSet::new(vec![Locale::En], Locale::En).unwrap();
        assert_eq!(set.lookup("pt-BR"), None);
        assert_eq!(set.resolve(Some("pt-BR")).resolved_locale(), Locale::En);
    }

    #[test]
    fn default_must_be_supported() {
        assert!(LocaleSet::new(vec![Locale::En], Locale::PtBr).is_err());
    }

    #[test]
    fn og_locale_mapping() {
        assert_eq!(Locale::PtBr.og_locale(), "pt_BR");
        assert_eq!(Locale::En.og_locale(), "en_US");
    }
}

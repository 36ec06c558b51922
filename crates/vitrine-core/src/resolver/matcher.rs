//! Path-exclusion predicate: requests it matches never reach the resolver.

use regex::Regex;

pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &[
    "_next/static",
    "_next/image",
    "favicon.ico",
    "static/",
    "api/",
];

pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] =
    &["svg", "png", "jpg", "jpeg", "gif", "webp", "mp4"];

/// Excludes paths that start (after the leading `/`) with one of the prefixes,
/// or end with one of the extensions (case-insensitive).
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    pattern: Option<Regex>,
}

impl RouteMatcher {
    pub fn new<P, E>(prefixes: P, extensions: E) -> Result<Self, regex::Error>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let prefixes: Vec<String> = prefixes
            .into_iter()
            .map(|p| p.as_ref().trim_start_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .map(|p| regex::escape(&p))
            .collect();
        let extensions: Vec<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .map(|e| regex::escape(&e))
            .collect();

        let mut branches = Vec::new();
        if !prefixes.is_empty() {
            branches.push(format!("^/(?:{})", prefixes.join("|")));
        }
        if !extensions.is_empty() {
            branches.push(format!("(?i:\\.(?:{}))$", extensions.join("|")));
        }
        let pattern = if branches.is_empty() {
            None
        } else {
            Some(Regex::new(&branches.join("|"))?)
        };
        Ok(Self { pattern })
    }

    /// True when the resolver must be skipped for `path`.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.pattern
            .as_ref()
            .map(|re| re.is_match(path))
            .unwrap_or(false)
    }
}

impl Default for RouteMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_PREFIXES, DEFAULT_EXCLUDED_EXTENSIONS)
            .unwrap_or(Self { pattern: None })
    }
}

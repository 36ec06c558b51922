//! Request cookie parsing and response cookie sets.

use indexmap::IndexMap;

/// `SameSite` attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// A response cookie: name, value and the attributes rendered into `Set-Cookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub max_age: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

impl Cookie {
    /// Bare `name=value` with no attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            max_age: None,
            http_only: false,
            secure: false,
            same_site: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Value of a `Set-Cookie` header for this cookie.
    pub fn to_header_value(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        if let Some(path) = &self.path {
            out.push_str("; Path=");
            out.push_str(path);
        }
        if let Some(max_age) = self.max_age {
            out.push_str(&format!("; Max-Age={}", max_age));
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        if self.secure {
            out.push_str("; Secure");
        }
        if let Some(same_site) = self.same_site {
            out.push_str("; SameSite=");
            out.push_str(same_site.as_str());
        }
        out
    }
}

/// Ordered name → cookie mapping. Setting an existing name replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieSet {
    cookies: IndexMap<String, Cookie>,
}

impl CookieSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns the cookie that was replaced.
    pub fn set(&mut self, cookie: Cookie) -> Option<Cookie> {
        self.cookies.insert(cookie.name.clone(), cookie)
    }

    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|c| c.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.values()
    }

    /// Copy every cookie of `other` onto `self`, `other` winning on name collision.
    /// Returns the names that collided.
    pub fn overwrite_from(&mut self, other: &CookieSet) -> Vec<String> {
        let mut collided = Vec::new();
        for cookie in other.iter() {
            if self.set(cookie.clone()).is_some() {
                collided.push(cookie.name.clone());
            }
        }
        collided
    }
}

impl FromIterator<Cookie> for CookieSet {
    fn from_iter<I: IntoIterator<Item = Cookie>>(iter: I) -> Self {
        let mut set = CookieSet::new();
        for cookie in iter {
            set.set(cookie);
        }
        set
    }
}

/// Cookies sent by the client on the inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies {
    values: IndexMap<String, String>,
}

impl RequestCookies {
    /// Parse one or more `Cookie` header values. Malformed pairs are skipped;
    /// on duplicate names the first occurrence is kept.
    pub fn parse<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut values = IndexMap::new();
        for header in headers {
            for pair in header.split(';') {
                let Some((name, value)) = pair.split_once('=') else {
                    continue;
                };
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                let value = value.trim().trim_matches('"');
                values
                    .entry(name.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_value_renders_attributes() {
        let cookie = Cookie::new("NEXT_LOCALE", "en")
            .with_path("/")
            .with_max_age(60)
            .with_same_site(SameSite::Lax);
        assert_eq!(
            cookie.to_header_value(),
            "NEXT_LOCALE=en; Path=/; Max-Age=60; SameSite=Lax"
        );
        let secret = Cookie::new("sb-access-token", "t").http_only().secure();
        assert_eq!(secret.to_header_value(), "sb-access-token=t; HttpOnly; Secure");
    }

    #[test]
    fn overwrite_reports_collisions_and_keeps_order() {
        let mut locale: CookieSet = [Cookie::new("B", "3"), Cookie::new("C", "4")]
            .into_iter()
            .collect();
        let session: CookieSet = [Cookie::new("A", "1"), Cookie::new("B", "2")]
            .into_iter()
            .collect();
        let collided = locale.overwrite_from(&session);
        assert_eq!(collided, vec!["B".to_string()]);
        let names: Vec<_> = locale.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["B", "C", "A"]);
        assert_eq!(locale.value("B"), Some("2"));
    }

    #[test]
    fn request_cookies_parse_multiple_headers() {
        let cookies = RequestCookies::parse(["a=1; b=\"two\"", "junk; c = 3", "a=dup"]);
        assert_eq!(cookies.get("a"), Some("1"));
        assert_eq!(cookies.get("b"), Some("two"));
        assert_eq!(cookies.get("c"), Some("3"));
        assert!(!cookies.contains("junk"));
    }
}

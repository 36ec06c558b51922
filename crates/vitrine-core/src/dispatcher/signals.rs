//! Raw browser signals, as reported by the host page.

/// Document scroll geometry at the time of a scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Rounded scroll percentage; `None` when the content fits in the viewport.
    pub fn percent(&self) -> Option<f64> {
        let scrollable = self.scroll_height - self.client_height;
        if scrollable <= 0.0 {
            return None;
        }
        Some((self.scroll_top / scrollable * 100.0).round())
    }
}

/// One element on the path from a click target up to the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub href: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            href: None,
        }
    }

    pub fn anchor(href: impl Into<String>) -> Self {
        Self {
            tag: "a".to_string(),
            href: Some(href.into()),
        }
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }
}

/// Click target and its ancestors, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickTarget {
    pub path: Vec<Element>,
}

impl ClickTarget {
    pub fn new(path: Vec<Element>) -> Self {
        Self { path }
    }

    /// Nearest enclosing anchor, including the target itself.
    pub fn closest_anchor(&self) -> Option<&Element> {
        self.path.iter().find(|el| el.is("a"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Scroll(ScrollMetrics),
    /// Section `id` is now `ratio` (0.0–1.0) visible.
    Visibility { section: String, ratio: f64 },
    Click(ClickTarget),
    PointerOut { client_y: f64 },
    /// A `play` event captured from element `tag`.
    MediaPlay {
        tag: String,
        current_src: Option<String>,
    },
}

/// Listener families a dispatcher subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Scroll,
    Click,
    PointerOut,
    MediaPlay,
}

impl Signal {
    /// Listener that must be active for this signal to be handled; visibility
    /// is routed through per-section observers instead.
    pub fn listener(&self) -> Option<SignalKind> {
        match self {
            Signal::Scroll(_) => Some(SignalKind::Scroll),
            Signal::Click(_) => Some(SignalKind::Click),
            Signal::PointerOut { .. } => Some(SignalKind::PointerOut),
            Signal::MediaPlay { .. } => Some(SignalKind::MediaPlay),
            Signal::Visibility { .. } => None,
        }
    }
}

//! Per-page-lifetime state and the handlers that mutate it.
//!
//! Handlers take the state by `&mut`, return the events to emit, and never
//! touch the sink themselves.

use std::collections::HashMap;

use reqwest::Url;

use super::events::AnalyticsEvent;
use super::signals::{ClickTarget, ScrollMetrics};

pub const SCROLL_THRESHOLDS: [u8; 4] = [25, 50, 75, 100];

pub const VISIBILITY_THRESHOLD: f64 = 0.5;

pub const EMAIL_CLICK: &str = "Email Click";

/// One flag per scroll threshold, set the first time it is crossed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollMarkState {
    marks: [bool; 4],
}

impl ScrollMarkState {
    pub fn is_marked(&self, threshold: u8) -> bool {
        SCROLL_THRESHOLDS
            .iter()
            .position(|t| *t == threshold)
            .map(|i| self.marks[i])
            .unwrap_or(false)
    }

    /// Ascending; every newly crossed threshold yields one event.
    pub fn observe(&mut self, metrics: &ScrollMetrics) -> Vec<AnalyticsEvent> {
        let Some(percent) = metrics.percent() else {
            return Vec::new();
        };
        let mut events = Vec::new();
        for (i, threshold) in SCROLL_THRESHOLDS.iter().enumerate() {
            if percent >= f64::from(*threshold) && !self.marks[i] {
                self.marks[i] = true;
                events.push(AnalyticsEvent::ScrollDepth { depth: *threshold });
            }
        }
        events
    }
}

/// A section whose first ≥50% visibility is reported as `ViewContent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedSection {
    pub id: String,
    pub content_name: String,
    pub content_category: String,
}

impl TrackedSection {
    pub fn pricing() -> Self {
        Self {
            id: "pricing".to_string(),
            content_name: "Pricing Section".to_string(),
            content_category: "Pacotes Premium".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityFlags {
    seen: HashMap<String, bool>,
}

impl VisibilityFlags {
    pub fn is_seen(&self, section: &str) -> bool {
        self.seen.get(section).copied().unwrap_or(false)
    }

    pub fn observe(&mut self, section: &TrackedSection, ratio: f64) -> Option<AnalyticsEvent> {
        if ratio < VISIBILITY_THRESHOLD || self.is_seen(&section.id) {
            return None;
        }
        self.seen.insert(section.id.clone(), true);
        Some(AnalyticsEvent::ViewContent {
            content_name: section.content_name.clone(),
            content_category: section.content_category.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitIntentFlag {
    fired: bool,
}

impl ExitIntentFlag {
    pub fn is_fired(&self) -> bool {
        self.fired
    }

    pub fn observe(&mut self, client_y: f64, margin_px: f64) -> Option<AnalyticsEvent> {
        if client_y < margin_px && !self.fired {
            self.fired = true;
            return Some(AnalyticsEvent::ExitIntent);
        }
        None
    }
}

/// Everything one page view remembers. Dropped with the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSession {
    pub scroll: ScrollMarkState,
    pub visibility: VisibilityFlags,
    pub exit_intent: ExitIntentFlag,
}

impl PageSession {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `Contact` when the link mentions `mailto:`; `OutboundClick` when it resolves
/// to a host other than the page's. Both can fire for one click. Links with no
/// host (`tel:`, `javascript:`) are never outbound.
pub fn classify_click(page: &Url, target: &ClickTarget) -> Vec<AnalyticsEvent> {
    let Some(href) = target
        .closest_anchor()
        .and_then(|a| a.href.as_deref())
        .map(str::trim)
        .filter(|h| !h.is_empty())
    else {
        return Vec::new();
    };

    let mut events = Vec::new();
    if href.to_ascii_lowercase().contains("mailto:") {
        events.push(AnalyticsEvent::Contact {
            content_name: EMAIL_CLICK.to_string(),
        });
    }

    if let Ok(resolved) = page.join(href) {
        if resolved.scheme() != "mailto" {
            if let Some(host) = resolved.host_str() {
                if Some(host) != page.host_str() {
                    events.push(AnalyticsEvent::OutboundClick {
                        url: resolved.to_string(),
                    });
                }
            }
        }
    }
    events
}

/// `VideoPlay` for `video` elements only; `"unknown"` when no source is known.
pub fn classify_play(tag: &str, current_src: Option<&str>) -> Option<AnalyticsEvent> {
    if !tag.eq_ignore_ascii_case("video") {
        return None;
    }
    let video_url = current_src
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_string();
    Some(AnalyticsEvent::VideoPlay { video_url })
}

//! Named analytics events and their wire shape `(event_type, event_name, properties?)`.

use serde::Serialize;
use serde_json::{Map, Value};

pub type Properties = Map<String, Value>;

/// Standard events use `track`; site-specific ones use `trackCustom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventType {
    #[serde(rename = "track")]
    Track,
    #[serde(rename = "trackCustom")]
    TrackCustom,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Track => "track",
            EventType::TrackCustom => "trackCustom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum AnalyticsEvent {
    PageView,
    ScrollDepth { depth: u8 },
    TimeOnPage { seconds: u64 },
    ViewContent {
        content_name: String,
        content_category: String,
    },
    Contact { content_name: String },
    OutboundClick { url: String },
    ExitIntent,
    VideoPlay { video_url: String },
}

impl AnalyticsEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            AnalyticsEvent::PageView
            | AnalyticsEvent::ViewContent { .. }
            | AnalyticsEvent::Contact { .. } => EventType::Track,
            _ => EventType::TrackCustom,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::PageView => "PageView",
            AnalyticsEvent::ScrollDepth { .. } => "ScrollDepth",
            AnalyticsEvent::TimeOnPage { .. } => "TimeOnPage",
            AnalyticsEvent::ViewContent { .. } => "ViewContent",
            AnalyticsEvent::Contact { .. } => "Contact",
            AnalyticsEvent::OutboundClick { .. } => "OutboundClick",
            AnalyticsEvent::ExitIntent => "ExitIntent",
            AnalyticsEvent::VideoPlay { .. } => "VideoPlay",
        }
    }

    /// Properties as the pixel expects them (`depth: "25%"`, `duration: "30s"`).
    /// `None` for events sent without a properties argument.
    pub fn properties(&self) -> Option<Properties> {
        let mut props = Properties::new();
        match self {
            AnalyticsEvent::PageView | AnalyticsEvent::ExitIntent => return None,
            AnalyticsEvent::ScrollDepth { depth } => {
                props.insert("depth".into(), Value::String(format!("{}%", depth)));
            }
            AnalyticsEvent::TimeOnPage { seconds } => {
                props.insert("duration".into(), Value::String(format!("{}s", seconds)));
            }
            AnalyticsEvent::ViewContent {
                content_name,
                content_category,
            } => {
                props.insert("content_name".into(), Value::String(content_name.clone()));
                props.insert(
                    "content_category".into(),
                    Value::String(content_category.clone()),
                );
            }
            AnalyticsEvent::Contact { content_name } => {
                props.insert("content_name".into(), Value::String(content_name.clone()));
            }
            AnalyticsEvent::OutboundClick { url } => {
                props.insert("url".into(), Value::String(url.clone()));
            }
            AnalyticsEvent::VideoPlay { video_url } => {
                props.insert("video_url".into(), Value::String(video_url.clone()));
            }
        }
        Some(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape() {
        let e = AnalyticsEvent::ScrollDepth { depth: 25 };
        assert_eq!(e.event_type().as_str(), "trackCustom");
        assert_eq!(e.name(), "ScrollDepth");
        assert_eq!(e.properties().unwrap()["depth"], "25%");

        let e = AnalyticsEvent::TimeOnPage { seconds: 120 };
        assert_eq!(e.properties().unwrap()["duration"], "120s");

        let e = AnalyticsEvent::Contact {
            content_name: "Email Click".into(),
        };
        assert_eq!(e.event_type(), EventType::Track);

        assert!(AnalyticsEvent::ExitIntent.properties().is_none());
    }

    #[test]
    fn serializes_with_event_tag() {
        let json = serde_json::to_value(AnalyticsEvent::OutboundClick {
            url: "https://other.example/".into(),
        })
        .unwrap();
        assert_eq!(json["event"], "OutboundClick");
        assert_eq!(json["url"], "https://other.example/");
    }
}

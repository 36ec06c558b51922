//! Client interaction & event dispatcher.
//!
//! A [`Dispatcher`] is mounted once per page view. It subscribes the scroll,
//! click, pointer-out and media listeners, one visibility observer per tracked
//! section present on the page, and the dwell timers; signals from the host
//! are translated into [`AnalyticsEvent`]s and forwarded to the [`SinkSlot`].
//! [`Dispatcher::teardown`] (or drop) releases all of it at once, after which
//! nothing is emitted.

pub mod events;
pub mod signals;
pub mod sink;
pub mod state;
pub mod subscriptions;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;

pub use events::{AnalyticsEvent, EventType, Properties};
pub use signals::{ClickTarget, Element, ScrollMetrics, Signal, SignalKind};
pub use sink::{AnalyticsSink, MemorySink, SinkCall, SinkSlot};
pub use state::{PageSession, TrackedSection, SCROLL_THRESHOLDS};
pub use subscriptions::{Subscription, SubscriptionId, Subscriptions};

pub const DWELL_MARKS_SECS: [u64; 4] = [30, 60, 120, 300];

#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherConfig {
    pub tracked_sections: Vec<TrackedSection>,
    pub dwell_marks: Vec<Duration>,
    /// Pointer-out closer than this to the viewport top counts as exit intent.
    pub exit_intent_margin_px: f64,
    pub page_view_on_mount: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            tracked_sections: vec![TrackedSection::pricing()],
            dwell_marks: DWELL_MARKS_SECS.iter().map(|s| Duration::from_secs(*s)).collect(),
            exit_intent_margin_px: 5.0,
            page_view_on_mount: true,
        }
    }
}

/// The page the dispatcher is mounted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub url: Url,
    /// Element ids present in the document.
    pub sections: HashSet<String>,
}

impl PageContext {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            sections: HashSet::new(),
        }
    }

    pub fn with_section(mut self, id: impl Into<String>) -> Self {
        self.sections.insert(id.into());
        self
    }
}

pub struct Dispatcher {
    config: DispatcherConfig,
    page: PageContext,
    session: PageSession,
    sink: Arc<SinkSlot>,
    subscriptions: Subscriptions,
    live: Arc<AtomicBool>,
}

impl Dispatcher {
    /// Subscribe everything and arm the dwell timers.
    ///
    /// Must be called from within a tokio runtime: dwell timers are spawned tasks.
    pub fn mount(config: DispatcherConfig, page: PageContext, sink: Arc<SinkSlot>) -> Self {
        let live = Arc::new(AtomicBool::new(true));
        let mut subscriptions = Subscriptions::new();

        for kind in [
            SignalKind::Scroll,
            SignalKind::Click,
            SignalKind::PointerOut,
            SignalKind::MediaPlay,
        ] {
            subscriptions.subscribe(Subscription::Listener(kind));
        }

        for section in &config.tracked_sections {
            if page.sections.contains(&section.id) {
                subscriptions.subscribe(Subscription::Observer(section.id.clone()));
            } else {
                tracing::debug!(target: "vitrine::dispatcher", "section #{} not on page; not observed", section.id);
            }
        }

        for mark in &config.dwell_marks {
            let mark = *mark;
            let sink = Arc::clone(&sink);
            let live = Arc::clone(&live);
            let handle = tokio::spawn(async move {
                tokio::time::sleep(mark).await;
                if live.load(Ordering::SeqCst) {
                    sink.emit(&AnalyticsEvent::TimeOnPage {
                        seconds: mark.as_secs(),
                    });
                }
            });
            subscriptions.subscribe(Subscription::Timer(handle));
        }

        let dispatcher = Self {
            config,
            page,
            session: PageSession::new(),
            sink,
            subscriptions,
            live,
        };
        if dispatcher.config.page_view_on_mount {
            dispatcher.sink.emit(&AnalyticsEvent::PageView);
        }
        dispatcher
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Translate one signal; returns the events that were produced (whether or
    /// not a sink was there to receive them).
    pub fn handle(&mut self, signal: Signal) -> Vec<AnalyticsEvent> {
        if !self.is_live() {
            return Vec::new();
        }
        if let Some(kind) = signal.listener() {
            if !self.subscriptions.is_listening(kind) {
                return Vec::new();
            }
        }

        let events = match signal {
            Signal::Scroll(metrics) => self.session.scroll.observe(&metrics),
            Signal::Visibility { section, ratio } => {
                if !self.subscriptions.is_observing(&section) {
                    return Vec::new();
                }
                self.config
                    .tracked_sections
                    .iter()
                    .find(|s| s.id == section)
                    .and_then(|tracked| self.session.visibility.observe(tracked, ratio))
                    .into_iter()
                    .collect()
            }
            Signal::Click(target) => state::classify_click(&self.page.url, &target),
            Signal::PointerOut { client_y } => self
                .session
                .exit_intent
                .observe(client_y, self.config.exit_intent_margin_px)
                .into_iter()
                .collect(),
            Signal::MediaPlay { tag, current_src } => {
                state::classify_play(&tag, current_src.as_deref()).into_iter().collect()
            }
        };

        for event in &events {
            self.sink.emit(event);
        }
        events
    }

    /// Release every listener, observer and timer. Idempotent.
    pub fn teardown(&mut self) {
        if self.live.swap(false, Ordering::SeqCst) {
            tracing::debug!(
                target: "vitrine::dispatcher",
                "teardown: releasing {} subscriptions",
                self.subscriptions.len()
            );
        }
        self.subscriptions.release_all();
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.teardown();
    }
}

//! The external analytics sink and the slot it is (eventually) installed into.

use std::sync::{Arc, Mutex, RwLock};

use super::events::{AnalyticsEvent, EventType, Properties};

/// Variadic-style analytics callable: `(event_type, event_name, properties?)`.
pub trait AnalyticsSink: Send + Sync {
    fn call(&self, event_type: EventType, event_name: &str, properties: Option<&Properties>);
}

/// Holds the sink once the provider script has loaded. Emitting into an empty
/// slot drops the event; nothing is queued.
#[derive(Default)]
pub struct SinkSlot {
    inner: RwLock<Option<Arc<dyn AnalyticsSink>>>,
}

impl SinkSlot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            inner: RwLock::new(Some(sink)),
        }
    }

    pub fn install(&self, sink: Arc<dyn AnalyticsSink>) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = Some(sink);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = None;
        }
    }

    pub fn is_installed(&self) -> bool {
        self.inner.read().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Checked on every call; returns whether the event reached a sink.
    pub fn emit(&self, event: &AnalyticsEvent) -> bool {
        let sink = match self.inner.read() {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        };
        match sink {
            Some(sink) => {
                let props = event.properties();
                sink.call(event.event_type(), event.name(), props.as_ref());
                true
            }
            None => {
                tracing::trace!(target: "vitrine::dispatcher", "no sink; dropped {}", event.name());
                false
            }
        }
    }
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkCall {
    pub event_type: EventType,
    pub event_name: String,
    pub properties: Option<Properties>,
}

/// Sink that keeps every call in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    calls: Mutex<Vec<SinkCall>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn names(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.event_name).collect()
    }

    pub fn count(&self, event_name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.event_name == event_name)
            .count()
    }
}

impl AnalyticsSink for MemorySink {
    fn call(&self, event_type: EventType, event_name: &str, properties: Option<&Properties>) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(SinkCall {
                event_type,
                event_name: event_name.to_string(),
                properties: properties.cloned(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_drops() {
        let slot = SinkSlot::empty();
        assert!(!slot.emit(&AnalyticsEvent::ExitIntent));
    }

    #[test]
    fn events_before_install_are_not_replayed() {
        let slot = SinkSlot::empty();
        slot.emit(&AnalyticsEvent::ExitIntent);
        let sink = MemorySink::new();
        slot.install(sink.clone());
        assert!(slot.emit(&AnalyticsEvent::PageView));
        assert_eq!(sink.names(), ["PageView"]);
        slot.clear();
        assert!(!slot.is_installed());
    }
}

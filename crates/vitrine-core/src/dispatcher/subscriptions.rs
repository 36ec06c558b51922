//! Disposer list: every listener, observer and timer a dispatcher acquires is
//! recorded here and released together.

use tokio::task::JoinHandle;

use super::signals::SignalKind;

/// Handle returned by [`Subscriptions::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
pub enum Subscription {
    Listener(SignalKind),
    Observer(String),
    Timer(JoinHandle<()>),
}

impl Subscription {
    fn dispose(self) {
        if let Subscription::Timer(handle) = self {
            handle.abort();
        }
    }
}

#[derive(Debug, Default)]
pub struct Subscriptions {
    next_id: u64,
    active: Vec<(SubscriptionId, Subscription)>,
    released: bool,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// After [`release_all`](Self::release_all) new subscriptions are disposed immediately.
    pub fn subscribe(&mut self, subscription: Subscription) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        if self.released {
            subscription.dispose();
        } else {
            self.active.push((id, subscription));
        }
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.active.iter().position(|(sid, _)| *sid == id) {
            Some(idx) => {
                let (_, sub) = self.active.remove(idx);
                sub.dispose();
                true
            }
            None => false,
        }
    }

    pub fn is_listening(&self, kind: SignalKind) -> bool {
        self.active
            .iter()
            .any(|(_, s)| matches!(s, Subscription::Listener(k) if *k == kind))
    }

    pub fn is_observing(&self, section: &str) -> bool {
        self.active
            .iter()
            .any(|(_, s)| matches!(s, Subscription::Observer(id) if id == section))
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn release_all(&mut self) {
        self.released = true;
        for (_, sub) in self.active.drain(..) {
            sub.dispose();
        }
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsubscribe_removes_one() {
        let mut subs = Subscriptions::new();
        let scroll = subs.subscribe(Subscription::Listener(SignalKind::Scroll));
        subs.subscribe(Subscription::Observer("pricing".into()));
        assert!(subs.unsubscribe(scroll));
        assert!(!subs.unsubscribe(scroll));
        assert!(!subs.is_listening(SignalKind::Scroll));
        assert!(subs.is_observing("pricing"));
    }

    #[test]
    fn release_all_is_final() {
        let mut subs = Subscriptions::new();
        subs.subscribe(Subscription::Listener(SignalKind::Click));
        subs.release_all();
        assert!(subs.is_empty());
        subs.subscribe(Subscription::Listener(SignalKind::Click));
        assert!(!subs.is_listening(SignalKind::Click));
    }

    #[tokio::test(start_paused = true)]
    async fn release_aborts_timers() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;
        use std::time::Duration;

        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            flag.store(true, Ordering::SeqCst);
        });
        let abort = handle.abort_handle();

        let mut subs = Subscriptions::new();
        subs.subscribe(Subscription::Timer(handle));
        subs.release_all();
        tokio::time::sleep(Duration::from_secs(7200)).await;

        assert!(abort.is_finished());
        assert!(!fired.load(Ordering::SeqCst));
    }
}

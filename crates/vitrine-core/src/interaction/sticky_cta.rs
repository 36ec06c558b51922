use std::time::{Duration, Instant};

pub const REVEAL_DELAY: Duration = Duration::from_secs(2);

/// Mobile call-to-action bar, hidden for the first seconds after mount.
#[derive(Debug, Clone, Copy)]
pub struct StickyCta {
    mounted_at: Instant,
}

impl StickyCta {
    pub fn mount(now: Instant) -> Self {
        Self { mounted_at: now }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.mounted_at) >= REVEAL_DELAY
    }
}

//! Click-to-play navigation timing.
//!
//! A click starts a screen wipe and schedules the page change for when the
//! wipe ends. Timestamps are page-relative milliseconds (`performance.now()`).

/// A navigation waiting for its transition to finish.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingNavigation {
    pub href: String,
    pub started_at_ms: f64,
    pub delay_ms: f64,
}

impl PendingNavigation {
    pub fn new(href: impl Into<String>, started_at_ms: f64, delay_ms: f64) -> Self {
        Self {
            href: href.into(),
            started_at_ms,
            delay_ms: delay_ms.max(0.0),
        }
    }

    pub fn is_due(&self, now_ms: f64) -> bool {
        now_ms - self.started_at_ms >= self.delay_ms
    }

    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        (self.delay_ms - (now_ms - self.started_at_ms)).max(0.0)
    }
}

/// Allows one navigation per page session.
#[derive(Debug, Default)]
pub struct NavigationGate {
    pending: Option<PendingNavigation>,
    completed: bool,
}

impl NavigationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a navigation. Returns `None` if one is already pending or done.
    pub fn begin(&mut self, href: &str, now_ms: f64, delay_ms: f64) -> Option<&PendingNavigation> {
        if self.is_locked() {
            return None;
        }
        self.pending = Some(PendingNavigation::new(href, now_ms, delay_ms));
        self.pending.as_ref()
    }

    /// Hand out the target once its delay has elapsed. Yields at most once.
    pub fn take_due(&mut self, now_ms: f64) -> Option<String> {
        if !self.pending.as_ref()?.is_due(now_ms) {
            return None;
        }
        self.completed = true;
        self.pending.take().map(|p| p.href)
    }

    pub fn is_locked(&self) -> bool {
        self.pending.is_some() || self.completed
    }

    pub fn pending(&self) -> Option<&PendingNavigation> {
        self.pending.as_ref()
    }
}

//! Transient status notices
//!
//! At most one notice is shown at a time. Posting a notice replaces the
//! current one and restarts its clear timer.

use log::{info, warn};
use std::time::Duration;

use crate::navigator::TimerQueue;

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Holder of the current notice.
#[derive(Debug)]
pub struct NoticeBoard {
    current: Option<Notice>,
    clear_after: Duration,
    timers: TimerQueue<()>,
    torn_down: bool,
}

impl NoticeBoard {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            current: None,
            clear_after,
            timers: TimerQueue::new(),
            torn_down: false,
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn success(&mut self, now: Duration, message: impl Into<String>) {
        self.post(now, NoticeKind::Success, message.into());
    }

    pub fn error(&mut self, now: Duration, message: impl Into<String>) {
        self.post(now, NoticeKind::Error, message.into());
    }

    fn post(&mut self, now: Duration, kind: NoticeKind, message: String) {
        if self.torn_down {
            return;
        }
        match kind {
            NoticeKind::Success => info!("{}", message),
            NoticeKind::Error => warn!("{}", message),
        }
        self.current = Some(Notice { kind, message });
        self.timers.schedule((), now + self.clear_after);
    }

    /// Clear the notice if its time is up.
    pub fn advance(&mut self, now: Duration) {
        if self.timers.pop_due(now).is_some() {
            self.current = None;
        }
    }

    /// Clear the notice right away.
    pub fn clear(&mut self) {
        self.timers.cancel(&());
        self.current = None;
    }

    /// Cancel the pending clear. The board ignores everything afterwards.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.torn_down = true;
    }
}

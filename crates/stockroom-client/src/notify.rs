//! # Notices
//!
//! The user-facing message channel: one success or error line at a time.
//!
//! ## Channel Behaviour
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   notify(A)        notify(B)                      (display elapsed)     │
//! │      │                │                                  │              │
//! │      ▼                ▼                                  ▼              │
//! │   ┌──────┐         ┌──────┐                          ┌──────┐          │
//! │   │  A   │ ──────► │  B   │ ───────────────────────► │ none │          │
//! │   └──────┘         └──────┘                          └──────┘          │
//! │                                                                         │
//! │   Last write wins. Each notice restarts the display clock.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The clock is `tokio::time`, so tests can pause and advance it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

// =============================================================================
// Notice
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// One message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

// =============================================================================
// Notifier Trait
// =============================================================================

/// Receiver of user notices.
///
/// Implemented by the message box below, by front ends that print
/// immediately, and by [`NoOpNotifier`] for tests.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// No-op notifier for testing.
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _notice: Notice) {}
}

// =============================================================================
// Message Box
// =============================================================================

/// Shared last-write-wins notice slot that clears itself after a fixed
/// display duration.
#[derive(Debug)]
pub struct MessageBox {
    display: Duration,
    slot: Mutex<Option<(Notice, Instant)>>,
}

impl MessageBox {
    pub fn new(display: Duration) -> Self {
        MessageBox {
            display,
            slot: Mutex::new(None),
        }
    }

    /// The visible notice, if it has not expired yet.
    pub fn current(&self) -> Option<Notice> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match slot.as_ref() {
            Some((_, shown_at)) if shown_at.elapsed() >= self.display => {
                *slot = None;
                None
            }
            Some((notice, _)) => Some(notice.clone()),
            None => None,
        }
    }

    /// Removes the visible notice, if any, and returns it.
    pub fn take(&self) -> Option<Notice> {
        let notice = self.current();
        self.clear();
        notice
    }

    pub fn clear(&self) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn display_duration(&self) -> Duration {
        self.display
    }
}

impl Notifier for MessageBox {
    fn notify(&self, notice: Notice) {
        debug!(kind = ?notice.kind, message = %notice.message, "Notice");
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some((notice, Instant::now()));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_notice_expires() {
        let messages = MessageBox::new(Duration::from_secs(5));
        messages.notify(Notice::success("Supplier added successfully"));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(
            messages.current().map(|n| n.message),
            Some("Supplier added successfully".to_string())
        );

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(messages.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_write_wins_and_restarts_clock() {
        let messages = MessageBox::new(Duration::from_secs(5));
        messages.notify(Notice::success("first"));

        tokio::time::advance(Duration::from_secs(3)).await;
        messages.notify(Notice::error("second"));

        tokio::time::advance(Duration::from_secs(3)).await;
        let current = messages.current().unwrap();
        assert_eq!(current.message, "second");
        assert!(current.is_error());
    }

    #[tokio::test]
    async fn test_take_clears() {
        let messages = MessageBox::new(Duration::from_secs(5));
        messages.notify(Notice::error("boom"));

        assert!(messages.take().is_some());
        assert!(messages.current().is_none());
    }
}

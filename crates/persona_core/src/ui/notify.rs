//! User notifications: the inline dialog alert and the toast stack.
//!
//! # Invariants
//! - The inline alert is a single slot; showing one replaces the previous.
//! - Toasts are appended in order and expire after a fixed duration.

use std::time::{Duration, Instant};
use uuid::Uuid;

/// Default toast display time.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(4000);

/// Visual severity shared by alerts and toasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Danger,
    Warning,
    Info,
}

impl AlertLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// Alert shown inside the open dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineAlert {
    pub level: AlertLevel,
    pub message: String,
}

impl InlineAlert {
    pub fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// One page-level notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: Uuid,
    pub level: AlertLevel,
    pub message: String,
    pub shown_at: Instant,
}

impl Toast {
    /// `✅` for success, `❌` otherwise.
    pub fn icon(&self) -> &'static str {
        if self.level == AlertLevel::Success {
            "✅"
        } else {
            "❌"
        }
    }

    /// Icon followed by the message.
    pub fn render_text(&self) -> String {
        format!("{} {}", self.icon(), self.message)
    }
}

/// Append-only stack of self-dismissing toasts.
#[derive(Debug, Clone)]
pub struct ToastStack {
    toasts: Vec<Toast>,
    display_for: Duration,
}

impl ToastStack {
    pub fn new(display_for: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            display_for,
        }
    }

    /// Appends a toast shown from `now`; returns its id.
    pub fn push(&mut self, level: AlertLevel, message: impl Into<String>, now: Instant) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            shown_at: now,
        };
        let id = toast.id;
        self.toasts.push(toast);
        id
    }

    /// Removes toasts whose display time has elapsed at `now`.
    ///
    /// Returns how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        let display_for = self.display_for;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < display_for);
        before - self.toasts.len()
    }

    /// Removes one toast early, as the close control does.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        before != self.toasts.len()
    }

    /// Takes every toast, oldest first.
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn last(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn display_for(&self) -> Duration {
        self.display_for
    }
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

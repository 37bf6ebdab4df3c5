//! Short-lived notifications shown by the host page

use std::collections::VecDeque;

/// Seconds a toast stays up
pub const TOAST_SECONDS: f64 = 4.0;
/// Oldest toasts are dropped beyond this
pub const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub body: String,
    pub expires_at: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, title: impl Into<String>, body: impl Into<String>, now: f64) {
        let title = title.into();
        // Re-selecting the same thing refreshes rather than stacks
        self.toasts.retain(|t| t.title != title);
        self.toasts.push_back(Toast {
            title,
            body: body.into(),
            expires_at: now + TOAST_SECONDS,
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    /// Drop expired toasts
    pub fn prune(&mut self, now: f64) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn dismiss(&mut self, index: usize) {
        self.toasts.remove(index);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

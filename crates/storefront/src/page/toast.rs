//! Transient toast notification.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::effects::{EffectHandle, EffectScheduler};

/// Default time a toast stays visible.
pub const DEFAULT_TOAST: Duration = Duration::from_millis(2500);

/// Message shown after a product is added.
pub const ADDED_MESSAGE: &str = "Добавлено в корзину";

/// What the toast currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastState {
    pub message: String,
    pub active: bool,
}

/// A single toast slot that dismisses itself.
///
/// Showing a new message restarts the dismiss timer, so a later toast is
/// never hidden early by an earlier one's timer.
#[derive(Debug)]
pub struct Toast {
    state: Arc<Mutex<ToastState>>,
    effects: EffectScheduler,
    duration: Duration,
    pending: Option<EffectHandle>,
}

impl Toast {
    #[must_use]
    pub fn new(effects: EffectScheduler, duration: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(ToastState::default())),
            effects,
            duration,
            pending: None,
        }
    }

    /// Show `message` and schedule its dismissal.
    pub fn show(&mut self, message: &str) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }

        {
            let mut state = lock(&self.state);
            state.message = message.to_string();
            state.active = true;
        }

        let state = Arc::clone(&self.state);
        self.pending = self.effects.schedule(self.duration, move || {
            lock(&state).active = false;
        });
    }

    /// Hide the toast now.
    pub fn dismiss(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
        lock(&self.state).active = false;
    }

    /// Current toast state.
    #[must_use]
    pub fn current(&self) -> ToastState {
        lock(&self.state).clone()
    }
}

fn lock(state: &Mutex<ToastState>) -> MutexGuard<'_, ToastState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_toast_auto_dismisses() {
        let mut toast = Toast::new(EffectScheduler::current(), DEFAULT_TOAST);
        toast.show(ADDED_MESSAGE);
        assert!(toast.current().active);
        assert_eq!(toast.current().message, ADDED_MESSAGE);

        tokio::time::sleep(DEFAULT_TOAST + Duration::from_millis(1)).await;
        assert!(!toast.current().active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_toast_restarts_timer() {
        let mut toast = Toast::new(EffectScheduler::current(), DEFAULT_TOAST);
        toast.show("first");

        tokio::time::sleep(Duration::from_millis(2000)).await;
        toast.show("second");

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(toast.current().active);
        assert_eq!(toast.current().message, "second");

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(!toast.current().active);
    }

    #[test]
    fn test_without_runtime_toast_stays_until_dismissed() {
        let mut toast = Toast::new(EffectScheduler::disabled(), DEFAULT_TOAST);
        toast.show("hello");
        assert!(toast.current().active);

        toast.dismiss();
        assert!(!toast.current().active);
        assert_eq!(toast.current().message, "hello");
    }
}

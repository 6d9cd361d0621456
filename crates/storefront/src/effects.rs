//! Fire-and-forget scheduled effects.
//!
//! Cosmetic effects (badge pulse, toast auto-dismiss) run as detached tokio
//! tasks. Cart operations never await them and never read their results:
//! an effect that is cancelled, dropped, or never scheduled leaves the cart
//! exactly as it was.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Spawns delayed effects on a tokio runtime, if there is one.
#[derive(Debug, Clone, Default)]
pub struct EffectScheduler {
    runtime: Option<Handle>,
}

impl EffectScheduler {
    /// Schedule on the runtime the caller is running in.
    ///
    /// Outside a runtime this behaves like [`EffectScheduler::disabled`].
    #[must_use]
    pub fn current() -> Self {
        Self {
            runtime: Handle::try_current().ok(),
        }
    }

    /// A scheduler that drops every effect.
    ///
    /// Used where nothing outlives the call, e.g. a cart rebuilt per request.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { runtime: None }
    }

    /// Returns `true` if effects will actually run.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.runtime.is_some()
    }

    /// Run `effect` once `delay` has elapsed.
    ///
    /// Returns `None` when effects are disabled. Dropping the returned handle
    /// does not cancel the effect.
    pub fn schedule<F>(&self, delay: Duration, effect: F) -> Option<EffectHandle>
    where
        F: FnOnce() + Send + 'static,
    {
        let runtime = self.runtime.as_ref()?;
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            effect();
        });
        Some(EffectHandle {
            abort: task.abort_handle(),
        })
    }
}

/// Handle to a scheduled effect.
#[derive(Debug)]
pub struct EffectHandle {
    abort: AbortHandle,
}

impl EffectHandle {
    /// Cancel the effect if it has not run yet.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Returns `true` once the effect has run or been cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[test]
    fn test_no_runtime_means_disabled() {
        let scheduler = EffectScheduler::current();
        assert!(!scheduler.is_enabled());
        assert!(scheduler.schedule(Duration::from_millis(1), || {}).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_effect_runs_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let scheduler = EffectScheduler::current();
        let handle = scheduler.schedule(Duration::from_millis(500), move || {
            flag.store(true, Ordering::SeqCst);
        });
        assert!(handle.is_some());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_effect_never_runs() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let handle = EffectScheduler::current().schedule(Duration::from_millis(100), move || {
            flag.store(true, Ordering::SeqCst);
        });
        assert!(handle.is_some());
        if let Some(handle) = handle {
            handle.cancel();
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_disabled_scheduler_inside_runtime() {
        let scheduler = EffectScheduler::disabled();
        assert!(!scheduler.is_enabled());
        assert!(scheduler.schedule(Duration::ZERO, || {}).is_none());
    }
}

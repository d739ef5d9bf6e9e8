use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use quiz_core::time::format_mm_ss;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

const TICK: Duration = Duration::from_secs(1);

//
// ─── COUNTDOWN ─────────────────────────────────────────────────────────────────
//

/// Remaining seconds of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    #[must_use]
    pub fn new(duration_secs: u32) -> Self {
        Self {
            remaining: duration_secs,
        }
    }

    /// Consume one second and return what is left.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// `mm:ss` rendering of the remaining time.
    #[must_use]
    pub fn display(&self) -> String {
        format_mm_ss(self.remaining)
    }
}

//
// ─── SESSION TIMER ─────────────────────────────────────────────────────────────
//

struct ActiveCountdown {
    armed: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Single cancellable countdown driven by the tokio clock.
///
/// Starting a new countdown cancels the running one. Expiry fires at most once and
/// never after `cancel`.
#[derive(Default)]
pub struct SessionTimer {
    active: Option<ActiveCountdown>,
}

impl SessionTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down from `duration_secs`.
    ///
    /// `on_tick` receives the remaining seconds once per second; `on_expire` runs
    /// once when the countdown reaches zero. A zero duration expires on the first
    /// poll of the task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start<T, E>(&mut self, duration_secs: u32, mut on_tick: T, on_expire: E)
    where
        T: FnMut(u32) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        self.cancel();

        let armed = Arc::new(AtomicBool::new(true));
        let task_armed = Arc::clone(&armed);
        let handle = tokio::spawn(async move {
            let mut countdown = Countdown::new(duration_secs);
            let mut ticks = interval_at(Instant::now() + TICK, TICK);
            while !countdown.is_expired() {
                ticks.tick().await;
                if !task_armed.load(Ordering::Acquire) {
                    return;
                }
                on_tick(countdown.tick());
            }
            if task_armed.swap(false, Ordering::AcqRel) {
                on_expire();
            }
        });

        log::debug!("countdown started: {duration_secs}s");
        self.active = Some(ActiveCountdown { armed, handle });
    }

    /// Stop the running countdown without firing expiry.
    ///
    /// Returns true if a countdown was still armed.
    pub fn cancel(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        let was_armed = active.armed.swap(false, Ordering::AcqRel);
        active.handle.abort();
        if was_armed {
            log::debug!("countdown cancelled");
        }
        was_armed
    }

    /// True while a countdown is armed and has not finished.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|a| a.armed.load(Ordering::Acquire) && !a.handle.is_finished())
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTimer")
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;

    #[test]
    fn countdown_ticks_to_zero_and_stays_there() {
        let mut countdown = Countdown::new(2);
        assert_eq!(countdown.display(), "00:02");
        assert_eq!(countdown.tick(), 1);
        assert!(!countdown.is_expired());
        assert_eq!(countdown.tick(), 0);
        assert!(countdown.is_expired());
        assert_eq!(countdown.tick(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_every_second_then_expires_once() {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&ticks);
        let (tx, rx) = oneshot::channel();

        let mut timer = SessionTimer::new();
        timer.start(
            3,
            move |remaining| recorded.lock().unwrap().push(remaining),
            move || {
                let _ = tx.send(Instant::now());
            },
        );
        let started = Instant::now();

        let expired_at = rx.await.expect("expiry fired");
        assert_eq!(expired_at - started, Duration::from_secs(3));
        assert_eq!(*ticks.lock().unwrap(), vec![2, 1, 0]);
        assert!(!timer.is_running());
        assert!(!timer.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_expiry() {
        let expired = Arc::new(AtomicUsize::new(0));
        let fired = Arc::clone(&expired);

        let mut timer = SessionTimer::new();
        timer.start(
            5,
            |_| {},
            move || {
                fired.fetch_add(1, Ordering::SeqCst);
            },
        );
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert!(timer.is_running());
        assert!(timer.cancel());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(expired.load(Ordering::SeqCst), 0);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_replaces_the_previous_countdown() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let first_fired = Arc::clone(&first);
        let second_fired = Arc::clone(&second);

        let mut timer = SessionTimer::new();
        timer.start(
            2,
            |_| {},
            move || {
                first_fired.fetch_add(1, Ordering::SeqCst);
            },
        );
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        timer.start(
            3,
            |_| {},
            move || {
                second_fired.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_expires_without_ticking() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&ticks);
        let (tx, rx) = oneshot::channel();

        let mut timer = SessionTimer::new();
        timer.start(
            0,
            move |_| {
                counted.fetch_add(1, Ordering::SeqCst);
            },
            move || {
                let _ = tx.send(());
            },
        );

        rx.await.expect("expiry fired");
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }
}

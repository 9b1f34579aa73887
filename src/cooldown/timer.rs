//! The cooldown readiness gate.
//!
//! Readiness is a published flag, recomputed only when the gate is
//! polled: by `refresh`, by the background poller, or by
//! `wait_until_ready`. Nothing wakes observers at the exact deadline.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use super::clock::{duration_nanos, Clock, SystemClock};
use crate::core::error::Result;
use crate::core::CooldownConfig;

type RefreshHandler = Arc<dyn Fn(bool) + Send + Sync>;

struct Shared {
    config: CooldownConfig,
    clock: Arc<dyn Clock>,
    ready: AtomicBool,
    /// Next ready time, in nanoseconds since the clock origin.
    deadline: AtomicU64,
    handlers: Mutex<Vec<RefreshHandler>>,
}

impl Shared {
    fn now_nanos(&self) -> u64 {
        duration_nanos(self.clock.now())
    }

    fn time_left(&self) -> f64 {
        let deadline = i128::from(self.deadline.load(Ordering::Acquire));
        let now = i128::from(self.now_nanos());
        (deadline - now) as f64 / 1e9
    }

    fn refresh(&self) -> bool {
        // Recompute if an activation moved the deadline while we published.
        let ready = loop {
            let deadline = self.deadline.load(Ordering::Acquire);
            let ready = self.now_nanos() >= deadline;
            if self.ready.swap(ready, Ordering::AcqRel) != ready {
                debug!(ready, "cooldown readiness changed");
            }
            if self.deadline.load(Ordering::Acquire) == deadline {
                break ready;
            }
        };

        let handlers = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for handler in &handlers {
            handler(ready);
        }
        ready
    }
}

/// Rate limiter with a fixed recharge interval.
///
/// Cloning is cheap and every clone observes the same gate.
///
/// ## Usage
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use set_engine::core::CooldownConfig;
/// use set_engine::cooldown::{CooldownTimer, ManualClock};
///
/// let clock = ManualClock::new();
/// let config = CooldownConfig::new(10.0, 50.0).unwrap();
/// let timer = CooldownTimer::with_clock(config, Arc::new(clock.clone())).unwrap();
///
/// assert!(timer.activate());
/// assert!(!timer.activate());
///
/// clock.advance(Duration::from_secs(10));
/// assert!(timer.refresh());
/// assert!(timer.activate());
/// ```
#[derive(Clone)]
pub struct CooldownTimer {
    shared: Arc<Shared>,
}

impl CooldownTimer {
    /// Create a ready timer on the system clock.
    pub fn new(config: CooldownConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a ready timer on a custom clock.
    pub fn with_clock(config: CooldownConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                clock,
                ready: AtomicBool::new(true),
                deadline: AtomicU64::new(0),
                handlers: Mutex::new(Vec::new()),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &CooldownConfig {
        &self.shared.config
    }

    /// Last published readiness.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.shared.ready.load(Ordering::Acquire)
    }

    /// Seconds until ready; zero or negative once the deadline passed.
    #[must_use]
    pub fn time_left(&self) -> f64 {
        self.shared.time_left()
    }

    /// Recompute and publish readiness, then notify observers.
    pub fn refresh(&self) -> bool {
        self.shared.refresh()
    }

    /// Start a recharge if ready.
    ///
    /// Returns `false` without side effects when not ready. Of several
    /// clones activating at once, exactly one succeeds.
    pub fn activate(&self) -> bool {
        let shared = &self.shared;
        let current = shared.deadline.load(Ordering::Acquire);
        let now = shared.clock.now();
        if !self.is_ready() || duration_nanos(now) < current {
            trace!(time_left = self.time_left(), "cooldown activation rejected");
            return false;
        }

        let deadline = duration_nanos(now.saturating_add(shared.config.interval_duration()));
        if shared
            .deadline
            .compare_exchange(current, deadline, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            trace!("cooldown activation lost a race");
            return false;
        }

        debug!(interval = shared.config.interval, "cooldown activated");
        self.refresh();
        true
    }

    /// Make the gate ready immediately.
    pub fn reset(&self) {
        self.shared.deadline.store(0, Ordering::Release);
        self.refresh();
    }

    /// Register an observer called with the readiness on every poll.
    ///
    /// Handlers run on a copy of the observer list, so they may register
    /// more handlers or poll the timer. A handler registered during a
    /// poll is first called on the next one.
    pub fn on_refresh(&self, handler: impl Fn(bool) + Send + Sync + 'static) {
        self.shared
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(handler));
    }

    /// Poll readiness every `1 / refresh_rate` seconds on the Tokio runtime.
    ///
    /// Polling stops when the returned handle is dropped or every clone
    /// of the timer is gone.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use = "dropping the handle stops the poller"]
    pub fn spawn_poller(&self) -> PollerHandle {
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        let period = self.shared.config.poll_period();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                shared.refresh();
            }
            trace!("cooldown poller finished");
        });

        PollerHandle { task }
    }

    /// Suspend until the gate is ready, polling at the refresh rate.
    ///
    /// Cancelled by dropping the future; it touches nothing but the
    /// readiness flag while waiting.
    pub async fn wait_until_ready(&self) {
        let period = self.shared.config.poll_period();
        while !self.refresh() {
            tokio::time::sleep(period).await;
        }
    }
}

impl fmt::Debug for CooldownTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CooldownTimer")
            .field("config", &self.shared.config)
            .field("ready", &self.is_ready())
            .field("time_left", &self.time_left())
            .finish()
    }
}

/// Background poller; aborted on drop.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling now.
    pub fn stop(self) {
        drop(self);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooldown::ManualClock;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn manual(interval: f64) -> (CooldownTimer, ManualClock) {
        let clock = ManualClock::new();
        let config = CooldownConfig::new(interval, 100.0).unwrap();
        let timer = CooldownTimer::with_clock(config, Arc::new(clock.clone())).unwrap();
        (timer, clock)
    }

    #[test]
    fn test_starts_ready() {
        let (timer, _) = manual(5.0);
        assert!(timer.is_ready());
        assert!(timer.time_left() <= 0.0);
    }

    #[test]
    fn test_activate_gates() {
        let (timer, clock) = manual(5.0);

        assert!(timer.activate());
        assert!(!timer.is_ready());
        assert!((timer.time_left() - 5.0).abs() < 1e-9);
        assert!(!timer.activate());

        clock.advance(Duration::from_secs(3));
        assert!((timer.time_left() - 2.0).abs() < 1e-9);
        assert!(!timer.refresh());

        clock.advance(Duration::from_secs(2));
        assert!(timer.time_left() <= 0.0);
        // Published flag only changes when polled.
        assert!(!timer.is_ready());
        assert!(timer.refresh());
        assert!(timer.is_ready());
    }

    #[test]
    fn test_rejected_activation_keeps_deadline() {
        let (timer, clock) = manual(5.0);
        assert!(timer.activate());
        clock.advance(Duration::from_secs(1));
        assert!(!timer.activate());
        assert!((timer.time_left() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_left_goes_negative() {
        let (timer, clock) = manual(1.0);
        assert!(timer.activate());
        clock.advance(Duration::from_secs(3));
        assert!((timer.time_left() + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_interval_is_always_ready() {
        let (timer, _) = manual(0.0);
        assert!(timer.activate());
        assert!(timer.is_ready());
        assert!(timer.activate());
    }

    #[test]
    fn test_reset() {
        let (timer, _) = manual(30.0);
        assert!(timer.activate());
        timer.reset();
        assert!(timer.is_ready());
        assert!(timer.activate());
    }

    #[test]
    fn test_clones_share_state() {
        let (timer, _) = manual(30.0);
        let other = timer.clone();
        assert!(timer.activate());
        assert!(!other.is_ready());
    }

    #[test]
    fn test_refresh_handlers() {
        let (timer, _) = manual(30.0);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        timer.on_refresh(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        timer.refresh();
        assert!(timer.activate());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_activation_has_one_winner() {
        let (timer, _) = manual(30.0);
        let barrier = std::sync::Barrier::new(8);
        let wins = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..8 {
                let timer = timer.clone();
                let (barrier, wins) = (&barrier, &wins);
                s.spawn(move || {
                    barrier.wait();
                    if timer.activate() {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(wins.load(Ordering::SeqCst), 1);
        assert!(!timer.is_ready());
    }

    #[test]
    fn test_refresh_after_activation_stays_gated() {
        let (timer, clock) = manual(30.0);
        let poller_side = timer.clone();
        assert!(timer.activate());

        clock.advance(Duration::from_secs(29));
        assert!(!poller_side.refresh());
        assert!(!timer.is_ready());
    }

    #[test]
    fn test_handlers_may_reenter() {
        let (timer, _) = manual(30.0);
        let inner = timer.clone();
        let reentered = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&reentered);
        let late_calls = Arc::new(AtomicUsize::new(0));
        let late = Arc::clone(&late_calls);

        timer.on_refresh(move |_| {
            if !flag.swap(true, Ordering::SeqCst) {
                inner.refresh();
                let late = Arc::clone(&late);
                inner.on_refresh(move |_| {
                    late.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        assert!(timer.refresh());
        assert!(reentered.load(Ordering::SeqCst));

        timer.refresh();
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CooldownConfig {
            interval: 1.0,
            refresh_rate: 0.0,
        };
        assert!(CooldownTimer::new(config).is_err());
    }

    #[tokio::test]
    async fn test_wait_until_ready() {
        let config = CooldownConfig::new(0.05, 100.0).unwrap();
        let timer = CooldownTimer::new(config).unwrap();

        assert!(timer.activate());
        tokio::time::timeout(Duration::from_secs(5), timer.wait_until_ready())
            .await
            .expect("cooldown should recharge");
        assert!(timer.is_ready());
    }

    #[tokio::test]
    async fn test_poller_publishes_readiness() {
        let config = CooldownConfig::new(0.05, 100.0).unwrap();
        let timer = CooldownTimer::new(config).unwrap();
        assert!(timer.activate());

        let poller = timer.spawn_poller();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(timer.is_ready());

        poller.stop();
    }
}

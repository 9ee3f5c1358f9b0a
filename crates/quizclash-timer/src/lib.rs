//! Countdown timers for Quizclash.
//!
//! Rooms run a game clock (`timeLimit` seconds) and players may run their
//! own per-question clock. Both are [`Countdown`]s driven on a Tokio task
//! by [`spawn_countdown`], which hands back a [`TimerHandle`]. The room
//! registry stores those handles and cancels them when the owning room or
//! player goes away, so a timer never fires against deleted state.
//!
//! # Usage
//!
//! ```ignore
//! let handle = spawn_countdown(CountdownConfig::from_secs(60), move |event| {
//!     match event {
//!         CountdownEvent::Tick { remaining_secs, .. } => { /* notify room */ }
//!         CountdownEvent::Expired => { /* time up */ }
//!     }
//! });
//! // later, on teardown:
//! handle.cancel();
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for one countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownConfig {
    /// Total time until [`CountdownEvent::Expired`].
    pub duration: Duration,
    /// Spacing between [`CountdownEvent::Tick`]s. Default: 1 second.
    pub interval: Duration,
}

impl CountdownConfig {
    /// Smallest interval accepted; shorter values are clamped up.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

    /// A countdown of `secs` seconds with one tick per second.
    pub fn from_secs(secs: u64) -> Self {
        Self {
            duration: Duration::from_secs(secs),
            interval: Duration::from_secs(1),
        }
    }

    /// Overrides the tick interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Clamps out-of-range values so the config is safe to run.
    ///
    /// Called automatically by [`Countdown::new`].
    pub fn validated(mut self) -> Self {
        if self.interval < Self::MIN_INTERVAL {
            warn!(
                interval_ms = self.interval.as_millis() as u64,
                min_ms = Self::MIN_INTERVAL.as_millis() as u64,
                "countdown interval too small, clamping"
            );
            self.interval = Self::MIN_INTERVAL;
        }
        self
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self::from_secs(60)
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// What a countdown reports as time passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// An interval elapsed and time remains.
    Tick {
        /// Monotonically increasing tick number (starts at 1).
        tick: u64,
        /// Whole seconds left until expiry.
        remaining_secs: u64,
    },
    /// The full duration elapsed. Always the last event.
    Expired,
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

/// A pull-based countdown: await [`next_event`](Self::next_event) in a loop.
///
/// Deadlines are scheduled from the start instant, not from when the
/// previous event was observed, so a slow consumer doesn't stretch the
/// clock.
#[derive(Debug)]
pub struct Countdown {
    config: CountdownConfig,
    deadline: TokioInstant,
    next_tick: TokioInstant,
    ticks: u64,
    expired: bool,
}

impl Countdown {
    /// Starts a countdown now.
    pub fn new(config: CountdownConfig) -> Self {
        let config = config.validated();
        let now = TokioInstant::now();
        debug!(
            duration_secs = config.duration.as_secs(),
            interval_ms = config.interval.as_millis() as u64,
            "countdown started"
        );
        Self {
            config,
            deadline: now + config.duration,
            next_tick: now + config.interval,
            ticks: 0,
            expired: false,
        }
    }

    /// Waits for the next tick or expiry. Returns `None` once expired.
    pub async fn next_event(&mut self) -> Option<CountdownEvent> {
        if self.expired {
            return None;
        }

        let wake = self.next_tick.min(self.deadline);
        time::sleep_until(wake).await;

        if wake >= self.deadline {
            self.expired = true;
            trace!(ticks = self.ticks, "countdown expired");
            return Some(CountdownEvent::Expired);
        }

        self.ticks += 1;
        self.next_tick += self.config.interval;
        let remaining_secs = (self.deadline - wake).as_secs();
        trace!(tick = self.ticks, remaining_secs, "countdown tick");
        Some(CountdownEvent::Tick {
            tick: self.ticks,
            remaining_secs,
        })
    }

    /// Time left until expiry, measured now.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(TokioInstant::now())
    }

    /// Whether [`CountdownEvent::Expired`] has been returned.
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Ticks delivered so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}

// ---------------------------------------------------------------------------
// Spawned timers
// ---------------------------------------------------------------------------

/// Owner's handle to a spawned countdown.
///
/// Dropping the handle does NOT stop the timer (same as a Tokio
/// `JoinHandle`); call [`cancel`](Self::cancel). Cancelling is idempotent.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    abort: AbortHandle,
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    /// Stops the timer.
    ///
    /// Events the task has not started delivering are suppressed. On a
    /// multi-thread runtime, one event that is already inside `on_event`
    /// on another worker may still complete after this returns. Cancelling
    /// from within `on_event` itself stops delivery immediately.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            self.abort.abort();
            debug!("timer cancelled");
        }
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Whether the timer task has stopped (expired or aborted).
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Runs a [`Countdown`] on a new Tokio task, calling `on_event` for every
/// event until expiry or cancellation.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_countdown<F>(config: CountdownConfig, mut on_event: F) -> TimerHandle
where
    F: FnMut(CountdownEvent) + Send + 'static,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);

    let task = tokio::spawn(async move {
        let mut countdown = Countdown::new(config);
        while let Some(event) = countdown.next_event().await {
            if flag.load(Ordering::Acquire) {
                break;
            }
            on_event(event);
        }
    });

    TimerHandle {
        abort: task.abort_handle(),
        cancelled,
    }
}

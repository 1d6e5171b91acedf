//! Arbitration time model.
//!
//! # Design
//!
//! Time is an absolute `Timestamp` in integer milliseconds supplied by the
//! caller on every arbitration tick (wall clock on a robot, simulated clock in
//! tests).  Integer milliseconds keep comparisons exact; conversions to
//! floating-point seconds happen only where a curve is evaluated.
//!
//! `ArbiterClock` is the single gate through which `now` enters the engine.  A
//! `now` that moves backwards is clamped to the last accepted value, so
//! `last_run_time` stamps and repetition-penalty ages never run in reverse.

use std::fmt;

use tracing::warn;

// ── Timestamp ────────────────────────────────────────────────────────────────

/// An absolute point in time, in milliseconds since an arbitrary epoch.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    #[inline]
    pub fn from_millis(ms: u64) -> Timestamp {
        Timestamp(ms)
    }

    /// Build from floating-point seconds.  Negative or non-finite input maps to
    /// `ZERO`.
    #[inline]
    pub fn from_secs_f32(secs: f32) -> Timestamp {
        if secs.is_finite() && secs > 0.0 {
            Timestamp((secs as f64 * 1_000.0).round() as u64)
        } else {
            Timestamp::ZERO
        }
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f32(self) -> f32 {
        (self.0 as f64 / 1_000.0) as f32
    }

    /// Return the timestamp `ms` milliseconds after `self`.
    #[inline]
    pub fn offset_millis(self, ms: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(ms))
    }

    /// Seconds elapsed from `earlier` to `self`; `0.0` if `earlier` is later.
    #[inline]
    pub fn secs_since(self, earlier: Timestamp) -> f32 {
        (self.0.saturating_sub(earlier.0) as f64 / 1_000.0) as f32
    }
}

impl std::ops::Add<u64> for Timestamp {
    type Output = Timestamp;
    #[inline]
    fn add(self, rhs: u64) -> Timestamp {
        self.offset_millis(rhs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}s", self.0 / 1_000, self.0 % 1_000)
    }
}

// ── ArbiterClock ──────────────────────────────────────────────────────────────

/// Monotonic gate for caller-supplied time.
#[derive(Clone, Debug, Default)]
pub struct ArbiterClock {
    current: Timestamp,
    ticks:   u64,
}

impl ArbiterClock {
    pub fn new(start: Timestamp) -> Self {
        Self { current: start, ticks: 0 }
    }

    /// Accept `now` for the next tick.
    ///
    /// Returns the time the engine will use: `now` itself, or the previous
    /// value if `now` regressed.
    pub fn advance_to(&mut self, now: Timestamp) -> Timestamp {
        if now < self.current {
            warn!(
                requested = %now,
                current   = %self.current,
                "arbiter clock regressed; clamping to last accepted time"
            );
        } else {
            self.current = now;
        }
        self.ticks += 1;
        self.current
    }

    /// The most recently accepted time.
    #[inline]
    pub fn now(&self) -> Timestamp {
        self.current
    }

    /// Number of ticks accepted so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl fmt::Display for ArbiterClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (tick {})", self.current, self.ticks)
    }
}

//! Emotion state consulted by behavior scorers.
//!
//! The emotion model proper (event-driven emotion changes, decay curves) is a
//! collaborator outside the arbitration core.  Scorers only need read access
//! through [`EmotionSource`]; [`EmotionState`] is the plain in-memory
//! implementation used by the arbiter's world and by tests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Lower and upper bound of every emotion value.
pub const EMOTION_MIN: f32 = -1.0;
pub const EMOTION_MAX: f32 = 1.0;

/// The emotion dimensions a scorer can read.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum EmotionKind {
    Happy,
    Confident,
    Social,
    Stimulated,
    Calm,
    Brave,
    Excited,
}

impl EmotionKind {
    pub const COUNT: usize = 7;

    pub const ALL: [EmotionKind; Self::COUNT] = [
        EmotionKind::Happy,
        EmotionKind::Confident,
        EmotionKind::Social,
        EmotionKind::Stimulated,
        EmotionKind::Calm,
        EmotionKind::Brave,
        EmotionKind::Excited,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EmotionKind::Happy      => "Happy",
            EmotionKind::Confident  => "Confident",
            EmotionKind::Social     => "Social",
            EmotionKind::Stimulated => "Stimulated",
            EmotionKind::Calm       => "Calm",
            EmotionKind::Brave      => "Brave",
            EmotionKind::Excited    => "Excited",
        }
    }
}

impl fmt::Display for EmotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmotionKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownEmotion(s.to_string()))
    }
}

// ── EmotionSource ─────────────────────────────────────────────────────────────

/// Read-only access to emotion values.
pub trait EmotionSource {
    /// Current value of `kind`, nominally in `[-1, 1]`.
    fn value(&self, kind: EmotionKind) -> f32;

    /// Change of `kind` over the most recent emotion tick.
    fn recent_delta(&self, kind: EmotionKind) -> f32;
}

// ── EmotionState ──────────────────────────────────────────────────────────────

/// Bounded per-kind emotion values plus the values at the previous emotion
/// tick, from which `recent_delta` is computed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmotionState {
    values:   [f32; EmotionKind::COUNT],
    previous: [f32; EmotionKind::COUNT],
}

impl EmotionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `kind` to `value`, clamped to `[EMOTION_MIN, EMOTION_MAX]`.
    ///
    /// Non-finite values are stored as given; scorers treat them as a veto.
    pub fn set(&mut self, kind: EmotionKind, value: f32) {
        self.values[kind.index()] = value.clamp(EMOTION_MIN, EMOTION_MAX);
    }

    /// Add `delta` to `kind`, clamped.
    pub fn add(&mut self, kind: EmotionKind, delta: f32) {
        let current = self.values[kind.index()];
        self.set(kind, current + delta);
    }

    /// Close an emotion tick: the current values become the baseline for
    /// `recent_delta`.
    pub fn end_tick(&mut self) {
        self.previous = self.values;
    }

    /// Move every value toward zero by `rate_per_sec * dt_secs`.
    pub fn decay(&mut self, dt_secs: f32, rate_per_sec: f32) {
        let step = (dt_secs * rate_per_sec).max(0.0);
        for v in self.values.iter_mut() {
            if v.is_finite() {
                *v = if *v > 0.0 { (*v - step).max(0.0) } else { (*v + step).min(0.0) };
            }
        }
    }
}

impl EmotionSource for EmotionState {
    #[inline]
    fn value(&self, kind: EmotionKind) -> f32 {
        self.values[kind.index()]
    }

    #[inline]
    fn recent_delta(&self, kind: EmotionKind) -> f32 {
        self.values[kind.index()] - self.previous[kind.index()]
    }
}

//! Top-level arbitration configuration.

use serde::{Deserialize, Serialize};

use crate::CoreResult;

/// What the arbiter does when the active behavior refuses an interrupt.
///
/// Refusal normally means "keep ticking the current behavior and ask again
/// next tick".  Escalation replaces the retry with an unconditional `stop`,
/// which is lossy: the behavior never reached its safe state.  Behaviors must
/// tolerate that.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationPolicy {
    /// Always retry; never force a stop.
    Never,
    /// Force a stop only when the preempting cause is a reaction flagged as a
    /// hard interrupt.
    #[default]
    HardTriggersOnly,
    /// Force a stop on any refused interrupt.
    Always,
}

/// Arbitration configuration.
///
/// Loaded from JSON by the application (all fields optional) or built in code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Master RNG seed.  The same seed always reproduces the same tie-breaks.
    pub seed: u64,

    /// Escalation on refused interrupts.
    pub escalation: EscalationPolicy,

    /// On a normal handover, call `interrupt` before `stop` (`true`) or stop
    /// the outgoing behavior directly (`false`).
    pub interrupt_before_stop: bool,

    /// Upper bound on events delivered per tick; the rest wait for the next
    /// tick.  `0` means unbounded.
    pub max_events_per_tick: usize,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            seed:                  0,
            escalation:            EscalationPolicy::default(),
            interrupt_before_stop: true,
            max_events_per_tick:   0,
        }
    }
}

impl ArbiterConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

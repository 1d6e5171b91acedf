//! Time-based score multipliers.
//!
//! * [`RepetitionPenalty`] is applied to a behavior that is *not* running,
//!   as a function of seconds since it last ran.  It must be non-decreasing
//!   so a behavior only becomes more attractive as time passes.
//! * [`RunningPenalty`] is applied to the behavior that *is* running, as a
//!   function of seconds since it started, so long activations gradually
//!   yield to alternatives.  Any shape is allowed.
//!
//! Both default to the single node `(0, 1)`: no penalty at any age.  Outputs
//! are clamped to `[0, 1]`.

use ba_core::{CoreError, CoreResult, ScoreGraph};

fn no_penalty() -> ScoreGraph {
    ScoreGraph::constant(1.0)
}

fn clamp_output(graph: &ScoreGraph, secs: f32) -> f32 {
    let y = graph.evaluate(secs);
    if y.is_finite() { y.clamp(0.0, 1.0) } else { 0.0 }
}

// ── RepetitionPenalty ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct RepetitionPenalty {
    graph: ScoreGraph,
}

impl Default for RepetitionPenalty {
    fn default() -> Self {
        Self { graph: no_penalty() }
    }
}

impl RepetitionPenalty {
    /// Wrap `graph`.  An empty graph means "no penalty"; a decreasing one is
    /// rejected.
    pub fn new(graph: ScoreGraph) -> CoreResult<Self> {
        if graph.is_empty() {
            return Ok(Self::default());
        }
        if !graph.is_non_decreasing() {
            return Err(CoreError::InvalidGraph(
                "repetition penalty must be non-decreasing".into(),
            ));
        }
        Ok(Self { graph })
    }

    /// Multiplier for a behavior that last ran `secs_since_last_run` ago.
    #[inline]
    pub fn evaluate(&self, secs_since_last_run: f32) -> f32 {
        clamp_output(&self.graph, secs_since_last_run)
    }

    #[inline]
    pub fn graph(&self) -> &ScoreGraph {
        &self.graph
    }
}

// ── RunningPenalty ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct RunningPenalty {
    graph: ScoreGraph,
}

impl Default for RunningPenalty {
    fn default() -> Self {
        Self { graph: no_penalty() }
    }
}

impl RunningPenalty {
    pub fn new(graph: ScoreGraph) -> Self {
        if graph.is_empty() { Self::default() } else { Self { graph } }
    }

    /// Multiplier for a behavior that started `secs_since_start` ago.
    #[inline]
    pub fn evaluate(&self, secs_since_start: f32) -> f32 {
        clamp_output(&self.graph, secs_since_start)
    }

    #[inline]
    pub fn graph(&self) -> &ScoreGraph {
        &self.graph
    }
}

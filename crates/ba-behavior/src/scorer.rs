//! Emotion-weighted scoring.
//!
//! A [`BehaviorScorer`] holds zero or more components, each mapping one
//! emotion (its current value, or its change over the last emotion tick)
//! through a [`ScoreGraph`] into `[0, 1]`.
//!
//! Combination rule: if any component scores `0.0` the result is `0.0`
//! (a veto), otherwise it is the arithmetic mean of all component scores.
//! This lets one primitive express hard gates ("never while Calm < -0.5")
//! and soft blending.  Component scores are clamped to `[0, 1]` first, so a
//! graph that dips below zero also vetoes.
//!
//! Anomalies fail closed: a non-finite emotion value or graph output yields
//! `0.0` for the whole scorer.

use ba_core::{EmotionKind, EmotionSource, ScoreGraph};
use serde::{Deserialize, Serialize};

/// One `(emotion, graph)` pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub emotion_type: EmotionKind,
    pub score_graph:  ScoreGraph,
    /// Read the emotion's recent delta instead of its absolute value.
    #[serde(default)]
    pub track_delta:  bool,
}

impl ScoreComponent {
    fn evaluate(&self, emotions: &dyn EmotionSource) -> f32 {
        let input = if self.track_delta {
            emotions.recent_delta(self.emotion_type)
        } else {
            emotions.value(self.emotion_type)
        };
        self.score_graph.evaluate(input)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BehaviorScorer {
    components: Vec<ScoreComponent>,
}

impl BehaviorScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_component(&mut self, kind: EmotionKind, graph: ScoreGraph, track_delta: bool) {
        self.components.push(ScoreComponent { emotion_type: kind, score_graph: graph, track_delta });
    }

    pub fn clear_components(&mut self) {
        self.components.clear();
    }

    #[inline]
    pub fn components(&self) -> &[ScoreComponent] {
        &self.components
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Combined score in `[0, 1]`.
    pub fn evaluate(&self, emotions: &dyn EmotionSource) -> f32 {
        if self.components.is_empty() {
            return 0.0;
        }
        let mut sum = 0.0f32;
        for component in &self.components {
            let raw = component.evaluate(emotions);
            if !raw.is_finite() {
                return 0.0;
            }
            let score = raw.clamp(0.0, 1.0);
            if score == 0.0 {
                return 0.0;
            }
            sum += score;
        }
        sum / self.components.len() as f32
    }
}

impl From<Vec<ScoreComponent>> for BehaviorScorer {
    fn from(components: Vec<ScoreComponent>) -> Self {
        Self { components }
    }
}

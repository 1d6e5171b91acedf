//! Piecewise-linear graphs used for emotion scoring and time penalties.
//!
//! A `ScoreGraph` is an ordered list of `(x, y)` nodes with strictly
//! increasing `x`.  Evaluation interpolates linearly between neighbouring
//! nodes and holds the end values flat outside the covered range:
//!
//! ```text
//!   y
//!   1 |        ________
//!     |       /
//!     |      /
//!   0 |_____/
//!     +------------------ x
//! ```
//!
//! JSON form: `{"nodes": [{"x": -1.0, "y": 0.0}, {"x": 1.0, "y": 1.0}]}`.

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// One control point of a [`ScoreGraph`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub x: f32,
    pub y: f32,
}

/// Piecewise-linear `f32 → f32` mapping.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphDoc", into = "GraphDoc")]
pub struct ScoreGraph {
    nodes: Vec<GraphNode>,
}

#[derive(Serialize, Deserialize)]
struct GraphDoc {
    nodes: Vec<GraphNode>,
}

impl TryFrom<GraphDoc> for ScoreGraph {
    type Error = CoreError;

    fn try_from(doc: GraphDoc) -> CoreResult<Self> {
        ScoreGraph::new(doc.nodes)
    }
}

impl From<ScoreGraph> for GraphDoc {
    fn from(graph: ScoreGraph) -> Self {
        GraphDoc { nodes: graph.nodes }
    }
}

impl ScoreGraph {
    /// Build a graph from nodes given in ascending `x` order.
    pub fn new(nodes: Vec<GraphNode>) -> CoreResult<Self> {
        let mut graph = ScoreGraph { nodes: Vec::with_capacity(nodes.len()) };
        for node in nodes {
            graph.add_node(node.x, node.y)?;
        }
        Ok(graph)
    }

    /// Convenience constructor from `(x, y)` pairs.
    pub fn from_points(points: &[(f32, f32)]) -> CoreResult<Self> {
        Self::new(points.iter().map(|&(x, y)| GraphNode { x, y }).collect())
    }

    /// A graph that evaluates to `y` everywhere.
    pub fn constant(y: f32) -> Self {
        ScoreGraph { nodes: vec![GraphNode { x: 0.0, y }] }
    }

    /// Append a node.  `x` must be strictly greater than the last node's `x`
    /// and both coordinates must be finite.
    pub fn add_node(&mut self, x: f32, y: f32) -> CoreResult<()> {
        if !x.is_finite() || !y.is_finite() {
            return Err(CoreError::InvalidGraph(format!("non-finite node ({x}, {y})")));
        }
        if let Some(last) = self.nodes.last() {
            if x <= last.x {
                return Err(CoreError::InvalidGraph(format!(
                    "node x values must be strictly increasing: {x} follows {}",
                    last.x
                )));
            }
        }
        self.nodes.push(GraphNode { x, y });
        Ok(())
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    #[inline]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `true` if no node's `y` is lower than its predecessor's.
    pub fn is_non_decreasing(&self) -> bool {
        self.nodes.windows(2).all(|w| w[1].y >= w[0].y)
    }

    /// Evaluate the graph at `x`.
    ///
    /// An empty graph evaluates to `0.0`.  A non-finite `x` evaluates to NaN so
    /// callers can fail closed on it.
    pub fn evaluate(&self, x: f32) -> f32 {
        if !x.is_finite() {
            return f32::NAN;
        }
        let (first, last) = match (self.nodes.first(), self.nodes.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if x <= first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }

        // First node strictly right of x; guaranteed to exist and be > 0.
        let hi = self.nodes.partition_point(|n| n.x <= x);
        let a = self.nodes[hi - 1];
        let b = self.nodes[hi];
        let t = (x - a.x) / (b.x - a.x);
        a.y + t * (b.y - a.y)
    }
}

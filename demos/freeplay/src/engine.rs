//! Stand-in for the robot's action engine.
//!
//! Every queued action "runs" for a fixed time and is then reported back as
//! a `RobotCompletedAction` event.  Cancelled actions simply disappear from
//! the queue and are forgotten here.

use std::collections::HashMap;

use ba_behavior::{ActionResult, Event, QueuedAction};
use ba_core::{ActionTag, Timestamp};
use tracing::trace;

pub struct FakeEngine {
    duration_ms: u64,
    started:     HashMap<ActionTag, Timestamp>,
}

impl FakeEngine {
    pub fn new(duration_ms: u64) -> Self {
        Self { duration_ms, started: HashMap::new() }
    }

    /// Completion events for every queued action that has run its course.
    pub fn poll(&mut self, queued: &[QueuedAction], now: Timestamp) -> Vec<Event> {
        self.started.retain(|tag, _| queued.iter().any(|a| a.tag == *tag));
        let mut done = Vec::new();
        for action in queued {
            let started = *self.started.entry(action.tag).or_insert(now);
            if now >= started.offset_millis(self.duration_ms) {
                trace!(tag = %action.tag, name = %action.name, "action finished");
                done.push(Event::action_completed(action.tag, ActionResult::Success));
            }
        }
        done
    }
}

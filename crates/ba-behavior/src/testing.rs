//! Scripted behavior for tests (`test-util` feature).
//!
//! A [`ProbeBehavior`] records every call it receives into a shared
//! [`CallLog`] and answers according to a script that the test adjusts at any
//! time through the matching [`ProbeHandle`].  Several probes can share one
//! log so cross-behavior ordering (X stopped before R started) is observable.
//!
//! ```rust,ignore
//! let log = CallLog::new();
//! let (slot, probe) = probe_slot("X", json!({}), &log);
//! probe.set_runnable(false);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use ba_core::{ActionTag, Timestamp};
use serde_json::Value;

use crate::{
    ActionCompletion, Behavior, BehaviorConfig, BehaviorFactory, BehaviorFail, BehaviorResult,
    BehaviorSlot, EngineTag, Event, EventTag, GameTag, QueueSlot, Status, WorldView, WorldViewMut,
};

/// Kind name probes are registered under.
pub const PROBE_KIND: &str = "Probe";

/// One observed call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Refresh,
    Init { resuming: bool },
    Update,
    Interrupt { short: bool },
    Stop,
    Always(EventTag),
    WhileRunning(EventTag),
    WhileNotRunning(EventTag),
    ActionCompleted(ActionTag),
}

impl Call {
    /// `true` for `init`/`update`/`interrupt`/`stop`.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Call::Init { .. } | Call::Update | Call::Interrupt { .. } | Call::Stop)
    }
}

// ── CallLog ───────────────────────────────────────────────────────────────────

/// Shared, ordered record of `(behavior name, call)` pairs.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Rc<RefCell<Vec<(String, Call)>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, name: &str, call: Call) {
        self.0.borrow_mut().push((name.to_string(), call));
    }

    pub fn entries(&self) -> Vec<(String, Call)> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Calls received by `name`, in order.
    pub fn calls_of(&self, name: &str) -> Vec<Call> {
        self.0
            .borrow()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Lifecycle calls received by `name`, in order.
    pub fn lifecycle_of(&self, name: &str) -> Vec<Call> {
        self.calls_of(name).into_iter().filter(Call::is_lifecycle).collect()
    }

    /// Index of the first `(name, call)` entry.
    pub fn position(&self, name: &str, call: &Call) -> Option<usize> {
        self.0.borrow().iter().position(|(n, c)| n == name && c == call)
    }
}

// ── Script ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Script {
    runnable:              bool,
    runnable_while_running: bool,
    score:                 Option<f32>,
    status:                Status,
    init_fails:            bool,
    refusals:              u32,
    action_on_init:        bool,
    acting_bonus:          f32,
    last_action:           Option<ActionTag>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            runnable:               true,
            runnable_while_running: true,
            score:                  None,
            status:                 Status::Running,
            init_fails:             false,
            refusals:               0,
            action_on_init:         false,
            acting_bonus:           0.0,
            last_action:            None,
        }
    }
}

/// Test-side control of one probe.
#[derive(Clone, Debug)]
pub struct ProbeHandle {
    name:   String,
    script: Rc<RefCell<Script>>,
    log:    CallLog,
}

impl ProbeHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Answer for both runnability queries.
    pub fn set_runnable(&self, runnable: bool) {
        let mut s = self.script.borrow_mut();
        s.runnable = runnable;
        s.runnable_while_running = runnable;
    }

    /// Answer for the while-running query only.
    pub fn set_runnable_while_running(&self, runnable: bool) {
        self.script.borrow_mut().runnable_while_running = runnable;
    }

    /// Body score; `None` defers to the configured scorer.
    pub fn set_score(&self, score: Option<f32>) {
        self.script.borrow_mut().score = score;
    }

    /// Status returned by every following `update`.
    pub fn set_status(&self, status: Status) {
        self.script.borrow_mut().status = status;
    }

    pub fn set_init_fails(&self, fails: bool) {
        self.script.borrow_mut().init_fails = fails;
    }

    /// Refuse the next `n` interrupts.
    pub fn refuse_interrupts(&self, n: u32) {
        self.script.borrow_mut().refusals = n;
    }

    /// Enqueue one action on the default slot during every `init`.
    pub fn set_action_on_init(&self, enabled: bool) {
        self.script.borrow_mut().action_on_init = enabled;
    }

    /// Running-score bonus attached to the action started on `init`.
    pub fn set_acting_bonus(&self, extra_score: f32) {
        self.script.borrow_mut().acting_bonus = extra_score;
    }

    /// Tag of the action most recently started by the probe.
    pub fn last_action(&self) -> Option<ActionTag> {
        self.script.borrow().last_action
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.calls_of(&self.name)
    }

    pub fn lifecycle(&self) -> Vec<Call> {
        self.log.lifecycle_of(&self.name)
    }
}

// ── ProbeBehavior ─────────────────────────────────────────────────────────────

pub struct ProbeBehavior {
    name:          String,
    state:         String,
    subscriptions: Vec<EventTag>,
    script:        Rc<RefCell<Script>>,
    log:           CallLog,
}

impl ProbeBehavior {
    fn record(&self, call: Call) {
        self.log.push(&self.name, call);
    }
}

impl Behavior for ProbeBehavior {
    fn kind(&self) -> &str {
        PROBE_KIND
    }

    fn is_runnable(&self, _world: WorldView<'_>, _now: Timestamp) -> bool {
        self.script.borrow().runnable
    }

    fn is_runnable_while_running(&self, _world: WorldView<'_>, _now: Timestamp) -> bool {
        self.script.borrow().runnable_while_running
    }

    fn refresh(&mut self, _world: WorldView<'_>, _now: Timestamp) {
        self.record(Call::Refresh);
    }

    fn init(
        &mut self,
        mut world:   WorldViewMut<'_>,
        _now:        Timestamp,
        is_resuming: bool,
    ) -> Result<(), BehaviorFail> {
        self.record(Call::Init { resuming: is_resuming });
        let mut script = self.script.borrow_mut();
        if script.init_fails {
            self.state = "InitFailed".into();
            return Err(BehaviorFail::new("scripted init failure"));
        }
        if script.action_on_init {
            let bonus = script.acting_bonus;
            script.last_action = Some(world.start_action_extra_score(
                QueueSlot::DEFAULT,
                "probe_action",
                vec![],
                bonus,
            ));
        }
        self.state = "Running".into();
        Ok(())
    }

    fn update(&mut self, _world: WorldViewMut<'_>, _now: Timestamp) -> Status {
        self.record(Call::Update);
        self.script.borrow().status
    }

    fn interrupt(
        &mut self,
        _world:   WorldViewMut<'_>,
        _now:     Timestamp,
        is_short: bool,
    ) -> Result<(), BehaviorFail> {
        self.record(Call::Interrupt { short: is_short });
        let mut script = self.script.borrow_mut();
        if script.refusals > 0 {
            script.refusals -= 1;
            self.state = "Busy".into();
            return Err(BehaviorFail::new("scripted interrupt refusal"));
        }
        self.state = "Interrupted".into();
        Ok(())
    }

    fn stop(&mut self, _world: WorldViewMut<'_>, _now: Timestamp) {
        self.record(Call::Stop);
        self.state = "Stopped".into();
    }

    fn score(&self, _world: WorldView<'_>, _now: Timestamp) -> Option<f32> {
        self.script.borrow().score
    }

    fn subscriptions(&self) -> &[EventTag] {
        &self.subscriptions
    }

    fn on_event_always(&mut self, event: &Event, _world: WorldView<'_>) {
        self.record(Call::Always(event.tag));
    }

    fn on_event_while_running(&mut self, event: &Event, _world: WorldViewMut<'_>) {
        self.record(Call::WhileRunning(event.tag));
    }

    fn on_event_while_not_running(&mut self, event: &Event, _world: WorldView<'_>) {
        self.record(Call::WhileNotRunning(event.tag));
    }

    fn on_action_completed(&mut self, completion: ActionCompletion, _world: WorldViewMut<'_>) {
        self.record(Call::ActionCompleted(completion.tag));
    }

    fn state_name(&self) -> &str {
        &self.state
    }
}

/// Register the probe kind on `factory`, logging into `log`.
///
/// Each constructed probe takes its name from the config's `name` key and
/// its subscriptions from `subscribeEngine` / `subscribeGame` (arrays of
/// u16).  The handle for each probe is pushed into `handles`.
pub fn register_probe(
    factory: &mut BehaviorFactory,
    log:     &CallLog,
    handles: Rc<RefCell<Vec<ProbeHandle>>>,
) {
    let log = log.clone();
    factory.register(PROBE_KIND, move |config: &BehaviorConfig| -> BehaviorResult<Box<dyn Behavior>> {
        let name: String = config.require("name")?;
        let engine: Vec<u16> = config.get_or("subscribeEngine", Vec::new())?;
        let game: Vec<u16> = config.get_or("subscribeGame", Vec::new())?;
        let subscriptions = engine
            .into_iter()
            .map(|t| EventTag::Engine(EngineTag(t)))
            .chain(game.into_iter().map(|t| EventTag::Game(GameTag(t))))
            .collect();
        let script = Rc::new(RefCell::new(Script::default()));
        handles.borrow_mut().push(ProbeHandle {
            name:   name.clone(),
            script: Rc::clone(&script),
            log:    log.clone(),
        });
        Ok(Box::new(ProbeBehavior {
            name,
            state: "Idle".into(),
            subscriptions,
            script,
            log: log.clone(),
        }))
    });
}

/// Build one probe slot named `name`.  `extra` is merged into the config
/// (it must be a JSON object or `null`).
///
/// # Panics
///
/// If the config is rejected by the factory.
pub fn probe_slot(name: &str, extra: Value, log: &CallLog) -> (BehaviorSlot, ProbeHandle) {
    let mut factory = BehaviorFactory::new();
    let handles = Rc::new(RefCell::new(Vec::new()));
    register_probe(&mut factory, log, Rc::clone(&handles));

    let mut config = match extra {
        Value::Null => BehaviorConfig::default(),
        other => BehaviorConfig::new(other).expect("probe config must be an object"),
    };
    config.insert("name", Value::String(name.to_string()));

    let slot = factory.create(PROBE_KIND, &config).expect("probe construction failed");
    let handle = handles.borrow_mut().pop().expect("probe constructor registers a handle");
    (slot, handle)
}

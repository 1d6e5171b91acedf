//! Fluent builder for constructing an [`Arbiter`].

use std::collections::VecDeque;

use ba_behavior::{BehaviorFactory, World};
use ba_chooser::{BehaviorChooser, load_chooser_str};
use ba_core::{ArbiterClock, ArbiterConfig, ArbiterRng, Timestamp};
use tracing::info;

use crate::{Arbiter, ArbiterError, ArbiterObserver, ArbiterResult, NoopObserver};

/// Fluent builder for [`Arbiter`].
///
/// # Required inputs
///
/// - [`ArbiterConfig`] — seed, escalation policy, …
/// - a chooser, either built in code ([`chooser`][Self::chooser]) or loaded
///   from a JSON document ([`chooser_json`][Self::chooser_json])
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default              |
/// |----------------------|----------------------|
/// | `.world(w)`          | `World::new()`       |
/// | `.observer(o)`       | `NoopObserver`       |
/// | `.start_time(t)`     | `Timestamp(0)`       |
///
/// # Example
///
/// ```rust,ignore
/// let mut builder = ArbiterBuilder::new(config);
/// let chooser = ScoredChooser::new("freeplay", builder.chooser_rng());
/// let mut arbiter = builder.chooser(Box::new(chooser)).build()?;
/// arbiter.tick(Timestamp(0))?;
/// ```
pub struct ArbiterBuilder {
    config:       ArbiterConfig,
    rng:          ArbiterRng,
    rng_children: u64,
    chooser:      Option<Box<dyn BehaviorChooser>>,
    world:        Option<World>,
    observer:     Option<Box<dyn ArbiterObserver>>,
    start:        Timestamp,
}

impl ArbiterBuilder {
    pub fn new(config: ArbiterConfig) -> Self {
        Self {
            rng:          ArbiterRng::new(config.seed),
            config,
            rng_children: 0,
            chooser:      None,
            world:        None,
            observer:     None,
            start:        Timestamp::default(),
        }
    }

    /// A tie-breaking RNG derived from the configured seed.  Each call
    /// returns a different, reproducible child.
    pub fn chooser_rng(&mut self) -> ArbiterRng {
        self.rng_children += 1;
        self.rng.child(self.rng_children)
    }

    pub fn chooser(mut self, chooser: Box<dyn BehaviorChooser>) -> Self {
        self.chooser = Some(chooser);
        self
    }

    /// Load the chooser from a JSON document, constructing its behaviors
    /// with `factory`.
    pub fn chooser_json(mut self, json: &str, factory: &BehaviorFactory) -> ArbiterResult<Self> {
        let rng = self.chooser_rng();
        self.chooser = Some(load_chooser_str(json, factory, rng)?);
        Ok(self)
    }

    pub fn world(mut self, world: World) -> Self {
        self.world = Some(world);
        self
    }

    pub fn observer(mut self, observer: impl ArbiterObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Time the clock starts from; earlier ticks are clamped to it.
    pub fn start_time(mut self, start: Timestamp) -> Self {
        self.start = start;
        self
    }

    /// Validate inputs and return a ready-to-tick [`Arbiter`].
    pub fn build(self) -> ArbiterResult<Arbiter> {
        let chooser = self
            .chooser
            .ok_or_else(|| ArbiterError::Config("no chooser supplied".into()))?;
        info!(
            chooser    = %chooser.name(),
            behaviors  = chooser.arena().len(),
            seed       = self.config.seed,
            escalation = ?self.config.escalation,
            "arbiter built"
        );
        Ok(Arbiter {
            clock:         ArbiterClock::new(self.start),
            world:         self.world.unwrap_or_default(),
            observer:      self.observer.unwrap_or_else(|| Box::new(NoopObserver)),
            rng:           self.rng,
            rng_children:  self.rng_children,
            active:        None,
            pending:       None,
            events:        VecDeque::new(),
            chooser_since: self.start,
            config:        self.config,
            chooser,
        })
    }
}

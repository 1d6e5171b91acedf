//! Type-erased world facts.
//!
//! # Design
//!
//! Perception collaborators (vision, cliff sensors, cube tracking) publish
//! their latest snapshot as a plain Rust value.  Each fact type `T` is stored
//! once, behind a `Box<dyn Fact>` in a map keyed by `TypeId`.  Behaviors read
//! facts through [`WorldView::fact`][crate::WorldView::fact] without the
//! engine knowing anything about their shape.
//!
//! ```rust
//! use ba_behavior::Blackboard;
//!
//! struct CliffDetected(bool);
//!
//! let mut facts = Blackboard::new();
//! facts.insert(CliffDetected(true));
//! assert!(facts.get::<CliffDetected>().is_some_and(|c| c.0));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;

// ── Trait object ──────────────────────────────────────────────────────────────

/// Type-erased interface for one stored fact.
///
/// Sealed via the private `Sealed` supertrait: only [`TypedFact`] implements
/// it, so every entry's `TypeId` key matches its contents.
pub trait Fact: 'static + sealed::Sealed {
    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;

    #[doc(hidden)]
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

mod sealed {
    pub trait Sealed {}
}

/// A `T` wrapped so it can be stored as `Box<dyn Fact>`.
pub struct TypedFact<T: 'static>(pub T);

impl<T: 'static> sealed::Sealed for TypedFact<T> {}

impl<T: 'static> Fact for TypedFact<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// ── Blackboard ────────────────────────────────────────────────────────────────

/// One value per fact type.
#[derive(Default)]
pub struct Blackboard {
    map: HashMap<TypeId, Box<dyn Fact>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self { map: HashMap::new() }
    }

    /// Store `value`, returning the previous fact of the same type.
    pub fn insert<T: 'static>(&mut self, value: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(TypedFact(value)))
            .and_then(Self::unbox)
    }

    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.map.remove(&TypeId::of::<T>()).and_then(Self::unbox)
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|f| f.as_any().downcast_ref::<TypedFact<T>>())
            .map(|f| &f.0)
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|f| f.as_any_mut().downcast_mut::<TypedFact<T>>())
            .map(|f| &mut f.0)
    }

    // ── Metadata ──────────────────────────────────────────────────────────

    pub fn contains<T: 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn unbox<T: 'static>(fact: Box<dyn Fact>) -> Option<T> {
        fact.into_any().downcast::<TypedFact<T>>().ok().map(|f| f.0)
    }
}

impl std::fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blackboard").field("facts", &self.map.len()).finish()
    }
}

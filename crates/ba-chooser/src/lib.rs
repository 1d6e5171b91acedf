//! `ba-chooser` — selection policies.
//!
//! A chooser owns an arena of behaviors for one robot mode and answers one
//! question per tick: which behavior should hold control?  It never calls
//! lifecycle methods itself; the arbiter does that.
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`chooser`]     | `BehaviorChooser` trait, `Decision`, `Reaction`, commands    |
//! | [`priority`]    | `PriorityListChooser` — first runnable in insertion order    |
//! | [`scored`]      | `ScoredChooser` — highest score, seeded random tie-break     |
//! | [`reactionary`] | `ReactionaryChooser` — scored plus event-triggered reactions |
//! | [`selection`]   | `ExplicitSelectionChooser` — externally selected, no-op fallback |
//! | [`loader`]      | build any of the above from a JSON document                  |
//! | [`error`]       | `ChooserError`, `ChooserResult`                              |

pub mod chooser;
pub mod error;
pub mod loader;
pub mod priority;
pub mod reactionary;
pub mod scored;
pub mod selection;


pub use chooser::{BehaviorChooser, ChooserCommand, Decision, Reaction, ResumeTarget};
pub use error::{ChooserError, ChooserResult};
pub use loader::{ChooserDoc, ChooserKind, load_chooser, load_chooser_str};
pub use priority::PriorityListChooser;
pub use reactionary::ReactionaryChooser;
pub use scored::ScoredChooser;
pub use selection::ExplicitSelectionChooser;

//! Policy flags attached to a behavior.
//!
//! Groups describe how choosers treat a behavior; they never imply ownership.

use std::str::FromStr;

use flagset::{FlagSet, Flags, flags};

use crate::BehaviorError;

flags! {
    pub enum BehaviorGroup: u16 {
        /// When this reaction completes normally, the behavior it displaced
        /// resumes instead of being re-scored.
        ShortInterruption,
        /// A reaction whose trigger may force a stop through a refused
        /// interrupt, subject to the escalation policy.
        HardInterrupt,
        /// Resuming after this reaction counts toward the displaced
        /// behavior's resume limit (reactions that can loop: cliffs, pickups).
        ResumeLimited,
    }
}

impl BehaviorGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorGroup::ShortInterruption => "ShortInterruption",
            BehaviorGroup::HardInterrupt     => "HardInterrupt",
            BehaviorGroup::ResumeLimited     => "ResumeLimited",
        }
    }

    /// Parse a list of group names into a flag set.
    pub fn parse_set<'a, I>(names: I) -> Result<FlagSet<BehaviorGroup>, BehaviorError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().try_fold(FlagSet::default(), |set, name| {
            Ok(set | name.parse::<BehaviorGroup>()?)
        })
    }
}

impl FromStr for BehaviorGroup {
    type Err = BehaviorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BehaviorGroup::LIST
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| BehaviorError::Config(format!("unknown behavior group {s:?}")))
    }
}

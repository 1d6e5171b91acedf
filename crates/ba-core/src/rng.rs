//! Deterministic RNG for score tie-breaking.
//!
//! # Determinism strategy
//!
//! One root `ArbiterRng` is seeded from `ArbiterConfig::seed`.  Every chooser
//! receives its own child generator derived from the root:
//!
//!   child_seed = root.next_u64() XOR (offset * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive offsets uniformly across the seed space.  A fixed
//! seed therefore reproduces every tie-break decision of a run, and choosers
//! never observe each other's draws.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded random source injected into choosers.
///
/// Used only on the arbitration thread.  There is no process-global generator;
/// anything that needs randomness receives an `ArbiterRng` explicitly.
pub struct ArbiterRng(SmallRng);

impl ArbiterRng {
    pub fn new(seed: u64) -> Self {
        ArbiterRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `ArbiterRng` with a different seed offset.  One per
    /// chooser.
    pub fn child(&mut self, offset: u64) -> ArbiterRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        ArbiterRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

impl std::fmt::Debug for ArbiterRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ArbiterRng")
    }
}

//! Adapts `rand` generators to the engine's [`RandomSource`].

use arena_core::RandomSource;
use arena_core::rng::compute_seed;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Any `rand` generator as a [`RandomSource`].
#[derive(Clone, Debug)]
pub struct RandAdapter<R>(pub R);

impl<R: RngCore> RandomSource for RandAdapter<R> {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }
}

/// Tags separating the random streams of different operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum StreamTag {
    /// Flows that never roll.
    Ledger = 0,
    Battle = 1,
    Pack = 2,
    Upgrade = 3,
}

/// Per-request seed derivation.
///
/// Every request draws a fresh nonce; retries of the same request reuse its
/// seed, so a conflicting attempt replays with identical rolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedPlan {
    pub base: u64,
    pub nonce: u64,
    pub initiator: u64,
    pub tag: StreamTag,
}

impl SeedPlan {
    pub fn seed(&self) -> u64 {
        compute_seed(self.base, self.nonce, self.initiator, self.tag as u32)
    }

    pub fn rng(&self) -> RandAdapter<StdRng> {
        RandAdapter(StdRng::seed_from_u64(self.seed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_plan_same_stream() {
        let plan = SeedPlan {
            base: 9,
            nonce: 4,
            initiator: 1,
            tag: StreamTag::Pack,
        };
        let mut a = plan.rng();
        let mut b = plan.rng();
        let left: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let right: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_eq!(left, right);

        let other = SeedPlan {
            tag: StreamTag::Upgrade,
            ..plan
        };
        assert_ne!(plan.seed(), other.seed());
    }
}

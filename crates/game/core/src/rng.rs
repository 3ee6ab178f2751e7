//! Random sources for battle, pack and upgrade rolls.
//!
//! Randomness is a capability handed to the engine by the caller. Every
//! probabilistic function takes a `&mut dyn RandomSource`, so tests can drive
//! exact outcomes with [`ScriptedRng`] and production code can seed
//! [`PcgRng`] (or adapt any other generator) per request.

/// Source of uniformly distributed 32-bit values.
pub trait RandomSource {
    /// Next raw value.
    fn next_u32(&mut self) -> u32;

    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn below(&mut self, len: u32) -> u32 {
        if len == 0 {
            return 0;
        }
        self.next_u32() % len
    }

    /// Uniform value in `[min, max]` inclusive.
    fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        match (max - min).checked_add(1) {
            Some(span) => min + self.below(span),
            // the full u32 range
            None => self.next_u32(),
        }
    }

    /// Roll in `0..1000`.
    fn roll_per_mille(&mut self) -> u32 {
        self.below(1000)
    }

    /// True with probability `per_mille / 1000`.
    fn chance(&mut self, per_mille: u32) -> bool {
        self.roll_per_mille() < per_mille
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
///
/// Same seed, same sequence.
#[derive(Clone, Copy, Debug)]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// `state' = state × multiplier + increment (mod 2^64)`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RandomSource for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        Self::pcg_output(self.state)
    }
}

/// Replays a fixed list of raw values, cycling when exhausted.
///
/// Intended for tests and replays: `range(850, 1150)` fed `0` yields `850`,
/// `chance(150)` fed `0` succeeds and fed `999` fails.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of values consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Derive a per-battle seed from a base seed and the battle's identity.
///
/// Mixing constants come from SplitMix64 / Murmur3 finalizers.
pub fn compute_seed(base_seed: u64, nonce: u64, initiator: u64, context: u32) -> u64 {
    let mut hash = base_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= initiator.wrapping_mul(0x517cc1b727220a95);
    hash ^= u64::from(context).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

//! Deterministic, state-serializable random number generation.
//!
//! Every non-deterministic decision in the engine (event draws, deck
//! shuffles) goes through the single [`DeterministicRng`] owned by
//! [`crate::state::EngineState`]. The generator is PCG-XSH-RR: 64-bit LCG
//! state, 32-bit permuted output. The whole internal state is one `u64`, so
//! a save captures it verbatim and a restored session reproduces the exact
//! sequence that would have followed the save point.

use serde::{Deserialize, Serialize};

/// PCG-XSH-RR generator with serializable state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a generator from a seed.
    pub fn seeded(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.set_seed(seed);
        rng
    }

    /// Resets the generator to the start of the sequence for `seed`.
    pub fn set_seed(&mut self, seed: u64) {
        // One warm-up step decorrelates nearby seeds.
        self.state = Self::step(seed.wrapping_add(Self::INCREMENT));
    }

    /// Raw internal state, captured into saves.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Restores a state previously returned by [`Self::state`]. The next
    /// draw equals the draw that would have followed the capture point.
    pub fn restore(&mut self, state: u64) {
        self.state = state;
    }

    /// Advance the LCG state by one step.
    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation: xorshift high bits, then a random rotate
    /// driven by the top state bits.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = Self::step(self.state);
        Self::output(self.state)
    }

    pub fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
    }

    /// Uniform double in `[0, 1)` built from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform value in `[range.start, range.end)`. An empty range returns
    /// its start.
    pub fn next_range(&mut self, range: core::ops::Range<u32>) -> u32 {
        if range.start >= range.end {
            return range.start;
        }
        let span = range.end - range.start;
        range.start + self.next_u32() % span
    }

    /// Uniformly chosen element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.next_range(0..items.len() as u32) as usize;
        items.get(index)
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_range(0..(i as u32 + 1)) as usize;
            items.swap(i, j);
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::seeded(0)
    }
}

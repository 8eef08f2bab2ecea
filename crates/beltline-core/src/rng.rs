//! Random choice for the simulation: which item enters the belt and which
//! worker wins when several are eligible.
//!
//! The engine draws only through the [`Chooser`] trait, so a seeded
//! [`SimRng`] makes a run reproducible and tests can substitute scripted
//! choices. `SimRng` uses the SplitMix64 algorithm: fast, 8 bytes of state,
//! and trivially serializable.

/// Uniform-choice service injected into the engine.
pub trait Chooser {
    /// Pick an index uniformly in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Pick an index with probability proportional to `weights[i]`.
    /// The weights must not all be zero.
    fn pick_weighted(&mut self, weights: &[u32]) -> usize;
}

/// SplitMix64 pseudo-random number generator.
///
/// Deterministic across platforms.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `0..bound` by multiply-shift. `bound` must be non-zero.
    pub fn below(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0, "bound must be non-zero");
        ((self.next_u64() as u128 * bound as u128) >> 64) as u64
    }

    /// Get the internal state (for hashing/serialization).
    pub fn state(&self) -> u64 {
        self.state
    }
}

impl Chooser for SimRng {
    fn pick_index(&mut self, len: usize) -> usize {
        self.below(len as u64) as usize
    }

    fn pick_weighted(&mut self, weights: &[u32]) -> usize {
        let total: u64 = weights.iter().map(|&w| w as u64).sum();
        debug_assert!(total > 0, "weights must not all be zero");
        let mut r = self.below(total.max(1));
        for (i, &w) in weights.iter().enumerate() {
            if r < w as u64 {
                return i;
            }
            r -= w as u64;
        }
        weights.len().saturating_sub(1)
    }
}

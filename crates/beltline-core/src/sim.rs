//! Simulation state and per-step result types.

use crate::fixed::Ticks;
use crate::id::WorkerId;
use crate::item::Item;

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Mutable simulation state tracked by the engine.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SimState {
    /// Number of completed steps.
    pub tick: Ticks,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Step and run results
// ---------------------------------------------------------------------------

/// What happened during one `Factory::step()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// The tick this step completed (1 for the first step).
    pub tick: Ticks,
    /// Item pushed off the exit end into the results log.
    pub evicted: Item,
    /// Item drawn and placed at the entry end.
    pub introduced: Item,
    /// Workers that took a raw item from their slot this step.
    pub assigned: Vec<WorkerId>,
    /// Workers whose finished product was placed back on the belt.
    pub returned: Vec<WorkerId>,
}

/// What happened during the assign/return phase alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseOutcome {
    pub assigned: Vec<WorkerId>,
    pub returned: Vec<WorkerId>,
}

/// Result of a `Factory::run()` call.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Number of simulation steps actually executed.
    pub steps_run: u64,
    /// One report per step, in order.
    pub reports: Vec<StepReport>,
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A simple deterministic hash of simulation state for comparing runs.
///
/// Uses FNV-1a (64-bit) for speed and simplicity. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    /// Feed an item: a tag byte, then the product id if any.
    pub fn write_item(&mut self, item: &Item) {
        match *item {
            Item::Empty => self.write(&[0]),
            Item::Raw(p) => {
                self.write(&[1]);
                self.write_u32(p.0);
            }
            Item::Completed(p) => {
                self.write(&[2]);
                self.write_u32(p.0);
            }
        }
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

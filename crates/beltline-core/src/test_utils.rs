//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use std::collections::VecDeque;

use crate::catalog::Catalog;
use crate::engine::Factory;
use crate::fixed::Ticks;
use crate::rng::{Chooser, SimRng};
use crate::worker::Worker;

// ===========================================================================
// Construction helpers
// ===========================================================================

/// `belt_length` stations of `per_position` workers, all with `duration`.
pub fn make_stations(belt_length: usize, per_position: usize, duration: Ticks) -> Vec<Vec<Worker>> {
    (0..belt_length)
        .map(|_| {
            (0..per_position)
                .map(|_| Worker::new(duration).expect("test duration must be non-zero"))
                .collect()
        })
        .collect()
}

/// A seeded factory with a uniform worker layout.
pub fn make_factory(
    belt_length: usize,
    products: &[&str],
    per_position: usize,
    duration: Ticks,
    seed: u64,
) -> Factory<SimRng> {
    let catalog = Catalog::from_names(products).expect("test catalog must not be empty");
    Factory::new(
        belt_length,
        catalog,
        make_stations(belt_length, per_position, duration),
        SimRng::new(seed),
    )
    .expect("test factory must be valid")
}

// ===========================================================================
// Scripted chooser
// ===========================================================================

/// A [`Chooser`] that replays a fixed script of indices, cycling when it
/// runs out. Each value is reduced modulo the number of options.
#[derive(Debug, Clone)]
pub struct ScriptedChooser {
    script: VecDeque<usize>,
}

impl ScriptedChooser {
    pub fn new(script: Vec<usize>) -> Self {
        assert!(!script.is_empty(), "script must not be empty");
        Self {
            script: script.into(),
        }
    }

    fn next(&mut self) -> usize {
        let v = self.script.pop_front().unwrap_or(0);
        self.script.push_back(v);
        v
    }
}

impl Chooser for ScriptedChooser {
    fn pick_index(&mut self, len: usize) -> usize {
        self.next() % len
    }

    fn pick_weighted(&mut self, weights: &[u32]) -> usize {
        self.next() % weights.len()
    }
}

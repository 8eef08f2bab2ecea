//! The factory engine: owns the belt and the worker stations and drives the
//! three-phase tick.
//!
//! # Three-Phase Tick
//!
//! Each `step()` runs, in this order:
//! 1. **Inject** -- evict the exit slot into the results log, shift the belt,
//!    and place a freshly drawn item at the entry end.
//! 2. **Assign/return** -- per slot: a raw item goes to an idle worker at that
//!    position, or an empty slot receives one finished worker's product.
//! 3. **Advance** -- every worker does one tick of work.
//!
//! Admission is lossy: a raw item that finds no idle worker stays on the belt
//! and is evicted unclaimed once it reaches the exit. There is no blocking or
//! back-pressure.

use tracing::{debug, trace};

use crate::belt::Belt;
use crate::catalog::Catalog;
use crate::error::FactoryError;
use crate::fixed::Ticks;
use crate::id::WorkerId;
use crate::item::Item;
use crate::rng::{Chooser, SimRng};
use crate::sim::{PhaseOutcome, RunResult, SimState, StateHash, StepReport};
use crate::worker::{Worker, WorkerSnapshot};

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// The conveyor-belt factory.
///
/// Generic over the [`Chooser`] that supplies every random decision; use a
/// seeded [`SimRng`] for reproducible runs.
#[derive(Debug)]
pub struct Factory<R: Chooser = SimRng> {
    catalog: Catalog,
    belt: Belt,
    /// One non-empty group of workers per belt position.
    stations: Vec<Vec<Worker>>,
    rng: R,
    /// Everything that fell off the exit end, one entry per tick.
    results: Vec<Item>,
    /// Tick counter.
    pub sim_state: SimState,
}

impl<R: Chooser> Factory<R> {
    /// Build a factory with an all-empty belt of `belt_length` slots.
    ///
    /// `stations[i]` is the worker group beside belt position `i`; there must
    /// be exactly one non-empty station per position.
    pub fn new(
        belt_length: usize,
        catalog: Catalog,
        stations: Vec<Vec<Worker>>,
        rng: R,
    ) -> Result<Self, FactoryError> {
        if belt_length == 0 {
            return Err(FactoryError::ZeroBeltLength);
        }
        if stations.len() != belt_length {
            return Err(FactoryError::StationCountMismatch {
                expected: belt_length,
                actual: stations.len(),
            });
        }
        if let Some(position) = stations.iter().position(|s| s.is_empty()) {
            return Err(FactoryError::EmptyStation { position });
        }

        debug!(
            belt_length,
            products = catalog.product_count(),
            workers = stations.iter().map(Vec::len).sum::<usize>(),
            "factory constructed"
        );

        Ok(Self {
            catalog,
            belt: Belt::new(belt_length),
            stations,
            rng,
            results: Vec::new(),
            sim_state: SimState::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Stepping
    // -----------------------------------------------------------------------

    /// Run one full tick: inject, assign/return, advance.
    pub fn step(&mut self) -> Result<StepReport, FactoryError> {
        let (evicted, introduced) = self.inject();
        let outcome = self.assign_and_return()?;
        self.advance_workers();
        self.sim_state.tick += 1;

        Ok(StepReport {
            tick: self.sim_state.tick,
            evicted,
            introduced,
            assigned: outcome.assigned,
            returned: outcome.returned,
        })
    }

    /// Run `steps` ticks back to back.
    pub fn run(&mut self, steps: u64) -> Result<RunResult, FactoryError> {
        let mut result = RunResult::default();
        for _ in 0..steps {
            let report = self.step()?;
            result.reports.push(report);
            result.steps_run += 1;
        }
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Phase 1: Inject
    // -----------------------------------------------------------------------

    /// Evict the exit slot into the results log and place a new random item
    /// at the entry end. Returns `(evicted, introduced)`.
    pub fn inject(&mut self) -> (Item, Item) {
        let index = self.rng.pick_weighted(self.catalog.draw_weights());
        let introduced = self.catalog.item_for_draw(index);
        let evicted = self.belt.shift(introduced);
        self.results.push(evicted);

        if evicted.is_raw() {
            debug!(tick = self.sim_state.tick, item = ?evicted, "raw item left the belt unclaimed");
        }
        trace!(tick = self.sim_state.tick, ?evicted, ?introduced, "belt shifted");

        (evicted, introduced)
    }

    // -----------------------------------------------------------------------
    // Phase 2: Assign/return
    // -----------------------------------------------------------------------

    /// Visit every slot once. A raw item is handed to an idle worker at that
    /// position; an empty slot takes the product of one finished worker.
    /// Completed records are left to ride to the exit.
    pub fn assign_and_return(&mut self) -> Result<PhaseOutcome, FactoryError> {
        let mut outcome = PhaseOutcome::default();

        for position in 0..self.belt.len() {
            let Some(slot) = self.belt.get(position) else {
                continue;
            };
            let station = &mut self.stations[position];

            match slot {
                Item::Raw(product) => {
                    let idle: Vec<usize> = station
                        .iter()
                        .enumerate()
                        .filter(|(_, w)| w.is_available())
                        .map(|(i, _)| i)
                        .collect();
                    let Some(index) = choose(&mut self.rng, &idle) else {
                        continue;
                    };
                    let id = WorkerId::new(position, index);
                    station[index]
                        .assign(product)
                        .map_err(|source| FactoryError::Worker { id, source })?;
                    self.belt.set(position, Item::Empty);
                    debug!(tick = self.sim_state.tick, worker = %id, ?product, "worker picked up item");
                    outcome.assigned.push(id);
                }
                Item::Empty => {
                    let done: Vec<usize> = station
                        .iter()
                        .enumerate()
                        .filter(|(_, w)| w.is_done())
                        .map(|(i, _)| i)
                        .collect();
                    let Some(index) = choose(&mut self.rng, &done) else {
                        continue;
                    };
                    let id = WorkerId::new(position, index);
                    let finished = station[index]
                        .collect()
                        .map_err(|source| FactoryError::Worker { id, source })?;
                    self.belt.set(position, finished);
                    debug!(tick = self.sim_state.tick, worker = %id, item = ?finished, "worker returned item");
                    outcome.returned.push(id);
                }
                Item::Completed(_) => {}
            }
        }

        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Phase 3: Advance
    // -----------------------------------------------------------------------

    /// Every worker does one tick of work.
    pub fn advance_workers(&mut self) {
        for worker in self.stations.iter_mut().flatten() {
            worker.advance();
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn belt(&self) -> &Belt {
        &self.belt
    }

    pub fn belt_length(&self) -> usize {
        self.belt.len()
    }

    /// Everything evicted so far, oldest first.
    pub fn results(&self) -> &[Item] {
        &self.results
    }

    pub fn tick(&self) -> Ticks {
        self.sim_state.tick
    }

    pub fn stations(&self) -> &[Vec<Worker>] {
        &self.stations
    }

    pub fn station(&self, position: usize) -> Option<&[Worker]> {
        self.stations.get(position).map(Vec::as_slice)
    }

    pub fn worker(&self, id: WorkerId) -> Option<&Worker> {
        self.stations.get(id.position)?.get(id.index)
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Observable attributes of every worker, ordered by position then index.
    pub fn snapshot_workers(&self) -> Vec<(WorkerId, WorkerSnapshot)> {
        self.stations
            .iter()
            .enumerate()
            .flat_map(|(position, station)| {
                station
                    .iter()
                    .enumerate()
                    .map(move |(index, w)| (WorkerId::new(position, index), w.snapshot()))
            })
            .collect()
    }

    /// Deterministic hash of tick, belt contents, and worker states.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        h.write_u64(self.sim_state.tick);
        for item in self.belt.iter() {
            h.write_item(&item);
        }
        for worker in self.stations.iter().flatten() {
            h.write_u64(worker.remaining_ticks());
            h.write(&[worker.is_available() as u8, worker.is_done() as u8]);
            h.write_u32(worker.held_item().map_or(u32::MAX, |p| p.0));
        }
        h.finish()
    }

    // -----------------------------------------------------------------------
    // Direct manipulation
    // -----------------------------------------------------------------------

    /// Replace the belt contents, exit end first. Used to set up scenarios.
    pub fn set_belt(&mut self, items: &[Item]) -> Result<(), FactoryError> {
        if self.belt.fill_from(items) {
            Ok(())
        } else {
            Err(FactoryError::BeltLengthMismatch {
                expected: self.belt.len(),
                actual: items.len(),
            })
        }
    }
}

/// Pick one candidate: the only one without drawing, otherwise uniformly.
fn choose<R: Chooser>(rng: &mut R, candidates: &[usize]) -> Option<usize> {
    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        n => Some(candidates[rng.pick_index(n)]),
    }
}

//! Run statistics and reporting for the Beltline engine.
//!
//! Aggregates the factory's results log into counts per distinct logged value
//! and tracks run-level metrics (pick-ups, returns, items lost off the end)
//! from the [`StepReport`]s produced by each step. Rates use [`Fixed64`]
//! arithmetic.
//!
//! # Usage
//!
//! ```ignore
//! let mut factory = FactoryConfig::default().build()?;
//! let report = simulate(&mut factory, 100, &StatsConfig::default())?;
//! println!("{}", report.render_text());
//! ```

use std::collections::HashMap;
use std::fmt;

use beltline_core::catalog::Catalog;
use beltline_core::engine::Factory;
use beltline_core::error::FactoryError;
use beltline_core::fixed::{fixed64_to_f64, ratio, Fixed64, Ticks};
use beltline_core::item::Item;
use beltline_core::rng::Chooser;
use beltline_core::sim::StepReport;
use serde::Serialize;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Upper bound on the rolling window, in ticks.
pub const MAX_WINDOW_SIZE: Ticks = 1 << 16;

/// Configuration for run statistics.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Window size in ticks for the rolling exit rate. Clamped to
    /// `1..=MAX_WINDOW_SIZE`.
    pub window_size: Ticks,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { window_size: 10 }
    }
}

// ---------------------------------------------------------------------------
// Rolling window counter
// ---------------------------------------------------------------------------

/// Tracks a count over the most recent N ticks.
///
/// Per-tick counts live in a ring buffer; `committed_total` is the sum of the
/// ticks currently in the window. Call [`add`](Self::add) during a tick and
/// [`commit`](Self::commit) exactly once at the end of it.
#[derive(Debug, Clone)]
struct RollingWindow {
    tick_counts: Vec<u64>,
    write_pos: usize,
    committed_total: u64,
    current: u64,
    committed_count: usize,
}

impl RollingWindow {
    fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "RollingWindow size must be > 0");
        Self {
            tick_counts: vec![0; window_size],
            write_pos: 0,
            committed_total: 0,
            current: 0,
            committed_count: 0,
        }
    }

    fn add(&mut self, count: u64) {
        self.current += count;
    }

    /// Commit the current tick, evicting the oldest one if the window is full.
    fn commit(&mut self) {
        let window_size = self.tick_counts.len();
        if self.committed_count == window_size {
            self.committed_total -= self.tick_counts[self.write_pos];
        }

        self.tick_counts[self.write_pos] = self.current;
        self.committed_total += self.current;
        self.current = 0;

        self.write_pos = (self.write_pos + 1) % window_size;
        if self.committed_count < window_size {
            self.committed_count += 1;
        }
    }

    /// Average count per committed tick in the window.
    fn rate(&self) -> Fixed64 {
        ratio(self.committed_total, self.committed_count as u64)
    }
}

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

/// Counts per distinct logged value, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    entries: Vec<(Item, u64)>,
    index: HashMap<Item, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_log(log: &[Item]) -> Self {
        let mut tally = Self::new();
        for item in log {
            tally.record(*item);
        }
        tally
    }

    pub fn record(&mut self, item: Item) {
        match self.index.get(&item) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(item, self.entries.len());
                self.entries.push((item, 1));
            }
        }
    }

    pub fn count(&self, item: &Item) -> u64 {
        self.index.get(item).map(|&i| self.entries[i].1).unwrap_or(0)
    }

    pub fn entries(&self) -> &[(Item, u64)] {
        &self.entries
    }

    /// Number of distinct values seen.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }
}

// ---------------------------------------------------------------------------
// Run statistics
// ---------------------------------------------------------------------------

/// Step-by-step counters for one run.
#[derive(Debug, Clone)]
pub struct RunStats {
    steps: u64,
    introduced: u64,
    picked_up: u64,
    returned: u64,
    completed_exits: u64,
    raw_lost: u64,
    empty_exits: u64,
    exit_window: RollingWindow,
}

impl RunStats {
    pub fn new(config: &StatsConfig) -> Self {
        Self {
            steps: 0,
            introduced: 0,
            picked_up: 0,
            returned: 0,
            completed_exits: 0,
            raw_lost: 0,
            empty_exits: 0,
            exit_window: RollingWindow::new(
                config.window_size.clamp(1, MAX_WINDOW_SIZE) as usize,
            ),
        }
    }

    /// Fold one step into the counters.
    pub fn process_step(&mut self, report: &StepReport) {
        self.steps += 1;
        if !report.introduced.is_empty() {
            self.introduced += 1;
        }
        self.picked_up += report.assigned.len() as u64;
        self.returned += report.returned.len() as u64;
        match report.evicted {
            Item::Empty => self.empty_exits += 1,
            Item::Raw(_) => self.raw_lost += 1,
            Item::Completed(_) => {
                self.completed_exits += 1;
                self.exit_window.add(1);
            }
        }
        self.exit_window.commit();
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn introduced(&self) -> u64 {
        self.introduced
    }

    pub fn picked_up(&self) -> u64 {
        self.picked_up
    }

    pub fn returned(&self) -> u64 {
        self.returned
    }

    pub fn completed_exits(&self) -> u64 {
        self.completed_exits
    }

    /// Raw items evicted without ever being picked up.
    pub fn raw_lost(&self) -> u64 {
        self.raw_lost
    }

    pub fn empty_exits(&self) -> u64 {
        self.empty_exits
    }

    /// Completed records leaving the belt per tick, over the whole run.
    pub fn throughput(&self) -> Fixed64 {
        ratio(self.completed_exits, self.steps)
    }

    /// Completed records leaving the belt per tick, over the rolling window.
    pub fn recent_throughput(&self) -> Fixed64 {
        self.exit_window.rate()
    }

    /// Fraction of introduced items that fell off unclaimed.
    pub fn loss_ratio(&self) -> Fixed64 {
        ratio(self.raw_lost, self.introduced)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            steps: self.steps,
            introduced: self.introduced,
            picked_up: self.picked_up,
            returned: self.returned,
            completed_exits: self.completed_exits,
            raw_lost: self.raw_lost,
            empty_exits: self.empty_exits,
            throughput: fixed64_to_f64(self.throughput()),
            recent_throughput: fixed64_to_f64(self.recent_throughput()),
            loss_ratio: fixed64_to_f64(self.loss_ratio()),
        }
    }
}

/// Plain-data view of [`RunStats`] for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub steps: u64,
    pub introduced: u64,
    pub picked_up: u64,
    pub returned: u64,
    pub completed_exits: u64,
    pub raw_lost: u64,
    pub empty_exits: u64,
    pub throughput: f64,
    pub recent_throughput: f64,
    pub loss_ratio: f64,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub label: String,
    pub count: u64,
}

/// Final counts for a run, ready for printing or serializing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionReport {
    pub steps: u64,
    pub entries: Vec<ReportEntry>,
    pub summary: RunSummary,
}

impl ProductionReport {
    pub fn new(steps: u64, tally: &Tally, catalog: &Catalog, stats: &RunStats) -> Self {
        Self {
            steps,
            entries: tally
                .entries()
                .iter()
                .map(|(item, count)| ReportEntry {
                    label: catalog.label(item),
                    count: *count,
                })
                .collect(),
            summary: stats.summary(),
        }
    }

    /// `Processed items over N steps:` followed by one `Item: .. Count: ..`
    /// line per distinct value.
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ProductionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Processed items over {} steps:", self.steps)?;
        for entry in &self.entries {
            write!(f, "\nItem: {} Count: {}", entry.label, entry.count)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Step `factory` `steps` times, then aggregate its results log.
///
/// The tally covers the factory's whole log, so a factory that was already
/// stepped before this call contributes its earlier evictions too.
pub fn simulate<R: Chooser>(
    factory: &mut Factory<R>,
    steps: u64,
    config: &StatsConfig,
) -> Result<ProductionReport, FactoryError> {
    info!(steps, belt_length = factory.belt_length(), "simulation started");

    let config = StatsConfig {
        window_size: config.window_size.min(steps.max(1)),
    };
    let mut stats = RunStats::new(&config);
    for _ in 0..steps {
        let report = factory.step()?;
        stats.process_step(&report);
    }

    let tally = Tally::from_log(factory.results());
    info!(
        steps,
        completed = stats.completed_exits(),
        lost = stats.raw_lost(),
        "simulation finished"
    );
    if stats.raw_lost() > 0 {
        warn!(
            lost = stats.raw_lost(),
            introduced = stats.introduced(),
            "raw items left the belt unclaimed"
        );
    }

    Ok(ProductionReport::new(steps, &tally, factory.catalog(), &stats))
}

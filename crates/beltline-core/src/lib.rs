//! Beltline Core -- a discrete-time conveyor-belt factory simulation.
//!
//! Items ride a fixed-length belt past stations of workers. A worker beside a
//! slot can take a raw item off the belt, process it for a fixed number of
//! ticks, and put the finished product back on an empty slot so it can ride
//! out of the factory.
//!
//! # Three-Phase Tick
//!
//! Each call to [`engine::Factory::step`] advances the simulation by one tick:
//!
//! 1. **Inject** -- Evict the exit slot into the results log and draw a new
//!    item (or nothing) onto the entry end.
//! 2. **Assign/return** -- Each slot hands its raw item to an idle worker, or
//!    receives one finished worker's product if it is empty.
//! 3. **Advance** -- Every worker does one tick of work.
//!
//! ```rust,ignore
//! let mut factory = FactoryConfig::default().build()?;
//! for _ in 0..100 {
//!     factory.step()?;
//! }
//! println!("{} items left the belt", factory.results().len());
//! ```
//!
//! # Key Types
//!
//! - [`engine::Factory`] -- Owns the belt and stations; runs the tick.
//! - [`worker::Worker`] -- Idle / Busy / Done state machine.
//! - [`belt::Belt`] -- Fixed-capacity ring buffer of [`item::Item`] slots.
//! - [`catalog::Catalog`] -- Frozen set of products the belt can introduce.
//! - [`rng::Chooser`] -- Injectable random choice; [`rng::SimRng`] is the
//!   seeded default.
//! - [`config::FactoryConfig`] -- RON/TOML/JSON configuration.

pub mod belt;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod fixed;
pub mod id;
pub mod item;
pub mod rng;
pub mod sim;
pub mod worker;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

//! A stationary worker beside the belt.
//!
//! Each worker holds at most one product and walks a three-state machine:
//!
//! ```text
//! Idle --assign--> Busy { remaining > 0 } --advance x duration--> Done --collect--> Idle
//! ```
//!
//! `Done` is distinct from both `Idle` and `Busy`: the work is finished but
//! the product has not been handed back to the belt, so the worker is still
//! unavailable. Only [`Worker::collect`] makes a worker idle again.

use crate::fixed::Ticks;
use crate::id::ProductId;
use crate::item::Item;

/// Processing time used when none is configured.
pub const DEFAULT_PROCESSING_DURATION: Ticks = 3;

/// Runtime state of a worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WorkerState {
    #[default]
    Idle,
    Busy { item: ProductId, remaining: Ticks },
    Done { item: ProductId },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkerError {
    #[error("worker is not idle (holding {held:?})")]
    NotIdle { held: ProductId },
    #[error("worker has no finished item to collect")]
    NotDone,
    #[error("processing duration must be at least one tick")]
    ZeroDuration,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Worker {
    processing_duration: Ticks,
    state: WorkerState,
}

impl Default for Worker {
    fn default() -> Self {
        Self {
            processing_duration: DEFAULT_PROCESSING_DURATION,
            state: WorkerState::Idle,
        }
    }
}

impl Worker {
    pub fn new(processing_duration: Ticks) -> Result<Self, WorkerError> {
        if processing_duration == 0 {
            return Err(WorkerError::ZeroDuration);
        }
        Ok(Self {
            processing_duration,
            state: WorkerState::Idle,
        })
    }

    pub fn processing_duration(&self) -> Ticks {
        self.processing_duration
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// True only when idle.
    pub fn is_available(&self) -> bool {
        matches!(self.state, WorkerState::Idle)
    }

    /// Finished and waiting for an empty slot to hand the product back.
    pub fn is_done(&self) -> bool {
        matches!(self.state, WorkerState::Done { .. })
    }

    pub fn remaining_ticks(&self) -> Ticks {
        match self.state {
            WorkerState::Busy { remaining, .. } => remaining,
            _ => 0,
        }
    }

    pub fn held_item(&self) -> Option<ProductId> {
        match self.state {
            WorkerState::Idle => None,
            WorkerState::Busy { item, .. } | WorkerState::Done { item } => Some(item),
        }
    }

    /// Do one tick of work. A no-op unless busy.
    pub fn advance(&mut self) {
        if let WorkerState::Busy { item, remaining } = self.state {
            self.state = if remaining <= 1 {
                WorkerState::Done { item }
            } else {
                WorkerState::Busy {
                    item,
                    remaining: remaining - 1,
                }
            };
        }
    }

    /// Start processing `item`. The worker must be idle.
    pub fn assign(&mut self, item: ProductId) -> Result<(), WorkerError> {
        if let Some(held) = self.held_item() {
            return Err(WorkerError::NotIdle { held });
        }
        self.state = WorkerState::Busy {
            item,
            remaining: self.processing_duration,
        };
        Ok(())
    }

    /// Hand back the finished product and become idle. The worker must be done.
    pub fn collect(&mut self) -> Result<Item, WorkerError> {
        match self.state {
            WorkerState::Done { item } => {
                self.state = WorkerState::Idle;
                Ok(Item::Completed(item))
            }
            _ => Err(WorkerError::NotDone),
        }
    }

    pub fn snapshot(&self) -> WorkerSnapshot {
        WorkerSnapshot {
            available: self.is_available(),
            remaining_ticks: self.remaining_ticks(),
            held_item: self.held_item(),
            processing_duration: self.processing_duration,
        }
    }
}

/// Owned, read-only view of a worker's observable attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct WorkerSnapshot {
    pub available: bool,
    pub remaining_ticks: Ticks,
    pub held_item: Option<ProductId>,
    pub processing_duration: Ticks,
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ProductId = ProductId(0);

    #[test]
    fn new_worker_is_idle() {
        let w = Worker::default();
        assert!(w.is_available());
        assert_eq!(w.remaining_ticks(), 0);
        assert_eq!(w.held_item(), None);
        assert_eq!(w.processing_duration(), DEFAULT_PROCESSING_DURATION);
    }

    #[test]
    fn zero_duration_rejected() {
        assert_eq!(Worker::new(0), Err(WorkerError::ZeroDuration));
    }

    #[test]
    fn assign_sets_busy_with_full_duration() {
        let mut w = Worker::new(4).unwrap();
        w.assign(A).unwrap();
        assert!(!w.is_available());
        assert_eq!(w.remaining_ticks(), 4);
        assert_eq!(w.held_item(), Some(A));
    }

    #[test]
    fn reaches_done_after_exactly_duration_advances() {
        let mut w = Worker::new(3).unwrap();
        w.assign(A).unwrap();
        w.advance();
        w.advance();
        assert!(!w.is_done());
        assert_eq!(w.remaining_ticks(), 1);
        w.advance();
        assert!(w.is_done());
        assert!(!w.is_available());
        assert_eq!(w.remaining_ticks(), 0);
        assert_eq!(w.held_item(), Some(A));
    }

    #[test]
    fn done_never_returns_to_idle_by_itself() {
        let mut w = Worker::new(1).unwrap();
        w.assign(A).unwrap();
        for _ in 0..10 {
            w.advance();
        }
        assert_eq!(w.state(), WorkerState::Done { item: A });
    }

    #[test]
    fn advance_on_idle_is_noop() {
        let mut w = Worker::default();
        w.advance();
        assert_eq!(w.state(), WorkerState::Idle);
    }

    #[test]
    fn collect_returns_completed_record_and_idles() {
        let mut w = Worker::new(1).unwrap();
        w.assign(A).unwrap();
        w.advance();
        assert_eq!(w.collect(), Ok(Item::Completed(A)));
        assert!(w.is_available());
        assert_eq!(w.held_item(), None);
    }

    #[test]
    fn assign_while_busy_fails_without_corrupting_state() {
        let mut w = Worker::new(3).unwrap();
        w.assign(A).unwrap();
        let err = w.assign(ProductId(1)).unwrap_err();
        assert_eq!(err, WorkerError::NotIdle { held: A });
        assert_eq!(w.state(), WorkerState::Busy { item: A, remaining: 3 });
    }

    #[test]
    fn assign_while_done_fails() {
        let mut w = Worker::new(1).unwrap();
        w.assign(A).unwrap();
        w.advance();
        assert!(w.assign(A).is_err());
        assert!(w.is_done());
    }

    #[test]
    fn collect_while_idle_or_busy_fails() {
        let mut w = Worker::new(2).unwrap();
        assert_eq!(w.collect(), Err(WorkerError::NotDone));
        w.assign(A).unwrap();
        assert_eq!(w.collect(), Err(WorkerError::NotDone));
        assert_eq!(w.remaining_ticks(), 2);
    }

    #[test]
    fn snapshot_mirrors_accessors() {
        let mut w = Worker::new(2).unwrap();
        w.assign(A).unwrap();
        let snap = w.snapshot();
        assert!(!snap.available);
        assert_eq!(snap.remaining_ticks, 2);
        assert_eq!(snap.held_item, Some(A));
        assert_eq!(snap.processing_duration, 2);
    }
}

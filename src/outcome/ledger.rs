//! Write-once outcome aggregation.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;

use crate::outcome::{HardFault, Outcome, ToleratedReason};

/// Error type for ledger writes.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// A second outcome arrived for a request that already settled. The
    /// aggregation invariant is broken; the run can no longer pass.
    #[error("outcome slot {seq} written twice")]
    DuplicateOutcome { seq: u32 },
}

/// One write-once slot per request, written by concurrent completions and
/// read once after the join barrier.
#[derive(Debug, Default)]
pub struct OutcomeLedger {
    slots: DashMap<u32, Outcome>,
    settled: AtomicUsize,
    poisoned: AtomicBool,
}

impl OutcomeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for a request. Returns the number of requests
    /// settled so far, or an error if the slot was already written. The
    /// first write wins; a duplicate never replaces it.
    pub fn record(&self, seq: u32, outcome: Outcome) -> Result<usize, LedgerError> {
        match self.slots.entry(seq) {
            Entry::Occupied(entry) => {
                self.poisoned.store(true, Ordering::SeqCst);
                tracing::error!(
                    seq,
                    previous = entry.get().label(),
                    rejected = outcome.label(),
                    "duplicate outcome for an already-settled request"
                );
                Err(LedgerError::DuplicateOutcome { seq })
            }
            Entry::Vacant(entry) => {
                entry.insert(outcome);
                Ok(self.settled.fetch_add(1, Ordering::SeqCst) + 1)
            }
        }
    }

    /// Number of settled requests.
    pub fn len(&self) -> usize {
        self.settled.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the write-once invariant was ever violated.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.load(Ordering::SeqCst)
    }

    /// Tally outcomes by kind. Called after the join barrier, when no
    /// further writes can arrive.
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for entry in self.slots.iter() {
            match entry.value() {
                Outcome::Success(_) => counts.success += 1,
                Outcome::Tolerated(ToleratedReason::ConnectFailed(_)) => counts.connect_failed += 1,
                Outcome::Tolerated(ToleratedReason::TimedOut(_)) => counts.timed_out += 1,
                Outcome::Tolerated(ToleratedReason::PoolRejected) => counts.pool_rejected += 1,
                Outcome::Tolerated(ToleratedReason::TransferBroken(_)) => {
                    counts.transfer_broken += 1
                }
                Outcome::Hard(HardFault::ProtocolMismatch { .. }) => counts.protocol_mismatch += 1,
                Outcome::Hard(HardFault::Internal(_)) => counts.internal_fault += 1,
            }
        }
        counts
    }

    /// Every hard fault with its sequence number, for diagnostic output.
    pub fn hard_faults(&self) -> Vec<(u32, String)> {
        let mut faults: Vec<(u32, String)> = self
            .slots
            .iter()
            .filter_map(|entry| match entry.value() {
                Outcome::Hard(fault) => Some((*entry.key(), fault.to_string())),
                _ => None,
            })
            .collect();
        faults.sort_by_key(|(seq, _)| *seq);
        faults
    }
}

/// Outcome tally for the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub success: usize,
    pub connect_failed: usize,
    pub timed_out: usize,
    pub pool_rejected: usize,
    pub transfer_broken: usize,
    pub protocol_mismatch: usize,
    pub internal_fault: usize,
}

impl OutcomeCounts {
    pub fn tolerated(&self) -> usize {
        self.connect_failed + self.timed_out + self.pool_rejected + self.transfer_broken
    }

    pub fn hard(&self) -> usize {
        self.protocol_mismatch + self.internal_fault
    }

    pub fn total(&self) -> usize {
        self.success + self.tolerated() + self.hard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TimeoutKind;

    #[test]
    fn records_each_slot_once() {
        let ledger = OutcomeLedger::new();
        assert_eq!(
            ledger
                .record(0, Outcome::Tolerated(ToleratedReason::PoolRejected))
                .unwrap(),
            1
        );
        assert_eq!(
            ledger
                .record(
                    1,
                    Outcome::Tolerated(ToleratedReason::TimedOut(TimeoutKind::Read))
                )
                .unwrap(),
            2
        );
        assert_eq!(ledger.len(), 2);
        assert!(!ledger.is_poisoned());
    }

    #[test]
    fn duplicate_write_poisons_the_ledger_and_keeps_the_first_outcome() {
        let ledger = OutcomeLedger::new();
        ledger
            .record(7, Outcome::Tolerated(ToleratedReason::PoolRejected))
            .unwrap();

        let err = ledger
            .record(7, Outcome::Hard(HardFault::Internal("late write".into())))
            .unwrap_err();
        assert_eq!(err, LedgerError::DuplicateOutcome { seq: 7 });
        assert!(ledger.is_poisoned());

        // First write wins.
        let counts = ledger.counts();
        assert_eq!(counts.pool_rejected, 1);
        assert_eq!(counts.internal_fault, 0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn counts_tally_by_kind() {
        let ledger = OutcomeLedger::new();
        ledger
            .record(0, Outcome::Tolerated(ToleratedReason::PoolRejected))
            .unwrap();
        ledger
            .record(
                1,
                Outcome::Tolerated(ToleratedReason::ConnectFailed("refused".into())),
            )
            .unwrap();
        ledger
            .record(2, Outcome::Hard(HardFault::Internal("boom".into())))
            .unwrap();

        let counts = ledger.counts();
        assert_eq!(counts.pool_rejected, 1);
        assert_eq!(counts.connect_failed, 1);
        assert_eq!(counts.internal_fault, 1);
        assert_eq!(counts.tolerated(), 2);
        assert_eq!(counts.hard(), 1);
        assert_eq!(counts.total(), 3);

        let faults = ledger.hard_faults();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].0, 2);
    }
}

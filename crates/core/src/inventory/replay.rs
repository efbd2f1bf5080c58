//! Full-history balance replay.
//!
//! Balances are a cache, never ground truth. Whenever any row touching a
//! (facility, chemical) pair is created or removed, the pair's balance is
//! recomputed from scratch over the complete ordered history. Correctness
//! over performance: the result is reproducible from the log no matter how
//! many edits and deletes happened before.

use rust_decimal::Decimal;
use std::collections::BTreeSet;
use uuid::Uuid;

use super::types::LedgerRow;

/// One (facility, chemical) pair whose balance may need recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pair {
    /// The facility side of the balance.
    pub facility_id: Uuid,
    /// The chemical side of the balance.
    pub chemical_id: Uuid,
}

/// Derives the deduplicated set of pairs touched by a batch of rows.
///
/// Both endpoints of a transfer contribute, so one transfer yields two
/// pairs and both balances get recomputed from a single call.
#[must_use]
pub fn affected_pairs(rows: &[LedgerRow]) -> BTreeSet<Pair> {
    let mut pairs = BTreeSet::new();
    for row in rows {
        if let Some(facility_id) = row.from_facility_id {
            pairs.insert(Pair {
                facility_id,
                chemical_id: row.chemical_id,
            });
        }
        if let Some(facility_id) = row.to_facility_id {
            pairs.insert(Pair {
                facility_id,
                chemical_id: row.chemical_id,
            });
        }
    }
    pairs
}

/// Replays a facility's complete history for one chemical and returns the
/// resulting balance.
///
/// `rows` must already be restricted to the pair (every row references the
/// facility on at least one side and carries the right chemical). Rows are
/// folded in (operation_date, timestamp) ascending order, starting from
/// zero: destination match adds the quantity, otherwise the source match
/// subtracts it. The destination branch wins if a row somehow referenced
/// the facility on both sides.
///
/// Negative results are legitimate and returned as-is; they signal an
/// unreconciled or overdrawn state to operators.
#[must_use]
pub fn replay_balance(facility_id: Uuid, rows: &[LedgerRow]) -> Decimal {
    let mut ordered: Vec<&LedgerRow> = rows.iter().collect();
    ordered.sort_by_key(|row| (row.operation_date, row.timestamp));

    let mut balance = Decimal::ZERO;
    for row in ordered {
        if row.to_facility_id == Some(facility_id) {
            balance += row.quantity;
        } else if row.from_facility_id == Some(facility_id) {
            balance -= row.quantity;
        }
    }
    balance
}

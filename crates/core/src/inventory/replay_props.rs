//! Property tests for the replay engine and period reports.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::replay::{affected_pairs, replay_balance};
use super::report::PeriodReport;
use super::types::LedgerRow;

const FACILITY_A: Uuid = Uuid::from_u128(0xA);
const FACILITY_B: Uuid = Uuid::from_u128(0xB);
const CHEMICAL: Uuid = Uuid::from_u128(0xC);

/// Generates one row touching facility A, B or both, at a random hour.
fn row_strategy() -> impl Strategy<Value = LedgerRow> {
    (1i64..1_000_000i64, 0..3u8, 0..720i64).prop_map(|(cents, direction, hour)| {
        let (from, to) = match direction {
            0 => (None, Some(FACILITY_A)),
            1 => (Some(FACILITY_A), None),
            _ => (Some(FACILITY_A), Some(FACILITY_B)),
        };
        let date = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hour);
        LedgerRow {
            chemical_id: CHEMICAL,
            quantity: Decimal::new(cents, 2),
            from_facility_id: from,
            to_facility_id: to,
            operation_date: date,
            timestamp: date,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Replaying the same history twice yields the same balance.
    #[test]
    fn prop_replay_is_deterministic(rows in prop::collection::vec(row_strategy(), 0..40)) {
        let first = replay_balance(FACILITY_A, &rows);
        let second = replay_balance(FACILITY_A, &rows);
        prop_assert_eq!(first, second);
    }

    /// The balance does not depend on the order rows arrive in.
    #[test]
    fn prop_replay_ignores_input_order(rows in prop::collection::vec(row_strategy(), 0..40)) {
        let mut reversed = rows.clone();
        reversed.reverse();
        prop_assert_eq!(replay_balance(FACILITY_A, &rows), replay_balance(FACILITY_A, &reversed));
    }

    /// A transfer changes the source by -Q and the destination by +Q.
    #[test]
    fn prop_transfer_conserves_quantity(cents in 1i64..1_000_000i64) {
        let quantity = Decimal::new(cents, 2);
        let date = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let rows = vec![LedgerRow {
            chemical_id: CHEMICAL,
            quantity,
            from_facility_id: Some(FACILITY_A),
            to_facility_id: Some(FACILITY_B),
            operation_date: date,
            timestamp: date,
        }];

        prop_assert_eq!(replay_balance(FACILITY_A, &rows), -quantity);
        prop_assert_eq!(replay_balance(FACILITY_B, &rows), quantity);
        prop_assert_eq!(
            replay_balance(FACILITY_A, &rows) + replay_balance(FACILITY_B, &rows),
            Decimal::ZERO
        );
    }

    /// A report over the complete history closes at the replayed balance.
    #[test]
    fn prop_full_window_report_matches_replay(rows in prop::collection::vec(row_strategy(), 0..40)) {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();

        let report = PeriodReport::from_rows(FACILITY_A, &rows, start, end);
        prop_assert_eq!(report.opening_balance, Decimal::ZERO);
        prop_assert_eq!(report.closing_balance, replay_balance(FACILITY_A, &rows));
    }

    /// Every pair returned by affected_pairs appears in some row, and every
    /// row endpoint appears in the pair set.
    #[test]
    fn prop_affected_pairs_complete(rows in prop::collection::vec(row_strategy(), 0..40)) {
        let pairs = affected_pairs(&rows);
        for row in &rows {
            for facility_id in [row.from_facility_id, row.to_facility_id].into_iter().flatten() {
                prop_assert!(pairs.iter().any(
                    |p| p.facility_id == facility_id && p.chemical_id == row.chemical_id
                ));
            }
        }
    }
}

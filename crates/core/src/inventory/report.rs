//! Period report arithmetic.
//!
//! Reports are always computed fresh from the transaction log, never from
//! the balance cache, so they stay correct even when the cache is stale.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::types::LedgerRow;

/// Opening/closing balances and totals for one facility, chemical and
/// date window. All quantities serialize as fixed-point strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    /// Balance immediately before the window opens.
    #[serde(with = "rust_decimal::serde::str")]
    pub opening_balance: Decimal,
    /// Quantity received during the window (inclusive bounds).
    #[serde(with = "rust_decimal::serde::str")]
    pub total_income: Decimal,
    /// Quantity drawn down during the window (inclusive bounds).
    #[serde(with = "rust_decimal::serde::str")]
    pub total_outcome: Decimal,
    /// `opening + income - outcome`.
    #[serde(with = "rust_decimal::serde::str")]
    pub closing_balance: Decimal,
}

impl PeriodReport {
    /// Assembles a report from the four store-level sums.
    ///
    /// `opening_in`/`opening_out` are the to/from sums strictly before the
    /// window; `period_in`/`period_out` the sums within it. Absent sums are
    /// passed as zero by the caller.
    #[must_use]
    pub fn from_sums(
        opening_in: Decimal,
        opening_out: Decimal,
        period_in: Decimal,
        period_out: Decimal,
    ) -> Self {
        let opening_balance = opening_in - opening_out;
        Self {
            opening_balance,
            total_income: period_in,
            total_outcome: period_out,
            closing_balance: opening_balance + period_in - period_out,
        }
    }

    /// Computes a report directly from rows already restricted to the
    /// (facility, chemical) pair. Window bounds are inclusive.
    #[must_use]
    pub fn from_rows(
        facility_id: Uuid,
        rows: &[LedgerRow],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        let mut opening_in = Decimal::ZERO;
        let mut opening_out = Decimal::ZERO;
        let mut period_in = Decimal::ZERO;
        let mut period_out = Decimal::ZERO;

        for row in rows {
            let incoming = row.to_facility_id == Some(facility_id);
            let outgoing = row.from_facility_id == Some(facility_id);

            if row.operation_date < start {
                if incoming {
                    opening_in += row.quantity;
                } else if outgoing {
                    opening_out += row.quantity;
                }
            } else if row.operation_date <= end {
                if incoming {
                    period_in += row.quantity;
                } else if outgoing {
                    period_out += row.quantity;
                }
            }
        }

        Self::from_sums(opening_in, opening_out, period_in, period_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    fn row(
        chemical_id: Uuid,
        quantity: Decimal,
        from: Option<Uuid>,
        to: Option<Uuid>,
        day: u32,
    ) -> LedgerRow {
        LedgerRow {
            chemical_id,
            quantity,
            from_facility_id: from,
            to_facility_id: to,
            operation_date: at(day),
            timestamp: at(day),
        }
    }

    #[test]
    fn test_from_sums_arithmetic() {
        let report = PeriodReport::from_sums(dec!(100), dec!(0), dec!(0), dec!(40));
        assert_eq!(report.opening_balance, dec!(100));
        assert_eq!(report.total_income, dec!(0));
        assert_eq!(report.total_outcome, dec!(40));
        assert_eq!(report.closing_balance, dec!(60));
    }

    #[test]
    fn test_empty_history_is_all_zero() {
        let report = PeriodReport::from_rows(Uuid::new_v4(), &[], at(1), at(31));
        assert_eq!(report.opening_balance, Decimal::ZERO);
        assert_eq!(report.closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_window_after_add_before_consume() {
        let facility = Uuid::new_v4();
        let chemical = Uuid::new_v4();
        let rows = vec![
            row(chemical, dec!(100.00), None, Some(facility), 1),
            row(chemical, dec!(40.00), Some(facility), None, 10),
        ];

        // Window starts strictly after the add; the consume falls inside.
        let report = PeriodReport::from_rows(facility, &rows, at(5), at(15));
        assert_eq!(report.opening_balance, dec!(100.00));
        assert_eq!(report.total_income, dec!(0));
        assert_eq!(report.total_outcome, dec!(40.00));
        assert_eq!(report.closing_balance, dec!(60.00));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let facility = Uuid::new_v4();
        let chemical = Uuid::new_v4();
        let rows = vec![
            row(chemical, dec!(10.00), None, Some(facility), 5),
            row(chemical, dec!(20.00), None, Some(facility), 15),
        ];

        let report = PeriodReport::from_rows(facility, &rows, at(5), at(15));
        assert_eq!(report.total_income, dec!(30.00));
    }

    #[test]
    fn test_rows_after_window_ignored() {
        let facility = Uuid::new_v4();
        let chemical = Uuid::new_v4();
        let rows = vec![
            row(chemical, dec!(10.00), None, Some(facility), 5),
            row(chemical, dec!(99.00), None, Some(facility), 25),
        ];

        let report = PeriodReport::from_rows(facility, &rows, at(1), at(10));
        assert_eq!(report.total_income, dec!(10.00));
        assert_eq!(report.closing_balance, dec!(10.00));
    }

    #[test]
    fn test_transfer_counts_on_both_sides() {
        let source = Uuid::new_v4();
        let destination = Uuid::new_v4();
        let chemical = Uuid::new_v4();
        let rows = vec![row(
            chemical,
            dec!(30.00),
            Some(source),
            Some(destination),
            5,
        )];

        let out = PeriodReport::from_rows(source, &rows, at(1), at(10));
        assert_eq!(out.total_outcome, dec!(30.00));
        assert_eq!(out.closing_balance, dec!(-30.00));

        let inn = PeriodReport::from_rows(destination, &rows, at(1), at(10));
        assert_eq!(inn.total_income, dec!(30.00));
        assert_eq!(inn.closing_balance, dec!(30.00));
    }
}

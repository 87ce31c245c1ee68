//! Financial summary policy
//!
//! Pure date-range resolution and the derived summary shape. No I/O lives
//! here; the aggregation query itself belongs to the transaction service.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::AppError;

/// Inclusive date range for a financial summary. Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Aggregated income/expense totals over a resolved range.
///
/// `total_income` and `total_expense` are non-negative magnitudes;
/// `balance = total_income - total_expense`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Summary {
    pub fn new(
        total_income: Decimal,
        total_expense: Decimal,
        range: SummaryRange,
    ) -> Self {
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
            start_date: range.start,
            end_date: range.end,
        }
    }

    /// The defined empty-result contract: no matching transactions is an
    /// all-zero summary, not an error.
    pub fn empty(range: SummaryRange) -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO, range)
    }
}

/// Resolve an optional date range into a concrete inclusive range.
///
/// | start  | end    | result                                       |
/// |--------|--------|----------------------------------------------|
/// | absent | absent | first..last day of `today`'s month           |
/// | absent | given  | first day of end's month .. end              |
/// | given  | absent | start .. last day of start's month           |
/// | given  | given  | start..end, rejected when start > end        |
pub fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<SummaryRange, AppError> {
    let range = match (start, end) {
        (None, None) => SummaryRange {
            start: first_day_of_month(today),
            end: last_day_of_month(today),
        },
        (None, Some(end)) => SummaryRange {
            start: first_day_of_month(end),
            end,
        },
        (Some(start), None) => SummaryRange {
            start,
            end: last_day_of_month(start),
        },
        (Some(start), Some(end)) => {
            if start > end {
                return Err(AppError::BusinessRule(
                    "Start date cannot be after end date".to_string(),
                ));
            }
            SummaryRange { start, end }
        }
    };

    Ok(range)
}

fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 exists in every month")
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("first of next month exists")
        .pred_opt()
        .expect("predecessor of first-of-month exists")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn defaults_to_current_month() {
        let range = resolve_range(None, None, date(2025, 3, 15)).unwrap();
        assert_eq!(range.start, date(2025, 3, 1));
        assert_eq!(range.end, date(2025, 3, 31));
    }

    #[test]
    fn end_only_starts_at_that_month() {
        let range = resolve_range(None, Some(date(2025, 2, 10)), date(2025, 3, 15)).unwrap();
        assert_eq!(range.start, date(2025, 2, 1));
        assert_eq!(range.end, date(2025, 2, 10));
    }

    #[test]
    fn start_only_runs_to_month_end() {
        let range = resolve_range(Some(date(2025, 2, 10)), None, date(2025, 3, 15)).unwrap();
        assert_eq!(range.start, date(2025, 2, 10));
        assert_eq!(range.end, date(2025, 2, 28));
    }

    #[test]
    fn rejects_inverted_range() {
        let err = resolve_range(
            Some(date(2025, 1, 31)),
            Some(date(2025, 1, 1)),
            date(2025, 3, 15),
        )
        .unwrap_err();

        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[test]
    fn explicit_range_passes_through() {
        let range = resolve_range(
            Some(date(2025, 1, 1)),
            Some(date(2025, 6, 30)),
            date(2025, 3, 15),
        )
        .unwrap();
        assert_eq!(range.start, date(2025, 1, 1));
        assert_eq!(range.end, date(2025, 6, 30));
    }

    #[test]
    fn equal_start_and_end_is_valid() {
        let d = date(2025, 4, 2);
        let range = resolve_range(Some(d), Some(d), date(2025, 3, 15)).unwrap();
        assert_eq!(range.start, range.end);
    }

    #[test]
    fn december_month_end() {
        let range = resolve_range(None, None, date(2024, 12, 5)).unwrap();
        assert_eq!(range.end, date(2024, 12, 31));
    }

    #[test]
    fn leap_year_february() {
        let range = resolve_range(Some(date(2024, 2, 10)), None, date(2024, 2, 10)).unwrap();
        assert_eq!(range.end, date(2024, 2, 29));
    }

    #[test]
    fn empty_summary_is_all_zero() {
        let range = resolve_range(None, None, date(2025, 3, 15)).unwrap();
        let summary = Summary::empty(range);

        assert_eq!(summary.total_income, dec!(0));
        assert_eq!(summary.total_expense, dec!(0));
        assert_eq!(summary.balance, dec!(0));
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let range = resolve_range(None, None, date(2025, 3, 15)).unwrap();
        let summary = Summary::new(dec!(1500.00), dec!(420.50), range);

        assert_eq!(summary.balance, dec!(1079.50));
    }
}

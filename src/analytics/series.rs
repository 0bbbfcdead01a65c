use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::data::model::Transaction;

// ---------------------------------------------------------------------------
// Month – calendar-month bucket
// ---------------------------------------------------------------------------

/// A calendar month. Ordering is chronological, so `BTreeMap<Month, _>`
/// iterates series in ascending month order for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Month {
        Month {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Last day of the month: the display anchor for monthly buckets, so a
    /// point for 2024-01 sits at 2024-01-31 on a date axis.
    pub fn last_day(self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// Monthly series
// ---------------------------------------------------------------------------

/// Revenue summed per calendar month, ascending by month.
pub fn monthly_revenue(rows: &[&Transaction]) -> Vec<(Month, f64)> {
    let mut by_month: BTreeMap<Month, f64> = BTreeMap::new();
    for tx in rows {
        *by_month.entry(Month::of(tx.date)).or_insert(0.0) += tx.amount;
    }
    by_month.into_iter().collect()
}

/// Row count per calendar month, ascending by month.
pub fn monthly_transactions(rows: &[&Transaction]) -> Vec<(Month, u64)> {
    let mut by_month: BTreeMap<Month, u64> = BTreeMap::new();
    for tx in rows {
        *by_month.entry(Month::of(tx.date)).or_insert(0) += 1;
    }
    by_month.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::{refs, worked_example};

    fn month(year: i32, month: u32) -> Month {
        Month { year, month }
    }

    #[test]
    fn worked_example_monthly_revenue() {
        let txs = worked_example();
        assert_eq!(
            monthly_revenue(&refs(&txs)),
            vec![(month(2024, 1), 150.0), (month(2024, 2), 200.0)]
        );
    }

    #[test]
    fn months_order_across_years() {
        assert!(month(2023, 12) < month(2024, 1));
        assert!(month(2024, 1) < month(2024, 2));
    }

    #[test]
    fn display_is_year_month() {
        assert_eq!(month(2024, 1).to_string(), "2024-01");
        assert_eq!(month(987, 11).to_string(), "0987-11");
    }

    #[test]
    fn last_day_handles_december_and_leap_years() {
        assert_eq!(
            month(2023, 12).last_day(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
        assert_eq!(
            month(2024, 2).last_day(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            month(2023, 2).last_day(),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
    }

    #[test]
    fn transaction_counts_per_month() {
        let txs = worked_example();
        assert_eq!(
            monthly_transactions(&refs(&txs)),
            vec![(month(2024, 1), 2), (month(2024, 2), 1)]
        );
    }

    #[test]
    fn empty_input_yields_empty_series() {
        assert!(monthly_revenue(&[]).is_empty());
        assert!(monthly_transactions(&[]).is_empty());
    }
}

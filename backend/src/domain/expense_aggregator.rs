//! Spending totals for the dashboard cards.
//!
//! `daily` and `monthly` compare the `YYYY-MM-DD` / `YYYY-MM` prefix of the
//! stored `created_at` text. `calendar_year` parses `created_at` as a full
//! timestamp and checks it against the calendar year window. The two
//! comparisons disagree for timestamps carrying an offset near a year boundary;
//! that difference is kept on purpose.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use shared::{AggregateTotals, Expense};

pub struct ExpenseAggregator;

impl ExpenseAggregator {
    /// Totals as of the current UTC time
    pub fn aggregate_now(expenses: &[Expense]) -> AggregateTotals {
        Self::aggregate(expenses, Utc::now().naive_utc())
    }

    /// Totals relative to `as_of`. Expenses with a non-finite amount are skipped.
    pub fn aggregate(expenses: &[Expense], as_of: NaiveDateTime) -> AggregateTotals {
        let today = as_of.format("%Y-%m-%d").to_string();
        let this_month = as_of.format("%Y-%m").to_string();
        let (year_start, year_end) = calendar_year_window(as_of.date());

        expenses
            .iter()
            .filter(|e| e.amount.is_finite())
            .fold(AggregateTotals::default(), |mut totals, expense| {
                let amount = expense.amount;

                if expense.created_at.get(0..10) == Some(today.as_str()) {
                    totals.daily += amount;
                }
                if expense.created_at.get(0..7) == Some(this_month.as_str()) {
                    totals.monthly += amount;
                }
                if let Some(timestamp) = parse_timestamp(&expense.created_at) {
                    if timestamp >= year_start && timestamp <= year_end {
                        totals.calendar_year += amount;
                    }
                }

                totals
            })
    }
}

/// Jan 1 00:00:00.000 through Dec 31 23:59:59.999 of the year containing `date`
pub fn calendar_year_window(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    use chrono::Datelike;

    let year = date.year();
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_milli_opt(0, 0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN);
    let end = NaiveDate::from_ymd_opt(year, 12, 31)
        .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
        .unwrap_or(NaiveDateTime::MAX);
    (start, end)
}

/// Parse a stored `created_at` value.
///
/// Accepts a bare date (midnight), a naive timestamp with `T` or space
/// separator, or RFC 3339 with an offset (normalised to UTC).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

//! Business timezone helpers
//!
//! Calendar logic (today, week, month) is resolved here into `[start, end)`
//! Unix millis ranges; repositories only ever receive `i64` bounds.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Local date + time of day → Unix millis (business timezone)
///
/// Falls back to UTC when the local time does not exist (DST gap).
pub fn date_time_to_millis(date: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    let naive = date.and_time(time);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Start of day (00:00:00) → Unix millis (business timezone)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_time_to_millis(date, NaiveTime::MIN, tz)
}

/// End of day → next day 00:00:00 Unix millis (business timezone)
///
/// Callers compare with `< end`.
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month after the one containing `date`
pub fn next_month_start(date: NaiveDate) -> NaiveDate {
    let first = month_start(date);
    first.checked_add_months(chrono::Months::new(1)).unwrap_or(first)
}

/// First day of the month before the one containing `date`
pub fn previous_month_start(date: NaiveDate) -> NaiveDate {
    let first = month_start(date);
    first.checked_sub_months(chrono::Months::new(1)).unwrap_or(first)
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// ISO week key, e.g. `2024-W07`
pub fn iso_week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Month key, e.g. `2024-02`
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Named order listing window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPeriod {
    Today,
    Yesterday,
    /// Monday through Sunday of the current week
    Week,
    /// Current calendar month
    Month,
    LastMonth,
}

impl OrderPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderPeriod::Today => "today",
            OrderPeriod::Yesterday => "yesterday",
            OrderPeriod::Week => "week",
            OrderPeriod::Month => "month",
            OrderPeriod::LastMonth => "last_month",
        }
    }
}

impl fmt::Display for OrderPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderPeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(OrderPeriod::Today),
            "yesterday" => Ok(OrderPeriod::Yesterday),
            "week" => Ok(OrderPeriod::Week),
            "month" => Ok(OrderPeriod::Month),
            "last_month" => Ok(OrderPeriod::LastMonth),
            other => Err(AppError::validation(format!("Invalid period: {}", other))),
        }
    }
}

/// Source of "now" in the business timezone
///
/// A frozen clock pins "now" to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    tz: Tz,
    frozen_at: Option<i64>,
}

impl Clock {
    pub fn system(tz: Tz) -> Self {
        Self { tz, frozen_at: None }
    }

    pub fn frozen(tz: Tz, at_millis: i64) -> Self {
        Self {
            tz,
            frozen_at: Some(at_millis),
        }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn now_millis(&self) -> i64 {
        self.frozen_at.unwrap_or_else(shared::util::now_millis)
    }

    pub fn now(&self) -> DateTime<Tz> {
        self.local(self.now_millis())
    }

    /// Today's date in the business timezone
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// `today - days`; fails when the result is outside the calendar range
    pub fn days_ago(&self, days: u64) -> AppResult<NaiveDate> {
        self.today()
            .checked_sub_days(Days::new(days))
            .ok_or_else(|| AppError::validation(format!("{days} days back is out of the date range")))
    }

    pub fn local(&self, millis: i64) -> DateTime<Tz> {
        let utc = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
        self.tz.from_utc_datetime(&utc.naive_utc())
    }

    /// Calendar date of an instant in the business timezone
    pub fn date_of(&self, millis: i64) -> NaiveDate {
        self.local(millis).date_naive()
    }

    /// `[start, end)` of one calendar day
    pub fn day_range(&self, date: NaiveDate) -> (i64, i64) {
        (day_start_millis(date, self.tz), day_end_millis(date, self.tz))
    }

    /// `[start of first, end of last)` over inclusive calendar dates
    pub fn dates_range(&self, first: NaiveDate, last: NaiveDate) -> (i64, i64) {
        (day_start_millis(first, self.tz), day_end_millis(last, self.tz))
    }

    pub fn period_range(&self, period: OrderPeriod) -> AppResult<(i64, i64)> {
        let today = self.today();
        let range = match period {
            OrderPeriod::Today => self.day_range(today),
            OrderPeriod::Yesterday => self.day_range(self.days_ago(1)?),
            OrderPeriod::Week => {
                let start = week_start(today);
                let end = start.checked_add_days(Days::new(7)).unwrap_or(start);
                (day_start_millis(start, self.tz), day_start_millis(end, self.tz))
            }
            OrderPeriod::Month => (
                day_start_millis(month_start(today), self.tz),
                day_start_millis(next_month_start(today), self.tz),
            ),
            OrderPeriod::LastMonth => (
                day_start_millis(previous_month_start(today), self.tz),
                day_start_millis(month_start(today), self.tz),
            ),
        };
        Ok(range)
    }

    /// `YYYY-MM-DD`
    pub fn format_date(&self, millis: i64) -> String {
        self.local(millis).format("%Y-%m-%d").to_string()
    }

    /// `YYYY-MM-DD HH:MM:SS`
    pub fn format_datetime(&self, millis: i64) -> String {
        self.local(millis).format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

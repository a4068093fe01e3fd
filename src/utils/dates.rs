//! Rent schedule arithmetic.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

/// Grace period after the due date before a payment counts as late.
pub const LATE_GRACE_DAYS: i64 = 1;

/// Returns the next rent due date on or after `today`.
///
/// Rent falls due on the lease start's day of the month, clamped to the last
/// day of shorter months (a lease starting on the 31st is due on Feb 28/29).
/// A lease that has not started yet is next due on its start date.
///
/// Returns `None` only when the result would overflow the supported calendar.
pub fn calculate_next_rent_due(lease_start: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    if lease_start >= today {
        return Some(lease_start);
    }

    let due_day = lease_start.day();
    let this_month = due_date_in_month(today.year(), today.month(), due_day)?;
    if this_month >= today {
        return Some(this_month);
    }

    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    due_date_in_month(year, month, due_day)
}

/// Returns true iff `now` is more than one day past the start of `due_date` (UTC).
pub fn is_payment_late(due_date: NaiveDate, now: DateTime<Utc>) -> bool {
    due_date
        .and_time(NaiveTime::MIN)
        .and_utc()
        .checked_add_signed(Duration::days(LATE_GRACE_DAYS))
        .is_some_and(|deadline| now > deadline)
}

fn due_date_in_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last_day = last_day_of_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.min(last_day.day()))
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

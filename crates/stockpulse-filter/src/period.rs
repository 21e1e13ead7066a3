use chrono::{DateTime, TimeDelta, Timelike, Utc};
use stockpulse_core::TimePeriod;

const KST_OFFSET_HOURS: i64 = 9;

/// Bucket for an hour of day in Korea Standard Time.
///
/// Peak covers regular trading, 09:00-15:00. Active covers the hour before
/// the open and 15:00-20:00. Everything else is off.
#[must_use]
pub fn time_period_for_hour(kst_hour: u32) -> TimePeriod {
    match kst_hour {
        9..=14 => TimePeriod::Peak,
        8 | 15..=19 => TimePeriod::Active,
        _ => TimePeriod::Off,
    }
}

/// Bucket for an instant, evaluated at UTC+9.
#[must_use]
pub fn time_period_at(now: DateTime<Utc>) -> TimePeriod {
    let kst = now + TimeDelta::hours(KST_OFFSET_HOURS);
    time_period_for_hour(kst.hour())
}

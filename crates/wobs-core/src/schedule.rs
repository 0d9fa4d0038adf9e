//! Report hours and the schedule gate
//!
//! Reports fire at fixed local wall-clock times at each target. The exact
//! string match of [`ReportHours::should_fire`] is kept for callers that
//! poll; the scheduler itself computes the next fire time with
//! [`ReportHours::next_fire`] and sleeps until it passes.
//!
//! Due times are naive wall-clock times. A UTC offset change at the target
//! (DST) moves the instant a slot comes due, never the hour it reports at.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;

/// Format of local time strings handed around with reports
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid report hour `{0}`, expected HH:MM:SS")]
    InvalidHour(String),

    #[error("no report hours configured")]
    Empty,
}

/// Default reporting hours: every two hours from 06:00 to 22:00
pub const DEFAULT_REPORT_HOURS: &[&str] = &[
    "06:00:00", "08:00:00", "10:00:00", "12:00:00", "14:00:00", "16:00:00", "18:00:00",
    "20:00:00", "22:00:00",
];

/// Set of local wall-clock times at which reports fire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHours {
    times: BTreeSet<NaiveTime>,
}

impl ReportHours {
    pub fn parse<S: AsRef<str>>(hours: &[S]) -> Result<Self, ScheduleError> {
        let times = hours
            .iter()
            .map(|h| {
                let h = h.as_ref();
                NaiveTime::parse_from_str(h, "%H:%M:%S")
                    .map_err(|_| ScheduleError::InvalidHour(h.to_string()))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        if times.is_empty() {
            return Err(ScheduleError::Empty);
        }
        Ok(Self { times })
    }

    pub fn times(&self) -> impl Iterator<Item = &NaiveTime> {
        self.times.iter()
    }

    /// Whether the seconds-precision local time string sits exactly on a
    /// report hour. Strings that are not `YYYY-MM-DD HH:MM:SS ...` never fire.
    pub fn should_fire(&self, local_time: &str) -> bool {
        local_time
            .split_whitespace()
            .nth(1)
            .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M:%S").ok())
            .map(|t| self.times.contains(&t))
            .unwrap_or(false)
    }

    /// First report time at or after the wall-clock time `now`.
    pub fn next_fire(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date();
        [today, today + Duration::days(1)]
            .into_iter()
            .flat_map(|day| self.times.iter().map(move |time| day.and_time(*time)))
            .find(|candidate| *candidate >= now)
            // a non-empty set always has a slot tomorrow
            .unwrap_or(now + Duration::days(1))
    }

    /// First report time strictly after `now`.
    pub fn next_fire_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        self.next_fire(now + Duration::seconds(1))
    }
}

impl Default for ReportHours {
    fn default() -> Self {
        let times = (6..=22)
            .step_by(2)
            .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
            .collect();
        Self { times }
    }
}

/// Free-function form of [`ReportHours::should_fire`] over plain strings
pub fn should_fire<S: AsRef<str>>(local_time: &str, configured_hours: &[S]) -> bool {
    let Some(clock) = local_time.split_whitespace().nth(1) else {
        return false;
    };
    configured_hours.iter().any(|h| h.as_ref() == clock)
}

/// Format a local time the way reports and the gate expect it
pub fn format_local_time(time: &DateTime<FixedOffset>) -> String {
    time.format(LOCAL_TIME_FORMAT).to_string()
}

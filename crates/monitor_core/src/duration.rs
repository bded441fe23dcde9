use std::fmt;

use chrono::{DateTime, TimeDelta, TimeZone};
use monitor_logging::monitor_warn;

/// Display format for projected completion: weekday plus 24-hour time.
pub const COMPLETION_FORMAT: &str = "%A %H:%M";

/// Components of a server-rendered duration such as `"1 day, 2:03:04"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationParts {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Total length in seconds, or `None` on overflow.
    pub fn total_seconds(&self) -> Option<u64> {
        self.days
            .checked_mul(86_400)?
            .checked_add(self.hours.checked_mul(3_600)?)?
            .checked_add(self.minutes.checked_mul(60)?)?
            .checked_add(self.seconds)
    }

    pub fn to_time_delta(&self) -> Option<TimeDelta> {
        let secs = i64::try_from(self.total_seconds()?).ok()?;
        TimeDelta::try_seconds(secs)
    }
}

impl fmt::Display for DurationParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "{}d ", self.days)?;
        }
        write!(f, "{}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Parses the digit groups of a duration string.
///
/// Four groups are `(days, hours, minutes, seconds)`, three are
/// `(hours, minutes, seconds)`. Anything else yields [`DurationParts::ZERO`]
/// and a warning.
pub fn parse_duration(text: &str) -> DurationParts {
    let groups = match digit_groups(text) {
        Some(groups) => groups,
        None => {
            monitor_warn!("Duration {:?} has an out-of-range component", text);
            return DurationParts::ZERO;
        }
    };

    match groups.as_slice() {
        [days, hours, minutes, seconds] => DurationParts {
            days: *days,
            hours: *hours,
            minutes: *minutes,
            seconds: *seconds,
        },
        [hours, minutes, seconds] => DurationParts {
            days: 0,
            hours: *hours,
            minutes: *minutes,
            seconds: *seconds,
        },
        other => {
            monitor_warn!(
                "Duration {:?} has {} numeric groups, expected 3 or 4",
                text,
                other.len()
            );
            DurationParts::ZERO
        }
    }
}

/// Wall-clock time at which a job with `remaining` left will finish.
pub fn projected_completion<Tz: TimeZone>(remaining: &str, now: DateTime<Tz>) -> DateTime<Tz> {
    let parts = parse_duration(remaining);
    let Some(offset) = parts.to_time_delta() else {
        monitor_warn!("Duration {:?} does not fit a time offset", remaining);
        return now;
    };
    match now.clone().checked_add_signed(offset) {
        Some(projected) => projected,
        None => {
            monitor_warn!("Projected completion for {:?} overflows the calendar", remaining);
            now
        }
    }
}

pub fn format_completion<Tz>(when: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    when.format(COMPLETION_FORMAT).to_string()
}

fn digit_groups(text: &str) -> Option<Vec<u64>> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| run.parse::<u64>().ok())
        .collect()
}

//! Human readable relative timestamps for listings and comments.

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

const UNITS: [(i64, &str, &str); 6] = [
    (YEAR, "year", "years"),
    (MONTH, "month", "months"),
    (WEEK, "week", "weeks"),
    (DAY, "day", "days"),
    (HOUR, "hour", "hours"),
    (MINUTE, "minute", "minutes"),
];

/// Describe `value` relative to `now`: "now", "45 seconds ago",
/// "an hour ago", "1 day, 3 hours ago", "5 minutes from now".
pub fn natural_time(value: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(value).num_seconds();
    let (secs, suffix) = if delta >= 0 {
        (delta, "ago")
    } else {
        (-delta, "from now")
    };

    if secs == 0 {
        return "now".to_string();
    }
    if secs < MINUTE {
        return match secs {
            1 => format!("a second {suffix}"),
            n => format!("{n} seconds {suffix}"),
        };
    }
    if secs < HOUR {
        return match secs / MINUTE {
            1 => format!("a minute {suffix}"),
            n => format!("{n} minutes {suffix}"),
        };
    }
    if secs < DAY {
        return match secs / HOUR {
            1 => format!("an hour {suffix}"),
            n => format!("{n} hours {suffix}"),
        };
    }
    format!("{} {suffix}", time_since(secs))
}

// Largest unit plus the next smaller one when it is non-zero.
fn time_since(secs: i64) -> String {
    let Some(index) = UNITS.iter().position(|(size, _, _)| secs >= *size) else {
        return "0 minutes".to_string();
    };
    let (size, singular, plural) = UNITS[index];
    let count = secs / size;
    let mut out = plural_unit(count, singular, plural);

    if let Some(&(next_size, next_singular, next_plural)) = UNITS.get(index + 1) {
        let rest = (secs - count * size) / next_size;
        if rest > 0 {
            out.push_str(", ");
            out.push_str(&plural_unit(rest, next_singular, next_plural));
        }
    }
    out
}

fn plural_unit(count: i64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

//! Custom string formats.

use regex::Regex;
use std::sync::OnceLock;

/// Name of the time-of-day format.
pub const TIME_OF_DAY: &str = "time-of-day";

fn time_of_day_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9](:[0-5][0-9])?$").unwrap())
}

/// `H:MM` or `HH:MM` (hour 0-23, minute 0-59), optionally followed by
/// `:SS` as produced by the normalizer.
pub fn is_time_of_day(value: &str) -> bool {
    time_of_day_regex().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day() {
        for ok in ["0:00", "8:15", "08:15", "23:59", "23:04:00", "7:05:59"] {
            assert!(is_time_of_day(ok), "{}", ok);
        }
        for bad in ["24:00", "12:60", "12", "1:5", "04/15/2021", "12:00:60", "123:00"] {
            assert!(!is_time_of_day(bad), "{}", bad);
        }
    }
}

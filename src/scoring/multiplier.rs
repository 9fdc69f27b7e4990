use chrono::NaiveDate;

/// Steepness of the logistic timing curve. Policy constant, not derived.
pub const STEEPNESS: f64 = 0.3;
/// Asymptotic bounds of the curve (exclusive).
pub const MIN_MULTIPLIER: f64 = 0.5;
pub const MAX_MULTIPLIER: f64 = 2.0;
/// Used when there is no due date or the date cannot be parsed.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DUE_DATE_FORMAT).ok()
}

/// Whole days between due date and completion date, midnight to midnight.
/// Positive = late, negative = early, 0 = on time.
pub fn days_late(due: NaiveDate, completed: NaiveDate) -> i64 {
    (completed - due).num_days()
}

/// Timing multiplier for a completed task.
///
/// `0.5 + 1.5 / (1 + e^(0.3 * days_late))`: a smooth curve bounded to
/// (0.5, 2.0) that rewards early completion and penalizes late completion
/// without discontinuities at day boundaries. On-time completion lands at
/// exactly 1.25.
///
/// Fails soft: no due date or an unparseable one yields 1.0, never an error.
pub fn due_date_multiplier(due_date: Option<&str>, completed: NaiveDate) -> f64 {
    let Some(raw) = due_date else {
        return NEUTRAL_MULTIPLIER;
    };
    let Some(due) = parse_due_date(raw) else {
        return NEUTRAL_MULTIPLIER;
    };
    logistic(days_late(due, completed))
}

fn logistic(days_late: i64) -> f64 {
    let m = MIN_MULTIPLIER
        + (MAX_MULTIPLIER - MIN_MULTIPLIER) / (1.0 + (STEEPNESS * days_late as f64).exp());
    if m.is_finite() {
        m
    } else {
        NEUTRAL_MULTIPLIER
    }
}

/// Scale a base score by a multiplier, rounding to the nearest integer.
/// Never negative.
pub fn apply(base: i64, multiplier: f64) -> i64 {
    let scaled = (base as f64 * multiplier).round();
    if scaled.is_finite() && scaled > 0.0 {
        scaled as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_due_date(s).unwrap()
    }

    #[test]
    fn no_due_date_is_neutral() {
        assert_eq!(due_date_multiplier(None, date("2026-01-15")), 1.0);
    }

    #[test]
    fn bad_due_date_is_neutral() {
        assert_eq!(due_date_multiplier(Some("not-a-date"), date("2026-01-15")), 1.0);
        assert_eq!(due_date_multiplier(Some("2026-13-99"), date("2026-01-15")), 1.0);
    }

    #[test]
    fn on_time_is_exactly_one_point_two_five() {
        let m = due_date_multiplier(Some("2026-01-15"), date("2026-01-15"));
        assert!((m - 1.25).abs() < 1e-12);
    }

    #[test]
    fn strictly_decreasing_and_bounded() {
        let completed = date("2026-01-15");
        let mut prev = f64::INFINITY;
        for offset in -60..=60 {
            let due = completed - chrono::Duration::days(offset);
            let m = due_date_multiplier(Some(&due.to_string()), completed);
            assert!(m > MIN_MULTIPLIER && m < MAX_MULTIPLIER, "m={m} offset={offset}");
            assert!(m < prev, "not decreasing at offset {offset}");
            prev = m;
        }
    }

    #[test]
    fn spec_examples_round_as_expected() {
        let today = date("2026-01-15");
        // due today
        assert_eq!(apply(20, due_date_multiplier(Some("2026-01-15"), today)), 25);
        // one day late
        assert_eq!(apply(20, due_date_multiplier(Some("2026-01-14"), today)), 23);
        // seven days early
        assert_eq!(apply(20, due_date_multiplier(Some("2026-01-22"), today)), 37);
    }

    #[test]
    fn apply_never_negative() {
        assert_eq!(apply(0, 1.25), 0);
        assert_eq!(apply(-10, 1.25), 0);
        assert_eq!(apply(10, f64::NAN), 0);
    }
}

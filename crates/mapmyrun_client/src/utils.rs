//! Helpers for date bounds, workout selection and export file naming.

use crate::{MapMyRunError, Workout, WorkoutTarget};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Parse a listing bound.
///
/// Accepts:
/// - YYYY-MM-DD -> midnight UTC
/// - RFC3339 datetime -> converted to UTC
/// - Naive datetime YYYY-MM-DDTHH:MM:SS -> taken as UTC
pub fn parse_bound(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(ndt.and_utc());
    }
    None
}

/// Format a bound the way the listing endpoint expects it:
/// UTC with millisecond precision and a `Z` suffix.
pub fn format_bound(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Keep GPS-bearing workouts, in listing order, reduced to download targets.
pub fn select_gps_workouts(workouts: &[Workout]) -> Result<Vec<WorkoutTarget>, MapMyRunError> {
    workouts
        .iter()
        .filter(|w| w.has_route())
        .map(WorkoutTarget::try_from)
        .collect()
}

/// `workout-<startDatetime>-<id>.tcx`
pub fn target_filename(target: &WorkoutTarget) -> String {
    format!("workout-{}-{}.tcx", target.start_datetime, target.id)
}

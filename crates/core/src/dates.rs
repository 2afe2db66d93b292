//! Candidate travel-window derivation.

use chrono::{Datelike, Duration, NaiveDate};

use crate::trip::DateOption;

/// Depart-day offsets relative to the race date, index-aligned with
/// the option keys A, B, C.
const DEPART_OFFSETS: [i64; 3] = [-4, -3, -2];
const OPTION_KEYS: [&str; 3] = ["A", "B", "C"];

/// Generate exactly 3 date options (A, B, C) from the race date:
/// depart at race date −4/−3/−2 days, return at depart + duration.
/// Pure and deterministic; identical inputs always produce identical
/// windows. An unparsable race date yields an empty vec, which callers
/// treat like any other missing reference data.
pub fn generate_date_options(race_date_iso: &str, duration_days: i64) -> Vec<DateOption> {
    let Some(race_date) = parse_iso_date(race_date_iso) else {
        return Vec::new();
    };

    DEPART_OFFSETS
        .iter()
        .zip(OPTION_KEYS)
        .map(|(&offset, key)| {
            let depart = race_date + Duration::days(offset);
            let ret = depart + Duration::days(duration_days);
            DateOption {
                key: key.to_string(),
                label: format_label(depart, ret),
                depart_date_iso: depart.format("%Y-%m-%d").to_string(),
                return_date_iso: ret.format("%Y-%m-%d").to_string(),
            }
        })
        .collect()
}

/// Parse the date portion of an ISO string (`YYYY-MM-DD`, with or
/// without a trailing time component).
pub fn parse_iso_date(iso: &str) -> Option<NaiveDate> {
    let date_part = iso.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// `"Jun 3 - Jun 8"` style label with English short month names.
fn format_label(depart: NaiveDate, ret: NaiveDate) -> String {
    format!(
        "{} {} - {} {}",
        depart.format("%b"),
        depart.day(),
        ret.format("%b"),
        ret.day()
    )
}

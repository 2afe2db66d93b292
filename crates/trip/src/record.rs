//! Persisted itinerary records.
//!
//! The stored `result_json` snapshot is decoded tolerantly: early
//! releases persisted date options with snake_case field names, and
//! some snapshots predate whole sections. Everything normalizes to the
//! canonical domain types at this boundary so the services above never
//! see a legacy spelling.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use paddock_core::race::RaceWeekend;
use paddock_core::trip::{
    DateOption, ExperiencesSection, SectionLinks, TicketsSection, TripRequest,
};

/// One date option as found in a stored snapshot. Variants are tried
/// in order; anything that matches neither spelling (missing dates,
/// wrong types) lands in `Unresolvable` and is skipped by callers,
/// never failing the decode of the surrounding record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredDateOption {
    Current {
        key: String,
        label: String,
        #[serde(rename = "departDateISO")]
        depart_date_iso: String,
        #[serde(rename = "returnDateISO")]
        return_date_iso: String,
    },
    /// Pre-1.0 snapshots used snake_case date fields.
    Legacy {
        key: String,
        label: String,
        depart_date_iso: String,
        return_date_iso: String,
    },
    Unresolvable(serde_json::Value),
}

impl StoredDateOption {
    /// Canonical date option, or `None` for unresolvable entries.
    pub fn resolve(&self) -> Option<DateOption> {
        match self {
            StoredDateOption::Current {
                key,
                label,
                depart_date_iso,
                return_date_iso,
            }
            | StoredDateOption::Legacy {
                key,
                label,
                depart_date_iso,
                return_date_iso,
            } => Some(DateOption {
                key: key.clone(),
                label: label.clone(),
                depart_date_iso: depart_date_iso.clone(),
                return_date_iso: return_date_iso.clone(),
            }),
            StoredDateOption::Unresolvable(_) => None,
        }
    }
}

/// Tolerant mirror of [`paddock_core::trip::ItineraryResult`] for
/// stored snapshots: every section is optional and absent maps decode
/// as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredItineraryResult {
    pub request: Option<TripRequest>,
    pub race: Option<RaceWeekend>,
    pub date_options: Vec<StoredDateOption>,
    pub flights_by_option: HashMap<String, SectionLinks>,
    pub stays_by_option: HashMap<String, SectionLinks>,
    pub tickets: Option<TicketsSection>,
    pub experiences: Option<ExperiencesSection>,
}

impl StoredItineraryResult {
    /// Date options that decoded to the canonical shape, in stored
    /// order.
    pub fn resolved_date_options(&self) -> Vec<DateOption> {
        self.date_options
            .iter()
            .filter_map(StoredDateOption::resolve)
            .collect()
    }
}

/// One saved itinerary, as handed over by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryRecord {
    pub id: String,
    pub user_id: String,
    pub origin_city: String,
    pub race_id: String,
    pub duration_days: i64,
    pub budget_tier: String,
    pub result_json: StoredItineraryResult,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- StoredDateOption --

    #[test]
    fn current_spelling_resolves() {
        let stored: StoredDateOption = serde_json::from_value(json!({
            "key": "A",
            "label": "Jun 3 - Jun 8",
            "departDateISO": "2026-06-03",
            "returnDateISO": "2026-06-08"
        }))
        .unwrap();
        let option = stored.resolve().unwrap();
        assert_eq!(option.key, "A");
        assert_eq!(option.depart_date_iso, "2026-06-03");
    }

    #[test]
    fn legacy_snake_case_spelling_resolves() {
        let stored: StoredDateOption = serde_json::from_value(json!({
            "key": "B",
            "label": "Jun 4 - Jun 9",
            "depart_date_iso": "2026-06-04",
            "return_date_iso": "2026-06-09"
        }))
        .unwrap();
        let option = stored.resolve().unwrap();
        assert_eq!(option.key, "B");
        assert_eq!(option.depart_date_iso, "2026-06-04");
        assert_eq!(option.return_date_iso, "2026-06-09");
    }

    #[test]
    fn option_without_dates_is_unresolvable_not_an_error() {
        let stored: StoredDateOption = serde_json::from_value(json!({
            "key": "C",
            "label": "Jun 5 - Jun 10"
        }))
        .unwrap();
        assert!(matches!(stored, StoredDateOption::Unresolvable(_)));
        assert!(stored.resolve().is_none());
    }

    // -- StoredItineraryResult --

    #[test]
    fn mixed_spellings_resolve_in_order_skipping_bad_entries() {
        let stored: StoredItineraryResult = serde_json::from_value(json!({
            "dateOptions": [
                {"key": "A", "label": "a", "departDateISO": "2026-06-03", "returnDateISO": "2026-06-08"},
                {"key": "broken", "label": "b"},
                {"key": "C", "label": "c", "depart_date_iso": "2026-06-05", "return_date_iso": "2026-06-10"}
            ]
        }))
        .unwrap();
        let resolved = stored.resolved_date_options();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].key, "A");
        assert_eq!(resolved[1].key, "C");
    }

    #[test]
    fn empty_snapshot_decodes_to_defaults() {
        let stored: StoredItineraryResult = serde_json::from_value(json!({})).unwrap();
        assert!(stored.request.is_none());
        assert!(stored.race.is_none());
        assert!(stored.date_options.is_empty());
        assert!(stored.flights_by_option.is_empty());
        assert!(stored.stays_by_option.is_empty());
    }

    #[test]
    fn full_result_round_trips_through_stored_shape() {
        let stored: StoredItineraryResult = serde_json::from_value(json!({
            "request": {
                "originCity": "Tokyo",
                "raceId": "monaco-gp",
                "durationDays": 10,
                "budgetTier": "$$"
            },
            "race": {
                "id": "monaco-gp",
                "name": "Monaco Grand Prix",
                "circuit": "Circuit de Monaco",
                "city": "Monte Carlo",
                "country": "Monaco",
                "raceDateISO": "2026-06-07"
            },
            "dateOptions": [],
            "flightsByOption": {},
            "staysByOption": {},
            "tickets": {"title": "Race Tickets", "links": []},
            "experiences": {"title": "Experiences", "links": []}
        }))
        .unwrap();
        assert_eq!(stored.request.unwrap().origin_city, "Tokyo");
        assert_eq!(stored.race.unwrap().race_date_iso, "2026-06-07");
        assert_eq!(stored.tickets.unwrap().title, "Race Tickets");
    }

    #[test]
    fn record_decodes_with_camel_case_fields() {
        let record: ItineraryRecord = serde_json::from_value(json!({
            "id": "rec-1",
            "userId": "user-1",
            "originCity": "Tokyo",
            "raceId": "monaco-gp",
            "durationDays": 10,
            "budgetTier": "$$",
            "resultJson": {},
            "createdAt": "2026-01-15T12:00:00Z",
            "updatedAt": "2026-01-15T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(record.user_id, "user-1");
        assert_eq!(record.race_id, "monaco-gp");
    }
}

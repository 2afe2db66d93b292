//! Race-weekend catalog types.
//!
//! The catalog is externally owned and read-only from this crate's
//! perspective; curated ticket/experience content can change after an
//! itinerary was created, which is why the merge service re-reads it.

use serde::{Deserialize, Serialize};

use crate::trip::ExperienceActivity;

/// A single ticket option from a specific source (Official F1, circuit
/// promoter, etc.), rendered as a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketOption {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_logo: Option<String>,
    pub stand: String,
    pub days: u32,
    pub price: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
}

/// Curated activities for one experience provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceExperienceOption {
    pub provider: String,
    pub activities: Vec<ExperienceActivity>,
}

/// One race weekend on the annual calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceWeekend {
    pub id: String,
    pub name: String,
    pub circuit: String,
    pub city: String,
    pub country: String,
    /// Nearest major airport. Older stored snapshots may lack it; the
    /// IATA resolver falls back to a race-city table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airport_code: Option<String>,
    #[serde(rename = "raceDateISO")]
    pub race_date_iso: String,
    /// Official F1 ticket purchase URL (tickets.formula1.com).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_tickets_url: Option<String>,
    /// Other ticket sources (promoter/circuit URLs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_tickets_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_options: Option<Vec<TicketOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_options: Option<Vec<RaceExperienceOption>>,
}

/// Merge a live catalog race over a stored snapshot: required fields
/// come from the live race, optional fields from the live race where
/// present, else from the stored one. Used by the merge service so
/// airport-code or ticket-URL corrections propagate to old itineraries
/// without wiping stored values the catalog no longer carries.
pub fn merge_race_over(stored: &RaceWeekend, live: &RaceWeekend) -> RaceWeekend {
    RaceWeekend {
        id: live.id.clone(),
        name: live.name.clone(),
        circuit: live.circuit.clone(),
        city: live.city.clone(),
        country: live.country.clone(),
        airport_code: live.airport_code.clone().or_else(|| stored.airport_code.clone()),
        race_date_iso: live.race_date_iso.clone(),
        official_tickets_url: live
            .official_tickets_url
            .clone()
            .or_else(|| stored.official_tickets_url.clone()),
        other_tickets_url: live
            .other_tickets_url
            .clone()
            .or_else(|| stored.other_tickets_url.clone()),
        ticket_options: live
            .ticket_options
            .clone()
            .or_else(|| stored.ticket_options.clone()),
        experience_options: live
            .experience_options
            .clone()
            .or_else(|| stored.experience_options.clone()),
    }
}

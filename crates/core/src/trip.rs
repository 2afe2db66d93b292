//! Trip request and itinerary result types.
//!
//! Serde names match the persisted JSON produced since the first
//! release (camelCase, with the `...DateISO` spelling), so stored
//! snapshots round-trip byte-compatibly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::error::CoreError;
use crate::race::RaceWeekend;

/// Budget tier selected by the user. Serialized as the literal
/// `$` / `$$` / `$$$` strings the UI and stored records use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetTier {
    #[serde(rename = "$")]
    Budget,
    #[serde(rename = "$$")]
    Mid,
    #[serde(rename = "$$$")]
    Luxury,
}

/// Immutable user input for itinerary generation. Validated before use;
/// this is the only place in the domain where a hard failure is raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    #[validate(length(min = 2, message = "Origin city must be at least 2 characters"))]
    pub origin_city: String,
    #[validate(length(min = 1, message = "Race ID is required"))]
    pub race_id: String,
    #[validate(range(min = 2, max = 30, message = "Duration must be between 2 and 30 days"))]
    pub duration_days: i64,
    pub budget_tier: BudgetTier,
}

impl TripRequest {
    /// Validate the request, flattening field errors into a single
    /// [`CoreError::Validation`] message.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(|errs| {
            let mut messages: Vec<String> = errs
                .field_errors()
                .values()
                .flat_map(|field| field.iter())
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .collect();
            messages.sort();
            CoreError::Validation(messages.join("; "))
        })
    }
}

/// One candidate travel window. Derived, never persisted independently;
/// always regenerable from `(raceDateISO, durationDays)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOption {
    pub key: String,
    pub label: String,
    #[serde(rename = "departDateISO")]
    pub depart_date_iso: String,
    #[serde(rename = "returnDateISO")]
    pub return_date_iso: String,
}

/// One leg of a sample flight (per-segment routing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleFlightLeg {
    pub dep_iata: String,
    pub dep_time: String,
    pub arr_iata: String,
    pub arr_time: String,
    pub duration_text: String,
}

/// Sample flight summary shown on a provider card: airline, clock
/// times, stop count, and optional per-leg routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleFlight {
    pub airline_label: String,
    pub departure: String,
    pub arrival: String,
    pub stops: u32,
    pub duration_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_airports: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legs: Option<Vec<SampleFlightLeg>>,
}

/// One outbound provider deep link. `from_price` and `sample_flight`
/// are ephemeral enrichments, absent until the price enricher runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderLink {
    pub label: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_flight: Option<SampleFlight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_affiliate: Option<bool>,
}

impl ProviderLink {
    /// Plain link with no logo or enrichments.
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            logo: None,
            from_price: None,
            sample_flight: None,
            is_affiliate: None,
        }
    }

    pub fn with_logo(mut self, logo: &str) -> Self {
        self.logo = Some(logo.to_string());
        self
    }

    pub fn with_affiliate(mut self, is_affiliate: bool) -> Self {
        self.is_affiliate = Some(is_affiliate);
        self
    }
}

/// A named group of provider links plus optional notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionLinks {
    pub title: String,
    pub links: Vec<ProviderLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
}

/// Tickets section: fallback links plus optional curated options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketsSection {
    pub title: String,
    pub links: Vec<ProviderLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<crate::race::TicketOption>>,
}

/// A single curated activity shown under an experience provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceActivity {
    pub title: String,
    pub href: String,
    pub description: String,
}

/// Experiences section: provider links plus up to two curated
/// activities per provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencesSection {
    pub title: String,
    pub links: Vec<ProviderLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_activities: Option<HashMap<String, Vec<ExperienceActivity>>>,
}

/// The full derived snapshot. Created once at generation time, stored
/// verbatim by the persistence collaborator, and refreshed (never
/// mutated in place) by the merge service on every subsequent view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryResult {
    pub request: TripRequest,
    pub race: RaceWeekend,
    pub date_options: Vec<DateOption>,
    pub flights_by_option: HashMap<String, SectionLinks>,
    pub stays_by_option: HashMap<String, SectionLinks>,
    pub tickets: TicketsSection,
    pub experiences: ExperiencesSection,
}

//! Wire models for the flight-offers endpoint.
//!
//! Every field is optional: the upstream payload varies by carrier and
//! fare source, and a partially filled offer is still usable for the
//! price/sample mapping downstream.

use serde::Deserialize;

/// Departure or arrival point of one segment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPoint {
    /// ISO date-time, e.g. `2026-06-03T10:15:00`.
    pub at: Option<String>,
    pub iata_code: Option<String>,
}

/// One flight segment within an itinerary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSegment {
    pub departure: Option<SegmentPoint>,
    pub arrival: Option<SegmentPoint>,
    pub carrier_code: Option<String>,
    pub number_of_stops: Option<u32>,
    /// ISO-8601 duration, e.g. `PT12H30M`.
    pub duration: Option<String>,
}

/// One direction of travel (outbound or return).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferItinerary {
    pub duration: Option<String>,
    pub segments: Option<Vec<OfferSegment>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPrice {
    pub grand_total: Option<String>,
}

/// A single ranked fare offer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightOffer {
    pub price: Option<OfferPrice>,
    pub itineraries: Option<Vec<OfferItinerary>>,
}

impl FlightOffer {
    /// Parsed grand total, when present and numeric.
    pub fn grand_total(&self) -> Option<f64> {
        self.price
            .as_ref()
            .and_then(|p| p.grand_total.as_deref())
            .and_then(|t| t.parse::<f64>().ok())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorSource {
    pub parameter: Option<String>,
    pub pointer: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorEntry {
    pub title: Option<String>,
    pub detail: Option<String>,
    pub source: Option<ErrorSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OffersResponse {
    pub data: Option<Vec<FlightOffer>>,
    pub errors: Option<Vec<ApiErrorEntry>>,
}

/// Flatten the upstream `errors` array into one log-friendly line.
pub(crate) fn summarize_errors(response: &OffersResponse) -> String {
    let Some(errors) = response.errors.as_deref().filter(|e| !e.is_empty()) else {
        return "Unknown error".to_string();
    };
    errors
        .iter()
        .map(|e| {
            let location = e.source.as_ref().and_then(|s| {
                s.parameter
                    .as_ref()
                    .map(|p| format!("param={p}"))
                    .or_else(|| s.pointer.as_ref().map(|p| format!("ptr={p}")))
            });
            [e.title.clone(), e.detail.clone(), location]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

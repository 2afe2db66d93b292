//! Flight "from" price enrichment.
//!
//! Prices come from the fare-search collaborator when credentials are
//! configured; otherwise a deterministic placeholder is derived from
//! the route so the UI layout stays stable. `from_api` tells the UI
//! whether the numbers are real — placeholder values must never be
//! shown as prices.

use std::collections::HashMap;
use std::sync::LazyLock;

use futures::future::join_all;
use regex::Regex;
use serde::{Deserialize, Serialize};

use paddock_amadeus::{AmadeusClient, FlightOffer, OfferSegment};
use paddock_core::iata::{self, normalize_city};
use paddock_core::race::RaceWeekend;
use paddock_core::trip::{
    DateOption, ItineraryResult, SampleFlight, SampleFlightLeg, SectionLinks, TripRequest,
};

/// Shown when a time or duration cannot be derived from the offer.
const EN_DASH: &str = "\u{2013}";

static HOURS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)H").expect("valid regex"));
static MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)M").expect("valid regex"));

/// "From" prices for the three flight providers of one date option.
/// `sample_flights` is positional: index 0 belongs to the first
/// provider link, 1 to the second, 2 to the third.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPricesResult {
    pub google: u32,
    pub skyscanner: u32,
    pub kayak: u32,
    /// True when prices came from the fare API. Placeholder values
    /// carry `false` and must not be rendered as prices.
    pub from_api: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_flights: Option<Vec<Option<SampleFlight>>>,
}

/// Deterministic placeholder prices for a route. Same (origin, dest)
/// pair always yields the same three values; the per-provider offsets
/// keep the numbers visibly distinct.
pub fn placeholder_prices(origin_city: &str, dest_city: &str) -> FlightPricesResult {
    let key = format!("{}|{}", normalize_city(origin_city), normalize_city(dest_city));
    let mut h: u32 = 0;
    for unit in key.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(u32::from(unit));
    }
    let base = 220 + i64::from(h % 480);
    FlightPricesResult {
        google: round_to_five(base + i64::from(h % 40)),
        skyscanner: round_to_five(base - 15 - i64::from(h % 25)),
        kayak: round_to_five(base - 5 + i64::from(h % 30)),
        from_api: false,
        sample_flights: None,
    }
}

fn round_to_five(n: i64) -> u32 {
    let rounded = ((n as f64) / 5.0).round() * 5.0;
    rounded.max(0.0) as u32
}

/// Clock time `HH:MM` from an ISO date-time string.
fn format_time(iso: Option<&str>) -> String {
    iso.and_then(|s| s.get(11..16))
        .filter(|t| !t.is_empty())
        .unwrap_or(EN_DASH)
        .to_string()
}

/// ISO-8601 duration (`PT12H30M`) to display text (`12h 30m`).
fn parse_duration(dur: Option<&str>) -> String {
    let Some(dur) = dur.filter(|d| d.starts_with("PT")) else {
        return EN_DASH.to_string();
    };
    let mut parts: Vec<String> = Vec::new();
    if let Some(caps) = HOURS_RE.captures(dur) {
        parts.push(format!("{}h", &caps[1]));
    }
    if let Some(caps) = MINUTES_RE.captures(dur) {
        parts.push(format!("{}m", &caps[1]));
    }
    if parts.is_empty() {
        EN_DASH.to_string()
    } else {
        parts.join(" ")
    }
}

/// Two-letter carrier code to display name, falling back to the raw
/// code for carriers outside the table.
fn airline_name_from_code(code: &str) -> String {
    if code.is_empty() {
        return "Flight".to_string();
    }
    let name = match code.to_uppercase().as_str() {
        "AA" => "American Airlines",
        "AC" => "Air Canada",
        "AF" => "Air France",
        "AY" => "Finnair",
        "BA" => "British Airways",
        "CX" => "Cathay Pacific",
        "DL" => "Delta Air Lines",
        "EK" => "Emirates",
        "EY" => "Etihad Airways",
        "IB" => "Iberia",
        "KL" => "KLM",
        "LH" => "Lufthansa",
        "LX" => "Swiss International Air Lines",
        "NH" => "All Nippon Airways",
        "QR" => "Qatar Airways",
        "SA" => "South African Airways",
        "SQ" => "Singapore Airlines",
        "TK" => "Turkish Airlines",
        "UA" => "United Airlines",
        "VS" => "Virgin Atlantic",
        _ => return code.to_string(),
    };
    name.to_string()
}

fn segment_leg(segment: &OfferSegment) -> Option<SampleFlightLeg> {
    let dep_iata = segment
        .departure
        .as_ref()
        .and_then(|p| p.iata_code.clone())
        .unwrap_or_default();
    let arr_iata = segment
        .arrival
        .as_ref()
        .and_then(|p| p.iata_code.clone())
        .unwrap_or_default();
    let dep_time = format_time(segment.departure.as_ref().and_then(|p| p.at.as_deref()));
    let arr_time = format_time(segment.arrival.as_ref().and_then(|p| p.at.as_deref()));
    if dep_iata.is_empty() && arr_iata.is_empty() && dep_time == EN_DASH && arr_time == EN_DASH {
        return None;
    }
    Some(SampleFlightLeg {
        dep_iata,
        dep_time,
        arr_iata,
        arr_time,
        duration_text: parse_duration(segment.duration.as_deref()),
    })
}

/// Card summary of one offer: first itinerary only (the outbound),
/// clock times from its first/last segments, connection airports from
/// the in-between arrivals.
fn offer_to_sample_flight(offer: &FlightOffer) -> Option<SampleFlight> {
    let first = offer.itineraries.as_ref()?.first()?;
    let segments = first.segments.as_deref().filter(|s| !s.is_empty())?;

    let first_seg = &segments[0];
    let last_seg = &segments[segments.len() - 1];
    let departure = format_time(first_seg.departure.as_ref().and_then(|p| p.at.as_deref()));
    let arrival = format_time(last_seg.arrival.as_ref().and_then(|p| p.at.as_deref()));

    // Multiple segments mean connections (2 segments = 1 stop); a
    // single segment reports its own stop count.
    let stops = if segments.len() > 1 {
        (segments.len() - 1) as u32
    } else {
        first_seg.number_of_stops.unwrap_or(0)
    };

    let carrier_code = first_seg.carrier_code.as_deref().unwrap_or("");

    let stop_airports: Vec<String> = segments[..segments.len() - 1]
        .iter()
        .filter_map(|s| s.arrival.as_ref().and_then(|p| p.iata_code.clone()))
        .filter(|c| !c.is_empty())
        .collect();

    let legs: Vec<SampleFlightLeg> = segments.iter().filter_map(segment_leg).collect();

    Some(SampleFlight {
        airline_label: airline_name_from_code(carrier_code),
        departure,
        arrival,
        stops,
        duration_text: parse_duration(first.duration.as_deref()),
        stop_airports: (!stop_airports.is_empty()).then_some(stop_airports),
        legs: (!legs.is_empty()).then_some(legs),
    })
}

struct OfferWithPrice {
    price: f64,
    sample: Option<SampleFlight>,
}

/// Cheapest offers for a route, up to three. Tries a round-trip search
/// first and falls back to one-way; some route/date pairs only return
/// offers for one of the two shapes. Empty when every attempt fails.
async fn fetch_top_offers(
    client: &AmadeusClient,
    origin_iata: &str,
    dest_iata: &str,
    departure_date: &str,
    return_date: &str,
    access_token: &str,
) -> Vec<OfferWithPrice> {
    let attempts: [(&str, Option<&str>); 2] =
        [("rt", Some(return_date)), ("ow", None)];

    for (label, ret) in attempts {
        let offers = match client
            .flight_offers(origin_iata, dest_iata, departure_date, ret, access_token)
            .await
        {
            Ok(offers) => offers,
            Err(err) => {
                tracing::warn!(attempt = label, error = %err, "flight offers search failed");
                continue;
            }
        };
        if offers.is_empty() {
            tracing::debug!(
                attempt = label,
                origin = origin_iata,
                dest = dest_iata,
                "no flight offers"
            );
            continue;
        }

        let mut priced: Vec<(f64, &FlightOffer)> = offers
            .iter()
            .filter_map(|offer| offer.grand_total().map(|price| (price, offer)))
            .collect();
        if priced.is_empty() {
            tracing::debug!(attempt = label, "offers carried no parsable price");
            continue;
        }
        priced.sort_by(|a, b| a.0.total_cmp(&b.0));
        return priced
            .into_iter()
            .take(3)
            .map(|(price, offer)| OfferWithPrice {
                price,
                sample: offer_to_sample_flight(offer),
            })
            .collect();
    }

    Vec::new()
}

/// Fetches "from" prices per provider, degrading to placeholders when
/// the fare API is unconfigured, unreachable, or missing route data.
pub struct FlightPriceService {
    client: AmadeusClient,
}

impl FlightPriceService {
    pub fn new(client: AmadeusClient) -> Self {
        Self { client }
    }

    /// Prices for a single date option. Fetches its own token; prefer
    /// [`prices_for_options`](Self::prices_for_options) when several
    /// options are needed.
    pub async fn prices_for_option(
        &self,
        request: &TripRequest,
        race: &RaceWeekend,
        date_option: &DateOption,
    ) -> FlightPricesResult {
        let placeholder = placeholder_prices(&request.origin_city, &race.city);
        let token = match self.client.fetch_token().await {
            Ok(Some(token)) => token,
            Ok(None) => return placeholder,
            Err(err) => {
                tracing::warn!(error = %err, "fare token request failed");
                return placeholder;
            }
        };
        self.prices_with_token(request, race, date_option, &token)
            .await
    }

    /// Prices for all date options with one token and parallel offer
    /// searches. Empty map for an empty option list.
    pub async fn prices_for_options(
        &self,
        request: &TripRequest,
        race: &RaceWeekend,
        date_options: &[DateOption],
    ) -> HashMap<String, FlightPricesResult> {
        if date_options.is_empty() {
            return HashMap::new();
        }

        let token = match self.client.fetch_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                return date_options
                    .iter()
                    .map(|opt| {
                        (
                            opt.key.clone(),
                            placeholder_prices(&request.origin_city, &race.city),
                        )
                    })
                    .collect();
            }
            Err(err) => {
                tracing::warn!(error = %err, "fare token request failed");
                return date_options
                    .iter()
                    .map(|opt| {
                        (
                            opt.key.clone(),
                            placeholder_prices(&request.origin_city, &race.city),
                        )
                    })
                    .collect();
            }
        };

        let fetches = date_options
            .iter()
            .map(|opt| self.prices_with_token(request, race, opt, &token));
        let results = join_all(fetches).await;

        date_options
            .iter()
            .zip(results)
            .map(|(opt, prices)| (opt.key.clone(), prices))
            .collect()
    }

    async fn prices_with_token(
        &self,
        request: &TripRequest,
        race: &RaceWeekend,
        date_option: &DateOption,
        access_token: &str,
    ) -> FlightPricesResult {
        let placeholder = placeholder_prices(&request.origin_city, &race.city);

        let Some(origin) = iata::origin_iata(&request.origin_city) else {
            return placeholder;
        };
        let Some(dest) = iata::dest_iata(race) else {
            return placeholder;
        };
        let (Some(depart), Some(ret)) = (
            date_option.depart_date_iso.get(..10),
            date_option.return_date_iso.get(..10),
        ) else {
            return placeholder;
        };

        let top = fetch_top_offers(&self.client, origin, &dest, depart, ret, access_token).await;
        let Some(first) = top.first() else {
            return placeholder;
        };

        let google = first.price.round() as u32;
        let skyscanner = top.get(1).map_or(first.price, |o| o.price).round() as u32;
        let kayak = top.get(2).map_or(first.price, |o| o.price).round() as u32;
        let sample_flights = vec![
            first.sample.clone(),
            top.get(1).and_then(|o| o.sample.clone()),
            top.get(2).and_then(|o| o.sample.clone()),
        ];

        FlightPricesResult {
            google,
            skyscanner,
            kayak,
            from_api: true,
            sample_flights: Some(sample_flights),
        }
    }

    /// Enrich every flights section of an itinerary result with
    /// `from_price`/`sample_flight`. Sections stay untouched when the
    /// prices for their option are placeholders.
    pub async fn enrich_itinerary(&self, result: &ItineraryResult) -> ItineraryResult {
        if result.date_options.is_empty() {
            return result.clone();
        }

        let prices_map = self
            .prices_for_options(&result.request, &result.race, &result.date_options)
            .await;

        let mut enriched = result.clone();
        for date_option in &result.date_options {
            let Some(section) = enriched.flights_by_option.get_mut(&date_option.key) else {
                continue;
            };
            if let Some(prices) = prices_map.get(&date_option.key) {
                apply_prices_to_section(section, prices);
            }
        }
        enriched
    }
}

/// Write prices onto a flights section positionally: first link gets
/// the cheapest offer, second and third the next two. No-op for
/// placeholder prices.
pub fn apply_prices_to_section(section: &mut SectionLinks, prices: &FlightPricesResult) {
    if !prices.from_api {
        return;
    }
    let samples = prices.sample_flights.as_deref().unwrap_or(&[]);
    let per_link = [prices.google, prices.skyscanner, prices.kayak];
    for (i, link) in section.links.iter_mut().take(3).enumerate() {
        link.from_price = Some(per_link[i].to_string());
        link.sample_flight = samples.get(i).cloned().flatten();
    }
}

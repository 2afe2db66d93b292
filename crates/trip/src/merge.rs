//! Merging stored itineraries with live catalog data.
//!
//! Stored snapshots go stale in two ways: curated ticket/experience
//! content gets edited after the itinerary was created, and link
//! construction itself improves between releases. The merge service
//! therefore rebuilds the tickets, flights, and stays sections from
//! current code and catalog data on every read, passing other sections
//! through from the snapshot. Flight prices are a separate, slower
//! call so the itinerary page renders before fares arrive.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Datelike;

use paddock_catalog::RaceCatalog;
use paddock_core::dates::{generate_date_options, parse_iso_date};
use paddock_core::links::{flight_notes, neighborhood_tips, LinkBuilder};
use paddock_core::race::{merge_race_over, RaceWeekend};
use paddock_core::trip::{
    BudgetTier, DateOption, ExperiencesSection, ItineraryResult, SectionLinks, TicketsSection,
    TripRequest,
};

use crate::prices::{apply_prices_to_section, FlightPriceService};
use crate::record::{ItineraryRecord, StoredItineraryResult};
use crate::DEFAULT_SEASON;

/// Everything needed to rebuild the per-option sections of a stored
/// snapshot: the race with live corrections applied, the canonical
/// date options, and the freshly built flights sections.
struct SectionRebuild {
    request: TripRequest,
    race: RaceWeekend,
    options: Vec<DateOption>,
    flights: HashMap<String, SectionLinks>,
}

/// Rebuilds stored itineraries against the live race catalog.
pub struct MergeService {
    catalog: Arc<dyn RaceCatalog>,
    links: LinkBuilder,
    prices: FlightPriceService,
}

impl MergeService {
    pub fn new(
        catalog: Arc<dyn RaceCatalog>,
        links: LinkBuilder,
        prices: FlightPriceService,
    ) -> Self {
        Self {
            catalog,
            links,
            prices,
        }
    }

    /// Merged itinerary result for a stored record: live tickets plus
    /// rebuilt flights and stays sections. Does not fetch flight
    /// prices; see [`flight_prices_for_itinerary`](Self::flight_prices_for_itinerary).
    pub fn merged_itinerary_result(&self, record: &ItineraryRecord) -> ItineraryResult {
        let stored = &record.result_json;
        let live = self.live_race(record);

        let tickets = match &live {
            Some(race) => self.links.tickets_section(race),
            None => stored.tickets.clone().unwrap_or_else(empty_tickets),
        };

        let (date_options, flights_by_option, stays_by_option) =
            match self.rebuild_sections(stored, live.as_ref()) {
                Some(rebuild) => {
                    let mut stays: HashMap<String, SectionLinks> = HashMap::new();
                    for option in &rebuild.options {
                        stays.insert(
                            option.key.clone(),
                            self.stays_section(&rebuild.request, &rebuild.race, option),
                        );
                    }
                    (rebuild.options, rebuild.flights, stays)
                }
                None => (
                    stored.resolved_date_options(),
                    stored.flights_by_option.clone(),
                    stored.stays_by_option.clone(),
                ),
            };

        let request = stored
            .request
            .clone()
            .unwrap_or_else(|| request_from_record(record));
        let race = stored
            .race
            .clone()
            .or(live)
            .unwrap_or_else(|| minimal_race(&record.race_id));
        let experiences = stored
            .experiences
            .clone()
            .unwrap_or_else(empty_experiences);

        ItineraryResult {
            request,
            race,
            date_options,
            flights_by_option,
            stays_by_option,
            tickets,
            experiences,
        }
    }

    /// Rebuilt flights sections with `from_price`/`sample_flight`
    /// filled in from the fare API. One token, all options fetched in
    /// parallel. Empty map when the snapshot holds nothing to price.
    pub async fn flight_prices_for_itinerary(
        &self,
        record: &ItineraryRecord,
    ) -> HashMap<String, SectionLinks> {
        let live = self.live_race(record);
        let Some(rebuild) = self.rebuild_sections(&record.result_json, live.as_ref()) else {
            return HashMap::new();
        };
        self.priced_sections(&rebuild.request, &rebuild.race, &rebuild.options, rebuild.flights)
            .await
    }

    /// Priced flights sections for a request and race with no saved
    /// itinerary (the sample itinerary page).
    pub async fn flight_prices_for_request(
        &self,
        request: &TripRequest,
        race: &RaceWeekend,
    ) -> HashMap<String, SectionLinks> {
        let options = generate_date_options(&race.race_date_iso, request.duration_days);
        let mut flights: HashMap<String, SectionLinks> = HashMap::new();
        for option in &options {
            flights.insert(option.key.clone(), self.flights_section(request, race, option));
        }
        self.priced_sections(request, race, &options, flights).await
    }

    // ---- internals ----

    fn live_race(&self, record: &ItineraryRecord) -> Option<RaceWeekend> {
        let stored = &record.result_json;
        let year = season_year(stored);
        let race_id = stored
            .request
            .as_ref()
            .map(|r| r.race_id.as_str())
            .unwrap_or(&record.race_id);
        self.catalog.race_by_id(year, race_id)
    }

    /// The per-option rebuild, preferring stored date options (skipping
    /// unresolvable entries) and regenerating them from the stored
    /// race date when the snapshot predates date options entirely.
    /// `None` means the snapshot lacks the request or race needed to
    /// rebuild; callers pass the stored sections through instead.
    fn rebuild_sections(
        &self,
        stored: &StoredItineraryResult,
        live: Option<&RaceWeekend>,
    ) -> Option<SectionRebuild> {
        let request = stored.request.as_ref()?;
        let stored_race = stored.race.as_ref()?;

        let (race, options) = if !stored.date_options.is_empty() {
            let race = match live {
                Some(live) => merge_race_over(stored_race, live),
                None => stored_race.clone(),
            };
            (race, stored.resolved_date_options())
        } else if let Some(live) = live {
            let race = merge_race_over(stored_race, live);
            let options = generate_date_options(&stored_race.race_date_iso, request.duration_days);
            (race, options)
        } else {
            return None;
        };

        let mut flights: HashMap<String, SectionLinks> = HashMap::new();
        for option in &options {
            flights.insert(option.key.clone(), self.flights_section(request, &race, option));
        }

        Some(SectionRebuild {
            request: request.clone(),
            race,
            options,
            flights,
        })
    }

    async fn priced_sections(
        &self,
        request: &TripRequest,
        race: &RaceWeekend,
        options: &[DateOption],
        mut flights: HashMap<String, SectionLinks>,
    ) -> HashMap<String, SectionLinks> {
        let prices_map = self.prices.prices_for_options(request, race, options).await;
        for (key, section) in flights.iter_mut() {
            if let Some(prices) = prices_map.get(key) {
                apply_prices_to_section(section, prices);
            }
        }
        flights
    }

    fn flights_section(
        &self,
        request: &TripRequest,
        race: &RaceWeekend,
        option: &DateOption,
    ) -> SectionLinks {
        SectionLinks {
            title: "Flights".to_string(),
            links: self.links.flights_links(request, race, option),
            notes: Some(flight_notes(request.budget_tier)),
        }
    }

    fn stays_section(
        &self,
        request: &TripRequest,
        race: &RaceWeekend,
        option: &DateOption,
    ) -> SectionLinks {
        SectionLinks {
            title: "Accommodation".to_string(),
            links: self.links.stays_links(race, option),
            notes: Some(neighborhood_tips(request.budget_tier)),
        }
    }
}

/// Season to look the race up in: the stored race date's year, or the
/// current default season when the snapshot lacks a parsable date.
fn season_year(stored: &StoredItineraryResult) -> i32 {
    stored
        .race
        .as_ref()
        .and_then(|race| parse_iso_date(&race.race_date_iso))
        .map(|date| date.year())
        .unwrap_or(DEFAULT_SEASON)
}

/// Request synthesized from the record's own columns, for snapshots
/// that predate storing the request inside the result.
fn request_from_record(record: &ItineraryRecord) -> TripRequest {
    TripRequest {
        origin_city: record.origin_city.clone(),
        race_id: record.race_id.clone(),
        duration_days: record.duration_days,
        budget_tier: parse_budget_tier(&record.budget_tier),
    }
}

fn parse_budget_tier(raw: &str) -> BudgetTier {
    match raw {
        "$" => BudgetTier::Budget,
        "$$$" => BudgetTier::Luxury,
        _ => BudgetTier::Mid,
    }
}

fn minimal_race(race_id: &str) -> RaceWeekend {
    RaceWeekend {
        id: race_id.to_string(),
        name: String::new(),
        circuit: String::new(),
        city: String::new(),
        country: String::new(),
        airport_code: None,
        race_date_iso: String::new(),
        official_tickets_url: None,
        other_tickets_url: None,
        ticket_options: None,
        experience_options: None,
    }
}

fn empty_tickets() -> TicketsSection {
    TicketsSection {
        title: "Race Tickets".to_string(),
        links: Vec::new(),
        options: None,
    }
}

fn empty_experiences() -> ExperiencesSection {
    ExperiencesSection {
        title: "Experiences & Activities".to_string(),
        links: Vec::new(),
        provider_activities: None,
    }
}

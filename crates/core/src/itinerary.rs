//! Itinerary composition.

use std::collections::HashMap;

use crate::dates::generate_date_options;
use crate::links::{flight_notes, neighborhood_tips, LinkBuilder};
use crate::race::RaceWeekend;
use crate::trip::{ExperiencesSection, ItineraryResult, SectionLinks, TripRequest};

/// Build a complete itinerary result from a trip request and a race
/// weekend: three date options, flights and stays per option, one
/// constant tickets section and one constant experiences section
/// (ticket/experience availability does not vary by travel date).
/// Pure and deterministic; persistence is the caller's concern.
pub fn build_itinerary(
    builder: &LinkBuilder,
    request: &TripRequest,
    race: &RaceWeekend,
) -> ItineraryResult {
    let date_options = generate_date_options(&race.race_date_iso, request.duration_days);

    let mut flights_by_option: HashMap<String, SectionLinks> = HashMap::new();
    let mut stays_by_option: HashMap<String, SectionLinks> = HashMap::new();

    for date_option in &date_options {
        flights_by_option.insert(
            date_option.key.clone(),
            SectionLinks {
                title: "Flights".to_string(),
                links: builder.flights_links(request, race, date_option),
                notes: Some(flight_notes(request.budget_tier)),
            },
        );
        stays_by_option.insert(
            date_option.key.clone(),
            SectionLinks {
                title: "Accommodation".to_string(),
                links: builder.stays_links(race, date_option),
                notes: Some(neighborhood_tips(request.budget_tier)),
            },
        );
    }

    let tickets = builder.tickets_section(race);

    // The build path ships provider links only; curated activities are
    // attached by the merge path via `experiences_section`.
    let experiences = ExperiencesSection {
        title: "Experiences & Activities".to_string(),
        links: builder.experiences_links(race),
        provider_activities: None,
    };

    ItineraryResult {
        request: request.clone(),
        race: race.clone(),
        date_options,
        flights_by_option,
        stays_by_option,
        tickets,
        experiences,
    }
}

//! Merge service behavior against stored snapshots: section rebuilds,
//! legacy field-name tolerance, and catalog-miss pass-through.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use paddock_amadeus::{AmadeusClient, AmadeusConfig};
use paddock_catalog::{RaceCatalog, StaticCatalog};
use paddock_core::links::LinkBuilder;
use paddock_core::race::RaceWeekend;
use paddock_trip::merge::MergeService;
use paddock_trip::prices::FlightPriceService;
use paddock_trip::record::{ItineraryRecord, StoredItineraryResult};

fn monaco() -> RaceWeekend {
    RaceWeekend {
        id: "monaco-gp".to_string(),
        name: "Monaco Grand Prix".to_string(),
        circuit: "Circuit de Monaco".to_string(),
        city: "Monte Carlo".to_string(),
        country: "Monaco".to_string(),
        airport_code: None,
        race_date_iso: "2026-06-07".to_string(),
        official_tickets_url: None,
        other_tickets_url: None,
        ticket_options: None,
        experience_options: None,
    }
}

fn service(catalog: impl RaceCatalog + 'static) -> MergeService {
    MergeService::new(
        Arc::new(catalog),
        LinkBuilder::default(),
        FlightPriceService::new(AmadeusClient::new(AmadeusConfig::default())),
    )
}

fn record(result_json: serde_json::Value) -> ItineraryRecord {
    let result_json: StoredItineraryResult = serde_json::from_value(result_json).unwrap();
    ItineraryRecord {
        id: "rec-1".to_string(),
        user_id: "user-1".to_string(),
        origin_city: "Tokyo".to_string(),
        race_id: "monaco-gp".to_string(),
        duration_days: 10,
        budget_tier: "$$".to_string(),
        result_json,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn stored_snapshot() -> serde_json::Value {
    json!({
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
        "dateOptions": [
            {
                "key": "opt1",
                "label": "Jun 2 - Jun 12",
                "departDateISO": "2026-06-02",
                "returnDateISO": "2026-06-12"
            }
        ],
        "flightsByOption": {},
        "staysByOption": {
            "opt1": {
                "title": "Accommodation",
                "links": [
                    {"label": "Booking.com", "href": "https://www.booking.com/old"},
                    {"label": "Airbnb", "href": "https://www.airbnb.com/old"},
                    {"label": "Google Hotels", "href": "https://www.google.com/travel/hotels/old"}
                ],
                "notes": ["Tip one"]
            }
        },
        "tickets": {"title": "Race Tickets", "links": []},
        "experiences": {"title": "Experiences & Activities", "links": []}
    })
}

#[test]
fn rebuilds_stays_so_each_link_has_a_logo() {
    // Catalog miss: the stored race still drives the rebuild.
    let merged = service(StaticCatalog::empty(2026)).merged_itinerary_result(&record(stored_snapshot()));

    let stays = &merged.stays_by_option["opt1"];
    assert_eq!(stays.title, "Accommodation");
    assert_eq!(stays.links.len(), 3);
    assert_eq!(stays.links[0].label, "Booking.com");
    assert_eq!(stays.links[0].logo.as_deref(), Some("/logos/booking.svg"));
    assert_eq!(stays.links[1].label, "Airbnb");
    assert_eq!(stays.links[1].logo.as_deref(), Some("/logos/airbnb.svg"));
    assert_eq!(stays.links[2].label, "Google Hotels");
    assert_eq!(stays.links[2].logo.as_deref(), Some("/logos/google.svg"));
}

#[test]
fn rebuilds_sections_for_every_stored_option_key() {
    let mut snapshot = stored_snapshot();
    snapshot["dateOptions"] = json!([
        {"key": "a", "label": "Jun 1 - Jun 10", "departDateISO": "2026-06-01", "returnDateISO": "2026-06-10"},
        {"key": "b", "label": "Jun 2 - Jun 12", "departDateISO": "2026-06-02", "returnDateISO": "2026-06-12"}
    ]);
    snapshot["staysByOption"] = json!({});

    let merged = service(StaticCatalog::empty(2026)).merged_itinerary_result(&record(snapshot));

    let mut keys: Vec<&str> = merged.stays_by_option.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["a", "b"]);
    for section in merged.stays_by_option.values() {
        assert!(section.links.iter().all(|l| l.logo.is_some()));
    }
    for section in merged.flights_by_option.values() {
        assert_eq!(section.title, "Flights");
        assert_eq!(section.links.len(), 3);
    }
}

#[test]
fn legacy_snake_case_date_options_still_drive_the_rebuild() {
    let mut snapshot = stored_snapshot();
    snapshot["dateOptions"] = json!([
        {"key": "opt1", "label": "Jun 2 - Jun 12", "depart_date_iso": "2026-06-02", "return_date_iso": "2026-06-12"}
    ]);

    let merged = service(StaticCatalog::empty(2026)).merged_itinerary_result(&record(snapshot));

    assert_eq!(merged.date_options.len(), 1);
    assert_eq!(merged.date_options[0].depart_date_iso, "2026-06-02");
    let booking = &merged.stays_by_option["opt1"].links[0];
    assert!(booking.href.contains("checkin=2026-06-02"));
    assert!(booking.href.contains("checkout=2026-06-12"));
}

#[test]
fn unresolvable_date_options_are_skipped_not_fatal() {
    let mut snapshot = stored_snapshot();
    snapshot["dateOptions"] = json!([
        {"key": "good", "label": "Jun 2 - Jun 12", "departDateISO": "2026-06-02", "returnDateISO": "2026-06-12"},
        {"key": "bad", "label": "no dates here"}
    ]);

    let merged = service(StaticCatalog::empty(2026)).merged_itinerary_result(&record(snapshot));

    assert_eq!(merged.date_options.len(), 1);
    assert!(merged.flights_by_option.contains_key("good"));
    assert!(!merged.flights_by_option.contains_key("bad"));
}

#[test]
fn garbage_stored_date_strings_do_not_panic_the_rebuild() {
    // Dates that resolve as strings but hold multi-byte garbage still
    // flow into link building; the rebuild must degrade, not panic.
    let mut snapshot = stored_snapshot();
    snapshot["dateOptions"] = json!([
        {
            "key": "opt1",
            "label": "???",
            "departDateISO": "\u{20ac}\u{20ac}\u{20ac}\u{20ac}",
            "returnDateISO": "\u{20ac}\u{20ac}\u{20ac}\u{20ac}"
        }
    ]);

    let merged = service(StaticCatalog::empty(2026)).merged_itinerary_result(&record(snapshot));

    let flights = &merged.flights_by_option["opt1"];
    assert_eq!(flights.links.len(), 3);
    assert!(!flights.links[0].href.contains("departure="));
}

#[test]
fn live_catalog_race_refreshes_tickets_section() {
    let mut live = monaco();
    live.official_tickets_url = Some("https://tickets.formula1.com/en/f1-monaco".to_string());
    let merged = service(StaticCatalog::new(2026, vec![live]))
        .merged_itinerary_result(&record(stored_snapshot()));

    assert_eq!(merged.tickets.title, "Race Tickets");
    assert_eq!(merged.tickets.links[0].label, "Official F1 Tickets");
}

#[test]
fn catalog_miss_keeps_stored_tickets() {
    let mut snapshot = stored_snapshot();
    snapshot["tickets"] = json!({
        "title": "Race Tickets",
        "links": [{"label": "Old Link", "href": "https://example.com/old"}]
    });

    let merged = service(StaticCatalog::empty(2026)).merged_itinerary_result(&record(snapshot));

    assert_eq!(merged.tickets.links.len(), 1);
    assert_eq!(merged.tickets.links[0].label, "Old Link");
}

#[test]
fn snapshot_without_request_passes_sections_through() {
    let mut snapshot = stored_snapshot();
    snapshot.as_object_mut().unwrap().remove("request");
    snapshot["flightsByOption"] = json!({
        "opt1": {
            "title": "Flights",
            "links": [{"label": "Stored Link", "href": "https://example.com/stored"}]
        }
    });

    let merged = service(StaticCatalog::empty(2026)).merged_itinerary_result(&record(snapshot));

    // No rebuild possible: stored sections survive untouched and the
    // request is synthesized from the record columns.
    assert_eq!(merged.flights_by_option["opt1"].links[0].label, "Stored Link");
    assert_eq!(merged.request.origin_city, "Tokyo");
    assert_eq!(merged.request.duration_days, 10);
}

#[test]
fn snapshot_without_date_options_regenerates_from_live_race() {
    let mut snapshot = stored_snapshot();
    snapshot["dateOptions"] = json!([]);
    snapshot["flightsByOption"] = json!({});
    snapshot["staysByOption"] = json!({});

    let merged =
        service(StaticCatalog::new(2026, vec![monaco()])).merged_itinerary_result(&record(snapshot));

    assert_eq!(merged.date_options.len(), 3);
    // 10-day trip around the 2026-06-07 race: option A departs Jun 3.
    assert_eq!(merged.date_options[0].key, "A");
    assert_eq!(merged.date_options[0].depart_date_iso, "2026-06-03");
    assert_eq!(merged.date_options[0].return_date_iso, "2026-06-13");
    assert_eq!(merged.flights_by_option.len(), 3);
    assert_eq!(merged.stays_by_option.len(), 3);
}

#[test]
fn stored_race_year_selects_the_catalog_season() {
    let mut snapshot = stored_snapshot();
    snapshot["race"]["raceDateISO"] = json!("2027-06-06");
    snapshot["dateOptions"] = json!([]);
    snapshot["flightsByOption"] = json!({});

    // Catalog only knows 2026, so a 2027 snapshot misses and passes
    // its stored (empty) sections through.
    let merged =
        service(StaticCatalog::new(2026, vec![monaco()])).merged_itinerary_result(&record(snapshot));
    assert!(merged.flights_by_option.is_empty());
}

#[tokio::test]
async fn flight_prices_without_credentials_leave_links_unpriced() {
    let merged_service = service(StaticCatalog::new(2026, vec![monaco()]));
    let flights = merged_service
        .flight_prices_for_itinerary(&record(stored_snapshot()))
        .await;

    assert_eq!(flights.len(), 1);
    let section = &flights["opt1"];
    assert_eq!(section.links.len(), 3);
    // Placeholder prices are never written onto links.
    assert!(section.links.iter().all(|l| l.from_price.is_none()));
}

#[tokio::test]
async fn flight_prices_for_request_covers_all_generated_options() {
    let merged_service = service(StaticCatalog::empty(2026));
    let request = paddock_core::trip::TripRequest {
        origin_city: "London".to_string(),
        race_id: "monaco-gp".to_string(),
        duration_days: 5,
        budget_tier: paddock_core::trip::BudgetTier::Mid,
    };

    let flights = merged_service
        .flight_prices_for_request(&request, &monaco())
        .await;

    assert_eq!(flights.len(), 3);
    for key in ["A", "B", "C"] {
        assert_eq!(flights[key].title, "Flights");
        assert_eq!(flights[key].links[0].label, "Google Flights");
    }
}

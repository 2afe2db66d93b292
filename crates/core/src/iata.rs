//! IATA airport-code resolution for deep links and price lookups.
//!
//! Free-text origin cities and race destination cities map to the
//! nearest major airport. A miss is `None`, never an error: callers
//! fall back to city-name links when no code is available.

use crate::race::RaceWeekend;

/// Normalize a city name for table lookup: trim, lowercase, collapse
/// internal whitespace to single spaces.
pub fn normalize_city(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a free-text origin city to an IATA code. Retries with the
/// pre-comma prefix so "San Francisco, USA" matches "san francisco".
pub fn origin_iata(origin_city: &str) -> Option<&'static str> {
    let key = normalize_city(origin_city);
    if let Some(code) = origin_city_code(&key) {
        return Some(code);
    }
    let prefix = key.split(',').next()?.trim();
    if prefix.is_empty() || prefix == key {
        return None;
    }
    origin_city_code(prefix)
}

/// Resolve a race destination to an IATA code: prefer the catalog's
/// `airportCode`, else fall back to the race-city table (covers old
/// stored snapshots that predate the field).
pub fn dest_iata(race: &RaceWeekend) -> Option<String> {
    if let Some(code) = race.airport_code.as_deref() {
        if !code.trim().is_empty() {
            return Some(code.trim().to_string());
        }
    }
    race_city_code(&normalize_city(&race.city)).map(str::to_string)
}

/// Common origin cities, normalized name to nearest major airport.
fn origin_city_code(key: &str) -> Option<&'static str> {
    let code = match key {
        "san francisco" => "SFO",
        "new york" | "new york city" => "JFK",
        "los angeles" => "LAX",
        "london" => "LHR",
        "chicago" => "ORD",
        "miami" => "MIA",
        "austin" => "AUS",
        "las vegas" => "LAS",
        "houston" => "IAH",
        "boston" => "BOS",
        "seattle" => "SEA",
        "washington" | "washington dc" => "IAD",
        "dallas" => "DFW",
        "denver" => "DEN",
        "atlanta" => "ATL",
        "phoenix" => "PHX",
        "philadelphia" => "PHL",
        "toronto" => "YYZ",
        "vancouver" => "YVR",
        "montreal" => "YUL",
        "sydney" => "SYD",
        "melbourne" => "MEL",
        "singapore" => "SIN",
        "tokyo" => "NRT",
        "dubai" => "DXB",
        "abu dhabi" => "AUH",
        "paris" => "CDG",
        "amsterdam" => "AMS",
        "frankfurt" => "FRA",
        "barcelona" => "BCN",
        "madrid" => "MAD",
        "rome" => "FCO",
        "milan" => "MXP",
        "munich" => "MUC",
        "zurich" => "ZRH",
        "mexico city" => "MEX",
        "s\u{e3}o paulo" | "sao paulo" => "GRU",
        "chennai" => "MAA",
        "mumbai" => "BOM",
        "delhi" => "DEL",
        "bangalore" => "BLR",
        "hyderabad" => "HYD",
        "kolkata" => "CCU",
        "dublin" => "DUB",
        "brussels" => "BRU",
        "vienna" => "VIE",
        "lisbon" => "LIS",
        "stockholm" => "ARN",
        "copenhagen" => "CPH",
        "oslo" => "OSL",
        "helsinki" => "HEL",
        "warsaw" => "WAW",
        "prague" => "PRG",
        "istanbul" => "IST",
        "hong kong" => "HKG",
        "seoul" => "ICN",
        "beijing" => "PEK",
        "kuala lumpur" => "KUL",
        "bangkok" => "BKK",
        "jakarta" => "CGK",
        "manila" => "MNL",
        "perth" => "PER",
        "brisbane" => "BNE",
        "auckland" => "AKL",
        "johannesburg" => "JNB",
        "cape town" => "CPT",
        "cairo" => "CAI",
        "tel aviv" => "TLV",
        "riyadh" => "RUH",
        "doha" => "DOH",
        _ => return None,
    };
    Some(code)
}

/// Race cities on the calendar, normalized name to nearest airport.
fn race_city_code(key: &str) -> Option<&'static str> {
    let code = match key {
        "melbourne" => "MEL",
        "shanghai" => "PVG",
        "suzuka" => "NGO",
        "sakhir" => "BAH",
        "jeddah" => "JED",
        "miami" => "MIA",
        "montreal" => "YUL",
        "monte carlo" => "NCE",
        "barcelona" => "BCN",
        "spielberg" => "GRZ",
        "silverstone" => "LHR",
        "spa" => "CRL",
        "budapest" => "BUD",
        "zandvoort" => "AMS",
        "monza" => "MXP",
        "madrid" => "MAD",
        "baku" => "GYD",
        "singapore" => "SIN",
        "austin" => "AUS",
        "mexico city" => "MEX",
        "s\u{e3}o paulo" | "sao paulo" => "GRU",
        "las vegas" => "LAS",
        "lusail" => "DOH",
        "abu dhabi" => "AUH",
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race(city: &str, airport_code: Option<&str>) -> RaceWeekend {
        RaceWeekend {
            id: "test".to_string(),
            name: "Test GP".to_string(),
            circuit: "Test Circuit".to_string(),
            city: city.to_string(),
            country: "XX".to_string(),
            airport_code: airport_code.map(str::to_string),
            race_date_iso: "2026-06-07".to_string(),
            official_tickets_url: None,
            other_tickets_url: None,
            ticket_options: None,
            experience_options: None,
        }
    }

    #[test]
    fn origin_lookup_is_case_and_whitespace_insensitive() {
        assert_eq!(origin_iata("London"), Some("LHR"));
        assert_eq!(origin_iata("  LONDON  "), Some("LHR"));
        assert_eq!(origin_iata("San   Francisco"), Some("SFO"));
    }

    #[test]
    fn origin_lookup_strips_country_suffix() {
        assert_eq!(origin_iata("London, UK"), Some("LHR"));
        assert_eq!(origin_iata("San Francisco, USA"), Some("SFO"));
    }

    #[test]
    fn unknown_origin_is_none() {
        assert_eq!(origin_iata("Nowhereville"), None);
        assert_eq!(origin_iata(""), None);
        assert_eq!(origin_iata(", UK"), None);
    }

    #[test]
    fn dest_prefers_airport_code() {
        assert_eq!(race_city_code("suzuka"), Some("NGO"));
        assert_eq!(dest_iata(&race("Suzuka", Some("NGO"))).as_deref(), Some("NGO"));
        assert_eq!(dest_iata(&race("Suzuka", Some("KIX"))).as_deref(), Some("KIX"));
    }

    #[test]
    fn dest_falls_back_to_race_city_table() {
        assert_eq!(dest_iata(&race("Monte Carlo", None)).as_deref(), Some("NCE"));
        assert_eq!(dest_iata(&race("MONTE  CARLO", None)).as_deref(), Some("NCE"));
    }

    #[test]
    fn blank_airport_code_falls_through() {
        assert_eq!(dest_iata(&race("Monza", Some("  "))).as_deref(), Some("MXP"));
    }

    #[test]
    fn unknown_destination_is_none() {
        assert_eq!(dest_iata(&race("Nowhere", None)), None);
    }
}

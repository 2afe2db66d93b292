//! Short-lived in-memory cache of generated results, keyed by
//! itinerary id. Lets the itinerary page render immediately after
//! generation without refetching; entries expire fast because the
//! merge service is the source of truth on every later view.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use paddock_core::trip::ItineraryResult;

pub struct ResultCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, ItineraryResult)>>,
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, id: &str, result: ItineraryResult) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(id.to_string(), (Instant::now(), result));
        }
    }

    /// Cached result for an id, or `None` when absent or expired.
    /// Expired entries are dropped on access.
    pub fn get(&self, id: &str) -> Option<ItineraryResult> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(id) {
            Some((inserted, result)) if inserted.elapsed() < self.ttl => Some(result.clone()),
            Some(_) => {
                entries.remove(id);
                None
            }
            None => None,
        }
    }

    /// Drop one entry (after the merged view has been served).
    pub fn clear(&self, id: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_core::itinerary::build_itinerary;
    use paddock_core::links::LinkBuilder;
    use paddock_core::race::RaceWeekend;
    use paddock_core::trip::{BudgetTier, TripRequest};

    fn result() -> ItineraryResult {
        let race = RaceWeekend {
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
        };
        let request = TripRequest {
            origin_city: "London".to_string(),
            race_id: "monaco-gp".to_string(),
            duration_days: 5,
            budget_tier: BudgetTier::Mid,
        };
        build_itinerary(&LinkBuilder::default(), &request, &race)
    }

    #[test]
    fn insert_then_get_returns_the_result() {
        let cache = ResultCache::new(Duration::from_secs(60));
        cache.insert("itin-1", result());
        assert!(cache.get("itin-1").is_some());
        assert!(cache.get("itin-2").is_none());
    }

    #[test]
    fn clear_removes_the_entry() {
        let cache = ResultCache::new(Duration::from_secs(60));
        cache.insert("itin-1", result());
        cache.clear("itin-1");
        assert!(cache.get("itin-1").is_none());
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = ResultCache::new(Duration::ZERO);
        cache.insert("itin-1", result());
        assert!(cache.get("itin-1").is_none());
    }
}

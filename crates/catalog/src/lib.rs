//! Race calendar catalog.
//!
//! The catalog is the only place the application reads race data from.
//! The interface stays stable so the file-backed season data can be
//! replaced by a database or external API without touching domain
//! logic. Curated ticket/experience content is edited out-of-band, so
//! the file-backed implementation re-reads on every lookup — existing
//! itineraries must see current data without a redeploy.

use std::fs;
use std::path::PathBuf;

use paddock_core::race::RaceWeekend;

/// Read access to the annual race calendar. A miss is `None`, never an
/// error: races are removed from the catalog between seasons and the
/// merge service degrades gracefully when that happens.
pub trait RaceCatalog: Send + Sync {
    /// All races for a season, sorted by race date ascending. Empty
    /// for unsupported years.
    fn list_races(&self, year: i32) -> Vec<RaceWeekend>;

    /// A single race by id for a season.
    fn race_by_id(&self, year: i32, race_id: &str) -> Option<RaceWeekend> {
        self.list_races(year)
            .into_iter()
            .find(|race| race.id == race_id)
    }
}

/// File-backed catalog for one season. Reads the season JSON fresh on
/// every lookup and falls back to the snapshot loaded at construction
/// when the file is unreadable (e.g. in some serverless environments).
pub struct FsRaceCatalog {
    year: i32,
    path: PathBuf,
    fallback: Vec<RaceWeekend>,
}

impl FsRaceCatalog {
    /// Create a catalog for `year` backed by the JSON file at `path`.
    /// The file is read once eagerly to seed the fallback snapshot.
    pub fn new(year: i32, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let fallback = read_races_file(&path).unwrap_or_default();
        Self {
            year,
            path,
            fallback,
        }
    }

    fn read_fresh(&self) -> Vec<RaceWeekend> {
        match read_races_file(&self.path) {
            Some(races) => races,
            None => {
                tracing::debug!(path = %self.path.display(), "season file unreadable, using fallback snapshot");
                self.fallback.clone()
            }
        }
    }
}

fn read_races_file(path: &std::path::Path) -> Option<Vec<RaceWeekend>> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str::<Vec<RaceWeekend>>(&raw).ok()
}

fn sorted_by_date(mut races: Vec<RaceWeekend>) -> Vec<RaceWeekend> {
    races.sort_by(|a, b| a.race_date_iso.cmp(&b.race_date_iso));
    races
}

impl RaceCatalog for FsRaceCatalog {
    fn list_races(&self, year: i32) -> Vec<RaceWeekend> {
        if year != self.year {
            return Vec::new();
        }
        sorted_by_date(self.read_fresh())
    }

    fn race_by_id(&self, year: i32, race_id: &str) -> Option<RaceWeekend> {
        if year != self.year {
            return None;
        }
        self.read_fresh().into_iter().find(|race| race.id == race_id)
    }
}

/// In-memory catalog, used in tests and for embedding a fixed season.
pub struct StaticCatalog {
    year: i32,
    races: Vec<RaceWeekend>,
}

impl StaticCatalog {
    pub fn new(year: i32, races: Vec<RaceWeekend>) -> Self {
        Self { year, races }
    }

    /// Catalog with no races at all (every lookup misses).
    pub fn empty(year: i32) -> Self {
        Self::new(year, Vec::new())
    }
}

impl RaceCatalog for StaticCatalog {
    fn list_races(&self, year: i32) -> Vec<RaceWeekend> {
        if year != self.year {
            return Vec::new();
        }
        sorted_by_date(self.races.clone())
    }
}

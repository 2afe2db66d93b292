//! Itinerary services: flight price enrichment, persisted-record decoding,
//! merge-with-live-data, generation, and a small in-memory result cache.
//!
//! Everything here composes the pure domain logic in `paddock-core` with the
//! collaborators that own I/O: `paddock-catalog` for race data and
//! `paddock-amadeus` for live flight offers.

pub mod cache;
pub mod generate;
pub mod merge;
pub mod prices;
pub mod record;

/// Season assumed for records persisted before the race year was stored
/// alongside the result.
pub const DEFAULT_SEASON: i32 = 2026;

//! Pure domain logic for race-weekend trip planning.
//!
//! Everything in this crate is synchronous, deterministic, and free of
//! I/O: date-window derivation, provider deep-link construction, IATA
//! resolution, currency conversion, and the itinerary builder that
//! composes them. Services (pricing, merge, persistence) live in the
//! sibling crates and call into this one.

pub mod booking;
pub mod currency;
pub mod dates;
pub mod error;
pub mod iata;
pub mod itinerary;
pub mod links;
pub mod race;
pub mod trip;

//! Amadeus Flight Offers Search client.
//!
//! Thin typed wrapper over the Amadeus Self-Service HTTP API using
//! [`reqwest`]: OAuth2 client-credentials token exchange plus the
//! flight-offers search endpoint. Only the input/output contract
//! matters to the rest of the workspace; retry policy and degradation
//! to placeholder prices live in the service layer.

pub mod client;
pub mod models;

pub use client::{AmadeusClient, AmadeusConfig, AmadeusError};
pub use models::{FlightOffer, OfferItinerary, OfferPrice, OfferSegment, SegmentPoint};

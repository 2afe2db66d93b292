//! Domain-level error type.
//!
//! Only trip-request validation and a missing race produce hard
//! failures in this crate; every other degraded input (unknown IATA
//! mapping, malformed stored data, unparsable URLs) resolves to a
//! documented fallback value instead of an error.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

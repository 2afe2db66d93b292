//! Itinerary generation: validate, look up the race, build, persist.

use async_trait::async_trait;

use paddock_catalog::RaceCatalog;
use paddock_core::error::CoreError;
use paddock_core::itinerary::build_itinerary;
use paddock_core::links::LinkBuilder;
use paddock_core::trip::{ItineraryResult, TripRequest};

use crate::DEFAULT_SEASON;

/// Write access to itinerary persistence. Implemented by the storage
/// layer; tests use an in-memory stand-in.
#[async_trait]
pub trait ItineraryStore: Send + Sync {
    /// Persist a freshly generated itinerary and return its id.
    async fn create_itinerary(
        &self,
        user_id: &str,
        request: &TripRequest,
        result: &ItineraryResult,
    ) -> Result<String, CoreError>;
}

#[derive(Debug, Clone)]
pub struct GenerateOutput {
    pub itinerary_id: String,
    pub result: ItineraryResult,
}

/// Validate the request, resolve the race, build the itinerary, and
/// persist it. Validation failures and unknown races surface as
/// [`CoreError::Validation`] and [`CoreError::NotFound`].
pub async fn generate_and_save(
    store: &dyn ItineraryStore,
    catalog: &dyn RaceCatalog,
    links: &LinkBuilder,
    user_id: &str,
    request: &TripRequest,
) -> Result<GenerateOutput, CoreError> {
    request.check()?;

    let race = catalog
        .race_by_id(DEFAULT_SEASON, &request.race_id)
        .ok_or_else(|| CoreError::NotFound {
            entity: "race",
            id: request.race_id.clone(),
        })?;

    let result = build_itinerary(links, request, &race);
    let itinerary_id = store.create_itinerary(user_id, request, &result).await?;

    tracing::info!(
        itinerary_id = %itinerary_id,
        race_id = %request.race_id,
        "itinerary generated"
    );

    Ok(GenerateOutput {
        itinerary_id,
        result,
    })
}

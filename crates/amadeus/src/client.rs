//! HTTP client for the Amadeus Self-Service endpoints.

use serde::Deserialize;

use crate::models::{summarize_errors, FlightOffer, OffersResponse};

/// Default base URL. Self-Service credentials are typically issued for
/// the TEST environment; production is opt-in via configuration.
const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";

/// Connection settings for the pricing collaborator. Credentials are
/// optional: without them the service layer skips the API entirely and
/// serves placeholder prices.
#[derive(Debug, Clone, Default)]
pub struct AmadeusConfig {
    /// Base URL override; trailing slashes are trimmed.
    pub base_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Errors from the Amadeus REST layer.
#[derive(Debug, thiserror::Error)]
pub enum AmadeusError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Amadeus API error ({status}): {summary}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Flattened upstream error summary for debugging.
        summary: String,
    },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Client for one Amadeus environment.
pub struct AmadeusClient {
    client: reqwest::Client,
    base_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl AmadeusClient {
    pub fn new(config: AmadeusConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling
    /// across services).
    pub fn with_client(client: reqwest::Client, config: AmadeusConfig) -> Self {
        let base_url = config
            .base_url
            .as_deref()
            .map(|raw| raw.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            client,
            base_url,
            client_id: config.client_id.filter(|s| !s.trim().is_empty()),
            client_secret: config.client_secret.filter(|s| !s.trim().is_empty()),
        }
    }

    /// True when client credentials are configured.
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Obtain an OAuth2 access token via the client-credentials grant.
    ///
    /// Returns `Ok(None)` when credentials are not configured — the
    /// caller is expected to fall back to placeholder pricing, not to
    /// treat this as a failure.
    pub async fn fetch_token(&self) -> Result<Option<String>, AmadeusError> {
        let (Some(client_id), Some(client_secret)) = (&self.client_id, &self.client_secret)
        else {
            tracing::debug!("amadeus credentials not configured, skipping token exchange");
            return Ok(None);
        };

        let response = self
            .client
            .post(format!("{}/v1/security/oauth2/token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AmadeusError::Api {
                status: status.as_u16(),
                summary: body.chars().take(200).collect(),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Search fare offers for one route and date pair. Pass
    /// `return_date: None` for a one-way search. Offers come back in
    /// the API's ranking order; price selection is the caller's job.
    pub async fn flight_offers(
        &self,
        origin_iata: &str,
        dest_iata: &str,
        departure_date: &str,
        return_date: Option<&str>,
        access_token: &str,
    ) -> Result<Vec<FlightOffer>, AmadeusError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("originLocationCode", origin_iata),
            ("destinationLocationCode", dest_iata),
            ("departureDate", departure_date),
            ("adults", "1"),
        ];
        if let Some(ret) = return_date {
            query.push(("returnDate", ret));
        }

        let response = self
            .client
            .get(format!("{}/v2/shopping/flight-offers", self.base_url))
            .query(&query)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let parsed: Option<OffersResponse> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let summary = parsed
                .as_ref()
                .map(summarize_errors)
                .unwrap_or_else(|| text.chars().take(200).collect());
            return Err(AmadeusError::Api {
                status: status.as_u16(),
                summary,
            });
        }

        Ok(parsed.and_then(|p| p.data).unwrap_or_default())
    }
}

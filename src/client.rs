// HTTP implementation of the collaborator traits against the trip-planning
// REST backend. The backend wraps every response in a {code, msg, data}
// envelope where code 1 means success.
use crate::booking::{ItineraryQuoteRequest, QuoteRequestBody};
use crate::providers::{BookingProvider, ProviderError, RouteProvider, TripProvider};
use crate::records::{BookingItem, DayAgenda, RouteSummary, TripContext};
use crate::timeline::RouteQuery;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            auth_token: None,
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    code: i32,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

pub struct BackendClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: ClientConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(Self { config, http })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.config.auth_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<T, ProviderError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        debug!(path, status = status.as_u16(), "backend response");
        if status.as_u16() == 401 {
            return Err(ProviderError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        if envelope.code != 1 {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: envelope.msg,
            });
        }
        envelope
            .data
            .ok_or_else(|| ProviderError::Decode("missing data in response envelope".to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        self.send(self.request(reqwest::Method::GET, path), path)
            .await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ProviderError> {
        self.send(self.request(reqwest::Method::POST, path).json(body), path)
            .await
    }
}

#[async_trait]
impl TripProvider for BackendClient {
    async fn trip_detail(&self, trip_id: i64) -> Result<TripContext, ProviderError> {
        self.get(&format!("/api/trip/{}/detail", trip_id)).await
    }

    async fn trip_timeline(&self, trip_id: i64) -> Result<Vec<DayAgenda>, ProviderError> {
        self.get(&format!("/api/trip/{}/timeline", trip_id)).await
    }
}

#[async_trait]
impl BookingProvider for BackendClient {
    async fn booking_items(&self, trip_id: i64) -> Result<Vec<BookingItem>, ProviderError> {
        self.get(&format!("/api/booking?tripId={}", trip_id)).await
    }

    async fn confirm_item(&self, request: &QuoteRequestBody) -> Result<(), ProviderError> {
        // The quote endpoints report success through the envelope only.
        let _: serde_json::Value = self.post("/api/booking/quote", request).await?;
        Ok(())
    }

    async fn confirm_itinerary(
        &self,
        request: &ItineraryQuoteRequest,
    ) -> Result<(), ProviderError> {
        let _: serde_json::Value = self.post("/api/booking/itinerary/quote", request).await?;
        Ok(())
    }
}

#[async_trait]
impl RouteProvider for BackendClient {
    async fn resolve_route(&self, query: &RouteQuery) -> Result<RouteSummary, ProviderError> {
        self.post("/api/map/route", query).await
    }
}

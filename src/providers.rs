// Collaborator boundary: the trip, booking and map backends the core talks
// to. The synthesizer and reconciler never call these themselves; they only
// shape the requests these traits accept.
use crate::booking::{ItineraryQuoteRequest, QuoteRequestBody};
use crate::records::{BookingItem, DayAgenda, RouteSummary, TripContext};
use crate::timeline::RouteQuery;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Decode error: {0}")]
    Decode(String),
}

// Supplies trip context and the per-day agendas the synthesizer consumes.
#[async_trait]
pub trait TripProvider: Send + Sync + 'static {
    async fn trip_detail(&self, trip_id: i64) -> Result<TripContext, ProviderError>;

    async fn trip_timeline(&self, trip_id: i64) -> Result<Vec<DayAgenda>, ProviderError>;
}

// Supplies booking items and accepts the confirmation requests the
// reconciler builds. Both confirm calls are fire-and-report; the resulting
// state shows up on the next fetch.
#[async_trait]
pub trait BookingProvider: Send + Sync + 'static {
    async fn booking_items(&self, trip_id: i64) -> Result<Vec<BookingItem>, ProviderError>;

    async fn confirm_item(&self, request: &QuoteRequestBody) -> Result<(), ProviderError>;

    async fn confirm_itinerary(
        &self,
        request: &ItineraryQuoteRequest,
    ) -> Result<(), ProviderError>;
}

// Resolves a derived route query into a navigable route summary. Invoked
// lazily, only when a caller acts on a query, never by the synthesizer.
#[async_trait]
pub trait RouteProvider: Send + Sync + 'static {
    async fn resolve_route(&self, query: &RouteQuery) -> Result<RouteSummary, ProviderError>;
}

// Core library for the AI trip assistant client

pub mod booking;
pub mod client;
pub mod confirmation;
pub mod memory;
pub mod providers;
pub mod records;
pub mod timeline;

// Re-export key types for convenience
pub use booking::{
    BookingReconciler, BookingStatus, ItineraryQuoteRequest, ItineraryQuoteRequestItem,
    QuoteRequestBody, DEFAULT_CURRENCY,
};
pub use client::{BackendClient, ClientConfig};
pub use confirmation::{BatchOutcome, ConfirmOutcome, ConfirmationCoordinator};
pub use memory::InMemoryBookingProvider;
pub use providers::{BookingProvider, ProviderError, RouteProvider, TripProvider};
pub use records::{BookingItem, DayAgenda, QuotePayload, QuoteSummary, RouteSummary, TripContext};
pub use timeline::{
    ActivityCategory, DayTimeline, RouteQuery, TimelineEntry, TimelineSynthesizer, TravelMode,
};

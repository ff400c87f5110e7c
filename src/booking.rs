// Booking reconciliation: classifies a trip's booking items into
// pending/settled and builds single-item or itinerary-wide confirmation
// requests. Pure with respect to its inputs; the actual confirmation call is
// the booking provider's job.
use crate::records::{BookingItem, QuotePayload};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Fallback when no currency signal exists on any pending item.
pub const DEFAULT_CURRENCY: &str = "AUD";

// Itinerary identifiers derive deterministically from the trip id so the
// backend can treat retried batches idempotently.
pub const ITINERARY_ID_PREFIX: &str = "iti_";

// Canonical view of the free-form status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Failed,
    Other,
}

pub fn canonical_status(status: &str) -> BookingStatus {
    match status.to_lowercase().as_str() {
        "confirm" | "confirmed" => BookingStatus::Confirmed,
        "pending" => BookingStatus::Pending,
        "failed" => BookingStatus::Failed,
        _ => BookingStatus::Other,
    }
}

// Wire body for a single-item quote/confirm request. Fields are snake_case
// on the wire; the payload is forwarded verbatim from the item.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QuoteRequestBody {
    pub product_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub party_size: u32,
    pub params: BTreeMap<String, serde_json::Value>,
    pub trip_id: i64,
    pub entity_id: i64,
    pub item_reference: String,
}

impl From<&QuotePayload> for QuoteRequestBody {
    fn from(payload: &QuotePayload) -> Self {
        Self {
            product_type: payload.product_type.clone(),
            currency: payload.currency.clone(),
            party_size: payload.party_size,
            params: payload.params.clone(),
            trip_id: payload.trip_id,
            entity_id: payload.entity_id,
            item_reference: payload.item_reference.clone(),
        }
    }
}

// Wire body for an itinerary-wide ("confirm all") quote request.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ItineraryQuoteRequest {
    pub itinerary_id: String,
    pub currency: String,
    pub items: Vec<ItineraryQuoteRequestItem>,
    pub trip_id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ItineraryQuoteRequestItem {
    pub reference: String,
    pub product_type: String,
    pub party_size: u32,
    pub params: BTreeMap<String, serde_json::Value>,
    pub entity_id: i64,
}

// Stateless reconciler. Re-running any of these after a server-side status
// flip excludes the now-confirmed items without special-casing.
pub struct BookingReconciler;

impl BookingReconciler {
    pub fn new() -> Self {
        Self
    }

    // An item is pending iff reservation is required (absence defaults to
    // required) and its canonical status has not reached confirmed. This is
    // the single rule behind both pending counts and batch membership.
    pub fn is_pending(&self, item: &BookingItem) -> bool {
        item.reservation_required.unwrap_or(true)
            && canonical_status(&item.status) != BookingStatus::Confirmed
    }

    pub fn pending_count(&self, items: &[BookingItem]) -> usize {
        items.iter().filter(|item| self.is_pending(item)).count()
    }

    // Split an item set into (pending, settled), preserving input order.
    pub fn partition<'a>(
        &self,
        items: &'a [BookingItem],
    ) -> (Vec<&'a BookingItem>, Vec<&'a BookingItem>) {
        items.iter().partition(|item| self.is_pending(item))
    }

    // Build the confirm request for one item. Items without a quote payload
    // cannot be confirmed; the caller disables the action instead of erroring.
    pub fn single_confirmation(&self, item: &BookingItem) -> Option<QuoteRequestBody> {
        item.quote_request.as_ref().map(QuoteRequestBody::from)
    }

    // Build one itinerary-wide request covering every pending, confirmable
    // item. Returns None when nothing qualifies, before any network call.
    pub fn batch_confirmation(
        &self,
        trip_id: i64,
        items: &[BookingItem],
    ) -> Option<ItineraryQuoteRequest> {
        let confirmable: Vec<(&BookingItem, &QuotePayload)> = items
            .iter()
            .filter(|item| self.is_pending(item))
            .filter_map(|item| item.quote_request.as_ref().map(|payload| (item, payload)))
            .collect();

        if confirmable.is_empty() {
            return None;
        }

        // One currency governs the whole batch: first quote-level signal in
        // scan order, then first item-level signal, then the fixed default.
        let currency = confirmable
            .iter()
            .find_map(|(_, payload)| payload.currency.clone().filter(|c| !c.is_empty()))
            .or_else(|| {
                confirmable
                    .iter()
                    .find_map(|(item, _)| item.currency.clone().filter(|c| !c.is_empty()))
            })
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let batch_items = confirmable
            .iter()
            .map(|(_, payload)| ItineraryQuoteRequestItem {
                reference: payload.item_reference.clone(),
                product_type: payload.product_type.clone(),
                party_size: payload.party_size,
                params: payload.params.clone(),
                entity_id: payload.entity_id,
            })
            .collect();

        Some(ItineraryQuoteRequest {
            itinerary_id: format!("{}{}", ITINERARY_ID_PREFIX, trip_id),
            currency,
            items: batch_items,
            trip_id,
        })
    }
}

impl Default for BookingReconciler {
    fn default() -> Self {
        Self::new()
    }
}

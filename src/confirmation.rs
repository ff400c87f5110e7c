// Caller-side confirmation flow: owns the "at most one in-flight
// confirmation per entity id" set and drives a booking provider with the
// requests the reconciler builds. The reconciler itself stays stateless.
use crate::booking::BookingReconciler;
use crate::providers::{BookingProvider, ProviderError};
use crate::records::BookingItem;
use dashmap::DashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    // The provider accepted the confirmation request.
    Requested,
    // A confirmation for this entity id is already in flight; the request is
    // ignored, never queued.
    AlreadyInFlight,
    // The item carries no quote payload and cannot be confirmed.
    Unconfirmable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    // An itinerary-wide request covering this many items was accepted.
    Requested(usize),
    // No pending confirmable items; nothing was sent.
    NothingPending,
}

pub struct ConfirmationCoordinator<P> {
    provider: P,
    reconciler: BookingReconciler,
    in_flight: DashMap<i64, ()>,
}

impl<P: BookingProvider> ConfirmationCoordinator<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            reconciler: BookingReconciler::new(),
            in_flight: DashMap::new(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    // Pending count for display, computed with the same rule that governs
    // batch membership.
    pub async fn pending_count(&self, trip_id: i64) -> Result<usize, ProviderError> {
        let items = self.provider.booking_items(trip_id).await?;
        Ok(self.reconciler.pending_count(&items))
    }

    // Confirm one item. Rejects (without queueing) when a confirmation for
    // the same entity id is still in flight.
    pub async fn confirm_item(&self, item: &BookingItem) -> Result<ConfirmOutcome, ProviderError> {
        let Some(body) = self.reconciler.single_confirmation(item) else {
            debug!(entity_id = item.entity_id, "item has no quote payload, skipping");
            return Ok(ConfirmOutcome::Unconfirmable);
        };

        if self.in_flight.insert(item.entity_id, ()).is_some() {
            warn!(entity_id = item.entity_id, "confirmation already in flight, ignoring");
            return Ok(ConfirmOutcome::AlreadyInFlight);
        }

        let result = self.provider.confirm_item(&body).await;
        self.in_flight.remove(&item.entity_id);

        result.map(|()| {
            info!(
                entity_id = item.entity_id,
                reference = %body.item_reference,
                "booking confirmation requested"
            );
            ConfirmOutcome::Requested
        })
    }

    // Confirm every pending confirmable item of a trip in one batch. Fetches
    // a fresh snapshot first so already-confirmed items drop out.
    pub async fn confirm_all(&self, trip_id: i64) -> Result<BatchOutcome, ProviderError> {
        let items = self.provider.booking_items(trip_id).await?;
        let Some(batch) = self.reconciler.batch_confirmation(trip_id, &items) else {
            debug!(trip_id, "no pending confirmable items");
            return Ok(BatchOutcome::NothingPending);
        };

        let submitted = batch.items.len();
        self.provider.confirm_itinerary(&batch).await?;
        info!(
            trip_id,
            submitted,
            itinerary_id = %batch.itinerary_id,
            "itinerary confirmation requested"
        );
        Ok(BatchOutcome::Requested(submitted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBookingProvider;
    use crate::records::{BookingItem, QuotePayload};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn pending_item(trip_id: i64, entity_id: i64) -> BookingItem {
        BookingItem {
            entity_id,
            trip_id,
            product_type: "hotel".to_string(),
            status: "pending".to_string(),
            quote_request: Some(QuotePayload {
                product_type: "hotel".to_string(),
                currency: Some("EUR".to_string()),
                party_size: 2,
                params: BTreeMap::new(),
                trip_id,
                entity_id,
                item_reference: format!("hotel-{}", entity_id),
            }),
            ..BookingItem::default()
        }
    }

    #[tokio::test]
    async fn test_confirm_all_then_noop() {
        let provider = InMemoryBookingProvider::new(vec![
            pending_item(7, 1),
            pending_item(7, 2),
        ]);
        let coordinator = ConfirmationCoordinator::new(provider);

        assert_eq!(coordinator.pending_count(7).await.unwrap(), 2);
        assert_eq!(
            coordinator.confirm_all(7).await.unwrap(),
            BatchOutcome::Requested(2)
        );

        // The provider flipped both items to confirmed; the next batch is a
        // no-op and the pending count agrees.
        assert_eq!(
            coordinator.confirm_all(7).await.unwrap(),
            BatchOutcome::NothingPending
        );
        assert_eq!(coordinator.pending_count(7).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_confirm_item_flips_status() {
        let provider = InMemoryBookingProvider::new(vec![pending_item(7, 1)]);
        let coordinator = ConfirmationCoordinator::new(provider);

        let item = pending_item(7, 1);
        assert_eq!(
            coordinator.confirm_item(&item).await.unwrap(),
            ConfirmOutcome::Requested
        );

        let items = coordinator.provider().booking_items(7).await.unwrap();
        assert_eq!(items[0].status, "confirmed");
        assert!(items[0].quote_summary.as_ref().unwrap().voucher_code.is_some());
    }

    #[tokio::test]
    async fn test_unconfirmable_item_is_skipped() {
        let provider = InMemoryBookingProvider::new(vec![]);
        let coordinator = ConfirmationCoordinator::new(provider);

        let mut item = pending_item(7, 1);
        item.quote_request = None;
        assert_eq!(
            coordinator.confirm_item(&item).await.unwrap(),
            ConfirmOutcome::Unconfirmable
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_confirmations_for_same_entity_are_rejected() {
        let provider = InMemoryBookingProvider::new(vec![pending_item(7, 1)]);
        provider.set_delay_ms(50);
        let coordinator = Arc::new(ConfirmationCoordinator::new(provider));

        let item = pending_item(7, 1);
        let first = {
            let coordinator = Arc::clone(&coordinator);
            let item = item.clone();
            tokio::spawn(async move { coordinator.confirm_item(&item).await.unwrap() })
        };
        // Give the first task a head start so it holds the in-flight slot.
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let second = coordinator.confirm_item(&item).await.unwrap();

        assert_eq!(second, ConfirmOutcome::AlreadyInFlight);
        assert_eq!(first.await.unwrap(), ConfirmOutcome::Requested);
    }

    #[tokio::test]
    async fn test_provider_failure_propagates_and_releases_slot() {
        let provider = InMemoryBookingProvider::new(vec![pending_item(7, 1)]);
        provider.fail_next_requests(1);
        let coordinator = ConfirmationCoordinator::new(provider);

        let item = pending_item(7, 1);
        assert!(coordinator.confirm_item(&item).await.is_err());

        // The in-flight slot was released; a retry goes through.
        assert_eq!(
            coordinator.confirm_item(&item).await.unwrap(),
            ConfirmOutcome::Requested
        );
    }
}

// In-memory booking provider for tests and fixtures. Confirming an item
// flips its status to "confirmed" and stamps a voucher code, the same state
// transition the real backend reports on the next fetch.
use crate::booking::{ItineraryQuoteRequest, QuoteRequestBody};
use crate::providers::{BookingProvider, ProviderError};
use crate::records::{BookingItem, QuoteSummary};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

pub struct InMemoryBookingProvider {
    items: Mutex<Vec<BookingItem>>,
    delay_ms: AtomicU64,
    fail_next_requests: AtomicUsize,
}

impl InMemoryBookingProvider {
    pub fn new(items: Vec<BookingItem>) -> Self {
        Self {
            items: Mutex::new(items),
            delay_ms: AtomicU64::new(0),
            fail_next_requests: AtomicUsize::new(0),
        }
    }

    // Simulated confirmation latency, for exercising in-flight handling.
    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    // Fail the next N confirm calls with a server error.
    pub fn fail_next_requests(&self, count: usize) {
        self.fail_next_requests.store(count, Ordering::SeqCst);
    }

    async fn simulate_call(&self) -> Result<(), ProviderError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let fail_count = self.fail_next_requests.load(Ordering::SeqCst);
        if fail_count > 0 {
            self.fail_next_requests.store(fail_count - 1, Ordering::SeqCst);
            return Err(ProviderError::Api {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }

    fn mark_confirmed(item: &mut BookingItem, voucher_code: &str) {
        item.status = "confirmed".to_string();
        item.quote_summary = Some(QuoteSummary {
            voucher_code: Some(voucher_code.to_string()),
            status: Some("confirmed".to_string()),
            ..QuoteSummary::default()
        });
    }

    fn voucher_code() -> String {
        format!("VCH{}", rand::random::<u32>())
    }
}

#[async_trait]
impl BookingProvider for InMemoryBookingProvider {
    async fn booking_items(&self, trip_id: i64) -> Result<Vec<BookingItem>, ProviderError> {
        Ok(self
            .items
            .lock()
            .iter()
            .filter(|item| item.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn confirm_item(&self, request: &QuoteRequestBody) -> Result<(), ProviderError> {
        self.simulate_call().await?;
        let mut items = self.items.lock();
        let item = items
            .iter_mut()
            .find(|item| item.entity_id == request.entity_id)
            .ok_or_else(|| ProviderError::Api {
                status: 404,
                message: format!("unknown entity {}", request.entity_id),
            })?;
        Self::mark_confirmed(item, &Self::voucher_code());
        Ok(())
    }

    async fn confirm_itinerary(
        &self,
        request: &ItineraryQuoteRequest,
    ) -> Result<(), ProviderError> {
        self.simulate_call().await?;
        // One voucher covers the whole itinerary, as the backend reports it.
        let voucher = Self::voucher_code();
        let mut items = self.items.lock();
        for batch_item in &request.items {
            if let Some(item) = items
                .iter_mut()
                .find(|item| item.entity_id == batch_item.entity_id)
            {
                Self::mark_confirmed(item, &voucher);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(trip_id: i64, entity_id: i64, status: &str) -> BookingItem {
        BookingItem {
            entity_id,
            trip_id,
            product_type: "attraction".to_string(),
            status: status.to_string(),
            ..BookingItem::default()
        }
    }

    #[tokio::test]
    async fn test_booking_items_filters_by_trip() {
        let provider = InMemoryBookingProvider::new(vec![
            item(1, 10, "pending"),
            item(2, 20, "pending"),
            item(1, 11, "confirmed"),
        ]);

        let items = provider.booking_items(1).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.trip_id == 1));
    }

    #[tokio::test]
    async fn test_confirm_unknown_entity_is_an_api_error() {
        let provider = InMemoryBookingProvider::new(vec![]);
        let request = QuoteRequestBody {
            product_type: "hotel".to_string(),
            currency: None,
            party_size: 1,
            params: Default::default(),
            trip_id: 1,
            entity_id: 99,
            item_reference: "hotel-99".to_string(),
        };

        let err = provider.confirm_item(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 404, .. }));
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Record shapes exchanged with the trip, booking and map backends.
// The backend serves camelCase JSON for all of these view models.

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TripContext {
    pub trip_id: i64,
    pub from_country: Option<String>,
    pub from_city: Option<String>,
    pub to_country: Option<String>,
    pub to_city: Option<String>,
    pub budget: Option<i64>,
    pub people: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub img_url: Option<String>,
}

// One calendar day of a trip, as served by the timeline endpoint.
// Missing category arrays deserialize as empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DayAgenda {
    pub date: Option<NaiveDate>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub weather: Option<DayWeather>,
    pub lodging: Vec<LodgingActivity>,
    pub attractions: Vec<AttractionActivity>,
    pub transports: Vec<TransportActivity>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DayWeather {
    pub condition: Option<String>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LodgingActivity {
    pub hotel_name: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttractionActivity {
    pub location: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransportActivity {
    pub time: Option<String>,
    pub title: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

// One bookable unit of a trip. `status` is free-form; canonicalization
// happens in the booking module, not here.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingItem {
    pub entity_id: i64,
    pub trip_id: i64,
    pub product_type: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: String,
    pub reservation_required: Option<bool>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
    pub quote_request: Option<QuotePayload>,
    pub quote_summary: Option<QuoteSummary>,
}

// The exact payload needed to (re)request a quote for one item.
// Items without one cannot be confirmed at all.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuotePayload {
    pub product_type: String,
    pub currency: Option<String>,
    pub party_size: u32,
    pub params: BTreeMap<String, serde_json::Value>,
    pub trip_id: i64,
    pub entity_id: i64,
    pub item_reference: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteSummary {
    pub voucher_code: Option<String>,
    pub invoice_id: Option<String>,
    pub status: Option<String>,
    pub currency: Option<String>,
    pub total_amount: Option<i64>,
}

// Route summary returned by the map backend for a resolved route query.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouteSummary {
    pub travel_mode: Option<String>,
    pub route_summary: Option<String>,
    pub distance_text: Option<String>,
    pub distance_meters: Option<i64>,
    pub duration_text: Option<String>,
    pub duration_seconds: Option<i64>,
    pub overview_polyline: Option<String>,
    pub embed_url: Option<String>,
    pub share_url: Option<String>,
    pub warnings: Option<Vec<String>>,
}

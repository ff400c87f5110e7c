// Timeline synthesis: merges a day's lodging, attraction and transport
// records into one chronologically ordered agenda and derives the implicit
// point-to-point route queries between consecutive activities.
use crate::records::{DayAgenda, DayWeather, TripContext};
use chrono::NaiveDate;
use serde::Serialize;

// Fallback labels when a record carries no usable text at all.
pub const FALLBACK_LODGING_LABEL: &str = "Hotel";
pub const FALLBACK_ATTRACTION_LABEL: &str = "Attraction";
pub const FALLBACK_TRANSPORT_LABEL: &str = "Transportation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Lodging,
    Attraction,
    Transport,
}

// Travel modes accepted by the map backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

// A derived origin/destination/mode triple. This is a request descriptor
// only; it is resolved against the map backend by the caller, on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,
    #[serde(rename = "travelMode")]
    pub mode: TravelMode,
}

// One ordered agenda item for a trip day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub category: ActivityCategory,
    pub time: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub route_query: Option<RouteQuery>,
}

// A synthesized day: the ordered entries plus the descriptive metadata the
// agenda arrived with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTimeline {
    pub date: Option<NaiveDate>,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub weather: Option<DayWeather>,
    pub entries: Vec<TimelineEntry>,
}

// Parse a leading "H:MM" / "HH:MM" prefix into minutes since midnight.
// Trailing text is tolerated; anything that does not match degrades to None
// and the record sorts after all timed records.
pub fn parse_leading_time(value: &str) -> Option<u32> {
    let rest = value.trim_start();
    let hour_digits = rest.chars().take_while(char::is_ascii_digit).count();
    if hour_digits == 0 || hour_digits > 2 {
        return None;
    }
    let mut after_hour = rest[hour_digits..].chars();
    if after_hour.next() != Some(':') {
        return None;
    }
    let minute = match (after_hour.next(), after_hour.next()) {
        (Some(tens), Some(units)) if tens.is_ascii_digit() && units.is_ascii_digit() => {
            tens.to_digit(10)? * 10 + units.to_digit(10)?
        }
        _ => return None,
    };
    let hour: u32 = rest[..hour_digits].parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

// A flattened activity, tagged with its category and carrying the hints the
// route-inference pass consumes.
struct FlattenedActivity {
    category: ActivityCategory,
    time: Option<String>,
    minutes: Option<u32>,
    title: String,
    subtitle: Option<String>,
    destination_hint: Option<String>,
    origin_hint: Option<String>,
}

// Stateless synthesizer. Given the same trip context and day agenda it
// always produces the same ordered output.
pub struct TimelineSynthesizer;

impl TimelineSynthesizer {
    pub fn new() -> Self {
        Self
    }

    // Convert one day's three raw category lists into one ordered agenda.
    pub fn synthesize_day(&self, trip: &TripContext, day: &DayAgenda) -> Vec<TimelineEntry> {
        let mut flattened = Vec::new();

        // Canonical traversal order: lodging, attractions, transports. The
        // stable sort below keeps this order for same-time and timeless
        // records.
        for lodging in &day.lodging {
            let title = non_empty(lodging.title.as_ref());
            let name = non_empty(lodging.hotel_name.as_ref());
            let subtitle = match (&title, &name) {
                (Some(t), Some(n)) if t != n => Some(n.clone()),
                _ => None,
            };
            flattened.push(FlattenedActivity {
                category: ActivityCategory::Lodging,
                time: lodging.time.clone(),
                minutes: lodging.time.as_deref().and_then(parse_leading_time),
                title: title
                    .or_else(|| name.clone())
                    .unwrap_or_else(|| FALLBACK_LODGING_LABEL.to_string()),
                subtitle,
                destination_hint: name,
                origin_hint: None,
            });
        }

        for attraction in &day.attractions {
            let title = non_empty(attraction.title.as_ref());
            let location = non_empty(attraction.location.as_ref());
            let subtitle = match (&title, &location) {
                (Some(t), Some(l)) if t != l => Some(l.clone()),
                _ => None,
            };
            flattened.push(FlattenedActivity {
                category: ActivityCategory::Attraction,
                time: attraction.time.clone(),
                minutes: attraction.time.as_deref().and_then(parse_leading_time),
                title: title
                    .or_else(|| location.clone())
                    .unwrap_or_else(|| FALLBACK_ATTRACTION_LABEL.to_string()),
                subtitle,
                destination_hint: location,
                origin_hint: None,
            });
        }

        for transport in &day.transports {
            let from = non_empty(transport.from.as_ref());
            let to = non_empty(transport.to.as_ref());
            let subtitle = match (&from, &to) {
                (Some(f), Some(t)) => Some(format!("{} \u{2192} {}", f, t)),
                (Some(f), None) => Some(f.clone()),
                (None, Some(t)) => Some(t.clone()),
                (None, None) => None,
            };
            flattened.push(FlattenedActivity {
                category: ActivityCategory::Transport,
                time: transport.time.clone(),
                minutes: transport.time.as_deref().and_then(parse_leading_time),
                title: non_empty(transport.title.as_ref())
                    .unwrap_or_else(|| FALLBACK_TRANSPORT_LABEL.to_string()),
                subtitle,
                destination_hint: to,
                origin_hint: from,
            });
        }

        // Stable sort; unparseable times take the maximum key and keep their
        // relative insertion order among themselves.
        flattened.sort_by_key(|activity| activity.minutes.unwrap_or(u32::MAX));

        // Route inference: thread a "current location" cursor through the
        // sorted entries. The cursor seeds from the trip's destination city,
        // then destination country, then origin city.
        let mut cursor = non_empty(trip.to_city.as_ref())
            .or_else(|| non_empty(trip.to_country.as_ref()))
            .or_else(|| non_empty(trip.from_city.as_ref()));

        let mut entries = Vec::with_capacity(flattened.len());
        for activity in flattened {
            let destination = activity
                .destination_hint
                .clone()
                .or_else(|| activity.subtitle.clone())
                .or_else(|| Some(activity.title.clone()))
                .filter(|d| !d.is_empty());
            let origin = activity.origin_hint.clone().or_else(|| cursor.clone());

            let mode = match activity.category {
                ActivityCategory::Transport => TravelMode::Transit,
                _ => TravelMode::Walking,
            };
            let route_query = match (&origin, &destination) {
                (Some(o), Some(d)) if o != d => Some(RouteQuery {
                    origin: o.clone(),
                    destination: d.clone(),
                    mode,
                }),
                _ => None,
            };

            if destination.is_some() {
                cursor = destination;
            } else if origin.is_some() {
                cursor = origin;
            }

            entries.push(TimelineEntry {
                category: activity.category,
                time: activity.time,
                title: activity.title,
                subtitle: activity.subtitle,
                route_query,
            });
        }

        entries
    }

    // Synthesize every day of a trip, carrying each day's metadata alongside
    // its ordered entries.
    pub fn synthesize_trip(&self, trip: &TripContext, days: &[DayAgenda]) -> Vec<DayTimeline> {
        days.iter()
            .map(|day| DayTimeline {
                date: day.date,
                summary: day.summary.clone(),
                image_url: day.image_url.clone(),
                weather: day.weather.clone(),
                entries: self.synthesize_day(trip, day),
            })
            .collect()
    }
}

impl Default for TimelineSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A persisted itinerary row. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Itinerary {
    pub id: i64,
    pub user_request: String,
    pub destination: String,
    pub travel_dates: String,
    pub traveler_count: i32,
    pub budget: String,
    pub generated_itinerary: String,
    pub created_at: DateTime<Utc>,
}

/// Insert shape: everything the store does not assign itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItinerary {
    pub user_request: String,
    pub destination: String,
    pub travel_dates: String,
    pub traveler_count: i32,
    pub budget: String,
    pub generated_itinerary: String,
}

/// Public JSON shape returned by `GET /get-itinerary/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItineraryView {
    pub id: i64,
    pub destination: String,
    pub dates: String,
    pub travelers: i32,
    pub budget: String,
    pub itinerary: String,
    pub created_at: String,
}

impl From<Itinerary> for ItineraryView {
    fn from(record: Itinerary) -> Self {
        Self {
            id: record.id,
            destination: record.destination,
            dates: record.travel_dates,
            travelers: record.traveler_count,
            budget: record.budget,
            itinerary: record.generated_itinerary,
            created_at: record.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_view_renames_fields_and_formats_timestamp() {
        let record = Itinerary {
            id: 7,
            user_request: "prompt".to_string(),
            destination: "Lisbon".to_string(),
            travel_dates: "2024-09-01 to 2024-09-05".to_string(),
            traveler_count: 3,
            budget: "$2500".to_string(),
            generated_itinerary: "Day 1: Alfama".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        };

        let view = ItineraryView::from(record);
        assert_eq!(view.id, 7);
        assert_eq!(view.dates, "2024-09-01 to 2024-09-05");
        assert_eq!(view.travelers, 3);
        assert_eq!(view.itinerary, "Day 1: Alfama");
        assert_eq!(view.created_at, "2024-05-01T12:30:00.000000Z");
    }
}

//! Placeholder imagery and pricing.
//!
//! Neither provider calls a real service. Both sit behind traits so a real
//! integration can replace them without touching the HTTP handlers.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::prompt::{PriceHints, TripRequest};

/// One image descriptor returned by `GET /get-destination-images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationImage {
    pub url: String,
    pub description: String,
}

pub trait ImageProvider: Send + Sync {
    fn images(&self, destination: &str) -> Vec<DestinationImage>;
}

pub trait PricingProvider: Send + Sync {
    /// Estimated round-trip fare per traveler, in whole dollars.
    fn flight_price(&self, origin: &str, destination: &str, departure: &str, return_date: &str)
        -> i64;

    /// Estimated nightly hotel rate, in whole dollars.
    fn hotel_price(&self, destination: &str, check_in: &str, check_out: &str) -> i64;
}

// ============================================================================
// MockImageProvider
// ============================================================================

const IMAGE_BASE_URL: &str = "https://source.unsplash.com/random/800x600/";

/// Builds three Unsplash "random" URLs tagged `travel`, `city` and `landscape`.
#[derive(Debug, Clone, Default)]
pub struct MockImageProvider;

impl ImageProvider for MockImageProvider {
    fn images(&self, destination: &str) -> Vec<DestinationImage> {
        [
            ("travel", format!("Beautiful view of {}", destination)),
            ("city", format!("Cityscape of {}", destination)),
            ("landscape", format!("Landscape of {}", destination)),
        ]
        .into_iter()
        .map(|(tag, description)| DestinationImage {
            url: format!("{}?{},{}", IMAGE_BASE_URL, destination, tag),
            description,
        })
        .collect()
    }
}

// ============================================================================
// MockPricingProvider
// ============================================================================

const FLIGHT_BASE_PRICE: i64 = 300;
const HOTEL_BASE_PRICE: i64 = 150;

/// Base price plus a hash-derived variation: flights land in [200, 400),
/// hotels in [100, 200).
#[derive(Debug, Clone, Default)]
pub struct MockPricingProvider;

impl PricingProvider for MockPricingProvider {
    fn flight_price(
        &self,
        origin: &str,
        destination: &str,
        departure: &str,
        _return_date: &str,
    ) -> i64 {
        let h = stable_hash(&[origin, destination, departure]);
        FLIGHT_BASE_PRICE + (h % 200) as i64 - 100
    }

    fn hotel_price(&self, destination: &str, check_in: &str, check_out: &str) -> i64 {
        let h = stable_hash(&[destination, check_in, check_out]);
        HOTEL_BASE_PRICE + (h % 100) as i64 - 50
    }
}

/// Price estimates for a trip, as folded into the prompt.
pub fn price_hints(pricing: &dyn PricingProvider, origin: &str, trip: &TripRequest) -> PriceHints {
    PriceHints {
        flight_per_traveler: pricing.flight_price(
            origin,
            &trip.destination,
            &trip.start_date,
            &trip.end_date,
        ),
        hotel_per_night: pricing.hotel_price(&trip.destination, &trip.start_date, &trip.end_date),
    }
}

fn stable_hash(parts: &[&str]) -> u64 {
    let mut hasher = DefaultHasher::new();
    parts.concat().hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_images_mention_destination() {
        let images = MockImageProvider.images("Paris");
        assert_eq!(images.len(), 3);
        for image in &images {
            assert!(image.url.contains("Paris"), "url: {}", image.url);
            assert!(image.description.contains("Paris"));
        }
        assert_eq!(
            images[0].url,
            "https://source.unsplash.com/random/800x600/?Paris,travel"
        );
        assert_eq!(images[1].description, "Cityscape of Paris");
        assert!(images[2].url.ends_with(",landscape"));
    }

    #[test]
    fn test_flight_price_range_and_determinism() {
        let pricing = MockPricingProvider;
        for dest in ["Paris", "Tokyo", "Lima", "Cairo", "Oslo"] {
            let a = pricing.flight_price("NYC", dest, "2024-06-01", "2024-06-07");
            let b = pricing.flight_price("NYC", dest, "2024-06-01", "2024-06-07");
            assert_eq!(a, b);
            assert!((200..400).contains(&a), "flight price out of range: {}", a);
        }
    }

    #[test]
    fn test_hotel_price_range() {
        let pricing = MockPricingProvider;
        for dest in ["Paris", "Tokyo", "Lima", "Cairo", "Oslo"] {
            let p = pricing.hotel_price(dest, "2024-06-01", "2024-06-07");
            assert!((100..200).contains(&p), "hotel price out of range: {}", p);
        }
    }

    #[test]
    fn test_price_hints_use_trip_dates() {
        let trip = TripRequest {
            destination: "Paris".to_string(),
            start_date: "2024-06-01".to_string(),
            end_date: "2024-06-07".to_string(),
            travelers: 2,
            budget: "$3000".to_string(),
            interests: vec![],
        };
        let hints = price_hints(&MockPricingProvider, "NYC", &trip);
        assert_eq!(
            hints.flight_per_traveler,
            MockPricingProvider.flight_price("NYC", "Paris", "2024-06-01", "2024-06-07")
        );
        assert_eq!(
            hints.hotel_per_night,
            MockPricingProvider.hotel_price("Paris", "2024-06-01", "2024-06-07")
        );
    }

    #[test]
    fn test_return_date_does_not_affect_flight_price() {
        let pricing = MockPricingProvider;
        assert_eq!(
            pricing.flight_price("NYC", "Rome", "2024-06-01", "2024-06-07"),
            pricing.flight_price("NYC", "Rome", "2024-06-01", "2024-07-01"),
        );
    }
}

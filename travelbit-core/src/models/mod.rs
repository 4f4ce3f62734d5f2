pub mod itinerary;

pub use itinerary::{Itinerary, ItineraryView, NewItinerary};

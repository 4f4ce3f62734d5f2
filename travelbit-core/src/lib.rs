pub mod completion;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod prompt;
pub mod providers;
pub mod store;

pub use completion::{CompletionBackend, CompletionError, OpenAiCompletionClient};
pub use config::TravelConfig;
pub use error::TravelError;
pub use models::{Itinerary, ItineraryView, NewItinerary};
pub use prompt::{build_prompt, PriceHints, TripRequest, ValidationError, SYSTEM_PROMPT};
pub use providers::{
    DestinationImage, ImageProvider, MockImageProvider, MockPricingProvider, PricingProvider,
};
pub use store::{connect_store, ItineraryStore, MemoryItineraryStore, PgItineraryStore, StoreError};

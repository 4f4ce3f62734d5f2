//! Trip request validation and prompt construction.
//!
//! Everything here is pure: a JSON payload goes in, a typed [`TripRequest`]
//! and a deterministic prompt string come out.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Keys a generate request must carry. A JSON `null` counts as missing.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "destination",
    "start_date",
    "end_date",
    "travelers",
    "budget",
    "interests",
];

/// System instruction sent alongside every prompt.
pub const SYSTEM_PROMPT: &str = "You are an expert travel planner. Create detailed itineraries \
including flights, hotels, activities, and costs. Provide realistic estimates and practical advice.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid value for field '{0}'")]
    InvalidField(&'static str),
}

/// A validated itinerary request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub travelers: i32,
    pub budget: String,
    pub interests: Vec<String>,
}

/// Placeholder price estimates that can be folded into the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceHints {
    pub flight_per_traveler: i64,
    pub hotel_per_night: i64,
}

impl TripRequest {
    /// Validate a raw JSON body. Presence of all six keys is checked before
    /// any type coercion so a missing field always wins over a malformed one.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let obj = payload.as_object().ok_or(ValidationError::MissingFields)?;

        let present = REQUIRED_FIELDS
            .iter()
            .all(|f| obj.get(*f).map(|v| !v.is_null()).unwrap_or(false));
        if !present {
            return Err(ValidationError::MissingFields);
        }

        Ok(Self {
            destination: string_field(obj, "destination")?,
            start_date: string_field(obj, "start_date")?,
            end_date: string_field(obj, "end_date")?,
            travelers: travelers_field(&obj["travelers"])?,
            budget: budget_field(&obj["budget"])?,
            interests: interests_field(&obj["interests"])?,
        })
    }

    /// `"<start> to <end>"`, the stored `travel_dates` value.
    pub fn travel_dates(&self) -> String {
        format!("{} to {}", self.start_date, self.end_date)
    }
}

fn string_field(
    obj: &serde_json::Map<String, Value>,
    name: &'static str,
) -> Result<String, ValidationError> {
    obj[name]
        .as_str()
        .map(str::to_string)
        .ok_or(ValidationError::InvalidField(name))
}

fn travelers_field(value: &Value) -> Result<i32, ValidationError> {
    let invalid = ValidationError::InvalidField("travelers");
    let n = match value {
        Value::Number(n) => n.as_i64().ok_or(invalid.clone())?,
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid.clone())?,
        _ => return Err(invalid),
    };
    i32::try_from(n).map_err(|_| invalid)
}

fn budget_field(value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ValidationError::InvalidField("budget")),
    }
}

fn interests_field(value: &Value) -> Result<Vec<String>, ValidationError> {
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()),
        Value::String(s) => Ok(vec![s.clone()]),
        _ => Err(ValidationError::InvalidField("interests")),
    }
}

/// Build the completion prompt for a validated request.
pub fn build_prompt(request: &TripRequest, hints: Option<&PriceHints>) -> String {
    let mut prompt = format!(
        "Create a detailed travel itinerary with the following details:\n\
         - Destination: {}\n\
         - Travel Dates: {}\n\
         - Number of Travelers: {}\n\
         - Budget: {}\n\
         - Interests: {}\n\
         \n\
         Include:\n\
         1. Flight options with estimated prices\n\
         2. Hotel recommendations with estimated prices\n\
         3. Daily activity schedule\n\
         4. Estimated total cost\n\
         5. Travel tips and recommendations\n\
         \n",
        request.destination,
        request.travel_dates(),
        request.travelers,
        request.budget,
        request.interests.join(", "),
    );

    if let Some(h) = hints {
        prompt.push_str(&format!(
            "Reference prices (placeholder estimates): round-trip flight about ${} per traveler, \
             hotel about ${} per night.\n\n",
            h.flight_per_traveler, h.hotel_per_night
        ));
    }

    prompt.push_str("Make the itinerary detailed and practical.");
    prompt
}

/// Validate a raw payload and build its prompt in one step.
pub fn build_prompt_from_payload(payload: &Value) -> Result<String, ValidationError> {
    let request = TripRequest::from_payload(payload)?;
    Ok(build_prompt(&request, None))
}

//! travelbit-cli: command-line client for the Travelbit itinerary API
//!
//! # Subcommands
//! - `generate --destination <d> --start-date <s> --end-date <e> ...`: request a new itinerary
//! - `show <id> [--json]`: print a stored itinerary
//! - `images <destination> [--json]`: list destination images
//! - `status`: show server health

use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "travelbit-cli",
    version,
    about = "Travelbit itinerary planner, command-line client"
)]
struct Cli {
    /// Travelbit HTTP server URL (overrides TRAVELBIT_URL env var)
    #[arg(long, env = "TRAVELBIT_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a new itinerary
    Generate {
        #[arg(long)]
        destination: String,

        /// First day of the trip (e.g. 2024-06-01)
        #[arg(long)]
        start_date: String,

        /// Last day of the trip (e.g. 2024-06-07)
        #[arg(long)]
        end_date: String,

        #[arg(long, default_value_t = 1)]
        travelers: u32,

        /// Free-form budget, e.g. "$3000"
        #[arg(long)]
        budget: String,

        /// Repeat for several interests
        #[arg(long = "interest")]
        interests: Vec<String>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Show a stored itinerary
    Show {
        id: i64,

        #[arg(long)]
        json: bool,
    },

    /// List placeholder images for a destination
    Images {
        destination: String,

        #[arg(long)]
        json: bool,
    },

    /// Show Travelbit server status
    Status,
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub travelers: u32,
    pub budget: String,
    pub interests: Vec<String>,
}

/// Response from POST /generate-itinerary. `id` is null when the server
/// could not store the itinerary.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub itinerary: String,
    pub id: Option<i64>,
}

/// Response from GET /get-itinerary/{id}
#[derive(Debug, Deserialize)]
pub struct ItineraryResponse {
    pub id: i64,
    pub destination: String,
    pub dates: String,
    pub travelers: i64,
    pub budget: String,
    pub itinerary: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ImagesResponse {
    pub images: Vec<ImageEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ImageEntry {
    pub url: String,
    pub description: String,
}

/// Header line for a stored itinerary, e.g. `#3 Paris: 2024-06-01 to 2024-06-07 • 2 Travelers`.
pub fn format_heading(it: &ItineraryResponse) -> String {
    let noun = if it.travelers > 1 { "Travelers" } else { "Traveler" };
    format!(
        "#{} {}: {} • {} {}",
        it.id, it.destination, it.dates, it.travelers, noun
    )
}

/// Pull `error` out of a JSON error body, falling back to the raw text.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn client(timeout_secs: u64) -> anyhow::Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

fn fail(url: &str, resp: reqwest::blocking::Response) -> ! {
    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    eprintln!(
        "travelbit-cli: {} returned {}: {}",
        url,
        status,
        error_message(&body)
    );
    std::process::exit(1);
}

fn do_generate(server: &str, request: GenerateRequest, json_output: bool) -> anyhow::Result<()> {
    // Generation waits on the completion service; allow it plenty of time.
    let client = client(180)?;
    let url = format!("{}/generate-itinerary", server);

    let resp = match client.post(&url).json(&request).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("travelbit-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    if !resp.status().is_success() {
        fail(&url, resp);
    }

    if json_output {
        let body: serde_json::Value = resp.json()?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let generated: GenerateResponse = resp.json()?;
    match generated.id {
        Some(id) => println!("Itinerary #{} for {}\n", id, request.destination),
        None => println!(
            "Itinerary for {} (not saved on the server)\n",
            request.destination
        ),
    }
    println!("{}", generated.itinerary);
    Ok(())
}

fn do_show(server: &str, id: i64, json_output: bool) -> anyhow::Result<()> {
    let client = client(30)?;
    let url = format!("{}/get-itinerary/{}", server, id);

    let resp = match client.get(&url).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("travelbit-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    if !resp.status().is_success() {
        fail(&url, resp);
    }

    if json_output {
        let body: serde_json::Value = resp.json()?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let it: ItineraryResponse = resp.json()?;
    println!("{}", format_heading(&it));
    println!("Budget:  {}", it.budget);
    println!("Created: {}\n", it.created_at);
    println!("{}", it.itinerary);
    Ok(())
}

fn do_images(server: &str, destination: &str, json_output: bool) -> anyhow::Result<()> {
    let client = client(30)?;
    let url = format!("{}/get-destination-images", server);

    let resp = match client
        .get(&url)
        .query(&[("destination", destination)])
        .send()
    {
        Ok(r) => r,
        Err(e) => {
            eprintln!("travelbit-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    if !resp.status().is_success() {
        fail(&url, resp);
    }

    if json_output {
        let body: serde_json::Value = resp.json()?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let images: ImagesResponse = resp.json()?;
    for image in &images.images {
        println!("{}\n  {}", image.description, image.url);
    }
    Ok(())
}

/// Show the server status by calling GET /health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let client = client(10)?;
    let url = format!("{}/health", server);

    match client.get(&url).send() {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Travelbit server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:          {}", body["version"].as_str().unwrap_or("?"));
            println!("Store:            {}", body["store"].as_str().unwrap_or("?"));
            println!("Completion:       {}", body["completion"].as_str().unwrap_or("?"));
            println!(
                "API key:          {}",
                if body["completion_key_configured"].as_bool().unwrap_or(false) {
                    "configured"
                } else {
                    "missing"
                }
            );
        }
        Ok(r) => {
            eprintln!("travelbit-cli: server unhealthy (HTTP {})", r.status());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("travelbit-cli: cannot reach {}: {}", url, e);
            std::process::exit(1);
        }
    }

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Generate {
            destination,
            start_date,
            end_date,
            travelers,
            budget,
            interests,
            json,
        } => do_generate(
            &server,
            GenerateRequest {
                destination,
                start_date,
                end_date,
                travelers,
                budget,
                interests,
            },
            json,
        ),
        Commands::Show { id, json } => do_show(&server, id, json),
        Commands::Images { destination, json } => do_images(&server, &destination, json),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("travelbit-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Geocoding tool using OpenStreetMap Nominatim.

use std::time::Duration;

use assistant_core::{ParamKind, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::ToolsConfig;
use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Timeout for geocoding requests.
const GEOCODE_TIMEOUT: Duration = Duration::from_secs(15);

/// One place in a Nominatim search response. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Look up coordinates for a place name.
///
/// Shared by the map, directions, and resource tools, which need coordinates
/// before they can do their own work. Exactly one request is made; zero
/// results are a `NotFound`, not an upstream failure.
pub(crate) async fn lookup(
    client: &reqwest::Client,
    config: &ToolsConfig,
    location: &str,
) -> Result<(f64, f64), ToolError> {
    if location.trim().is_empty() {
        return Err(ToolError::InvalidArgument(
            "'location' must not be empty".to_string(),
        ));
    }

    debug!("Geocoding '{}'", location);

    let response = client
        .get(&config.nominatim_url)
        .query(&[("q", location), ("format", "json"), ("limit", "1")])
        .header(reqwest::header::USER_AGENT, config.user_agent())
        .timeout(GEOCODE_TIMEOUT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ToolError::Upstream(format!(
            "geocoding service returned status {}",
            response.status()
        )));
    }

    let places: Vec<NominatimPlace> = response.json().await?;
    parse_places(places, location)
}

/// Extract and validate coordinates from a Nominatim response.
fn parse_places(places: Vec<NominatimPlace>, location: &str) -> Result<(f64, f64), ToolError> {
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| ToolError::NotFound(format!("Location '{}' not found", location)))?;

    let lat: f64 = place.lat.parse().map_err(|_| {
        ToolError::Upstream(format!("unparseable latitude '{}'", place.lat))
    })?;
    let lon: f64 = place.lon.parse().map_err(|_| {
        ToolError::Upstream(format!("unparseable longitude '{}'", place.lon))
    })?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(ToolError::Upstream(format!(
            "coordinates ({}, {}) out of range",
            lat, lon
        )));
    }

    Ok((lat, lon))
}

/// Geocoding tool: place name to coordinates.
///
/// # Parameters
///
/// - `location` (required): Place name or address to look up.
pub struct Geocode {
    client: reqwest::Client,
    config: ToolsConfig,
}

impl Geocode {
    /// Create a new geocoding tool.
    pub fn new(config: ToolsConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }
}

#[async_trait]
impl Tool for Geocode {
    fn name(&self) -> &str {
        "geocode"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "geocode",
            "Convert a place name to latitude/longitude coordinates using OpenStreetMap.",
        )
        .required("location", ParamKind::String, "Place name or address")
    }

    fn fallback_advice(&self) -> &str {
        "Try a broader or differently spelled place name, such as adding the city or country."
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let location = args.require_text("location")?;
        let (lat, lon) = lookup(&self.client, &self.config, &location).await?;

        Ok(ToolOutput::success(format!(
            "Coordinates for '{}': ({:.6}, {:.6})",
            location, lat, lon
        )))
    }
}

//! Turn-by-turn directions tool using the Mapbox Directions API.

use std::time::Duration;

use assistant_core::{ParamKind, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::ToolsConfig;
use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};
use crate::tools::geocode;

/// Timeout for directions requests.
const DIRECTIONS_TIMEOUT: Duration = Duration::from_secs(15);

/// Default transportation mode.
const DEFAULT_MODE: &str = "driving";

/// Modes the Mapbox Directions API accepts.
const VALID_MODES: &[&str] = &["driving", "walking", "cycling"];

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    /// Seconds.
    duration: f64,
    /// Meters.
    distance: f64,
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    /// Meters.
    distance: f64,
    maneuver: Maneuver,
}

#[derive(Debug, Deserialize)]
struct Maneuver {
    instruction: String,
}

/// Directions tool: routes between two named locations.
///
/// # Parameters
///
/// - `origin` (required): Starting location.
/// - `destination` (required): Ending location.
/// - `mode` (optional): "driving", "walking", or "cycling". Default "driving".
pub struct Directions {
    client: reqwest::Client,
    config: ToolsConfig,
}

impl Directions {
    /// Create a new directions tool.
    pub fn new(config: ToolsConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }

    /// Fetch a route between two coordinate pairs.
    async fn fetch_route(
        &self,
        token: &str,
        mode: &str,
        origin: (f64, f64),
        destination: (f64, f64),
    ) -> Result<DirectionsResponse, ToolError> {
        // Mapbox wants lon,lat ordering.
        let url = format!(
            "https://api.mapbox.com/directions/v5/mapbox/{}/{},{};{},{}",
            mode, origin.1, origin.0, destination.1, destination.0
        );

        debug!("Fetching directions ({})", mode);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("access_token", token),
                ("steps", "true"),
                ("geometries", "geojson"),
                ("overview", "full"),
            ])
            .timeout(DIRECTIONS_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ToolError::Upstream(format!(
                "directions service returned status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

/// Format the first route as the tool's text block.
fn format_route(origin: &str, destination: &str, mode: &str, route: &Route) -> String {
    let distance_km = route.distance / 1000.0;
    let duration_min = route.duration / 60.0;

    let mut text = format!(
        "Directions from {} to {} ({})\n\
         Distance: {:.1} km\n\
         Duration: {:.0} minutes\n\n\
         Steps:\n",
        origin, destination, mode, distance_km, duration_min
    );

    let mut step_number = 0;
    for leg in &route.legs {
        for step in &leg.steps {
            step_number += 1;
            text.push_str(&format!(
                "{}. {} ({:.0} m)\n",
                step_number, step.maneuver.instruction, step.distance
            ));
        }
    }

    text
}

#[async_trait]
impl Tool for Directions {
    fn name(&self) -> &str {
        "directions"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "directions",
            "Get turn-by-turn directions between two locations.",
        )
        .required("origin", ParamKind::String, "Starting location")
        .required("destination", ParamKind::String, "Ending location")
        .optional(
            "mode",
            ParamKind::String,
            json!(DEFAULT_MODE),
            "Transportation mode: driving, walking, or cycling",
        )
    }

    fn fallback_advice(&self) -> &str {
        "Search for the route in any maps app, or ask a local for directions."
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let origin = args.require_text("origin")?;
        let destination = args.require_text("destination")?;
        let mode = args.get_string_or("mode", DEFAULT_MODE).to_lowercase();

        if !VALID_MODES.contains(&mode.as_str()) {
            return Err(ToolError::InvalidParameter {
                name: "mode".to_string(),
                reason: format!("expected one of driving/walking/cycling, got '{}'", mode),
            });
        }

        let token = match self.config.mapbox_token.as_deref() {
            Some(token) => token,
            None => {
                warn!("directions invoked without a Mapbox token");
                return Ok(ToolOutput::failure(
                    "Directions are unavailable: no Mapbox access token is configured. \
                     You can look up the route in any maps app instead.",
                ));
            }
        };

        let origin_coords = geocode::lookup(&self.client, &self.config, &origin).await?;
        let destination_coords =
            geocode::lookup(&self.client, &self.config, &destination).await?;

        let response = self
            .fetch_route(token, &mode, origin_coords, destination_coords)
            .await?;

        let route = response.routes.first().ok_or_else(|| {
            ToolError::NotFound(format!(
                "No route found between {} and {}",
                origin, destination
            ))
        })?;

        Ok(ToolOutput::success(format_route(
            &origin,
            &destination,
            &mode,
            route,
        )))
    }
}

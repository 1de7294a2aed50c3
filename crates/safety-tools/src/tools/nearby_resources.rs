//! Emergency resources lookup: numbers per country, plus map coordinates.

use assistant_core::{ParamKind, ToolSchema};
use async_trait::async_trait;
use tracing::debug;

use crate::config::ToolsConfig;
use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};
use crate::tools::geocode;

/// Emergency numbers by country, lowercase keys.
const EMERGENCY_NUMBERS: &[(&str, &str)] = &[
    ("ghana", "112 or 191 (Police), 193 (Fire/Ambulance)"),
    ("nigeria", "199 (Police), 112 (Emergency)"),
    ("south africa", "10111 (Police), 10177 (Ambulance)"),
    ("kenya", "999 or 112"),
    ("united states", "911"),
    ("canada", "911"),
    ("united kingdom", "999 or 112"),
    ("australia", "000"),
    ("new zealand", "111"),
];

/// Number used when no country matches.
const DEFAULT_NUMBER: &str = "112 (International Emergency)";

/// Match a location string to emergency numbers by substring.
fn emergency_numbers_for(location: &str) -> &'static str {
    let lowered = location.to_lowercase();
    EMERGENCY_NUMBERS
        .iter()
        .find(|(country, _)| lowered.contains(country))
        .map(|(_, numbers)| *numbers)
        .unwrap_or(DEFAULT_NUMBER)
}

/// Nearby emergency resources tool.
///
/// Resolves the location's coordinates when it can, but a failed lookup
/// only drops the coordinate line; the emergency numbers always come back.
///
/// # Parameters
///
/// - `location` (required): City or area, ideally with the country.
pub struct NearbyResources {
    client: reqwest::Client,
    config: ToolsConfig,
}

impl NearbyResources {
    /// Create a new resources tool.
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
impl Tool for NearbyResources {
    fn name(&self) -> &str {
        "nearby_resources"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "nearby_resources",
            "Find emergency numbers and nearby safety resources for a location.",
        )
        .required(
            "location",
            ParamKind::String,
            "City or area, ideally including the country",
        )
    }

    fn fallback_advice(&self) -> &str {
        "Dial 112, which connects to emergency services in most countries."
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let location = args.require_text("location")?;
        let numbers = emergency_numbers_for(&location);

        let coords_line = match geocode::lookup(&self.client, &self.config, &location).await {
            Ok((lat, lon)) => format!(
                "\nArea center: ({:.4}, {:.4}) - use this in a maps app to find \
                 the nearest police station or hospital.",
                lat, lon
            ),
            Err(e) => {
                debug!("Coordinate lookup for resources failed: {}", e);
                String::new()
            }
        };

        Ok(ToolOutput::success(format!(
            "Emergency resources for {}:\n\
             Emergency numbers: {}{}\n\
             If you are in immediate danger, call the emergency number first.",
            location, numbers, coords_line
        )))
    }
}

//! Approximate current location via IP geolocation.

use std::time::Duration;

use assistant_core::ToolSchema;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// IP geolocation endpoint (keyless).
const IP_API_URL: &str = "http://ip-api.com/json/";

/// Timeout for IP geolocation requests.
const IP_TIMEOUT: Duration = Duration::from_secs(10);

/// Response from ip-api.com. The `status` field gates success.
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(rename = "regionName", default)]
    region_name: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// Current-location tool using IP geolocation. Takes no parameters.
pub struct CurrentLocation {
    client: reqwest::Client,
}

impl CurrentLocation {
    /// Create a new current-location tool.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

impl Default for CurrentLocation {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a successful geolocation response.
fn format_location(response: &IpApiResponse) -> String {
    let unknown = "Unknown".to_string();
    format!(
        "Approximate current location (from IP address):\n\
         City: {}\n\
         Region: {}\n\
         Country: {}\n\
         Coordinates: ({:.4}, {:.4})\n\
         Note: IP geolocation is approximate. For precise positioning, use the device's GPS.",
        response.city.as_ref().unwrap_or(&unknown),
        response.region_name.as_ref().unwrap_or(&unknown),
        response.country.as_ref().unwrap_or(&unknown),
        response.lat.unwrap_or(0.0),
        response.lon.unwrap_or(0.0),
    )
}

#[async_trait]
impl Tool for CurrentLocation {
    fn name(&self) -> &str {
        "current_location"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "current_location",
            "Detect the user's approximate current location from their IP address.",
        )
    }

    fn fallback_advice(&self) -> &str {
        "Please tell me your location manually (city or address) so I can help."
    }

    async fn execute(&self, _args: ToolArgs) -> Result<ToolOutput, ToolError> {
        debug!("Detecting current location via IP");

        let response = self
            .client
            .get(IP_API_URL)
            .timeout(IP_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ToolError::Upstream(format!(
                "IP geolocation service returned status {}",
                response.status()
            )));
        }

        let body: IpApiResponse = response.json().await?;

        if body.status != "success" {
            return Err(ToolError::Upstream(
                "IP geolocation lookup did not succeed".to_string(),
            ));
        }

        Ok(ToolOutput::success(format_location(&body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_location() {
        let response = IpApiResponse {
            status: "success".to_string(),
            city: Some("Accra".to_string()),
            region_name: Some("Greater Accra".to_string()),
            country: Some("Ghana".to_string()),
            lat: Some(5.55602),
            lon: Some(-0.1969),
        };

        let text = format_location(&response);
        assert!(text.contains("City: Accra"));
        assert!(text.contains("Country: Ghana"));
        assert!(text.contains("(5.5560, -0.1969)"));
    }

    #[test]
    fn test_format_location_missing_fields() {
        let response = IpApiResponse {
            status: "success".to_string(),
            city: None,
            region_name: None,
            country: None,
            lat: None,
            lon: None,
        };

        let text = format_location(&response);
        assert!(text.contains("City: Unknown"));
    }

    #[test]
    fn test_failure_status_deserializes() {
        let body = r#"{"status": "fail", "message": "private range"}"#;
        let parsed: IpApiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, "fail");
        assert!(parsed.city.is_none());
    }

    // Integration test that requires network access.
    #[tokio::test]
    #[ignore]
    async fn test_current_location_live() {
        let tool = CurrentLocation::new();
        let output = tool.execute(ToolArgs::default()).await.unwrap();
        assert!(output.success);
        assert!(output.content.contains("Coordinates"));
    }
}

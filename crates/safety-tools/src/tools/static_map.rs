//! Satellite map tool using the Mapbox Static Images API.

use std::path::PathBuf;
use std::time::Duration;

use assistant_core::{ParamKind, ToolSchema};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::ToolsConfig;
use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};
use crate::tools::{geocode, random_hex, unix_seconds};

/// Timeout for map image fetches (larger than other calls; the body is an image).
const MAP_TIMEOUT: Duration = Duration::from_secs(20);

/// Default zoom level.
const DEFAULT_ZOOM: u32 = 16;

/// Default image size.
const DEFAULT_SIZE: &str = "600x400";

/// Satellite map tool: writes a PNG for a location and returns its path.
///
/// The image body is fully buffered and checked (HTTP 200 plus an image
/// content-type) before anything touches the filesystem, so a failed fetch
/// never leaves a partial file. Filenames carry a time + random suffix so
/// concurrent sessions writing into the same data directory cannot collide.
///
/// # Parameters
///
/// - `location` (required): Place name to map.
/// - `zoom` (optional): Zoom level, default 16.
/// - `size` (optional): "WxH" in pixels, default "600x400".
pub struct StaticMap {
    client: reqwest::Client,
    config: ToolsConfig,
}

impl StaticMap {
    /// Create a new map tool.
    pub fn new(config: ToolsConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }

    /// Fetch the map image bytes for validated inputs.
    async fn fetch_image(
        &self,
        token: &str,
        lat: f64,
        lon: f64,
        zoom: u32,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ToolError> {
        let url = format!(
            "https://api.mapbox.com/styles/v1/mapbox/satellite-v9/static/\
             pin-s+ff0000({lon},{lat})/{lon},{lat},{zoom}/{width}x{height}@2x"
        );

        debug!("Fetching map image: zoom={}, size={}x{}", zoom, width, height);

        let response = self
            .client
            .get(&url)
            .query(&[("access_token", token)])
            .timeout(MAP_TIMEOUT)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(ToolError::Upstream(format!(
                "map service returned status {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        let bytes = response.bytes().await?.to_vec();
        validate_image_body(&content_type, &bytes)?;
        Ok(bytes)
    }
}

/// Reject non-image or empty responses before anything touches the
/// filesystem.
fn validate_image_body(content_type: &str, bytes: &[u8]) -> Result<(), ToolError> {
    if !content_type.contains("image") {
        return Err(ToolError::Upstream(format!(
            "expected an image, got content-type '{}'",
            content_type
        )));
    }
    if bytes.is_empty() {
        return Err(ToolError::Upstream(
            "map service returned an empty image body".to_string(),
        ));
    }
    Ok(())
}

/// Parse a "WxH" size string.
fn parse_size(size: &str) -> Result<(u32, u32), ToolError> {
    let invalid = || ToolError::InvalidParameter {
        name: "size".to_string(),
        reason: format!("expected WxH like 600x400, got '{}'", size),
    };

    let (width, height) = size.split_once('x').ok_or_else(invalid)?;
    let width: u32 = width.trim().parse().map_err(|_| invalid())?;
    let height: u32 = height.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

/// Unique map filename: time plus random suffix.
fn map_filename() -> String {
    format!("satellite_map_{}_{}.png", unix_seconds(), random_hex(6))
}

#[async_trait]
impl Tool for StaticMap {
    fn name(&self) -> &str {
        "static_map"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            "static_map",
            "Generate a satellite map image of a location and return the image file path.",
        )
        .required("location", ParamKind::String, "Place name to map")
        .optional("zoom", ParamKind::Integer, json!(DEFAULT_ZOOM), "Zoom level")
        .optional(
            "size",
            ParamKind::String,
            json!(DEFAULT_SIZE),
            "Image size as WxH in pixels",
        )
    }

    fn fallback_advice(&self) -> &str {
        "Describe the area in words instead, or open the location in any maps app."
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let location = args.require_text("location")?;
        let zoom = args.get_u32_or("zoom", DEFAULT_ZOOM)?;
        let size = args.get_string_or("size", DEFAULT_SIZE);
        let (width, height) = parse_size(&size)?;

        let token = match self.config.mapbox_token.as_deref() {
            Some(token) => token,
            None => {
                warn!("static_map invoked without a Mapbox token");
                return Ok(ToolOutput::failure(
                    "Satellite maps are unavailable: no Mapbox access token is configured. \
                     You can view the location in any maps app instead.",
                ));
            }
        };

        let (lat, lon) = geocode::lookup(&self.client, &self.config, &location).await?;
        let bytes = self.fetch_image(token, lat, lon, zoom, width, height).await?;

        tokio::fs::create_dir_all(&self.config.data_dir).await?;
        let path: PathBuf = self.config.data_dir.join(map_filename());
        tokio::fs::write(&path, &bytes).await?;

        debug!("Wrote map image {} ({} bytes)", path.display(), bytes.len());

        Ok(ToolOutput::success(format!(
            "Satellite map of '{}' saved to {} ({} bytes)",
            location,
            path.display(),
            bytes.len()
        ))
        .with_artifact(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use serde_json::Value;

    fn make_args(location: &str) -> ToolArgs {
        let mut params = HashMap::new();
        params.insert("location".to_string(), Value::String(location.to_string()));
        ToolArgs::new(params)
    }

    #[tokio::test]
    async fn test_blank_location_rejected() {
        let tool = StaticMap::new(ToolsConfig::default());
        let result = tool.execute(make_args(" ")).await;
        assert!(matches!(result, Err(ToolError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_missing_token_degrades_without_a_path() {
        let tool = StaticMap::new(ToolsConfig::default());
        let output = tool.execute(make_args("Accra")).await.unwrap();

        assert!(!output.success);
        assert!(output.artifact_path.is_none());
        assert!(output.content.contains("no Mapbox access token"));
        // The error string must not claim a file was written.
        assert!(!output.content.contains(".png"));
    }

    #[tokio::test]
    async fn test_bad_size_rejected() {
        let config = ToolsConfig::builder().mapbox_token("pk.test").build();
        let tool = StaticMap::new(config);

        let mut params = HashMap::new();
        params.insert("location".to_string(), Value::String("Accra".to_string()));
        params.insert("size".to_string(), Value::String("banana".to_string()));

        let result = tool.execute(ToolArgs::new(params)).await;
        assert!(matches!(
            result,
            Err(ToolError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("600x400").unwrap(), (600, 400));
        assert_eq!(parse_size("1280x720").unwrap(), (1280, 720));
        assert!(parse_size("600").is_err());
        assert!(parse_size("0x400").is_err());
        assert!(parse_size("x").is_err());
    }

    #[test]
    fn test_validate_image_body() {
        assert!(validate_image_body("image/png", b"\x89PNG").is_ok());
        assert!(validate_image_body("image/jpeg; charset=binary", b"x").is_ok());

        // A 200 with an empty body must not reach the filesystem.
        assert!(matches!(
            validate_image_body("image/png", b""),
            Err(ToolError::Upstream(_))
        ));
        assert!(matches!(
            validate_image_body("text/html", b"<html>rate limited</html>"),
            Err(ToolError::Upstream(_))
        ));
    }

    #[test]
    fn test_map_filenames_unique() {
        assert_ne!(map_filename(), map_filename());
        assert!(map_filename().starts_with("satellite_map_"));
        assert!(map_filename().ends_with(".png"));
    }

    // Integration test that requires network access and a real token.
    #[tokio::test]
    #[ignore]
    async fn test_static_map_live() {
        dotenvy::dotenv().ok();
        let config = ToolsConfig::from_env();
        let dir = tempfile::tempdir().unwrap();
        let config = ToolsConfig::builder()
            .mapbox_token(config.mapbox_token.unwrap())
            .data_dir(dir.path())
            .build();

        let tool = StaticMap::new(config);
        let output = tool.execute(make_args("Times Square, New York")).await.unwrap();
        assert!(output.success);

        let path = output.artifact_path.unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}

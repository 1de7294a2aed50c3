//! Configuration for the tool layer.
//!
//! All configuration is read from the environment exactly once at startup
//! into an explicit struct passed to every tool. Tool logic never reads
//! ambient environment state. Every value here is optional: a missing key
//! degrades the corresponding tool to its fallback path rather than failing
//! startup.

use std::env;
use std::path::PathBuf;

/// Default Nominatim search endpoint.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Default contact email used in the identifying User-Agent.
pub const DEFAULT_CONTACT_EMAIL: &str = "safety-assistant@example.com";

/// Default directory for generated map images and case records.
pub const DEFAULT_DATA_DIR: &str = "tmp";

/// Twilio SMS credentials. All four values are required for SMS to be
/// attempted; otherwise case notifications fall back to a local file write.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Account SID.
    pub account_sid: String,
    /// Auth token.
    pub auth_token: String,
    /// Sending phone number.
    pub from_number: String,
    /// Receiving phone number for case notifications.
    pub to_number: String,
}

/// Configuration shared by all tools.
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// Nominatim geocoding endpoint.
    pub nominatim_url: String,

    /// Mapbox access token. When absent, map and directions tools degrade
    /// to fallback text.
    pub mapbox_token: Option<String>,

    /// Twilio credentials. When absent, SMS notifications degrade to a
    /// local file write.
    pub twilio: Option<TwilioConfig>,

    /// Contact email, embedded in the identifying User-Agent and in case
    /// reports.
    pub contact_email: String,

    /// Directory for generated map images and case records. Concurrent
    /// sessions share it; filenames carry collision-resistant suffixes.
    pub data_dir: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            mapbox_token: None,
            twilio: None,
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl ToolsConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `MAPBOX_ACCESS_TOKEN` - Mapbox token for maps and directions
    /// - `TWILIO_ACCOUNT_SID` / `TWILIO_AUTH_TOKEN` / `TWILIO_FROM_NUMBER` /
    ///   `TWILIO_TO_NUMBER` - Twilio SMS credentials (all four or none)
    /// - `CONTACT_EMAIL` - contact email for the User-Agent and case reports
    /// - `ASSISTANT_DATA_DIR` - directory for generated files (default: tmp)
    /// - `NOMINATIM_URL` - geocoding endpoint override
    ///
    /// Nothing here is fatal; missing keys degrade the corresponding tools.
    pub fn from_env() -> Self {
        let twilio = match (
            env::var("TWILIO_ACCOUNT_SID"),
            env::var("TWILIO_AUTH_TOKEN"),
            env::var("TWILIO_FROM_NUMBER"),
            env::var("TWILIO_TO_NUMBER"),
        ) {
            (Ok(account_sid), Ok(auth_token), Ok(from_number), Ok(to_number)) => {
                Some(TwilioConfig {
                    account_sid,
                    auth_token,
                    from_number,
                    to_number,
                })
            }
            _ => None,
        };

        Self {
            nominatim_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| DEFAULT_NOMINATIM_URL.to_string()),
            mapbox_token: env::var("MAPBOX_ACCESS_TOKEN").ok().filter(|t| !t.is_empty()),
            twilio,
            contact_email: env::var("CONTACT_EMAIL")
                .unwrap_or_else(|_| DEFAULT_CONTACT_EMAIL.to_string()),
            data_dir: env::var("ASSISTANT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }

    /// The identifying User-Agent sent to services that require one.
    pub fn user_agent(&self) -> String {
        format!("SafetyAssistant/1.0 ({})", self.contact_email)
    }

    /// Create a new config builder.
    pub fn builder() -> ToolsConfigBuilder {
        ToolsConfigBuilder::default()
    }
}

/// Builder for ToolsConfig.
#[derive(Debug, Default)]
pub struct ToolsConfigBuilder {
    config: ToolsConfig,
}

impl ToolsConfigBuilder {
    /// Set the Nominatim endpoint.
    pub fn nominatim_url(mut self, url: impl Into<String>) -> Self {
        self.config.nominatim_url = url.into();
        self
    }

    /// Set the Mapbox token.
    pub fn mapbox_token(mut self, token: impl Into<String>) -> Self {
        self.config.mapbox_token = Some(token.into());
        self
    }

    /// Set the Twilio credentials.
    pub fn twilio(
        mut self,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
        to_number: impl Into<String>,
    ) -> Self {
        self.config.twilio = Some(TwilioConfig {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
            to_number: to_number.into(),
        });
        self
    }

    /// Set the contact email.
    pub fn contact_email(mut self, email: impl Into<String>) -> Self {
        self.config.contact_email = email.into();
        self
    }

    /// Set the data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = dir.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ToolsConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ToolsConfig::default();

        assert_eq!(config.nominatim_url, DEFAULT_NOMINATIM_URL);
        assert!(config.mapbox_token.is_none());
        assert!(config.twilio.is_none());
        assert_eq!(config.contact_email, DEFAULT_CONTACT_EMAIL);
        assert_eq!(config.data_dir, PathBuf::from("tmp"));
    }

    #[test]
    fn test_user_agent_includes_contact() {
        let config = ToolsConfig::builder()
            .contact_email("ops@example.org")
            .build();

        assert_eq!(config.user_agent(), "SafetyAssistant/1.0 (ops@example.org)");
    }

    #[test]
    fn test_builder_all_options() {
        let config = ToolsConfig::builder()
            .nominatim_url("https://geo.example.com/search")
            .mapbox_token("pk.test")
            .twilio("AC123", "secret", "+15550001111", "+15550002222")
            .contact_email("me@example.com")
            .data_dir("/var/lib/assistant")
            .build();

        assert_eq!(config.nominatim_url, "https://geo.example.com/search");
        assert_eq!(config.mapbox_token.as_deref(), Some("pk.test"));
        let twilio = config.twilio.unwrap();
        assert_eq!(twilio.account_sid, "AC123");
        assert_eq!(twilio.from_number, "+15550001111");
        assert_eq!(twilio.to_number, "+15550002222");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/assistant"));
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_vars() {
            std::env::remove_var("NOMINATIM_URL");
            std::env::remove_var("MAPBOX_ACCESS_TOKEN");
            std::env::remove_var("TWILIO_ACCOUNT_SID");
            std::env::remove_var("TWILIO_AUTH_TOKEN");
            std::env::remove_var("TWILIO_FROM_NUMBER");
            std::env::remove_var("TWILIO_TO_NUMBER");
            std::env::remove_var("CONTACT_EMAIL");
            std::env::remove_var("ASSISTANT_DATA_DIR");
        }

        // Scenario 1: nothing set, defaults used, nothing fatal
        clear_all_vars();
        let config = ToolsConfig::from_env();
        assert!(config.mapbox_token.is_none());
        assert!(config.twilio.is_none());
        assert_eq!(config.contact_email, DEFAULT_CONTACT_EMAIL);

        // Scenario 2: partial Twilio credentials are treated as absent
        clear_all_vars();
        std::env::set_var("TWILIO_ACCOUNT_SID", "AC123");
        let config = ToolsConfig::from_env();
        assert!(config.twilio.is_none());

        // Scenario 3: full Twilio credentials
        clear_all_vars();
        std::env::set_var("TWILIO_ACCOUNT_SID", "AC123");
        std::env::set_var("TWILIO_AUTH_TOKEN", "token");
        std::env::set_var("TWILIO_FROM_NUMBER", "+15550001111");
        std::env::set_var("TWILIO_TO_NUMBER", "+15550002222");
        std::env::set_var("MAPBOX_ACCESS_TOKEN", "pk.live");
        std::env::set_var("ASSISTANT_DATA_DIR", "/tmp/assistant-test");
        let config = ToolsConfig::from_env();
        assert!(config.twilio.is_some());
        assert_eq!(config.mapbox_token.as_deref(), Some("pk.live"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/assistant-test"));

        // Scenario 4: empty Mapbox token is treated as absent
        clear_all_vars();
        std::env::set_var("MAPBOX_ACCESS_TOKEN", "");
        let config = ToolsConfig::from_env();
        assert!(config.mapbox_token.is_none());

        clear_all_vars();
    }
}

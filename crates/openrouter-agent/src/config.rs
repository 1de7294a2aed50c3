//! Configuration for the OpenRouter agent.

use std::env;
use std::path::Path;

use assistant_core::AgentError;

/// Default system prompt file name.
pub const DEFAULT_PROMPT_FILE: &str = "SYSTEM_PROMPT.md";

/// System prompt used when no file or env override is present.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a personal safety assistant. Help users stay safe: assess risks, \
find locations and routes, look up emergency resources, and record incident \
reports. Be calm, concrete, and brief. Use the available tools whenever they \
can answer better than memory. If a situation sounds like an immediate \
emergency, tell the user to call local emergency services first.";

/// Configuration for the OpenRouter agent.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// OpenRouter API URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// System prompt sent as the first message.
    pub system_prompt: String,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum tool-call rounds within a single exchange.
    pub max_tool_rounds: usize,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_url: "https://openrouter.ai/api".to_string(),
            api_key: String::new(),
            model: "google/gemini-2.5-flash".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: Some(3000),
            temperature: Some(0.7),
            max_tool_rounds: 8,
        }
    }
}

impl OpenRouterConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENROUTER_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENROUTER_API_URL` - API URL (default: https://openrouter.ai/api)
    /// - `OPENROUTER_MODEL` - Model name (default: google/gemini-2.5-flash)
    /// - `OPENROUTER_SYSTEM_PROMPT` - System prompt (overrides prompt file)
    /// - `OPENROUTER_PROMPT_FILE` - Path to system prompt file (default: SYSTEM_PROMPT.md)
    /// - `OPENROUTER_MAX_TOKENS` - Max tokens (default: 3000)
    /// - `OPENROUTER_TEMPERATURE` - Temperature (default: 0.7)
    /// - `OPENROUTER_MAX_TOOL_ROUNDS` - Max tool rounds per exchange (default: 8)
    ///
    /// System prompt priority:
    /// 1. `OPENROUTER_SYSTEM_PROMPT` env var (if set)
    /// 2. Contents of prompt file (if exists)
    /// 3. Built-in default
    pub fn from_env() -> Result<Self, AgentError> {
        let api_key = env::var("OPENROUTER_API_KEY")
            .map_err(|_| AgentError::Configuration("OPENROUTER_API_KEY not set".to_string()))?;

        let api_url = env::var("OPENROUTER_API_URL")
            .unwrap_or_else(|_| "https://openrouter.ai/api".to_string());

        let model = env::var("OPENROUTER_MODEL")
            .unwrap_or_else(|_| "google/gemini-2.5-flash".to_string());

        // System prompt: env var takes precedence, then the prompt file
        let system_prompt = if let Ok(prompt) = env::var("OPENROUTER_SYSTEM_PROMPT") {
            prompt
        } else {
            let prompt_file = env::var("OPENROUTER_PROMPT_FILE")
                .unwrap_or_else(|_| DEFAULT_PROMPT_FILE.to_string());
            load_prompt_file(&prompt_file).unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
        };

        let max_tokens = env::var("OPENROUTER_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(3000));

        let temperature = env::var("OPENROUTER_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(0.7));

        let max_tool_rounds = env::var("OPENROUTER_MAX_TOOL_ROUNDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8);

        Ok(Self {
            api_url,
            api_key,
            model,
            system_prompt,
            max_tokens,
            temperature,
            max_tool_rounds,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenRouterConfigBuilder {
        OpenRouterConfigBuilder::default()
    }
}

/// Builder for OpenRouterConfig.
#[derive(Debug, Default)]
pub struct OpenRouterConfigBuilder {
    config: OpenRouterConfig,
}

impl OpenRouterConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the max tool rounds per exchange.
    pub fn max_tool_rounds(mut self, rounds: usize) -> Self {
        self.config.max_tool_rounds = rounds;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenRouterConfig {
        self.config
    }
}

/// Load a prompt file, returning None if not found or empty.
fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();

    match std::fs::read_to_string(path) {
        Ok(content) => {
            let trimmed = content.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenRouterConfig::default();

        assert_eq!(config.api_url, "https://openrouter.ai/api");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "google/gemini-2.5-flash");
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.max_tokens, Some(3000));
        assert_eq!(config.temperature, Some(0.7));
        assert_eq!(config.max_tool_rounds, 8);
    }

    #[test]
    fn test_builder_all_options() {
        let config = OpenRouterConfig::builder()
            .api_key("my-key")
            .api_url("https://custom.api.com")
            .model("anthropic/claude-sonnet-4")
            .system_prompt("You are helpful")
            .max_tokens(512)
            .temperature(0.5)
            .max_tool_rounds(3)
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.api_url, "https://custom.api.com");
        assert_eq!(config.model, "anthropic/claude-sonnet-4");
        assert_eq!(config.system_prompt, "You are helpful");
        assert_eq!(config.max_tokens, Some(512));
        assert_eq!(config.temperature, Some(0.5));
        assert_eq!(config.max_tool_rounds, 3);
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_vars() {
            std::env::remove_var("OPENROUTER_API_KEY");
            std::env::remove_var("OPENROUTER_API_URL");
            std::env::remove_var("OPENROUTER_MODEL");
            std::env::remove_var("OPENROUTER_SYSTEM_PROMPT");
            std::env::remove_var("OPENROUTER_PROMPT_FILE");
            std::env::remove_var("OPENROUTER_MAX_TOKENS");
            std::env::remove_var("OPENROUTER_TEMPERATURE");
            std::env::remove_var("OPENROUTER_MAX_TOOL_ROUNDS");
        }

        // Scenario 1: Missing API key should error
        clear_all_vars();
        let result = OpenRouterConfig::from_env();
        match result {
            Err(AgentError::Configuration(msg)) => {
                assert!(msg.contains("OPENROUTER_API_KEY"));
            }
            other => panic!("Expected Configuration error, got {:?}", other.map(|_| ())),
        }

        // Scenario 2: Only API key set, defaults used
        clear_all_vars();
        std::env::set_var("OPENROUTER_API_KEY", "test-env-key");
        std::env::set_var("OPENROUTER_PROMPT_FILE", "/nonexistent/prompt.md");

        let config = OpenRouterConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.api_url, "https://openrouter.ai/api");
        assert_eq!(config.model, "google/gemini-2.5-flash");
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.max_tool_rounds, 8);

        // Scenario 3: All vars set
        clear_all_vars();
        std::env::set_var("OPENROUTER_API_KEY", "full-test-key");
        std::env::set_var("OPENROUTER_API_URL", "https://test.api.com");
        std::env::set_var("OPENROUTER_MODEL", "openai/gpt-4o-mini");
        std::env::set_var("OPENROUTER_SYSTEM_PROMPT", "Test prompt");
        std::env::set_var("OPENROUTER_MAX_TOKENS", "2048");
        std::env::set_var("OPENROUTER_TEMPERATURE", "0.9");
        std::env::set_var("OPENROUTER_MAX_TOOL_ROUNDS", "2");

        let config = OpenRouterConfig::from_env().unwrap();
        assert_eq!(config.api_key, "full-test-key");
        assert_eq!(config.api_url, "https://test.api.com");
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.system_prompt, "Test prompt");
        assert_eq!(config.max_tokens, Some(2048));
        assert_eq!(config.temperature, Some(0.9));
        assert_eq!(config.max_tool_rounds, 2);

        // Scenario 4: Unparseable numbers fall back to defaults
        clear_all_vars();
        std::env::set_var("OPENROUTER_API_KEY", "test-key");
        std::env::set_var("OPENROUTER_MAX_TOKENS", "lots");
        std::env::set_var("OPENROUTER_MAX_TOOL_ROUNDS", "many");

        let config = OpenRouterConfig::from_env().unwrap();
        assert_eq!(config.max_tokens, Some(3000));
        assert_eq!(config.max_tool_rounds, 8);

        clear_all_vars();
    }
}

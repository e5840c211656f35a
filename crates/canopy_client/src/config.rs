//! Client configuration.
//!
//! Built once at process start and passed by reference into the session; no
//! module-level mutable state.

pub const DEFAULT_MODEL: &str = "tinyllama";
pub const DEFAULT_SYSTEM_PROMPT: &str = "Summarize this text for me.";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend. Unset or empty means the client is not
    /// configured and every submission is rejected before the network.
    pub backend_endpoint: Option<String>,
    /// System prompt injected on the chat protocol only.
    pub system_prompt: Option<String>,
    /// Model name sent on the chat protocol.
    pub model: String,
    /// Context ceiling the token budget is computed against.
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_endpoint: None,
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl Config {
    /// Read configuration from environment variables.
    ///
    /// `BACKEND_ENDPOINT` takes precedence over `LLM_ENDPOINT`; the remaining
    /// fields fall back to their defaults.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(endpoint) = std::env::var("BACKEND_ENDPOINT") {
            config.backend_endpoint = Some(endpoint);
        } else if let Ok(endpoint) = std::env::var("LLM_ENDPOINT") {
            config.backend_endpoint = Some(endpoint);
        }
        if let Ok(prompt) = std::env::var("SYSTEM_PROMPT") {
            config.system_prompt = Some(prompt);
        }
        if let Ok(model) = std::env::var("MODEL_NAME") {
            config.model = model;
        }
        if let Ok(max_tokens) = std::env::var("MAX_TOKENS") {
            config.max_tokens = parse_max_tokens(&max_tokens);
        }

        config
    }

    /// The configured endpoint, treating empty and whitespace-only values as
    /// unset. Trailing slashes are dropped so routes join cleanly.
    pub fn endpoint(&self) -> Option<&str> {
        self.backend_endpoint
            .as_deref()
            .map(|endpoint| endpoint.trim().trim_end_matches('/'))
            .filter(|endpoint| !endpoint.is_empty())
    }
}

fn parse_max_tokens(value: &str) -> u32 {
    match value.trim().parse() {
        Ok(max_tokens) => max_tokens,
        Err(err) => {
            log::warn!("invalid MAX_TOKENS value {value:?} ({err}), using default");
            DEFAULT_MAX_TOKENS
        }
    }
}

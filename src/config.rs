use serde::Deserialize;
use validator::Validate;

/// Main configuration for the Gurumi diary server
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct Config {
    /// HTTP server port
    #[validate(range(min = 1024, max = 65535))]
    pub server_port: u16,

    /// API key required on every request (Bearer token)
    #[validate(length(min = 32))]
    pub api_key: String,

    /// Database URL (SeaORM / SQLite)
    pub database_url: String,

    /// Base URL of the OpenAI-compatible chat completions endpoint
    pub llm_api_url: String,

    /// API key for the reasoning service
    pub llm_api_key: String,

    /// Model used for report extraction and companion replies
    pub llm_model: String,

    /// Base URL that public media paths are resolved against
    pub media_base_url: String,

    /// Storage bucket that report and diary images live in
    pub media_bucket: String,

    /// Lemon balance granted to newly registered users
    #[validate(range(min = 0, max = 1000))]
    pub initial_lemon_count: i32,

    /// Machine id baked into generated snowflake ids (0..=1023)
    #[validate(range(min = 0, max = 1023))]
    pub snowflake_machine_id: u16,

    /// Maximum database connections
    #[validate(range(min = 1, max = 100))]
    pub max_connections: u32,

    /// Log level (e.g., info, debug, trace)
    pub log_level: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            // Core defaults
            .set_default("server_port", 8080)?
            .set_default("max_connections", 10)?
            .set_default("log_level", "info")?
            .set_default("database_url", "sqlite://gurumi.db")?
            .set_default("api_key", "dev-only-key-change-me-0123456789ab")?
            .set_default("llm_api_url", "https://api.openai.com/v1")?
            .set_default("llm_api_key", "")?
            .set_default("llm_model", "gpt-4o-mini")?
            .set_default("media_base_url", "http://localhost:8080")?
            .set_default("media_bucket", "gurumi-media")?
            .set_default("initial_lemon_count", 10)?
            .set_default("snowflake_machine_id", 1u16)?
            // Load from ~/.gurumi/config.toml (if present)
            .add_source(
                config::File::with_name(&format!(
                    "{}/.gurumi/config",
                    std::env::var("HOME").unwrap_or_else(|_| ".".to_string())
                ))
                .required(false),
            )
            // Environment overrides: GURUMI__SERVER_PORT, GURUMI__API_KEY, etc.
            .add_source(config::Environment::with_prefix("GURUMI").separator("__"))
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }
}

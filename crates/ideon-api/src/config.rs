use config::{Config as ConfigLoader, ConfigError, Environment, File};
use ideon_llm::ProviderConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub mongodb: MongoDbConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default)]
    pub tavily_api_key: String,
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub gcp_project: String,
    #[serde(default)]
    pub gcp_location: String,
    #[serde(default)]
    pub gcp_access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    pub database: String,
}

impl Default for MongoDbConfig {
    fn default() -> Self {
        Self {
            database: "ideon".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// `openai` or `gemini`
    pub provider: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub max_results: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_results: 2 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub token_ttl_secs: i64,
    pub reset_token_ttl_secs: i64,
    /// Base URL embedded in password reset links
    pub frontend_base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: 3600,
            reset_token_ttl_secs: 900,
            frontend_base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (with SERVER_, MONGODB_, LLM_, etc. prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .prefix("SERVER")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("MONGODB")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("LLM")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("SEARCH")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("AUTH")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("LOG")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let mut cfg: Config = config.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.mongodb_uri = std::env::var("MONGODB_URI").map_err(|_| {
            ConfigError::Message("MONGODB_URI environment variable is required".to_string())
        })?;
        cfg.jwt_secret = std::env::var("JWT_SECRET").map_err(|_| {
            ConfigError::Message("JWT_SECRET environment variable is required".to_string())
        })?;
        cfg.tavily_api_key = std::env::var("TAVILY_API_KEY").map_err(|_| {
            ConfigError::Message("TAVILY_API_KEY environment variable is required".to_string())
        })?;

        match cfg.llm.provider.as_str() {
            "openai" => {
                cfg.openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
                    ConfigError::Message(
                        "OPENAI_API_KEY environment variable is required".to_string(),
                    )
                })?;
            }
            "gemini" => {
                cfg.gcp_project = std::env::var("GCP_PROJECT").map_err(|_| {
                    ConfigError::Message("GCP_PROJECT environment variable is required".to_string())
                })?;
                cfg.gcp_location =
                    std::env::var("GCP_LOCATION").unwrap_or_else(|_| "us-central1".to_string());
                cfg.gcp_access_token = std::env::var("GCP_ACCESS_TOKEN").map_err(|_| {
                    ConfigError::Message(
                        "GCP_ACCESS_TOKEN environment variable is required".to_string(),
                    )
                })?;
            }
            other => {
                return Err(ConfigError::Message(format!(
                    "Unknown LLM provider: {}",
                    other
                )));
            }
        }

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));
        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Provider configuration for the chat client factory
    pub fn provider_config(&self) -> Result<ProviderConfig, ConfigError> {
        match self.llm.provider.as_str() {
            "openai" => Ok(ProviderConfig::openai(self.openai_api_key.clone())),
            "gemini" => Ok(ProviderConfig::gemini(
                self.gcp_project.clone(),
                self.gcp_location.clone(),
                self.gcp_access_token.clone(),
            )),
            other => Err(ConfigError::Message(format!(
                "Unknown LLM provider: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [cors]
            enabled = true
            origins = ["http://localhost:3000"]

            [mongodb]
            database = "ideon_test"

            [llm]
            provider = "gemini"
            model = "gemini-2.0-flash-001"
            temperature = 0.5

            [search]
            max_results = 3

            [auth]
            token_ttl_secs = 600
            reset_token_ttl_secs = 300
            frontend_base_url = "https://app.example.com"

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.mongodb.database, "ideon_test");
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.search.max_results, 3);
        assert_eq!(config.auth.token_ttl_secs, 600);
    }

    #[test]
    fn test_sections_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.mongodb.database, "ideon");
        assert_eq!(config.llm.provider, "openai");
    }
}

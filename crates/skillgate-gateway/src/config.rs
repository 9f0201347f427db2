use anyhow::Context;
use serde::Deserialize;
use skillgate_logging::LogFormat;
use skillgate_skills::inference::{DEFAULT_TIMEOUT, SPORTS_SERVICE_URL_ENV};
use skillgate_skills::{EndpointConfig, SkillOptions};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the chat model deployment the host triggers skills with
pub const CHAT_MODEL_ENV: &str = "CHAT_MODEL_DEPLOYMENT_NAME";

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[inference]
# url = ""  # Set via SPORTS_SERVICE_URL env var; the public baseball agent is used when unset
timeout_secs = 30

[database]
path = "skillgate.db"

[logging]
level = "info"  # trace, debug, info, warn, error
format = "pretty"  # pretty, json

[skills]
# model = ""  # Set via CHAT_MODEL_DEPLOYMENT_NAME env var
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceConfig {
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "skillgate.db".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SkillsConfig {
    pub model: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub skills: SkillsConfig,
}

impl Config {
    /// Get the global config path: ~/.skillgate/skillgate.toml
    fn global_config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".skillgate").join("skillgate.toml"))
    }

    /// Ensure global config directory and file exist, creating defaults if needed
    fn ensure_global_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::global_config_path()?;
        let config_dir = config_path
            .parent()
            .context("Global config path has no parent directory")?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            eprintln!("Created config directory: {}", config_dir.display());
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())?;
            eprintln!("Created default config: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.skillgate/skillgate.toml (auto-created if missing)
    /// 2. Local override: ./skillgate.toml (workspace, optional)
    /// 3. Environment variables (highest priority)
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let global_config_path = Self::ensure_global_config()?;

        let builder = config::Config::builder()
            .add_source(config::File::from(global_config_path))
            .add_source(config::File::with_name("skillgate").required(false));

        Self::from_builder(builder, |key| env::var(key).ok())
    }

    /// Apply environment layers on top of file sources and deserialize
    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        // Layer 3: Environment variables with SKILLGATE__ prefix
        let mut builder =
            builder.add_source(config::Environment::with_prefix("SKILLGATE").separator("__"));

        // Layer 4: Apply convenience env var overrides (highest priority)
        if let Some(url) = lookup(SPORTS_SERVICE_URL_ENV) {
            builder = builder.set_override("inference.url", url)?;
        }

        if let Some(model) = lookup(CHAT_MODEL_ENV) {
            builder = builder.set_override("skills.model", model)?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Settings for the built-in skills
    pub fn skill_options(&self) -> SkillOptions {
        SkillOptions {
            endpoint: EndpointConfig::resolve(self.inference.url.as_deref()),
            timeout: Duration::from_secs(self.inference.timeout_secs),
            model: self.skills.model.clone().filter(|m| !m.is_empty()),
        }
    }
}

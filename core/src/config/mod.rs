use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const REGULA_DIR: &str = ".regula";
const LOG_FILE: &str = "query_log.json";

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_APP_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub truncate_limit: usize,
    /// Optional knowledge-base file; the built-in compliance reference list
    /// is used when unset.
    pub knowledge_file: Option<PathBuf>,
    #[serde(skip)]
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: crate::agent::DEFAULT_TEMPERATURE,
            truncate_limit: crate::agent::DEFAULT_TRUNCATE_LIMIT,
            knowledge_file: None,
            log_path: get_regula_dir().join(LOG_FILE),
        }
    }
}

pub fn get_regula_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(REGULA_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_regula_dir().join("config.toml")
}

pub fn ensure_regula_dir() -> Result<PathBuf> {
    let regula_dir = get_regula_dir();

    if !regula_dir.exists() {
        std::fs::create_dir_all(&regula_dir).with_context(|| {
            format!(
                "Failed to create regula directory at {}",
                regula_dir.display()
            )
        })?;
    }

    Ok(regula_dir)
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        if config_exists() {
            load_config()
        } else {
            Ok(Config::default())
        }
    }

    /// Effective API key: the configured value, falling back to the
    /// environment-provided secret.
    pub fn resolve_api_key(&self) -> Result<String> {
        if !self.api_key.is_empty() {
            return Ok(self.api_key.clone());
        }

        std::env::var("OPENAI_API_KEY")
            .context("No API key configured. Run 'regula onboard' or export OPENAI_API_KEY.")
    }

    /// Knowledge summary, loaded once at startup: the configured file, or
    /// the built-in reference list.
    pub fn knowledge_summary(&self) -> Result<String> {
        match &self.knowledge_file {
            Some(path) => std::fs::read_to_string(path).with_context(|| {
                format!("Failed to read knowledge base from {}", path.display())
            }),
            None => Ok(crate::agent::DEFAULT_KNOWLEDGE.to_string()),
        }
    }
}

/// The login-gate shared secret, supplied by the hosting environment.
pub fn app_password() -> String {
    std::env::var("APP_PASSWORD").unwrap_or_else(|_| DEFAULT_APP_PASSWORD.to_string())
}

pub fn load_config() -> Result<Config> {
    let config_path = get_config_path();

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!(
                "Config file not found. Run 'regula onboard' to set up your configuration."
            )
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", config_path.display(), e)
        }
    })?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config.log_path = get_regula_dir().join(LOG_FILE);

    Ok(config)
}

pub fn save_config(config: &Config) -> Result<()> {
    ensure_regula_dir()?;

    let config_path = get_config_path();
    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}

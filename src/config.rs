use crate::log_debug;

use anyhow::{Result, anyhow};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variables checked, in order, for the API credential
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY", "GOOGLE_API_KEY"];

/// Shown whenever a generation call is attempted without a credential
pub const MISSING_API_KEY_MESSAGE: &str =
    "API key not set. Export GEMINI_API_KEY (or API_KEY) before generating images.";

/// Directory name under the platform config dir
pub const APP_DIR_NAME: &str = "tryon-studio";

/// Configuration structure for the studio
///
/// The API key is deliberately not part of the file: it only ever comes from
/// the process environment.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Model used for composites and item images
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Model used to invent item descriptions
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// API root, without the `/models/...` suffix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Where composites and generated items are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Drop try-on results that arrive after the model image changed
    #[serde(default = "default_discard_stale_results")]
    pub discard_stale_results: bool,
    /// Whether to enable verbose logging (includes HTTP client internals)
    #[serde(default)]
    pub verbose_logging: bool,
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("tryon-output")
}

fn default_discard_stale_results() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_model: default_image_model(),
            text_model: default_text_model(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            output_dir: default_output_dir(),
            discard_stale_results: default_discard_stale_results(),
            verbose_logging: false,
        }
    }
}

/// Partial update applied by `tryon-studio config`
#[derive(Debug, Default, Clone)]
pub struct ConfigUpdate {
    pub image_model: Option<String>,
    pub text_model: Option<String>,
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub discard_stale_results: Option<bool>,
    pub verbose_logging: Option<bool>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self.image_model.is_none()
            && self.text_model.is_none()
            && self.api_base_url.is_none()
            && self.request_timeout_secs.is_none()
            && self.output_dir.is_none()
            && self.discard_stale_results.is_none()
            && self.verbose_logging.is_none()
    }
}

impl Config {
    /// Load the configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::get_config_path()?)?;
        log_debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| {
            anyhow!(
                "Invalid configuration file format: {}. Please check {} for syntax errors.",
                e,
                path.display()
            )
        })
    }

    /// Save the configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        log_debug!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(app_config_dir()?.join("config.toml"))
    }

    /// Apply the given changes, validating them first
    pub fn update(&mut self, update: ConfigUpdate) -> Result<()> {
        if let Some(model) = update.image_model {
            self.image_model = non_empty(model, "image model")?;
        }
        if let Some(model) = update.text_model {
            self.text_model = non_empty(model, "text model")?;
        }
        if let Some(url) = update.api_base_url {
            let url = non_empty(url, "API base URL")?;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow!("API base URL must start with http:// or https://"));
            }
            self.api_base_url = url;
        }
        if let Some(timeout) = update.request_timeout_secs {
            if timeout == 0 {
                return Err(anyhow!("Timeout must be at least one second"));
            }
            self.request_timeout_secs = timeout;
        }
        if let Some(dir) = update.output_dir {
            self.output_dir = dir;
        }
        if let Some(discard) = update.discard_stale_results {
            self.discard_stale_results = discard;
        }
        if let Some(verbose) = update.verbose_logging {
            self.verbose_logging = verbose;
        }
        log_debug!("Configuration updated: {:?}", self);
        Ok(())
    }

    /// The API credential from the environment, if any
    pub fn api_key(&self) -> Option<String> {
        api_key_from(|name| std::env::var(name).ok())
    }

    /// Fail with a configuration error when no credential is available
    pub fn check_environment(&self) -> crate::error::Result<()> {
        if self.api_key().is_none() {
            return Err(crate::error::StudioError::Configuration(
                MISSING_API_KEY_MESSAGE.to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty(value: String, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("The {} cannot be empty", what));
    }
    Ok(trimmed.to_string())
}

/// First non-blank value among [`API_KEY_ENV_VARS`], read through `lookup`
pub fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// `<config dir>/tryon-studio`, created on demand
pub fn app_config_dir() -> Result<PathBuf> {
    let mut path = config_dir().ok_or_else(|| anyhow!("Unable to determine config directory"))?;
    path.push(APP_DIR_NAME);
    fs::create_dir_all(&path)?;
    Ok(path)
}

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use studio_engine::{ClientSettings, EngineConfig, DEFAULT_GENERATOR_URL, DEFAULT_RENDER_URL};
use studio_logging::{studio_debug, studio_info, LogDestination};

/// Picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "readme_studio.ron";

/// Settings read from `readme_studio.ron`. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generator_url: String,
    pub render_url: String,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub trust_rendered_html: bool,
    pub log_destination: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator_url: DEFAULT_GENERATOR_URL.to_string(),
            render_url: DEFAULT_RENDER_URL.to_string(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            user_agent: None,
            trust_rendered_html: false,
            log_destination: LogDestination::default(),
        }
    }
}

impl AppConfig {
    /// Explicit path first, then `./readme_studio.ron`, then defaults.
    ///
    /// An explicit path that cannot be read is an error; a missing default file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::read(&path)
                } else {
                    studio_debug!("No {} found; using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        studio_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Command-line or environment values win over the file.
    pub fn apply_overrides(&mut self, generator_url: Option<String>, render_url: Option<String>) {
        if let Some(url) = generator_url {
            self.generator_url = url;
        }
        if let Some(url) = render_url {
            self.render_url = url;
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        let mut client = ClientSettings {
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            ..ClientSettings::default()
        };
        if let Some(agent) = &self.user_agent {
            client.user_agent = agent.clone();
        }
        EngineConfig {
            generator_url: self.generator_url.clone(),
            render_url: self.render_url.clone(),
            client,
            trust_rendered_html: self.trust_rendered_html,
        }
    }
}

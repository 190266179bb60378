use std::time::Duration;

use url::Url;

use crate::EngineError;

pub const DEFAULT_GENERATOR_URL: &str = "http://localhost:8000";
pub const DEFAULT_RENDER_URL: &str = "https://api.github.com/markdown";

/// Transport settings shared by both service clients.
///
/// Timeouts are unset by default: a hung service hangs its pipeline step.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            request_timeout: None,
            user_agent: format!("readme-studio/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientSettings {
    pub(crate) fn build_client(&self) -> Result<reqwest::Client, EngineError> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| EngineError::HttpClient(err.to_string()))
    }
}

/// Everything needed to build the production engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub generator_url: String,
    pub render_url: String,
    pub client: ClientSettings,
    /// Skip sanitizing rendered HTML. Only for services you control.
    pub trust_rendered_html: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generator_url: DEFAULT_GENERATOR_URL.to_string(),
            render_url: DEFAULT_RENDER_URL.to_string(),
            client: ClientSettings::default(),
            trust_rendered_html: false,
        }
    }
}

pub(crate) fn parse_endpoint(service: &'static str, raw: &str) -> Result<Url, EngineError> {
    let url = Url::parse(raw.trim()).map_err(|err| EngineError::InvalidEndpoint {
        service,
        url: raw.to_string(),
        message: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(EngineError::InvalidEndpoint {
            service,
            url: raw.to_string(),
            message: format!("unsupported scheme {other}"),
        }),
    }
}

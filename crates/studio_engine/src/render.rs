use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use studio_logging::{studio_info, studio_warn};
use url::Url;

use crate::generate::transport_error;
use crate::settings::{parse_endpoint, ClientSettings};
use crate::{ClientError, EngineError, FailureKind};

/// Name used in status failure messages: `"GitHub API error: 403"`.
const SERVICE_LABEL: &str = "GitHub API";

#[derive(Debug, Serialize)]
struct MarkdownRequest<'a> {
    text: &'a str,
    mode: &'static str,
}

#[async_trait::async_trait]
pub trait RenderClient: Send + Sync {
    /// Render GitHub-flavoured markdown to HTML, returned verbatim.
    async fn render(&self, markdown: &str) -> Result<String, ClientError>;
}

/// Client for the public GitHub markdown endpoint (or anything speaking its contract).
///
/// The unauthenticated endpoint allows roughly 60 requests per hour. Quota is not
/// tracked here; exhaustion shows up as an ordinary status failure (usually 403).
#[derive(Debug, Clone)]
pub struct GithubRenderClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl GithubRenderClient {
    pub fn new(endpoint: &str, settings: &ClientSettings) -> Result<Self, EngineError> {
        Ok(Self {
            endpoint: parse_endpoint("render", endpoint)?,
            client: settings.build_client()?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl RenderClient for GithubRenderClient {
    async fn render(&self, markdown: &str) -> Result<String, ClientError> {
        studio_info!("POST {} markdown_len={}", self.endpoint, markdown.len());
        let body = serde_json::to_string(&MarkdownRequest {
            text: markdown,
            mode: "gfm",
        })
        .map_err(|err| ClientError::new(FailureKind::ContractViolation, err.to_string()))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            studio_warn!("render service answered {}", status);
            return Err(ClientError::new(
                FailureKind::ServiceStatus(status.as_u16()),
                format!("{SERVICE_LABEL} error: {}", status.as_u16()),
            ));
        }

        response.text().await.map_err(transport_error)
    }
}

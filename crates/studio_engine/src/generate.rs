use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use studio_logging::{studio_info, studio_warn};
use url::Url;

use crate::settings::{parse_endpoint, ClientSettings};
use crate::{ClientError, EngineError, FailureKind};

const SERVICE: &str = "generation";

/// Wire body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReadmeRequest {
    pub project_name: String,
    pub description: String,
    pub features: Vec<String>,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReadmeResponse {
    readme: Option<String>,
}

#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    /// One call, full body awaited, no retry.
    async fn generate(&self, request: &ReadmeRequest) -> Result<String, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestGenerationClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl ReqwestGenerationClient {
    /// `base_url` is the service root; `/generate` is appended.
    pub fn new(base_url: &str, settings: &ClientSettings) -> Result<Self, EngineError> {
        let mut base = parse_endpoint(SERVICE, base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join("generate")
            .map_err(|err| EngineError::InvalidEndpoint {
                service: SERVICE,
                url: base_url.to_string(),
                message: err.to_string(),
            })?;
        Ok(Self {
            endpoint,
            client: settings.build_client()?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl GenerationClient for ReqwestGenerationClient {
    async fn generate(&self, request: &ReadmeRequest) -> Result<String, ClientError> {
        studio_info!(
            "POST {} project_name={:?} features={} technologies={}",
            self.endpoint,
            request.project_name,
            request.features.len(),
            request.technologies.len()
        );
        let body = serde_json::to_string(request)
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
            studio_warn!("generation service answered {}", status);
            return Err(ClientError::new(
                FailureKind::ServiceStatus(status.as_u16()),
                format!("{SERVICE} service error: {}", status.as_u16()),
            ));
        }

        let text = response.text().await.map_err(transport_error)?;
        parse_readme(&text)
    }
}

fn parse_readme(body: &str) -> Result<String, ClientError> {
    let parsed: ReadmeResponse = serde_json::from_str(body).map_err(|err| {
        studio_warn!("generation response is not valid JSON: {}", err);
        contract_violation()
    })?;
    match parsed.readme {
        Some(readme) if !readme.trim().is_empty() => Ok(readme),
        _ => {
            studio_warn!("generation response has no readme");
            Err(contract_violation())
        }
    }
}

fn contract_violation() -> ClientError {
    ClientError::new(FailureKind::ContractViolation, "generation failed")
}

pub(crate) fn transport_error(err: reqwest::Error) -> ClientError {
    studio_warn!("transport failure: {}", err);
    ClientError::new(FailureKind::Transport, err.to_string())
}

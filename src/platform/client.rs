// ABOUTME: HTTP client for the platform API using reqwest.
// ABOUTME: Validates configs, polls image optimization, and creates releases.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use super::error::PlatformError;
use super::types::{
    ConfigValidation, ErrorBody, OptimizationStatus, OptimizeRequest, OptimizeResponse, Release,
    ReleaseInput, ValidateRequest,
};
use super::PlatformOps;
use crate::config::{ClientSettings, Definition};
use crate::types::AppName;

/// Client for the platform REST API.
pub struct PlatformClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl PlatformClient {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, PlatformError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hoist/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    /// Build a client from environment-derived settings.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, PlatformError> {
        let token = settings.access_token.as_deref().ok_or_else(|| {
            PlatformError::Unauthorized("no access token configured".to_string())
        })?;
        Self::new(&settings.api_url, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn app_url(&self, app: &AppName, path: &str) -> String {
        format!("{}/v1/apps/{}/{}", self.base_url, app, path)
    }

    async fn post<B, T>(&self, url: &str, body: &B) -> Result<T, PlatformError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        trace!("POST {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| PlatformError::Decode(e.to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    "(no response body)".to_string()
                } else {
                    text
                }
            });

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(PlatformError::Unauthorized(message))
            }
            _ => Err(PlatformError::Api {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

#[async_trait]
impl PlatformOps for PlatformClient {
    async fn validate_config(
        &self,
        app: &AppName,
        definition: &Definition,
    ) -> Result<ConfigValidation, PlatformError> {
        let url = self.app_url(app, "config/validate");
        debug!(app = %app, "validating app configuration");
        self.post(&url, &ValidateRequest { definition }).await
    }

    async fn optimization_status(
        &self,
        app: &AppName,
        image: &str,
    ) -> Result<OptimizationStatus, PlatformError> {
        let url = self.app_url(app, "images/optimize");
        let response: OptimizeResponse = self.post(&url, &OptimizeRequest { image }).await?;
        debug!(app = %app, image, status = %response.status, "optimization status");
        Ok(response.status)
    }

    async fn create_release(&self, input: &ReleaseInput) -> Result<Release, PlatformError> {
        let url = self.app_url(&input.app, "releases");
        debug!(app = %input.app, image = %input.image, "creating release");
        self.post(&url, input).await
    }
}

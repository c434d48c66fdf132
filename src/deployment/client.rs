//! HTTP client for the deployment management API (v2)
//!
//! An export is a three step exchange: start the export, poll its status
//! until it completes, then download the package zip.

use super::error::DeploymentError;
use super::types::{DeploymentCreated, DeploymentStatus, ExportRequest, ExportState};
use super::PackageExporter;
use crate::config::DeploymentCredentials;
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

const API_KEY_HEADER: &str = "appian-api-key";
const ACTION_TYPE_HEADER: &str = "Action-Type";
const DEPLOYMENTS_PATH: &str = "/suite/deployment-management/v2/deployments";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_POLLS: u32 = 60;

/// Longest response body kept in error messages
const MAX_ERROR_BODY: usize = 500;

pub struct DeploymentClient {
    base_url: String,
    api_key: String,
    http_client: Client,
    timeout: Duration,
    poll_interval: Duration,
    max_polls: u32,
}

impl DeploymentClient {
    pub fn new(
        credentials: DeploymentCredentials,
        timeout: Duration,
    ) -> Result<Self, DeploymentError> {
        let http_client = Client::builder().timeout(timeout).build().map_err(|e| {
            DeploymentError::NetworkError {
                message: format!("Failed to build HTTP client: {}", e),
            }
        })?;

        Ok(Self {
            base_url: credentials.base_url,
            api_key: credentials.api_key,
            http_client,
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        })
    }

    /// Overrides the status polling cadence.
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    pub fn deployments_url(&self) -> String {
        format!("{}{}", self.base_url, DEPLOYMENTS_PATH)
    }

    pub fn status_url(&self, deployment: &str) -> String {
        format!("{}/{}", self.deployments_url(), deployment)
    }

    pub fn default_package_url(&self, deployment: &str) -> String {
        format!("{}/package-zip", self.status_url(deployment))
    }

    async fn start_export(&self, app_uuid: &str) -> Result<String, DeploymentError> {
        let request = ExportRequest::application(app_uuid, chrono::Utc::now().timestamp());
        let json = serde_json::to_string(&request).map_err(|e| DeploymentError::InvalidResponse {
            message: format!("Failed to encode export request: {}", e),
            raw_response: None,
        })?;

        let response = self
            .http_client
            .post(self.deployments_url())
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACTION_TYPE_HEADER, "export")
            .multipart(Form::new().text("json", json))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        debug!("Export request returned status {}", response.status());
        let created: DeploymentCreated = self.decode(response).await?;
        info!(deployment = %created.uuid, "Started export of application {}", app_uuid);
        Ok(created.uuid)
    }

    async fn poll_until_complete(
        &self,
        deployment: &str,
    ) -> Result<DeploymentStatus, DeploymentError> {
        let url = self.status_url(deployment);

        for attempt in 1..=self.max_polls {
            let response = self
                .http_client
                .get(&url)
                .header(API_KEY_HEADER, &self.api_key)
                .send()
                .await
                .map_err(|e| self.request_error(e))?;
            let status: DeploymentStatus = self.decode(response).await?;

            debug!(deployment, attempt, status = %status.status, "Export status");

            match status.state() {
                state if state.is_complete() => return Ok(status),
                ExportState::Failed => {
                    return Err(DeploymentError::ExportFailed {
                        deployment: deployment.to_string(),
                        details: status.status,
                    })
                }
                _ => {}
            }

            if attempt < self.max_polls {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(DeploymentError::PollLimitExceeded {
            deployment: deployment.to_string(),
            polls: self.max_polls,
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, DeploymentError> {
        debug!("Downloading package from {}", url);

        let response = self
            .http_client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;
        let response = self.check_status(response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.request_error(e))?;

        if bytes.is_empty() {
            return Err(DeploymentError::EmptyPackage {
                url: url.to_string(),
            });
        }

        Ok(bytes.to_vec())
    }

    async fn check_status(&self, response: Response) -> Result<Response, DeploymentError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let body: String = body.chars().take(MAX_ERROR_BODY).collect();
        error!("Deployment API returned error status {}: {}", status, body);

        Err(DeploymentError::ApiError {
            message: format!("HTTP {}: {}", status, body),
            status_code: Some(status.as_u16()),
        })
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, DeploymentError> {
        let response = self.check_status(response).await?;
        let text = response.text().await.map_err(|e| self.request_error(e))?;

        serde_json::from_str(&text).map_err(|e| DeploymentError::InvalidResponse {
            message: format!("JSON parse error: {}", e),
            raw_response: Some(text.chars().take(MAX_ERROR_BODY).collect()),
        })
    }

    fn request_error(&self, e: reqwest::Error) -> DeploymentError {
        if e.is_timeout() {
            error!("Deployment request timed out after {:?}", self.timeout);
            DeploymentError::TimeoutError {
                seconds: self.timeout.as_secs(),
            }
        } else if e.is_connect() {
            error!("Cannot connect to {}", self.base_url);
            DeploymentError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else {
            error!("Deployment request error: {}", e);
            DeploymentError::NetworkError {
                message: format!("Request failed: {}", e),
            }
        }
    }
}

#[async_trait]
impl PackageExporter for DeploymentClient {
    async fn export_application(&self, app_uuid: &str) -> Result<Vec<u8>, DeploymentError> {
        let start = Instant::now();

        let deployment = self.start_export(app_uuid).await?;
        let status = self.poll_until_complete(&deployment).await?;

        let url = status
            .package_zip
            .unwrap_or_else(|| self.default_package_url(&deployment));
        let bytes = self.download(&url).await?;

        info!(
            "Exported application {} ({} bytes) in {:.1}s",
            app_uuid,
            bytes.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(bytes)
    }
}

impl fmt::Debug for DeploymentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .field("max_polls", &self.max_polls)
            .finish()
    }
}

//! Package export through the platform's deployment API

pub mod client;
pub mod error;
pub mod types;

pub use client::DeploymentClient;
pub use error::DeploymentError;
pub use types::{DeploymentStatus, ExportRequest, ExportState};

use async_trait::async_trait;

/// Produces the package zip for an application.
#[async_trait]
pub trait PackageExporter: Send + Sync {
    async fn export_application(&self, app_uuid: &str) -> Result<Vec<u8>, DeploymentError>;
}

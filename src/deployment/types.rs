//! Wire types for the deployment API

use serde::{Deserialize, Serialize};

/// Body of the `json` form field that starts an export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub export_type: String,
    pub uuids: Vec<String>,
    pub name: String,
}

impl ExportRequest {
    pub fn application(app_uuid: &str, timestamp: i64) -> Self {
        Self {
            export_type: "application".to_string(),
            uuids: vec![app_uuid.to_string()],
            name: format!("a11y-audit-export-{}", timestamp),
        }
    }
}

/// Response to the export request
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentCreated {
    pub uuid: String,
}

/// Response to a status poll
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub package_zip: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Completed,
    CompletedWithErrors,
    Failed,
    InProgress,
}

impl ExportState {
    pub fn is_complete(self) -> bool {
        matches!(self, ExportState::Completed | ExportState::CompletedWithErrors)
    }
}

impl DeploymentStatus {
    pub fn state(&self) -> ExportState {
        match self.status.as_str() {
            "COMPLETED" => ExportState::Completed,
            "COMPLETED_WITH_EXPORT_ERRORS" => ExportState::CompletedWithErrors,
            "FAILED" => ExportState::Failed,
            _ => ExportState::InProgress,
        }
    }
}

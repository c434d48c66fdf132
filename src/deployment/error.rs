use std::fmt;

/// Errors raised while exporting a package through the deployment API
#[derive(Debug, Clone)]
pub enum DeploymentError {
    /// The API answered with an error status
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Request timed out after the specified duration (in seconds)
    TimeoutError { seconds: u64 },

    /// Connection or transport failure
    NetworkError { message: String },

    /// A response body could not be decoded
    InvalidResponse {
        message: String,
        raw_response: Option<String>,
    },

    /// The export finished with status FAILED
    ExportFailed { deployment: String, details: String },

    /// The export never completed within the poll budget
    PollLimitExceeded { deployment: String, polls: u32 },

    /// The package download returned no bytes
    EmptyPackage { url: String },
}

impl fmt::Display for DeploymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentError::ApiError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "Deployment API error ({}): {}", code, message)
                } else {
                    write!(f, "Deployment API error: {}", message)
                }
            }
            DeploymentError::TimeoutError { seconds } => {
                write!(f, "Request timed out after {} seconds", seconds)
            }
            DeploymentError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            DeploymentError::InvalidResponse { message, .. } => {
                write!(f, "Invalid response from deployment API: {}", message)
            }
            DeploymentError::ExportFailed {
                deployment,
                details,
            } => {
                write!(f, "Export {} failed: {}", deployment, details)
            }
            DeploymentError::PollLimitExceeded { deployment, polls } => {
                write!(
                    f,
                    "Export {} did not complete after {} status checks",
                    deployment, polls
                )
            }
            DeploymentError::EmptyPackage { url } => {
                write!(f, "Package download from {} returned no data", url)
            }
        }
    }
}

impl std::error::Error for DeploymentError {}

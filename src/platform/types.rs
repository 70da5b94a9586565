// ABOUTME: Request and response types for the platform API.
// ABOUTME: Optimization status, releases, and config validation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Definition;
use crate::types::{AppName, ReleaseId};

/// Status of a remote image optimization job.
///
/// Unrecognized values are kept verbatim in `Other` so the poller can decide
/// what to do with them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum OptimizationStatus {
    InProgress,
    Done,
    Failed,
    Other(String),
}

impl From<String> for OptimizationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "in_progress" => OptimizationStatus::InProgress,
            "done" => OptimizationStatus::Done,
            "failed" | "error" => OptimizationStatus::Failed,
            _ => OptimizationStatus::Other(value),
        }
    }
}

impl From<&str> for OptimizationStatus {
    fn from(value: &str) -> Self {
        OptimizationStatus::from(value.to_string())
    }
}

impl fmt::Display for OptimizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationStatus::InProgress => write!(f, "in_progress"),
            OptimizationStatus::Done => write!(f, "done"),
            OptimizationStatus::Failed => write!(f, "failed"),
            OptimizationStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A release as recorded by the platform. Treated as opaque locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub id: ReleaseId,
    pub version: u64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a release creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseInput {
    pub app: AppName,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<Definition>,
}

/// Outcome of remote config validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfigValidation {
    pub valid: bool,
    #[serde(default)]
    pub definition: Definition,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ValidateRequest<'a> {
    pub definition: &'a Definition,
}

#[derive(Debug, Serialize)]
pub(crate) struct OptimizeRequest<'a> {
    pub image: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OptimizeResponse {
    pub status: OptimizationStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

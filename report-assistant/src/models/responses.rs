// Response models
// What the session provider and reporting backend hand back to the UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::draft::{OutputFormat, ReportDraft};
use super::requests::AuthMode;

/// Envelope for machine-readable command output (`--wizard-smoke`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: Uuid,
    pub username: String,
    pub mode: AuthMode,
    pub established_at: DateTime<Utc>,
}

/// Acknowledgement of a queued report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHandle {
    pub report_id: Uuid,
    pub file_name: String,
    pub format: OutputFormat,
    pub submitted_at: DateTime<Utc>,
    /// Notification title and body for the UI.
    pub title: String,
    pub message: String,
}

impl ReportHandle {
    /// `<file name>.<extension>`
    pub fn output_file(&self) -> String {
        format!("{}.{}", self.file_name, self.format.extension())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardTranscript {
    pub steps: Vec<String>,
    pub draft: ReportDraft,
    pub handle: ReportHandle,
}

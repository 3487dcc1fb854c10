// Reporting backend
//
// Receives the completed draft from the wizard. The stub acknowledges with a handle; a real
// implementation would queue rendering and export.

use crate::models::draft::ReportDraft;
use crate::models::records::TemplateRecord;
use crate::models::responses::ReportHandle;
use crate::utils::logging::mask_recipients;
use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use std::time::Duration;
use tokio::time::timeout;
use uuid::Uuid;

pub const GENERATION_STARTED_TITLE: &str = "Report Generation Started";
pub const GENERATION_STARTED_MESSAGE: &str =
    "Your report is being generated and will be available shortly.";

#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    #[error("The selected template could not be found.")]
    TemplateNotFound { template_id: String },
    #[error("The report could not be exported.")]
    ExportFailed { internal_details: String },
    #[error("The reporting service did not respond in time. Please try again.")]
    ConnectionTimeout,
    #[error("The report is missing required steps: {}", missing.join(", "))]
    IncompleteDraft { missing: Vec<&'static str> },
}

impl GenerationError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn internal_details(&self) -> String {
        match self {
            GenerationError::TemplateNotFound { template_id } => {
                format!("unknown template id '{}'", template_id)
            }
            GenerationError::ExportFailed { internal_details } => internal_details.clone(),
            GenerationError::ConnectionTimeout => "submission timed out".to_string(),
            GenerationError::IncompleteDraft { missing } => {
                format!("missing steps: {:?}", missing)
            }
        }
    }
}

#[async_trait]
pub trait ReportBackend: Send + Sync {
    async fn submit_report(&self, draft: &ReportDraft) -> Result<ReportHandle, GenerationError>;

    fn timeout_duration(&self) -> Duration {
        Duration::from_secs(10)
    }
}

/// Checks the draft against the template catalog and acknowledges after a short delay.
#[derive(Debug, Clone)]
pub struct StubReportBackend {
    templates: Vec<TemplateRecord>,
    delay: Duration,
}

impl StubReportBackend {
    pub fn new(templates: Vec<TemplateRecord>, delay: Duration) -> Self {
        Self { templates, delay }
    }
}

#[async_trait]
impl ReportBackend for StubReportBackend {
    async fn submit_report(&self, draft: &ReportDraft) -> Result<ReportHandle, GenerationError> {
        let (true, Some(template), Some(output)) =
            (draft.is_complete(), &draft.template, &draft.output)
        else {
            return Err(GenerationError::IncompleteDraft {
                missing: draft.missing_steps(),
            });
        };

        if !self.templates.iter().any(|t| t.id == template.template_id) {
            return Err(GenerationError::TemplateNotFound {
                template_id: template.template_id.clone(),
            });
        }

        tokio::time::sleep(self.delay).await;

        Ok(ReportHandle {
            report_id: Uuid::new_v4(),
            file_name: output.file_name.clone(),
            format: output.format,
            submitted_at: Utc::now(),
            title: GENERATION_STARTED_TITLE.to_string(),
            message: GENERATION_STARTED_MESSAGE.to_string(),
        })
    }
}

/// Submit with the backend's timeout applied; logs the outcome.
pub async fn submit_with_timeout<B: ReportBackend + ?Sized>(
    backend: &B,
    draft: &ReportDraft,
) -> Result<ReportHandle, GenerationError> {
    if let Some(email) = draft.output.as_ref().and_then(|o| o.email.as_ref()) {
        info!(
            "[PHASE: report] [STEP: submit] Email dispatch requested (recipients={})",
            mask_recipients(&email.recipients)
        );
    }

    let result = match timeout(backend.timeout_duration(), backend.submit_report(draft)).await {
        Ok(result) => result,
        Err(_) => Err(GenerationError::ConnectionTimeout),
    };

    match &result {
        Ok(handle) => info!(
            "[PHASE: report] [STEP: submit] Report {} accepted ({})",
            handle.report_id,
            handle.output_file()
        ),
        Err(e) => warn!(
            "[PHASE: report] [STEP: submit] Submission rejected: {}",
            e.internal_details()
        ),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_templates;
    use crate::models::draft::{
        ChartsValue, CriteriaValue, EmailDispatch, OutputFormat, OutputValue, PreviewValue,
        ReportType, TemplateValue,
    };
    use chrono::NaiveDate;

    fn complete_draft(template_id: &str) -> ReportDraft {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        ReportDraft {
            criteria: Some(CriteriaValue {
                date_from: day(1),
                date_to: day(31),
                machine_ids: vec!["MACHINE-001".to_string()],
                report_type: ReportType::ProductionSummary,
            }),
            template: Some(TemplateValue {
                template_id: template_id.to_string(),
            }),
            preview: Some(PreviewValue {
                selected_row_ids: vec!["data-0".to_string()],
            }),
            charts: Some(ChartsValue { charts: None }),
            output: Some(OutputValue {
                format: OutputFormat::Csv,
                file_name: "test_report".to_string(),
                location: None,
                email: Some(EmailDispatch {
                    recipients: vec!["ops@example.com".to_string()],
                    message: None,
                }),
            }),
        }
    }

    fn backend() -> StubReportBackend {
        StubReportBackend::new(default_templates(), Duration::from_millis(1))
    }

    struct HangingBackend;

    #[async_trait]
    impl ReportBackend for HangingBackend {
        async fn submit_report(&self, _draft: &ReportDraft) -> Result<ReportHandle, GenerationError> {
            std::future::pending::<()>().await;
            unreachable!()
        }

        fn timeout_duration(&self) -> Duration {
            Duration::from_millis(50)
        }
    }

    #[tokio::test]
    async fn complete_draft_is_acknowledged() {
        let handle = submit_with_timeout(&backend(), &complete_draft("tpl1"))
            .await
            .unwrap();
        assert_eq!(handle.title, GENERATION_STARTED_TITLE);
        assert_eq!(handle.message, GENERATION_STARTED_MESSAGE);
        assert_eq!(handle.output_file(), "test_report.csv");
    }

    #[tokio::test]
    async fn unknown_template_is_rejected() {
        let err = submit_with_timeout(&backend(), &complete_draft("tpl99"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::TemplateNotFound { ref template_id } if template_id == "tpl99"));
        assert!(!err.user_message().contains("tpl99"));
    }

    #[tokio::test]
    async fn incomplete_draft_lists_missing_steps() {
        let mut draft = complete_draft("tpl1");
        draft.preview = None;
        let err = backend().submit_report(&draft).await.unwrap_err();
        match err {
            GenerationError::IncompleteDraft { missing } => assert_eq!(missing, vec!["preview"]),
            other => panic!("unexpected error {:?}", other),
        }

        let err = backend()
            .submit_report(&ReportDraft::default())
            .await
            .unwrap_err();
        assert!(err.user_message().contains("criteria"));
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let err = submit_with_timeout(&HangingBackend, &complete_draft("tpl1"))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::ConnectionTimeout));
    }
}
